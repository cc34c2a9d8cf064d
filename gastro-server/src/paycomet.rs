//! Paycomet hosted payment page
//!
//! The browser is sent to the gateway through an auto-submitting form whose
//! fields are signed with SHA-512. The gateway redirects back to `URLOK` or
//! `URLKO`, which flip the receipt status.

use serde::Serialize;
use sha2::{Digest, Sha512};
use shared::error::{AppError, ErrorCode};
use shared::models::Receipt;
use shared::money;
use sqlx::PgPool;

use crate::config::{Config, PaycometConfig};
use crate::db::receipts;
use crate::error::ServiceResult;

pub const SUCCESS_PATH: &str = "/payment/success";
pub const FAILURE_PATH: &str = "/payment/failure";

/// Signed form posted to the hosted payment page
#[derive(Debug, Clone, Serialize)]
pub struct PaymentForm {
    pub action: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

impl PaymentForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Uppercase hex SHA-512 of
/// `client_code + terminal + order + amount + currency + password`
pub fn signature(paycomet: &PaycometConfig, order: &str, amount: i64) -> String {
    let mut hasher = Sha512::new();
    hasher.update(paycomet.client_code.as_bytes());
    hasher.update(paycomet.terminal.as_bytes());
    hasher.update(order.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hasher.update(paycomet.currency.as_bytes());
    hasher.update(paycomet.password.as_bytes());
    hex::encode_upper(hasher.finalize())
}

/// Build the form for `receipt`. The order string is the receipt id and the
/// amount its total in (truncated) cents.
pub fn build_form(config: &Config, receipt: &Receipt) -> Result<PaymentForm, AppError> {
    let paycomet = &config.paycomet;
    if paycomet.client_code.is_empty() || paycomet.terminal.is_empty() || paycomet.password.is_empty()
    {
        return Err(AppError::new(ErrorCode::PaymentNotConfigured));
    }
    if receipt.paid {
        return Err(AppError::new(ErrorCode::ReceiptAlreadyPaid));
    }

    let order = receipt.id.to_string();
    let amount = money::to_cents(receipt.total)?;
    let field = |name, value: String| FormField { name, value };

    Ok(PaymentForm {
        action: paycomet.url.clone(),
        fields: vec![
            field("MERCHANT_MERCHANTCODE", paycomet.client_code.clone()),
            field("MERCHANT_TERMINAL", paycomet.terminal.clone()),
            field("MERCHANT_ORDER", order.clone()),
            field("MERCHANT_AMOUNT", amount.to_string()),
            field("MERCHANT_CURRENCY", paycomet.currency.clone()),
            field("MERCHANT_SIGNATURE", signature(paycomet, &order, amount)),
            field("URLOK", config.absolute_url(SUCCESS_PATH)),
            field("URLKO", config.absolute_url(FAILURE_PATH)),
            field("LANGUAGE", paycomet.language.clone()),
        ],
    })
}

/// Build the form and record the order string as the receipt's payment reference
pub async fn payment_form(
    pool: &PgPool,
    config: &Config,
    receipt: &Receipt,
) -> ServiceResult<PaymentForm> {
    let form = build_form(config, receipt)?;
    let order = form.field("MERCHANT_ORDER").unwrap_or_default();
    receipts::set_payment_reference(pool, receipt.id, receipt.user_id, order, &form.action).await?;
    tracing::info!(receipt_id = receipt.id, amount = ?form.field("MERCHANT_AMOUNT"), "Payment form issued");
    Ok(form)
}

pub async fn payment_succeeded(pool: &PgPool, receipt_id: i64, user_id: i64) -> ServiceResult<bool> {
    receipts::mark_paid(pool, receipt_id, user_id).await
}

pub async fn payment_failed(pool: &PgPool, receipt_id: i64, user_id: i64) -> ServiceResult<bool> {
    receipts::mark_failed(pool, receipt_id, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::models::PaymentStatus;
    use std::str::FromStr;

    fn config() -> Config {
        let mut config = Config::local("postgres://localhost/gastro");
        config.paycomet.client_code = "CC01".to_string();
        config.paycomet.terminal = "1234".to_string();
        config.paycomet.password = "secret".to_string();
        config.public_base_url = "https://shop.example.com".to_string();
        config
    }

    fn receipt(total: &str) -> Receipt {
        Receipt {
            id: 42,
            user_id: 7,
            username: "ana".to_string(),
            company_id: None,
            company_name: None,
            total: Decimal::from_str(total).unwrap(),
            purchased_at: Utc::now(),
            paid: false,
            paid_at: None,
            payment_reference: None,
            payment_method: None,
            payment_status: PaymentStatus::Pendiente,
            iframe_url: None,
        }
    }

    #[test]
    fn test_signature_matches_manual_digest() {
        let config = config();
        let expected = hex::encode_upper(Sha512::digest(b"CC01123442995EURsecret"));
        assert_eq!(signature(&config.paycomet, "42", 995), expected);
        assert_eq!(expected.len(), 128);
        assert!(expected.chars().all(|c| !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_form_fields() {
        let form = build_form(&config(), &receipt("9.95")).unwrap();
        assert_eq!(form.action, config().paycomet.url);
        assert_eq!(form.field("MERCHANT_ORDER"), Some("42"));
        assert_eq!(form.field("MERCHANT_AMOUNT"), Some("995"));
        assert_eq!(form.field("MERCHANT_CURRENCY"), Some("EUR"));
        assert_eq!(form.field("LANGUAGE"), Some("ES"));
        assert_eq!(
            form.field("URLOK"),
            Some("https://shop.example.com/payment/success")
        );
        assert_eq!(
            form.field("URLKO"),
            Some("https://shop.example.com/payment/failure")
        );
        assert_eq!(form.fields.len(), 9);
    }

    #[test]
    fn test_amount_truncates_to_cents() {
        let form = build_form(&config(), &receipt("12.349")).unwrap();
        assert_eq!(form.field("MERCHANT_AMOUNT"), Some("1234"));
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = config();
        config.paycomet.password.clear();
        let err = build_form(&config, &receipt("5.00")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotConfigured);
    }

    #[test]
    fn test_paid_receipt_rejected() {
        let mut paid = receipt("5.00");
        paid.paid = true;
        let err = build_form(&config(), &paid).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReceiptAlreadyPaid);
    }
}
