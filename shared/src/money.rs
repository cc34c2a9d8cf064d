//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `NUMERIC(8, 2)` and carried as [`Decimal`] end to
//! end. Rounding follows the half-even rule used by the accounting exports.

use rust_decimal::prelude::*;

use crate::error::{AppError, ErrorCode};

/// Monetary values keep two decimal places
pub const DECIMAL_PLACES: u32 = 2;

/// VAT multiplier applied to dish prices (10%)
pub const VAT_FACTOR: Decimal = Decimal::from_parts(110, 0, 0, false, 2);

/// Maximum allowed dish price (NUMERIC(8, 2))
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: i32 = 9999;

/// Round to two decimals, half to even
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Price without VAT: `price / 1.10` rounded to two decimals
pub fn price_without_vat(price: Decimal) -> Decimal {
    round_money(price / VAT_FACTOR)
}

/// `quantity * unit_price`
#[inline]
pub fn line_subtotal(quantity: i32, unit_price: Decimal) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum of `quantity * unit_price` over `(quantity, unit_price)` pairs; zero when empty
pub fn sum_lines<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (i32, Decimal)>,
{
    lines
        .into_iter()
        .map(|(quantity, price)| line_subtotal(quantity, price))
        .sum()
}

/// Amount in integer cents, truncating any fraction below a cent
pub fn to_cents(amount: Decimal) -> Result<i64, AppError> {
    (amount * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("amount {amount} does not fit in cents"),
            )
        })
}

/// `part / whole * 100`, zero when `whole` is zero
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

/// Validate a dish price
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price must be non-negative, got {price}"),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    if price.scale() > DECIMAL_PLACES && price != round_money(price) {
        return Err(AppError::with_message(
            ErrorCode::DishInvalidPrice,
            format!("price must have at most {DECIMAL_PLACES} decimals, got {price}"),
        ));
    }
    Ok(())
}

/// Validate a cart quantity (1..=MAX_QUANTITY)
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity must be at least 1, got {quantity}"),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_price_without_vat() {
        assert_eq!(price_without_vat(dec("11.00")), dec("10.00"));
        assert_eq!(price_without_vat(dec("10.00")), dec("9.09"));
        assert_eq!(price_without_vat(dec("12.95")), dec("11.77"));
        assert_eq!(price_without_vat(dec("0")), dec("0"));
    }

    #[test]
    fn test_round_money_half_even() {
        assert_eq!(round_money(dec("2.345")), dec("2.34"));
        assert_eq!(round_money(dec("2.355")), dec("2.36"));
        assert_eq!(round_money(dec("2.3451")), dec("2.35"));
    }

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(3, dec("7.50")), dec("22.50"));
        assert_eq!(line_subtotal(1, dec("9.95")), dec("9.95"));
    }

    #[test]
    fn test_sum_lines() {
        let lines = vec![(2, dec("7.50")), (1, dec("12.00")), (3, dec("1.10"))];
        assert_eq!(sum_lines(lines), dec("30.30"));
        assert_eq!(sum_lines(Vec::<(i32, Decimal)>::new()), Decimal::ZERO);
    }

    #[test]
    fn test_to_cents_truncates() {
        assert_eq!(to_cents(dec("30.30")).unwrap(), 3030);
        assert_eq!(to_cents(dec("12.999")).unwrap(), 1299);
        assert_eq!(to_cents(dec("0")).unwrap(), 0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(dec("50"), dec("200")), dec("25"));
        assert_eq!(percent(dec("5"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec("9.95")).is_ok());
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("9.950")).is_ok());

        let err = validate_price(dec("-1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DishInvalidPrice);
        assert!(validate_price(dec("1000000")).is_err());
        assert!(validate_price(dec("1.234")).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());

        let err = validate_quantity(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
