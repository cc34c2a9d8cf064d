//! Client profile form (`/info`)

use axum::extract::{Extension, Form, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::ClientCreate;
use tower_cookies::Cookies;

use super::flash::{FlashData, redirect_with};
use super::{PageResult, base_context, render};
use crate::auth::CurrentUser;
use crate::db::{clients, companies};
use crate::error::ServiceError;
use crate::state::AppState;

const INVALID_VALUES: &str = "Ingrese valores validos";

/// Profile form as posted by the browser; every field arrives as text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: String,
    pub company_id: Option<String>,
    /// Checkbox: present ("on") when ticked
    pub is_private: Option<String>,
    pub private_address: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
}

impl ProfileForm {
    fn into_client(self) -> Result<ClientCreate, AppError> {
        let company_id = match self.company_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::new(ErrorCode::InvalidFormat).with_detail("field", "company_id")
            })?),
        };
        Ok(ClientCreate {
            user_id: None,
            full_name: self.full_name,
            important: None,
            company_id,
            is_private: Some(self.is_private.is_some()),
            private_address: self.private_address,
            phone: self.phone,
            national_id: self.national_id,
            email: self.email,
        })
    }
}

async fn form_page(
    state: &AppState,
    cookies: &Cookies,
    user: &CurrentUser,
    form: Option<&ProfileForm>,
    error: Option<&str>,
) -> PageResult {
    let mut ctx = base_context(cookies, Some(user));
    ctx.insert("companies", &companies::list(&state.pool).await?);
    match form {
        Some(form) => ctx.insert("form", form),
        None => {
            if let Some(client) = clients::find_by_user(&state.pool, user.user_id).await? {
                ctx.insert("client", &client);
            }
        }
    }
    if let Some(error) = error {
        ctx.insert("error", error);
    }
    render(state, "info.html.tera", &ctx)
}

/// GET /info
pub async fn info_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    form_page(&state, &cookies, &user, None, None).await
}

/// POST /info
pub async fn save_info(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<ProfileForm>,
) -> PageResult {
    let data = match form.clone().into_client() {
        Ok(data) => data,
        Err(_) => {
            return form_page(&state, &cookies, &user, Some(&form), Some(INVALID_VALUES)).await;
        }
    };

    match clients::save_profile(&state.pool, user.user_id, &data).await {
        Ok(_) => {
            let flash = FlashData::success("Perfil guardado.");
            Ok(redirect_with(&cookies, "/main", flash).into_response())
        }
        Err(ServiceError::App(err)) if err.is_user_facing() => {
            tracing::debug!(user_id = user.user_id, code = ?err.code, "Profile rejected");
            form_page(&state, &cookies, &user, Some(&form), Some(INVALID_VALUES)).await
        }
        Err(e) => Err(e.into()),
    }
}
