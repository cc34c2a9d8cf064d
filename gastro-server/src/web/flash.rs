//! One-shot page messages carried in a cookie across a redirect
//!
//! The cookie holds URL-safe base64 of the JSON message, which keeps the value
//! inside the RFC 6265 cookie-octet set whatever the message text is.

use axum::response::Redirect;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

const FLASH_COOKIE_NAME: &str = "_flash";

/// Flash message rendered by `base.html.tera`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashData {
    /// success | warning | error
    pub kind: String,
    pub message: String,
}

impl FlashData {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success".to_owned(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: "warning".to_owned(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error".to_owned(),
            message: message.into(),
        }
    }

    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(value: &str) -> Option<Self> {
        let json = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Read and clear the flash cookie; a tampered value is dropped silently
pub fn take_flash(cookies: &Cookies) -> Option<FlashData> {
    let flash_cookie = cookies.get(FLASH_COOKIE_NAME)?;
    let mut removal = Cookie::from(FLASH_COOKIE_NAME);
    removal.set_path("/");
    cookies.remove(removal);

    FlashData::decode(flash_cookie.value())
}

pub fn set_flash(cookies: &Cookies, data: &FlashData) {
    let Some(value) = data.encode() else {
        return;
    };
    let mut cookie = Cookie::new(FLASH_COOKIE_NAME, value);
    cookie.set_path("/");
    cookies.add(cookie);
}

/// Store `data` and answer with a 303 to `location`
pub fn redirect_with(cookies: &Cookies, location: &str, data: FlashData) -> Redirect {
    set_flash(cookies, &data);
    Redirect::to(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_cookie_octet(b: u8) -> bool {
        matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
    }

    #[test]
    fn test_encoded_value_is_a_valid_cookie_value() {
        let flash = FlashData::warning("Tu carrito está vacío.");
        let value = flash.encode().unwrap();
        assert!(value.bytes().all(is_cookie_octet), "{value}");
        assert_eq!(FlashData::decode(&value), Some(flash));
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(FlashData::decode("not base64!"), None);
        let not_json = URL_SAFE_NO_PAD.encode("plain text");
        assert_eq!(FlashData::decode(&not_json), None);
    }
}
