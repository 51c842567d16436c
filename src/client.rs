//! smartpay_demo/src/client.rs
//!
//! Typed wrappers over the three backend endpoints the app talks to.
//!
//! This module provides:
//! - `LoginRequest` / `LoginResponse` for `POST /api/auth/login`.
//! - `OAuthCallbackResponse` for `GET /api/oauth/callback`.
//! - `ChargeRequest` / `ChargeResponse` for `POST /api/payment/charge`.
//! - `ApiClient`, which sends them with `gloo-net` and maps every failure
//!   into [`AppError`].
//!
//! # Example Usage
//! ```rust,ignore
//! let client = ApiClient::new(&config);
//! wasm_bindgen_futures::spawn_local(async move {
//!     match client.login(&request).await {
//!         Ok(tokens) => tracing::info!(token_type = %tokens.token_type, "logged in"),
//!         Err(err) => tracing::error!(error = %err, "login failed"),
//!     }
//! });
//! ```

use gloo_net::http::{Request, Response};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const OAUTH_CALLBACK_PATH: &str = "/api/oauth/callback";
pub const CHARGE_PATH: &str = "/api/payment/charge";

/// Body of `POST /api/auth/login`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OAuthCallbackResponse {
    pub access_token: String,
}

/// Raw card fields exactly as the backend expects them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PaymentMethod {
    pub card_number: String,
    pub exp_month: u32,
    pub exp_year: i32,
    pub cvv: String,
    pub billing_zip: String,
}

/// Body of `POST /api/payment/charge`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChargeRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub description: String,
}

/// Whatever the charge endpoint returns; only `payment_id` is read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChargeResponse {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Error body shape used by the backend (`{"detail": "..."}`).
#[derive(Deserialize, Debug)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Backend client. Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/auth/login`.
    pub async fn login(&self, body: &LoginRequest) -> Result<LoginResponse, AppError> {
        let response = Request::post(&self.url(LOGIN_PATH)).json(body)?.send().await?;
        decode(response).await
    }

    /// `GET /api/oauth/callback?code=..&state=..`.
    pub async fn oauth_callback(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> Result<OAuthCallbackResponse, AppError> {
        let mut params = vec![("code", code)];
        if let Some(state) = state {
            params.push(("state", state));
        }
        let response = Request::get(&self.url(OAUTH_CALLBACK_PATH))
            .query(params)
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /api/payment/charge`.
    pub async fn charge(&self, body: &ChargeRequest) -> Result<ChargeResponse, AppError> {
        let response = Request::post(&self.url(CHARGE_PATH)).json(body)?.send().await?;
        decode(response).await
    }
}

/// Turn a response into `T`, or into `AppError::Server` carrying the
/// backend's `detail` text.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.ok() {
        return response.json::<T>().await.map_err(AppError::from);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(server_error(status, &body))
}

fn server_error(status: u16, body: &str) -> AppError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });
    AppError::Server { status, detail }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        let err = server_error(401, r#"{"detail":"Invalid username or password"}"#);
        match err {
            AppError::Server { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail.as_deref(), Some("Invalid username or password"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn structured_detail_is_kept_as_json() {
        let err = server_error(422, r#"{"detail":[{"loc":["body","cvv"]}]}"#);
        assert!(matches!(
            err,
            AppError::Server { detail: Some(ref d), .. } if d.contains("cvv")
        ));
    }

    #[test]
    fn non_json_body_has_no_detail() {
        let err = server_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, AppError::Server { status: 502, detail: None }));
    }

    #[test]
    fn charge_request_wire_format() {
        let body = ChargeRequest {
            amount: Decimal::new(9999, 2),
            currency: "usd".into(),
            payment_method: PaymentMethod {
                card_number: "4242424242424242".into(),
                exp_month: 12,
                exp_year: 2030,
                cvv: "123".into(),
                billing_zip: "12345".into(),
            },
            description: "Payment for order".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!((json["amount"].as_f64().unwrap() - 99.99).abs() < 1e-9);
        assert_eq!(json["payment_method"]["exp_month"], 12);
        assert_eq!(json["payment_method"]["cvv"], "123");
    }

    #[test]
    fn charge_response_tolerates_extra_fields() {
        let resp: ChargeResponse =
            serde_json::from_str(r#"{"payment_id":"pay_1","status":"succeeded"}"#).unwrap();
        assert_eq!(resp.payment_id.as_deref(), Some("pay_1"));
        assert_eq!(resp.extra["status"], "succeeded");
    }

    #[test]
    fn login_response_defaults_token_type() {
        let resp: LoginResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(resp.token_type, "bearer");
    }

    #[test]
    fn urls_are_prefixed_with_base() {
        let config = AppConfig {
            api_base_url: "http://localhost:8000".into(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config);
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:8000/api/auth/login");
    }
}
