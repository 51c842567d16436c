//! Password login and OAuth helpers.
//!
//! Everything here is deliberately weak: credentials are logged, tokens are
//! kept in `localStorage`, the OAuth `state` is low entropy and never
//! compared on return, and fragment tokens are trusted as-is.

use url::Url;
use validator::Validate;

use crate::client::{ApiClient, LoginRequest, LoginResponse};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::storage::{KeyValueStore, Session};

/// Demo pair filled in by "Use demo credentials".
pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "admin123";

pub const OAUTH_FAILED: &str = "OAuth authentication failed";
pub const LOGIN_FAILED: &str = "Login failed";

/// Login form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct Credentials {
    #[validate(length(min = 3))]
    pub username: String,
    #[validate(length(min = 4))]
    pub password: String,
}

impl Credentials {
    pub fn demo() -> Self {
        Self {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }

    /// Gate for the login button.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Submit credentials and persist the returned token.
pub async fn login<S: KeyValueStore>(
    client: &ApiClient,
    session: &Session<S>,
    credentials: &Credentials,
    remember_me: bool,
) -> Result<LoginResponse, AppError> {
    // Intentionally logs the password.
    tracing::debug!(
        username = %credentials.username,
        password = %credentials.password,
        "login attempt"
    );
    credentials.validate()?;

    let body = LoginRequest {
        username: credentials.username.clone(),
        password: credentials.password.clone(),
        remember_me,
    };
    let tokens = client.login(&body).await.map_err(|err| {
        tracing::error!(error = %err, "login error details");
        err
    })?;

    session.store_login(&tokens.access_token, &tokens.token_type, &credentials.username)?;
    tracing::info!(username = %credentials.username, "login succeeded");
    Ok(tokens)
}

/// What the OAuth page found in its URL on mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub code: Option<String>,
    pub state: Option<String>,
    /// `token` query parameter. Read and logged, otherwise unused.
    pub query_token: Option<String>,
    pub return_url: Option<String>,
    /// `access_token` from the fragment.
    pub fragment_token: Option<String>,
}

impl OAuthRedirect {
    pub fn from_url(url: &Url) -> Self {
        let mut redirect = Self::default();
        for (key, value) in url.query_pairs() {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "code" => redirect.code = value,
                "state" => redirect.state = value,
                "token" => redirect.query_token = value,
                "return_url" => redirect.return_url = value,
                _ => {}
            }
        }
        if let Some(fragment) = url.fragment() {
            redirect.fragment_token = url::form_urlencoded::parse(fragment.as_bytes())
                .find(|(key, _)| key == "access_token")
                .map(|(_, value)| value.into_owned())
                .filter(|token| !token.is_empty());
        }
        redirect.code = redirect.code.filter(|code| !code.is_empty());
        redirect
    }

    /// Where to go after a successful code exchange. Not sanitized.
    pub fn return_target(&self) -> &str {
        self.return_url.as_deref().unwrap_or("/")
    }
}

/// Store a fragment token without any check or network call.
///
/// Returns true if a token was stored.
pub fn accept_fragment_token<S: KeyValueStore>(
    session: &Session<S>,
    redirect: &OAuthRedirect,
) -> Result<bool, AppError> {
    let Some(token) = &redirect.fragment_token else {
        return Ok(false);
    };
    session.set_oauth_token(token)?;
    // Intentionally logs the token.
    tracing::debug!(token = %token, "OAuth token received");
    Ok(true)
}

/// Exchange an authorization code and persist the access token.
///
/// The returned `state` is not compared with the stored one.
pub async fn exchange_code<S: KeyValueStore>(
    client: &ApiClient,
    session: &Session<S>,
    code: &str,
    state: Option<&str>,
) -> Result<String, AppError> {
    tracing::debug!(state = ?state, "OAuth callback with state");
    let response = client.oauth_callback(code, state).await.map_err(|err| {
        tracing::error!(error = %err, "OAuth error");
        err
    })?;
    session.set_oauth_token(&response.access_token)?;
    Ok(response.access_token)
}

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Continue with Google",
            Self::GitHub => "Continue with GitHub",
        }
    }

    const fn authorize_endpoint(self) -> &'static str {
        match self {
            Self::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            Self::GitHub => "https://github.com/login/oauth/authorize",
        }
    }

    fn client_id(self, config: &AppConfig) -> &str {
        match self {
            Self::Google => &config.google_client_id,
            Self::GitHub => &config.github_client_id,
        }
    }

    /// Full authorization URL for a browser redirect.
    pub fn authorize_url(
        self,
        config: &AppConfig,
        redirect_uri: &str,
        state: &str,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(self.authorize_endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", self.client_id(config));
            query.append_pair("redirect_uri", redirect_uri);
            match self {
                Self::Google => {
                    query.append_pair("response_type", "code");
                    query.append_pair("scope", "email profile");
                    query.append_pair("state", state);
                    // Intentionally requests a refresh token.
                    query.append_pair("access_type", "offline");
                }
                Self::GitHub => {
                    query.append_pair("scope", "user:email");
                    query.append_pair("state", state);
                }
            }
        }
        Ok(url)
    }
}

/// Redirect URI registered with both providers.
pub fn redirect_uri(origin: &str) -> String {
    format!("{}/oauth/callback", origin.trim_end_matches('/'))
}

/// Low-entropy state: base-36 digits of a float in `[0, 1)` with the
/// leading five dropped, leaving six characters.
pub fn weak_state(random: f64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut fraction = random.clamp(0.0, 1.0 - f64::EPSILON);
    let mut out = String::with_capacity(11);
    for _ in 0..11 {
        fraction *= 36.0;
        let digit = fraction.floor();
        fraction -= digit;
        // digit is in 0..36 by construction
        out.push(char::from(DIGITS[(digit as usize).min(35)]));
    }
    out.split_off(5)
}

/// Generate, persist and return a new state value.
pub fn begin_authorization<S: KeyValueStore>(
    session: &Session<S>,
    random: f64,
) -> Result<String, AppError> {
    let state = weak_state(random);
    session.set_oauth_state(&state)?;
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, OAUTH_STATE, OAUTH_TOKEN};

    fn parse(url: &str) -> OAuthRedirect {
        OAuthRedirect::from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn login_gate_requires_lengths() {
        let gate = |u: &str, p: &str| {
            Credentials {
                username: u.into(),
                password: p.into(),
            }
            .is_complete()
        };
        assert!(gate("bob", "pass"));
        assert!(!gate("bo", "pass"));
        assert!(!gate("bob", "pas"));
        assert!(!gate("", ""));
        assert!(!gate("", "password"));
        assert!(Credentials::demo().is_complete());
    }

    #[test]
    fn fragment_token_is_stored_verbatim() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let redirect = parse("http://localhost:3000/oauth#access_token=abc&token_type=bearer");

        assert_eq!(redirect.fragment_token.as_deref(), Some("abc"));
        assert!(redirect.code.is_none());
        assert!(accept_fragment_token(&session, &redirect).unwrap());
        assert_eq!(store.get(OAUTH_TOKEN).as_deref(), Some("abc"));
    }

    #[test]
    fn no_fragment_means_nothing_stored() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let redirect = parse("http://localhost:3000/oauth#section");
        assert!(!accept_fragment_token(&session, &redirect).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn query_parameters_are_collected() {
        let redirect = parse(
            "http://localhost:3000/oauth/callback?code=xyz&state=s1&token=t&return_url=%2Fcheckout",
        );
        assert_eq!(redirect.code.as_deref(), Some("xyz"));
        assert_eq!(redirect.state.as_deref(), Some("s1"));
        assert_eq!(redirect.query_token.as_deref(), Some("t"));
        assert_eq!(redirect.return_target(), "/checkout");
        assert!(redirect.fragment_token.is_none());
    }

    #[test]
    fn return_target_defaults_to_root() {
        assert_eq!(parse("http://localhost/oauth?code=1").return_target(), "/");
    }

    #[test]
    fn empty_code_is_ignored() {
        assert!(parse("http://localhost/oauth?code=").code.is_none());
    }

    #[test]
    fn google_authorize_url() {
        let config = AppConfig::default();
        let url = Provider::Google
            .authorize_url(&config, &redirect_uri("http://localhost:3000"), "st8")
            .unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| pairs.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("client_id"), Some(config.google_client_id.as_str()));
        assert_eq!(get("redirect_uri"), Some("http://localhost:3000/oauth/callback"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("scope"), Some("email profile"));
        assert_eq!(get("state"), Some("st8"));
        assert_eq!(get("access_type"), Some("offline"));
    }

    #[test]
    fn github_authorize_url() {
        let config = AppConfig::default();
        let url = Provider::GitHub
            .authorize_url(&config, "http://app/oauth/callback", "st8")
            .unwrap();
        assert!(url.as_str().starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.as_str().contains("client_id=Iv1.abc123def456"));
        assert!(url.as_str().contains("scope=user%3Aemail"));
        assert!(!url.as_str().contains("access_type"));
    }

    #[test]
    fn weak_state_is_short_base36() {
        let state = weak_state(0.123_456_789);
        assert_eq!(state.len(), 6);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(weak_state(0.123_456_789), state);
        assert_ne!(weak_state(0.987_654_321), state);
    }

    #[test]
    fn state_is_persisted() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let state = begin_authorization(&session, 0.5).unwrap();
        assert_eq!(store.get(OAUTH_STATE), Some(state));
    }
}
