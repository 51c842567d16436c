//! interop.rs
//!
//! Thin wrappers over `window.location`, `Math.random` and `alert`, plus the
//! `use_page_url()` hook.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use crate::interop::use_page_url;
//!
//! #[function_component(Page)]
//! fn page() -> Html {
//!     let url = use_page_url();
//!     html! { <p>{ url.map(|u| u.path().to_string()).unwrap_or_default() }</p> }
//! }
//! ```

use url::Url;
use yew::functional::hook;
use yew::prelude::*;

/// Parsed `location.href`, or `None` outside a browser.
pub fn current_url() -> Option<Url> {
    let href = gloo_utils::window().location().href().ok()?;
    Url::parse(&href).ok()
}

/// `location.pathname`.
pub fn current_path() -> String {
    gloo_utils::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string())
}

/// `location.origin`.
pub fn origin() -> String {
    gloo_utils::window().location().origin().unwrap_or_default()
}

/// Full page navigation (no history API).
pub fn navigate(href: &str) {
    if let Err(err) = gloo_utils::window().location().set_href(href) {
        tracing::error!(href, error = ?err, "navigation failed");
    }
}

/// `Math.random()`.
pub fn random() -> f64 {
    web_sys::js_sys::Math::random()
}

/// Blocking `window.alert`.
pub fn alert(message: &str) {
    if let Err(err) = gloo_utils::window().alert_with_message(message) {
        tracing::warn!(error = ?err, "alert failed");
    }
}

/// Custom hook: the page URL as it was when the component mounted.
///
/// The app never changes the URL without a full reload, so the value is
/// read once and kept for the component's lifetime.
#[hook]
pub fn use_page_url() -> Option<Url> {
    let url = use_state(current_url);
    (*url).clone()
}
