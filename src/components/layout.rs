//! Presentational pieces: header, footer, home hero, spinner.

use chrono::{Datelike, Utc};
use yew::prelude::*;

use super::use_app_context;
use crate::interop::navigate;
use crate::route::Route;

#[function_component(Header)]
pub fn header() -> Html {
    let ctx = use_app_context();
    let authenticated = use_state(|| ctx.session.is_authenticated());

    let on_logout = {
        let session = ctx.session.clone();
        let authenticated = authenticated.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            session.clear();
            authenticated.set(false);
            navigate(Route::Home.path());
        })
    };

    html! {
        <header class="header">
            <div class="header-container">
                <a href={Route::Home.path()} class="logo">{ "Dummy App" }</a>
                <nav class="nav">
                    <a href={Route::Home.path()} class="nav-link">{ "Home" }</a>
                    <a href={Route::Login.path()} class="nav-link">{ "Login" }</a>
                    <a href={Route::Payment.path()} class="nav-link">{ "Payment" }</a>
                    <a href={Route::Checkout.path()} class="nav-link">{ "Checkout" }</a>
                    if *authenticated {
                        <a href="#" class="nav-link" onclick={on_logout}>{ "Logout" }</a>
                    }
                </nav>
            </div>
        </header>
    }
}

#[function_component(Footer)]
pub fn footer() -> Html {
    let year = Utc::now().year();
    html! {
        <footer class="footer">
            <div class="footer-container">
                <p>{ format!("© {year} Dummy App. A test application for R3 Agent E2E testing.") }</p>
                <div class="footer-links">
                    <a href="/privacy">{ "Privacy Policy" }</a>
                    <a href="/terms">{ "Terms of Service" }</a>
                    <a href="/contact">{ "Contact" }</a>
                </div>
            </div>
        </footer>
    }
}

#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <div class="container">
            <div class="hero">
                <h1>{ "SmartPayments Demo" }</h1>
                <p>{ "A test application for R3 Agent E2E testing" }</p>
                <p class="subtitle">{ "Secure payment processing with environment-based configuration" }</p>
                <div class="hero-links">
                    <a href={Route::Login.path()} class="btn btn-primary">{ "Login" }</a>
                    <a href={Route::Payment.path()} class="btn btn-primary">{ "Payment" }</a>
                    <a href={Route::Checkout.path()} class="btn btn-primary">{ "Checkout" }</a>
                </div>
            </div>
        </div>
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="container">
            <h2>{ "Page not found" }</h2>
            <a href={Route::Home.path()} class="btn btn-secondary">{ "Return to Home" }</a>
        </div>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SpinnerSize {
    const fn class(self) -> &'static str {
        match self {
            Self::Small => "spinner spinner-small",
            Self::Medium => "spinner spinner-medium",
            Self::Large => "spinner spinner-large",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingSpinnerProps {
    #[prop_or_default]
    pub size: SpinnerSize,
    #[prop_or(Some(AttrValue::Static("Loading...")))]
    pub message: Option<AttrValue>,
}

#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    html! {
        <div class="spinner-container">
            <div class={props.size.class()}></div>
            if let Some(message) = &props.message {
                <p class="spinner-message">{ message.as_str() }</p>
            }
        </div>
    }
}
