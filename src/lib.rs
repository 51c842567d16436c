//! SmartPayments demo: a Yew single-page app with login, OAuth, checkout
//! and payment forms, built as a target for security scanners.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod interop;
pub mod logging;
pub mod payment;
pub mod route;
pub mod storage;

pub use components::*;
pub use error::AppError;
