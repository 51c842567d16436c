use smartpay_demo::config::AppConfig;
use smartpay_demo::{logging, App, AppProps};

// Entry point: configure logging, then mount the app on <body>.
fn main() {
    let (config, config_error) = match AppConfig::from_build_env() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    logging::init(config.log_level);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "using default configuration");
    }
    tracing::info!(api = %config.api_base_url, "starting SmartPayments demo");

    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
