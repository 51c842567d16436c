use yew::prelude::*;

use super::{use_app_context, ErrorMessage, LoadingSpinner};
use crate::auth::{self, OAuthRedirect, Provider, OAUTH_FAILED};
use crate::interop::{self, navigate, use_page_url};
use crate::route::Route;

/// "Sign in with" buttons, plus handling of the provider redirect.
#[function_component(OAuthButtons)]
pub fn oauth_buttons() -> Html {
    let ctx = use_app_context();
    let url = use_page_url();
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);

    // Inspect the URL once on mount.
    {
        let ctx = ctx.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            let redirect = url.as_ref().map(OAuthRedirect::from_url).unwrap_or_default();
            if let Some(token) = &redirect.query_token {
                tracing::debug!(token = %token, "token present in query string");
            }

            if let Some(code) = redirect.code.clone() {
                loading.set(true);
                let ctx = ctx.clone();
                let redirect = redirect.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match auth::exchange_code(
                        &ctx.client,
                        &ctx.session,
                        &code,
                        redirect.state.as_deref(),
                    )
                    .await
                    {
                        Ok(_) => navigate(redirect.return_target()),
                        Err(_) => error.set(Some(OAUTH_FAILED.to_string())),
                    }
                    loading.set(false);
                });
            }

            if let Err(err) = auth::accept_fragment_token(&ctx.session, &redirect) {
                tracing::error!(error = %err, "could not store fragment token");
            }
            || ()
        });
    }

    let start = |provider: Provider| {
        let ctx = ctx.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let redirect_uri = auth::redirect_uri(&interop::origin());
            let url = auth::begin_authorization(&ctx.session, interop::random())
                .and_then(|state| {
                    provider
                        .authorize_url(&ctx.config, &redirect_uri, &state)
                        .map_err(|e| crate::error::AppError::Decode(e.to_string()))
                });
            match url {
                Ok(url) => navigate(url.as_str()),
                Err(err) => {
                    tracing::error!(?provider, error = %err, "could not start OAuth");
                    error.set(Some(OAUTH_FAILED.to_string()));
                }
            }
        })
    };

    if *loading {
        return html! {
            <div class="oauth-container">
                <div class="oauth-card">
                    <LoadingSpinner message={Some(AttrValue::Static("Authenticating..."))} />
                </div>
            </div>
        };
    }

    html! {
        <div class="oauth-container">
            <div class="oauth-card">
                <h2>{ "Sign in with" }</h2>

                <ErrorMessage message={(*error).clone()} />

                <div class="oauth-buttons">
                    <button class="oauth-btn google-btn" onclick={start(Provider::Google)}>
                        { Provider::Google.label() }
                    </button>
                    <button class="oauth-btn github-btn" onclick={start(Provider::GitHub)}>
                        { Provider::GitHub.label() }
                    </button>
                </div>

                <div class="divider"><span>{ "or" }</span></div>

                <a href={Route::Login.path()} class="btn btn-secondary btn-block">
                    { "Sign in with email" }
                </a>
            </div>
        </div>
    }
}
