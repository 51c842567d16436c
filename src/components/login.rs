use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{use_app_context, ErrorMessage, TextInput};
use crate::auth::{self, Credentials, LOGIN_FAILED};
use crate::interop::navigate;
use crate::route::Route;

/// Username/password login.
///
/// On success the token lands in `localStorage` and the browser does a full
/// reload of `/`. Failed attempts show the server's own error text.
#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let ctx = use_app_context();
    let credentials = use_state(Credentials::default);
    let remember_me = use_state(|| false);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let attempts = use_state(|| 0_u32);

    let on_username = {
        let credentials = credentials.clone();
        Callback::from(move |username: String| {
            credentials.set(Credentials {
                username,
                ..(*credentials).clone()
            });
        })
    };

    let on_password = {
        let credentials = credentials.clone();
        Callback::from(move |password: String| {
            credentials.set(Credentials {
                password,
                ..(*credentials).clone()
            });
        })
    };

    let on_remember = {
        let remember_me = remember_me.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            remember_me.set(input.checked());
        })
    };

    let on_demo = {
        let credentials = credentials.clone();
        Callback::from(move |_: MouseEvent| credentials.set(Credentials::demo()))
    };

    let onsubmit = {
        let ctx = ctx.clone();
        let credentials = credentials.clone();
        let remember_me = remember_me.clone();
        let loading = loading.clone();
        let error = error.clone();
        let attempts = attempts.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            loading.set(true);
            error.set(None);
            attempts.set(*attempts + 1);

            let ctx = ctx.clone();
            let credentials = (*credentials).clone();
            let remember_me = *remember_me;
            let loading = loading.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match auth::login(&ctx.client, &ctx.session, &credentials, remember_me).await {
                    Ok(_) => navigate(Route::Home.path()),
                    Err(err) => error.set(Some(err.user_message(LOGIN_FAILED))),
                }
                loading.set(false);
            });
        })
    };

    let can_submit = !*loading && credentials.is_complete();

    html! {
        <div class="login-container">
            <div class="login-card">
                <h2>{ "Login" }</h2>

                <ErrorMessage message={(*error).clone()} />

                <form {onsubmit}>
                    <TextInput
                        id="username"
                        label="Username"
                        value={credentials.username.clone()}
                        oninput={on_username}
                        placeholder="Enter username"
                        autocomplete="username"
                    />
                    <TextInput
                        id="password"
                        label="Password"
                        input_type="password"
                        value={credentials.password.clone()}
                        oninput={on_password}
                        placeholder="Enter password"
                        autocomplete="current-password"
                    />

                    <div class="form-group checkbox-group">
                        <input
                            type="checkbox"
                            id="rememberMe"
                            checked={*remember_me}
                            onchange={on_remember}
                        />
                        <label for="rememberMe">{ "Remember me" }</label>
                    </div>

                    <button type="submit" class="btn btn-primary btn-block" disabled={!can_submit}>
                        { if *loading { "Logging in..." } else { "Login" } }
                    </button>
                </form>

                <button type="button" class="btn-link" onclick={on_demo}>
                    { "Use demo credentials" }
                </button>

                <div class="login-footer">
                    <a href="/forgot-password">{ "Forgot password?" }</a>
                    <a href="/register">{ "Create account" }</a>
                </div>

                if *attempts > 0 {
                    <p class="attempts-info">{ format!("Login attempts: {}", *attempts) }</p>
                }
            </div>
        </div>
    }
}
