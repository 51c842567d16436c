use std::rc::Rc;

use web_sys::HtmlInputElement;
use yew::functional::hook;
use yew::prelude::*;

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::storage::{BrowserSession, BrowserStorage, Session};

mod app;
mod checkout_page;
mod layout;
mod login;
mod oauth;
mod payment_form;

pub use app::{App, AppProps};
pub use checkout_page::CheckoutPage;
pub use layout::{Footer, Header, HomePage, LoadingSpinner, NotFound, SpinnerSize};
pub use login::LoginForm;
pub use oauth::OAuthButtons;
pub use payment_form::{PaymentForm, PaymentPage};

/// Shared services handed to every page through a context provider.
#[derive(Clone, PartialEq, Debug)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub client: ApiClient,
    pub session: BrowserSession,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: ApiClient::new(&config),
            config: Rc::new(config),
            session: Session::new(BrowserStorage),
        }
    }
}

/// The app context, or a default one if a component is mounted on its own.
#[hook]
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().unwrap_or_else(|| AppContext::new(AppConfig::default()))
}

/// A simple, styled button.
#[derive(Properties, PartialEq)]
pub struct ButtonProps {
    /// Button label text
    pub label: AttrValue,
    /// Click handler
    pub onclick: Callback<MouseEvent>,
    /// Disable state
    #[prop_or_default]
    pub disabled: bool,
    /// Extra classes, e.g. `btn-primary`
    #[prop_or(AttrValue::Static("btn btn-primary"))]
    pub class: AttrValue,
}

#[function_component(Button)]
pub fn button(props: &ButtonProps) -> Html {
    html! {
        <button
            type="button"
            onclick={props.onclick.clone()}
            disabled={props.disabled}
            class={props.class.clone()}
        >
            { props.label.as_str() }
        </button>
    }
}

/// A labelled, controlled text input.
#[derive(Properties, PartialEq)]
pub struct TextInputProps {
    pub id: AttrValue,
    #[prop_or_default]
    pub label: Option<AttrValue>,
    /// Current value
    pub value: AttrValue,
    /// Emits new value on each keystroke
    pub oninput: Callback<String>,
    #[prop_or_default]
    pub placeholder: AttrValue,
    /// `text`, `password`, `number`...
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub max_length: Option<u32>,
    #[prop_or_default]
    pub autocomplete: Option<AttrValue>,
}

#[function_component(TextInput)]
pub fn text_input(props: &TextInputProps) -> Html {
    let oninput = props.oninput.clone();
    html! {
        <div class="form-group">
            if let Some(label) = &props.label {
                <label class="label" for={props.id.clone()}>{ label.as_str() }</label>
            }
            <input
                type={props.input_type.clone()}
                id={props.id.clone()}
                class="input"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                maxlength={props.max_length.map(|n| n.to_string())}
                autocomplete={props.autocomplete.clone()}
                oninput={Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    oninput.emit(input.value());
                })}
            />
        </div>
    }
}

/// Inline error box, rendered only when there is a message.
#[derive(Properties, PartialEq)]
pub struct ErrorMessageProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(ErrorMessage)]
pub fn error_message(props: &ErrorMessageProps) -> Html {
    match &props.message {
        Some(msg) => html! { <div class="error-message">{ msg }</div> },
        None => Html::default(),
    }
}
