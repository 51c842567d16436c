use yew::prelude::*;

use super::{
    AppContext, CheckoutPage, Footer, Header, HomePage, LoginForm, NotFound, OAuthButtons,
    PaymentPage,
};
use crate::config::AppConfig;
use crate::interop::current_path;
use crate::route::Route;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    #[prop_or_default]
    pub config: AppConfig,
}

/// Root component: provides [`AppContext`] and renders the page for the
/// current path between the header and footer.
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let context = use_memo(props.config.clone(), |config| AppContext::new(config.clone()));
    let route = use_state(|| Route::recognize(&current_path()));

    let page = match *route {
        Route::Home => html! { <HomePage /> },
        Route::Login => html! { <LoginForm /> },
        Route::OAuth => html! { <OAuthButtons /> },
        Route::Payment => html! { <PaymentPage /> },
        Route::Checkout => html! { <CheckoutPage /> },
        Route::NotFound => html! { <NotFound /> },
    };

    html! {
        <ContextProvider<AppContext> context={(*context).clone()}>
            <div class="app">
                <Header />
                <main class="main-content">{ page }</main>
                <Footer />
            </div>
        </ContextProvider<AppContext>>
    }
}
