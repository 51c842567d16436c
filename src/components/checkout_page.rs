use chrono::Utc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{use_app_context, Button, ErrorMessage, PaymentForm};
use crate::catalog::{self, format_usd};
use crate::checkout::{finish_order, CheckoutAction, CheckoutFlow, CheckoutStep};
use crate::client::ChargeResponse;
use crate::error::AppError;
use crate::interop::{navigate, use_page_url};
use crate::route::Route;

/// Four-step checkout wizard.
#[function_component(CheckoutPage)]
pub fn checkout_page() -> Html {
    let ctx = use_app_context();
    let url = use_page_url();
    let flow = use_reducer(move || {
        CheckoutFlow::from_query(url.as_ref().and_then(|u| u.query()).unwrap_or_default())
    });

    let dispatch = |action: fn() -> CheckoutAction| {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(action()))
    };

    let progress = html! {
        <div class="checkout-progress">
            { for CheckoutStep::ALL.iter().map(|step| html! {
                <span class={classes!((*step == flow.step).then_some("active"))}>
                    { step.label() }
                </span>
            }) }
        </div>
    };

    let body = match flow.step {
        CheckoutStep::Select => {
            let cards = catalog::products().into_iter().map(|product| {
                let selected = flow.selected.as_ref().is_some_and(|p| p.id == product.id);
                let onclick = {
                    let flow = flow.clone();
                    let product = product.clone();
                    Callback::from(move |_: MouseEvent| {
                        // Intentionally logs the selection with its price.
                        tracing::debug!(?product, "product selected");
                        flow.dispatch(CheckoutAction::SelectProduct(product.clone()));
                    })
                };
                html! {
                    <div key={product.id} class={classes!("product-card", selected.then_some("selected"))} {onclick}>
                        <h3>{ &product.name }</h3>
                        <p class="price">{ format_usd(product.price) }</p>
                        <p class="description">{ &product.description }</p>
                    </div>
                }
            });
            html! {
                <div class="checkout-step">
                    <h2>{ "Select a Product" }</h2>
                    <div class="product-grid">{ for cards }</div>
                    if flow.selected.is_some() {
                        <Button label="Continue to Review"
                            onclick={dispatch(|| CheckoutAction::ContinueToReview)} />
                    }
                </div>
            }
        }
        CheckoutStep::Review => render_review(&flow, &ctx, dispatch),
        CheckoutStep::Payment => {
            let on_complete = {
                let flow = flow.clone();
                let ctx = ctx.clone();
                Callback::from(move |outcome: Result<ChargeResponse, AppError>| match outcome {
                    Ok(response) => {
                        let Some(order) = flow.order.clone() else {
                            tracing::warn!("payment finished without a pending order");
                            return;
                        };
                        match finish_order(&ctx.session, order, &response) {
                            Ok(completed) => flow.dispatch(CheckoutAction::PaymentSucceeded(completed)),
                            Err(err) => {
                                tracing::error!(error = %err, "could not store last order");
                                flow.dispatch(CheckoutAction::PaymentFailed);
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = ?err, "payment error");
                        flow.dispatch(CheckoutAction::PaymentFailed);
                    }
                })
            };
            html! {
                <div class="checkout-step">
                    <h2>{ "Payment" }</h2>
                    <ErrorMessage message={flow.error.clone()} />
                    <PaymentForm amount={flow.calculate_total()} {on_complete} show_receipt={false} />
                    <Button label="Back to Review" class="btn btn-secondary back-btn"
                        onclick={dispatch(|| CheckoutAction::BackToReview)} />
                </div>
            }
        }
        CheckoutStep::Complete => {
            let payment_id = flow
                .completed
                .as_ref()
                .and_then(|c| c.payment_id.clone())
                .unwrap_or_else(|| "N/A".to_string());
            let go_home = Callback::from(|_: MouseEvent| navigate(Route::Home.path()));
            html! {
                <div class="checkout-step complete-step">
                    <div class="success-icon">{ "✓" }</div>
                    <h2>{ "Order Complete!" }</h2>
                    <p>{ "Thank you for your purchase." }</p>
                    <p>{ format!("Order ID: {payment_id}") }</p>
                    <Button label="Return to Home" onclick={go_home} />
                </div>
            }
        }
    };

    html! {
        <div class="checkout-container">
            { progress }
            { body }
        </div>
    }
}

fn render_review(
    flow: &UseReducerHandle<CheckoutFlow>,
    ctx: &super::AppContext,
    dispatch: impl Fn(fn() -> CheckoutAction) -> Callback<MouseEvent>,
) -> Html {
    let Some(product) = flow.selected.clone() else {
        return Html::default();
    };

    let on_quantity = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.dispatch(CheckoutAction::SetQuantity(input.value()));
        })
    };
    let on_promo = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.dispatch(CheckoutAction::SetPromoCode(input.value()));
        })
    };
    let on_proceed = {
        let flow = flow.clone();
        let session = ctx.session.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(order) = flow.draft_order(Utc::now()) else {
                return;
            };
            // Intentionally logs the full order.
            tracing::debug!(?order, "order created");
            if let Err(err) = session.set_pending_order(&order) {
                tracing::error!(error = %err, "could not store pending order");
            }
            flow.dispatch(CheckoutAction::ProceedToPayment(order));
        })
    };

    html! {
        <div class="checkout-step">
            <h2>{ "Review Your Order" }</h2>

            <div class="order-summary">
                <div class="order-item">
                    <span>{ &product.name }</span>
                    <span>{ format_usd(product.price) }</span>
                </div>

                <div class="quantity-control">
                    <label>{ "Quantity:" }</label>
                    <input type="number" min="1" max="100"
                        value={flow.quantity.to_string()} oninput={on_quantity} />
                </div>

                <div class="promo-section">
                    <input type="text" class="input" placeholder="Promo code"
                        value={flow.promo_code.clone()} oninput={on_promo} />
                    <Button label="Apply" class="btn btn-secondary"
                        onclick={dispatch(|| CheckoutAction::ApplyPromoCode)} />
                </div>

                if flow.discount > 0 {
                    <div class="discount-row">
                        <span>{ format!("Discount ({}%)", flow.discount) }</span>
                        <span>{ format!("-{}", format_usd(flow.discount_amount())) }</span>
                    </div>
                }

                <div class="total-row">
                    <span>{ "Total" }</span>
                    <span>{ format_usd(flow.calculate_total()) }</span>
                </div>
            </div>

            <ErrorMessage message={flow.error.clone()} />

            <div class="button-row">
                <Button label="Back" class="btn btn-secondary"
                    onclick={dispatch(|| CheckoutAction::BackToSelect)} />
                <Button label="Proceed to Payment" onclick={on_proceed} />
            </div>
        </div>
    }
}
