//! Card payment form.
//!
//! The form collects raw card fields, gates submission on the payment
//! validation schema, awaits [`submit_charge`] and hands the outcome to its
//! parent as a single `Result`.
//!
//! # Example
//!
//! ```rust,ignore
//! let on_complete = Callback::from(|outcome: Result<ChargeResponse, AppError>| {
//!     match outcome {
//!         Ok(resp) => tracing::info!(payment_id = ?resp.payment_id, "paid"),
//!         Err(err) => tracing::error!(error = %err, "payment failed"),
//!     }
//! });
//!
//! html! { <PaymentForm amount={total} {on_complete} /> }
//! ```

use rust_decimal::Decimal;
use yew::prelude::*;

use super::{use_app_context, Button, ErrorMessage, TextInput};
use crate::catalog::format_usd;
use crate::client::ChargeResponse;
use crate::error::AppError;
use crate::interop::{alert, navigate};
use crate::payment::{self, submit_charge, PaymentInstrument, DEFAULT_AMOUNT};
use crate::route::Route;

/// Properties for the [`PaymentForm`] component.
///
/// * `amount` – Amount to charge, in dollars.
/// * `on_complete` – Receives the charge outcome once the request settles.
/// * `show_receipt` – Replace the form with a success card after paying.
#[derive(Properties, PartialEq, Clone)]
pub struct PaymentFormProps {
    #[prop_or(DEFAULT_AMOUNT)]
    pub amount: Decimal,
    #[prop_or_default]
    pub on_complete: Callback<Result<ChargeResponse, AppError>>,
    #[prop_or(true)]
    pub show_receipt: bool,
}

type FieldSetter = fn(&mut PaymentInstrument, String);

#[function_component(PaymentForm)]
pub fn payment_form(props: &PaymentFormProps) -> Html {
    let ctx = use_app_context();
    let card = use_state(PaymentInstrument::default);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| false);

    let field = |setter: FieldSetter| {
        let card = card.clone();
        Callback::from(move |value: String| {
            let mut next = (*card).clone();
            setter(&mut next, value);
            card.set(next);
        })
    };

    let on_card_number = field(|c, v| {
        let number = PaymentInstrument::normalize_card_number(&v);
        // Intentionally logs the card number.
        tracing::debug!(card_number = %number, "card number entered");
        c.card_number = number;
    });
    let on_cvv = field(|c, v| {
        // Intentionally logs the CVV.
        tracing::debug!(cvv = %v, "CVV entered");
        c.cvv = v;
    });
    let on_name = field(|c, v| c.cardholder_name = v);
    let on_month = field(|c, v| c.exp_month = v);
    let on_year = field(|c, v| c.exp_year = v);
    let on_zip = field(|c, v| c.billing_zip = v);

    let onsubmit = {
        let ctx = ctx.clone();
        let card = card.clone();
        let loading = loading.clone();
        let error = error.clone();
        let success = success.clone();
        let amount = props.amount;
        let on_complete = props.on_complete.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            loading.set(true);
            error.set(None);

            let ctx = ctx.clone();
            let card = (*card).clone();
            let loading = loading.clone();
            let error = error.clone();
            let success = success.clone();
            let on_complete = on_complete.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = submit_charge(&ctx.client, &ctx.session, amount, &card).await;
                match &outcome {
                    Ok(_) => success.set(true),
                    Err(err) => error.set(Some(err.user_message("Payment failed"))),
                }
                loading.set(false);
                on_complete.emit(outcome);
            });
        })
    };

    let on_save_card = {
        let ctx = ctx.clone();
        let card = card.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| match payment::save_card(&ctx.session, &card) {
            Ok(_) => alert("Card saved for future purchases"),
            Err(err) => {
                tracing::error!(error = %err, "saving card failed");
                error.set(Some(err.user_message("Could not save card")));
            }
        })
    };

    let amount_label = format_usd(props.amount);

    if *success && props.show_receipt {
        let go_home = Callback::from(|_: MouseEvent| navigate(Route::Home.path()));
        return html! {
            <div class="payment-container">
                <div class="payment-card success-card">
                    <div class="success-icon">{ "✓" }</div>
                    <h2>{ "Payment Successful!" }</h2>
                    <p>{ format!("Your payment of {amount_label} has been processed.") }</p>
                    <Button label="Return to Home" onclick={go_home} />
                </div>
            </div>
        };
    }

    html! {
        <div class="payment-container">
            <div class="payment-card">
                <h2>{ "Payment Details" }</h2>
                <p class="amount-display">{ format!("Amount: {amount_label}") }</p>

                <ErrorMessage message={(*error).clone()} />

                <form {onsubmit}>
                    <TextInput id="cardholderName" label="Cardholder Name"
                        value={card.cardholder_name.clone()} oninput={on_name}
                        placeholder="John Doe" />
                    <TextInput id="cardNumber" label="Card Number"
                        value={card.card_number.clone()} oninput={on_card_number}
                        placeholder="4242 4242 4242 4242" max_length={19} />
                    <div class="form-row">
                        <TextInput id="expMonth" label="Exp Month"
                            value={card.exp_month.clone()} oninput={on_month}
                            placeholder="MM" max_length={2} />
                        <TextInput id="expYear" label="Exp Year"
                            value={card.exp_year.clone()} oninput={on_year}
                            placeholder="YYYY" max_length={4} />
                        <TextInput id="cvv" label="CVV"
                            value={card.cvv.clone()} oninput={on_cvv}
                            placeholder="123" max_length={4} />
                    </div>
                    <TextInput id="billingZip" label="Billing ZIP"
                        value={card.billing_zip.clone()} oninput={on_zip}
                        placeholder="12345" max_length={10} />

                    <button
                        type="submit"
                        class="btn btn-primary btn-block"
                        disabled={*loading || !card.is_complete()}>
                        {
                            if *loading {
                                "Processing...".to_string()
                            } else {
                                format!("Pay {amount_label}")
                            }
                        }
                    </button>
                </form>

                <Button
                    label="Save card for future purchases"
                    class="btn-link"
                    onclick={on_save_card}
                    disabled={!card.is_savable()}
                />

                <div class="security-badges">
                    <span>{ "🔒 Secure Payment" }</span>
                    <span>{ "💳 PCI Compliant" }</span>
                </div>
            </div>
        </div>
    }
}

/// `/payment`: the form on its own with the default amount.
#[function_component(PaymentPage)]
pub fn payment_page() -> Html {
    let on_complete = Callback::from(|outcome: Result<ChargeResponse, AppError>| {
        if let Err(err) = outcome {
            tracing::error!(error = %err, "payment error");
        }
    });
    html! { <PaymentForm {on_complete} /> }
}
