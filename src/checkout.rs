//! Checkout wizard state: select -> review -> payment -> complete.
//!
//! [`CheckoutFlow`] is a plain value driven through [`CheckoutAction`] by
//! Yew's `use_reducer`. Side effects (persisting orders, logging) happen
//! before an action is dispatched, in the page or in [`finish_order`], so the
//! reducer itself stays pure.
//!
//! Pricing trusts the client completely. The `price` query parameter replaces
//! the catalog price and totals are never clamped, so a 100% code on a
//! negative override produces a negative total. Both are deliberate.
//! Arithmetic saturates at `Decimal::MAX`, so an absurd override renders a
//! huge total instead of aborting the app.

use std::rc::Rc;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use yew::functional::Reducible;

use crate::catalog::{self, Product};
use crate::client::ChargeResponse;
use crate::error::AppError;
use crate::storage::{KeyValueStore, Session};

pub const INVALID_PROMO: &str = "Invalid promo code";
pub const PAYMENT_FAILED: &str = "Payment failed. Please try again.";

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutStep {
    #[default]
    Select,
    Review,
    Payment,
    Complete,
}

impl CheckoutStep {
    pub const ALL: [Self; 4] = [Self::Select, Self::Review, Self::Payment, Self::Complete];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "1. Select",
            Self::Review => "2. Review",
            Self::Payment => "3. Payment",
            Self::Complete => "4. Complete",
        }
    }
}

/// Order drafted on the client when the user proceeds to payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub product: Product,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub discount: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Merge a charge result into the order. The response is not checked.
    pub fn complete(self, payment_id: Option<String>) -> CompletedOrder {
        CompletedOrder {
            order: self,
            payment_id,
            status: "completed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub payment_id: Option<String>,
    pub status: String,
}

/// Everything the checkout page renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFlow {
    pub step: CheckoutStep,
    pub selected: Option<Product>,
    pub quantity: u32,
    pub promo_code: String,
    pub discount: u32,
    pub error: Option<String>,
    pub order: Option<Order>,
    pub completed: Option<CompletedOrder>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self {
            step: CheckoutStep::Select,
            selected: None,
            quantity: 1,
            promo_code: String::new(),
            discount: 0,
            error: None,
            order: None,
            completed: None,
        }
    }
}

impl CheckoutFlow {
    /// Initial state from the page query string (without the leading `?`).
    ///
    /// `product=<id>` preselects a plan and skips to review; `price=<n>`
    /// replaces its price without any check.
    pub fn from_query(query: &str) -> Self {
        let mut product_id = None;
        let mut price_override = None;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "product" => product_id = value.trim().parse::<u32>().ok(),
                "price" => price_override = Some(value.into_owned()),
                _ => {}
            }
        }

        let mut flow = Self::default();
        if let Some(mut product) = product_id.and_then(catalog::find_product) {
            if let Some(price) = price_override.as_deref().and_then(parse_price) {
                tracing::debug!(product = product.id, %price, "applying price override from URL");
                product.price = price;
            }
            flow.selected = Some(product);
            flow.step = CheckoutStep::Review;
        }
        flow
    }

    pub fn subtotal(&self) -> Decimal {
        self.selected
            .as_ref()
            .map_or(Decimal::ZERO, |p| p.price.saturating_mul(Decimal::from(self.quantity)))
    }

    pub fn discount_amount(&self) -> Decimal {
        let rate = Decimal::from(self.discount) / Decimal::ONE_HUNDRED;
        self.subtotal().saturating_mul(rate)
    }

    /// Subtotal minus discount. Not floored at zero.
    pub fn calculate_total(&self) -> Decimal {
        self.subtotal().saturating_sub(self.discount_amount())
    }

    /// Build the order that `handle_proceed_to_payment` persists.
    pub fn draft_order(&self, created_at: DateTime<Utc>) -> Option<Order> {
        let product = self.selected.clone()?;
        let promo = &self.promo_code;
        Some(Order {
            product,
            quantity: self.quantity,
            subtotal: self.subtotal(),
            discount: self.discount,
            total: self.calculate_total(),
            promo_code: (!promo.is_empty()).then(|| promo.clone()),
            created_at,
        })
    }
}

/// Merge the charge result into the drafted order and store it as the
/// last order. The response is trusted as-is.
pub fn finish_order<S: KeyValueStore>(
    session: &Session<S>,
    order: Order,
    response: &ChargeResponse,
) -> Result<CompletedOrder, AppError> {
    let completed = order.complete(response.payment_id.clone());
    session.set_last_order(&completed)?;
    tracing::info!(payment_id = ?completed.payment_id, "order completed");
    Ok(completed)
}

/// Parse the longest leading number, ignoring trailing garbage
/// (`"0.01abc"` is `0.01`). Plain and scientific notation are accepted;
/// values outside `Decimal`'s range yield `None`.
fn parse_price(raw: &str) -> Option<Decimal> {
    let number = numeric_prefix(raw.trim_start())?;
    Decimal::from_str(&number)
        .or_else(|_| Decimal::from_scientific(&number))
        .ok()
}

/// `[+-]digits[.digits][e[+-]digits]` at the start of `raw`, normalised
/// to a form `rust_decimal` parses (leading zero added, `+` dropped).
fn numeric_prefix(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let digits_from = |start: usize| {
        let mut end = start;
        while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
        }
        end
    };

    let mut out = String::new();
    let mut pos = 0;
    match bytes.first() {
        Some(b'-') => {
            out.push('-');
            pos = 1;
        }
        Some(b'+') => pos = 1,
        _ => {}
    }

    let int_end = digits_from(pos);
    let int_part = &raw[pos..int_end];
    pos = int_end;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_end = digits_from(pos + 1);
        frac_part = &raw[pos + 1..frac_end];
        if !frac_part.is_empty() {
            pos = frac_end;
        }
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_start = pos + 1;
        let negative = bytes.get(exp_start) == Some(&b'-');
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            out.push('e');
            if negative {
                out.push('-');
            }
            out.push_str(&raw[exp_start..exp_end]);
        }
    }
    Some(out)
}

/// Quantity input: anything unparsable or zero becomes 1.
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q >= 1)
        .unwrap_or(1)
}

/// Reducer messages, one per user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutAction {
    SelectProduct(Product),
    ContinueToReview,
    SetQuantity(String),
    SetPromoCode(String),
    ApplyPromoCode,
    /// Carries the order already persisted by the page.
    ProceedToPayment(Order),
    PaymentSucceeded(CompletedOrder),
    PaymentFailed,
    BackToSelect,
    BackToReview,
}

impl Reducible for CheckoutFlow {
    type Action = CheckoutAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            CheckoutAction::SelectProduct(product) => {
                next.selected = Some(product);
            }
            CheckoutAction::ContinueToReview => {
                if next.step == CheckoutStep::Select && next.selected.is_some() {
                    next.step = CheckoutStep::Review;
                }
            }
            CheckoutAction::SetQuantity(raw) => {
                next.quantity = parse_quantity(&raw);
            }
            CheckoutAction::SetPromoCode(code) => {
                next.promo_code = code;
            }
            CheckoutAction::ApplyPromoCode => match catalog::promo_discount(&next.promo_code) {
                Some(percent) => {
                    tracing::info!(code = %next.promo_code, discount = percent, "promo code applied");
                    next.discount = percent;
                    next.error = None;
                }
                None => {
                    next.error = Some(INVALID_PROMO.to_string());
                }
            },
            CheckoutAction::ProceedToPayment(order) => {
                if next.step == CheckoutStep::Review {
                    next.order = Some(order);
                    next.error = None;
                    next.step = CheckoutStep::Payment;
                }
            }
            CheckoutAction::PaymentSucceeded(completed) => {
                if next.step == CheckoutStep::Payment {
                    next.completed = Some(completed);
                    next.error = None;
                    next.step = CheckoutStep::Complete;
                }
            }
            CheckoutAction::PaymentFailed => {
                next.error = Some(PAYMENT_FAILED.to_string());
            }
            CheckoutAction::BackToSelect => {
                if next.step == CheckoutStep::Review {
                    next.step = CheckoutStep::Select;
                }
            }
            CheckoutAction::BackToReview => {
                if next.step == CheckoutStep::Payment {
                    next.step = CheckoutStep::Review;
                }
            }
        }
        Rc::new(next)
    }
}
