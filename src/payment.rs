//! Card entry, validation and charge submission.
//!
//! Card data is handled raw: no tokenization, no Luhn check, and the full
//! instrument (CVV included) is written to the debug log on submit. The app
//! is a scanner fixture and these are the findings it is meant to produce.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::client::{ApiClient, ChargeRequest, ChargeResponse, PaymentMethod};
use crate::error::AppError;
use crate::storage::{KeyValueStore, Session};

/// Oldest expiry year the form accepts.
pub const MIN_EXP_YEAR: i32 = 2024;

/// Amount charged when the payment page is opened on its own.
pub const DEFAULT_AMOUNT: Decimal = Decimal::from_parts(9999, 0, 0, false, 2);

pub const CURRENCY: &str = "usd";
pub const CHARGE_DESCRIPTION: &str = "Payment for order";

/// Raw card form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    #[validate(length(min = 13))]
    pub card_number: String,
    #[validate(custom = "validate_exp_month")]
    pub exp_month: String,
    #[validate(custom = "validate_exp_year")]
    pub exp_year: String,
    #[validate(length(min = 3, max = 4))]
    pub cvv: String,
    #[validate(length(min = 2))]
    pub cardholder_name: String,
    pub billing_zip: String,
}

fn validate_exp_month(month: &str) -> Result<(), ValidationError> {
    match month.trim().parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(()),
        _ => Err(ValidationError::new("exp_month")),
    }
}

fn validate_exp_year(year: &str) -> Result<(), ValidationError> {
    match year.trim().parse::<i32>() {
        Ok(y) if y >= MIN_EXP_YEAR => Ok(()),
        _ => Err(ValidationError::new("exp_year")),
    }
}

impl PaymentInstrument {
    /// Card number with all whitespace removed, as typed into the field.
    pub fn normalize_card_number(raw: &str) -> String {
        raw.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Gate for the submit button.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Looser gate for "save card": no name or year check.
    pub fn is_savable(&self) -> bool {
        self.card_number.chars().count() >= 13
            && validate_exp_month(&self.exp_month).is_ok()
            && self.cvv.chars().count() >= 3
    }

    /// Validate and convert into the wire payload.
    pub fn to_charge_request(&self, amount: Decimal) -> Result<ChargeRequest, AppError> {
        self.validate()?;
        let exp_month = self.exp_month.trim().parse::<u32>().map_err(|_| {
            AppError::Validation(single_error("exp_month"))
        })?;
        let exp_year = self.exp_year.trim().parse::<i32>().map_err(|_| {
            AppError::Validation(single_error("exp_year"))
        })?;
        Ok(ChargeRequest {
            amount,
            currency: CURRENCY.to_string(),
            payment_method: PaymentMethod {
                card_number: self.card_number.clone(),
                exp_month,
                exp_year,
                cvv: self.cvv.clone(),
                billing_zip: self.billing_zip.clone(),
            },
            description: CHARGE_DESCRIPTION.to_string(),
        })
    }
}

fn single_error(field: &'static str) -> validator::ValidationErrors {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, ValidationError::new(field));
    errors
}

/// Card summary kept for "future purchases". Never holds the CVV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub last4: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cardholder_name: String,
}

impl From<&PaymentInstrument> for SavedCard {
    fn from(card: &PaymentInstrument) -> Self {
        let digits: Vec<char> = card.card_number.chars().collect();
        let last4 = digits[digits.len().saturating_sub(4)..].iter().collect();
        Self {
            last4,
            exp_month: card.exp_month.clone(),
            exp_year: card.exp_year.clone(),
            cardholder_name: card.cardholder_name.clone(),
        }
    }
}

/// Persist the masked card summary.
pub fn save_card<S: KeyValueStore>(
    session: &Session<S>,
    card: &PaymentInstrument,
) -> Result<SavedCard, AppError> {
    let saved = SavedCard::from(card);
    session.set_saved_card(&saved)?;
    tracing::info!(last4 = %saved.last4, "card saved for later");
    Ok(saved)
}

/// Send the charge and record the payment id.
///
/// Returns the backend response so the caller can fold it into an order.
pub async fn submit_charge<S: KeyValueStore>(
    client: &ApiClient,
    session: &Session<S>,
    amount: Decimal,
    card: &PaymentInstrument,
) -> Result<ChargeResponse, AppError> {
    // Intentionally logs the full instrument, CVV included.
    tracing::debug!(
        card_number = %card.card_number,
        exp_month = %card.exp_month,
        exp_year = %card.exp_year,
        cvv = %card.cvv,
        cardholder_name = %card.cardholder_name,
        %amount,
        "payment submission"
    );

    let request = card.to_charge_request(amount)?;
    let response = client.charge(&request).await.map_err(|err| {
        tracing::error!(error = %err, "payment error");
        err
    })?;

    record_charge(session, &response)?;
    Ok(response)
}

/// Remember the payment id of an accepted charge, if the backend sent one.
pub fn record_charge<S: KeyValueStore>(
    session: &Session<S>,
    response: &ChargeResponse,
) -> Result<(), AppError> {
    if let Some(payment_id) = &response.payment_id {
        session.set_last_payment_id(payment_id)?;
    }
    tracing::info!(payment_id = ?response.payment_id, "payment accepted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, LAST_PAYMENT_ID, SAVED_CARD};

    fn valid_card() -> PaymentInstrument {
        PaymentInstrument {
            card_number: "4242424242424242".into(),
            exp_month: "12".into(),
            exp_year: "2030".into(),
            cvv: "123".into(),
            cardholder_name: "John Doe".into(),
            billing_zip: "12345".into(),
        }
    }

    #[test]
    fn valid_card_enables_submit() {
        assert!(valid_card().is_complete());
    }

    #[test]
    fn each_rule_blocks_submit() {
        let cases: Vec<(&str, fn(&mut PaymentInstrument))> = vec![
            ("short card", |c| c.card_number = "424242424242".into()),
            ("empty card", |c| c.card_number.clear()),
            ("month zero", |c| c.exp_month = "0".into()),
            ("month 13", |c| c.exp_month = "13".into()),
            ("month text", |c| c.exp_month = "MM".into()),
            ("expired year", |c| c.exp_year = "2023".into()),
            ("empty year", |c| c.exp_year.clear()),
            ("short cvv", |c| c.cvv = "12".into()),
            ("long cvv", |c| c.cvv = "12345".into()),
            ("short name", |c| c.cardholder_name = "J".into()),
        ];
        for (name, mutate) in cases {
            let mut card = valid_card();
            mutate(&mut card);
            assert!(!card.is_complete(), "{name} should fail validation");
        }
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut card = valid_card();
        card.card_number = "4242424242424".into();
        card.exp_month = "1".into();
        card.exp_year = MIN_EXP_YEAR.to_string();
        card.cvv = "1234".into();
        card.cardholder_name = "Jo".into();
        assert!(card.is_complete());
    }

    #[test]
    fn billing_zip_is_not_checked() {
        let mut card = valid_card();
        card.billing_zip.clear();
        assert!(card.is_complete());
    }

    #[test]
    fn card_number_whitespace_is_stripped() {
        assert_eq!(
            PaymentInstrument::normalize_card_number("4242 4242\t4242 4242"),
            "4242424242424242"
        );
    }

    #[test]
    fn savable_ignores_name_and_year() {
        let mut card = valid_card();
        card.cardholder_name.clear();
        card.exp_year = "1999".into();
        assert!(card.is_savable());
        card.cvv = "1".into();
        assert!(!card.is_savable());
    }

    #[test]
    fn charge_request_parses_expiry() {
        let request = valid_card().to_charge_request(DEFAULT_AMOUNT).unwrap();
        assert_eq!(request.amount, Decimal::new(9999, 2));
        assert_eq!(request.currency, "usd");
        assert_eq!(request.payment_method.exp_month, 12);
        assert_eq!(request.payment_method.exp_year, 2030);
        assert_eq!(request.payment_method.card_number, "4242424242424242");
        assert_eq!(request.description, CHARGE_DESCRIPTION);
    }

    #[test]
    fn invalid_card_does_not_build_request() {
        let mut card = valid_card();
        card.cvv.clear();
        let err = card.to_charge_request(DEFAULT_AMOUNT).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn saved_card_keeps_last_four_and_no_cvv() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let saved = save_card(&session, &valid_card()).unwrap();

        assert_eq!(saved.last4, "4242");
        let raw = store.get(SAVED_CARD).unwrap();
        assert!(!raw.contains("123\""), "cvv leaked: {raw}");
        assert!(!raw.contains("4242424242424242"));
        assert!(!raw.to_lowercase().contains("cvv"));
        assert_eq!(session.saved_card(), Some(saved));
    }

    #[test]
    fn accepted_charge_records_payment_id() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let response: ChargeResponse =
            serde_json::from_str(r#"{"payment_id":"pay_7","amount":99.99}"#).unwrap();

        record_charge(&session, &response).unwrap();
        assert_eq!(store.get(LAST_PAYMENT_ID).as_deref(), Some("pay_7"));
        assert_eq!(session.last_payment_id().as_deref(), Some("pay_7"));
    }

    #[test]
    fn charge_without_payment_id_leaves_store_untouched() {
        let store = MemoryStorage::new();
        let session = Session::new(store.clone());
        let response: ChargeResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();

        record_charge(&session, &response).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn saved_card_with_short_number() {
        let card = PaymentInstrument {
            card_number: "42".into(),
            ..PaymentInstrument::default()
        };
        assert_eq!(SavedCard::from(&card).last4, "42");
    }
}
