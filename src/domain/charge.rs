use crate::domain::money::MinorUnits;
use crate::domain::order::Order;
use crate::error::StriperError;
use serde::{Deserialize, Serialize};

/// Everything needed to charge a card for one payment attempt.
///
/// Built once from the order and the client-side card token; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub amount: MinorUnits,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Opaque token produced by client-side tokenization.
    pub token: String,
    /// Order summary for the merchant; the remote charge is labelled with the
    /// cardholder name instead.
    pub description: String,
    pub card: CardHolder,
}

/// Billing identity attached to the card.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardHolder {
    pub name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_zip: String,
    pub address_state: String,
    pub address_country: String,
}

impl ChargeRequest {
    pub fn from_order(order: &Order, token: impl Into<String>) -> Result<Self, StriperError> {
        let billing = &order.billing;
        Ok(Self {
            amount: order.total_minor()?,
            currency: order.currency.to_lowercase(),
            token: token.into(),
            description: format!("Charge for {}", billing.email),
            card: CardHolder {
                name: billing.full_name(),
                email: billing.email.clone(),
                address_line1: billing.address_1.clone(),
                address_line2: billing.address_2.clone(),
                address_zip: billing.postcode.clone(),
                address_state: billing.state.clone(),
                address_country: billing.country.clone(),
            },
        })
    }
}

/// Customer profile creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub email: String,
    pub description: String,
    /// Card token the profile's default card is created from.
    pub source: String,
}

/// A reusable customer record held by the payment API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    #[serde(alias = "default_card")]
    pub default_source: String,
}

/// Charge creation parameters as sent to the payment API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCharge {
    pub amount: MinorUnits,
    pub currency: String,
    /// Card token, or the customer's card id when `customer` is set.
    pub source: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// `false` authorizes only; `true` authorizes and captures.
    pub capture: bool,
}

/// A charge object returned by the payment API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub amount: MinorUnits,
    pub currency: String,
    #[serde(default)]
    pub captured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_captured: Option<MinorUnits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

/// Capture of a previously authorized charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub transaction_id: String,
    /// Partial amount; `None` captures the full authorized amount.
    pub amount: Option<MinorUnits>,
}

/// Outcome of a single charge attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ChargeResult {
    Success { transaction_id: String },
    Failure { message: String },
}

impl ChargeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ChargeResult::Success { .. })
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            ChargeResult::Success { transaction_id } => Some(transaction_id),
            ChargeResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ChargeResult::Success { .. } => None,
            ChargeResult::Failure { message } => Some(message),
        }
    }
}

/// Outcome of a capture attempt on a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum CaptureOutcome {
    /// The charge was captured at authorization time; nothing to do.
    Skipped,
    Captured {
        transaction_id: String,
        /// Amount requested; `None` means the full authorized amount.
        amount: Option<MinorUnits>,
    },
    Failed { message: String },
}
