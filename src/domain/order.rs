use crate::domain::money::MinorUnits;
use crate::error::StriperError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order as seen by the payment gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Paid (authorized, possibly captured), awaiting fulfilment.
    Processing,
    /// Fulfilled. Terminal.
    Completed,
    /// Payment attempt rejected. Terminal.
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Billing identity captured at checkout.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl BillingDetails {
    /// Cardholder name as sent to the payment API.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data saved on the order after a successful charge so the charge can be
/// captured later.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PaymentMeta {
    pub transaction_id: String,
    /// Secret key the charge was created with.
    pub key: String,
    /// `true` when the charge was only authorized and still needs a capture.
    pub auth_capture: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: u64,
    /// Order total in major units.
    pub total: Decimal,
    pub currency: String,
    pub billing: BillingDetails,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_meta: Option<PaymentMeta>,
}

impl Order {
    pub fn new(id: u64, total: Decimal, currency: impl Into<String>, billing: BillingDetails) -> Self {
        Self {
            id,
            total,
            currency: currency.into(),
            billing,
            status: OrderStatus::Pending,
            notes: Vec::new(),
            payment_meta: None,
        }
    }

    pub fn total_minor(&self) -> Result<MinorUnits, StriperError> {
        MinorUnits::from_major(self.total)
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Whether the stored charge still needs an explicit capture.
    pub fn needs_capture(&self) -> bool {
        self.payment_meta.as_ref().is_some_and(|meta| meta.auth_capture)
    }
}
