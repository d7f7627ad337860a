#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use striper::application::gateway::Striper;
use striper::config::GatewayConfig;
use striper::domain::charge::{CaptureRequest, Charge, CustomerProfile, NewCharge, NewCustomer};
use striper::domain::money::MinorUnits;
use striper::domain::order::{BillingDetails, Order};
use striper::domain::ports::{OrderStore, PaymentApi};
use striper::error::GatewayError;
use striper::infrastructure::in_memory::{InMemoryNotices, InMemoryOrderStore};

pub const SECRET_KEY: &str = "sk_test_123";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateCustomer { key: String, customer: NewCustomer },
    CreateCharge { key: String, charge: NewCharge },
    RetrieveCharge { key: String, charge_id: String },
    CaptureCharge { key: String, capture: CaptureRequest },
}

#[derive(Default)]
struct State {
    calls: Vec<ApiCall>,
    authorized: HashMap<String, MinorUnits>,
    next_charge: u32,
}

/// Payment API double that records every call and can be told to reject one
/// kind of call.
#[derive(Clone, Default)]
pub struct RecordingPaymentApi {
    state: Arc<Mutex<State>>,
    fail_customer: Option<String>,
    fail_charge: Option<String>,
    fail_retrieve: Option<String>,
    fail_capture: Option<String>,
}

impl RecordingPaymentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_customer(mut self, message: &str) -> Self {
        self.fail_customer = Some(message.to_string());
        self
    }

    pub fn failing_charge(mut self, message: &str) -> Self {
        self.fail_charge = Some(message.to_string());
        self
    }

    pub fn failing_retrieve(mut self, message: &str) -> Self {
        self.fail_retrieve = Some(message.to_string());
        self
    }

    pub fn failing_capture(mut self, message: &str) -> Self {
        self.fail_capture = Some(message.to_string());
        self
    }

    /// Seeds an existing authorization.
    pub fn with_authorized(self, charge_id: &str, amount: u64) -> Self {
        self.state
            .lock()
            .unwrap()
            .authorized
            .insert(charge_id.to_string(), MinorUnits::new(amount));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn charges(&self) -> Vec<NewCharge> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::CreateCharge { charge, .. } => Some(charge),
                _ => None,
            })
            .collect()
    }

    pub fn captures(&self) -> Vec<CaptureRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::CaptureCharge { capture, .. } => Some(capture),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn rejected(message: &Option<String>) -> Result<(), GatewayError> {
    match message {
        Some(message) => Err(GatewayError {
            message: message.clone(),
            status: Some(402),
            kind: Some("card_error".to_string()),
            code: None,
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl PaymentApi for RecordingPaymentApi {
    async fn create_customer(
        &self,
        secret_key: &str,
        customer: &NewCustomer,
    ) -> Result<CustomerProfile, GatewayError> {
        self.record(ApiCall::CreateCustomer {
            key: secret_key.to_string(),
            customer: customer.clone(),
        });
        rejected(&self.fail_customer)?;
        Ok(CustomerProfile {
            id: "cus_test_1".to_string(),
            default_source: "card_test_1".to_string(),
        })
    }

    async fn create_charge(&self, secret_key: &str, charge: &NewCharge) -> Result<Charge, GatewayError> {
        self.record(ApiCall::CreateCharge {
            key: secret_key.to_string(),
            charge: charge.clone(),
        });
        rejected(&self.fail_charge)?;

        let mut state = self.state.lock().unwrap();
        state.next_charge += 1;
        let id = format!("ch_test_{}", state.next_charge);
        state.authorized.insert(id.clone(), charge.amount);
        Ok(Charge {
            id,
            amount: charge.amount,
            currency: charge.currency.clone(),
            captured: charge.capture,
            amount_captured: None,
            customer: charge.customer.clone(),
        })
    }

    async fn retrieve_charge(&self, secret_key: &str, charge_id: &str) -> Result<Charge, GatewayError> {
        self.record(ApiCall::RetrieveCharge {
            key: secret_key.to_string(),
            charge_id: charge_id.to_string(),
        });
        rejected(&self.fail_retrieve)?;

        let amount = self
            .state
            .lock()
            .unwrap()
            .authorized
            .get(charge_id)
            .copied()
            .ok_or_else(|| GatewayError::new(format!("No such charge: {charge_id}")))?;
        Ok(Charge {
            id: charge_id.to_string(),
            amount,
            currency: "usd".to_string(),
            captured: false,
            amount_captured: None,
            customer: None,
        })
    }

    async fn capture_charge(&self, secret_key: &str, capture: &CaptureRequest) -> Result<Charge, GatewayError> {
        self.record(ApiCall::CaptureCharge {
            key: secret_key.to_string(),
            capture: capture.clone(),
        });
        rejected(&self.fail_capture)?;

        let amount = self
            .state
            .lock()
            .unwrap()
            .authorized
            .get(&capture.transaction_id)
            .copied()
            .unwrap_or(MinorUnits::ZERO);
        Ok(Charge {
            id: capture.transaction_id.clone(),
            amount,
            currency: "usd".to_string(),
            captured: true,
            amount_captured: Some(capture.amount.unwrap_or(amount)),
            customer: None,
        })
    }
}

pub fn config(auth_capture: bool, always_create_profile: bool) -> GatewayConfig {
    GatewayConfig {
        title: "Striper".to_string(),
        secret_key: SECRET_KEY.to_string(),
        publishable_key: "pk_test_123".to_string(),
        sandbox: true,
        always_create_profile,
        auth_capture,
        api_base: "http://localhost".to_string(),
        timeout: std::time::Duration::from_secs(5),
    }
}

pub fn order(id: u64, total: Decimal) -> Order {
    Order::new(
        id,
        total,
        "USD",
        BillingDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address_1: "12 St James's Square".to_string(),
            postcode: "SW1Y 4JH".to_string(),
            country: "GB".to_string(),
            ..Default::default()
        },
    )
}

pub struct Harness {
    pub gateway: Striper,
    pub api: RecordingPaymentApi,
    pub orders: InMemoryOrderStore,
    pub notices: InMemoryNotices,
}

/// Builds a gateway over in-memory ports with `orders` already stored.
pub async fn harness(config: GatewayConfig, api: RecordingPaymentApi, orders: Vec<Order>) -> Harness {
    let store = InMemoryOrderStore::new();
    for order in orders {
        store.store(order).await.unwrap();
    }
    let notices = InMemoryNotices::new();
    let gateway = Striper::new(
        config,
        Box::new(api.clone()),
        Box::new(store.clone()),
        Box::new(notices.clone()),
    );
    Harness {
        gateway,
        api,
        orders: store,
        notices,
    }
}
