use super::charge::{CaptureRequest, Charge, CustomerProfile, NewCharge, NewCustomer};
use super::notice::Notice;
use super::order::Order;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;

/// The remote card-charging API.
///
/// Every call carries the secret key explicitly, so charges created with a
/// sandbox key can later be captured with that same key.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn create_customer(
        &self,
        secret_key: &str,
        customer: &NewCustomer,
    ) -> std::result::Result<CustomerProfile, GatewayError>;

    async fn create_charge(
        &self,
        secret_key: &str,
        charge: &NewCharge,
    ) -> std::result::Result<Charge, GatewayError>;

    async fn retrieve_charge(
        &self,
        secret_key: &str,
        charge_id: &str,
    ) -> std::result::Result<Charge, GatewayError>;

    async fn capture_charge(
        &self,
        secret_key: &str,
        capture: &CaptureRequest,
    ) -> std::result::Result<Charge, GatewayError>;
}

/// Access to the host order system.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: u64) -> Result<Option<Order>>;
}

/// Where customer-facing notices end up.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub type PaymentApiBox = Box<dyn PaymentApi>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type NoticeSinkBox = Box<dyn NoticeSink>;
