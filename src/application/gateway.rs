use crate::application::finalizer::CaptureFinalizer;
use crate::application::lifecycle::OrderLifecycle;
use crate::application::orchestrator::ChargeOrchestrator;
use crate::config::GatewayConfig;
use crate::domain::charge::ChargeResult;
use crate::domain::notice::Notice;
use crate::domain::order::OrderStatus;
use crate::domain::ports::{NoticeSinkBox, OrderStore, OrderStoreBox, PaymentApiBox};
use crate::error::{Result, StriperError};
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

pub const GATEWAY_ID: &str = "striper";

/// Result of a checkout, as reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success { order_id: u64, transaction_id: String },
    Failed { order_id: u64, message: String },
}

/// A payment method the host can offer at checkout.
#[async_trait]
pub trait PaymentMethod: Send + Sync {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    async fn process_payment(&self, order_id: u64, card_token: &str) -> Result<PaymentOutcome>;
}

/// Stripe card gateway.
///
/// Owns the remote API client, the order store and the notice sink, and hands
/// out borrowed views of them to the charge, capture and lifecycle components.
pub struct Striper {
    config: GatewayConfig,
    api: PaymentApiBox,
    orders: OrderStoreBox,
    notices: NoticeSinkBox,
}

impl Striper {
    pub fn new(config: GatewayConfig, api: PaymentApiBox, orders: OrderStoreBox, notices: NoticeSinkBox) -> Self {
        Self {
            config,
            api,
            orders,
            notices,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Key for the client-side tokenization script.
    pub fn publishable_key(&self) -> &str {
        &self.config.publishable_key
    }

    pub fn orders(&self) -> &dyn OrderStore {
        self.orders.as_ref()
    }

    pub fn orchestrator(&self) -> ChargeOrchestrator<'_> {
        ChargeOrchestrator::new(self.api.as_ref(), self.orders.as_ref(), &self.config)
    }

    pub fn finalizer(&self) -> CaptureFinalizer<'_> {
        CaptureFinalizer::new(self.api.as_ref(), self.orders.as_ref(), self.notices.as_ref())
    }

    pub fn lifecycle(&self) -> OrderLifecycle<'_> {
        OrderLifecycle::new(self.orders.as_ref(), self.finalizer())
    }
}

#[async_trait]
impl PaymentMethod for Striper {
    fn id(&self) -> &str {
        GATEWAY_ID
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    async fn process_payment(&self, order_id: u64, card_token: &str) -> Result<PaymentOutcome> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(StriperError::OrderNotFound(order_id))?;

        if order.status != OrderStatus::Pending {
            return Err(StriperError::ValidationError(format!(
                "Order {order_id} is {} and not awaiting payment",
                order.status
            )));
        }

        let result = self.orchestrator().charge(&mut order, card_token).await?;

        let outcome = match result {
            ChargeResult::Success { transaction_id } => {
                order.status = OrderStatus::Processing;
                order.add_note(format!(
                    "{} payment completed with Transaction Id of '{}'",
                    self.config.title, transaction_id
                ));
                PaymentOutcome::Success {
                    order_id,
                    transaction_id,
                }
            }
            ChargeResult::Failure { message } => {
                warn!(order_id, "Payment failed: {}", message);
                order.status = OrderStatus::Failed;
                order.add_note(format!(
                    "{} Credit Card Payment Failed with message: '{}'",
                    self.config.title, message
                ));
                self.notices
                    .notify(Notice::error(format!("Payment error: {message}")));
                self.notices.notify(Notice::error(
                    "Transaction Error: Could not complete your payment",
                ));
                PaymentOutcome::Failed { order_id, message }
            }
        };

        self.orders.store(order).await?;
        Ok(outcome)
    }
}
