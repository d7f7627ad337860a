use crate::config::GatewayConfig;
use crate::domain::charge::{Charge, ChargeRequest, ChargeResult, NewCharge, NewCustomer};
use crate::domain::order::{Order, PaymentMeta};
use crate::domain::ports::{OrderStore, PaymentApi};
use crate::error::{GatewayError, Result};
use tracing::{error, info};

/// Charges a card for an order.
///
/// One call to [`ChargeOrchestrator::charge`] performs at most two remote calls
/// (customer profile creation, then the charge) and, on success, one write of the
/// order's payment metadata.
pub struct ChargeOrchestrator<'a> {
    api: &'a dyn PaymentApi,
    orders: &'a dyn OrderStore,
    config: &'a GatewayConfig,
}

impl<'a> ChargeOrchestrator<'a> {
    pub fn new(api: &'a dyn PaymentApi, orders: &'a dyn OrderStore, config: &'a GatewayConfig) -> Self {
        Self {
            api,
            orders,
            config,
        }
    }

    /// Charges `card_token` for the order total.
    ///
    /// Remote rejections are logged and returned as [`ChargeResult::Failure`];
    /// the outer `Result` only reports failures of the order store.
    pub async fn charge(&self, order: &mut Order, card_token: &str) -> Result<ChargeResult> {
        let request = match ChargeRequest::from_order(order, card_token) {
            Ok(request) => request,
            Err(e) => {
                error!(order_id = order.id, "Cannot build charge: {}", e);
                return Ok(ChargeResult::Failure {
                    message: e.to_string(),
                });
            }
        };

        let charge = match self.submit(&request).await {
            Ok(charge) => charge,
            Err(e) => {
                error!(order_id = order.id, status = ?e.status, code = ?e.code, "Stripe Error: {}", e.message);
                return Ok(ChargeResult::Failure { message: e.message });
            }
        };

        order.payment_meta = Some(PaymentMeta {
            transaction_id: charge.id.clone(),
            key: self.config.secret_key.clone(),
            auth_capture: self.config.auth_capture,
        });
        self.orders.store(order.clone()).await?;

        info!(
            order_id = order.id,
            transaction_id = %charge.id,
            amount = %request.amount,
            captured = self.config.capture_immediately(),
            "Charge created"
        );
        Ok(ChargeResult::Success {
            transaction_id: charge.id,
        })
    }

    async fn submit(&self, request: &ChargeRequest) -> std::result::Result<Charge, GatewayError> {
        let key = self.config.secret_key.as_str();

        let (source, customer) = if self.config.always_create_profile {
            let profile = self
                .api
                .create_customer(
                    key,
                    &NewCustomer {
                        email: request.card.email.clone(),
                        description: request.card.name.clone(),
                        source: request.token.clone(),
                    },
                )
                .await?;
            (profile.default_source, Some(profile.id))
        } else {
            (request.token.clone(), None)
        };

        let charge = NewCharge {
            amount: request.amount,
            currency: request.currency.clone(),
            source,
            description: request.card.name.clone(),
            customer,
            capture: self.config.capture_immediately(),
        };
        self.api.create_charge(key, &charge).await
    }
}
