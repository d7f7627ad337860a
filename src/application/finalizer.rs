use crate::domain::charge::{CaptureOutcome, CaptureRequest};
use crate::domain::money::MinorUnits;
use crate::domain::notice::Notice;
use crate::domain::ports::{NoticeSink, OrderStore, PaymentApi};
use crate::error::{GatewayError, Result, StriperError};
use rust_decimal::Decimal;
use tracing::{debug, error, info};

/// Captures charges that were only authorized at checkout.
pub struct CaptureFinalizer<'a> {
    api: &'a dyn PaymentApi,
    orders: &'a dyn OrderStore,
    notices: &'a dyn NoticeSink,
}

impl<'a> CaptureFinalizer<'a> {
    pub fn new(api: &'a dyn PaymentApi, orders: &'a dyn OrderStore, notices: &'a dyn NoticeSink) -> Self {
        Self {
            api,
            orders,
            notices,
        }
    }

    /// Captures the authorized charge stored on the order.
    ///
    /// `requested_amount` is in minor units and is rounded to a whole unit. It is
    /// never allowed above the order total. When the order total has dropped below
    /// the authorized amount and no override is given, the order total is captured.
    pub async fn capture(&self, order_id: u64, requested_amount: Option<Decimal>) -> Result<CaptureOutcome> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(StriperError::OrderNotFound(order_id))?;

        let Some(meta) = order.payment_meta.clone().filter(|meta| meta.auth_capture) else {
            debug!(order_id, "Charge already captured at checkout, nothing to capture");
            return Ok(CaptureOutcome::Skipped);
        };

        let total = order.total_minor()?;
        let requested = requested_amount.map(MinorUnits::round).transpose()?;

        let charge = match self.api.retrieve_charge(&meta.key, &meta.transaction_id).await {
            Ok(charge) => charge,
            Err(e) => return Ok(self.fail(order_id, e)),
        };

        let amount = if total < charge.amount {
            Some(requested.map_or(total, |requested| requested.min(total)))
        } else {
            requested.map(|requested| requested.min(total))
        };

        let request = CaptureRequest {
            transaction_id: meta.transaction_id.clone(),
            amount,
        };
        if let Err(e) = self.api.capture_charge(&meta.key, &request).await {
            return Ok(self.fail(order_id, e));
        }

        let captured = amount.unwrap_or(charge.amount);
        order.add_note(format!(
            "Captured {} {} of Transaction Id '{}'",
            captured, charge.currency, meta.transaction_id
        ));
        self.orders.store(order).await?;

        info!(order_id, transaction_id = %meta.transaction_id, amount = %captured, "Charge captured");
        Ok(CaptureOutcome::Captured {
            transaction_id: meta.transaction_id,
            amount,
        })
    }

    fn fail(&self, order_id: u64, e: GatewayError) -> CaptureOutcome {
        error!(order_id, status = ?e.status, code = ?e.code, "Stripe Error: {}", e.message);
        self.notices
            .notify(Notice::error(format!("Payment error: {}", e.message)));
        CaptureOutcome::Failed { message: e.message }
    }
}
