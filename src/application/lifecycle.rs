use crate::application::finalizer::CaptureFinalizer;
use crate::domain::charge::CaptureOutcome;
use crate::domain::order::OrderStatus;
use crate::domain::ports::OrderStore;
use crate::error::{Result, StriperError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// An order moved from one status to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTransition {
    pub order_id: u64,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl StatusTransition {
    /// Fulfilment of a paid order; the point where deferred captures happen.
    pub fn is_completion(&self) -> bool {
        self.from == OrderStatus::Processing && self.to == OrderStatus::Completed
    }
}

/// Applies order status changes and reacts to them.
pub struct OrderLifecycle<'a> {
    orders: &'a dyn OrderStore,
    finalizer: CaptureFinalizer<'a>,
}

impl<'a> OrderLifecycle<'a> {
    pub fn new(orders: &'a dyn OrderStore, finalizer: CaptureFinalizer<'a>) -> Self {
        Self { orders, finalizer }
    }

    /// Moves the order to `to` and dispatches the resulting transition.
    ///
    /// Returns the capture outcome when the transition triggered the finalizer.
    pub async fn transition(
        &self,
        order_id: u64,
        to: OrderStatus,
        capture_amount: Option<Decimal>,
    ) -> Result<Option<CaptureOutcome>> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(StriperError::OrderNotFound(order_id))?;

        let from = order.status;
        if from == to {
            return Ok(None);
        }
        if from.is_terminal() {
            return Err(StriperError::ValidationError(format!(
                "Order {order_id} is {from} and cannot move to {to}"
            )));
        }

        order.status = to;
        self.orders.store(order).await?;
        info!(order_id, %from, %to, "Order status changed");

        self.on_status_changed(StatusTransition { order_id, from, to }, capture_amount)
            .await
    }

    /// Entry point for hosts that change order status themselves and only
    /// report the transition.
    pub async fn on_status_changed(
        &self,
        transition: StatusTransition,
        capture_amount: Option<Decimal>,
    ) -> Result<Option<CaptureOutcome>> {
        if !transition.is_completion() {
            return Ok(None);
        }
        self.finalizer
            .capture(transition.order_id, capture_amount)
            .await
            .map(Some)
    }
}
