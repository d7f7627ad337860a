//! Application layer containing the payment flow orchestration.
//!
//! `Striper` is the entry point for checkout. It lends its ports to the
//! `ChargeOrchestrator` (checkout), the `CaptureFinalizer` (deferred capture) and
//! the `OrderLifecycle` (status transitions that trigger the capture).

pub mod finalizer;
pub mod gateway;
pub mod lifecycle;
pub mod orchestrator;
