pub mod charge;
pub mod money;
pub mod notice;
pub mod order;
pub mod ports;
