//! Domain models for finance-service.

mod fee;

pub use fee::{FeeRecord, FeeStatus};
