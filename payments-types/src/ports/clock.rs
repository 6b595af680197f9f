//! Time and identifier sources.
//!
//! Injected into the payment service so tests can pin both.

use crate::domain::PaymentId;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Source of new payment ids.
pub trait IdGenerator: Send + Sync {
    fn next_payment_id(&self) -> PaymentId;
}

/// Random UUID v4 payment ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_payment_id(&self) -> PaymentId {
        PaymentId::new(uuid::Uuid::new_v4().to_string())
    }
}
