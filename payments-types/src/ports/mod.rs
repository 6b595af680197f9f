//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod bank;
mod clock;
mod repository;

pub use bank::BankClient;
pub use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use repository::PaymentRepository;
