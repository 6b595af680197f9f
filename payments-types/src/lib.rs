//! # Payments Types
//!
//! Domain types and port traits for the merchant payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Money, Merchant, Customer, Payment)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Inbound request shapes and their validation
//! - `error/` - Domain, bank, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AccountDetails, CardDetails, Customer, Merchant, MerchantId, Money, NewPayment, Payment,
    PaymentDetails, PaymentId,
};
pub use dto::*;
pub use error::{AppError, BankError, DomainError, RepoError};
pub use ports::{BankClient, Clock, IdGenerator, PaymentRepository, SystemClock, UuidGenerator};
