//! # Payments Hex
//!
//! Application service layer for the payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates bank and repository calls)
//!
//! The service is generic over `R: PaymentRepository` and `B: BankClient`,
//! allowing different adapters to be injected.

pub mod service;


pub use service::PaymentService;
