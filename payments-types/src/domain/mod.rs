//! Domain models for the payment service.

pub mod customer;
pub mod merchant;
pub mod money;
pub mod payment;

pub use customer::{CardDetails, Customer};
pub use merchant::{AccountDetails, Merchant, MerchantId};
pub use money::Money;
pub use payment::{NewPayment, Payment, PaymentDetails, PaymentId};
