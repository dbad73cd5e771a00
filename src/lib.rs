//! Blocking Rust client for the Payamak Iranian SMS gateway.
//!
//! The gateway offers two transports and this crate speaks both: a REST-style
//! API (form-encoded `POST`) for single, bulk and scheduled sends, balance and
//! delivery-status lookups, and a legacy SOAP interface for sends. The design is
//! layered: a domain layer of strong types, a transport layer for wire-format
//! details, and a small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use payamak::GatewayClient;
//!
//! fn main() -> Result<(), payamak::GatewayError> {
//!     let client = GatewayClient::new("username", "password", "3000")?;
//!     client.send_sms("09121234567", "hello")?;
//!     client.send_bulk_sms(&["09121234567", "09351234567"], "hello all")?;
//!     println!("balance: {}", client.get_balance()?.value());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{GatewayClient, GatewayClientBuilder, GatewayError};
pub use domain::{
    Balance, Credentials, DeliveryStatus, Password, PhoneNumber, SenderId, SoapRecord, Username,
    ValidationError,
};
pub use transport::SoapError;
