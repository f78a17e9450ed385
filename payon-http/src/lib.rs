//! HTTP transport for the PayOn/ctpe payment gateway.
//!
//! Builds on the `payon` codec crate: the [`GatewayClient`] takes parameter
//! bags, has the codec render them to XML, posts the document as the `load`
//! field of a form-encoded body, and keeps the exchanged documents around for
//! inspection through the decoded views.
//!
//! # Example
//!
//! ```no_run
//! use payon::transaction::TransactionParams;
//! use payon_http::{GatewayClient, GatewayConfig};
//!
//! # async fn run() -> Result<(), payon_http::TransportError> {
//! let config = GatewayConfig::new("sender", "channel", "login", "password");
//! let mut client = GatewayClient::new(config)?;
//!
//! let mut params = TransactionParams::new();
//! params.transaction_id = "order-42".into();
//! params.payment_method = "CC.DB".into();
//!
//! client.execute_transaction(&params).await?;
//! if client.was_transaction_successful() {
//!     let data = client.transaction_data().unwrap();
//!     println!("unique id: {}", data.unique_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod constants;
pub mod error;

pub use client::{GatewayClient, GatewayConfig};
pub use error::TransportError;
