//! Protocol codec for the PayOn/ctpe XML payment gateway.
//!
//! The gateway speaks a proprietary XML request/response protocol. This crate
//! covers everything except the network round trip: it builds request
//! documents from parameter bags, serializes them to canonical XML, parses
//! response text back into an element tree, flattens that tree into a
//! path-keyed mapping, and projects the well-known response fields into a
//! typed record.
//!
//! # Overview
//!
//! A transaction flows through the codec as
//! `TransactionParams` → [`request::build_transaction_request`] →
//! [`xml::to_xml`] → (HTTP transport, see the `payon-http` crate) →
//! [`xml::parse`] → [`xml::flatten`] / [`response::TransactionData`].
//!
//! All codec functions are pure: they allocate a fresh tree or mapping per
//! call and share no state.
//!
//! # Modules
//!
//! - [`error`] - decode-side error types
//! - [`query`] - query parameter bag and domain constants
//! - [`request`] - deterministic request document construction
//! - [`response`] - response field extraction and success predicates
//! - [`transaction`] - transaction parameter bag and domain constants
//! - [`xml`] - element model, serializer, parser, and flattener

pub mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod transaction;
pub mod xml;

pub use error::DecodeError;
pub use xml::{DecodedMapping, Element};
