//! Gateway endpoints and wire-level constants.

use std::time::Duration;

/// Transaction endpoint of the test gateway.
pub const TEST_TRANSACTION_URL: &str = "https://test.ctpe.net/payment/ctpe";
/// Transaction endpoint of the live gateway.
pub const LIVE_TRANSACTION_URL: &str = "https://ctpe.io/payment/ctpe";
/// Query endpoint of the test gateway.
pub const TEST_QUERY_URL: &str = "https://test.ctpe.io/payment/query";
/// Query endpoint of the live gateway.
pub const LIVE_QUERY_URL: &str = "https://ctpe.io/payment/query";

/// User agent sent with every request.
pub const USER_AGENT: &str = "rust ctpepost";
/// Content type of the form-encoded request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
/// Name of the form field carrying the XML document.
pub const PAYLOAD_FIELD: &str = "load";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
