//! Gateway client: configuration, request execution, and response access.

use std::fmt;
use std::time::Duration;

use payon::query::QueryParams;
use payon::request::{Credentials, build_query_request, build_transaction_request};
use payon::response::{TransactionData, query_succeeded, transaction_acknowledged};
use payon::transaction::{ResponseMode, TransactionMode, TransactionParams};
use payon::xml::{DecodedMapping, Element, flatten, mapping_to_json, parse, to_xml};
use reqwest::header::CONTENT_TYPE;
use url::{Url, form_urlencoded};

use crate::constants::{
    DEFAULT_TIMEOUT, FORM_CONTENT_TYPE, LIVE_QUERY_URL, LIVE_TRANSACTION_URL, PAYLOAD_FIELD,
    TEST_QUERY_URL, TEST_TRANSACTION_URL, USER_AGENT,
};
use crate::error::TransportError;

/// Configuration for a [`GatewayClient`].
#[derive(Clone)]
pub struct GatewayConfig {
    /// Sender identifier.
    pub sender: String,
    /// Channel identifier.
    pub channel: String,
    /// API user login.
    pub login: String,
    /// API user password.
    pub password: String,
    /// Whether to target the test gateway. Defaults to `true`.
    pub testing: bool,
    /// Processing mode used while [`Self::testing`] is set.
    pub test_mode: TransactionMode,
    /// Request timeout.
    pub timeout: Duration,
    /// Injected HTTP client; when `None`, one is built from the settings
    /// above.
    pub http_client: Option<reqwest::Client>,
    /// Transaction endpoint override.
    pub transaction_url: Option<Url>,
    /// Query endpoint override.
    pub query_url: Option<Url>,
}

impl GatewayConfig {
    /// Creates a configuration targeting the test gateway.
    pub fn new(
        sender: impl Into<String>,
        channel: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            channel: channel.into(),
            login: login.into(),
            password: password.into(),
            testing: true,
            test_mode: TransactionMode::IntegratorTest,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
            transaction_url: None,
            query_url: None,
        }
    }

    /// Selects the test or live gateway.
    #[must_use]
    pub fn with_testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    /// Sets the processing mode used on the test gateway.
    #[must_use]
    pub fn with_test_mode(mut self, mode: TransactionMode) -> Self {
        self.test_mode = mode;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Injects a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Overrides both gateway endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, transaction_url: Url, query_url: Url) -> Self {
        self.transaction_url = Some(transaction_url);
        self.query_url = Some(query_url);
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("sender", &self.sender)
            .field("channel", &self.channel)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("testing", &self.testing)
            .field("test_mode", &self.test_mode)
            .field("timeout", &self.timeout)
            .field("transaction_url", &self.transaction_url)
            .field("query_url", &self.query_url)
            .finish_non_exhaustive()
    }
}

/// HTTP client for the gateway.
///
/// The client keeps the last sent and last received documents. The request
/// document is stored before the network round trip; the response document is
/// stored only after a successful one, so a transport failure never leaves a
/// half-updated exchange behind.
pub struct GatewayClient {
    credentials: Credentials,
    testing: bool,
    test_mode: TransactionMode,
    response_mode: ResponseMode,
    client: reqwest::Client,
    transaction_url: Url,
    query_url: Url,
    last_request: Option<String>,
    last_response: Option<String>,
}

impl GatewayClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .user_agent(USER_AGENT)
                .build()?,
        };
        let (default_transaction, default_query) = if config.testing {
            (TEST_TRANSACTION_URL, TEST_QUERY_URL)
        } else {
            (LIVE_TRANSACTION_URL, LIVE_QUERY_URL)
        };
        Ok(Self {
            credentials: Credentials {
                sender: config.sender,
                channel: config.channel,
                login: config.login,
                password: config.password,
            },
            testing: config.testing,
            test_mode: config.test_mode,
            response_mode: ResponseMode::Sync,
            client,
            transaction_url: match config.transaction_url {
                Some(url) => url,
                None => Url::parse(default_transaction).expect("endpoint constants are valid URLs"),
            },
            query_url: match config.query_url {
                Some(url) => url,
                None => Url::parse(default_query).expect("endpoint constants are valid URLs"),
            },
            last_request: None,
            last_response: None,
        })
    }

    /// Processing mode applied to outgoing requests.
    ///
    /// Against the live gateway this is always [`TransactionMode::Live`];
    /// against the test gateway it is the configured test mode.
    #[must_use]
    pub fn effective_mode(&self) -> TransactionMode {
        if self.testing {
            self.test_mode
        } else {
            TransactionMode::Live
        }
    }

    /// Changes the processing mode used on the test gateway.
    pub fn set_test_mode(&mut self, mode: TransactionMode) {
        self.test_mode = mode;
    }

    /// The configured test-gateway processing mode.
    #[must_use]
    pub fn test_mode(&self) -> TransactionMode {
        self.test_mode
    }

    /// Changes the response delivery mode stamped on transactions.
    pub fn set_response_mode(&mut self, mode: ResponseMode) {
        self.response_mode = mode;
    }

    /// Builds and executes a payment transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP round trip fails.
    pub async fn execute_transaction(
        &mut self,
        params: &TransactionParams,
    ) -> Result<(), TransportError> {
        let tree = build_transaction_request(
            &self.credentials,
            params,
            self.effective_mode(),
            self.response_mode,
        );
        self.execute_transaction_xml(to_xml(&tree)).await
    }

    /// Executes a caller-supplied transaction document.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::EmptyRequest`] for a blank document and an
    /// HTTP error when the round trip fails.
    pub async fn execute_transaction_xml(
        &mut self,
        document: impl Into<String>,
    ) -> Result<(), TransportError> {
        let document = document.into();
        if document.trim().is_empty() {
            return Err(TransportError::EmptyRequest);
        }
        let url = self.transaction_url.clone();
        self.send(&url, document).await
    }

    /// Builds and executes a gateway query.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP round trip fails.
    pub async fn execute_query(&mut self, params: &QueryParams) -> Result<(), TransportError> {
        let tree = build_query_request(&self.credentials, params, self.effective_mode());
        self.execute_query_xml(to_xml(&tree)).await
    }

    /// Executes a caller-supplied query document.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::EmptyRequest`] for a blank document and an
    /// HTTP error when the round trip fails.
    pub async fn execute_query_xml(
        &mut self,
        document: impl Into<String>,
    ) -> Result<(), TransportError> {
        let document = document.into();
        if document.trim().is_empty() {
            return Err(TransportError::EmptyRequest);
        }
        let url = self.query_url.clone();
        self.send(&url, document).await
    }

    async fn send(&mut self, url: &Url, document: String) -> Result<(), TransportError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair(PAYLOAD_FIELD, &document)
            .finish();
        self.last_request = Some(document);

        tracing::debug!(%url, bytes = body.len(), "sending gateway request");
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        tracing::debug!(bytes = text.len(), "received gateway response");

        self.last_response = Some(text);
        Ok(())
    }

    /// The last request document sent (or prepared for sending).
    #[must_use]
    pub fn last_request(&self) -> Option<&str> {
        self.last_request.as_deref()
    }

    /// The last response document received or ingested.
    #[must_use]
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Ingests an asynchronous gateway notification as the current response.
    ///
    /// Notifications delivered to the merchant's callback endpoint carry the
    /// same document shape as synchronous responses; after ingestion all
    /// response accessors and predicates apply to the notification.
    pub fn set_response(&mut self, body: impl Into<String>) {
        self.last_response = Some(body.into());
    }

    /// The last request parsed back into an element tree.
    #[must_use]
    pub fn request_tree(&self) -> Option<Element> {
        self.last_request.as_deref().and_then(|d| parse(d).ok())
    }

    /// The last request flattened into a path-keyed mapping.
    #[must_use]
    pub fn request_mapping(&self) -> Option<DecodedMapping> {
        self.request_tree().map(|tree| flatten(&tree))
    }

    /// The last request rendered as JSON.
    #[must_use]
    pub fn request_json(&self) -> Option<String> {
        self.request_mapping().map(|m| mapping_to_json(&m))
    }

    /// The last response parsed into an element tree.
    ///
    /// `None` when no response has been received or the body does not parse.
    #[must_use]
    pub fn response_tree(&self) -> Option<Element> {
        self.last_response.as_deref().and_then(|d| parse(d).ok())
    }

    /// The last response flattened into a path-keyed mapping.
    #[must_use]
    pub fn response_mapping(&self) -> Option<DecodedMapping> {
        self.response_tree().map(|tree| flatten(&tree))
    }

    /// The last response rendered as JSON.
    #[must_use]
    pub fn response_json(&self) -> Option<String> {
        self.response_mapping().map(|m| mapping_to_json(&m))
    }

    /// Typed summary of the last transaction response.
    #[must_use]
    pub fn transaction_data(&self) -> Option<TransactionData> {
        self.response_tree()
            .map(|tree| TransactionData::from_response(&tree))
    }

    /// True when the last response acknowledges the transaction.
    ///
    /// A missing or malformed response counts as failure.
    #[must_use]
    pub fn was_transaction_successful(&self) -> bool {
        self.response_tree()
            .is_some_and(|tree| transaction_acknowledged(&tree))
    }

    /// True when the last response answers a query without an error element.
    ///
    /// A missing or malformed response counts as failure.
    #[must_use]
    pub fn was_query_successful(&self) -> bool {
        self.response_tree().is_some_and(|tree| query_succeeded(&tree))
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("sender", &self.credentials.sender)
            .field("channel", &self.credentials.channel)
            .field("login", &self.credentials.login)
            .field("password", &"<redacted>")
            .field("testing", &self.testing)
            .field("test_mode", &self.test_mode)
            .field("response_mode", &self.response_mode)
            .field("transaction_url", &self.transaction_url)
            .field("query_url", &self.query_url)
            .finish_non_exhaustive()
    }
}
