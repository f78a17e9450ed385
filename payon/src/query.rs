//! Query parameters and related domain constants.

use std::fmt;

use chrono::{DateTime, Utc};

/// Transaction type filter: payments.
pub const TRANSACTION_TYPE_PAYMENT: &str = "PAYMENT";
/// Transaction type filter: registrations.
pub const TRANSACTION_TYPE_REGISTER: &str = "REGISTER";
/// Transaction type filter: schedules.
pub const TRANSACTION_TYPE_SCHEDULE: &str = "SCHEDULE";
/// Transaction type filter: risk-management checks.
pub const TRANSACTION_TYPE_RISK_MANAGEMENT: &str = "RISKMANAGEMENT";

/// Processing-result filter value for acknowledged transactions.
pub const PROCESSING_RESULT_ACK: &str = "ACK";
/// Processing-result filter value for rejected transactions.
pub const PROCESSING_RESULT_NOK: &str = "NOK";

/// Scope level of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryLevel {
    /// Restrict to a single channel.
    #[default]
    Channel,
    /// Restrict to a merchant.
    Merchant,
    /// Whole payment service provider.
    Psp,
}

impl QueryLevel {
    /// Wire representation of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "CHANNEL",
            Self::Merchant => "MERCHANT",
            Self::Psp => "PSP",
        }
    }
}

impl fmt::Display for QueryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result-set flavor requested from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    /// Plain transaction listing.
    #[default]
    Standard,
    /// Only transactions still active.
    ActiveTransactions,
    /// Transactions linked to the identified ones.
    LinkedTransactions,
    /// Transactions available for referencing.
    AvailableTransactions,
    /// Active transactions including their linked ones.
    ActiveLinkedTransactions,
    /// Available transactions including their linked ones.
    AvailableLinkedTransactions,
}

impl QueryType {
    /// Wire representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::ActiveTransactions => "ACTIVE_TRANSACTIONS",
            Self::LinkedTransactions => "LINKED_TRANSACTIONS",
            Self::AvailableTransactions => "AVAILABLE_TRANSACTIONS",
            Self::ActiveLinkedTransactions => "ACTIVE_LINKED_TRANSACTIONS",
            Self::AvailableLinkedTransactions => "AVAILABLE_LINKED_TRANSACTIONS",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or many gateway-assigned unique transaction identifiers.
///
/// A single identifier is emitted as one `UniqueID` child; multiple
/// identifiers are nested under a `UniqueIDs` wrapper with one `ID` child
/// per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueId {
    /// Exactly one identifier.
    Single(String),
    /// A collection of identifiers.
    Multiple(Vec<String>),
}

/// Parameters of a gateway query request.
///
/// Like the transaction bag, every optional field defaults to unset and
/// unset fields (or whole groups of them) are omitted from the built
/// request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Scope level, stamped as the `level` attribute.
    pub level: QueryLevel,
    /// Scope entity identifier, stamped as the `entity` attribute.
    pub entity: String,
    /// Result-set flavor, stamped as the `type` attribute.
    pub query_type: QueryType,
    /// Maximum number of results, stamped as `maxCount` when set.
    pub max_count: Option<u32>,

    /// Unique transaction identifier(s) to look up.
    pub unique_id: Option<UniqueId>,
    /// Gateway short identifier to look up.
    pub short_id: String,
    /// Merchant transaction identifier to look up.
    pub transaction_id: String,

    /// Transaction type filter (see the `TRANSACTION_TYPE_*` constants).
    pub transaction_type: String,

    /// Lower bound of the reporting period.
    pub period_from: Option<DateTime<Utc>>,
    /// Upper bound of the reporting period.
    pub period_to: Option<DateTime<Utc>>,

    /// Payment method filters, one `Method` child each.
    pub methods: Vec<String>,
    /// Payment type filters, one `Type` child with a `code` attribute each.
    pub types: Vec<String>,

    /// Processing-result filter (`ACK`/`NOK`).
    pub processing_result: String,

    /// Account identifier filter.
    pub account_id: String,
    /// Account brand filter.
    pub account_brand: String,
    /// Account password filter.
    pub account_password: String,
}

impl QueryParams {
    /// Creates a query bag with the three required scope parameters.
    pub fn new(level: QueryLevel, entity: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            level,
            entity: entity.into(),
            query_type,
            ..Self::default()
        }
    }

    /// True when at least one period bound is set.
    #[must_use]
    pub fn has_period(&self) -> bool {
        self.period_from.is_some() || self.period_to.is_some()
    }
}
