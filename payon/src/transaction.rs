//! Transaction parameters and related domain constants.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Gateway processing mode, stamped on `Transaction` and `Query` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Test transaction forwarded to the connector's simulator.
    ConnectorTest,
    /// Test transaction validated by the gateway only.
    #[default]
    IntegratorTest,
    /// Live transaction.
    Live,
}

impl TransactionMode {
    /// Wire representation of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectorTest => "CONNECTOR_TEST",
            Self::IntegratorTest => "INTEGRATOR_TEST",
            Self::Live => "LIVE",
        }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response delivery mode, stamped as the `Transaction` `response` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// The gateway answers in the same round trip.
    #[default]
    Sync,
    /// The gateway answers through an asynchronous notification.
    Async,
}

impl ResponseMode {
    /// Wire representation of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "SYNC",
            Self::Async => "ASYNC",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence mode for rebilled payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceMode {
    /// First payment of a recurring series.
    Initial,
    /// Subsequent rebill of an established series.
    Repeated,
}

impl RecurrenceMode {
    /// Wire representation of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Repeated => "REPEATED",
        }
    }
}

impl fmt::Display for RecurrenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single payment transaction.
///
/// Every field defaults to unset; unset and empty-string are equivalent and
/// both lead to the field (or its whole group) being omitted from the built
/// request. The bag is constructed by the caller and read, never mutated,
/// by the request builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionParams {
    /// Merchant-defined transaction identifier.
    pub transaction_id: String,
    /// Gateway identifier of an earlier transaction; set on follow-ups.
    pub reference_id: String,
    /// Merchant-defined shopper identifier.
    pub shopper_id: String,
    /// Merchant-defined invoice identifier.
    pub invoice_id: String,
    /// Merchant-defined order identifier.
    pub order_id: String,

    /// Payment method code (`CC.DB`, `DD.RB`, …), stamped on `Payment`.
    pub payment_method: String,
    /// Presentation amount.
    pub payment_amount: Option<Decimal>,
    /// ISO currency of the presentation amount.
    pub payment_currency: String,
    /// Dynamic descriptor part shown on the shopper's statement.
    pub payment_usage: String,
    /// Free-text memo attached to the payment.
    pub payment_memo: String,

    /// Recurrence mode; `None` for one-off payments.
    pub recurrence: Option<RecurrenceMode>,

    /// Account holder name.
    pub account_holder: String,
    /// Card or account number.
    pub account_number: String,
    /// Card brand.
    pub account_brand: String,
    /// Card expiry month, two digits.
    pub account_expiry_month: String,
    /// Card expiry year, four digits.
    pub account_expiry_year: String,
    /// Card verification code.
    pub account_verification: String,
    /// Stored registration identifier used for follow-up transactions.
    pub account_registration_id: String,
    /// Bank code.
    pub account_bank: String,
    /// Bank name.
    pub account_bank_name: String,
    /// Account country code.
    pub account_country: String,
    /// BIC for bank transfers.
    pub account_bic: String,
    /// IBAN for bank transfers.
    pub account_iban: String,
    /// Tagged account identifier.
    pub account_id: String,
    /// Tagged account password.
    pub account_password: String,

    /// Salutation.
    pub customer_salutation: String,
    /// Academic or honorific title.
    pub customer_title: String,
    /// Given name.
    pub customer_given_name: String,
    /// Family name.
    pub customer_family_name: String,
    /// Sex marker.
    pub customer_sex: String,
    /// Birth date, rendered as `yyyy-MM-dd`.
    pub customer_birth_date: Option<NaiveDate>,
    /// Company name.
    pub customer_company: String,
    /// Explicit registration token, stamped as the `Customer` `registration`
    /// attribute. Distinct from [`Self::account_registration_id`].
    pub customer_registration: String,

    /// Street address.
    pub customer_street: String,
    /// Postal code.
    pub customer_zip: String,
    /// City.
    pub customer_city: String,
    /// State or region.
    pub customer_state: String,
    /// Country code.
    pub customer_country: String,

    /// Landline phone number.
    pub customer_phone: String,
    /// Mobile phone number.
    pub customer_mobile: String,
    /// Email address.
    pub customer_email: String,
    /// Client IP address.
    pub customer_ip: String,

    /// Identity document type, emitted as the `Details/Identity` text.
    pub identity_type: String,
    /// Identity document value, emitted as the `paper` attribute.
    pub identity_paper: String,

    /// Frontend redirect URL for asynchronous flows.
    pub frontend_response_url: String,
    /// Frontend session identifier.
    pub frontend_session_id: String,

    /// Risk-analysis criteria, emitted in insertion order as `Criterion`
    /// children with the name carried as an attribute.
    pub analysis: Vec<(String, String)>,
}

impl TransactionParams {
    /// Creates an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one risk-analysis criterion.
    pub fn add_analysis(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.analysis.push((name.into(), value.into()));
    }

    /// True when the transaction references a previously stored registration
    /// instead of presenting fresh account data.
    #[must_use]
    pub fn is_follow_up(&self) -> bool {
        !self.reference_id.is_empty() || !self.account_registration_id.is_empty()
    }

    /// True when frontend data (redirect URL or session id) is present.
    #[must_use]
    pub fn has_frontend(&self) -> bool {
        !self.frontend_response_url.is_empty() || !self.frontend_session_id.is_empty()
    }

    /// True when an identity document is present.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.identity_paper.is_empty()
    }

    /// True when an expiry month or year is set.
    #[must_use]
    pub fn has_expiry(&self) -> bool {
        !self.account_expiry_month.is_empty() || !self.account_expiry_year.is_empty()
    }

    /// True when a recurrence mode is set.
    #[must_use]
    pub fn has_recurrence(&self) -> bool {
        self.recurrence.is_some()
    }
}
