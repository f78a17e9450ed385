//! Extraction of typed fields from decoded gateway responses.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::xml::Element;

/// The structural components of a dotted processing code.
///
/// Gateway processing codes look like `CC.DB.90.00`: payment method, payment
/// type, status code, reason code. The first two segments joined back
/// together form the payment code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResultParts {
    /// Payment method segment (`CC`).
    pub payment_method: String,
    /// Payment type segment (`DB`).
    pub payment_type: String,
    /// Method and type rejoined (`CC.DB`).
    pub payment_code: String,
    /// Status code segment (`90`).
    pub status_code: String,
    /// Reason code segment (`00`).
    pub reason_code: String,
}

impl ProcessingResultParts {
    /// Splits a dotted processing code into its components.
    ///
    /// Missing segments come out empty; extra segments are ignored.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        let mut segments = code.trim().split('.');
        let payment_method = segments.next().unwrap_or_default().to_owned();
        let payment_type = segments.next().unwrap_or_default().to_owned();
        let status_code = segments.next().unwrap_or_default().to_owned();
        let reason_code = segments.next().unwrap_or_default().to_owned();
        let payment_code = if payment_type.is_empty() {
            payment_method.clone()
        } else {
            format!("{payment_method}.{payment_type}")
        };
        Self {
            payment_method,
            payment_type,
            payment_code,
            status_code,
            reason_code,
        }
    }
}

/// Typed summary of a transaction response.
///
/// Extraction is total: every field falls back to its default (empty string,
/// `0`, `0.0`) when the source element or attribute is absent, so a partial
/// or unexpected document still produces a usable summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionData {
    /// Dotted processing code (`Processing` `code` attribute).
    pub processing_code: String,
    /// Payment code (`Payment` `code` attribute).
    pub payment_code: String,
    /// Processing timestamp as Unix seconds.
    pub timestamp: i64,
    /// Processing result (`ACK`/`NOK`).
    pub result: String,
    /// Processing status text.
    pub status: String,
    /// Processing status code.
    pub status_code: String,
    /// Processing reason text.
    pub reason: String,
    /// Processing reason code.
    pub reason_code: String,
    /// Human-readable return message.
    pub return_message: String,
    /// Return code.
    pub return_code: String,
    /// Risk score.
    pub risk_score: String,
    /// Confirmation status.
    pub confirmation_status: String,
    /// Notification security hash.
    pub security_hash: String,

    /// Gateway-assigned unique identifier.
    pub unique_id: String,
    /// Gateway-assigned short identifier.
    pub short_id: String,
    /// Merchant transaction identifier echoed back.
    pub transaction_id: String,
    /// Referenced transaction identifier.
    pub reference_id: String,

    /// Cleared amount.
    pub clearing_amount: f64,
    /// Clearing currency.
    pub clearing_currency: String,
    /// Statement descriptor.
    pub clearing_descriptor: String,
    /// Exchange rate applied at clearing.
    pub fx_rate: f64,
    /// Exchange rate source.
    pub fx_source: String,
    /// Exchange rate date as Unix seconds.
    pub fx_date: i64,
    /// Support phone number printed on the statement.
    pub support_phone: String,

    /// Transaction mode echoed back.
    pub mode: String,
    /// Response mode echoed back.
    pub response: String,
    /// Channel echoed back.
    pub channel: String,
}

impl TransactionData {
    /// Extracts the summary from a decoded response document.
    #[must_use]
    pub fn from_response(root: &Element) -> Self {
        let transaction = root.child("Transaction");
        let processing = transaction.and_then(|t| t.child("Processing"));
        let payment = transaction.and_then(|t| t.child("Payment"));
        let identification = transaction.and_then(|t| t.child("Identification"));
        let clearing = payment.and_then(|p| p.child("Clearing"));

        Self {
            processing_code: attr_of(processing, "code"),
            payment_code: attr_of(payment, "code"),
            timestamp: parse_instant(&child_text(processing, "Timestamp")),
            result: child_text(processing, "Result"),
            status: child_text(processing, "Status"),
            status_code: child_attr(processing, "Status", "code"),
            reason: child_text(processing, "Reason"),
            reason_code: child_attr(processing, "Reason", "code"),
            return_message: child_text(processing, "Return"),
            return_code: child_attr(processing, "Return", "code"),
            risk_score: child_attr(processing, "Risk", "code"),
            confirmation_status: child_text(processing, "ConfirmationStatus"),
            security_hash: child_text(processing, "SecurityHash"),

            unique_id: child_text(identification, "UniqueID"),
            short_id: child_text(identification, "ShortID"),
            transaction_id: child_text(identification, "TransactionID"),
            reference_id: child_text(identification, "ReferenceID"),

            clearing_amount: parse_float(&child_text(clearing, "Amount")),
            clearing_currency: child_text(clearing, "Currency"),
            clearing_descriptor: child_text(clearing, "Descriptor"),
            fx_rate: parse_float(&child_text(clearing, "FxRate")),
            fx_source: child_text(clearing, "FxSource"),
            fx_date: parse_instant(&child_text(clearing, "FxDate")),
            support_phone: child_text(clearing, "Support"),

            mode: attr_of(transaction, "mode"),
            response: attr_of(transaction, "response"),
            channel: attr_of(transaction, "channel"),
        }
    }

    /// Components of [`Self::processing_code`].
    #[must_use]
    pub fn processing_parts(&self) -> ProcessingResultParts {
        ProcessingResultParts::parse(&self.processing_code)
    }
}

/// True when the response acknowledges the transaction.
///
/// Anything other than an exact `ACK` result, including a missing
/// `Transaction/Processing/Result` element, counts as failure.
#[must_use]
pub fn transaction_acknowledged(root: &Element) -> bool {
    root.descendant(&["Transaction", "Processing", "Result"])
        .is_some_and(|result| result.text_content().trim() == "ACK")
}

/// True when the query response carries result rows rather than an error.
#[must_use]
pub fn query_succeeded(root: &Element) -> bool {
    root.child("Error").is_none()
}

/// Parses a gateway decimal leniently.
///
/// Reads the longest numeric prefix (optional sign, digits, at most one
/// decimal point) of the trimmed input and ignores any trailing garbage.
/// Inputs without a leading digit parse as `0.0`.
#[must_use]
pub fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

/// Parses a gateway timestamp leniently into Unix seconds.
///
/// Tries RFC 3339, RFC 2822, and the date-time layouts the gateway has been
/// seen emitting; a date without a time parses as midnight UTC. Unparseable
/// input yields `0`.
#[must_use]
pub fn parse_instant(text: &str) -> i64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return at.timestamp();
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(trimmed) {
        return at.timestamp();
    }
    const LAYOUTS: [&str; 3] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d.%m.%Y %H:%M:%S",
    ];
    for layout in LAYOUTS {
        if let Ok(at) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return at.and_utc().timestamp();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(at) = date.and_hms_opt(0, 0, 0) {
            return at.and_utc().timestamp();
        }
    }
    0
}

fn child_text(parent: Option<&Element>, name: &str) -> String {
    parent
        .and_then(|p| p.child(name))
        .map(|c| c.text_content().trim().to_owned())
        .unwrap_or_default()
}

fn attr_of(node: Option<&Element>, name: &str) -> String {
    node.and_then(|n| n.attr_value(name))
        .map(str::to_owned)
        .unwrap_or_default()
}

fn child_attr(parent: Option<&Element>, child: &str, attr: &str) -> String {
    parent
        .and_then(|p| p.child(child))
        .and_then(|c| c.attr_value(attr))
        .map(str::to_owned)
        .unwrap_or_default()
}
