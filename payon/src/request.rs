//! Deterministic construction of gateway request documents.
//!
//! Both builders map a parameter bag onto an ordered, attributed element
//! tree rooted at `Request`. Groups are built bottom-up and attached to
//! their parent only when non-empty, so a bag with unset fields produces a
//! document without the corresponding elements rather than empty ones.

use chrono::{DateTime, Utc};

use crate::query::{QueryParams, UniqueId};
use crate::transaction::{ResponseMode, TransactionMode, TransactionParams};
use crate::xml::Element;

/// Protocol version stamped on every `Request` root.
pub const API_VERSION: &str = "1.0";

/// Merchant credentials carried in every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Sender identifier, stamped on `Header/Security`.
    pub sender: String,
    /// Target channel for transactions.
    pub channel: String,
    /// API user login.
    pub login: String,
    /// API user password.
    pub password: String,
}

/// Builds the request document for a payment transaction.
#[must_use]
pub fn build_transaction_request(
    credentials: &Credentials,
    params: &TransactionParams,
    mode: TransactionMode,
    response: ResponseMode,
) -> Element {
    let mut root = request_root(credentials);

    let mut transaction = Element::new("Transaction")
        .attr("mode", mode.as_str())
        .attr("response", response.as_str())
        .attr("channel", credentials.channel.as_str());
    transaction.push(user_element(credentials));

    let mut identification = Element::new("Identification");
    identification.push_text_if_set("TransactionID", &params.transaction_id);
    identification.push_text_if_set("ReferenceID", &params.reference_id);
    identification.push_text_if_set("ShopperID", &params.shopper_id);
    identification.push_text_if_set("InvoiceID", &params.invoice_id);
    identification.push_text_if_set("OrderID", &params.order_id);
    transaction.attach(identification);

    let mut payment = Element::new("Payment").attr("code", params.payment_method.as_str());
    payment.push_text_if_set("Memo", &params.payment_memo);
    let mut presentation = Element::new("Presentation");
    if let Some(amount) = params.payment_amount {
        presentation.push(Element::with_text("Amount", amount.to_string()));
    }
    presentation.push_text_if_set("Currency", &params.payment_currency);
    presentation.push_text_if_set("Usage", &params.payment_usage);
    payment.attach(presentation);
    transaction.push(payment);

    if let Some(recurrence) = params.recurrence {
        transaction.push(Element::new("Recurrence").attr("mode", recurrence.as_str()));
    }

    transaction.attach(account_element(params));

    if !params.is_follow_up() || !params.customer_registration.is_empty() {
        transaction.attach(customer_element(params));
    }

    if params.has_frontend() {
        let mut frontend = Element::new("Frontend");
        frontend.push_text_if_set("ResponseUrl", &params.frontend_response_url);
        frontend.push_text_if_set("SessionID", &params.frontend_session_id);
        transaction.attach(frontend);
    }

    if !params.analysis.is_empty() {
        let mut analysis = Element::new("Analysis");
        for (name, value) in &params.analysis {
            analysis.push(Element::with_text("Criterion", value.as_str()).attr("name", name.as_str()));
        }
        transaction.push(analysis);
    }

    root.push(transaction);
    root
}

/// Builds the request document for a gateway query.
#[must_use]
pub fn build_query_request(
    credentials: &Credentials,
    params: &QueryParams,
    mode: TransactionMode,
) -> Element {
    let mut root = request_root(credentials);

    let mut query = Element::new("Query")
        .attr("mode", mode.as_str())
        .attr("level", params.level.as_str())
        .attr("entity", params.entity.as_str())
        .attr("type", params.query_type.as_str());
    if let Some(max_count) = params.max_count {
        query.set_attr("maxCount", max_count.to_string());
    }
    query.push(user_element(credentials));

    let mut identification = Element::new("Identification");
    match &params.unique_id {
        Some(UniqueId::Single(id)) => identification.push_text_if_set("UniqueID", id),
        Some(UniqueId::Multiple(ids)) => {
            let mut wrapper = Element::new("UniqueIDs");
            for id in ids {
                wrapper.push(Element::with_text("ID", id.as_str()));
            }
            identification.attach(wrapper);
        }
        None => {}
    }
    identification.push_text_if_set("ShortID", &params.short_id);
    identification.push_text_if_set("TransactionID", &params.transaction_id);
    query.attach(identification);

    query.push_text_if_set("TransactionType", &params.transaction_type);

    if params.has_period() {
        let mut period = Element::new("Period");
        if let Some(from) = params.period_from {
            period.set_attr("from", format_period(from));
        }
        if let Some(to) = params.period_to {
            period.set_attr("to", format_period(to));
        }
        query.push(period);
    }

    if !params.methods.is_empty() {
        let mut methods = Element::new("Methods");
        for method in &params.methods {
            methods.push(Element::with_text("Method", method.as_str()));
        }
        query.push(methods);
    }

    if !params.types.is_empty() {
        let mut types = Element::new("Types");
        for code in &params.types {
            types.push(Element::new("Type").attr("code", code.as_str()));
        }
        query.push(types);
    }

    query.push_text_if_set("ProcessingResult", &params.processing_result);

    let mut account = Element::new("Account");
    account.push_text_if_set("Id", &params.account_id);
    account.push_text_if_set("Brand", &params.account_brand);
    account.push_text_if_set("Password", &params.account_password);
    query.attach(account);

    root.push(query);
    root
}

fn request_root(credentials: &Credentials) -> Element {
    let mut root = Element::new("Request").attr("version", API_VERSION);
    let mut header = Element::new("Header");
    header.push(Element::new("Security").attr("sender", credentials.sender.as_str()));
    root.push(header);
    root
}

fn user_element(credentials: &Credentials) -> Element {
    Element::new("User")
        .attr("login", credentials.login.as_str())
        .attr("pwd", credentials.password.as_str())
}

fn account_element(params: &TransactionParams) -> Element {
    let mut account = Element::new("Account");
    if params.is_follow_up() {
        account.set_attr("registration", params.account_registration_id.as_str());
    }
    account.push_text_if_set("Holder", &params.account_holder);
    account.push_text_if_set("Number", &params.account_number);
    account.push_text_if_set("Brand", &params.account_brand);
    account.push_text_if_set("Bic", &params.account_bic);
    account.push_text_if_set("Iban", &params.account_iban);

    if params.has_expiry() {
        let mut expiry = Element::new("Expiry");
        if !params.account_expiry_month.is_empty() {
            expiry.set_attr("month", params.account_expiry_month.as_str());
        }
        if !params.account_expiry_year.is_empty() {
            expiry.set_attr("year", params.account_expiry_year.as_str());
        }
        account.push(expiry);
        // Older protocol consumers read the expiry from these text children
        // instead of the Expiry attributes. Both forms are emitted.
        account.push_text_if_set("Year", &params.account_expiry_year);
        account.push_text_if_set("Month", &params.account_expiry_month);
    }

    account.push_text_if_set("Verification", &params.account_verification);
    account.push_text_if_set("Bank", &params.account_bank);
    account.push_text_if_set("BankName", &params.account_bank_name);
    account.push_text_if_set("Country", &params.account_country);
    account.push_text_if_set("Id", &params.account_id);
    account.push_text_if_set("Password", &params.account_password);
    account
}

fn customer_element(params: &TransactionParams) -> Element {
    let mut customer = Element::new("Customer");
    if !params.customer_registration.is_empty() {
        customer.set_attr("registration", params.customer_registration.as_str());
    }

    let mut name = Element::new("Name");
    name.push_text_if_set("Salutation", &params.customer_salutation);
    name.push_text_if_set("Title", &params.customer_title);
    name.push_text_if_set("Given", &params.customer_given_name);
    name.push_text_if_set("Family", &params.customer_family_name);
    name.push_text_if_set("Sex", &params.customer_sex);
    if let Some(birth_date) = params.customer_birth_date {
        name.push(Element::with_text(
            "Birthdate",
            birth_date.format("%Y-%m-%d").to_string(),
        ));
    }
    name.push_text_if_set("Company", &params.customer_company);
    customer.attach(name);

    let mut address = Element::new("Address");
    address.push_text_if_set("Street", &params.customer_street);
    address.push_text_if_set("Zip", &params.customer_zip);
    address.push_text_if_set("City", &params.customer_city);
    address.push_text_if_set("State", &params.customer_state);
    address.push_text_if_set("Country", &params.customer_country);
    customer.attach(address);

    let mut contact = Element::new("Contact");
    contact.push_text_if_set("Phone", &params.customer_phone);
    contact.push_text_if_set("Mobile", &params.customer_mobile);
    contact.push_text_if_set("Email", &params.customer_email);
    contact.push_text_if_set("Ip", &params.customer_ip);
    customer.attach(contact);

    if params.has_identity() {
        let mut details = Element::new("Details");
        details.push(
            Element::with_text("Identity", params.identity_type.as_str())
                .attr("paper", params.identity_paper.as_str()),
        );
        customer.push(details);
    }

    customer
}

fn format_period(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryLevel, QueryType};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn credentials() -> Credentials {
        Credentials {
            sender: "sender-1".into(),
            channel: "channel-1".into(),
            login: "login-1".into(),
            password: "secret".into(),
        }
    }

    fn build_tran(params: &TransactionParams) -> Element {
        build_transaction_request(
            &credentials(),
            params,
            TransactionMode::IntegratorTest,
            ResponseMode::Sync,
        )
    }

    #[test]
    fn test_root_header_and_user() {
        let root = build_tran(&TransactionParams::new());
        assert_eq!(root.name, "Request");
        assert_eq!(root.attr_value("version"), Some(API_VERSION));
        let security = root.descendant(&["Header", "Security"]).unwrap();
        assert_eq!(security.attr_value("sender"), Some("sender-1"));
        let user = root.descendant(&["Transaction", "User"]).unwrap();
        assert_eq!(user.attr_value("login"), Some("login-1"));
        assert_eq!(user.attr_value("pwd"), Some("secret"));
    }

    #[test]
    fn test_transaction_attributes() {
        let root = build_tran(&TransactionParams::new());
        let transaction = root.child("Transaction").unwrap();
        assert_eq!(transaction.attr_value("mode"), Some("INTEGRATOR_TEST"));
        assert_eq!(transaction.attr_value("response"), Some("SYNC"));
        assert_eq!(transaction.attr_value("channel"), Some("channel-1"));
    }

    #[test]
    fn test_empty_groups_are_omitted() {
        let root = build_tran(&TransactionParams::new());
        let transaction = root.child("Transaction").unwrap();
        assert!(transaction.child("Identification").is_none());
        assert!(transaction.child("Account").is_none());
        assert!(transaction.child("Frontend").is_none());
        assert!(transaction.child("Analysis").is_none());
        assert!(transaction.child("Recurrence").is_none());
        // Customer is emitted for first transactions but empty, so omitted too
        assert!(transaction.child("Customer").is_none());
        // Payment always carries its code attribute, Presentation is dropped
        let payment = transaction.child("Payment").unwrap();
        assert!(payment.child("Presentation").is_none());
    }

    #[test]
    fn test_identification_fields_in_order() {
        let mut params = TransactionParams::new();
        params.transaction_id = "tx-1".into();
        params.shopper_id = "shopper-1".into();
        let root = build_tran(&params);
        let identification = root.descendant(&["Transaction", "Identification"]).unwrap();
        let names: Vec<&str> = identification
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["TransactionID", "ShopperID"]);
    }

    #[test]
    fn test_payment_presentation() {
        let mut params = TransactionParams::new();
        params.payment_method = "CC.DB".into();
        params.payment_amount = Some(Decimal::new(1250, 2));
        params.payment_currency = "EUR".into();
        params.payment_usage = "order 42".into();
        let root = build_tran(&params);
        let payment = root.descendant(&["Transaction", "Payment"]).unwrap();
        assert_eq!(payment.attr_value("code"), Some("CC.DB"));
        let presentation = payment.child("Presentation").unwrap();
        assert_eq!(
            presentation.child("Amount").map(Element::text_content),
            Some("12.50")
        );
        assert_eq!(
            presentation.child("Currency").map(Element::text_content),
            Some("EUR")
        );
    }

    #[test]
    fn test_recurrence_node() {
        let mut params = TransactionParams::new();
        params.recurrence = Some(crate::transaction::RecurrenceMode::Repeated);
        let root = build_tran(&params);
        let recurrence = root.descendant(&["Transaction", "Recurrence"]).unwrap();
        assert_eq!(recurrence.attr_value("mode"), Some("REPEATED"));
    }

    #[test]
    fn test_follow_up_account_registration_and_no_customer() {
        let mut params = TransactionParams::new();
        params.reference_id = "ref-1".into();
        params.account_registration_id = "reg-9".into();
        params.customer_given_name = "Jo".into();
        let root = build_tran(&params);
        let transaction = root.child("Transaction").unwrap();
        let account = transaction.child("Account").unwrap();
        assert_eq!(account.attr_value("registration"), Some("reg-9"));
        assert!(transaction.child("Customer").is_none());
    }

    #[test]
    fn test_follow_up_with_registration_token_keeps_customer() {
        let mut params = TransactionParams::new();
        params.reference_id = "ref-1".into();
        params.customer_registration = "token-5".into();
        let root = build_tran(&params);
        let customer = root.descendant(&["Transaction", "Customer"]).unwrap();
        assert_eq!(customer.attr_value("registration"), Some("token-5"));
    }

    #[test]
    fn test_expiry_duplicated_as_attributes_and_text_children() {
        let mut params = TransactionParams::new();
        params.account_number = "4111111111111111".into();
        params.account_expiry_month = "07".into();
        params.account_expiry_year = "2030".into();
        let root = build_tran(&params);
        let account = root.descendant(&["Transaction", "Account"]).unwrap();
        let expiry = account.child("Expiry").unwrap();
        assert_eq!(expiry.attr_value("month"), Some("07"));
        assert_eq!(expiry.attr_value("year"), Some("2030"));
        assert_eq!(account.child("Year").map(Element::text_content), Some("2030"));
        assert_eq!(account.child("Month").map(Element::text_content), Some("07"));
    }

    #[test]
    fn test_customer_groups_and_identity() {
        let mut params = TransactionParams::new();
        params.customer_given_name = "Jo".into();
        params.customer_family_name = "Doe".into();
        params.customer_birth_date = chrono::NaiveDate::from_ymd_opt(1990, 2, 3);
        params.customer_city = "Vienna".into();
        params.customer_email = "jo@example.com".into();
        params.identity_type = "passport".into();
        params.identity_paper = "P1234".into();
        let root = build_tran(&params);
        let customer = root.descendant(&["Transaction", "Customer"]).unwrap();
        assert_eq!(
            customer
                .descendant(&["Name", "Birthdate"])
                .map(Element::text_content),
            Some("1990-02-03")
        );
        assert_eq!(
            customer
                .descendant(&["Address", "City"])
                .map(Element::text_content),
            Some("Vienna")
        );
        assert_eq!(
            customer
                .descendant(&["Contact", "Email"])
                .map(Element::text_content),
            Some("jo@example.com")
        );
        let identity = customer.descendant(&["Details", "Identity"]).unwrap();
        assert_eq!(identity.text_content(), "passport");
        assert_eq!(identity.attr_value("paper"), Some("P1234"));
    }

    #[test]
    fn test_customer_subgroups_omitted_when_empty() {
        let mut params = TransactionParams::new();
        params.customer_email = "jo@example.com".into();
        let root = build_tran(&params);
        let customer = root.descendant(&["Transaction", "Customer"]).unwrap();
        assert!(customer.child("Name").is_none());
        assert!(customer.child("Address").is_none());
        assert!(customer.child("Contact").is_some());
        assert!(customer.child("Details").is_none());
    }

    #[test]
    fn test_analysis_criteria() {
        let mut params = TransactionParams::new();
        params.add_analysis("SHOP_VISITS", "12");
        params.add_analysis("ACCOUNT_AGE_DAYS", "400");
        let root = build_tran(&params);
        let analysis = root.descendant(&["Transaction", "Analysis"]).unwrap();
        assert_eq!(analysis.children.len(), 2);
        assert_eq!(analysis.children[0].attr_value("name"), Some("SHOP_VISITS"));
        assert_eq!(analysis.children[0].text_content(), "12");
    }

    #[test]
    fn test_frontend_group() {
        let mut params = TransactionParams::new();
        params.frontend_response_url = "https://shop.example/return".into();
        let root = build_tran(&params);
        let frontend = root.descendant(&["Transaction", "Frontend"]).unwrap();
        assert_eq!(
            frontend.child("ResponseUrl").map(Element::text_content),
            Some("https://shop.example/return")
        );
        assert!(frontend.child("SessionID").is_none());
    }

    fn build_query(params: &QueryParams) -> Element {
        build_query_request(&credentials(), params, TransactionMode::Live)
    }

    #[test]
    fn test_query_attributes_and_max_count() {
        let mut params = QueryParams::new(QueryLevel::Channel, "ch-7", QueryType::Standard);
        params.max_count = Some(50);
        let root = build_query(&params);
        let query = root.child("Query").unwrap();
        assert_eq!(query.attr_value("mode"), Some("LIVE"));
        assert_eq!(query.attr_value("level"), Some("CHANNEL"));
        assert_eq!(query.attr_value("entity"), Some("ch-7"));
        assert_eq!(query.attr_value("type"), Some("STANDARD"));
        assert_eq!(query.attr_value("maxCount"), Some("50"));
    }

    #[test]
    fn test_query_single_unique_id() {
        let mut params = QueryParams::default();
        params.unique_id = Some(UniqueId::Single("uid-1".into()));
        let root = build_query(&params);
        let identification = root.descendant(&["Query", "Identification"]).unwrap();
        assert_eq!(
            identification.child("UniqueID").map(Element::text_content),
            Some("uid-1")
        );
        assert!(identification.child("UniqueIDs").is_none());
    }

    #[test]
    fn test_query_multiple_unique_ids() {
        let mut params = QueryParams::default();
        params.unique_id = Some(UniqueId::Multiple(vec!["u1".into(), "u2".into()]));
        let root = build_query(&params);
        let wrapper = root
            .descendant(&["Query", "Identification", "UniqueIDs"])
            .unwrap();
        let values: Vec<&str> = wrapper.children.iter().map(Element::text_content).collect();
        assert_eq!(values, ["u1", "u2"]);
    }

    #[test]
    fn test_query_identification_omitted_when_empty() {
        let root = build_query(&QueryParams::default());
        assert!(root.descendant(&["Query", "Identification"]).is_none());
    }

    #[test]
    fn test_query_period_bounds() {
        let mut params = QueryParams::default();
        params.period_from = Some(Utc.with_ymd_and_hms(2015, 1, 2, 3, 4, 5).unwrap());
        let root = build_query(&params);
        let period = root.descendant(&["Query", "Period"]).unwrap();
        assert_eq!(period.attr_value("from"), Some("2015-01-02 03:04:05"));
        assert_eq!(period.attr_value("to"), None);
    }

    #[test]
    fn test_query_methods_and_types() {
        let mut params = QueryParams::default();
        params.methods = vec!["CC".into(), "DD".into()];
        params.types = vec!["DB".into()];
        let root = build_query(&params);
        let methods = root.descendant(&["Query", "Methods"]).unwrap();
        let values: Vec<&str> = methods.children.iter().map(Element::text_content).collect();
        assert_eq!(values, ["CC", "DD"]);
        let types = root.descendant(&["Query", "Types"]).unwrap();
        assert_eq!(types.children[0].name, "Type");
        assert_eq!(types.children[0].attr_value("code"), Some("DB"));
    }

    #[test]
    fn test_query_account_group() {
        let mut params = QueryParams::default();
        params.account_id = "acc-1".into();
        params.account_brand = "VISA".into();
        let root = build_query(&params);
        let account = root.descendant(&["Query", "Account"]).unwrap();
        assert_eq!(account.child("Id").map(Element::text_content), Some("acc-1"));
        assert_eq!(
            account.child("Brand").map(Element::text_content),
            Some("VISA")
        );
        assert!(account.child("Password").is_none());

        let empty = build_query(&QueryParams::default());
        assert!(empty.descendant(&["Query", "Account"]).is_none());
    }
}
