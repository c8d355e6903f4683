//! Invoice form validation
//!
//! Raw form submissions arrive as a string-keyed, string-valued field map.
//! [`validate_invoice`] checks and coerces the three invoice fields and
//! either produces a typed [`InvoiceDraft`] or a [`FormErrors`] value with
//! one message list per failing field. Validation failures are data, never
//! errors: every field is checked independently so a submission with several
//! bad fields reports all of them at once.

use crate::core::invoice::{InvoiceDraft, InvoiceStatus};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Message shown when the customer selection is missing or empty
pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";

/// Message shown when the amount is unparseable or not positive
pub const AMOUNT_OUT_OF_RANGE: &str = "Please enter an amount greater than $0.";

/// Message shown when the status is not one of the known values
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// What kind of constraint a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Absent, or not castable to the expected type
    InvalidType,
    /// Parsed, but outside the allowed range
    InvalidRange,
    /// Not one of the allowed enum values
    InvalidEnum,
}

/// A single failed constraint on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

/// Accumulated validation failures, keyed by form field name
///
/// Field keys are the raw form names (`customerId`, `amount`, `status`).
/// A field may carry more than one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<Violation>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against a field
    pub fn push(&mut self, field: &str, kind: ViolationKind, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(Violation {
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&[Violation]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Field → message list, the shape rendered inline next to form inputs
    pub fn messages(&self) -> BTreeMap<&str, Vec<&str>> {
        self.errors
            .iter()
            .map(|(field, violations)| {
                (
                    field.as_str(),
                    violations.iter().map(|v| v.message.as_str()).collect(),
                )
            })
            .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violations) in &self.errors {
            for violation in violations {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, violation.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validate and coerce a raw invoice form submission.
///
/// Required fields: `customerId` (non-empty), `amount` (number > 0),
/// `status` (`pending` or `paid`). Returns the coerced draft, or the full
/// set of per-field failures.
pub fn validate_invoice(fields: &HashMap<String, String>) -> Result<InvoiceDraft, FormErrors> {
    let mut errors = FormErrors::new();

    let customer_id = match fields.get("customerId").map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            errors.push("customerId", ViolationKind::InvalidType, CUSTOMER_REQUIRED);
            None
        }
    };

    let amount = match fields.get("amount").and_then(|v| v.trim().parse::<f64>().ok()) {
        Some(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => {
            errors.push("amount", ViolationKind::InvalidRange, AMOUNT_OUT_OF_RANGE);
            None
        }
    };

    let status = match fields.get("status").and_then(|v| InvoiceStatus::parse(v)) {
        Some(value) => Some(value),
        None => {
            errors.push("status", ViolationKind::InvalidEnum, STATUS_REQUIRED);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceDraft {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_form() -> HashMap<String, String> {
        form(&[("customerId", "c1"), ("amount", "45.50"), ("status", "pending")])
    }

    // === customerId ===

    #[test]
    fn test_missing_customer_reports_only_customer() {
        let result = validate_invoice(&form(&[("amount", "10"), ("status", "paid")]));
        let errors = result.unwrap_err();
        let violations = errors.get("customerId").unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::InvalidType);
        assert_eq!(violations[0].message, CUSTOMER_REQUIRED);
        assert!(errors.get("amount").is_none());
        assert!(errors.get("status").is_none());
    }

    #[test]
    fn test_empty_customer_rejected() {
        let mut fields = valid_form();
        fields.insert("customerId".into(), "   ".into());
        let errors = validate_invoice(&fields).unwrap_err();
        assert!(errors.get("customerId").is_some());
    }

    // === amount ===

    #[test]
    fn test_amount_zero_rejected() {
        let mut fields = valid_form();
        fields.insert("amount".into(), "0".into());
        let errors = validate_invoice(&fields).unwrap_err();
        assert_eq!(
            errors.get("amount").unwrap()[0].kind,
            ViolationKind::InvalidRange
        );
    }

    #[test]
    fn test_amount_negative_rejected() {
        let mut fields = valid_form();
        fields.insert("amount".into(), "-5".into());
        let errors = validate_invoice(&fields).unwrap_err();
        assert_eq!(
            errors.get("amount").unwrap()[0].message,
            AMOUNT_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_amount_non_numeric_rejected() {
        let mut fields = valid_form();
        fields.insert("amount".into(), "ten dollars".into());
        assert!(validate_invoice(&fields).is_err());
    }

    #[test]
    fn test_amount_missing_rejected() {
        let errors =
            validate_invoice(&form(&[("customerId", "c1"), ("status", "paid")])).unwrap_err();
        assert!(errors.get("amount").is_some());
    }

    #[test]
    fn test_amount_infinite_rejected() {
        let mut fields = valid_form();
        fields.insert("amount".into(), "inf".into());
        assert!(validate_invoice(&fields).is_err());
    }

    #[test]
    fn test_amount_positive_coerced() {
        let draft = validate_invoice(&valid_form()).unwrap();
        assert_eq!(draft.amount, 45.5);
    }

    // === status ===

    #[test]
    fn test_status_unknown_rejected() {
        let mut fields = valid_form();
        fields.insert("status".into(), "overdue".into());
        let errors = validate_invoice(&fields).unwrap_err();
        assert_eq!(
            errors.get("status").unwrap()[0].kind,
            ViolationKind::InvalidEnum
        );
        assert_eq!(errors.get("status").unwrap()[0].message, STATUS_REQUIRED);
    }

    #[test]
    fn test_status_both_valid_values_pass() {
        for status in ["pending", "paid"] {
            let mut fields = valid_form();
            fields.insert("status".into(), status.into());
            let draft = validate_invoice(&fields).unwrap();
            assert_eq!(draft.status.as_str(), status);
        }
    }

    // === whole-form behavior ===

    #[test]
    fn test_all_fields_invalid_reports_every_field() {
        let errors = validate_invoice(&form(&[("amount", "-1"), ("status", "nope")])).unwrap_err();
        assert!(errors.get("customerId").is_some());
        assert!(errors.get("amount").is_some());
        assert!(errors.get("status").is_some());
    }

    #[test]
    fn test_valid_form_produces_typed_draft() {
        let draft = validate_invoice(&valid_form()).unwrap();
        assert_eq!(draft.customer_id, "c1");
        assert_eq!(draft.amount, 45.5);
        assert_eq!(draft.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_empty_form_reports_three_fields() {
        let errors = validate_invoice(&HashMap::new()).unwrap_err();
        assert_eq!(errors.messages().len(), 3);
    }

    #[test]
    fn test_messages_shape() {
        let errors = validate_invoice(&HashMap::new()).unwrap_err();
        let messages = errors.messages();
        assert_eq!(messages["amount"], vec![AMOUNT_OUT_OF_RANGE]);
        assert_eq!(messages["customerId"], vec![CUSTOMER_REQUIRED]);
        assert_eq!(messages["status"], vec![STATUS_REQUIRED]);
    }
}
