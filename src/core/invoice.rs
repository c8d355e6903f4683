//! Invoice domain model and read models
//!
//! An invoice goes through two representations:
//!
//! - [`InvoiceDraft`]: user-submitted fields that passed validation but have
//!   not been persisted. Carries the amount in dollars as entered.
//! - A persisted row with a server-assigned id and creation date, with the
//!   amount stored in integer cents to avoid floating-point drift.
//!
//! The remaining types are read models: row shapes returned by the listing
//! and overview queries, matching what the dashboard pages consume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// The wire/storage representation (`"pending"` or `"paid"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Parse the storage representation; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated invoice submission that has not been persisted yet
///
/// No id and no date: both are assigned server-side at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    /// Customer the invoice is billed to (opaque foreign key)
    pub customer_id: String,

    /// Amount in dollars, already coerced and known to be > 0
    pub amount: f64,

    pub status: InvoiceStatus,
}

/// Column values for inserting a new invoice
///
/// The id is not part of this struct: it is generated by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    /// Creation date (UTC server clock), immutable after insert
    pub date: NaiveDate,
}

/// Column values for updating an existing invoice
///
/// The date is deliberately absent: it never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePatch {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// A persisted invoice row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Invoice as loaded for the edit form, with the amount converted
/// back from cents to dollars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceEdit {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Row of the "latest invoices" overview panel (joined with customer data)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Formatted USD amount, e.g. `"$45.50"`
    pub amount: String,
}

/// Row of the filtered invoice listing (joined with customer data)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub id: Uuid,
    /// Raw amount in cents; the listing page formats it client-side
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// One row of the revenue chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i64,
}

/// Aggregates for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    /// Formatted USD totals
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}
