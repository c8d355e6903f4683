//! Customer domain model and read models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Minimal customer projection for select inputs (id + name)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerField {
    pub id: Uuid,
    pub name: String,
}

/// Row of the customers table: customer data plus invoice aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    /// Formatted USD totals
    pub total_pending: String,
    pub total_paid: String,
}
