//! Service traits for store access
//!
//! These traits are the seam between the request-handling layer and the
//! storage backends. Every method is a single query: one connection is
//! taken from the pool for its duration and released on every exit path.
//! The service is agnostic to the underlying store; PostgreSQL and
//! in-memory implementations live in `crate::storage`.

use crate::core::auth::User;
use crate::core::customer::{CustomerField, CustomerRow};
use crate::core::invoice::{
    CardData, InvoiceEdit, InvoicePatch, InvoiceRow, LatestInvoice, NewInvoice, Revenue,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Rows per page of the filtered invoice listing
pub const ITEMS_PER_PAGE: u32 = 6;

/// Store operations on invoices
///
/// Writes return `Ok(())` on acceptance by the store; `update_invoice` and
/// `delete_invoice` do not report whether a row was actually touched.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice; the store assigns the id
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<()>;

    /// Overwrite customer, amount, and status of the invoice with `id`
    async fn update_invoice(&self, id: &Uuid, patch: InvoicePatch) -> Result<()>;

    /// Delete the invoice with `id`
    async fn delete_invoice(&self, id: &Uuid) -> Result<()>;

    /// Load a single invoice for the edit form
    async fn invoice_by_id(&self, id: &Uuid) -> Result<Option<InvoiceEdit>>;

    /// The five most recent invoices, joined with customer data
    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>>;

    /// One page of the invoice listing matching `query`, newest first
    ///
    /// The search is case-insensitive over customer name, customer email,
    /// amount, date, and status. Pages are 1-based, [`ITEMS_PER_PAGE`] rows.
    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceRow>>;

    /// Number of listing pages matching `query`
    async fn invoice_pages(&self, query: &str) -> Result<u32>;
}

/// Store operations on customers
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers as id/name pairs, ordered by name
    async fn customers(&self) -> Result<Vec<CustomerField>>;

    /// Customers matching `query` with their invoice aggregates
    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerRow>>;
}

/// Store operations on users (credential lookup)
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Store operations backing the dashboard overview page
#[async_trait]
pub trait OverviewStore: Send + Sync {
    /// All rows of the revenue chart
    async fn revenue(&self) -> Result<Vec<Revenue>>;

    /// Counts and paid/pending totals for the overview cards
    async fn card_data(&self) -> Result<CardData>;
}
