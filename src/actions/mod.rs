//! Invoice write operations
//!
//! [`InvoiceActions`] is the mutation path of the dashboard: a validated
//! draft goes in, a parameterized write is issued through the store seam,
//! the cached invoice listing is invalidated, and control is handed back as
//! a navigation or a structured result.
//!
//! Per write request:
//!
//! ```text
//! draft ──▶ derive (cents, date) ──▶ store write ──▶ invalidate listing ──▶ navigate
//!                                        │
//!                                        └─ failure: log, then propagate (create/update)
//!                                                    or soft result (delete)
//! ```
//!
//! Create and update fail loud: the error is logged with context and
//! returned unchanged, so a failed write can never look like a success.
//! Delete fails soft: the failure is converted into a [`DeleteFailure`]
//! value, since an undeleted invoice simply stays visible in the listing.
//! The asymmetry is deliberate.

use crate::core::error::DashboardError;
use crate::core::invoice::{InvoiceDraft, InvoicePatch, NewInvoice};
use crate::core::money;
use crate::core::revalidate::{INVOICES_VIEW, Navigation, RevalidateBus};
use crate::core::service::InvoiceStore;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Success payload of a delete, rendered inline in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReceipt {
    pub message: &'static str,
}

/// Soft failure payload of a delete: a message plus the underlying cause
#[derive(Debug)]
pub struct DeleteFailure {
    pub message: &'static str,
    pub cause: anyhow::Error,
}

impl fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.cause)
    }
}

impl std::error::Error for DeleteFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// The invoice mutation service
///
/// Holds the store seam and the revalidation bus; each call is an
/// independent request-scoped unit of work with no shared mutable state.
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    views: RevalidateBus,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, views: RevalidateBus) -> Self {
        Self { store, views }
    }

    /// Persist a new invoice from a validated draft.
    ///
    /// Derives the amount in cents and stamps today's UTC date; the store
    /// assigns the id. On success the invoice listing is invalidated and
    /// the caller is navigated back to it.
    pub async fn create(&self, draft: InvoiceDraft) -> Result<Navigation, DashboardError> {
        let invoice = NewInvoice {
            customer_id: draft.customer_id,
            amount_cents: money::to_cents(draft.amount),
            status: draft.status,
            date: Utc::now().date_naive(),
        };

        if let Err(source) = self.store.insert_invoice(invoice).await {
            tracing::error!(error = %source, "failed to insert invoice");
            return Err(DashboardError::Storage {
                operation: "create invoice",
                source,
            });
        }

        self.views.invalidate(INVOICES_VIEW);
        Ok(Navigation::to(INVOICES_VIEW))
    }

    /// Overwrite an existing invoice from a validated draft.
    ///
    /// The creation date is immutable and not recomputed. An `id` matching
    /// no row updates zero rows and still reports success; the store does
    /// not check existence here.
    pub async fn update(
        &self,
        id: &Uuid,
        draft: InvoiceDraft,
    ) -> Result<Navigation, DashboardError> {
        let patch = InvoicePatch {
            customer_id: draft.customer_id,
            amount_cents: money::to_cents(draft.amount),
            status: draft.status,
        };

        if let Err(source) = self.store.update_invoice(id, patch).await {
            tracing::error!(error = %source, invoice_id = %id, "failed to update invoice");
            return Err(DashboardError::Storage {
                operation: "update invoice",
                source,
            });
        }

        self.views.invalidate(INVOICES_VIEW);
        Ok(Navigation::to(INVOICES_VIEW))
    }

    /// Delete an invoice by id.
    ///
    /// Idempotent: deleting an id that matches no row is still a success.
    /// Does not navigate: deletes are issued from within the listing.
    pub async fn delete(&self, id: &Uuid) -> Result<DeleteReceipt, DeleteFailure> {
        if let Err(cause) = self.store.delete_invoice(id).await {
            tracing::error!(error = %cause, invoice_id = %id, "failed to delete invoice");
            return Err(DeleteFailure {
                message: "Database Error: Failed to Delete Invoice.",
                cause,
            });
        }

        self.views.invalidate(INVOICES_VIEW);
        Ok(DeleteReceipt {
            message: "Deleted Invoice",
        })
    }
}
