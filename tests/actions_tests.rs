//! Integration tests for the invoice write path
//!
//! These tests exercise `InvoiceActions` against the in-memory store (and a
//! failing double) and verify the full mutation contract: coercion into
//! cents, server-assigned dates, invalidation signals, navigation, and the
//! fail-loud/fail-soft split between create/update and delete.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use ledgerdash::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    store: Arc<InMemoryDashboardStore>,
    actions: InvoiceActions,
    views: RevalidateBus,
    customer: Customer,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryDashboardStore::new());
    let customer = store.add_customer("Acme Corp", "billing@acme.test", "/customers/acme.png");
    let views = RevalidateBus::new(8);
    let actions = InvoiceActions::new(store.clone(), views.clone());
    Harness {
        store,
        actions,
        views,
        customer,
    }
}

fn draft(customer_id: &str, amount: f64, status: InvoiceStatus) -> InvoiceDraft {
    InvoiceDraft {
        customer_id: customer_id.to_string(),
        amount,
        status,
    }
}

fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Store double whose write operations always fail
struct FailingStore;

#[async_trait]
impl InvoiceStore for FailingStore {
    async fn insert_invoice(&self, _invoice: NewInvoice) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn update_invoice(&self, _id: &Uuid, _patch: InvoicePatch) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn delete_invoice(&self, _id: &Uuid) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn invoice_by_id(&self, _id: &Uuid) -> Result<Option<InvoiceEdit>> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn filtered_invoices(&self, _query: &str, _page: u32) -> Result<Vec<InvoiceRow>> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn invoice_pages(&self, _query: &str) -> Result<u32> {
        Err(anyhow!("connection reset by peer"))
    }
}

fn failing_actions() -> (InvoiceActions, RevalidateBus) {
    let views = RevalidateBus::new(8);
    let actions = InvoiceActions::new(Arc::new(FailingStore), views.clone());
    (actions, views)
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_persists_coerced_record() {
    let h = harness();

    h.actions
        .create(draft(&h.customer.id.to_string(), 45.50, InvoiceStatus::Pending))
        .await
        .unwrap();

    let records = h.store.invoice_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount_cents, 4550);
    assert_eq!(records[0].status, InvoiceStatus::Pending);
    assert_eq!(records[0].customer_id, h.customer.id);
    assert_eq!(records[0].date, Utc::now().date_naive());
}

#[tokio::test]
async fn test_create_navigates_to_listing() {
    let h = harness();

    let navigation = h
        .actions
        .create(draft(&h.customer.id.to_string(), 10.0, InvoiceStatus::Paid))
        .await
        .unwrap();

    assert_eq!(navigation.location(), INVOICES_VIEW);
}

#[tokio::test]
async fn test_create_invalidates_listing_view() {
    let h = harness();
    let mut rx = h.views.subscribe();

    h.actions
        .create(draft(&h.customer.id.to_string(), 10.0, InvoiceStatus::Paid))
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap(), INVOICES_VIEW);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_create_rounds_half_away_from_zero() {
    let h = harness();

    h.actions
        .create(draft(&h.customer.id.to_string(), 0.005, InvoiceStatus::Pending))
        .await
        .unwrap();

    assert_eq!(h.store.invoice_records()[0].amount_cents, 1);
}

#[tokio::test]
async fn test_create_failure_propagates_and_skips_invalidation() {
    let (actions, views) = failing_actions();
    let mut rx = views.subscribe();

    let err = actions
        .create(draft(&Uuid::new_v4().to_string(), 10.0, InvoiceStatus::Paid))
        .await
        .unwrap_err();

    match err {
        DashboardError::Storage { operation, source } => {
            assert_eq!(operation, "create invoice");
            assert!(source.to_string().contains("connection reset"));
        }
        other => panic!("expected storage error, got {:?}", other),
    }
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_overwrites_values_but_not_date() {
    let h = harness();
    h.actions
        .create(draft(&h.customer.id.to_string(), 45.50, InvoiceStatus::Pending))
        .await
        .unwrap();
    let created = h.store.invoice_records()[0].clone();

    h.actions
        .update(
            &created.id,
            draft(&h.customer.id.to_string(), 100.0, InvoiceStatus::Paid),
        )
        .await
        .unwrap();

    let updated = h.store.invoice_records()[0].clone();
    assert_eq!(updated.amount_cents, 10000);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, created.date);
}

#[tokio::test]
async fn test_update_unknown_id_reports_success() {
    let h = harness();
    let mut rx = h.views.subscribe();

    let navigation = h
        .actions
        .update(
            &Uuid::new_v4(),
            draft(&h.customer.id.to_string(), 10.0, InvoiceStatus::Paid),
        )
        .await
        .unwrap();

    assert_eq!(navigation.location(), INVOICES_VIEW);
    assert_eq!(rx.recv().await.unwrap(), INVOICES_VIEW);
    assert!(h.store.invoice_records().is_empty());
}

#[tokio::test]
async fn test_update_failure_propagates() {
    let (actions, _views) = failing_actions();

    let err = actions
        .update(
            &Uuid::new_v4(),
            draft(&Uuid::new_v4().to_string(), 10.0, InvoiceStatus::Paid),
        )
        .await
        .unwrap_err();

    match err {
        DashboardError::Storage { operation, .. } => assert_eq!(operation, "update invoice"),
        other => panic!("expected storage error, got {:?}", other),
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_removes_row_and_invalidates() {
    let h = harness();
    h.actions
        .create(draft(&h.customer.id.to_string(), 45.50, InvoiceStatus::Pending))
        .await
        .unwrap();
    let id = h.store.invoice_records()[0].id;
    let mut rx = h.views.subscribe();

    let receipt = h.actions.delete(&id).await.unwrap();

    assert_eq!(receipt.message, "Deleted Invoice");
    assert!(h.store.invoice_records().is_empty());
    assert_eq!(rx.recv().await.unwrap(), INVOICES_VIEW);
}

#[tokio::test]
async fn test_delete_unknown_id_is_idempotent() {
    let h = harness();

    let receipt = h.actions.delete(&Uuid::new_v4()).await.unwrap();

    assert_eq!(receipt.message, "Deleted Invoice");
}

#[tokio::test]
async fn test_delete_failure_is_soft_and_skips_invalidation() {
    let (actions, views) = failing_actions();
    let mut rx = views.subscribe();

    let failure = actions.delete(&Uuid::new_v4()).await.unwrap_err();

    assert_eq!(failure.message, "Database Error: Failed to Delete Invoice.");
    assert!(failure.cause.to_string().contains("connection reset"));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

// =============================================================================
// End-to-end write scenarios (validation + pipeline)
// =============================================================================

#[tokio::test]
async fn test_valid_submission_inserts_one_row() {
    let h = harness();
    let customer_id = h.customer.id.to_string();

    let fields = form(&[
        ("customerId", customer_id.as_str()),
        ("amount", "45.50"),
        ("status", "pending"),
    ]);
    let draft = validate_invoice(&fields).unwrap();
    h.actions.create(draft).await.unwrap();

    let records = h.store.invoice_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount_cents, 4550);
    assert_eq!(records[0].status, InvoiceStatus::Pending);
    assert_eq!(records[0].date, Utc::now().date_naive());
}

#[tokio::test]
async fn test_invalid_submission_never_reaches_the_store() {
    let h = harness();
    let customer_id = h.customer.id.to_string();

    let fields = form(&[
        ("customerId", customer_id.as_str()),
        ("amount", "-5"),
        ("status", "paid"),
    ]);
    let errors = validate_invoice(&fields).unwrap_err();

    assert_eq!(
        errors.messages()["amount"],
        vec!["Please enter an amount greater than $0."]
    );
    assert!(h.store.invoice_records().is_empty());
}

#[tokio::test]
async fn test_created_invoice_is_readable_through_the_store() {
    let h = harness();
    h.actions
        .create(draft(&h.customer.id.to_string(), 19.99, InvoiceStatus::Paid))
        .await
        .unwrap();
    let id = h.store.invoice_records()[0].id;

    let edit = h.store.invoice_by_id(&id).await.unwrap().unwrap();
    assert_eq!(edit.amount, 19.99);
    assert_eq!(edit.status, InvoiceStatus::Paid);
    assert_eq!(edit.customer_id, h.customer.id);

    let latest = h.store.latest_invoices().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].amount, "$19.99");
    assert_eq!(latest[0].name, "Acme Corp");
}

#[tokio::test]
async fn test_concurrent_creates_are_independent() {
    let h = harness();
    let customer_id = h.customer.id.to_string();

    let mut handles = Vec::new();
    for i in 1..=4u32 {
        let actions = h.actions.clone();
        let customer_id = customer_id.clone();
        handles.push(tokio::spawn(async move {
            actions
                .create(InvoiceDraft {
                    customer_id,
                    amount: f64::from(i),
                    status: InvoiceStatus::Pending,
                })
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.store.invoice_records().len(), 4);
}

#[tokio::test]
async fn test_dates_are_immutable_iso_dates() {
    let h = harness();
    h.actions
        .create(draft(&h.customer.id.to_string(), 1.0, InvoiceStatus::Pending))
        .await
        .unwrap();

    let stored: NaiveDate = h.store.invoice_records()[0].date;
    // ISO YYYY-MM-DD rendering
    assert_eq!(stored.to_string().len(), 10);
    assert_eq!(stored, Utc::now().date_naive());
}
