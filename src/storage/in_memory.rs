//! In-memory store implementation for testing and development
//!
//! Implements the same trait contract as the PostgreSQL backend over
//! `RwLock<HashMap>` tables, including the case-insensitive listing search
//! and six-row pagination, so tests can exercise the full request path
//! without a database.

use crate::core::auth::User;
use crate::core::customer::{Customer, CustomerField, CustomerRow};
use crate::core::invoice::{
    CardData, InvoiceEdit, InvoicePatch, InvoiceRecord, InvoiceRow, InvoiceStatus, LatestInvoice,
    NewInvoice, Revenue,
};
use crate::core::money;
use crate::core::service::{
    CustomerStore, ITEMS_PER_PAGE, InvoiceStore, OverviewStore, UserStore,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory dashboard store
///
/// Uses RwLock for thread-safe access. Cloning shares the underlying tables.
#[derive(Clone)]
pub struct InMemoryDashboardStore {
    invoices: Arc<RwLock<HashMap<Uuid, InvoiceRecord>>>,
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    revenue: Arc<RwLock<Vec<Revenue>>>,
}

impl InMemoryDashboardStore {
    pub fn new() -> Self {
        Self {
            invoices: Arc::new(RwLock::new(HashMap::new())),
            customers: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            revenue: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed a customer, returning the generated row
    pub fn add_customer(&self, name: &str, email: &str, image_url: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: image_url.to_string(),
        };
        self.customers
            .write()
            .expect("customers lock")
            .insert(customer.id, customer.clone());
        customer
    }

    /// Seed a user with an already-hashed password
    pub fn add_user(&self, name: &str, email: &str, password_hash: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        self.users
            .write()
            .expect("users lock")
            .insert(user.id, user.clone());
        user
    }

    /// Seed one revenue row
    pub fn add_revenue(&self, month: &str, revenue: i64) {
        self.revenue.write().expect("revenue lock").push(Revenue {
            month: month.to_string(),
            revenue,
        });
    }

    /// Snapshot of all invoice rows (test inspection)
    pub fn invoice_records(&self) -> Vec<InvoiceRecord> {
        self.invoices
            .read()
            .expect("invoices lock")
            .values()
            .cloned()
            .collect()
    }

    /// Invoice rows joined with their customer, filtered and sorted the way
    /// the listing queries expect (match anywhere, case-insensitive,
    /// newest first).
    fn matching_rows(&self, query: &str) -> Result<Vec<InvoiceRow>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let needle = query.to_lowercase();
        let mut rows: Vec<InvoiceRow> = invoices
            .values()
            .filter_map(|invoice| {
                let customer = customers.get(&invoice.customer_id)?;
                Some(InvoiceRow {
                    id: invoice.id,
                    amount: invoice.amount_cents,
                    date: invoice.date,
                    status: invoice.status,
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    image_url: customer.image_url.clone(),
                })
            })
            .filter(|row| {
                needle.is_empty()
                    || row.name.to_lowercase().contains(&needle)
                    || row.email.to_lowercase().contains(&needle)
                    || row.amount.to_string().contains(&needle)
                    || row.date.to_string().contains(&needle)
                    || row.status.as_str().contains(&needle)
            })
            .collect();

        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }
}

impl Default for InMemoryDashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryDashboardStore {
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<()> {
        let customer_id = Uuid::parse_str(&invoice.customer_id)
            .with_context(|| format!("invalid customer id '{}'", invoice.customer_id))?;

        let record = InvoiceRecord {
            id: Uuid::new_v4(),
            customer_id,
            amount_cents: invoice.amount_cents,
            status: invoice.status,
            date: invoice.date,
        };

        self.invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .insert(record.id, record);

        Ok(())
    }

    async fn update_invoice(&self, id: &Uuid, patch: InvoicePatch) -> Result<()> {
        let customer_id = Uuid::parse_str(&patch.customer_id)
            .with_context(|| format!("invalid customer id '{}'", patch.customer_id))?;

        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        // Matches the SQL backend: an unknown id touches zero rows and is
        // not an error.
        if let Some(record) = invoices.get_mut(id) {
            record.customer_id = customer_id;
            record.amount_cents = patch.amount_cents;
            record.status = patch.status;
        }

        Ok(())
    }

    async fn delete_invoice(&self, id: &Uuid) -> Result<()> {
        self.invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .remove(id);

        Ok(())
    }

    async fn invoice_by_id(&self, id: &Uuid) -> Result<Option<InvoiceEdit>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices.get(id).map(|record| InvoiceEdit {
            id: record.id,
            customer_id: record.customer_id,
            amount: money::to_dollars(record.amount_cents),
            status: record.status,
        }))
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        let rows = self.matching_rows("")?;

        Ok(rows
            .into_iter()
            .take(5)
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                amount: money::format_usd(row.amount),
            })
            .collect())
    }

    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceRow>> {
        let offset = page.saturating_sub(1) as usize * ITEMS_PER_PAGE as usize;

        Ok(self
            .matching_rows(query)?
            .into_iter()
            .skip(offset)
            .take(ITEMS_PER_PAGE as usize)
            .collect())
    }

    async fn invoice_pages(&self, query: &str) -> Result<u32> {
        let count = self.matching_rows(query)?.len() as u32;
        Ok(count.div_ceil(ITEMS_PER_PAGE))
    }
}

#[async_trait]
impl OverviewStore for InMemoryDashboardStore {
    async fn revenue(&self) -> Result<Vec<Revenue>> {
        Ok(self
            .revenue
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?
            .clone())
    }

    async fn card_data(&self) -> Result<CardData> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let paid: i64 = invoices
            .values()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .map(|i| i.amount_cents)
            .sum();
        let pending: i64 = invoices
            .values()
            .filter(|i| i.status == InvoiceStatus::Pending)
            .map(|i| i.amount_cents)
            .sum();

        Ok(CardData {
            number_of_invoices: invoices.len() as i64,
            number_of_customers: customers.len() as i64,
            total_paid_invoices: money::format_usd(paid),
            total_pending_invoices: money::format_usd(pending),
        })
    }
}

#[async_trait]
impl CustomerStore for InMemoryDashboardStore {
    async fn customers(&self) -> Result<Vec<CustomerField>> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut fields: Vec<CustomerField> = customers
            .values()
            .map(|c| CustomerField {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();

        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fields)
    }

    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerRow>> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let needle = query.to_lowercase();
        let mut rows: Vec<CustomerRow> = customers
            .values()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .map(|c| {
                let mut total_invoices = 0;
                let mut pending = 0;
                let mut paid = 0;
                for invoice in invoices.values().filter(|i| i.customer_id == c.id) {
                    total_invoices += 1;
                    match invoice.status {
                        InvoiceStatus::Pending => pending += invoice.amount_cents,
                        InvoiceStatus::Paid => paid += invoice.amount_cents,
                    }
                }
                CustomerRow {
                    id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    image_url: c.image_url.clone(),
                    total_invoices,
                    total_pending: money::format_usd(pending),
                    total_paid: money::format_usd(paid),
                }
            })
            .collect();

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for InMemoryDashboardStore {
    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(users.values().find(|u| u.email == email).cloned())
    }
}
