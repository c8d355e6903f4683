//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PgDashboardStore`], the production implementation of the
//! store traits, backed by a `sqlx::PgPool`.
//!
//! # Schema
//!
//! Four tables: `customers`, `invoices`, `users`, `revenue`. Invoice ids
//! and dates are server-assigned: the id defaults to `gen_random_uuid()`
//! so the INSERT carries exactly the four value parameters, and amounts
//! are stored as integer cents in a `BIGINT` column.
//!
//! All SQL is parameterized with positional `$n` binds. Query text is never
//! assembled from user input; search patterns are bound values.
//!
//! # Pool lifecycle
//!
//! The pool is constructed once at startup via [`connect`], injected into
//! the store, and closed explicitly on shutdown. Each query checks out one
//! connection for its duration and returns it on every exit path.

use crate::config::DatabaseConfig;
use crate::core::auth::User;
use crate::core::customer::{CustomerField, CustomerRow};
use crate::core::invoice::{
    CardData, InvoiceEdit, InvoicePatch, InvoiceRow, InvoiceStatus, LatestInvoice, NewInvoice,
    Revenue,
};
use crate::core::money;
use crate::core::service::{
    CustomerStore, ITEMS_PER_PAGE, InvoiceStore, OverviewStore, UserStore,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Pool and schema management
// ---------------------------------------------------------------------------

/// Connect a new pool using the given configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_url())
        .await
        .with_context(|| {
            format!(
                "Failed to connect to PostgreSQL at {}:{}",
                config.host, config.port
            )
        })
}

/// Apply the required tables (idempotent). Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS customers (
            id UUID NOT NULL PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email TEXT NOT NULL UNIQUE,
            image_url VARCHAR(255) NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create customers table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID NOT NULL PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_id UUID NOT NULL,
            amount BIGINT NOT NULL,
            status VARCHAR(255) NOT NULL,
            date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create invoices table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id UUID NOT NULL PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS revenue (
            month VARCHAR(4) NOT NULL UNIQUE,
            revenue BIGINT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create revenue table")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// PgDashboardStore
// ---------------------------------------------------------------------------

/// Store implementation backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgDashboardStore {
    pool: PgPool,
}

impl PgDashboardStore {
    /// Create a new store over an injected connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_status(value: &str) -> Result<InvoiceStatus> {
    InvoiceStatus::parse(value).ok_or_else(|| anyhow!("unknown invoice status '{}'", value))
}

fn parse_customer_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("invalid customer id '{}'", value))
}

fn search_pattern(query: &str) -> String {
    format!("%{}%", query)
}

#[async_trait]
impl InvoiceStore for PgDashboardStore {
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<()> {
        let customer_id = parse_customer_id(&invoice.customer_id)?;

        sqlx::query(
            "INSERT INTO invoices (customer_id, amount, status, date) VALUES ($1, $2, $3, $4)",
        )
        .bind(customer_id)
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool)
        .await
        .context("Failed to insert invoice")?;

        Ok(())
    }

    async fn update_invoice(&self, id: &Uuid, patch: InvoicePatch) -> Result<()> {
        let customer_id = parse_customer_id(&patch.customer_id)?;

        // No existence check: an id matching no row affects zero rows and
        // is indistinguishable from success.
        sqlx::query("UPDATE invoices SET customer_id = $1, amount = $2, status = $3 WHERE id = $4")
            .bind(customer_id)
            .bind(patch.amount_cents)
            .bind(patch.status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update invoice")?;

        Ok(())
    }

    async fn delete_invoice(&self, id: &Uuid) -> Result<()> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete invoice")?;

        Ok(())
    }

    async fn invoice_by_id(&self, id: &Uuid) -> Result<Option<InvoiceEdit>> {
        let row = sqlx::query_as::<_, (Uuid, Uuid, i64, String)>(
            "SELECT id, customer_id, amount, status FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch invoice")?;

        match row {
            Some((id, customer_id, amount_cents, status)) => Ok(Some(InvoiceEdit {
                id,
                customer_id,
                // Edit form shows dollars, the column stores cents
                amount: money::to_dollars(amount_cents),
                status: parse_status(&status)?,
            })),
            None => Ok(None),
        }
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, Uuid)>(
            "SELECT invoices.amount, customers.name, customers.image_url, customers.email, invoices.id \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             ORDER BY invoices.date DESC \
             LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch the latest invoices")?;

        Ok(rows
            .into_iter()
            .map(|(amount, name, image_url, email, id)| LatestInvoice {
                id,
                name,
                email,
                image_url,
                amount: money::format_usd(amount),
            })
            .collect())
    }

    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceRow>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(ITEMS_PER_PAGE);

        let rows = sqlx::query_as::<_, (Uuid, i64, NaiveDate, String, String, String, String)>(
            "SELECT invoices.id, invoices.amount, invoices.date, invoices.status, \
                    customers.name, customers.email, customers.image_url \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             WHERE customers.name ILIKE $1 \
                OR customers.email ILIKE $1 \
                OR invoices.amount::text ILIKE $1 \
                OR invoices.date::text ILIKE $1 \
                OR invoices.status ILIKE $1 \
             ORDER BY invoices.date DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(search_pattern(query))
        .bind(i64::from(ITEMS_PER_PAGE))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch invoices")?;

        rows.into_iter()
            .map(|(id, amount, date, status, name, email, image_url)| {
                Ok(InvoiceRow {
                    id,
                    amount,
                    date,
                    status: parse_status(&status)?,
                    name,
                    email,
                    image_url,
                })
            })
            .collect()
    }

    async fn invoice_pages(&self, query: &str) -> Result<u32> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) \
             FROM invoices \
             JOIN customers ON invoices.customer_id = customers.id \
             WHERE customers.name ILIKE $1 \
                OR customers.email ILIKE $1 \
                OR invoices.amount::text ILIKE $1 \
                OR invoices.date::text ILIKE $1 \
                OR invoices.status ILIKE $1",
        )
        .bind(search_pattern(query))
        .fetch_one(&self.pool)
        .await
        .context("Failed to fetch total number of invoices")?;

        Ok((count as u32).div_ceil(ITEMS_PER_PAGE))
    }
}

#[async_trait]
impl OverviewStore for PgDashboardStore {
    async fn revenue(&self) -> Result<Vec<Revenue>> {
        let rows = sqlx::query_as::<_, (String, i64)>("SELECT month, revenue FROM revenue")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch revenue data")?;

        Ok(rows
            .into_iter()
            .map(|(month, revenue)| Revenue { month, revenue })
            .collect())
    }

    async fn card_data(&self) -> Result<CardData> {
        let invoice_count =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM invoices").fetch_one(&self.pool);
        let customer_count =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM customers").fetch_one(&self.pool);
        let totals = sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
                COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint, \
                COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint \
             FROM invoices",
        )
        .fetch_one(&self.pool);

        let ((invoices,), (customers,), (paid, pending)) =
            tokio::try_join!(invoice_count, customer_count, totals)
                .context("Failed to fetch card data")?;

        Ok(CardData {
            number_of_invoices: invoices,
            number_of_customers: customers,
            total_paid_invoices: money::format_usd(paid),
            total_pending_invoices: money::format_usd(pending),
        })
    }
}

#[async_trait]
impl CustomerStore for PgDashboardStore {
    async fn customers(&self) -> Result<Vec<CustomerField>> {
        let rows =
            sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM customers ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch all customers")?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CustomerField { id, name })
            .collect())
    }

    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerRow>> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, String, i64, i64, i64)>(
            "SELECT \
                customers.id, \
                customers.name, \
                customers.email, \
                customers.image_url, \
                COUNT(invoices.id), \
                COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint, \
                COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint \
             FROM customers \
             LEFT JOIN invoices ON customers.id = invoices.customer_id \
             WHERE customers.name ILIKE $1 \
                OR customers.email ILIKE $1 \
             GROUP BY customers.id, customers.name, customers.email, customers.image_url \
             ORDER BY customers.name ASC",
        )
        .bind(search_pattern(query))
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch customer table")?;

        Ok(rows
            .into_iter()
            .map(
                |(id, name, email, image_url, total_invoices, pending, paid)| CustomerRow {
                    id,
                    name,
                    email,
                    image_url,
                    total_invoices,
                    total_pending: money::format_usd(pending),
                    total_paid: money::format_usd(paid),
                },
            )
            .collect())
    }
}

#[async_trait]
impl UserStore for PgDashboardStore {
    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, (Uuid, String, String, String)>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        Ok(row.map(|(id, name, email, password_hash)| User {
            id,
            name,
            email,
            password_hash,
        }))
    }
}
