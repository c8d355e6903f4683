//! # Ledgerdash
//!
//! An invoice and customer dashboard service: form-driven invoice mutations
//! over PostgreSQL, the read queries behind the dashboard pages, and a
//! credential-checked login.
//!
//! ## Architecture
//!
//! Every invoice mutation flows through one validated-write path:
//!
//! ```text
//! form fields ──▶ validate/coerce ──▶ draft ──▶ parameterized write
//!                      │                              │
//!                      ▼                              ▼
//!              per-field errors            invalidate listing + redirect
//! ```
//!
//! - **Validation failures are data**: a bad submission produces per-field
//!   messages, never an error page.
//! - **Writes are parameterized**: SQL text is constant; every dynamic value
//!   is a positional bind.
//! - **Create/update fail loud, delete fails soft**: a failed insert or
//!   update propagates after logging, a failed delete degrades into an
//!   inline message because the row simply stays visible.
//!
//! Storage sits behind object-safe service traits with a PostgreSQL backend
//! for production and an in-memory backend for tests and development.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledgerdash::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryDashboardStore::new());
//! let state = AppState::from_store(store, RevalidateBus::default());
//! ledgerdash::server::serve("127.0.0.1:3000", state).await?;
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        auth::{Credentials, User},
        customer::{Customer, CustomerField, CustomerRow},
        error::{ConfigError, DashboardError, ErrorResponse},
        invoice::{
            CardData, InvoiceDraft, InvoiceEdit, InvoicePatch, InvoiceRecord, InvoiceRow,
            InvoiceStatus, LatestInvoice, NewInvoice, Revenue,
        },
        revalidate::{INVOICES_VIEW, Navigation, RevalidateBus},
        service::{CustomerStore, ITEMS_PER_PAGE, InvoiceStore, OverviewStore, UserStore},
        validation::{FormErrors, Violation, ViolationKind, validate_invoice},
    };

    // === Actions ===
    pub use crate::actions::{DeleteFailure, DeleteReceipt, InvoiceActions};

    // === Storage ===
    pub use crate::storage::{InMemoryDashboardStore, PgDashboardStore};

    // === Config ===
    pub use crate::config::{AppConfig, DatabaseConfig, ServerConfig};

    // === Server ===
    pub use crate::server::AppState;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use uuid::Uuid;
}
