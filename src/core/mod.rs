//! Core module containing the domain model, validation, errors, and the
//! seams the rest of the service is wired through

pub mod auth;
pub mod customer;
pub mod error;
pub mod invoice;
pub mod money;
pub mod revalidate;
pub mod service;
pub mod validation;

pub use auth::{Credentials, User};
pub use customer::{Customer, CustomerField, CustomerRow};
pub use error::{ConfigError, DashboardError, ErrorResponse};
pub use invoice::{
    CardData, InvoiceDraft, InvoiceEdit, InvoicePatch, InvoiceRecord, InvoiceRow, InvoiceStatus,
    LatestInvoice, NewInvoice, Revenue,
};
pub use revalidate::{INVOICES_VIEW, Navigation, RevalidateBus};
pub use service::{CustomerStore, ITEMS_PER_PAGE, InvoiceStore, OverviewStore, UserStore};
pub use validation::{FormErrors, Violation, ViolationKind, validate_invoice};
