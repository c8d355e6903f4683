//! Storage implementations for different backends

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryDashboardStore;
pub use postgres::PgDashboardStore;
