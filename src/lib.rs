// Expense Tracker - Core Library
// Validated in-memory collections for expenses and stores, plus their REST API

pub mod attributes;  // Field definitions & schemas
pub mod schema;      // Payload validation
pub mod collection;  // Ordered in-memory record storage
pub mod entities;    // Expense & store services
pub mod error;
pub mod config;

#[cfg(feature = "server")]
pub mod api;         // HTTP layer (axum)

// Re-export commonly used types
pub use attributes::{FieldDefinition, FieldType, Schema, ValidationRule};
pub use schema::{validate, validate_into, FieldIssue, ValidationError};
pub use collection::Collection;
pub use entities::{Expense, ExpenseService, NewExpense, Store, StoreService};
pub use error::{ServiceError, ServiceResult};
pub use config::ServerConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
