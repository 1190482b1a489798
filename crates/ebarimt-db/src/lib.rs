//! # ebarimt-db: Database Layer for the eBarimt Integration
//!
//! This crate provides local persistence for the integration: receipt
//! submission logs, the GS1 product code table, payment type mappings
//! and the singleton settings record. It uses SQLite with sqlx for
//! async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      eBarimt Integration Data Flow                      │
//! │                                                                         │
//! │  Workflow (submit / void / retry)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ebarimt-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌─────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │ (embedded)  │  │   │
//! │  │   │               │    │ ReceiptLogRepo │    │             │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductCodeRepo│    │ 001_init.sql│  │   │
//! │  │   │ Connection    │    │ PaymentTypeRepo│    │             │  │   │
//! │  │   │ Management    │    │ SettingsRepo   │    │             │  │   │
//! │  │   └───────────────┘    └────────────────┘    └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                      SQLite Database (WAL mode)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ebarimt_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/ebarimt.db");
//! let db = Database::new(config).await?;
//!
//! let failed = db.receipt_logs().list_failed(&FailedFilter::default(), 100).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::payment_type::PaymentTypeRepository;
pub use repository::product_code::ProductCodeRepository;
pub use repository::receipt_log::{FailedFilter, ReceiptLogRepository};
pub use repository::settings::SettingsRepository;
