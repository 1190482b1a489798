//! # Repository Module
//!
//! Database repository implementations for the eBarimt integration.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Workflow operation                                                    │
//! │       │                                                                 │
//! │       │  db.receipt_logs().find_active("Sales Invoice", "INV-001")     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ReceiptLogRepository                                                  │
//! │  ├── create_pending(&self, ...)                                        │
//! │  ├── mark_success(&self, ...)     ← guarded: WHERE status = 'Pending'  │
//! │  ├── mark_voided(&self, ...)      ← guarded: WHERE status = 'Success'  │
//! │  └── list_failed(&self, limit)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! │                                                                         │
//! │  Status transitions carry their precondition into the SQL itself, so  │
//! │  a stale caller can never overwrite a newer state.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod payment_type;
pub mod product_code;
pub mod receipt_log;
pub mod settings;
