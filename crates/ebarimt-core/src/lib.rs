//! # ebarimt-core: Pure Domain Logic for the eBarimt Integration
//!
//! Everything needed to turn an ERP invoice snapshot into a tax-authority
//! receipt payload, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     eBarimt Integration Data Flow                       │
//! │                                                                         │
//! │  Host framework event (invoice submitted)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ ebarimt-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  payload  │  │   error   │  │   │
//! │  │   │ ReceiptLog│  │   Money   │  │  builder  │  │  CoreError│  │   │
//! │  │   │ BillType  │  │  VAT math │  │ StockLine │  │ Validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ebarimt-client (HTTP) / ebarimt-db (SQLite) / ebarimt-workflow        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ReceiptLog, Settings, ProductCode, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`payload`] - Receipt payload builder (the deterministic core)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same document snapshot + same reference tables
//!    = byte-identical payload, every time
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in möngö (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod payload;
pub mod types;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payload::{build_receipt_payload, PaymentLine, ReceiptPayload, StockLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Standard Mongolian VAT rate in basis points (10%).
pub const STANDARD_VAT_BPS: u32 = 1000;

/// Ulaanbaatar city tax rate in basis points (2%).
///
/// Applies to alcohol, tobacco and fuel line items whose product code is
/// flagged as city-tax applicable.
pub const CITY_TAX_BPS: u32 = 200;

/// Default unit of measure sent when an item row carries none.
///
/// "ш" (shirheg) is the eBarimt convention for "piece".
pub const DEFAULT_MEASURE_UNIT: &str = "ш";
