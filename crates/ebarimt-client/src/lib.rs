//! # ebarimt-client: HTTP Client for the eBarimt Services
//!
//! A stateless wrapper issuing authenticated HTTPS calls to the tax
//! authority, one async method per endpoint, translating HTTP/JSON
//! responses into typed outcomes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      eBarimt Service Families                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ebarimt-client (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌─────────────┐  ┌───────────────────────┐  │   │
//! │  │   │  POS API    │  │ Public API  │  │  ITC Service API      │  │   │
//! │  │   │ receipts    │  │ taxpayer /  │  │  consumer lottery /   │  │   │
//! │  │   │ create/void │  │ barcode /   │  │  foreigner / OAT      │  │   │
//! │  │   │ info        │  │ tax codes   │  │  excise stamps        │  │   │
//! │  │   └─────────────┘  └─────────────┘  └───────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐  │   │
//! │  │   │ OAuth2 token endpoint (password grant, cached Bearer)   │  │   │
//! │  │   └─────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcome Model
//!
//! Every call resolves to `ClientResult<ApiOutcome<T>>`:
//! - `Ok(ApiOutcome::Success(T))` - the remote accepted the request
//! - `Ok(ApiOutcome::Rejected(_))` - the remote explicitly refused it
//!   (business rule, e.g. "TIN not found"); the message is preserved
//!   verbatim and this is NOT an error
//! - `Err(ClientError::...)` - transport failure: timeout, connection
//!   refused, non-2xx without a parseable body, malformed JSON
//!
//! The client performs no retry and no de-duplication; both are workflow
//! decisions made on top of the receipt log.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::EbarimtClient;
pub use config::ClientConfig;
pub use error::{ApiOutcome, ClientError, ClientResult, RemoteRejection};
