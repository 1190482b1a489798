//! # Payment Type Repository
//!
//! Storage for the ERP mode-of-payment to POS payment code mapping.
//!
//! An unmapped mode of payment never fails a submission; the payload
//! builder falls back to the OTHER wire code, so lookups return `Option`.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use ebarimt_core::{PaymentCode, PaymentTypeMapping};

/// Repository for payment type database operations.
#[derive(Debug, Clone)]
pub struct PaymentTypeRepository {
    pool: SqlitePool,
}

impl PaymentTypeRepository {
    /// Creates a new PaymentTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentTypeRepository { pool }
    }

    /// Gets the mapping for one mode of payment.
    pub async fn get(&self, mode_of_payment: &str) -> DbResult<Option<PaymentTypeMapping>> {
        let mapping = sqlx::query_as::<_, PaymentTypeMapping>(
            "SELECT mode_of_payment, payment_code, is_cash \
             FROM payment_types WHERE mode_of_payment = ?1",
        )
        .bind(mode_of_payment)
        .fetch_optional(&self.pool)
        .await?;
        Ok(mapping)
    }

    /// All mappings, keyed by mode of payment.
    pub async fn load_map(&self) -> DbResult<HashMap<String, PaymentTypeMapping>> {
        let mappings = sqlx::query_as::<_, PaymentTypeMapping>(
            "SELECT mode_of_payment, payment_code, is_cash FROM payment_types",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(mappings
            .into_iter()
            .map(|m| (m.mode_of_payment.clone(), m))
            .collect())
    }

    /// Inserts or replaces a mapping.
    pub async fn upsert(&self, mapping: &PaymentTypeMapping) -> DbResult<()> {
        debug!(mode = %mapping.mode_of_payment, "Upserting payment type mapping");

        sqlx::query(
            "INSERT INTO payment_types (mode_of_payment, payment_code, is_cash) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (mode_of_payment) DO UPDATE SET \
                payment_code = excluded.payment_code, \
                is_cash = excluded.is_cash",
        )
        .bind(&mapping.mode_of_payment)
        .bind(mapping.payment_code)
        .bind(mapping.is_cash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seeds the common default mappings, skipping modes that already
    /// have one (a site's manual configuration wins over the defaults).
    pub async fn seed_defaults(&self) -> DbResult<usize> {
        let defaults = [
            ("Cash", PaymentCode::Cash, true),
            ("Card", PaymentCode::Card, false),
            ("Credit Card", PaymentCode::Card, false),
            ("Bank Transfer", PaymentCode::Transfer, false),
            ("QPay", PaymentCode::Transfer, false),
        ];

        let mut seeded = 0;
        for (mode, code, is_cash) in defaults {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO payment_types (mode_of_payment, payment_code, is_cash) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(mode)
            .bind(code)
            .bind(is_cash)
            .execute(&self.pool)
            .await?;
            seeded += result.rows_affected() as usize;
        }

        debug!(seeded, "Seeded default payment type mappings");
        Ok(seeded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
