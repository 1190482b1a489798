//! # Product Code Repository
//!
//! Storage for the GS1 Mongolia classification table with per-product
//! tax configuration (VAT type, city tax, excise).
//!
//! The payload builder reads this table to annotate invoice lines; a
//! missing code is not an error there (the line falls back to the
//! STANDARD rate), so lookups return `Option` rather than failing.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use ebarimt_core::{ProductCode, VatType};

const CODE_COLUMNS: &str = "classification_code, name_mn, name_en, vat_type, \
     city_tax_applicable, excise_type, oat_product_code";

/// Repository for product code database operations.
#[derive(Debug, Clone)]
pub struct ProductCodeRepository {
    pool: SqlitePool,
}

impl ProductCodeRepository {
    /// Creates a new ProductCodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductCodeRepository { pool }
    }

    /// Gets a product code record by classification code.
    pub async fn get(&self, classification_code: &str) -> DbResult<Option<ProductCode>> {
        let sql = format!(
            "SELECT {CODE_COLUMNS} FROM product_codes WHERE classification_code = ?1"
        );
        let code = sqlx::query_as::<_, ProductCode>(&sql)
            .bind(classification_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(code)
    }

    /// Loads the records for a set of classification codes, keyed by code.
    ///
    /// Codes with no record are simply absent from the map.
    pub async fn get_many(&self, codes: &[String]) -> DbResult<HashMap<String, ProductCode>> {
        let mut map = HashMap::with_capacity(codes.len());
        for code in codes {
            if map.contains_key(code) {
                continue;
            }
            if let Some(record) = self.get(code).await? {
                map.insert(code.clone(), record);
            }
        }
        Ok(map)
    }

    /// Inserts or replaces a product code record.
    pub async fn upsert(&self, code: &ProductCode) -> DbResult<()> {
        debug!(classification_code = %code.classification_code, "Upserting product code");

        sqlx::query(
            "INSERT INTO product_codes ( \
                classification_code, name_mn, name_en, vat_type, \
                city_tax_applicable, excise_type, oat_product_code \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT (classification_code) DO UPDATE SET \
                name_mn = excluded.name_mn, \
                name_en = excluded.name_en, \
                vat_type = excluded.vat_type, \
                city_tax_applicable = excluded.city_tax_applicable, \
                excise_type = excluded.excise_type, \
                oat_product_code = excluded.oat_product_code",
        )
        .bind(&code.classification_code)
        .bind(&code.name_mn)
        .bind(&code.name_en)
        .bind(code.vat_type)
        .bind(code.city_tax_applicable)
        .bind(code.excise_type)
        .bind(&code.oat_product_code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Upserts a batch of records, used by the fixture import.
    ///
    /// Returns the number of records written.
    pub async fn upsert_many(&self, codes: &[ProductCode]) -> DbResult<usize> {
        for code in codes {
            self.upsert(code).await?;
        }
        debug!(count = codes.len(), "Product code batch upserted");
        Ok(codes.len())
    }

    /// Sets the VAT type for a classification code, creating a bare
    /// record when none exists yet.
    ///
    /// Used by the tax code sync: the authority publishes which codes
    /// are ZERO or EXEMPT; everything else stays STANDARD.
    pub async fn set_vat_type(&self, classification_code: &str, vat_type: VatType) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO product_codes (classification_code, vat_type) \
             VALUES (?1, ?2) \
             ON CONFLICT (classification_code) DO UPDATE SET \
                vat_type = excluded.vat_type",
        )
        .bind(classification_code)
        .bind(vat_type)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Total number of product code records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_codes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use ebarimt_core::ExciseType;

    async fn repo() -> ProductCodeRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.product_codes()
    }

    fn beer() -> ProductCode {
        ProductCode {
            classification_code: "5020220".to_string(),
            name_mn: Some("Шар айраг".to_string()),
            name_en: Some("Beer".to_string()),
            vat_type: VatType::Standard,
            city_tax_applicable: true,
            excise_type: Some(ExciseType::Alcohol),
            oat_product_code: Some("4".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = repo().await;
        repo.upsert(&beer()).await.unwrap();

        let stored = repo.get("5020220").await.unwrap().unwrap();
        assert_eq!(stored.name_en.as_deref(), Some("Beer"));
        assert!(stored.city_tax_applicable);
        assert!(stored.requires_oat_stamp());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let repo = repo().await;
        repo.upsert(&beer()).await.unwrap();

        let mut updated = beer();
        updated.city_tax_applicable = false;
        repo.upsert(&updated).await.unwrap();

        let stored = repo.get("5020220").await.unwrap().unwrap();
        assert!(!stored.city_tax_applicable);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_code_is_none() {
        let repo = repo().await;
        assert!(repo.get("9999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_vat_type_creates_bare_record() {
        let repo = repo().await;
        repo.set_vat_type("1010101", VatType::Exempt).await.unwrap();

        let stored = repo.get("1010101").await.unwrap().unwrap();
        assert_eq!(stored.vat_type, VatType::Exempt);
        assert_eq!(stored.vat_rate_bps(), 0);
    }

    #[tokio::test]
    async fn test_upsert_many_counts_all_rows() {
        let repo = repo().await;
        let mut vodka = beer();
        vodka.classification_code = "5020221".to_string();
        vodka.name_en = Some("Vodka".to_string());

        let written = repo.upsert_many(&[beer(), vodka]).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let repo = repo().await;
        repo.upsert(&beer()).await.unwrap();

        let map = repo
            .get_many(&["5020220".to_string(), "0000000".to_string()])
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("5020220"));
    }
}
