//! PostgreSQL store
//!
//! Implements the transition store on PostgreSQL via SQLx. Each commit
//! runs in one transaction; the item update is guarded by the version
//! read at load time, and a partial unique index on active claims backs
//! the one-active-claim-per-claimant rule below the engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, QueryBuilder};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use core_kernel::{ClaimId, CoreError, ItemId, ReportId, UserId};
use domain_claims::{Claim, ClaimLedger, ClaimStatus};
use domain_item::{
    ContactInfo, Coordinates, Item, ItemFilter, ItemParts, ItemStore, Report, ReportReason,
};
use domain_lifecycle::{ClaimWrite, ItemWrite, TransitionStore, TransitionWrite};

/// Creates a connection pool with the defaults the service runs with
pub async fn create_pool(database_url: &str) -> Result<PgPool, CoreError> {
    info!("connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
        .map_err(storage_error)?;
    info!("database connection established");
    Ok(pool)
}

/// PostgreSQL implementation of the transition store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations
    pub async fn migrate(&self) -> Result<(), CoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| CoreError::storage(err.to_string()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const ITEM_COLUMNS: &str = "id, kind, status, title, description, category, location, \
     lat, lng, images, contact_email, contact_phone, police_deposit, monthly_report_url, \
     publisher, resolved, claims_count, version, created_at, updated_at";

const CLAIM_COLUMNS: &str = "id, item_id, claimant, message, status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    kind: String,
    status: String,
    title: String,
    description: String,
    category: String,
    location: String,
    lat: Option<f64>,
    lng: Option<f64>,
    images: Vec<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    police_deposit: bool,
    monthly_report_url: Option<String>,
    publisher: String,
    resolved: bool,
    claims_count: i32,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_item(self) -> Result<Item, CoreError> {
        let kind = self.kind.parse().map_err(row_error)?;
        let status = self.status.parse().map_err(row_error)?;
        let coordinates = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        let contact = match (self.contact_email, self.contact_phone) {
            (None, None) => None,
            (email, phone) => Some(ContactInfo { email, phone }),
        };

        Ok(Item::restore(ItemParts {
            id: ItemId::from_uuid(self.id),
            kind,
            status,
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            coordinates,
            images: self.images,
            contact,
            police_deposit: self.police_deposit,
            monthly_report_url: self.monthly_report_url,
            publisher: UserId::new(self.publisher),
            resolved: self.resolved,
            claims_count: self.claims_count as u32,
            version: self.version as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

#[derive(Debug, FromRow)]
struct ClaimRow {
    id: Uuid,
    item_id: Uuid,
    claimant: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClaimRow {
    fn into_claim(self) -> Result<Claim, CoreError> {
        let status: ClaimStatus = self.status.parse().map_err(row_error)?;
        Ok(Claim {
            id: ClaimId::from_uuid(self.id),
            item_id: ItemId::from_uuid(self.item_id),
            claimant: UserId::new(self.claimant),
            message: self.message,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReportRow {
    id: Uuid,
    item_id: Uuid,
    reporter: String,
    reason: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self) -> Result<Report, CoreError> {
        let reason: ReportReason = self.reason.parse().map_err(row_error)?;
        Ok(Report {
            id: ReportId::from_uuid(self.id),
            item_id: ItemId::from_uuid(self.item_id),
            reporter: UserId::new(self.reporter),
            reason,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, CoreError> {
        let row: Option<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;
        row.map(ItemRow::into_item).transpose()
    }

    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, CoreError> {
        let mut query = QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE TRUE"));

        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter
                .statuses
                .iter()
                .map(|status| status.as_str().to_string())
                .collect();
            query.push(" AND status = ANY(");
            query.push_bind(statuses);
            query.push(")");
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ");
            query.push_bind(kind.as_str());
        }
        if let Some(ref category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category.clone());
        }
        if let Some(ref location) = filter.location {
            query.push(" AND location ILIKE ");
            query.push_bind(like_pattern(location));
        }
        if let Some(ref text) = filter.text {
            let pattern = like_pattern(text);
            query.push(" AND (title ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR description ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }
        if let Some(ref publisher) = filter.publisher {
            query.push(" AND publisher = ");
            query.push_bind(publisher.as_str().to_string());
        }
        if let Some(police) = filter.police_deposit {
            query.push(" AND police_deposit = ");
            query.push_bind(police);
        }
        query.push(" ORDER BY created_at DESC");

        let rows: Vec<ItemRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        rows.into_iter().map(ItemRow::into_item).collect()
    }

    async fn add_report(&self, report: &Report) -> Result<(), CoreError> {
        let result = sqlx::query(
            "INSERT INTO reports (id, item_id, reporter, reason, description, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(report.id.as_uuid())
        .bind(report.item_id.as_uuid())
        .bind(report.reporter.as_str())
        .bind(report.reason.as_str())
        .bind(&report.description)
        .bind(report.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // FK violation means the reported item is gone
            Err(err) if db_error_code(&err).as_deref() == Some("23503") => {
                Err(CoreError::not_found("Item", report.item_id.to_string()))
            }
            Err(err) => Err(storage_error(err)),
        }
    }

    async fn list_reports(&self, item_id: ItemId) -> Result<Vec<Report>, CoreError> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            "SELECT id, item_id, reporter, reason, description, created_at \
             FROM reports WHERE item_id = $1 ORDER BY created_at ASC",
        )
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.into_iter().map(ReportRow::into_report).collect()
    }
}

#[async_trait]
impl ClaimLedger for PgStore {
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, CoreError> {
        let row: Option<ClaimRow> =
            sqlx::query_as(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;
        row.map(ClaimRow::into_claim).transpose()
    }

    async fn list_claims(&self, item_id: ItemId) -> Result<Vec<Claim>, CoreError> {
        let rows: Vec<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE item_id = $1 ORDER BY created_at ASC"
        ))
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.into_iter().map(ClaimRow::into_claim).collect()
    }

    async fn list_claims_by_claimant(&self, claimant: &UserId) -> Result<Vec<Claim>, CoreError> {
        let rows: Vec<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE claimant = $1 ORDER BY created_at DESC"
        ))
        .bind(claimant.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.into_iter().map(ClaimRow::into_claim).collect()
    }
}

#[async_trait]
impl TransitionStore for PgStore {
    async fn commit(&self, write: TransitionWrite) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        match write.item {
            Some(ItemWrite::Insert(item)) => {
                let result = sqlx::query(
                    "INSERT INTO items (id, kind, status, title, description, category, \
                     location, lat, lng, images, contact_email, contact_phone, \
                     police_deposit, monthly_report_url, publisher, resolved, \
                     claims_count, version, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20)",
                )
                .bind(item.id().as_uuid())
                .bind(item.kind().as_str())
                .bind(item.status().as_str())
                .bind(item.title())
                .bind(item.description())
                .bind(item.category())
                .bind(item.location())
                .bind(item.coordinates().map(|c| c.lat))
                .bind(item.coordinates().map(|c| c.lng))
                .bind(item.images())
                .bind(item.contact().and_then(|c| c.email.clone()))
                .bind(item.contact().and_then(|c| c.phone.clone()))
                .bind(item.police_deposit())
                .bind(item.monthly_report_url())
                .bind(item.publisher().as_str())
                .bind(item.is_resolved())
                .bind(item.claims_count() as i32)
                .bind(item.version() as i32)
                .bind(item.created_at())
                .bind(item.updated_at())
                .execute(&mut *tx)
                .await;
                map_write_result(result, "item insert")?;
            }
            Some(ItemWrite::Update {
                item,
                expected_version,
            }) => {
                let result = sqlx::query(
                    "UPDATE items SET status = $2, title = $3, description = $4, \
                     category = $5, location = $6, resolved = $7, claims_count = $8, \
                     version = $9, updated_at = $10 \
                     WHERE id = $1 AND version = $11",
                )
                .bind(item.id().as_uuid())
                .bind(item.status().as_str())
                .bind(item.title())
                .bind(item.description())
                .bind(item.category())
                .bind(item.location())
                .bind(item.is_resolved())
                .bind(item.claims_count() as i32)
                .bind(item.version() as i32)
                .bind(item.updated_at())
                .bind(expected_version as i32)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;

                if result.rows_affected() == 0 {
                    // Either gone or moved past the guarded version
                    return Err(CoreError::conflict(format!(
                        "item {} changed concurrently",
                        item.id()
                    )));
                }
            }
            Some(ItemWrite::Delete(id)) => {
                // Claims and reports go with the FK cascade
                let result = sqlx::query("DELETE FROM items WHERE id = $1")
                    .bind(id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_error)?;
                if result.rows_affected() == 0 {
                    return Err(CoreError::not_found("Item", id.to_string()));
                }
            }
            None => {}
        }

        for claim_write in write.claims {
            match claim_write {
                ClaimWrite::Insert(claim) => {
                    let result = sqlx::query(
                        "INSERT INTO claims (id, item_id, claimant, message, status, \
                         created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
                    )
                    .bind(claim.id.as_uuid())
                    .bind(claim.item_id.as_uuid())
                    .bind(claim.claimant.as_str())
                    .bind(&claim.message)
                    .bind(claim.status.as_str())
                    .bind(claim.created_at)
                    .bind(claim.updated_at)
                    .execute(&mut *tx)
                    .await;
                    map_write_result(result, "claim insert")?;
                }
                ClaimWrite::Update(claim) => {
                    sqlx::query(
                        "UPDATE claims SET status = $2, updated_at = $3 WHERE id = $1",
                    )
                    .bind(claim.id.as_uuid())
                    .bind(claim.status.as_str())
                    .bind(claim.updated_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_error)?;
                }
                ClaimWrite::Delete(id) => {
                    sqlx::query("DELETE FROM claims WHERE id = $1")
                        .bind(id.as_uuid())
                        .execute(&mut *tx)
                        .await
                        .map_err(storage_error)?;
                }
            }
        }

        tx.commit().await.map_err(storage_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(storage_error)
    }
}

/// Maps constraint violations to the domain errors they protect
fn map_write_result(
    result: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
    context: &str,
) -> Result<(), CoreError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if db_error_code(&err).as_deref() == Some("23505") => Err(CoreError::conflict(
            format!("{context} violates a uniqueness rule"),
        )),
        // FK violation means the parent row is gone
        Err(err) if db_error_code(&err).as_deref() == Some("23503") => Err(CoreError::not_found(
            "Item",
            format!("referenced by {context}"),
        )),
        Err(err) => Err(storage_error(err)),
    }
}

/// Builds a contains-pattern with LIKE metacharacters escaped
///
/// `ItemFilter::matches` treats the search terms as plain substrings, so
/// `%`, `_` and the escape character itself must match literally here too.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn db_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::storage(err.to_string())
}

fn row_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::storage(format!("stored row failed to decode: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("wool scarf"), "%wool scarf%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("lost_and_found"), "%lost\\_and\\_found%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
