use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tinylink_core::error::StorageError;
use tinylink_core::repository::{LinkStore, OwnedLink, Ownership, OwnershipStore, Result, ShortLink};
use tinylink_core::{ShortCode, UserId};

/// MySQL implementation of the storage contracts.
///
/// The `urls` table carries the primary key on `code` and the unique
/// index on `normalized_url`; both surface as
/// [`StorageError::Conflict`], which the allocation engine interprets as
/// a benign creation race. Timestamps are stored as unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool and
    /// applying the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_timestamp(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds)
        .map_err(|e| StorageError::InvalidData(format!("invalid timestamp '{seconds}': {e}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn link_from_row(row: &MySqlRow) -> Result<ShortLink> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let normalized_url: String = row.try_get("normalized_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(ShortLink {
        code: ShortCode::new_unchecked(code),
        normalized_url,
        created_at: parse_timestamp(created_at)?,
    })
}

#[async_trait]
impl LinkStore for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        let row = sqlx::query(
            r#"
            SELECT code, normalized_url, created_at
            FROM urls
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn get_by_normalized_url(&self, normalized_url: &str) -> Result<Option<ShortLink>> {
        let row = sqlx::query(
            r#"
            SELECT code, normalized_url, created_at
            FROM urls
            WHERE normalized_url = ?
            LIMIT 1
            "#,
        )
        .bind(normalized_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM urls
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn insert_with_owner(&self, link: &ShortLink, owner: &Ownership) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO urls (code, normalized_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(link.code.as_str())
        .bind(link.normalized_url.as_str())
        .bind(link.created_at.as_second())
        .execute(&mut *tx)
        .await;

        if let Err(err) = result {
            return Err(if is_unique_violation(&err) {
                StorageError::Conflict(link.normalized_url.clone())
            } else {
                map_sqlx_error(err)
            });
        }

        sqlx::query(
            r#"
            INSERT INTO user_urls (user_id_lower, code, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(owner.user_id.as_str())
        .bind(owner.code.as_str())
        .bind(owner.created_at.as_second())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl OwnershipStore for MySqlRepository {
    async fn ownership_exists(&self, user: &UserId, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM user_urls
            WHERE user_id_lower = ? AND code = ?
            LIMIT 1
            "#,
        )
        .bind(user.as_str())
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn insert_ownership(&self, owner: &Ownership) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_urls (user_id_lower, code, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(owner.user_id.as_str())
        .bind(owner.code.as_str())
        .bind(owner.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(format!(
                "{}/{}",
                owner.user_id, owner.code
            ))),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete_ownership(&self, user: &UserId, code: &ShortCode) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_urls
            WHERE user_id_lower = ? AND code = ?
            "#,
        )
        .bind(user.as_str())
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<OwnedLink>> {
        let rows = sqlx::query(
            r#"
            SELECT uu.code, u.normalized_url, uu.created_at
            FROM user_urls uu
            JOIN urls u ON u.code = uu.code
            WHERE uu.user_id_lower = ?
            ORDER BY uu.created_at DESC, uu.code ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let code: String = row.try_get("code").map_err(map_sqlx_error)?;
                let normalized_url: String =
                    row.try_get("normalized_url").map_err(map_sqlx_error)?;
                let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
                Ok(OwnedLink {
                    code: ShortCode::new_unchecked(code),
                    normalized_url,
                    created_at: parse_timestamp(created_at)?,
                })
            })
            .collect()
    }
}
