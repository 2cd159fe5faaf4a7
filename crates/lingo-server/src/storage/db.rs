//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lingo_core::ports::TranslationStore;
use lingo_core::{
    ExportMap, LingoError, NewTranslation, PageRequest, TagSet, TranslationEntry,
    TranslationFilter, TranslationId, TranslationPatch, User,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Path value selecting a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

const TRANSLATION_COLUMNS: &str = r#"id, locale, "key", value, tags, created_at, updated_at"#;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        if database_path == IN_MEMORY {
            return Self::in_memory().await;
        }

        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Every connection to `:memory:` is its own database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        tracing::info!("Opening in-memory SQLite database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory SQLite options")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Translations table, one row per (locale, key)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                locale TEXT NOT NULL,
                "key" TEXT NOT NULL,
                value TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (locale, "key")
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // User operations

    /// Fails with `LingoError::ConstraintViolation` when the email is taken.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(password_hash)
        .bind(user.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => anyhow::Error::new(
                LingoError::ConstraintViolation("email already registered".to_string()),
            ),
            _ => e.into(),
        })?;

        Ok(user)
    }

    /// User plus stored password hash
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at FROM users WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| {
            let hash = r.password_hash.clone();
            (r.into(), hash)
        }))
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at FROM users WHERE id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }
}

#[async_trait]
impl TranslationStore for Database {
    async fn insert(&self, entry: &NewTranslation) -> lingo_core::Result<TranslationEntry> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO translations (locale, "key", value, tags, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING {TRANSLATION_COLUMNS}
            "#
        );

        let row: TranslationRow = sqlx::query_as(&sql)
            .bind(&entry.locale)
            .bind(&entry.key)
            .bind(&entry.value)
            .bind(serde_json::to_string(&entry.tags)?)
            .bind(now)
            .fetch_one(&*self.pool)
            .await
            .map_err(store_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: TranslationId) -> lingo_core::Result<Option<TranslationEntry>> {
        let sql = format!("SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = ?1");

        let row: Option<TranslationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_error)?;

        row.map(TranslationEntry::try_from).transpose()
    }

    async fn update_by_id(
        &self,
        id: TranslationId,
        patch: &TranslationPatch,
    ) -> lingo_core::Result<TranslationEntry> {
        let tags = patch.tags.as_ref().map(serde_json::to_string).transpose()?;
        let sql = format!(
            r#"
            UPDATE translations
            SET locale = COALESCE(?1, locale),
                "key" = COALESCE(?2, "key"),
                value = COALESCE(?3, value),
                tags = COALESCE(?4, tags),
                updated_at = ?5
            WHERE id = ?6
            RETURNING {TRANSLATION_COLUMNS}
            "#
        );

        let row: Option<TranslationRow> = sqlx::query_as(&sql)
            .bind(&patch.locale)
            .bind(&patch.key)
            .bind(&patch.value)
            .bind(tags)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_error)?;

        row.ok_or(LingoError::NotFound(id))?.try_into()
    }

    async fn query_filtered(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> lingo_core::Result<(Vec<TranslationEntry>, u64)> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM translations");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(store_error)?;

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {TRANSLATION_COLUMNS} FROM translations"));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<TranslationRow> = select
            .build_query_as()
            .fetch_all(&*self.pool)
            .await
            .map_err(store_error)?;

        let items = rows
            .into_iter()
            .map(TranslationEntry::try_from)
            .collect::<lingo_core::Result<Vec<_>>>()?;

        Ok((items, total.max(0) as u64))
    }

    async fn query_by_locale(&self, locale: &str) -> lingo_core::Result<ExportMap> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT "key", value FROM translations WHERE locale = ?1 ORDER BY id
            "#,
        )
        .bind(locale)
        .fetch_all(&*self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().collect())
    }
}

/// `key` is a literal, case-sensitive substring; `tag` must be an element of
/// the JSON tag array.
fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &TranslationFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(locale) = &filter.locale {
        query.push(" AND locale = ").push_bind(locale.clone());
    }
    if let Some(key) = &filter.key {
        query
            .push(r#" AND instr("key", "#)
            .push_bind(key.clone())
            .push(") > 0");
    }
    if let Some(tag) = &filter.tag {
        query
            .push(" AND EXISTS (SELECT 1 FROM json_each(translations.tags) WHERE json_each.value = ")
            .push_bind(tag.clone())
            .push(")");
    }
}

fn store_error(e: sqlx::Error) -> LingoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => LingoError::ConstraintViolation(
            "a translation with this key already exists for the locale".to_string(),
        ),
        _ => LingoError::Database(e.to_string()),
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct TranslationRow {
    id: i64,
    locale: String,
    key: String,
    value: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TranslationRow> for TranslationEntry {
    type Error = LingoError;

    fn try_from(r: TranslationRow) -> lingo_core::Result<Self> {
        let tags: TagSet = serde_json::from_str(&r.tags).map_err(|e| {
            LingoError::Serialization(format!("corrupt tags for translation {}: {}", r.id, e))
        })?;

        Ok(TranslationEntry {
            id: r.id,
            locale: r.locale,
            key: r.key,
            value: r.value,
            tags,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            name: r.name,
            created_at: r.created_at,
        }
    }
}
