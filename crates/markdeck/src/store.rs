//! Snippet persistence.
//!
//! The [`SnippetStore`] trait is the seam between request handlers and the
//! backing table. [`PgStore`] talks to Postgres through a shared `sqlx`
//! pool; [`MemoryStore`] keeps rows in process for tests and `--ephemeral`
//! runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::Config;

/// Content of the snippet inserted into an empty store.
pub const SEED_CONTENT: &str = "# Hello, World!";

/// Category of the snippet inserted into an empty store.
pub const SEED_CATEGORY: &str = "default";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS markdown (
    id SERIAL PRIMARY KEY,
    content TEXT NOT NULL,
    category TEXT NOT NULL
)";

/// Inserts the seed row only when the table has no rows at all.
const SEED_SQL: &str = "INSERT INTO markdown (content, category) \
     SELECT $1, $2 \
     WHERE NOT EXISTS (SELECT 1 FROM markdown)";

const FETCH_RANDOM_SQL: &str = "SELECT id, content, category FROM markdown \
     WHERE category = $1 \
     ORDER BY RANDOM() \
     LIMIT 1";

const INSERT_SQL: &str = "INSERT INTO markdown (content, category) \
     VALUES ($1, $2) \
     RETURNING id, content, category";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM markdown";

/// A row from the `markdown` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Snippet {
    /// Server-assigned identifier.
    pub id: i32,
    /// Raw Markdown text.
    pub content: String,
    /// Selection label.
    pub category: String,
}

/// A snippet that passed validation and may be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    content: String,
    category: String,
}

impl NewSnippet {
    /// Validate an insert payload. Both fields must contain non-whitespace text.
    pub fn new(
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        let category = category.into();
        if content.trim().is_empty() || category.trim().is_empty() {
            return Err(ValidationError);
        }
        Ok(Self { content, category })
    }

    /// Markdown body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Category label.
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Rejected insert payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("content and category cannot be empty")]
pub struct ValidationError;

/// Store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The connection pool could not be established.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// Creating or seeding the table failed.
    #[error("schema setup failed: {0}")]
    Schema(#[source] sqlx::Error),

    /// No snippet has the requested category.
    #[error("no snippet found in category {category:?}")]
    NotFound {
        /// The category that was requested.
        category: String,
    },

    /// A read failed.
    #[error("error fetching snippet: {0}")]
    Query(#[source] sqlx::Error),

    /// An insert failed.
    #[error("error adding snippet: {0}")]
    Write(#[source] sqlx::Error),
}

/// Storage backend for snippets.
#[async_trait]
pub trait SnippetStore: Send + Sync + 'static {
    /// Create the table if needed and seed it when empty. Returns whether a
    /// seed row was written.
    async fn initialize(&self) -> Result<bool, StoreError>;

    /// Pick one snippet of `category` uniformly at random.
    async fn fetch_random(&self, category: &str) -> Result<Snippet, StoreError>;

    /// Append a snippet and return the stored row.
    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, StoreError>;

    /// Number of stored snippets.
    async fn count(&self) -> Result<i64, StoreError>;
}

/// Postgres-backed store sharing one connection pool across requests.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the connection pool. Fails if the database cannot be reached.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let store =
            Self::connect_with(config.connect_options(), config.db_max_connections).await?;

        tracing::info!(
            db_host = %config.db_host,
            db_name = %config.db_name,
            "database pool connected"
        );

        Ok(store)
    }

    /// Open a pool from explicit connection options.
    pub async fn connect_with(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::Connection)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SnippetStore for PgStore {
    async fn initialize(&self) -> Result<bool, StoreError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Schema)?;

        let seeded = sqlx::query(SEED_SQL)
            .bind(SEED_CONTENT)
            .bind(SEED_CATEGORY)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Schema)?
            .rows_affected()
            > 0;

        Ok(seeded)
    }

    async fn fetch_random(&self, category: &str) -> Result<Snippet, StoreError> {
        sqlx::query_as::<_, Snippet>(FETCH_RANDOM_SQL)
            .bind(category)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?
            .ok_or_else(|| StoreError::NotFound {
                category: category.to_string(),
            })
    }

    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, StoreError> {
        sqlx::query_as::<_, Snippet>(INSERT_SQL)
            .bind(snippet.content())
            .bind(snippet.category())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Write)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(COUNT_SQL)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Query)
    }
}

/// In-process store. Rows live as long as the value does.
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

struct MemoryInner {
    rows: Vec<Snippet>,
    next_id: i32,
    rng: StdRng,
}

impl MemoryStore {
    /// Empty store with an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Empty store with a fixed RNG seed, for reproducible selection.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                rows: Vec::new(),
                next_id: 1,
                rng,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInner {
    fn push(&mut self, content: &str, category: &str) -> Snippet {
        let snippet = Snippet {
            id: self.next_id,
            content: content.to_string(),
            category: category.to_string(),
        };
        self.next_id += 1;
        self.rows.push(snippet.clone());
        snippet
    }
}

#[async_trait]
impl SnippetStore for MemoryStore {
    async fn initialize(&self) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        if !inner.rows.is_empty() {
            return Ok(false);
        }
        inner.push(SEED_CONTENT, SEED_CATEGORY);
        Ok(true)
    }

    async fn fetch_random(&self, category: &str) -> Result<Snippet, StoreError> {
        let mut inner = self.inner.lock();
        let MemoryInner { rows, rng, .. } = &mut *inner;

        let matches: Vec<&Snippet> = rows.iter().filter(|s| s.category == category).collect();
        if matches.is_empty() {
            return Err(StoreError::NotFound {
                category: category.to_string(),
            });
        }

        let pick = rng.random_range(0..matches.len());
        Ok(matches[pick].clone())
    }

    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, StoreError> {
        Ok(self.inner.lock().push(snippet.content(), snippet.category()))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn new_snippet(content: &str, category: &str) -> NewSnippet {
        NewSnippet::new(content, category).unwrap()
    }

    // -- NewSnippet --

    #[test]
    fn new_snippet_accepts_text() {
        let snippet = new_snippet("# Title", "blog");
        assert_eq!(snippet.content(), "# Title");
        assert_eq!(snippet.category(), "blog");
    }

    #[test]
    fn new_snippet_rejects_empty_fields() {
        assert_eq!(NewSnippet::new("", "blog"), Err(ValidationError));
        assert_eq!(NewSnippet::new("# Title", ""), Err(ValidationError));
        assert_eq!(NewSnippet::new("", ""), Err(ValidationError));
    }

    #[test]
    fn new_snippet_rejects_whitespace_only() {
        assert!(NewSnippet::new("  \n\t", "blog").is_err());
        assert!(NewSnippet::new("text", "   ").is_err());
    }

    // -- MemoryStore --

    #[tokio::test]
    async fn initialize_seeds_empty_store_once() {
        let store = MemoryStore::with_seed(1);

        assert!(store.initialize().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);

        let seed = store.fetch_random(SEED_CATEGORY).await.unwrap();
        assert_eq!(seed.content, "# Hello, World!");
        assert_eq!(seed.category, "default");

        assert!(!store.initialize().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn initialize_leaves_populated_store_alone() {
        let store = MemoryStore::with_seed(1);
        store.insert(&new_snippet("existing", "notes")).await.unwrap();

        assert!(!store.initialize().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(matches!(
            store.fetch_random(SEED_CATEGORY).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::with_seed(1);
        let a = store.insert(&new_snippet("a", "x")).await.unwrap();
        let b = store.insert(&new_snippet("b", "x")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(b.content, "b");
    }

    #[tokio::test]
    async fn fetch_random_respects_category() {
        let store = MemoryStore::with_seed(7);
        for i in 0..5 {
            store.insert(&new_snippet(&format!("blog {i}"), "blog")).await.unwrap();
            store.insert(&new_snippet(&format!("note {i}"), "notes")).await.unwrap();
        }

        for _ in 0..50 {
            let snippet = store.fetch_random("blog").await.unwrap();
            assert_eq!(snippet.category, "blog");
        }
    }

    #[tokio::test]
    async fn fetch_random_reaches_every_match() {
        let store = MemoryStore::with_seed(42);
        let mut ids = HashSet::new();
        for i in 0..4 {
            let row = store.insert(&new_snippet(&format!("s{i}"), "pool")).await.unwrap();
            ids.insert(row.id);
        }

        let mut seen = HashSet::new();
        for _ in 0..400 {
            seen.insert(store.fetch_random("pool").await.unwrap().id);
        }
        assert_eq!(seen, ids);
    }

    #[tokio::test]
    async fn fetch_random_category_is_exact_match() {
        let store = MemoryStore::with_seed(1);
        store.insert(&new_snippet("upper", "Blog")).await.unwrap();

        let err = store.fetch_random("blog").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref category } if category == "blog"));
    }

    #[tokio::test]
    async fn fetch_random_empty_category_not_found() {
        let store = MemoryStore::with_seed(1);
        store.initialize().await.unwrap();
        assert!(matches!(
            store.fetch_random("").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn insert_is_visible_to_fetch() {
        let store = MemoryStore::with_seed(3);
        store.initialize().await.unwrap();
        store.insert(&new_snippet("first", "mixed")).await.unwrap();
        let inserted = store.insert(&new_snippet("second", "mixed")).await.unwrap();

        let mut found = false;
        for _ in 0..200 {
            if store.fetch_random("mixed").await.unwrap().id == inserted.id {
                found = true;
                break;
            }
        }
        assert!(found);
    }

    // -- SQL --

    #[test]
    fn create_table_matches_schema() {
        assert!(CREATE_TABLE_SQL.contains("IF NOT EXISTS markdown"));
        assert!(CREATE_TABLE_SQL.contains("id SERIAL PRIMARY KEY"));
        assert!(CREATE_TABLE_SQL.contains("content TEXT NOT NULL"));
        assert!(CREATE_TABLE_SQL.contains("category TEXT NOT NULL"));
    }

    #[test]
    fn seed_only_inserts_into_empty_table() {
        assert!(SEED_SQL.starts_with("INSERT INTO markdown (content, category)"));
        assert!(SEED_SQL.contains("WHERE NOT EXISTS (SELECT 1 FROM markdown)"));
        // No category filter: any existing row suppresses the seed.
        assert!(!SEED_SQL.contains("WHERE category"));
    }

    #[test]
    fn fetch_random_filters_by_bound_category() {
        assert!(FETCH_RANDOM_SQL.contains("WHERE category = $1"));
        assert!(FETCH_RANDOM_SQL.contains("ORDER BY RANDOM()"));
        assert!(FETCH_RANDOM_SQL.ends_with("LIMIT 1"));
    }

    #[test]
    fn insert_returns_stored_row() {
        assert!(INSERT_SQL.contains("VALUES ($1, $2)"));
        assert!(INSERT_SQL.ends_with("RETURNING id, content, category"));
    }

    /// Runs against a live database when `MARKDECK_TEST_DATABASE_URL` is set.
    #[tokio::test]
    async fn pg_store_round_trip() {
        let Ok(url) = std::env::var("MARKDECK_TEST_DATABASE_URL") else {
            return;
        };
        let options: PgConnectOptions = url.parse().unwrap();
        let store = PgStore::connect_with(options, 2).await.unwrap();

        store.initialize().await.unwrap();
        let before = store.count().await.unwrap();
        assert!(before >= 1);

        // Table is populated now, so a second run must not seed again.
        assert!(!store.initialize().await.unwrap());
        assert_eq!(store.count().await.unwrap(), before);

        let category = format!("test-{}", rand::random::<u64>());
        let stored = store.insert(&new_snippet("# Stored", &category)).await.unwrap();
        assert_eq!(stored.content, "# Stored");
        assert_eq!(stored.category, category);
        assert_eq!(store.count().await.unwrap(), before + 1);

        assert_eq!(store.fetch_random(&category).await.unwrap(), stored);

        let missing = format!("{category}-missing");
        assert!(matches!(
            store.fetch_random(&missing).await,
            Err(StoreError::NotFound { category }) if category == missing
        ));
    }

    // -- StoreError --

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound {
            category: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "no snippet found in category \"missing\"");

        let err = StoreError::Write(sqlx::Error::PoolClosed);
        assert!(err.to_string().starts_with("error adding snippet:"));

        let err = StoreError::Query(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("error fetching snippet:"));
    }
}
