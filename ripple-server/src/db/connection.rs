use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use super::schema::{DEMO_DATA, SCHEMA};

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let is_memory = path_str.trim().eq_ignore_ascii_case(MEMORY_DB_PATH);

        let manager = if is_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path.as_ref())
        };
        // Cascade deletes only apply on connections that opted in.
        let manager =
            manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        // A :memory: database is private to its connection handle; the pool
        // must hold exactly one so every caller sees the same tables.
        let pool = if is_memory {
            Pool::builder().max_size(1).build(manager)
        } else {
            Pool::new(manager)
        }
        .context("Failed to create database connection pool")?;

        Ok(Self { pool })
    }

    /// Create an in-memory database with the schema applied (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let db = Self::new(MEMORY_DB_PATH)?;
        db.initialize()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Seed the database with demo data
    pub fn seed_demo_data(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(DEMO_DATA)
            .context("Failed to seed demo data")?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .context("Failed to get database connection from pool")
    }
}
