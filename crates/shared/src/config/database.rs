use anyhow::{Context, Result};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

pub type ConnectionPool = Pool<Sqlite>;

pub struct ConnectionManager;

impl ConnectionManager {
    /// In-memory databases live as long as their connection, so they are pinned
    /// to a single connection that never idles out.
    pub async fn new_pool(
        connection_string: &str,
        min_conn: u32,
        max_conn: u32,
    ) -> Result<ConnectionPool> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .with_context(|| format!("Invalid database url: {connection_string}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = is_in_memory(connection_string);
        let max_conn = if in_memory { 1 } else { max_conn.max(1) };

        let mut pool_options = SqlitePoolOptions::new()
            .min_connections(min_conn.min(max_conn))
            .max_connections(max_conn);

        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|err| anyhow::anyhow!("Failed to create database connection pool: {}", err))?;

        Ok(pool)
    }
}

fn is_in_memory(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}
