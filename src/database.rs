use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, PgPool};
use std::str::FromStr;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?
        .application_name("listing-search")
        .statement_cache_capacity(500); // search SQL varies with the filter shape

    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections.min(4))
        .acquire_timeout(std::time::Duration::from_secs(2))
        .idle_timeout(std::time::Duration::from_secs(10))
        .connect_with(options)
        .await
}
