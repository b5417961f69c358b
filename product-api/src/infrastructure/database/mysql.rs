use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Builds the pool without touching the server; connections are opened on
/// first use, so an unreachable store does not stop the process from starting.
pub fn init_mysql(config: &DatabaseConfig) -> Result<MySqlPool, AppError> {
    tracing::info!("Initializing MySQL connection pool");

    let options = MySqlConnectOptions::from_str(&config.url)?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(options);

    Ok(pool)
}

/// 初始化数据库表
pub async fn sync_schema(pool: &MySqlPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            price DECIMAL(10, 2) NOT NULL,
            availability BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    )
        .execute(pool)
        .await?;

    Ok(())
}
