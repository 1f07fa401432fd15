// src/db.rs
use crate::error::AppResult;
use crate::services::auth_service;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_db_pool() -> AppResult<SqlitePool> {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:judo.db".to_string());

    tracing::info!("Ligando à base de dados: {}", database_url);

    // Opções de conexão (criar se não existir, timeout)
    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("Executando migrações da base de dados...");
    // Executa automaticamente os ficheiros SQL em ./migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrações concluídas.");

    Ok(pool)
}

/// Garante que a conta de administrador padrão existe (admin / admin123).
pub async fn garantir_admin_padrao(pool: &SqlitePool) -> AppResult<()> {
    let existe: Option<i64> =
        sqlx::query_scalar("SELECT id FROM usuarios WHERE username = 'admin'")
            .fetch_optional(pool)
            .await?;

    if existe.is_none() {
        let hash = auth_service::hash_password("admin123").await?;
        sqlx::query(
            "INSERT INTO usuarios (username, password, perfil, nome) \
             VALUES ('admin', ?1, 'admin', 'Administrador')",
        )
        .bind(hash)
        .execute(pool)
        .await?;
        tracing::info!("👤 Conta admin padrão criada (admin / admin123).");
    }

    Ok(())
}
