// src/services/aviso_service.rs
use crate::{
    error::{AppError, AppResult},
    models::aviso::Aviso,
};
use sqlx::SqlitePool;

/// Lista os avisos mais recentes do mural.
pub async fn listar(db_pool: &SqlitePool) -> AppResult<Vec<Aviso>> {
    let avisos = sqlx::query_as::<_, Aviso>(
        "SELECT id, titulo, conteudo, data_publicacao FROM avisos \
         ORDER BY data_publicacao DESC LIMIT 10",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(avisos)
}

pub async fn criar(
    db_pool: &SqlitePool,
    titulo: &str,
    conteudo: &str,
    data_publicacao: &str,
) -> AppResult<i64> {
    if titulo.trim().is_empty() || conteudo.trim().is_empty() {
        return Err(AppError::Validation(
            "Título e conteúdo são obrigatórios".to_string(),
        ));
    }
    let resultado =
        sqlx::query("INSERT INTO avisos (titulo, conteudo, data_publicacao) VALUES (?1, ?2, ?3)")
            .bind(titulo)
            .bind(conteudo)
            .bind(data_publicacao)
            .execute(db_pool)
            .await?;
    let aviso_id = resultado.last_insert_rowid();
    tracing::info!("✅ Aviso '{}' publicado (id {}).", titulo, aviso_id);
    Ok(aviso_id)
}

pub async fn excluir(db_pool: &SqlitePool, aviso_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM avisos WHERE id = ?1")
        .bind(aviso_id)
        .execute(db_pool)
        .await?;
    tracing::info!("🗑️ Aviso {} excluído.", aviso_id);
    Ok(())
}
