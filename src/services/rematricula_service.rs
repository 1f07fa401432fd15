// src/services/rematricula_service.rs
use crate::{
    error::{AppError, AppResult},
    models::rematricula::{RematriculaComAluno, STATUS_CONFIRMADA, STATUS_PENDENTE},
    services::aluno_service,
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Gera um link de rematrícula para o aluno. O token vai na URL pública
/// e só pode ser confirmado uma vez.
pub async fn gerar(
    db_pool: &SqlitePool,
    aluno_id: i64,
    data_rematricula: &str,
    valor_pago: f64,
) -> AppResult<String> {
    aluno_service::validar_data_iso(data_rematricula)?;
    if valor_pago < 0.0 {
        return Err(AppError::Validation(
            "Valor pago não pode ser negativo".to_string(),
        ));
    }

    let aluno = aluno_service::obter(db_pool, aluno_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("aluno {}", aluno_id)))?;

    let token = Uuid::new_v4().simple().to_string();
    sqlx::query(
        "INSERT INTO rematriculas (aluno_id, token, data_rematricula, valor_pago, status) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(aluno_id)
    .bind(&token)
    .bind(data_rematricula)
    .bind(valor_pago)
    .bind(STATUS_PENDENTE)
    .execute(db_pool)
    .await?;

    tracing::info!(
        "🔗 Link de rematrícula gerado para '{}' (aluno {}).",
        aluno.nome_completo,
        aluno_id
    );
    Ok(format!("/rematricula/{}", token))
}

/// Lista todas as rematrículas com os dados do aluno, mais recentes primeiro.
pub async fn listar(db_pool: &SqlitePool) -> AppResult<Vec<RematriculaComAluno>> {
    let rematriculas = sqlx::query_as::<_, RematriculaComAluno>(
        "SELECT r.id, r.aluno_id, r.token, r.data_rematricula, r.valor_pago, r.status, \
                a.nome_completo, a.graduacao_atual, a.modalidade \
         FROM rematriculas r JOIN alunos a ON r.aluno_id = a.id \
         ORDER BY r.created_at DESC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(rematriculas)
}

/// Busca uma rematrícula pendente pelo token (página pública).
pub async fn obter_por_token(
    db_pool: &SqlitePool,
    token: &str,
) -> AppResult<Option<RematriculaComAluno>> {
    let rematricula = sqlx::query_as::<_, RematriculaComAluno>(
        "SELECT r.id, r.aluno_id, r.token, r.data_rematricula, r.valor_pago, r.status, \
                a.nome_completo, a.graduacao_atual, a.modalidade \
         FROM rematriculas r JOIN alunos a ON r.aluno_id = a.id \
         WHERE r.token = ?1 AND r.status = ?2",
    )
    .bind(token)
    .bind(STATUS_PENDENTE)
    .fetch_optional(db_pool)
    .await?;
    Ok(rematricula)
}

/// Confirma a rematrícula: muda o status do registro e reativa o aluno,
/// na mesma transação. Token desconhecido ou já usado é erro de validação.
pub async fn confirmar(db_pool: &SqlitePool, token: &str) -> AppResult<i64> {
    let mut tx = db_pool.begin().await?;

    let aluno_id: Option<i64> = sqlx::query_scalar(
        "SELECT aluno_id FROM rematriculas WHERE token = ?1 AND status = ?2",
    )
    .bind(token)
    .bind(STATUS_PENDENTE)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(aluno_id) = aluno_id else {
        return Err(AppError::Validation(
            "Link inválido ou já utilizado".to_string(),
        ));
    };

    sqlx::query("UPDATE rematriculas SET status = ?1 WHERE token = ?2")
        .bind(STATUS_CONFIRMADA)
        .bind(token)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE alunos SET status = 'Ativo', updated_at = datetime('now') WHERE id = ?1")
        .bind(aluno_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("✅ Rematrícula confirmada para o aluno {}.", aluno_id);
    Ok(aluno_id)
}
