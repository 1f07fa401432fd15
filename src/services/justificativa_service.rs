// src/services/justificativa_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        justificativa::{
            FiltroJustificativas, JustificativaComAluno, STATUS_APROVADA, STATUS_PENDENTE,
            STATUS_REJEITADA,
        },
        notificacao::NovaNotificacao,
    },
    services::{aluno_service, notificacao_service},
};
use sqlx::SqlitePool;

/// Lista justificativas com filtros opcionais. O perfil aluno
/// (`escopo_aluno`) só vê as suas.
pub async fn listar(
    db_pool: &SqlitePool,
    filtro: &FiltroJustificativas,
    escopo_aluno: Option<i64>,
) -> AppResult<Vec<JustificativaComAluno>> {
    let mut sql = String::from(
        "SELECT j.id, j.aluno_id, j.data_ausencia, j.justificativa, j.status, \
                j.lida, j.resolvida, j.observacao_sensei, a.nome_completo \
         FROM justificativas_ausencia j JOIN alunos a ON j.aluno_id = a.id WHERE 1=1",
    );

    let aluno_alvo = escopo_aluno.or(filtro.aluno_id);
    if aluno_alvo.is_some() {
        sql.push_str(" AND j.aluno_id = ?");
    }
    if filtro.status.is_some() {
        sql.push_str(" AND j.status = ?");
    }
    sql.push_str(" ORDER BY j.data_ausencia DESC");

    let mut query = sqlx::query_as::<_, JustificativaComAluno>(&sql);
    if let Some(id) = aluno_alvo {
        query = query.bind(id);
    }
    if let Some(status) = &filtro.status {
        query = query.bind(status);
    }

    let justificativas = query.fetch_all(db_pool).await?;
    Ok(justificativas)
}

/// Registra uma justificativa de ausência e avisa todos os admins.
pub async fn criar(
    db_pool: &SqlitePool,
    aluno_id: i64,
    data_ausencia: &str,
    justificativa: &str,
) -> AppResult<i64> {
    if justificativa.trim().is_empty() {
        return Err(AppError::Validation(
            "Justificativa não pode estar vazia".to_string(),
        ));
    }
    aluno_service::validar_data_iso(data_ausencia)?;

    let aluno = aluno_service::obter(db_pool, aluno_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("aluno {}", aluno_id)))?;

    let resultado = sqlx::query(
        "INSERT INTO justificativas_ausencia (aluno_id, data_ausencia, justificativa, status) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(aluno_id)
    .bind(data_ausencia)
    .bind(justificativa.trim())
    .bind(STATUS_PENDENTE)
    .execute(db_pool)
    .await?;
    let justificativa_id = resultado.last_insert_rowid();

    let modelo = NovaNotificacao {
        usuario_id: None,
        aluno_id: Some(aluno_id),
        tipo: "justificativa_ausencia".to_string(),
        titulo: "Nova Justificativa de Ausência".to_string(),
        mensagem: format!("{} justificou uma ausência.", aluno.nome_completo),
        link: Some("/painel/justificativas".to_string()),
    };
    if let Err(e) = notificacao_service::notificar_admins(db_pool, &modelo).await {
        // O envio falhar não desfaz o registro
        tracing::warn!("Falha ao notificar admins: {:?}", e);
    }

    tracing::info!(
        "📣 Justificativa {} registrada para o aluno {}.",
        justificativa_id,
        aluno_id
    );
    Ok(justificativa_id)
}

/// Revisão do sensei: aprova ou rejeita, anexando observação opcional.
/// A revisão marca a justificativa como lida e resolvida.
pub async fn revisar(
    db_pool: &SqlitePool,
    justificativa_id: i64,
    status: &str,
    observacao_sensei: Option<&str>,
) -> AppResult<()> {
    if status != STATUS_APROVADA && status != STATUS_REJEITADA {
        return Err(AppError::Validation(format!(
            "Status de revisão inválido: {}",
            status
        )));
    }

    let rows_affected = sqlx::query(
        "UPDATE justificativas_ausencia SET \
             status = ?1, observacao_sensei = ?2, lida = 1, resolvida = 1 \
         WHERE id = ?3",
    )
    .bind(status)
    .bind(observacao_sensei)
    .bind(justificativa_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "justificativa {}",
            justificativa_id
        )));
    }
    tracing::info!(
        "✅ Justificativa {} revisada como {}.",
        justificativa_id,
        status
    );
    Ok(())
}

pub async fn marcar_lida(db_pool: &SqlitePool, justificativa_id: i64) -> AppResult<()> {
    sqlx::query("UPDATE justificativas_ausencia SET lida = 1 WHERE id = ?1")
        .bind(justificativa_id)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn contar_pendentes(db_pool: &SqlitePool) -> AppResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM justificativas_ausencia WHERE status = 'Pendente'",
    )
    .fetch_one(db_pool)
    .await?;
    Ok(total)
}
