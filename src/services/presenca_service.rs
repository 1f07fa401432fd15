// src/services/presenca_service.rs
use crate::{
    error::AppResult,
    models::presenca::{FiltroPresencas, LinhaChamada, Presenca, PresencaComAluno},
    services::aluno_service,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Registra presença ou ausência. O par (aluno, data) é único: um novo
/// registro para o mesmo par substitui o anterior (upsert).
pub async fn registrar(
    db_pool: &SqlitePool,
    aluno_id: i64,
    data: &str,
    presente: bool,
    justificativa: Option<&str>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO presencas (aluno_id, data, presente, justificativa) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(aluno_id, data) DO UPDATE SET \
             presente = excluded.presente, \
             justificativa = excluded.justificativa",
    )
    .bind(aluno_id)
    .bind(data)
    .bind(presente)
    .bind(justificativa)
    .execute(db_pool)
    .await?;

    tracing::debug!(
        "Presença registrada: aluno {} em {} -> {}",
        aluno_id,
        data,
        presente
    );
    Ok(())
}

/// Lista presenças com filtros opcionais. Quando `escopo_aluno` está
/// definido (perfil aluno), só devolve os registros desse aluno.
pub async fn listar(
    db_pool: &SqlitePool,
    filtro: &FiltroPresencas,
    escopo_aluno: Option<i64>,
) -> AppResult<Vec<PresencaComAluno>> {
    let mut sql = String::from(
        "SELECT p.id, p.aluno_id, p.data, p.presente, p.justificativa, a.nome_completo \
         FROM presencas p JOIN alunos a ON p.aluno_id = a.id WHERE 1=1",
    );

    let aluno_alvo = escopo_aluno.or(filtro.aluno_id);
    if aluno_alvo.is_some() {
        sql.push_str(" AND p.aluno_id = ?");
    }
    if filtro.data_inicio.is_some() {
        sql.push_str(" AND p.data >= ?");
    }
    if filtro.data_fim.is_some() {
        sql.push_str(" AND p.data <= ?");
    }
    sql.push_str(" ORDER BY p.data DESC");

    let mut query = sqlx::query_as::<_, PresencaComAluno>(&sql);
    if let Some(id) = aluno_alvo {
        query = query.bind(id);
    }
    if let Some(inicio) = &filtro.data_inicio {
        query = query.bind(inicio);
    }
    if let Some(fim) = &filtro.data_fim {
        query = query.bind(fim);
    }

    let presencas = query.fetch_all(db_pool).await?;
    Ok(presencas)
}

/// Quantos alunos estão marcados presentes na data.
pub async fn contar_presentes_na_data(db_pool: &SqlitePool, data: &str) -> AppResult<i64> {
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM presencas WHERE data = ?1 AND presente = 1")
            .bind(data)
            .fetch_one(db_pool)
            .await?;
    Ok(total)
}

/// Folha de chamada: todos os alunos ativos com o estado de presença da
/// data selecionada (None quando ainda não registrado).
pub async fn chamada_do_dia(db_pool: &SqlitePool, data: &str) -> AppResult<Vec<LinhaChamada>> {
    let alunos = aluno_service::listar_ativos(db_pool).await?;

    let do_dia = sqlx::query_as::<_, Presenca>("SELECT * FROM presencas WHERE data = ?1")
        .bind(data)
        .fetch_all(db_pool)
        .await?;
    let mut por_aluno: HashMap<i64, Presenca> =
        do_dia.into_iter().map(|p| (p.aluno_id, p)).collect();

    let linhas = alunos
        .into_iter()
        .map(|a| LinhaChamada {
            presenca: por_aluno.remove(&a.id),
            aluno_id: a.id,
            nome_completo: a.nome_completo,
            graduacao_atual: a.graduacao_atual,
        })
        .collect();
    Ok(linhas)
}
