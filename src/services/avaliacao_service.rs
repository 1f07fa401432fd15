// src/services/avaliacao_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        avaliacao::{Avaliacao, AvaliacaoComAluno, STATUS_LIBERADA, STATUS_RASCUNHO},
        notificacao::NovaNotificacao,
    },
    services::{aluno_service, notificacao_service},
};
use sqlx::SqlitePool;

/// Campos de uma avaliação já normalizados.
#[derive(Debug, Clone)]
pub struct DadosAvaliacao {
    pub aluno_id: i64,
    pub data_avaliacao: String,
    pub disciplina: Option<f64>,
    pub tecnica: Option<f64>,
    pub participacao: Option<f64>,
    pub respeito_comportamento: Option<f64>,
    pub observacoes: Option<String>,
}

fn validar_notas(dados: &DadosAvaliacao) -> AppResult<()> {
    let notas = [
        dados.disciplina,
        dados.tecnica,
        dados.participacao,
        dados.respeito_comportamento,
    ];
    for nota in notas.into_iter().flatten() {
        if !(0.0..=10.0).contains(&nota) {
            return Err(AppError::Validation(
                "Notas devem estar entre 0 e 10".to_string(),
            ));
        }
    }
    Ok(())
}

/// Lista avaliações. Para o perfil aluno (`escopo_aluno`), apenas as
/// liberadas do próprio aluno; o admin vê todas e pode filtrar por aluno.
pub async fn listar(
    db_pool: &SqlitePool,
    filtro_aluno: Option<i64>,
    escopo_aluno: Option<i64>,
) -> AppResult<Vec<AvaliacaoComAluno>> {
    let mut sql = String::from(
        "SELECT av.id, av.aluno_id, av.data_avaliacao, av.disciplina, av.tecnica, \
                av.participacao, av.respeito_comportamento, av.observacoes, av.status, \
                av.data_liberacao, a.nome_completo \
         FROM avaliacoes av JOIN alunos a ON av.aluno_id = a.id WHERE 1=1",
    );

    if escopo_aluno.is_some() {
        sql.push_str(" AND av.aluno_id = ? AND av.status = 'Liberada'");
    } else if filtro_aluno.is_some() {
        sql.push_str(" AND av.aluno_id = ?");
    }
    sql.push_str(" ORDER BY av.data_avaliacao DESC");

    let mut query = sqlx::query_as::<_, AvaliacaoComAluno>(&sql);
    if let Some(id) = escopo_aluno.or(filtro_aluno) {
        query = query.bind(id);
    }

    let avaliacoes = query.fetch_all(db_pool).await?;
    Ok(avaliacoes)
}

pub async fn obter(db_pool: &SqlitePool, avaliacao_id: i64) -> AppResult<Option<Avaliacao>> {
    let avaliacao = sqlx::query_as::<_, Avaliacao>(
        "SELECT id, aluno_id, data_avaliacao, disciplina, tecnica, participacao, \
                respeito_comportamento, observacoes, status, data_liberacao \
         FROM avaliacoes WHERE id = ?1",
    )
    .bind(avaliacao_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(avaliacao)
}

/// Cria uma avaliação, sempre como Rascunho.
pub async fn criar(db_pool: &SqlitePool, dados: &DadosAvaliacao) -> AppResult<i64> {
    validar_notas(dados)?;

    let resultado = sqlx::query(
        "INSERT INTO avaliacoes (aluno_id, data_avaliacao, disciplina, tecnica, \
                                 participacao, respeito_comportamento, observacoes, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(dados.aluno_id)
    .bind(&dados.data_avaliacao)
    .bind(dados.disciplina)
    .bind(dados.tecnica)
    .bind(dados.participacao)
    .bind(dados.respeito_comportamento)
    .bind(&dados.observacoes)
    .bind(STATUS_RASCUNHO)
    .execute(db_pool)
    .await?;

    let avaliacao_id = resultado.last_insert_rowid();
    tracing::info!("✅ Avaliação {} criada (rascunho).", avaliacao_id);
    Ok(avaliacao_id)
}

/// Atualiza uma avaliação. A transição de status é de sentido único:
/// uma avaliação liberada permanece liberada; mudar Rascunho → Liberada
/// registra a data e notifica o aluno.
pub async fn atualizar(
    db_pool: &SqlitePool,
    avaliacao_id: i64,
    dados: &DadosAvaliacao,
    novo_status: Option<&str>,
) -> AppResult<()> {
    validar_notas(dados)?;

    let atual = obter(db_pool, avaliacao_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("avaliação {}", avaliacao_id)))?;

    let vai_liberar = !atual.liberada() && novo_status == Some(STATUS_LIBERADA);
    let status_final = if atual.liberada() || vai_liberar {
        STATUS_LIBERADA
    } else {
        STATUS_RASCUNHO
    };
    let data_liberacao = if vai_liberar {
        Some(aluno_service::hoje_iso())
    } else {
        atual.data_liberacao.clone()
    };

    sqlx::query(
        "UPDATE avaliacoes SET \
             aluno_id = ?1, data_avaliacao = ?2, disciplina = ?3, tecnica = ?4, \
             participacao = ?5, respeito_comportamento = ?6, observacoes = ?7, \
             status = ?8, data_liberacao = ?9, updated_at = datetime('now') \
         WHERE id = ?10",
    )
    .bind(dados.aluno_id)
    .bind(&dados.data_avaliacao)
    .bind(dados.disciplina)
    .bind(dados.tecnica)
    .bind(dados.participacao)
    .bind(dados.respeito_comportamento)
    .bind(&dados.observacoes)
    .bind(status_final)
    .bind(&data_liberacao)
    .bind(avaliacao_id)
    .execute(db_pool)
    .await?;

    if vai_liberar {
        notificar_liberacao(db_pool, dados.aluno_id).await;
    }
    tracing::info!("✅ Avaliação {} atualizada.", avaliacao_id);
    Ok(())
}

/// Libera uma avaliação para visualização do aluno (Rascunho → Liberada).
pub async fn liberar(db_pool: &SqlitePool, avaliacao_id: i64) -> AppResult<()> {
    let avaliacao = obter(db_pool, avaliacao_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("avaliação {}", avaliacao_id)))?;

    if avaliacao.liberada() {
        // Transição única: liberar de novo é um no-op
        return Ok(());
    }

    sqlx::query(
        "UPDATE avaliacoes SET status = ?1, data_liberacao = ?2, updated_at = datetime('now') \
         WHERE id = ?3",
    )
    .bind(STATUS_LIBERADA)
    .bind(aluno_service::hoje_iso())
    .bind(avaliacao_id)
    .execute(db_pool)
    .await?;

    notificar_liberacao(db_pool, avaliacao.aluno_id).await;
    tracing::info!("📣 Avaliação {} liberada.", avaliacao_id);
    Ok(())
}

pub async fn excluir(db_pool: &SqlitePool, avaliacao_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM avaliacoes WHERE id = ?1")
        .bind(avaliacao_id)
        .execute(db_pool)
        .await?;
    tracing::info!("🗑️ Avaliação {} excluída.", avaliacao_id);
    Ok(())
}

/// Notifica o usuário vinculado ao aluno. Falha aqui não desfaz a
/// liberação; apenas fica no log.
async fn notificar_liberacao(db_pool: &SqlitePool, aluno_id: i64) {
    let usuario: Result<Option<i64>, _> =
        sqlx::query_scalar("SELECT id FROM usuarios WHERE aluno_id = ?1")
            .bind(aluno_id)
            .fetch_optional(db_pool)
            .await;

    match usuario {
        Ok(Some(usuario_id)) => {
            let nova = NovaNotificacao {
                usuario_id: Some(usuario_id),
                aluno_id: Some(aluno_id),
                tipo: "avaliacao_liberada".to_string(),
                titulo: "Nova Avaliação Liberada".to_string(),
                mensagem: "Uma nova avaliação foi liberada para visualização.".to_string(),
                link: Some("/portal/avaliacoes".to_string()),
            };
            if let Err(e) = notificacao_service::criar(db_pool, &nova).await {
                tracing::warn!("Falha ao criar notificação de liberação: {:?}", e);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Falha ao buscar usuário do aluno {}: {:?}", aluno_id, e),
    }
}
