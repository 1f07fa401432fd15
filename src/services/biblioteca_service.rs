// src/services/biblioteca_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::GRADUACOES,
        biblioteca::{ConteudoBiblioteca, FiltroBiblioteca},
    },
};
use sqlx::SqlitePool;

/// Campos de um conteúdo técnico já normalizados.
#[derive(Debug, Clone)]
pub struct DadosConteudo {
    pub titulo: String,
    pub tipo_golpe: String,
    pub graduacao_minima: Option<String>,
    pub modalidade: Option<String>,
    pub url_video: Option<String>,
    pub url_foto: Option<String>,
    pub instrucoes: Option<String>,
    pub descricao: Option<String>,
}

/// Um conteúdo atende a graduação do consulente quando não exige mínimo
/// ou quando o mínimo está em degrau igual ou abaixo na escada de faixas.
pub fn graduacao_atende(minima: Option<&str>, do_aluno: &str) -> bool {
    let Some(minima) = minima else { return true };
    let degrau = |g: &str| GRADUACOES.iter().position(|x| *x == g);
    match (degrau(minima), degrau(do_aluno)) {
        (Some(min), Some(atual)) => min <= atual,
        // Graduação desconhecida não esconde conteúdo
        _ => true,
    }
}

/// Lista conteúdos com filtros opcionais. O filtro de graduação compara
/// pela posição na escada de faixas, não pelo texto.
pub async fn listar(
    db_pool: &SqlitePool,
    filtro: &FiltroBiblioteca,
) -> AppResult<Vec<ConteudoBiblioteca>> {
    let mut sql = String::from(
        "SELECT id, titulo, tipo_golpe, graduacao_minima, modalidade, url_video, \
                url_foto, instrucoes, descricao \
         FROM biblioteca_tecnica WHERE 1=1",
    );
    if filtro.modalidade.is_some() {
        sql.push_str(" AND (modalidade IS NULL OR modalidade = ?)");
    }
    if filtro.tipo_golpe.is_some() {
        sql.push_str(" AND tipo_golpe = ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query_as::<_, ConteudoBiblioteca>(&sql);
    if let Some(modalidade) = &filtro.modalidade {
        query = query.bind(modalidade);
    }
    if let Some(tipo) = &filtro.tipo_golpe {
        query = query.bind(tipo);
    }

    let mut conteudos = query.fetch_all(db_pool).await?;

    if let Some(graduacao) = &filtro.graduacao {
        conteudos.retain(|c| graduacao_atende(c.graduacao_minima.as_deref(), graduacao));
    }
    Ok(conteudos)
}

pub async fn obter(
    db_pool: &SqlitePool,
    conteudo_id: i64,
) -> AppResult<Option<ConteudoBiblioteca>> {
    let conteudo = sqlx::query_as::<_, ConteudoBiblioteca>(
        "SELECT id, titulo, tipo_golpe, graduacao_minima, modalidade, url_video, \
                url_foto, instrucoes, descricao \
         FROM biblioteca_tecnica WHERE id = ?1",
    )
    .bind(conteudo_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(conteudo)
}

pub async fn criar(db_pool: &SqlitePool, dados: &DadosConteudo) -> AppResult<i64> {
    if dados.titulo.trim().is_empty() {
        return Err(AppError::Validation("Título é obrigatório".to_string()));
    }
    let resultado = sqlx::query(
        "INSERT INTO biblioteca_tecnica (titulo, tipo_golpe, graduacao_minima, modalidade, \
                                         url_video, url_foto, instrucoes, descricao) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&dados.titulo)
    .bind(&dados.tipo_golpe)
    .bind(&dados.graduacao_minima)
    .bind(&dados.modalidade)
    .bind(&dados.url_video)
    .bind(&dados.url_foto)
    .bind(&dados.instrucoes)
    .bind(&dados.descricao)
    .execute(db_pool)
    .await?;
    let conteudo_id = resultado.last_insert_rowid();
    tracing::info!("✅ Conteúdo '{}' criado (id {}).", dados.titulo, conteudo_id);
    Ok(conteudo_id)
}

pub async fn atualizar(
    db_pool: &SqlitePool,
    conteudo_id: i64,
    dados: &DadosConteudo,
) -> AppResult<()> {
    let rows_affected = sqlx::query(
        "UPDATE biblioteca_tecnica SET \
             titulo = ?1, tipo_golpe = ?2, graduacao_minima = ?3, modalidade = ?4, \
             url_video = ?5, url_foto = ?6, instrucoes = ?7, descricao = ?8, \
             updated_at = datetime('now') \
         WHERE id = ?9",
    )
    .bind(&dados.titulo)
    .bind(&dados.tipo_golpe)
    .bind(&dados.graduacao_minima)
    .bind(&dados.modalidade)
    .bind(&dados.url_video)
    .bind(&dados.url_foto)
    .bind(&dados.instrucoes)
    .bind(&dados.descricao)
    .bind(conteudo_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("conteúdo {}", conteudo_id)));
    }
    tracing::info!("✅ Conteúdo {} atualizado.", conteudo_id);
    Ok(())
}

pub async fn excluir(db_pool: &SqlitePool, conteudo_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM biblioteca_tecnica WHERE id = ?1")
        .bind(conteudo_id)
        .execute(db_pool)
        .await?;
    tracing::info!("🗑️ Conteúdo {} excluído.", conteudo_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graduacao_atende_compara_pela_escada() {
        assert!(graduacao_atende(None, "Branca"));
        assert!(graduacao_atende(Some("Branca"), "Verde"));
        assert!(graduacao_atende(Some("Verde"), "Verde"));
        assert!(!graduacao_atende(Some("Preta"), "Branca"));
        // Faixa desconhecida não filtra
        assert!(graduacao_atende(Some("Vermelha"), "Branca"));
    }
}
