// src/services/aluno_service.rs
use crate::{
    error::{AppError, AppResult},
    models::aluno::{proxima_graduacao, Aluno, FichaAluno},
};
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

/// Campos de um aluno já normalizados (opcionais vazios viram None).
#[derive(Debug, Clone)]
pub struct DadosAluno {
    pub nome_completo: String,
    pub tipo: String,
    pub data_nascimento: Option<String>,
    pub nome_responsavel: Option<String>,
    pub contato: Option<String>,
    pub data_matricula: String,
    pub status: String,
    pub observacoes: Option<String>,
    pub graduacao_atual: String,
    pub modalidade: Option<String>,
    pub pode_graduar: bool,
    pub graduar_para: Option<String>,
    pub peso: Option<f64>,
    pub altura: Option<f64>,
}

/// Lista todos os alunos ordenados por nome.
pub async fn listar(db_pool: &SqlitePool) -> AppResult<Vec<Aluno>> {
    let alunos = sqlx::query_as::<_, Aluno>("SELECT * FROM alunos ORDER BY nome_completo")
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Encontrados {} alunos.", alunos.len());
    Ok(alunos)
}

/// Lista apenas os ativos (folha de chamada, seletores).
pub async fn listar_ativos(db_pool: &SqlitePool) -> AppResult<Vec<Aluno>> {
    let alunos = sqlx::query_as::<_, Aluno>(
        "SELECT * FROM alunos WHERE status = 'Ativo' ORDER BY nome_completo",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(alunos)
}

/// Lista com os campos derivados (idade, IMC, classe, categoria) calculados
/// na leitura; nada disto é persistido.
pub async fn listar_fichas(db_pool: &SqlitePool) -> AppResult<Vec<FichaAluno>> {
    let hoje = Local::now().date_naive();
    let fichas = listar(db_pool)
        .await?
        .into_iter()
        .map(|a| FichaAluno::montar(a, hoje))
        .collect();
    Ok(fichas)
}

pub async fn obter(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<Option<Aluno>> {
    let aluno = sqlx::query_as::<_, Aluno>("SELECT * FROM alunos WHERE id = ?1")
        .bind(aluno_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(aluno)
}

pub async fn obter_ficha(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<Option<FichaAluno>> {
    let hoje = Local::now().date_naive();
    Ok(obter(db_pool, aluno_id)
        .await?
        .map(|a| FichaAluno::montar(a, hoje)))
}

pub async fn criar(db_pool: &SqlitePool, dados: &DadosAluno) -> AppResult<i64> {
    if dados.nome_completo.trim().is_empty() {
        return Err(AppError::Validation(
            "Nome do aluno não pode estar vazio".to_string(),
        ));
    }

    let resultado = sqlx::query(
        "INSERT INTO alunos (nome_completo, tipo, data_nascimento, nome_responsavel, \
                             contato, data_matricula, status, observacoes, \
                             graduacao_atual, modalidade, pode_graduar, graduar_para, \
                             peso, altura) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(&dados.nome_completo)
    .bind(&dados.tipo)
    .bind(&dados.data_nascimento)
    .bind(&dados.nome_responsavel)
    .bind(&dados.contato)
    .bind(&dados.data_matricula)
    .bind(&dados.status)
    .bind(&dados.observacoes)
    .bind(&dados.graduacao_atual)
    .bind(&dados.modalidade)
    .bind(dados.pode_graduar)
    .bind(&dados.graduar_para)
    .bind(dados.peso)
    .bind(dados.altura)
    .execute(db_pool)
    .await?;

    let aluno_id = resultado.last_insert_rowid();
    tracing::info!("✅ Aluno '{}' criado (id {}).", dados.nome_completo, aluno_id);
    Ok(aluno_id)
}

/// Atualiza um aluno. A data de matrícula é imutável após a criação.
/// Quando marcado como apto a graduar sem graduação escolhida, a próxima
/// da escada é preenchida automaticamente.
pub async fn atualizar(db_pool: &SqlitePool, aluno_id: i64, dados: &DadosAluno) -> AppResult<()> {
    if dados.nome_completo.trim().is_empty() {
        return Err(AppError::Validation(
            "Nome do aluno não pode estar vazio".to_string(),
        ));
    }

    let graduar_para = if dados.pode_graduar && dados.graduar_para.is_none() {
        proxima_graduacao(&dados.graduacao_atual).map(|g| g.to_string())
    } else {
        dados.graduar_para.clone()
    };

    let rows_affected = sqlx::query(
        "UPDATE alunos SET \
             nome_completo = ?1, tipo = ?2, data_nascimento = ?3, \
             nome_responsavel = ?4, contato = ?5, status = ?6, \
             observacoes = ?7, graduacao_atual = ?8, modalidade = ?9, \
             pode_graduar = ?10, graduar_para = ?11, peso = ?12, altura = ?13, \
             updated_at = datetime('now') \
         WHERE id = ?14",
    )
    .bind(&dados.nome_completo)
    .bind(&dados.tipo)
    .bind(&dados.data_nascimento)
    .bind(&dados.nome_responsavel)
    .bind(&dados.contato)
    .bind(&dados.status)
    .bind(&dados.observacoes)
    .bind(&dados.graduacao_atual)
    .bind(&dados.modalidade)
    .bind(dados.pode_graduar)
    .bind(&graduar_para)
    .bind(dados.peso)
    .bind(dados.altura)
    .bind(aluno_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("aluno {}", aluno_id)));
    }
    tracing::info!("✅ Aluno {} atualizado.", aluno_id);
    Ok(())
}

pub async fn excluir(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM alunos WHERE id = ?1")
        .bind(aluno_id)
        .execute(db_pool)
        .await?;
    tracing::info!("🗑️ Aluno {} excluído.", aluno_id);
    Ok(())
}

/// Data de hoje em ISO, usada como default de matrícula e de chamada.
pub fn hoje_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Valida uma data ISO vinda de formulário, devolvendo-a normalizada.
pub fn validar_data_iso(valor: &str) -> AppResult<String> {
    NaiveDate::parse_from_str(valor.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| AppError::Validation(format!("Data inválida: {}", valor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validar_data_iso_aceita_e_rejeita() {
        assert_eq!(validar_data_iso("2026-08-31").unwrap(), "2026-08-31");
        assert_eq!(validar_data_iso(" 2026-01-05 ").unwrap(), "2026-01-05");
        assert!(validar_data_iso("31/08/2026").is_err());
        assert!(validar_data_iso("").is_err());
    }
}
