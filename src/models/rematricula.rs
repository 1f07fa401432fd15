// src/models/rematricula.rs
use sqlx::FromRow;

pub const STATUS_PENDENTE: &str = "Pendente";
pub const STATUS_CONFIRMADA: &str = "Confirmada";

/// Rematrícula junto com os dados do aluno, para a listagem do painel
/// e a página pública de confirmação.
#[derive(Debug, Clone, FromRow)]
pub struct RematriculaComAluno {
    pub id: i64,
    pub aluno_id: i64,
    pub token: String,
    pub data_rematricula: String,
    pub valor_pago: f64,
    pub status: String,
    pub nome_completo: String,
    pub graduacao_atual: String,
    pub modalidade: Option<String>,
}
