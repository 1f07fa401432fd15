// src/models/justificativa.rs
use serde::Deserialize;
use sqlx::FromRow;

pub const STATUS_PENDENTE: &str = "Pendente";
pub const STATUS_APROVADA: &str = "Aprovada";
pub const STATUS_REJEITADA: &str = "Rejeitada";

/// Justificativa de ausência enviada pelo aluno e revisada pelo sensei,
/// com o nome do aluno (JOIN) para as listagens.
#[derive(Debug, Clone, FromRow)]
pub struct JustificativaComAluno {
    pub id: i64,
    pub aluno_id: i64,
    pub data_ausencia: String,
    pub justificativa: String,
    pub status: String,
    pub lida: bool,
    pub resolvida: bool,
    pub observacao_sensei: Option<String>,
    pub nome_completo: String,
}

impl JustificativaComAluno {
    pub fn pendente(&self) -> bool {
        self.status == STATUS_PENDENTE
    }
}

/// Formulário de envio pelo aluno (o aluno_id vem da sessão) ou pelo
/// admin em nome de um aluno.
#[derive(Debug, Deserialize)]
pub struct JustificativaForm {
    #[serde(default, deserialize_with = "crate::models::query_id_opcional")]
    pub aluno_id: Option<i64>,
    pub data_ausencia: String,
    pub justificativa: String,
}

/// Revisão do sensei: muda status e anexa observação.
#[derive(Debug, Deserialize)]
pub struct RevisaoJustificativaForm {
    pub status: String,
    #[serde(default)]
    pub observacao_sensei: String,
}

#[derive(Debug, Deserialize)]
pub struct FiltroJustificativas {
    #[serde(default)]
    pub aluno_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}
