// src/models/presenca.rs
use serde::Deserialize;
use sqlx::FromRow;

/// Registro de presença de um aluno numa data. O par (aluno_id, data) é
/// único: registrar de novo substitui o estado anterior.
#[derive(Debug, Clone, FromRow)]
pub struct Presenca {
    pub id: i64,
    pub aluno_id: i64,
    pub data: String,
    pub presente: bool,
    pub justificativa: Option<String>,
    pub created_at: Option<String>,
}

/// Presença com o nome do aluno (JOIN), para as listagens.
#[derive(Debug, Clone, FromRow)]
pub struct PresencaComAluno {
    pub id: i64,
    pub aluno_id: i64,
    pub data: String,
    pub presente: bool,
    pub justificativa: Option<String>,
    pub nome_completo: String,
}

/// Linha da folha de chamada: um aluno ativo e o seu estado na data
/// selecionada (None quando ainda não registrado).
#[derive(Debug, Clone)]
pub struct LinhaChamada {
    pub aluno_id: i64,
    pub nome_completo: String,
    pub graduacao_atual: String,
    pub presenca: Option<Presenca>,
}

#[derive(Debug, Deserialize)]
pub struct PresencaForm {
    pub aluno_id: i64,
    pub data: String,
    pub presente: String, // "1" presente, "0" ausente
    #[serde(default)]
    pub justificativa: String,
}

#[derive(Debug, Deserialize)]
pub struct FiltroPresencas {
    #[serde(default)]
    pub aluno_id: Option<i64>,
    #[serde(default)]
    pub data_inicio: Option<String>,
    #[serde(default)]
    pub data_fim: Option<String>,
}
