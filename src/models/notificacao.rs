// src/models/notificacao.rs
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Notificacao {
    pub id: i64,
    pub usuario_id: Option<i64>,
    pub aluno_id: Option<i64>,
    pub tipo: String,
    pub titulo: String,
    pub mensagem: String,
    pub lida: bool,
    pub data_notificacao: Option<String>,
    pub link: Option<String>,
}

/// Dados para criar uma notificação (o resto tem default na tabela).
#[derive(Debug, Clone)]
pub struct NovaNotificacao {
    pub usuario_id: Option<i64>,
    pub aluno_id: Option<i64>,
    pub tipo: String,
    pub titulo: String,
    pub mensagem: String,
    pub link: Option<String>,
}
