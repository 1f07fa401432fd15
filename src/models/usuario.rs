// src/models/usuario.rs
use serde::Deserialize;
use sqlx::FromRow;

// Representa um utilizador lido da tabela 'usuarios'
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    pub password: String, // hash bcrypt, nunca exibido
    pub perfil: String,   // 'admin' ou 'aluno'
    pub nome: Option<String>,
    pub aluno_id: Option<i64>,
    pub created_at: Option<String>,
}

/// Usuário com o nome do aluno vinculado (LEFT JOIN em alunos),
/// para a listagem de gestão de usuários.
#[derive(Debug, Clone, FromRow)]
pub struct UsuarioComAluno {
    pub id: i64,
    pub username: String,
    pub perfil: String,
    pub nome: Option<String>,
    pub aluno_id: Option<i64>,
    pub nome_aluno: Option<String>,
    pub created_at: Option<String>,
}

// Struct para dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Formulário de criação/edição de usuário. Na edição a senha é opcional
/// (vazia mantém a atual); aluno_id vazio desvincula.
#[derive(Debug, Deserialize)]
pub struct UsuarioForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub perfil: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub aluno_id: String,
}
