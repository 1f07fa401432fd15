// src/services/usuario_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::Aluno,
        usuario::{Usuario, UsuarioComAluno},
    },
    services::auth_service,
};
use sqlx::SqlitePool;

/// Busca um usuário pelo username (para o login).
pub async fn find_por_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<Usuario>> {
    tracing::debug!("Buscando usuário por username: {}", username);
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT id, username, password, perfil, nome, aluno_id, created_at \
         FROM usuarios WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?;
    Ok(usuario)
}

pub async fn find_por_id(db_pool: &SqlitePool, usuario_id: i64) -> AppResult<Option<Usuario>> {
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT id, username, password, perfil, nome, aluno_id, created_at \
         FROM usuarios WHERE id = ?1",
    )
    .bind(usuario_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(usuario)
}

/// Lista todos os usuários com o nome do aluno vinculado, mais recentes primeiro.
pub async fn listar_com_aluno(db_pool: &SqlitePool) -> AppResult<Vec<UsuarioComAluno>> {
    let usuarios = sqlx::query_as::<_, UsuarioComAluno>(
        "SELECT u.id, u.username, u.perfil, u.nome, u.aluno_id, u.created_at, \
                a.nome_completo AS nome_aluno \
         FROM usuarios u \
         LEFT JOIN alunos a ON u.aluno_id = a.id \
         ORDER BY u.created_at DESC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} usuários.", usuarios.len());
    Ok(usuarios)
}

/// Alunos ativos que ainda não possuem login, para o seletor de vínculo.
pub async fn alunos_sem_login(db_pool: &SqlitePool) -> AppResult<Vec<Aluno>> {
    let alunos = sqlx::query_as::<_, Aluno>(
        "SELECT a.* FROM alunos a \
         LEFT JOIN usuarios u ON a.id = u.aluno_id \
         WHERE u.id IS NULL AND a.status = 'Ativo' \
         ORDER BY a.nome_completo",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(alunos)
}

/// Cria um usuário. Valida unicidade do username e, se houver vínculo,
/// que o aluno ainda não tenha login.
pub async fn criar(
    db_pool: &SqlitePool,
    username: &str,
    raw_password: &str,
    perfil: &str,
    nome: Option<&str>,
    aluno_id: Option<i64>,
) -> AppResult<i64> {
    tracing::info!("Tentando criar usuário: {}", username);

    let ja_existe: Option<i64> = sqlx::query_scalar("SELECT id FROM usuarios WHERE username = ?1")
        .bind(username)
        .fetch_optional(db_pool)
        .await?;
    if ja_existe.is_some() {
        return Err(AppError::Validation("Username já existe".to_string()));
    }

    if let Some(id_aluno) = aluno_id {
        let vinculado: Option<i64> =
            sqlx::query_scalar("SELECT id FROM usuarios WHERE aluno_id = ?1")
                .bind(id_aluno)
                .fetch_optional(db_pool)
                .await?;
        if vinculado.is_some() {
            return Err(AppError::Validation(
                "Este aluno já possui um login".to_string(),
            ));
        }
    }

    let password_hash = auth_service::hash_password(raw_password).await?;

    let resultado = sqlx::query(
        "INSERT INTO usuarios (username, password, perfil, nome, aluno_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(perfil)
    .bind(nome)
    .bind(aluno_id)
    .execute(db_pool)
    .await?;

    let usuario_id = resultado.last_insert_rowid();
    tracing::info!("✅ Usuário '{}' criado (id {}).", username, usuario_id);
    Ok(usuario_id)
}

/// Atualiza um usuário. Senha vazia mantém o hash atual.
pub async fn atualizar(
    db_pool: &SqlitePool,
    usuario_id: i64,
    username: &str,
    nova_senha: Option<&str>,
    perfil: &str,
    nome: Option<&str>,
    aluno_id: Option<i64>,
) -> AppResult<()> {
    tracing::info!("Atualizando usuário {}", usuario_id);

    let rows_affected = match nova_senha {
        Some(senha) if !senha.is_empty() => {
            let hash = auth_service::hash_password(senha).await?;
            sqlx::query(
                "UPDATE usuarios SET username = ?1, password = ?2, perfil = ?3, nome = ?4, aluno_id = ?5 \
                 WHERE id = ?6",
            )
            .bind(username)
            .bind(hash)
            .bind(perfil)
            .bind(nome)
            .bind(aluno_id)
            .bind(usuario_id)
            .execute(db_pool)
            .await?
            .rows_affected()
        }
        _ => sqlx::query(
            "UPDATE usuarios SET username = ?1, perfil = ?2, nome = ?3, aluno_id = ?4 \
             WHERE id = ?5",
        )
        .bind(username)
        .bind(perfil)
        .bind(nome)
        .bind(aluno_id)
        .bind(usuario_id)
        .execute(db_pool)
        .await?
        .rows_affected(),
    };

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("usuário {}", usuario_id)));
    }
    tracing::info!("✅ Usuário {} atualizado.", usuario_id);
    Ok(())
}

/// Exclui um usuário. O usuário logado não pode excluir a própria conta.
pub async fn excluir(db_pool: &SqlitePool, usuario_id: i64, usuario_logado: i64) -> AppResult<()> {
    if usuario_id == usuario_logado {
        return Err(AppError::Validation(
            "Não é possível deletar seu próprio usuário".to_string(),
        ));
    }
    sqlx::query("DELETE FROM usuarios WHERE id = ?1")
        .bind(usuario_id)
        .execute(db_pool)
        .await?;
    tracing::info!("🗑️ Usuário {} excluído.", usuario_id);
    Ok(())
}
