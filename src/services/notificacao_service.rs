// src/services/notificacao_service.rs
use crate::{
    error::{AppError, AppResult},
    models::notificacao::{Notificacao, NovaNotificacao},
};
use sqlx::SqlitePool;

pub async fn criar(db_pool: &SqlitePool, nova: &NovaNotificacao) -> AppResult<i64> {
    let resultado = sqlx::query(
        "INSERT INTO notificacoes (usuario_id, aluno_id, tipo, titulo, mensagem, link) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(nova.usuario_id)
    .bind(nova.aluno_id)
    .bind(&nova.tipo)
    .bind(&nova.titulo)
    .bind(&nova.mensagem)
    .bind(&nova.link)
    .execute(db_pool)
    .await?;
    Ok(resultado.last_insert_rowid())
}

/// Cria a mesma notificação para todos os usuários admin (ex.: nova
/// justificativa de ausência enviada por um aluno).
pub async fn notificar_admins(db_pool: &SqlitePool, modelo: &NovaNotificacao) -> AppResult<()> {
    let admins: Vec<i64> = sqlx::query_scalar("SELECT id FROM usuarios WHERE perfil = 'admin'")
        .fetch_all(db_pool)
        .await?;

    for admin_id in admins {
        let nova = NovaNotificacao {
            usuario_id: Some(admin_id),
            ..modelo.clone()
        };
        criar(db_pool, &nova).await?;
    }
    Ok(())
}

/// Notificações do usuário logado, mais recentes primeiro (limite 50).
pub async fn listar_do_usuario(
    db_pool: &SqlitePool,
    usuario_id: i64,
    apenas_nao_lidas: bool,
) -> AppResult<Vec<Notificacao>> {
    let mut sql = String::from("SELECT * FROM notificacoes WHERE usuario_id = ?1");
    if apenas_nao_lidas {
        sql.push_str(" AND lida = 0");
    }
    sql.push_str(" ORDER BY data_notificacao DESC LIMIT 50");

    let notificacoes = sqlx::query_as::<_, Notificacao>(&sql)
        .bind(usuario_id)
        .fetch_all(db_pool)
        .await?;
    Ok(notificacoes)
}

pub async fn contar_nao_lidas(db_pool: &SqlitePool, usuario_id: i64) -> AppResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notificacoes WHERE usuario_id = ?1 AND lida = 0",
    )
    .bind(usuario_id)
    .fetch_one(db_pool)
    .await?;
    Ok(total)
}

/// Marca uma notificação como lida, validando que pertence ao usuário.
pub async fn marcar_lida(
    db_pool: &SqlitePool,
    notificacao_id: i64,
    usuario_id: i64,
) -> AppResult<()> {
    let rows_affected =
        sqlx::query("UPDATE notificacoes SET lida = 1 WHERE id = ?1 AND usuario_id = ?2")
            .bind(notificacao_id)
            .bind(usuario_id)
            .execute(db_pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "notificação {}",
            notificacao_id
        )));
    }
    Ok(())
}

pub async fn marcar_todas_lidas(db_pool: &SqlitePool, usuario_id: i64) -> AppResult<()> {
    sqlx::query("UPDATE notificacoes SET lida = 1 WHERE usuario_id = ?1 AND lida = 0")
        .bind(usuario_id)
        .execute(db_pool)
        .await?;
    Ok(())
}
