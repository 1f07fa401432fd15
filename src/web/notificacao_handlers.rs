// src/web/notificacao_handlers.rs
use crate::{
    error::AppResult, services::notificacao_service, state::AppState, web::mw_auth::SessaoAtual,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
    Extension,
};

use crate::web::painel_handlers::voltar_para;

// POST /notificacoes/ler/{id}
// Marca como lida e volta para a página onde o usuário estava.
pub async fn handle_marcar_lida(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(notificacao_id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    if let Err(e) =
        notificacao_service::marcar_lida(&state.db_pool, notificacao_id, sessao.usuario_id).await
    {
        // Notificação de outro usuário ou inexistente: só loga
        tracing::warn!(
            "Falha ao marcar notificação {} como lida: {:?}",
            notificacao_id,
            e
        );
    }
    Ok(voltar_para(&headers, "/portal/notificacoes"))
}

// POST /notificacoes/ler-todas
pub async fn handle_marcar_todas(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    notificacao_service::marcar_todas_lidas(&state.db_pool, sessao.usuario_id).await?;
    Ok(voltar_para(&headers, "/portal/notificacoes"))
}
