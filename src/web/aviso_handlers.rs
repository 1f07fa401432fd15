// src/web/aviso_handlers.rs
use crate::{
    error::AppResult,
    models::aviso::AvisoForm,
    services::{aluno_service, aviso_service},
    state::AppState,
};
use axum::{
    extract::{Form, Path, State},
    response::Redirect,
};

// POST /painel/avisos/novo
pub async fn handle_criar(
    State(state): State<AppState>,
    Form(form): Form<AvisoForm>,
) -> AppResult<Redirect> {
    let data = if form.data_publicacao.trim().is_empty() {
        aluno_service::hoje_iso()
    } else {
        form.data_publicacao.clone()
    };

    match aviso_service::criar(&state.db_pool, &form.titulo, &form.conteudo, &data).await {
        Ok(_) => {
            let msg = urlencoding::encode("Aviso publicado.").to_string();
            Ok(Redirect::to(&format!("/painel/avisos?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao publicar aviso: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/avisos?error={}", msg)))
        }
    }
}

// POST /painel/avisos/excluir/{id}
pub async fn handle_excluir(
    State(state): State<AppState>,
    Path(aviso_id): Path<i64>,
) -> AppResult<Redirect> {
    match aviso_service::excluir(&state.db_pool, aviso_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Aviso excluído.").to_string();
            Ok(Redirect::to(&format!("/painel/avisos?success={}", msg)))
        }
        Err(e) => {
            tracing::error!("Falha ao excluir aviso {}: {:?}", aviso_id, e);
            let msg = urlencoding::encode("Erro ao excluir aviso.").to_string();
            Ok(Redirect::to(&format!("/painel/avisos?error={}", msg)))
        }
    }
}
