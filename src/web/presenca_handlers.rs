// src/web/presenca_handlers.rs
use crate::{
    error::AppResult,
    models::{presenca::PresencaForm, texto_opcional},
    services::presenca_service,
    state::AppState,
};
use axum::{
    extract::{Form, State},
    response::Redirect,
};

// POST /painel/presencas/registrar
// Usado linha a linha pela folha de chamada; registrar de novo para o
// mesmo aluno e data substitui o estado anterior.
pub async fn handle_registrar(
    State(state): State<AppState>,
    Form(form): Form<PresencaForm>,
) -> AppResult<Redirect> {
    let presente = form.presente == "1";
    let justificativa = texto_opcional(form.justificativa);

    match presenca_service::registrar(
        &state.db_pool,
        form.aluno_id,
        &form.data,
        presente,
        justificativa.as_deref(),
    )
    .await
    {
        Ok(()) => Ok(Redirect::to(&format!(
            "/painel/presencas?data={}",
            form.data
        ))),
        Err(e) => {
            tracing::warn!("Falha ao registrar presença: {:?}", e);
            let msg = urlencoding::encode("Erro ao registrar presença.").to_string();
            Ok(Redirect::to(&format!(
                "/painel/presencas?data={}&error={}",
                form.data, msg
            )))
        }
    }
}
