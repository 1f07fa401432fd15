// src/web/justificativa_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        justificativa::{JustificativaForm, RevisaoJustificativaForm},
        texto_opcional,
    },
    services::justificativa_service,
    state::AppState,
    web::mw_auth::SessaoAtual,
};
use axum::{
    extract::{Form, Path, State},
    response::Redirect,
    Extension,
};

// POST /portal/justificativas/nova
// Enviada pelo aluno logado; o aluno_id vem sempre da sessão.
pub async fn handle_criar_pelo_aluno(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Form(form): Form<JustificativaForm>,
) -> AppResult<Redirect> {
    let aluno_id = sessao.aluno_id.ok_or(AppError::Unauthorized)?;

    match justificativa_service::criar(
        &state.db_pool,
        aluno_id,
        &form.data_ausencia,
        &form.justificativa,
    )
    .await
    {
        Ok(_) => {
            let msg = urlencoding::encode("Justificativa enviada ao sensei.").to_string();
            Ok(Redirect::to(&format!(
                "/portal/justificativas?success={}",
                msg
            )))
        }
        Err(e) => {
            tracing::warn!("Falha ao criar justificativa: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/portal/justificativas?error={}",
                msg
            )))
        }
    }
}

// POST /painel/justificativas/nova
// O admin pode registrar em nome de um aluno (ex.: atestado em papel).
pub async fn handle_criar_pelo_admin(
    State(state): State<AppState>,
    Form(form): Form<JustificativaForm>,
) -> AppResult<Redirect> {
    let Some(aluno_id) = form.aluno_id else {
        let msg = urlencoding::encode("Selecione o aluno.").to_string();
        return Ok(Redirect::to(&format!(
            "/painel/justificativas?error={}",
            msg
        )));
    };

    match justificativa_service::criar(
        &state.db_pool,
        aluno_id,
        &form.data_ausencia,
        &form.justificativa,
    )
    .await
    {
        Ok(_) => {
            let msg = urlencoding::encode("Justificativa registrada.").to_string();
            Ok(Redirect::to(&format!(
                "/painel/justificativas?success={}",
                msg
            )))
        }
        Err(e) => {
            tracing::warn!("Falha ao registrar justificativa: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/justificativas?error={}",
                msg
            )))
        }
    }
}

// POST /painel/justificativas/revisar/{id}
pub async fn handle_revisar(
    State(state): State<AppState>,
    Path(justificativa_id): Path<i64>,
    Form(form): Form<RevisaoJustificativaForm>,
) -> AppResult<Redirect> {
    let observacao = texto_opcional(form.observacao_sensei);

    match justificativa_service::revisar(
        &state.db_pool,
        justificativa_id,
        &form.status,
        observacao.as_deref(),
    )
    .await
    {
        Ok(()) => {
            let msg =
                urlencoding::encode(&format!("Justificativa {}.", form.status.to_lowercase()))
                    .to_string();
            Ok(Redirect::to(&format!(
                "/painel/justificativas?success={}",
                msg
            )))
        }
        Err(e) => {
            tracing::warn!(
                "Falha ao revisar justificativa {}: {:?}",
                justificativa_id,
                e
            );
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/justificativas?error={}",
                msg
            )))
        }
    }
}

// POST /painel/justificativas/lida/{id}
pub async fn handle_marcar_lida(
    State(state): State<AppState>,
    Path(justificativa_id): Path<i64>,
) -> AppResult<Redirect> {
    if let Err(e) = justificativa_service::marcar_lida(&state.db_pool, justificativa_id).await {
        tracing::warn!(
            "Falha ao marcar justificativa {} como lida: {:?}",
            justificativa_id,
            e
        );
    }
    Ok(Redirect::to("/painel/justificativas"))
}
