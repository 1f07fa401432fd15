// src/web/rematricula_handlers.rs
use crate::{
    error::AppResult,
    services::rematricula_service,
    state::AppState,
    templates::RematriculaPublicaPage,
};
use askama::Template;
use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GerarRematriculaForm {
    pub aluno_id: i64,
    pub data_rematricula: String,
    #[serde(default)]
    pub valor_pago: f64,
}

// POST /painel/rematriculas/gerar
pub async fn handle_gerar(
    State(state): State<AppState>,
    Form(form): Form<GerarRematriculaForm>,
) -> AppResult<Redirect> {
    match rematricula_service::gerar(
        &state.db_pool,
        form.aluno_id,
        &form.data_rematricula,
        form.valor_pago,
    )
    .await
    {
        Ok(link) => {
            let msg = urlencoding::encode(&format!("Link gerado: {}", link)).to_string();
            Ok(Redirect::to(&format!(
                "/painel/rematriculas?success={}",
                msg
            )))
        }
        Err(e) => {
            tracing::warn!("Falha ao gerar rematrícula: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/rematriculas?error={}", msg)))
        }
    }
}

// GET /rematricula/{token} (página pública, sem login)
pub async fn show_pagina_publica(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let rematricula = rematricula_service::obter_por_token(&state.db_pool, &token).await?;
    if rematricula.is_none() {
        tracing::warn!("Acesso a token de rematrícula inválido ou já usado.");
    }
    let template = RematriculaPublicaPage {
        rematricula,
        confirmada: false,
    };
    Ok(Html(template.render()?))
}

// POST /rematricula/{token}/confirmar
pub async fn handle_confirmar(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    match rematricula_service::confirmar(&state.db_pool, &token).await {
        Ok(_) => {
            let template = RematriculaPublicaPage {
                rematricula: None,
                confirmada: true,
            };
            Ok(Html(template.render()?))
        }
        Err(e) => {
            tracing::warn!("Confirmação de rematrícula falhou: {:?}", e);
            // Token inválido ou já usado: mesma página de link inválido
            let template = RematriculaPublicaPage {
                rematricula: None,
                confirmada: false,
            };
            Ok(Html(template.render()?))
        }
    }
}
