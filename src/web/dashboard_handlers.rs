// src/web/dashboard_handlers.rs
//
// Endpoints JSON consumidos pelos gráficos dos dashboards. O perfil
// aluno só recebe os próprios dados, independente dos filtros enviados.
use crate::{
    error::AppResult,
    models::dashboard::{FiltroEvolucao, FiltroFrequencia},
    services::dashboard_service,
    state::AppState,
    web::mw_auth::SessaoAtual,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde_json::{json, Value};

fn escopo_da_sessao(sessao: &SessaoAtual) -> Option<i64> {
    if sessao.eh_admin() {
        None
    } else {
        sessao.aluno_id
    }
}

// GET /api/dashboard/frequencia
pub async fn frequencia(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(filtro): Query<FiltroFrequencia>,
) -> AppResult<Json<Value>> {
    let escopo = escopo_da_sessao(&sessao);
    let frequencias = dashboard_service::frequencia(&state.db_pool, &filtro, escopo).await?;
    Ok(Json(json!({ "frequencias": frequencias })))
}

// GET /api/dashboard/evolucao
pub async fn evolucao(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(filtro): Query<FiltroEvolucao>,
) -> AppResult<Json<Value>> {
    let escopo = escopo_da_sessao(&sessao);
    let pontos = dashboard_service::evolucao(&state.db_pool, &filtro, escopo).await?;
    Ok(Json(json!({ "evolucao": pontos })))
}
