// src/web/mw_aluno.rs
use crate::{error::AppError, web::mw_auth::SessaoAtual};
use axum::{extract::Request, middleware::Next, response::Response, Extension};

/// Middleware do portal do aluno: exige perfil aluno com vínculo a um
/// registro de aluno. Admins usam o painel, não o portal.
pub async fn require_aluno(
    Extension(sessao): Extension<SessaoAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if sessao.perfil == "aluno" && sessao.aluno_id.is_some() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Aluno MW: acesso negado para usuário {} (perfil {}, aluno_id {:?}).",
            sessao.usuario_id,
            sessao.perfil,
            sessao.aluno_id
        );
        Err(AppError::Unauthorized)
    }
}
