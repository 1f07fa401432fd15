// src/web/mw_admin.rs
use crate::{error::AppError, web::mw_auth::SessaoAtual};
use axum::{extract::Request, middleware::Next, response::Response, Extension};

/// Middleware que exige perfil admin. Deve ser executado depois de
/// `require_auth`, que coloca a SessaoAtual nas extensões.
pub async fn require_admin(
    Extension(sessao): Extension<SessaoAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if sessao.eh_admin() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Admin MW: acesso negado para usuário {} (perfil {}).",
            sessao.usuario_id,
            sessao.perfil
        );
        Err(AppError::Unauthorized)
    }
}
