// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Dados do usuário logado, extraídos da sessão pelo middleware e
/// disponibilizados aos handlers via extensões da requisição.
#[derive(Clone, Debug)]
pub struct SessaoAtual {
    pub usuario_id: i64,
    pub perfil: String,
    pub nome: Option<String>,
    pub aluno_id: Option<i64>,
}

impl SessaoAtual {
    pub fn eh_admin(&self) -> bool {
        self.perfil == "admin"
    }
}

/// Middleware que exige sessão autenticada. Sem sessão válida,
/// redireciona para /login.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let usuario_id = session
        .get::<i64>("usuario_id")
        .await
        .map_err(|e| AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))?;

    match usuario_id {
        Some(usuario_id) => {
            let perfil = session
                .get::<String>("perfil")
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| "aluno".to_string());
            let nome = session.get::<String>("nome").await.ok().flatten();
            let aluno_id = session.get::<i64>("aluno_id").await.ok().flatten();

            tracing::debug!(
                "Autenticação MW: usuário {} ({}) autenticado.",
                usuario_id,
                perfil
            );
            request.extensions_mut().insert(SessaoAtual {
                usuario_id,
                perfil,
                nome,
                aluno_id,
            });
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Autenticação MW: sem sessão, redirecionando para /login");
            Ok(Redirect::to("/login").into_response())
        }
    }
}
