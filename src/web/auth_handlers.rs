// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::LoginForm,
    services::{auth_service, usuario_service},
    state::AppState,
    templates::LoginPage,
};
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_sessions::Session;

fn destino_pos_login(perfil: &str) -> &'static str {
    if perfil == "admin" {
        "/painel/dashboard"
    } else {
        "/portal/dashboard"
    }
}

// GET /login
pub async fn show_login_form(session: Session) -> AppResult<impl IntoResponse> {
    // Já logado: segue direto para a área correspondente
    if session.get::<i64>("usuario_id").await.ok().flatten().is_some() {
        let perfil = session
            .get::<String>("perfil")
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| "aluno".to_string());
        tracing::debug!("GET /login: usuário já logado, redirecionando.");
        return Ok(Redirect::to(destino_pos_login(&perfil)).into_response());
    }

    let template = LoginPage { error: None };
    Ok(Html(template.render()?).into_response())
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Tentativa de login para: {}", form.username);

    let usuario = usuario_service::find_por_username(&state.db_pool, &form.username).await?;

    let Some(usuario) = usuario else {
        tracing::warn!("Usuário não encontrado: {}", form.username);
        return render_login_invalido();
    };

    if !auth_service::verify_password(&form.password, &usuario.password).await? {
        tracing::warn!("Senha incorreta para: {}", form.username);
        return render_login_invalido();
    }

    // Novo ID de sessão a cada login
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID de sessão: {}", e)))?;
    session
        .insert("usuario_id", usuario.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao gravar sessão: {}", e)))?;
    session
        .insert("perfil", &usuario.perfil)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao gravar sessão: {}", e)))?;
    session
        .insert("nome", &usuario.nome)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao gravar sessão: {}", e)))?;
    session
        .insert("aluno_id", usuario.aluno_id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao gravar sessão: {}", e)))?;

    tracing::info!("✅ Login bem-sucedido: {} ({}).", usuario.username, usuario.perfil);
    Ok(Redirect::to(destino_pos_login(&usuario.perfil)).into_response())
}

fn render_login_invalido() -> AppResult<axum::response::Response> {
    let template = LoginPage {
        error: Some("Usuário ou senha inválidos.".to_string()),
    };
    Ok(Html(template.render()?).into_response())
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let usuario_id: Option<i64> = session.get("usuario_id").await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    if let Some(id) = usuario_id {
        tracing::info!("🚪 Usuário {} desconectado.", id);
    } else {
        tracing::info!("🚪 Sessão anônima encerrada.");
    }
    Ok(Redirect::to("/login"))
}
