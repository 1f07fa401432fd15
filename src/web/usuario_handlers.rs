// src/web/usuario_handlers.rs
use crate::{
    error::AppResult,
    models::{texto_opcional, usuario::UsuarioForm},
    services::usuario_service,
    state::AppState,
    templates::{SelectAlunos, UsuarioFormPage},
    web::{
        mw_auth::SessaoAtual,
        painel_handlers::{montar_contexto, ParamsSecao},
    },
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};

fn aluno_id_do_form(valor: &str) -> Option<i64> {
    valor.trim().parse::<i64>().ok()
}

// GET /painel/usuarios/novo
pub async fn show_novo_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
) -> AppResult<impl IntoResponse> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "usuarios").await;
    // Só oferece vínculo com alunos que ainda não têm login
    let sem_login = usuario_service::alunos_sem_login(&state.db_pool).await?;
    let template = UsuarioFormPage {
        ctx,
        usuario: None,
        alunos: SelectAlunos::dos_alunos(&sem_login, None),
        error_message: None,
    };
    Ok(Html(template.render()?))
}

// POST /painel/usuarios/novo
pub async fn handle_criar(
    State(state): State<AppState>,
    Form(form): Form<UsuarioForm>,
) -> AppResult<Redirect> {
    if form.username.trim().is_empty() || form.password.len() < 4 {
        let msg =
            urlencoding::encode("Username e senha (mín. 4 caracteres) são obrigatórios.")
                .to_string();
        return Ok(Redirect::to(&format!("/painel/usuarios?error={}", msg)));
    }

    let nome = texto_opcional(form.nome);
    let aluno_id = aluno_id_do_form(&form.aluno_id);

    match usuario_service::criar(
        &state.db_pool,
        form.username.trim(),
        &form.password,
        &form.perfil,
        nome.as_deref(),
        aluno_id,
    )
    .await
    {
        Ok(_) => {
            let msg = urlencoding::encode(&format!(
                "Usuário '{}' criado com sucesso.",
                form.username.trim()
            ))
            .to_string();
            Ok(Redirect::to(&format!("/painel/usuarios?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao criar usuário: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/usuarios?error={}", msg)))
        }
    }
}

// GET /painel/usuarios/editar/{id}
pub async fn show_editar_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(usuario_id): Path<i64>,
    Query(params): Query<ParamsSecao>,
) -> AppResult<Response> {
    let usuario = usuario_service::find_por_id(&state.db_pool, usuario_id).await?;
    let Some(usuario) = usuario else {
        tracing::warn!("Tentativa de editar usuário inexistente: {}", usuario_id);
        let msg = urlencoding::encode("Usuário não encontrado.").to_string();
        return Ok(Redirect::to(&format!("/painel/usuarios?error={}", msg)).into_response());
    };

    let ctx = montar_contexto(&state.db_pool, &sessao, "usuarios").await;
    // Além dos sem login, o aluno já vinculado a este usuário
    let mut disponiveis = usuario_service::alunos_sem_login(&state.db_pool).await?;
    if let Some(id_aluno) = usuario.aluno_id {
        if let Some(vinculado) =
            crate::services::aluno_service::obter(&state.db_pool, id_aluno).await?
        {
            disponiveis.push(vinculado);
        }
    }
    let alunos = SelectAlunos::dos_alunos(&disponiveis, usuario.aluno_id);

    let template = UsuarioFormPage {
        ctx,
        usuario: Some(usuario),
        alunos,
        // Feedback do Post/Redirect/Get quando a edição anterior falhou
        error_message: params.error,
    };
    Ok(Html(template.render()?).into_response())
}

// POST /painel/usuarios/editar/{id}
pub async fn handle_editar(
    State(state): State<AppState>,
    Path(usuario_id): Path<i64>,
    Form(form): Form<UsuarioForm>,
) -> AppResult<Redirect> {
    let nome = texto_opcional(form.nome);
    let aluno_id = aluno_id_do_form(&form.aluno_id);
    let nova_senha = if form.password.is_empty() {
        None
    } else {
        Some(form.password.as_str())
    };

    match usuario_service::atualizar(
        &state.db_pool,
        usuario_id,
        form.username.trim(),
        nova_senha,
        &form.perfil,
        nome.as_deref(),
        aluno_id,
    )
    .await
    {
        Ok(()) => {
            let msg = urlencoding::encode("Usuário atualizado.").to_string();
            Ok(Redirect::to(&format!("/painel/usuarios?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao editar usuário {}: {:?}", usuario_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/usuarios/editar/{}?error={}",
                usuario_id, msg
            )))
        }
    }
}

// POST /painel/usuarios/excluir/{id}
pub async fn handle_excluir(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(usuario_id): Path<i64>,
) -> AppResult<Redirect> {
    match usuario_service::excluir(&state.db_pool, usuario_id, sessao.usuario_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Usuário excluído.").to_string();
            Ok(Redirect::to(&format!("/painel/usuarios?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao excluir usuário {}: {:?}", usuario_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/usuarios?error={}", msg)))
        }
    }
}
