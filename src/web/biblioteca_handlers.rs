// src/web/biblioteca_handlers.rs
use crate::{
    error::AppResult,
    models::{
        aluno::GRADUACOES,
        biblioteca::{BibliotecaForm, TIPOS_GOLPES},
        texto_opcional,
    },
    services::biblioteca_service::{self, DadosConteudo},
    state::AppState,
    templates::BibliotecaFormPage,
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

fn normalizar_form(form: BibliotecaForm) -> DadosConteudo {
    DadosConteudo {
        titulo: form.titulo.trim().to_string(),
        tipo_golpe: form.tipo_golpe,
        graduacao_minima: texto_opcional(form.graduacao_minima),
        modalidade: texto_opcional(form.modalidade),
        url_video: texto_opcional(form.url_video),
        url_foto: texto_opcional(form.url_foto),
        instrucoes: texto_opcional(form.instrucoes),
        descricao: texto_opcional(form.descricao),
    }
}

// GET /painel/biblioteca/novo
pub async fn show_novo_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
) -> AppResult<impl IntoResponse> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "biblioteca").await;
    let template = BibliotecaFormPage {
        ctx,
        conteudo: None,
        tipos: TIPOS_GOLPES,
        graduacoes: GRADUACOES,
        error_message: None,
    };
    Ok(Html(template.render()?))
}

// POST /painel/biblioteca/novo
pub async fn handle_criar(
    State(state): State<AppState>,
    Form(form): Form<BibliotecaForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(form);
    match biblioteca_service::criar(&state.db_pool, &dados).await {
        Ok(_) => {
            let msg = urlencoding::encode("Conteúdo adicionado à biblioteca.").to_string();
            Ok(Redirect::to(&format!("/painel/biblioteca?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao criar conteúdo: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/biblioteca?error={}", msg)))
        }
    }
}

// GET /painel/biblioteca/editar/{id}
pub async fn show_editar_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(conteudo_id): Path<i64>,
    Query(params): Query<ParamsSecao>,
) -> AppResult<Response> {
    let conteudo = biblioteca_service::obter(&state.db_pool, conteudo_id).await?;
    if conteudo.is_none() {
        tracing::warn!("Tentativa de editar conteúdo inexistente: {}", conteudo_id);
        let msg = urlencoding::encode("Conteúdo não encontrado.").to_string();
        return Ok(Redirect::to(&format!("/painel/biblioteca?error={}", msg)).into_response());
    }

    let ctx = montar_contexto(&state.db_pool, &sessao, "biblioteca").await;
    let template = BibliotecaFormPage {
        ctx,
        conteudo,
        tipos: TIPOS_GOLPES,
        graduacoes: GRADUACOES,
        // Feedback do Post/Redirect/Get quando a edição anterior falhou
        error_message: params.error,
    };
    Ok(Html(template.render()?).into_response())
}

// POST /painel/biblioteca/editar/{id}
pub async fn handle_editar(
    State(state): State<AppState>,
    Path(conteudo_id): Path<i64>,
    Form(form): Form<BibliotecaForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(form);
    match biblioteca_service::atualizar(&state.db_pool, conteudo_id, &dados).await {
        Ok(()) => {
            let msg = urlencoding::encode("Conteúdo atualizado.").to_string();
            Ok(Redirect::to(&format!("/painel/biblioteca?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao editar conteúdo {}: {:?}", conteudo_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/biblioteca/editar/{}?error={}",
                conteudo_id, msg
            )))
        }
    }
}

// POST /painel/biblioteca/excluir/{id}
pub async fn handle_excluir(
    State(state): State<AppState>,
    Path(conteudo_id): Path<i64>,
) -> AppResult<Redirect> {
    match biblioteca_service::excluir(&state.db_pool, conteudo_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Conteúdo excluído.").to_string();
            Ok(Redirect::to(&format!("/painel/biblioteca?success={}", msg)))
        }
        Err(e) => {
            tracing::error!("Falha ao excluir conteúdo {}: {:?}", conteudo_id, e);
            let msg = urlencoding::encode("Erro ao excluir conteúdo.").to_string();
            Ok(Redirect::to(&format!("/painel/biblioteca?error={}", msg)))
        }
    }
}
