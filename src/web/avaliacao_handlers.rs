// src/web/avaliacao_handlers.rs
use crate::{
    error::AppResult,
    models::{avaliacao::AvaliacaoForm, numero_opcional, texto_opcional},
    services::{
        aluno_service,
        avaliacao_service::{self, DadosAvaliacao},
    },
    state::AppState,
    templates::{AvaliacaoFormPage, SelectAlunos},
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

fn normalizar_form(form: &AvaliacaoForm) -> DadosAvaliacao {
    DadosAvaliacao {
        aluno_id: form.aluno_id,
        data_avaliacao: form.data_avaliacao.clone(),
        disciplina: numero_opcional(&form.disciplina),
        tecnica: numero_opcional(&form.tecnica),
        participacao: numero_opcional(&form.participacao),
        respeito_comportamento: numero_opcional(&form.respeito_comportamento),
        observacoes: texto_opcional(form.observacoes.clone()),
    }
}

// GET /painel/avaliacoes/novo
pub async fn show_novo_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
) -> AppResult<impl IntoResponse> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "avaliacoes").await;
    let ativos = aluno_service::listar_ativos(&state.db_pool).await?;
    let template = AvaliacaoFormPage {
        ctx,
        avaliacao: None,
        alunos: SelectAlunos::dos_alunos(&ativos, None),
        hoje: aluno_service::hoje_iso(),
        error_message: None,
    };
    Ok(Html(template.render()?))
}

// POST /painel/avaliacoes/novo
pub async fn handle_criar(
    State(state): State<AppState>,
    Form(form): Form<AvaliacaoForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(&form);
    match avaliacao_service::criar(&state.db_pool, &dados).await {
        Ok(_) => {
            let msg = urlencoding::encode("Avaliação criada como rascunho.").to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao criar avaliação: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?error={}", msg)))
        }
    }
}

// GET /painel/avaliacoes/editar/{id}
pub async fn show_editar_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(avaliacao_id): Path<i64>,
    Query(params): Query<ParamsSecao>,
) -> AppResult<Response> {
    let avaliacao = avaliacao_service::obter(&state.db_pool, avaliacao_id).await?;
    let Some(avaliacao) = avaliacao else {
        tracing::warn!("Tentativa de editar avaliação inexistente: {}", avaliacao_id);
        let msg = urlencoding::encode("Avaliação não encontrada.").to_string();
        return Ok(Redirect::to(&format!("/painel/avaliacoes?error={}", msg)).into_response());
    };

    let ctx = montar_contexto(&state.db_pool, &sessao, "avaliacoes").await;
    let ativos = aluno_service::listar_ativos(&state.db_pool).await?;
    let alunos = SelectAlunos::dos_alunos(&ativos, Some(avaliacao.aluno_id));
    let template = AvaliacaoFormPage {
        ctx,
        avaliacao: Some(avaliacao),
        alunos,
        hoje: aluno_service::hoje_iso(),
        // Feedback do Post/Redirect/Get quando a edição anterior falhou
        error_message: params.error,
    };
    Ok(Html(template.render()?).into_response())
}

// POST /painel/avaliacoes/editar/{id}
pub async fn handle_editar(
    State(state): State<AppState>,
    Path(avaliacao_id): Path<i64>,
    Form(form): Form<AvaliacaoForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(&form);
    match avaliacao_service::atualizar(&state.db_pool, avaliacao_id, &dados, form.status.as_deref())
        .await
    {
        Ok(()) => {
            let msg = urlencoding::encode("Avaliação atualizada.").to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao editar avaliação {}: {:?}", avaliacao_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/avaliacoes/editar/{}?error={}",
                avaliacao_id, msg
            )))
        }
    }
}

// POST /painel/avaliacoes/liberar/{id}
pub async fn handle_liberar(
    State(state): State<AppState>,
    Path(avaliacao_id): Path<i64>,
) -> AppResult<Redirect> {
    match avaliacao_service::liberar(&state.db_pool, avaliacao_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Avaliação liberada para o aluno.").to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao liberar avaliação {}: {:?}", avaliacao_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?error={}", msg)))
        }
    }
}

// POST /painel/avaliacoes/excluir/{id}
pub async fn handle_excluir(
    State(state): State<AppState>,
    Path(avaliacao_id): Path<i64>,
) -> AppResult<Redirect> {
    match avaliacao_service::excluir(&state.db_pool, avaliacao_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Avaliação excluída.").to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?success={}", msg)))
        }
        Err(e) => {
            tracing::error!("Falha ao excluir avaliação {}: {:?}", avaliacao_id, e);
            let msg = urlencoding::encode("Erro ao excluir avaliação.").to_string();
            Ok(Redirect::to(&format!("/painel/avaliacoes?error={}", msg)))
        }
    }
}
