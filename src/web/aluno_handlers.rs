// src/web/aluno_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::{AlunoForm, GRADUACOES},
        numero_opcional, texto_opcional,
    },
    services::{
        aluno_service::{self, DadosAluno},
        importacao_service,
    },
    state::AppState,
    templates::{AlunoFormPage, ImportarAlunosPage},
    web::{
        mw_auth::SessaoAtual,
        painel_handlers::{montar_contexto, ParamsSecao},
    },
};
use askama::Template;
use axum::{
    extract::{Form, Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};

fn normalizar_form(form: AlunoForm) -> DadosAluno {
    DadosAluno {
        nome_completo: form.nome_completo.trim().to_string(),
        tipo: if form.tipo == "Adulto" {
            "Adulto".to_string()
        } else {
            "Criança".to_string()
        },
        data_nascimento: texto_opcional(form.data_nascimento),
        nome_responsavel: texto_opcional(form.nome_responsavel),
        contato: texto_opcional(form.contato),
        data_matricula: texto_opcional(form.data_matricula)
            .unwrap_or_else(aluno_service::hoje_iso),
        status: if form.status == "Inativo" {
            "Inativo".to_string()
        } else {
            "Ativo".to_string()
        },
        observacoes: texto_opcional(form.observacoes),
        graduacao_atual: texto_opcional(form.graduacao_atual)
            .unwrap_or_else(|| "Branca".to_string()),
        modalidade: texto_opcional(form.modalidade),
        pode_graduar: form.pode_graduar.is_some(),
        graduar_para: texto_opcional(form.graduar_para),
        peso: numero_opcional(&form.peso),
        altura: numero_opcional(&form.altura),
    }
}

// GET /painel/alunos/novo
pub async fn show_novo_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
) -> AppResult<impl IntoResponse> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "alunos").await;
    let template = AlunoFormPage {
        ctx,
        aluno: None,
        graduacoes: GRADUACOES,
        hoje: aluno_service::hoje_iso(),
        error_message: None,
    };
    Ok(Html(template.render()?))
}

// POST /painel/alunos/novo
pub async fn handle_criar(
    State(state): State<AppState>,
    Form(form): Form<AlunoForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(form);
    match aluno_service::criar(&state.db_pool, &dados).await {
        Ok(_) => {
            let msg = urlencoding::encode(&format!(
                "Aluno '{}' cadastrado com sucesso.",
                dados.nome_completo
            ))
            .to_string();
            Ok(Redirect::to(&format!("/painel/alunos?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao criar aluno: {:?}", e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!("/painel/alunos?error={}", msg)))
        }
    }
}

// GET /painel/alunos/editar/{id}
pub async fn show_editar_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(aluno_id): Path<i64>,
    Query(params): Query<ParamsSecao>,
) -> AppResult<Response> {
    let aluno = aluno_service::obter(&state.db_pool, aluno_id).await?;
    if aluno.is_none() {
        tracing::warn!("Tentativa de editar aluno inexistente: {}", aluno_id);
        let msg = urlencoding::encode("Aluno não encontrado.").to_string();
        return Ok(Redirect::to(&format!("/painel/alunos?error={}", msg)).into_response());
    }

    let ctx = montar_contexto(&state.db_pool, &sessao, "alunos").await;
    let template = AlunoFormPage {
        ctx,
        aluno,
        graduacoes: GRADUACOES,
        hoje: aluno_service::hoje_iso(),
        // Feedback do Post/Redirect/Get quando a edição anterior falhou
        error_message: params.error,
    };
    Ok(Html(template.render()?).into_response())
}

// POST /painel/alunos/editar/{id}
pub async fn handle_editar(
    State(state): State<AppState>,
    Path(aluno_id): Path<i64>,
    Form(form): Form<AlunoForm>,
) -> AppResult<Redirect> {
    let dados = normalizar_form(form);
    match aluno_service::atualizar(&state.db_pool, aluno_id, &dados).await {
        Ok(()) => {
            let msg = urlencoding::encode(&format!(
                "Dados de '{}' atualizados.",
                dados.nome_completo
            ))
            .to_string();
            Ok(Redirect::to(&format!("/painel/alunos?success={}", msg)))
        }
        Err(e) => {
            tracing::warn!("Falha ao editar aluno {}: {:?}", aluno_id, e);
            let msg = urlencoding::encode(&e.to_string()).to_string();
            Ok(Redirect::to(&format!(
                "/painel/alunos/editar/{}?error={}",
                aluno_id, msg
            )))
        }
    }
}

// POST /painel/alunos/excluir/{id}
pub async fn handle_excluir(
    State(state): State<AppState>,
    Path(aluno_id): Path<i64>,
) -> AppResult<Redirect> {
    match aluno_service::excluir(&state.db_pool, aluno_id).await {
        Ok(()) => {
            let msg = urlencoding::encode("Aluno excluído.").to_string();
            Ok(Redirect::to(&format!("/painel/alunos?success={}", msg)))
        }
        Err(e) => {
            tracing::error!("Falha ao excluir aluno {}: {:?}", aluno_id, e);
            let msg = urlencoding::encode("Erro ao excluir aluno.").to_string();
            Ok(Redirect::to(&format!("/painel/alunos?error={}", msg)))
        }
    }
}

// GET /painel/alunos/importar
pub async fn show_importar(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
) -> AppResult<impl IntoResponse> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "alunos").await;
    let template = ImportarAlunosPage {
        ctx,
        relatorio: None,
        error_message: None,
    };
    Ok(Html(template.render()?))
}

// POST /painel/alunos/importar (multipart com o campo "arquivo")
pub async fn handle_importar(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let ctx = montar_contexto(&state.db_pool, &sessao, "alunos").await;

    let mut conteudo: Option<String> = None;
    while let Some(campo) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Upload inválido: {}", e)))?
    {
        if campo.name() == Some("arquivo") {
            let bytes = campo
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Falha ao ler arquivo: {}", e)))?;
            // UTF-8 com fallback tolerante para planilhas exportadas em latin-1
            conteudo = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    let Some(conteudo) = conteudo else {
        let template = ImportarAlunosPage {
            ctx,
            relatorio: None,
            error_message: Some("Nenhum arquivo enviado.".to_string()),
        };
        return Ok(Html(template.render()?).into_response());
    };

    match importacao_service::importar_csv(&state.db_pool, &conteudo).await {
        Ok(relatorio) => {
            let template = ImportarAlunosPage {
                ctx,
                relatorio: Some(relatorio),
                error_message: None,
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => {
            tracing::warn!("Importação falhou: {:?}", e);
            let template = ImportarAlunosPage {
                ctx,
                relatorio: None,
                error_message: Some(e.to_string()),
            };
            Ok(Html(template.render()?).into_response())
        }
    }
}

// GET /painel/alunos/template.csv
pub async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=template_importacao_alunos.csv",
            ),
        ],
        importacao_service::gerar_template_csv(),
    )
}
