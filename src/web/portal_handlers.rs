// src/web/portal_handlers.rs
//
// Portal do aluno: visão somente-leitura das próprias presenças e
// avaliações liberadas, mais avisos, biblioteca (filtrada pela faixa),
// justificativas e notificações.
use crate::{
    error::{AppError, AppResult},
    models::{
        biblioteca::{FiltroBiblioteca, TIPOS_GOLPES},
        dashboard::FiltroFrequencia,
        justificativa::FiltroJustificativas,
        presenca::FiltroPresencas,
    },
    services::{
        aluno_service, avaliacao_service, aviso_service, biblioteca_service, dashboard_service,
        justificativa_service, notificacao_service, presenca_service,
    },
    state::AppState,
    templates::{
        NotificacoesPage, PortalAvaliacoesPage, PortalAvisosPage, PortalBibliotecaPage,
        PortalDashboardPage, PortalJustificativasPage, PortalPresencasPage,
    },
    web::{
        mw_auth::SessaoAtual,
        painel_handlers::{montar_contexto, voltar_para, ParamsSecao},
        secoes::SecaoPortal,
    },
};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};

// GET /portal
pub async fn index() -> Redirect {
    Redirect::to("/portal/dashboard")
}

// GET /portal/{secao}
pub async fn mostrar_secao(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(slug): Path<String>,
    Query(params): Query<ParamsSecao>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Some(secao) = SecaoPortal::do_slug(&slug) else {
        tracing::warn!("Seção de portal desconhecida: '{}'", slug);
        return Ok(voltar_para(&headers, "/portal/dashboard").into_response());
    };

    // O middleware garante o vínculo, mas a sessão pode ter sido criada
    // antes de o vínculo ser removido
    let aluno_id = sessao.aluno_id.ok_or(AppError::Unauthorized)?;
    let ctx = montar_contexto(&state.db_pool, &sessao, secao.slug()).await;
    let db = &state.db_pool;

    let html = match secao {
        SecaoPortal::Dashboard => {
            let ficha = aluno_service::obter_ficha(db, aluno_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("aluno {}", aluno_id)))?;
            let filtro = FiltroFrequencia {
                data_inicio: None,
                data_fim: None,
                tipo_aluno: None,
            };
            let frequencia = dashboard_service::frequencia(db, &filtro, Some(aluno_id))
                .await?
                .into_iter()
                .next();
            let avisos = aviso_service::listar(db).await?;
            PortalDashboardPage {
                ctx,
                ficha,
                frequencia,
                avisos,
            }
            .render()?
        }
        SecaoPortal::Presencas => {
            let filtro = FiltroPresencas {
                aluno_id: None,
                data_inicio: params.data_inicio,
                data_fim: params.data_fim,
            };
            let presencas = presenca_service::listar(db, &filtro, Some(aluno_id)).await?;
            PortalPresencasPage { ctx, presencas }.render()?
        }
        SecaoPortal::Avaliacoes => {
            let avaliacoes = avaliacao_service::listar(db, None, Some(aluno_id)).await?;
            PortalAvaliacoesPage { ctx, avaliacoes }.render()?
        }
        SecaoPortal::Avisos => {
            let avisos = aviso_service::listar(db).await?;
            PortalAvisosPage { ctx, avisos }.render()?
        }
        SecaoPortal::Biblioteca => {
            let aluno = aluno_service::obter(db, aluno_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("aluno {}", aluno_id)))?;
            let filtro = FiltroBiblioteca {
                graduacao: Some(aluno.graduacao_atual.clone()),
                modalidade: aluno.modalidade.clone(),
                tipo_golpe: params.tipo_golpe.clone(),
            };
            let conteudos = biblioteca_service::listar(db, &filtro).await?;
            PortalBibliotecaPage {
                ctx,
                conteudos,
                tipos: TIPOS_GOLPES,
                filtro_tipo: params.tipo_golpe,
            }
            .render()?
        }
        SecaoPortal::Justificativas => {
            let filtro = FiltroJustificativas {
                aluno_id: None,
                status: None,
            };
            let justificativas =
                justificativa_service::listar(db, &filtro, Some(aluno_id)).await?;
            PortalJustificativasPage {
                ctx,
                justificativas,
                hoje: aluno_service::hoje_iso(),
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPortal::Notificacoes => {
            let notificacoes =
                notificacao_service::listar_do_usuario(db, sessao.usuario_id, false).await?;
            NotificacoesPage { ctx, notificacoes }.render()?
        }
    };

    Ok(Html(html).into_response())
}
