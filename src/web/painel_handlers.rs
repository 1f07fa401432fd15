// src/web/painel_handlers.rs
//
// Páginas do painel administrativo. Todas as seções são servidas por
// /painel/{secao}: o slug decide quais dados carregar e qual template
// renderizar. Slug desconhecido gera um aviso no log e volta para a
// página anterior, nunca um erro 500.
use crate::{
    error::AppResult,
    models::{
        biblioteca::{FiltroBiblioteca, TIPOS_GOLPES},
        justificativa::FiltroJustificativas,
        presenca::FiltroPresencas,
    },
    services::{
        aluno_service, avaliacao_service, aviso_service, biblioteca_service,
        justificativa_service, notificacao_service, presenca_service, rematricula_service,
        usuario_service,
    },
    state::AppState,
    templates::{
        AlunosPage, AvaliacoesPage, AvisosPage, BibliotecaPage, Contexto, JustificativasPage,
        PainelDashboardPage, PresencasPage, RematriculasPage, SelectAlunos, UsuariosPage,
    },
    web::{mw_auth::SessaoAtual, secoes::SecaoPainel},
};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use sqlx::SqlitePool;

/// Parâmetros de query aceitos pelas páginas de seção: feedback do
/// padrão Post/Redirect/Get mais os filtros de cada listagem.
#[derive(Debug, Deserialize, Default)]
pub struct ParamsSecao {
    pub success: Option<String>,
    pub error: Option<String>,
    // Filtros (cada seção usa os que lhe interessam). Os selects enviam
    // valor vazio na opção "Todos", que conta como filtro ausente.
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_id_opcional")]
    pub aluno_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_inicio: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_fim: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub tipo_golpe: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub status: Option<String>,
}

/// Monta o contexto comum da navegação. Falha ao contar notificações
/// não derruba a página.
pub async fn montar_contexto(
    db_pool: &SqlitePool,
    sessao: &SessaoAtual,
    secao_ativa: &'static str,
) -> Contexto {
    let nao_lidas = notificacao_service::contar_nao_lidas(db_pool, sessao.usuario_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Falha ao contar notificações: {:?}", e);
            0
        });
    Contexto {
        nome_usuario: sessao.nome.clone().unwrap_or_else(|| "Sensei".to_string()),
        eh_admin: sessao.eh_admin(),
        secao_ativa,
        nao_lidas,
    }
}

/// Redireciona para a página de origem (Referer) ou para o destino padrão.
/// Só a própria origem é seguida: um Referer externo cai no padrão.
pub fn voltar_para(headers: &HeaderMap, padrao: &str) -> Redirect {
    let referer = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok());
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok());
    let destino = destino_do_referer(referer, host).unwrap_or_else(|| padrao.to_string());
    Redirect::to(&destino)
}

/// Reduz o Referer a um caminho local. Caminhos relativos passam direto;
/// URLs absolutas só quando o host bate com o da requisição.
fn destino_do_referer(referer: Option<&str>, host: Option<&str>) -> Option<String> {
    let referer = referer?;
    if referer.starts_with('/') && !referer.starts_with("//") {
        return Some(referer.to_string());
    }
    let host = host?;
    let sem_esquema = referer
        .strip_prefix("http://")
        .or_else(|| referer.strip_prefix("https://"))?;
    let caminho = sem_esquema.strip_prefix(host)?;
    if caminho.is_empty() {
        Some("/".to_string())
    } else if caminho.starts_with('/') {
        Some(caminho.to_string())
    } else {
        None
    }
}

// GET /painel
pub async fn index() -> Redirect {
    Redirect::to("/painel/dashboard")
}

// GET /painel/{secao}
pub async fn mostrar_secao(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(slug): Path<String>,
    Query(params): Query<ParamsSecao>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Some(secao) = SecaoPainel::do_slug(&slug) else {
        tracing::warn!("Seção de painel desconhecida: '{}'", slug);
        return Ok(voltar_para(&headers, "/painel/dashboard").into_response());
    };

    let ctx = montar_contexto(&state.db_pool, &sessao, secao.slug()).await;
    let db = &state.db_pool;

    let html = match secao {
        SecaoPainel::Dashboard => {
            let alunos = aluno_service::listar(db).await?;
            let total_ativos = alunos.iter().filter(|a| a.esta_ativo()).count();
            let presentes_hoje =
                presenca_service::contar_presentes_na_data(db, &aluno_service::hoje_iso()).await?;
            let justificativas_pendentes = justificativa_service::contar_pendentes(db).await?;
            let avisos = aviso_service::listar(db).await?;
            PainelDashboardPage {
                ctx,
                total_alunos: alunos.len(),
                total_ativos,
                presentes_hoje,
                justificativas_pendentes,
                avisos,
            }
            .render()?
        }
        SecaoPainel::Alunos => {
            let alunos = aluno_service::listar_fichas(db).await?;
            AlunosPage {
                ctx,
                alunos,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Presencas => {
            let data_chamada = params.data.unwrap_or_else(aluno_service::hoje_iso);
            let chamada = presenca_service::chamada_do_dia(db, &data_chamada).await?;
            let filtro = FiltroPresencas {
                aluno_id: params.aluno_id,
                data_inicio: params.data_inicio,
                data_fim: params.data_fim,
            };
            let historico = presenca_service::listar(db, &filtro, None).await?;
            PresencasPage {
                ctx,
                data_chamada,
                chamada,
                historico,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Avaliacoes => {
            let avaliacoes = avaliacao_service::listar(db, params.aluno_id, None).await?;
            AvaliacoesPage {
                ctx,
                avaliacoes,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Avisos => {
            let avisos = aviso_service::listar(db).await?;
            AvisosPage {
                ctx,
                avisos,
                hoje: aluno_service::hoje_iso(),
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Biblioteca => {
            let filtro = FiltroBiblioteca {
                tipo_golpe: params.tipo_golpe.clone(),
                modalidade: None,
                graduacao: None,
            };
            let conteudos = biblioteca_service::listar(db, &filtro).await?;
            BibliotecaPage {
                ctx,
                conteudos,
                tipos: TIPOS_GOLPES,
                filtro_tipo: params.tipo_golpe,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Justificativas => {
            let filtro = FiltroJustificativas {
                aluno_id: params.aluno_id,
                status: params.status.clone(),
            };
            let justificativas = justificativa_service::listar(db, &filtro, None).await?;
            let ativos = aluno_service::listar_ativos(db).await?;
            JustificativasPage {
                ctx,
                justificativas,
                alunos: SelectAlunos::dos_alunos(&ativos, params.aluno_id),
                hoje: aluno_service::hoje_iso(),
                filtro_status: params.status,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Usuarios => {
            let usuarios = usuario_service::listar_com_aluno(db).await?;
            UsuariosPage {
                ctx,
                usuarios,
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
        SecaoPainel::Rematriculas => {
            let rematriculas = rematricula_service::listar(db).await?;
            let ativos = aluno_service::listar_ativos(db).await?;
            RematriculasPage {
                ctx,
                rematriculas,
                alunos: SelectAlunos::dos_alunos(&ativos, None),
                hoje: aluno_service::hoje_iso(),
                success_message: params.success,
                error_message: params.error,
            }
            .render()?
        }
    };

    Ok(Html(html).into_response())
}

#[cfg(test)]
mod tests {
    use super::destino_do_referer;

    #[test]
    fn referer_relativo_volta_para_o_caminho() {
        assert_eq!(
            destino_do_referer(Some("/painel/alunos"), None),
            Some("/painel/alunos".to_string())
        );
        // "//host" é URL relativa de protocolo, não caminho local
        assert_eq!(destino_do_referer(Some("//evil.example/x"), None), None);
    }

    #[test]
    fn referer_absoluto_so_segue_a_propria_origem() {
        assert_eq!(
            destino_do_referer(
                Some("http://127.0.0.1:3000/painel/avisos"),
                Some("127.0.0.1:3000")
            ),
            Some("/painel/avisos".to_string())
        );
        assert_eq!(
            destino_do_referer(
                Some("https://evil.example/phishing"),
                Some("127.0.0.1:3000")
            ),
            None
        );
        // Host como prefixo de outro domínio não passa
        assert_eq!(
            destino_do_referer(
                Some("http://127.0.0.1:3000.evil.example/x"),
                Some("127.0.0.1:3000")
            ),
            None
        );
    }
}
