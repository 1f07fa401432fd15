// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        aluno_handlers, auth_handlers, avaliacao_handlers, aviso_handlers, biblioteca_handlers,
        dashboard_handlers, justificativa_handlers, mw_admin, mw_aluno, mw_auth,
        notificacao_handlers, painel_handlers, portal_handlers, presenca_handlers,
        rematricula_handlers, usuario_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas públicas ---
    let public_routes = Router::new()
        .route(
            "/login",
            get(auth_handlers::show_login_form).post(auth_handlers::handle_login),
        )
        .route("/logout", get(auth_handlers::handle_logout))
        .route(
            "/rematricula/{token}",
            get(rematricula_handlers::show_pagina_publica),
        )
        .route(
            "/rematricula/{token}/confirmar",
            post(rematricula_handlers::handle_confirmar),
        )
        .route(
            "/",
            get(|| async { axum::response::Redirect::permanent("/login") }),
        );

    // --- Painel administrativo ---
    // As ações específicas vêm ANTES da rota genérica de seção para que
    // /painel/alunos/novo não seja capturado por /painel/{secao}
    let painel_routes = Router::new()
        .route("/", get(painel_handlers::index))
        // Alunos
        .route(
            "/alunos/novo",
            get(aluno_handlers::show_novo_form).post(aluno_handlers::handle_criar),
        )
        .route(
            "/alunos/editar/{id}",
            get(aluno_handlers::show_editar_form).post(aluno_handlers::handle_editar),
        )
        .route("/alunos/excluir/{id}", post(aluno_handlers::handle_excluir))
        .route(
            "/alunos/importar",
            get(aluno_handlers::show_importar).post(aluno_handlers::handle_importar),
        )
        .route(
            "/alunos/template.csv",
            get(aluno_handlers::download_template),
        )
        // Presenças
        .route(
            "/presencas/registrar",
            post(presenca_handlers::handle_registrar),
        )
        // Avaliações
        .route(
            "/avaliacoes/novo",
            get(avaliacao_handlers::show_novo_form).post(avaliacao_handlers::handle_criar),
        )
        .route(
            "/avaliacoes/editar/{id}",
            get(avaliacao_handlers::show_editar_form).post(avaliacao_handlers::handle_editar),
        )
        .route(
            "/avaliacoes/liberar/{id}",
            post(avaliacao_handlers::handle_liberar),
        )
        .route(
            "/avaliacoes/excluir/{id}",
            post(avaliacao_handlers::handle_excluir),
        )
        // Avisos
        .route("/avisos/novo", post(aviso_handlers::handle_criar))
        .route("/avisos/excluir/{id}", post(aviso_handlers::handle_excluir))
        // Biblioteca técnica
        .route(
            "/biblioteca/novo",
            get(biblioteca_handlers::show_novo_form).post(biblioteca_handlers::handle_criar),
        )
        .route(
            "/biblioteca/editar/{id}",
            get(biblioteca_handlers::show_editar_form).post(biblioteca_handlers::handle_editar),
        )
        .route(
            "/biblioteca/excluir/{id}",
            post(biblioteca_handlers::handle_excluir),
        )
        // Justificativas
        .route(
            "/justificativas/nova",
            post(justificativa_handlers::handle_criar_pelo_admin),
        )
        .route(
            "/justificativas/revisar/{id}",
            post(justificativa_handlers::handle_revisar),
        )
        .route(
            "/justificativas/lida/{id}",
            post(justificativa_handlers::handle_marcar_lida),
        )
        // Usuários
        .route(
            "/usuarios/novo",
            get(usuario_handlers::show_novo_form).post(usuario_handlers::handle_criar),
        )
        .route(
            "/usuarios/editar/{id}",
            get(usuario_handlers::show_editar_form).post(usuario_handlers::handle_editar),
        )
        .route(
            "/usuarios/excluir/{id}",
            post(usuario_handlers::handle_excluir),
        )
        // Rematrículas
        .route(
            "/rematriculas/gerar",
            post(rematricula_handlers::handle_gerar),
        )
        // Seções (genérica, por último)
        .route("/{secao}", get(painel_handlers::mostrar_secao))
        .route_layer(middleware::from_fn(mw_admin::require_admin));

    // --- Portal do aluno ---
    let portal_routes = Router::new()
        .route("/", get(portal_handlers::index))
        .route(
            "/justificativas/nova",
            post(justificativa_handlers::handle_criar_pelo_aluno),
        )
        .route("/{secao}", get(portal_handlers::mostrar_secao))
        .route_layer(middleware::from_fn(mw_aluno::require_aluno));

    // --- API dos gráficos (admin e aluno, escopo aplicado no handler) ---
    let api_routes = Router::new()
        .route("/dashboard/frequencia", get(dashboard_handlers::frequencia))
        .route("/dashboard/evolucao", get(dashboard_handlers::evolucao));

    // --- Rotas autenticadas ---
    let authenticated_routes = Router::new()
        .route(
            "/notificacoes/ler/{id}",
            post(notificacao_handlers::handle_marcar_lida),
        )
        .route(
            "/notificacoes/ler-todas",
            post(notificacao_handlers::handle_marcar_todas),
        )
        .nest("/painel", painel_routes)
        .nest("/portal", portal_routes)
        .nest("/api", api_routes)
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
