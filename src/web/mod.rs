// src/web/mod.rs
pub mod aluno_handlers;
pub mod auth_handlers;
pub mod avaliacao_handlers;
pub mod aviso_handlers;
pub mod biblioteca_handlers;
pub mod dashboard_handlers;
pub mod justificativa_handlers;
pub mod mw_admin;
pub mod mw_aluno;
pub mod mw_auth;
pub mod notificacao_handlers;
pub mod painel_handlers;
pub mod portal_handlers;
pub mod presenca_handlers;
pub mod rematricula_handlers;
pub mod routes;
pub mod secoes;
pub mod usuario_handlers;
