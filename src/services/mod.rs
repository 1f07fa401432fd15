// src/services/mod.rs
pub mod aluno_service;
pub mod auth_service;
pub mod avaliacao_service;
pub mod aviso_service;
pub mod biblioteca_service;
pub mod dashboard_service;
pub mod importacao_service;
pub mod justificativa_service;
pub mod notificacao_service;
pub mod presenca_service;
pub mod rematricula_service;
pub mod usuario_service;
