// src/models/biblioteca.rs
use serde::Deserialize;
use sqlx::FromRow;

/// Tipos de golpe disponíveis para classificar o conteúdo técnico.
pub const TIPOS_GOLPES: &[&str] = &[
    "Queda (Nage-waza)",
    "Imobilização (Katame-waza)",
    "Golpe no Pescoço (Shime-waza)",
    "Luxação (Kansetsu-waza)",
    "Técnica de Chão (Ne-waza)",
    "Técnica em Pé (Tachi-waza)",
    "Projeção (Tsurikomi)",
    "Rasteira (Ashi-waza)",
    "Sacrifício (Sutemi-waza)",
    "Outro",
];

#[derive(Debug, Clone, FromRow)]
pub struct ConteudoBiblioteca {
    pub id: i64,
    pub titulo: String,
    pub tipo_golpe: String,
    pub graduacao_minima: Option<String>,
    pub modalidade: Option<String>,
    pub url_video: Option<String>,
    pub url_foto: Option<String>,
    pub instrucoes: Option<String>,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BibliotecaForm {
    pub titulo: String,
    pub tipo_golpe: String,
    #[serde(default)]
    pub graduacao_minima: String,
    #[serde(default)]
    pub modalidade: String,
    #[serde(default)]
    pub url_video: String,
    #[serde(default)]
    pub url_foto: String,
    #[serde(default)]
    pub instrucoes: String,
    #[serde(default)]
    pub descricao: String,
}

#[derive(Debug, Deserialize)]
pub struct FiltroBiblioteca {
    #[serde(default)]
    pub graduacao: Option<String>,
    #[serde(default)]
    pub modalidade: Option<String>,
    #[serde(default)]
    pub tipo_golpe: Option<String>,
}
