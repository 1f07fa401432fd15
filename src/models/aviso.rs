// src/models/aviso.rs
use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Aviso {
    pub id: i64,
    pub titulo: String,
    pub conteudo: String,
    pub data_publicacao: String,
}

#[derive(Debug, Deserialize)]
pub struct AvisoForm {
    pub titulo: String,
    pub conteudo: String,
    #[serde(default)]
    pub data_publicacao: String,
}
