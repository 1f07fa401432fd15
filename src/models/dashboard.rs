// src/models/dashboard.rs
use serde::{Deserialize, Serialize};

/// Frequência agregada de um aluno no período consultado.
/// Serializada diretamente para os gráficos do dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct FrequenciaAluno {
    pub aluno_id: i64,
    pub nome: String,
    pub tipo: String,
    pub total_registros: i64,
    pub presentes: i64,
    pub ausentes: i64,
    pub frequencia_percentual: f64,
}

/// Um ponto da série temporal de frequência (percentual por data).
#[derive(Debug, Clone, Serialize)]
pub struct PontoEvolucao {
    pub data: String,
    pub frequencia: f64,
    pub presentes: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct FiltroFrequencia {
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_inicio: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_fim: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub tipo_aluno: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FiltroEvolucao {
    #[serde(default, deserialize_with = "crate::models::query_id_opcional")]
    pub aluno_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_inicio: Option<String>,
    #[serde(default, deserialize_with = "crate::models::query_texto_opcional")]
    pub data_fim: Option<String>,
}
