// src/models/avaliacao.rs
use serde::Deserialize;
use sqlx::FromRow;

pub const STATUS_RASCUNHO: &str = "Rascunho";
pub const STATUS_LIBERADA: &str = "Liberada";

/// Avaliação periódica com quatro notas de 0 a 10. A transição de status
/// é de sentido único: Rascunho → Liberada.
#[derive(Debug, Clone, FromRow)]
pub struct Avaliacao {
    pub id: i64,
    pub aluno_id: i64,
    pub data_avaliacao: String,
    pub disciplina: Option<f64>,
    pub tecnica: Option<f64>,
    pub participacao: Option<f64>,
    pub respeito_comportamento: Option<f64>,
    pub observacoes: Option<String>,
    pub status: String,
    pub data_liberacao: Option<String>,
}

impl Avaliacao {
    /// Média das notas preenchidas (notas ausentes não contam no divisor).
    pub fn media(&self) -> Option<f64> {
        media_das_notas(&[
            self.disciplina,
            self.tecnica,
            self.participacao,
            self.respeito_comportamento,
        ])
    }

    pub fn liberada(&self) -> bool {
        self.status == STATUS_LIBERADA
    }
}

/// Avaliação com o nome do aluno (JOIN), para as listagens.
#[derive(Debug, Clone, FromRow)]
pub struct AvaliacaoComAluno {
    pub id: i64,
    pub aluno_id: i64,
    pub data_avaliacao: String,
    pub disciplina: Option<f64>,
    pub tecnica: Option<f64>,
    pub participacao: Option<f64>,
    pub respeito_comportamento: Option<f64>,
    pub observacoes: Option<String>,
    pub status: String,
    pub data_liberacao: Option<String>,
    pub nome_completo: String,
}

impl AvaliacaoComAluno {
    pub fn media(&self) -> Option<f64> {
        media_das_notas(&[
            self.disciplina,
            self.tecnica,
            self.participacao,
            self.respeito_comportamento,
        ])
    }

    pub fn liberada(&self) -> bool {
        self.status == STATUS_LIBERADA
    }
}

pub fn media_das_notas(notas: &[Option<f64>]) -> Option<f64> {
    let validas: Vec<f64> = notas.iter().flatten().copied().collect();
    if validas.is_empty() {
        return None;
    }
    let media = validas.iter().sum::<f64>() / validas.len() as f64;
    Some((media * 100.0).round() / 100.0)
}

#[derive(Debug, Deserialize)]
pub struct AvaliacaoForm {
    pub aluno_id: i64,
    pub data_avaliacao: String,
    #[serde(default)]
    pub disciplina: String,
    #[serde(default)]
    pub tecnica: String,
    #[serde(default)]
    pub participacao: String,
    #[serde(default)]
    pub respeito_comportamento: String,
    #[serde(default)]
    pub observacoes: String,
    // Ausente no formulário de criação; presente na edição
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_ignora_notas_ausentes() {
        assert_eq!(
            media_das_notas(&[Some(8.0), Some(9.0), None, None]),
            Some(8.5)
        );
        assert_eq!(media_das_notas(&[None, None, None, None]), None);
        assert_eq!(
            media_das_notas(&[Some(7.0), Some(8.0), Some(9.0), Some(10.0)]),
            Some(8.5)
        );
    }

    #[test]
    fn media_arredonda_a_duas_casas() {
        assert_eq!(
            media_das_notas(&[Some(7.0), Some(8.0), Some(8.0), None]),
            Some(7.67)
        );
    }
}
