// src/models/mod.rs
pub mod aluno;
pub mod avaliacao;
pub mod aviso;
pub mod biblioteca;
pub mod dashboard;
pub mod justificativa;
pub mod notificacao;
pub mod presenca;
pub mod rematricula;
pub mod usuario;

use serde::{Deserialize, Deserializer};

/// Normaliza um campo de texto opcional vindo de formulário:
/// string vazia (ou só espaços) vira NULL.
pub fn texto_opcional(valor: String) -> Option<String> {
    let aparado = valor.trim();
    if aparado.is_empty() {
        None
    } else {
        Some(aparado.to_string())
    }
}

/// Converte um campo numérico de formulário (string) em Option<f64>.
/// Aceita vírgula decimal, comum nos dados importados.
pub fn numero_opcional(valor: &str) -> Option<f64> {
    let aparado = valor.trim().replace(',', ".");
    if aparado.is_empty() {
        return None;
    }
    aparado.parse::<f64>().ok()
}

/// Deserializador para filtros de query string: os selects de filtro
/// enviam valor vazio na opção "Todos", que deve contar como ausente.
pub fn query_texto_opcional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let bruto = Option::<String>::deserialize(deserializer)?;
    Ok(bruto.and_then(texto_opcional))
}

/// Idem para ids: "aluno_id=" (vazio) vira None em vez de rejeitar a query.
pub fn query_id_opcional<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let bruto = Option::<String>::deserialize(deserializer)?;
    Ok(bruto.and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texto_vazio_vira_null() {
        assert_eq!(texto_opcional("".to_string()), None);
        assert_eq!(texto_opcional("   ".to_string()), None);
        assert_eq!(texto_opcional(" Judô ".to_string()), Some("Judô".to_string()));
    }

    #[test]
    fn numero_aceita_virgula_decimal() {
        assert_eq!(numero_opcional("35,5"), Some(35.5));
        assert_eq!(numero_opcional("140"), Some(140.0));
        assert_eq!(numero_opcional(""), None);
        assert_eq!(numero_opcional("abc"), None);
    }
}
