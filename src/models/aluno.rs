// src/models/aluno.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Escada de graduações do judô, da mais baixa para a mais alta.
pub const GRADUACOES: &[&str] = &[
    "Branca", "Cinza", "Azul", "Amarela", "Laranja", "Verde", "Roxa", "Marrom", "Preta",
];

/// Linha da tabela `alunos`. Datas guardadas como TEXT ISO (YYYY-MM-DD).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Aluno {
    pub id: i64,
    pub nome_completo: String,
    pub tipo: String, // 'Criança' ou 'Adulto'
    pub data_nascimento: Option<String>,
    pub nome_responsavel: Option<String>,
    pub contato: Option<String>,
    pub data_matricula: String,
    pub status: String, // 'Ativo' ou 'Inativo'
    pub observacoes: Option<String>,
    pub graduacao_atual: String,
    pub modalidade: Option<String>,
    pub pode_graduar: bool,
    pub graduar_para: Option<String>,
    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Aluno {
    pub fn esta_ativo(&self) -> bool {
        self.status == "Ativo"
    }

    /// Próxima graduação a atribuir: a escolhida manualmente, ou a seguinte
    /// da escada quando o aluno está marcado como apto.
    pub fn graduar_para_efetivo(&self) -> Option<String> {
        if !self.pode_graduar {
            return None;
        }
        match &self.graduar_para {
            Some(g) if !g.trim().is_empty() => Some(g.clone()),
            _ => proxima_graduacao(&self.graduacao_atual).map(|g| g.to_string()),
        }
    }
}

/// Aluno com os campos derivados que o sistema calcula na leitura
/// (nunca persistidos; recalculados a cada carga).
#[derive(Debug, Clone, Serialize)]
pub struct FichaAluno {
    #[serde(flatten)]
    pub aluno: Aluno,
    pub idade: Option<i32>,
    pub imc: Option<f64>,
    pub classe: Option<&'static str>,
    pub categoria: Option<String>,
}

impl FichaAluno {
    pub fn montar(aluno: Aluno, hoje: NaiveDate) -> Self {
        let idade = aluno
            .data_nascimento
            .as_deref()
            .and_then(|d| calcular_idade(d, hoje));
        let imc = match (aluno.peso, aluno.altura) {
            (Some(p), Some(a)) => calcular_imc(p, a),
            _ => None,
        };
        let classe = idade.and_then(determinar_classe);
        let categoria = match (idade, aluno.peso) {
            (Some(i), Some(p)) => determinar_categoria(i, p),
            _ => None,
        };
        FichaAluno {
            aluno,
            idade,
            imc,
            classe,
            categoria,
        }
    }
}

/// Dados do formulário de criação/edição de aluno. Os campos opcionais
/// chegam como string vazia e são normalizados pelo handler.
#[derive(Debug, Deserialize)]
pub struct AlunoForm {
    pub nome_completo: String,
    pub tipo: String,
    #[serde(default)]
    pub data_nascimento: String,
    #[serde(default)]
    pub nome_responsavel: String,
    #[serde(default)]
    pub contato: String,
    #[serde(default)]
    pub data_matricula: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub observacoes: String,
    #[serde(default)]
    pub graduacao_atual: String,
    #[serde(default)]
    pub modalidade: String,
    // Checkbox: presente no corpo apenas quando marcado
    #[serde(default)]
    pub pode_graduar: Option<String>,
    #[serde(default)]
    pub graduar_para: String,
    #[serde(default)]
    pub peso: String,
    #[serde(default)]
    pub altura: String,
}

/// Idade em anos completos na data de referência.
pub fn calcular_idade(data_nascimento: &str, hoje: NaiveDate) -> Option<i32> {
    let nascimento = NaiveDate::parse_from_str(data_nascimento, "%Y-%m-%d").ok()?;
    let mut idade = hoje.year() - nascimento.year();
    if (hoje.month(), hoje.day()) < (nascimento.month(), nascimento.day()) {
        idade -= 1;
    }
    Some(idade)
}

/// IMC com altura aceite em metros ou centímetros (valores < 3 são metros).
pub fn calcular_imc(peso: f64, altura: f64) -> Option<f64> {
    if peso <= 0.0 || altura <= 0.0 {
        return None;
    }
    let altura_m = if altura < 3.0 { altura } else { altura / 100.0 };
    let imc = peso / (altura_m * altura_m);
    Some((imc * 100.0).round() / 100.0)
}

/// Classe etária do atleta.
pub fn determinar_classe(idade: i32) -> Option<&'static str> {
    if idade <= 0 {
        return None;
    }
    Some(match idade {
        i if i < 13 => "Infantil",
        i if i < 16 => "Juvenil",
        i if i < 20 => "Júnior",
        i if i < 30 => "Sênior",
        _ => "Veterano",
    })
}

/// Categoria de peso simplificada segundo as faixas da CBJ, por classe etária.
pub fn determinar_categoria(idade: i32, peso: f64) -> Option<String> {
    if idade <= 0 || peso <= 0.0 {
        return None;
    }
    let limites: &[f64] = if idade < 13 {
        &[30.0, 34.0, 38.0, 42.0, 46.0, 50.0, 55.0]
    } else if idade < 16 {
        &[40.0, 44.0, 48.0, 52.0, 57.0, 63.0, 70.0]
    } else if idade < 20 {
        &[50.0, 55.0, 60.0, 66.0, 73.0, 81.0, 90.0, 100.0]
    } else {
        &[60.0, 66.0, 73.0, 81.0, 90.0, 100.0]
    };

    for limite in limites {
        if peso < *limite {
            return Some(format!("Até {}kg", limite));
        }
    }
    Some(format!("Acima de {}kg", limites[limites.len() - 1]))
}

/// Próxima graduação da escada. Graduação desconhecida assume Cinza;
/// faixa Preta não progride.
pub fn proxima_graduacao(atual: &str) -> Option<&'static str> {
    match GRADUACOES.iter().position(|g| *g == atual) {
        Some(indice) if indice + 1 < GRADUACOES.len() => Some(GRADUACOES[indice + 1]),
        Some(_) => None,
        None => Some("Cinza"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn idade_considera_aniversario_ainda_nao_ocorrido() {
        let hoje = data(2026, 8, 31);
        assert_eq!(calcular_idade("2010-03-15", hoje), Some(16));
        assert_eq!(calcular_idade("2010-09-15", hoje), Some(15));
        assert_eq!(calcular_idade("2010-08-31", hoje), Some(16));
        assert_eq!(calcular_idade("não-é-data", hoje), None);
    }

    #[test]
    fn imc_aceita_altura_em_metros_ou_centimetros() {
        assert_eq!(calcular_imc(70.0, 1.75), Some(22.86));
        assert_eq!(calcular_imc(70.0, 175.0), Some(22.86));
        assert_eq!(calcular_imc(0.0, 1.75), None);
    }

    #[test]
    fn classes_por_faixa_etaria() {
        assert_eq!(determinar_classe(8), Some("Infantil"));
        assert_eq!(determinar_classe(14), Some("Juvenil"));
        assert_eq!(determinar_classe(17), Some("Júnior"));
        assert_eq!(determinar_classe(25), Some("Sênior"));
        assert_eq!(determinar_classe(40), Some("Veterano"));
        assert_eq!(determinar_classe(0), None);
    }

    #[test]
    fn categoria_infantil_e_senior() {
        assert_eq!(determinar_categoria(10, 33.0), Some("Até 34kg".to_string()));
        assert_eq!(
            determinar_categoria(10, 60.0),
            Some("Acima de 55kg".to_string())
        );
        assert_eq!(determinar_categoria(25, 72.0), Some("Até 73kg".to_string()));
        assert_eq!(
            determinar_categoria(25, 105.0),
            Some("Acima de 100kg".to_string())
        );
    }

    #[test]
    fn proxima_graduacao_segue_a_escada() {
        assert_eq!(proxima_graduacao("Branca"), Some("Cinza"));
        assert_eq!(proxima_graduacao("Marrom"), Some("Preta"));
        assert_eq!(proxima_graduacao("Preta"), None);
        // Desconhecida assume o primeiro degrau acima da Branca
        assert_eq!(proxima_graduacao("Vermelha"), Some("Cinza"));
    }

    fn aluno_base() -> Aluno {
        Aluno {
            id: 1,
            nome_completo: "João Silva".to_string(),
            tipo: "Criança".to_string(),
            data_nascimento: Some("2014-03-15".to_string()),
            nome_responsavel: Some("Maria Silva".to_string()),
            contato: None,
            data_matricula: "2024-01-01".to_string(),
            status: "Ativo".to_string(),
            observacoes: None,
            graduacao_atual: "Branca".to_string(),
            modalidade: None,
            pode_graduar: false,
            graduar_para: None,
            peso: Some(35.5),
            altura: Some(140.0),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn ficha_deriva_todos_os_campos() {
        let ficha = FichaAluno::montar(aluno_base(), data(2026, 8, 31));
        assert_eq!(ficha.idade, Some(12));
        assert_eq!(ficha.imc, Some(18.11));
        assert_eq!(ficha.classe, Some("Infantil"));
        assert_eq!(ficha.categoria, Some("Até 38kg".to_string()));
    }

    #[test]
    fn graduar_para_efetivo_usa_escada_quando_vazio() {
        let mut aluno = aluno_base();
        assert_eq!(aluno.graduar_para_efetivo(), None);
        aluno.pode_graduar = true;
        assert_eq!(aluno.graduar_para_efetivo(), Some("Cinza".to_string()));
        aluno.graduar_para = Some("Azul".to_string());
        assert_eq!(aluno.graduar_para_efetivo(), Some("Azul".to_string()));
    }
}
