// src/services/importacao_service.rs
//
// Importação de alunos em massa a partir de CSV. O cabeçalho aceita
// sinônimos (ex.: "Faixa" para graduação) e as datas aceitam os formatos
// brasileiros mais comuns. Linhas inválidas não abortam a importação:
// entram no relatório de erros com o número da linha na planilha.
use crate::{
    error::{AppError, AppResult},
    services::aluno_service::{self, DadosAluno},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;

const FORMATOS_DATA: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

const GRADUACOES_VALIDAS: &[&str] = &[
    "Branca", "Cinza", "Azul", "Amarela", "Laranja", "Verde", "Roxa", "Marrom", "Preta",
];

/// Resultado consolidado de uma importação.
#[derive(Debug, Clone)]
pub struct RelatorioImportacao {
    pub total: usize,
    pub sucesso: Vec<LinhaImportada>,
    pub erros: Vec<ErroImportacao>,
}

#[derive(Debug, Clone)]
pub struct LinhaImportada {
    pub linha: usize,
    pub nome: String,
}

#[derive(Debug, Clone)]
pub struct ErroImportacao {
    pub linha: usize,
    pub nome: String,
    pub erro: String,
}

/// Importa o conteúdo de um CSV de alunos. A coluna Nome é obrigatória;
/// as demais são opcionais e recebem defaults.
pub async fn importar_csv(db_pool: &SqlitePool, conteudo: &str) -> AppResult<RelatorioImportacao> {
    let mut linhas = conteudo.lines();
    let cabecalho = linhas
        .next()
        .ok_or_else(|| AppError::Validation("Arquivo vazio".to_string()))?;

    let colunas = mapear_colunas(&parse_registro_csv(cabecalho));
    if !colunas.contains_key("nome") {
        return Err(AppError::Validation(
            "Coluna \"Nome\" não encontrada na planilha".to_string(),
        ));
    }

    let mut relatorio = RelatorioImportacao {
        total: 0,
        sucesso: Vec::new(),
        erros: Vec::new(),
    };

    // Linha 1 é o cabeçalho; os dados começam na linha 2 da planilha
    for (indice, linha) in linhas.enumerate() {
        if linha.trim().is_empty() {
            continue;
        }
        relatorio.total += 1;
        let numero_linha = indice + 2;
        let campos = parse_registro_csv(linha);
        let valor = |chave: &str| -> Option<String> {
            colunas
                .get(chave)
                .and_then(|&i| campos.get(i))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(nome_completo) = valor("nome") else {
            relatorio.erros.push(ErroImportacao {
                linha: numero_linha,
                nome: "Vazio".to_string(),
                erro: "Nome não pode estar vazio".to_string(),
            });
            continue;
        };

        let dados = montar_dados(&nome_completo, &valor);
        match aluno_service::criar(db_pool, &dados).await {
            Ok(_) => relatorio.sucesso.push(LinhaImportada {
                linha: numero_linha,
                nome: nome_completo,
            }),
            Err(e) => relatorio.erros.push(ErroImportacao {
                linha: numero_linha,
                nome: nome_completo,
                erro: e.to_string(),
            }),
        }
    }

    tracing::info!(
        "📥 Importação concluída: {} sucesso(s), {} erro(s).",
        relatorio.sucesso.len(),
        relatorio.erros.len()
    );
    Ok(relatorio)
}

/// CSV modelo para download, com uma linha de exemplo.
pub fn gerar_template_csv() -> String {
    let cabecalho = [
        "Nome",
        "Data Nascimento",
        "Tipo",
        "Nome Responsável",
        "Contato",
        "Data Matrícula",
        "Status",
        "Graduação",
        "Modalidade",
        "Peso",
        "Altura",
        "Observações",
    ];
    let exemplo = [
        "João Silva",
        "15/03/2010",
        "Criança",
        "Maria Silva",
        "(11) 99999-9999",
        "01/01/2024",
        "Ativo",
        "Branca",
        "Judô Infantil",
        "35.5",
        "140",
        "Aluno dedicado",
    ];
    format!(
        "{}\n{}\n",
        cabecalho
            .iter()
            .map(|c| csv_quote(c))
            .collect::<Vec<_>>()
            .join(","),
        exemplo
            .iter()
            .map(|c| csv_quote(c))
            .collect::<Vec<_>>()
            .join(",")
    )
}

fn montar_dados(nome_completo: &str, valor: &dyn Fn(&str) -> Option<String>) -> DadosAluno {
    let tipo = match valor("tipo") {
        Some(v) if v.to_lowercase().contains("adulto") => "Adulto".to_string(),
        _ => "Criança".to_string(),
    };
    let status = match valor("status") {
        Some(v) if v.to_lowercase().contains("inativo") => "Inativo".to_string(),
        _ => "Ativo".to_string(),
    };
    let graduacao_atual = valor("graduacao_atual")
        .filter(|v| GRADUACOES_VALIDAS.contains(&v.as_str()))
        .unwrap_or_else(|| "Branca".to_string());
    let altura = valor("altura").and_then(|v| v.replace(',', ".").parse::<f64>().ok());

    DadosAluno {
        nome_completo: nome_completo.to_string(),
        tipo,
        data_nascimento: valor("data_nascimento").and_then(|v| normalizar_data(&v)),
        nome_responsavel: valor("nome_responsavel"),
        contato: valor("contato"),
        data_matricula: valor("data_matricula")
            .and_then(|v| normalizar_data(&v))
            .unwrap_or_else(aluno_service::hoje_iso),
        status,
        observacoes: valor("observacoes"),
        graduacao_atual,
        modalidade: valor("modalidade"),
        pode_graduar: false,
        graduar_para: None,
        peso: valor("peso").and_then(|v| v.replace(',', ".").parse::<f64>().ok()),
        altura,
    }
}

/// Mapeia cada campo conhecido para o índice da coluna na planilha,
/// aceitando os sinônimos usuais de cabeçalho.
fn mapear_colunas(cabecalho: &[String]) -> HashMap<&'static str, usize> {
    let sinonimos: &[(&str, &[&str])] = &[
        ("nome", &["nome", "nome completo", "nome_completo", "nomecompleto"]),
        (
            "data_nascimento",
            &[
                "data nascimento",
                "data_nascimento",
                "datanascimento",
                "nascimento",
                "data de nascimento",
            ],
        ),
        ("tipo", &["tipo", "categoria", "categoria_aluno"]),
        (
            "nome_responsavel",
            &["responsavel", "nome responsavel", "nome_responsavel", "responsável"],
        ),
        ("contato", &["contato", "telefone", "whatsapp", "celular"]),
        (
            "data_matricula",
            &["data matricula", "data_matricula", "matricula", "data de matrícula"],
        ),
        ("status", &["status", "situacao", "situação"]),
        (
            "graduacao_atual",
            &["graduacao", "graduação", "graduacao_atual", "faixa", "faixa atual"],
        ),
        ("modalidade", &["modalidade"]),
        ("peso", &["peso", "peso (kg)", "peso_kg"]),
        ("altura", &["altura", "altura (cm)", "altura_cm"]),
        ("observacoes", &["observacoes", "observações", "obs", "observacao"]),
    ];

    let mut mapa = HashMap::new();
    for (chave, nomes) in sinonimos {
        for (indice, coluna) in cabecalho.iter().enumerate() {
            let normalizada = coluna.trim().to_lowercase();
            if nomes.contains(&normalizada.as_str()) {
                mapa.insert(*chave, indice);
                break;
            }
        }
    }
    mapa
}

/// Converte uma data em qualquer dos formatos aceitos para ISO.
fn normalizar_data(valor: &str) -> Option<String> {
    let valor = valor.trim();
    for formato in FORMATOS_DATA {
        if let Ok(data) = NaiveDate::parse_from_str(valor, formato) {
            return Some(data.format("%Y-%m-%d").to_string());
        }
    }
    None
}

fn parse_registro_csv(linha: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut entre_aspas = false;
    let chars: Vec<char> = linha.trim_end_matches('\r').chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if entre_aspas && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            entre_aspas = !entre_aspas;
            i += 1;
            continue;
        }
        if ch == ',' && !entre_aspas {
            out.push(buf);
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf);
    out
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_registro_lida_com_aspas_e_virgulas() {
        assert_eq!(
            parse_registro_csv("João Silva,\"Silva, Maria\",\"diz \"\"oss\"\"\""),
            vec!["João Silva", "Silva, Maria", "diz \"oss\""]
        );
        assert_eq!(parse_registro_csv("a,,b\r"), vec!["a", "", "b"]);
    }

    #[test]
    fn csv_quote_escapa_quando_necessario() {
        assert_eq!(csv_quote("simples"), "simples");
        assert_eq!(csv_quote("a,b"), "\"a,b\"");
        assert_eq!(csv_quote("diz \"oss\""), "\"diz \"\"oss\"\"\"");
    }

    #[test]
    fn mapeia_cabecalho_com_sinonimos() {
        let cabecalho = parse_registro_csv("Nome Completo,Faixa,Telefone,Situação");
        let mapa = mapear_colunas(&cabecalho);
        assert_eq!(mapa.get("nome"), Some(&0));
        assert_eq!(mapa.get("graduacao_atual"), Some(&1));
        assert_eq!(mapa.get("contato"), Some(&2));
        assert_eq!(mapa.get("status"), Some(&3));
        assert!(!mapa.contains_key("peso"));
    }

    #[test]
    fn normaliza_datas_nos_formatos_aceitos() {
        assert_eq!(normalizar_data("15/03/2010"), Some("2010-03-15".to_string()));
        assert_eq!(normalizar_data("2010-03-15"), Some("2010-03-15".to_string()));
        assert_eq!(normalizar_data("15-03-2010"), Some("2010-03-15".to_string()));
        assert_eq!(normalizar_data("2010/03/15"), Some("2010-03-15".to_string()));
        assert_eq!(normalizar_data("março de 2010"), None);
    }

    #[test]
    fn template_tem_cabecalho_e_exemplo() {
        let template = gerar_template_csv();
        let linhas: Vec<&str> = template.lines().collect();
        assert_eq!(linhas.len(), 2);
        assert!(linhas[0].starts_with("Nome,"));
        assert!(linhas[1].starts_with("João Silva,"));
    }
}
