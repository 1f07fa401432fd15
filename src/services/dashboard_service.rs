// src/services/dashboard_service.rs
use crate::{
    error::AppResult,
    models::dashboard::{FiltroEvolucao, FiltroFrequencia, FrequenciaAluno, PontoEvolucao},
};
use chrono::{Duration, Local};
use sqlx::SqlitePool;

fn periodo_padrao(dias: i64) -> (String, String) {
    let hoje = Local::now().date_naive();
    let inicio = hoje - Duration::days(dias);
    (
        inicio.format("%Y-%m-%d").to_string(),
        hoje.format("%Y-%m-%d").to_string(),
    )
}

/// Ordena o ranking por frequência decrescente. A ordenação é estável:
/// empates mantêm a ordem alfabética vinda da consulta.
pub fn ordenar_ranking(frequencias: &mut [FrequenciaAluno]) {
    frequencias.sort_by(|a, b| {
        b.frequencia_percentual
            .partial_cmp(&a.frequencia_percentual)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Frequência agregada por aluno no período (default: últimos 30 dias).
/// Alunos ativos sem registro no período aparecem com 0%.
pub async fn frequencia(
    db_pool: &SqlitePool,
    filtro: &FiltroFrequencia,
    escopo_aluno: Option<i64>,
) -> AppResult<Vec<FrequenciaAluno>> {
    let (inicio_padrao, fim_padrao) = periodo_padrao(30);
    let data_inicio = filtro.data_inicio.clone().unwrap_or(inicio_padrao);
    let data_fim = filtro.data_fim.clone().unwrap_or(fim_padrao);

    let mut sql = String::from(
        "SELECT a.id AS aluno_id, a.nome_completo AS nome, a.tipo, \
                COUNT(p.id) AS total_registros, \
                COALESCE(SUM(CASE WHEN p.presente = 1 THEN 1 ELSE 0 END), 0) AS presentes, \
                COALESCE(SUM(CASE WHEN p.presente = 0 THEN 1 ELSE 0 END), 0) AS ausentes \
         FROM alunos a \
         LEFT JOIN presencas p ON p.aluno_id = a.id AND p.data >= ? AND p.data <= ? \
         WHERE a.status = 'Ativo'",
    );
    if escopo_aluno.is_some() {
        sql.push_str(" AND a.id = ?");
    }
    if filtro.tipo_aluno.is_some() {
        sql.push_str(" AND a.tipo = ?");
    }
    sql.push_str(" GROUP BY a.id ORDER BY a.nome_completo");

    let mut query = sqlx::query_as::<_, LinhaFrequencia>(&sql)
        .bind(&data_inicio)
        .bind(&data_fim);
    if let Some(id) = escopo_aluno {
        query = query.bind(id);
    }
    if let Some(tipo) = &filtro.tipo_aluno {
        query = query.bind(tipo);
    }

    let linhas = query.fetch_all(db_pool).await?;
    let mut frequencias: Vec<FrequenciaAluno> = linhas.into_iter().map(Into::into).collect();
    ordenar_ranking(&mut frequencias);
    Ok(frequencias)
}

/// Série temporal de frequência por data (default: últimos 90 dias).
pub async fn evolucao(
    db_pool: &SqlitePool,
    filtro: &FiltroEvolucao,
    escopo_aluno: Option<i64>,
) -> AppResult<Vec<PontoEvolucao>> {
    let (inicio_padrao, fim_padrao) = periodo_padrao(90);
    let data_inicio = filtro.data_inicio.clone().unwrap_or(inicio_padrao);
    let data_fim = filtro.data_fim.clone().unwrap_or(fim_padrao);

    let mut sql = String::from(
        "SELECT data, \
                SUM(CASE WHEN presente = 1 THEN 1 ELSE 0 END) AS presentes, \
                COUNT(*) AS total \
         FROM presencas WHERE data >= ? AND data <= ?",
    );
    let aluno_alvo = escopo_aluno.or(filtro.aluno_id);
    if aluno_alvo.is_some() {
        sql.push_str(" AND aluno_id = ?");
    }
    sql.push_str(" GROUP BY data ORDER BY data");

    let mut query = sqlx::query_as::<_, LinhaEvolucao>(&sql)
        .bind(&data_inicio)
        .bind(&data_fim);
    if let Some(id) = aluno_alvo {
        query = query.bind(id);
    }

    let linhas = query.fetch_all(db_pool).await?;
    let pontos = linhas
        .into_iter()
        .map(|l| {
            let frequencia = if l.total > 0 {
                percentual(l.presentes, l.total)
            } else {
                0.0
            };
            PontoEvolucao {
                data: l.data,
                frequencia,
                presentes: l.presentes,
                total: l.total,
            }
        })
        .collect();
    Ok(pontos)
}

fn percentual(presentes: i64, total: i64) -> f64 {
    ((presentes as f64 / total as f64) * 1000.0).round() / 10.0
}

#[derive(sqlx::FromRow)]
struct LinhaFrequencia {
    aluno_id: i64,
    nome: String,
    tipo: String,
    total_registros: i64,
    presentes: i64,
    ausentes: i64,
}

impl From<LinhaFrequencia> for FrequenciaAluno {
    fn from(l: LinhaFrequencia) -> Self {
        let frequencia_percentual = if l.total_registros > 0 {
            percentual(l.presentes, l.total_registros)
        } else {
            0.0
        };
        FrequenciaAluno {
            aluno_id: l.aluno_id,
            nome: l.nome,
            tipo: l.tipo,
            total_registros: l.total_registros,
            presentes: l.presentes,
            ausentes: l.ausentes,
            frequencia_percentual,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinhaEvolucao {
    data: String,
    presentes: i64,
    total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(nome: &str, pct: f64) -> FrequenciaAluno {
        FrequenciaAluno {
            aluno_id: 0,
            nome: nome.to_string(),
            tipo: "Adulto".to_string(),
            total_registros: 10,
            presentes: 0,
            ausentes: 0,
            frequencia_percentual: pct,
        }
    }

    #[test]
    fn ranking_ordena_decrescente_e_estavel() {
        let mut lista = vec![
            freq("Ana", 50.0),
            freq("Bruno", 80.0),
            freq("Carla", 50.0),
            freq("Davi", 100.0),
        ];
        ordenar_ranking(&mut lista);
        let nomes: Vec<&str> = lista.iter().map(|f| f.nome.as_str()).collect();
        // Empate de 50% preserva a ordem de entrada (Ana antes de Carla)
        assert_eq!(nomes, vec!["Davi", "Bruno", "Ana", "Carla"]);
    }

    #[test]
    fn percentual_arredonda_uma_casa() {
        assert_eq!(percentual(2, 3), 66.7);
        assert_eq!(percentual(1, 1), 100.0);
        assert_eq!(percentual(0, 4), 0.0);
    }
}
