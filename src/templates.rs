// src/templates.rs
use crate::models::{
    aluno::{Aluno, FichaAluno},
    avaliacao::{Avaliacao, AvaliacaoComAluno},
    aviso::Aviso,
    biblioteca::ConteudoBiblioteca,
    dashboard::FrequenciaAluno,
    justificativa::JustificativaComAluno,
    notificacao::Notificacao,
    presenca::{LinhaChamada, PresencaComAluno},
    rematricula::RematriculaComAluno,
    usuario::{Usuario, UsuarioComAluno},
};
use crate::services::importacao_service::RelatorioImportacao;
use askama::Template;

/// Dados comuns a todas as páginas autenticadas: quem está logado,
/// qual seção está ativa na navegação e o contador de notificações.
#[derive(Debug, Clone)]
pub struct Contexto {
    pub nome_usuario: String,
    pub eh_admin: bool,
    pub secao_ativa: &'static str,
    pub nao_lidas: i64,
}

/// Uma opção do seletor de alunos.
#[derive(Debug, Clone)]
pub struct OpcaoAluno {
    pub id: i64,
    pub nome: String,
}

/// Seletor de alunos usado nos formulários que referenciam um aluno
/// (avaliações, usuários, rematrículas). Montado apenas com ativos.
#[derive(Debug, Clone, Default)]
pub struct SelectAlunos {
    pub opcoes: Vec<OpcaoAluno>,
    pub selecionado: Option<i64>,
}

impl SelectAlunos {
    pub fn dos_alunos(alunos: &[Aluno], selecionado: Option<i64>) -> Self {
        let opcoes = alunos
            .iter()
            .filter(|a| a.esta_ativo())
            .map(|a| OpcaoAluno {
                id: a.id,
                nome: a.nome_completo.clone(),
            })
            .collect();
        SelectAlunos { opcoes, selecionado }
    }

    // Recebe referência: nos templates a variável do laço é emprestada.
    pub fn esta_selecionado(&self, id: &i64) -> bool {
        self.selecionado == Some(*id)
    }
}

// ---------- Páginas públicas ----------

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "rematricula_publica.html")]
pub struct RematriculaPublicaPage {
    pub rematricula: Option<RematriculaComAluno>,
    pub confirmada: bool,
}

// ---------- Painel (admin) ----------

#[derive(Template)]
#[template(path = "painel_dashboard.html")]
pub struct PainelDashboardPage {
    pub ctx: Contexto,
    pub total_alunos: usize,
    pub total_ativos: usize,
    pub presentes_hoje: i64,
    pub justificativas_pendentes: i64,
    pub avisos: Vec<Aviso>,
}

#[derive(Template)]
#[template(path = "alunos.html")]
pub struct AlunosPage {
    pub ctx: Contexto,
    pub alunos: Vec<FichaAluno>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "aluno_form.html")]
pub struct AlunoFormPage {
    pub ctx: Contexto,
    // None = criação, Some = edição
    pub aluno: Option<Aluno>,
    pub graduacoes: &'static [&'static str],
    pub hoje: String,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "alunos_importar.html")]
pub struct ImportarAlunosPage {
    pub ctx: Contexto,
    pub relatorio: Option<RelatorioImportacao>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "presencas.html")]
pub struct PresencasPage {
    pub ctx: Contexto,
    pub data_chamada: String,
    pub chamada: Vec<LinhaChamada>,
    pub historico: Vec<PresencaComAluno>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "avaliacoes.html")]
pub struct AvaliacoesPage {
    pub ctx: Contexto,
    pub avaliacoes: Vec<AvaliacaoComAluno>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "avaliacao_form.html")]
pub struct AvaliacaoFormPage {
    pub ctx: Contexto,
    pub avaliacao: Option<Avaliacao>,
    pub alunos: SelectAlunos,
    pub hoje: String,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "avisos.html")]
pub struct AvisosPage {
    pub ctx: Contexto,
    pub avisos: Vec<Aviso>,
    pub hoje: String,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "biblioteca.html")]
pub struct BibliotecaPage {
    pub ctx: Contexto,
    pub conteudos: Vec<ConteudoBiblioteca>,
    pub tipos: &'static [&'static str],
    pub filtro_tipo: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "biblioteca_form.html")]
pub struct BibliotecaFormPage {
    pub ctx: Contexto,
    pub conteudo: Option<ConteudoBiblioteca>,
    pub tipos: &'static [&'static str],
    pub graduacoes: &'static [&'static str],
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "justificativas.html")]
pub struct JustificativasPage {
    pub ctx: Contexto,
    pub justificativas: Vec<JustificativaComAluno>,
    pub alunos: SelectAlunos,
    pub hoje: String,
    pub filtro_status: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "usuarios.html")]
pub struct UsuariosPage {
    pub ctx: Contexto,
    pub usuarios: Vec<UsuarioComAluno>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "usuario_form.html")]
pub struct UsuarioFormPage {
    pub ctx: Contexto,
    pub usuario: Option<Usuario>,
    pub alunos: SelectAlunos,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "rematriculas.html")]
pub struct RematriculasPage {
    pub ctx: Contexto,
    pub rematriculas: Vec<RematriculaComAluno>,
    pub alunos: SelectAlunos,
    pub hoje: String,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

// ---------- Portal (aluno) ----------

#[derive(Template)]
#[template(path = "portal_dashboard.html")]
pub struct PortalDashboardPage {
    pub ctx: Contexto,
    pub ficha: FichaAluno,
    pub frequencia: Option<FrequenciaAluno>,
    pub avisos: Vec<Aviso>,
}

#[derive(Template)]
#[template(path = "portal_presencas.html")]
pub struct PortalPresencasPage {
    pub ctx: Contexto,
    pub presencas: Vec<PresencaComAluno>,
}

#[derive(Template)]
#[template(path = "portal_avaliacoes.html")]
pub struct PortalAvaliacoesPage {
    pub ctx: Contexto,
    pub avaliacoes: Vec<AvaliacaoComAluno>,
}

#[derive(Template)]
#[template(path = "portal_avisos.html")]
pub struct PortalAvisosPage {
    pub ctx: Contexto,
    pub avisos: Vec<Aviso>,
}

#[derive(Template)]
#[template(path = "portal_biblioteca.html")]
pub struct PortalBibliotecaPage {
    pub ctx: Contexto,
    pub conteudos: Vec<ConteudoBiblioteca>,
    pub tipos: &'static [&'static str],
    pub filtro_tipo: Option<String>,
}

#[derive(Template)]
#[template(path = "portal_justificativas.html")]
pub struct PortalJustificativasPage {
    pub ctx: Contexto,
    pub justificativas: Vec<JustificativaComAluno>,
    pub hoje: String,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "notificacoes.html")]
pub struct NotificacoesPage {
    pub ctx: Contexto,
    pub notificacoes: Vec<Notificacao>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aluno(id: i64, nome: &str, status: &str) -> Aluno {
        Aluno {
            id,
            nome_completo: nome.to_string(),
            tipo: "Adulto".to_string(),
            data_nascimento: None,
            nome_responsavel: None,
            contato: None,
            data_matricula: "2024-01-01".to_string(),
            status: status.to_string(),
            observacoes: None,
            graduacao_atual: "Branca".to_string(),
            modalidade: None,
            pode_graduar: false,
            graduar_para: None,
            peso: None,
            altura: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn select_ignora_inativos_e_marca_selecionado() {
        let alunos = vec![
            aluno(1, "Ana", "Ativo"),
            aluno(2, "Bruno", "Inativo"),
            aluno(3, "Carla", "Ativo"),
        ];
        let select = SelectAlunos::dos_alunos(&alunos, Some(3));
        let ids: Vec<i64> = select.opcoes.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(select.esta_selecionado(&3));
        assert!(!select.esta_selecionado(&1));
    }
}
