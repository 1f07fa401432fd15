// src/web/secoes.rs
//
// As páginas do painel e do portal são endereçadas por slug
// (/painel/{secao}, /portal/{secao}). Slug desconhecido não é erro
// fatal: o handler loga um aviso e redireciona de volta.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecaoPainel {
    Dashboard,
    Alunos,
    Presencas,
    Avaliacoes,
    Avisos,
    Biblioteca,
    Justificativas,
    Usuarios,
    Rematriculas,
}

impl SecaoPainel {
    pub fn do_slug(slug: &str) -> Option<Self> {
        Some(match slug {
            "dashboard" => Self::Dashboard,
            "alunos" => Self::Alunos,
            "presencas" => Self::Presencas,
            "avaliacoes" => Self::Avaliacoes,
            "avisos" => Self::Avisos,
            "biblioteca" => Self::Biblioteca,
            "justificativas" => Self::Justificativas,
            "usuarios" => Self::Usuarios,
            "rematriculas" => Self::Rematriculas,
            _ => return None,
        })
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Alunos => "alunos",
            Self::Presencas => "presencas",
            Self::Avaliacoes => "avaliacoes",
            Self::Avisos => "avisos",
            Self::Biblioteca => "biblioteca",
            Self::Justificativas => "justificativas",
            Self::Usuarios => "usuarios",
            Self::Rematriculas => "rematriculas",
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecaoPortal {
    Dashboard,
    Presencas,
    Avaliacoes,
    Avisos,
    Biblioteca,
    Justificativas,
    Notificacoes,
}

impl SecaoPortal {
    pub fn do_slug(slug: &str) -> Option<Self> {
        Some(match slug {
            "dashboard" => Self::Dashboard,
            "presencas" => Self::Presencas,
            "avaliacoes" => Self::Avaliacoes,
            "avisos" => Self::Avisos,
            "biblioteca" => Self::Biblioteca,
            "justificativas" => Self::Justificativas,
            "notificacoes" => Self::Notificacoes,
            _ => return None,
        })
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Presencas => "presencas",
            Self::Avaliacoes => "avaliacoes",
            Self::Avisos => "avisos",
            Self::Biblioteca => "biblioteca",
            Self::Justificativas => "justificativas",
            Self::Notificacoes => "notificacoes",
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_do_painel_fazem_ida_e_volta() {
        for slug in [
            "dashboard",
            "alunos",
            "presencas",
            "avaliacoes",
            "avisos",
            "biblioteca",
            "justificativas",
            "usuarios",
            "rematriculas",
        ] {
            let secao = SecaoPainel::do_slug(slug).unwrap();
            assert_eq!(secao.slug(), slug);
        }
        assert!(SecaoPainel::do_slug("financeiro").is_none());
        assert!(SecaoPainel::do_slug("").is_none());
    }

    #[test]
    fn slugs_do_portal_fazem_ida_e_volta() {
        for slug in [
            "dashboard",
            "presencas",
            "avaliacoes",
            "avisos",
            "biblioteca",
            "justificativas",
            "notificacoes",
        ] {
            let secao = SecaoPortal::do_slug(slug).unwrap();
            assert_eq!(secao.slug(), slug);
        }
        // Seções exclusivas do painel não existem no portal
        assert!(SecaoPortal::do_slug("usuarios").is_none());
        assert!(SecaoPortal::do_slug("alunos").is_none());
    }
}
