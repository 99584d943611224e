// src/templates.rs
use crate::services::painel_service::Painel;
use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template)]
#[template(path = "painel.html")]
pub struct PainelPage {
    pub user_name: String,
    pub papel: &'static str,
    /// Pares (rótulo, valor) já formatados para a tabela do painel.
    pub linhas: Vec<(String, String)>,
}

impl PainelPage {
    pub fn new(user_name: String, papel: &'static str, painel: &Painel) -> Self {
        PainelPage {
            user_name,
            papel,
            linhas: linhas_do_painel(painel),
        }
    }
}

fn linha(rotulo: &str, valor: impl ToString) -> (String, String) {
    (rotulo.to_string(), valor.to_string())
}

pub fn linhas_do_painel(painel: &Painel) -> Vec<(String, String)> {
    match painel {
        Painel::Admin {
            utilizadores,
            coordenadores,
            instrutores,
            cursos,
            turmas,
        } => vec![
            linha("Utilizadores", utilizadores),
            linha("Coordenadores", coordenadores),
            linha("Instrutores", instrutores),
            linha("Cursos", cursos),
            linha("Turmas em andamento", turmas.em_andamento),
            linha("Turmas planejadas", turmas.planejadas),
        ],
        Painel::Coordenador {
            cursos,
            alunos,
            turmas,
            vagas_livres,
            interessados,
        } => vec![
            linha("Cursos", cursos),
            linha("Alunos", alunos),
            linha("Turmas em andamento", turmas.em_andamento),
            linha("Vagas livres", vagas_livres),
            linha("Interessados novos", interessados.novos),
            linha("Interessados em contato", interessados.em_contato),
        ],
        Painel::Instrutor {
            turmas,
            diarios_registados,
        } => vec![
            linha("Turmas", turmas.len()),
            linha("Diários registados", diarios_registados),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_shows_error_message() {
        let html = LoginPage {
            error: Some("ID ou senha inválidos.".into()),
            success: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("ID ou senha inválidos."));
    }

    #[test]
    fn panel_page_lists_instructor_counts() {
        let painel = Painel::Instrutor {
            turmas: vec!["t1".into(), "t2".into()],
            diarios_registados: 7,
        };
        let html = PainelPage::new("Rita".into(), "Instrutor", &painel).render().unwrap();
        assert!(html.contains("Rita"));
        assert!(html.contains("Diários registados"));
        assert!(html.contains('7'));
    }
}
