// src/services/painel_service.rs
use crate::{
    models::{
        academico::TurmaStatus,
        pessoa::InteressadoStatus,
        user::{Role, User},
    },
    store::Store,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContagemTurmas {
    pub planejadas: usize,
    pub em_andamento: usize,
    pub concluidas: usize,
    pub canceladas: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContagemInteressados {
    pub novos: usize,
    pub em_contato: usize,
    pub matriculados: usize,
    pub desistentes: usize,
}

/// Números do painel inicial de cada papel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "papel", rename_all = "lowercase")]
pub enum Painel {
    Admin {
        utilizadores: usize,
        coordenadores: usize,
        instrutores: usize,
        cursos: usize,
        turmas: ContagemTurmas,
    },
    Coordenador {
        cursos: usize,
        alunos: usize,
        turmas: ContagemTurmas,
        vagas_livres: u32,
        interessados: ContagemInteressados,
    },
    Instrutor {
        turmas: Vec<String>,
        diarios_registados: usize,
    },
}

pub fn contar_turmas(store: &Store) -> ContagemTurmas {
    let mut c = ContagemTurmas::default();
    for turma in &store.turmas {
        match turma.status {
            TurmaStatus::Planejada => c.planejadas += 1,
            TurmaStatus::EmAndamento => c.em_andamento += 1,
            TurmaStatus::Concluida => c.concluidas += 1,
            TurmaStatus::Cancelada => c.canceladas += 1,
        }
    }
    c
}

pub fn contar_interessados(store: &Store) -> ContagemInteressados {
    let mut c = ContagemInteressados::default();
    for interessado in &store.interessados {
        match interessado.status {
            InteressadoStatus::Novo => c.novos += 1,
            InteressadoStatus::EmContato => c.em_contato += 1,
            InteressadoStatus::Matriculado => c.matriculados += 1,
            InteressadoStatus::Desistente => c.desistentes += 1,
        }
    }
    c
}

/// Vagas livres nas turmas que ainda aceitam alunos.
pub fn vagas_livres(store: &Store) -> u32 {
    store
        .turmas
        .iter()
        .filter(|t| matches!(t.status, TurmaStatus::Planejada | TurmaStatus::EmAndamento))
        .map(|t| t.vagas_livres())
        .sum()
}

pub fn painel_para(store: &Store, user: &User) -> Painel {
    match user.role {
        Role::Admin => Painel::Admin {
            utilizadores: store.users.len(),
            coordenadores: store.coordenadores.len(),
            instrutores: store.instrutores.len(),
            cursos: store.cursos.len(),
            turmas: contar_turmas(store),
        },
        Role::Coordenador => Painel::Coordenador {
            cursos: store.cursos.len(),
            alunos: store.alunos.len(),
            turmas: contar_turmas(store),
            vagas_livres: vagas_livres(store),
            interessados: contar_interessados(store),
        },
        Role::Instrutor => {
            let instrutor = user.instrutor_ref();
            Painel::Instrutor {
                turmas: store
                    .turmas
                    .iter()
                    .filter(|t| t.instrutor_id.as_deref() == Some(instrutor))
                    .map(|t| t.id.clone())
                    .collect(),
                diarios_registados: store.diarios.iter().filter(|d| d.instrutor_id == instrutor).count(),
            }
        }
    }
}
