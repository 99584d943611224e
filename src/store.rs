// src/store.rs
//! Armazenamento em memória de todas as coleções da aplicação.
//!
//! `Store` é um snapshot imutável: cada mutação devolve um novo `Store`
//! e deixa o original intacto.

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{
        academico::{Curso, Ementa, Turma},
        diario::DiarioAula,
        pessoa::{Aluno, Coordenador, Instrutor, Interessado},
        user::User,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    pub users: Vec<User>,
    pub coordenadores: Vec<Coordenador>,
    pub instrutores: Vec<Instrutor>,
    pub interessados: Vec<Interessado>,
    pub alunos: Vec<Aluno>,
    pub cursos: Vec<Curso>,
    pub turmas: Vec<Turma>,
    pub ementas: Vec<Ementa>,
    pub diarios: Vec<DiarioAula>,
}

/// Entidade guardada numa coleção do `Store`.
pub trait Registro: Clone {
    /// Nome usado nas mensagens de erro.
    const ENTIDADE: &'static str;

    fn id(&self) -> &str;
    fn colecao(store: &Store) -> &Vec<Self>;
    fn colecao_mut(store: &mut Store) -> &mut Vec<Self>;
}

macro_rules! registro {
    ($tipo:ty, $campo:ident, $nome:literal) => {
        impl Registro for $tipo {
            const ENTIDADE: &'static str = $nome;

            fn id(&self) -> &str {
                &self.id
            }

            fn colecao(store: &Store) -> &Vec<Self> {
                &store.$campo
            }

            fn colecao_mut(store: &mut Store) -> &mut Vec<Self> {
                &mut store.$campo
            }
        }
    };
}

registro!(User, users, "Utilizador");
registro!(Coordenador, coordenadores, "Coordenador");
registro!(Instrutor, instrutores, "Instrutor");
registro!(Interessado, interessados, "Interessado");
registro!(Aluno, alunos, "Aluno");
registro!(Curso, cursos, "Curso");
registro!(Turma, turmas, "Turma");
registro!(Ementa, ementas, "Ementa");
registro!(DiarioAula, diarios, "Diário");

impl Store {
    pub fn list<T: Registro>(&self) -> &[T] {
        T::colecao(self)
    }

    pub fn get<T: Registro>(&self, id: &str) -> Option<&T> {
        T::colecao(self).iter().find(|item| item.id() == id)
    }

    /// Como `get`, mas devolve `NaoEncontrado` quando o id não existe.
    pub fn require<T: Registro>(&self, id: &str) -> AppResult<&T> {
        self.get(id).ok_or_else(|| AppError::nao_encontrado(T::ENTIDADE, id))
    }

    pub fn contains<T: Registro>(&self, id: &str) -> bool {
        self.get::<T>(id).is_some()
    }

    pub fn add<T: Registro>(&self, item: T) -> AppResult<Store> {
        if self.contains::<T>(item.id()) {
            return Err(AppError::Duplicado {
                entidade: T::ENTIDADE,
                id: item.id().to_string(),
            });
        }
        let mut proximo = self.clone();
        T::colecao_mut(&mut proximo).push(item);
        Ok(proximo)
    }

    pub fn update<T: Registro>(&self, item: T) -> AppResult<Store> {
        let mut proximo = self.clone();
        let slot = T::colecao_mut(&mut proximo)
            .iter_mut()
            .find(|existente| existente.id() == item.id())
            .ok_or_else(|| AppError::nao_encontrado(T::ENTIDADE, item.id()))?;
        *slot = item;
        Ok(proximo)
    }

    pub fn delete<T: Registro>(&self, id: &str) -> AppResult<Store> {
        if !self.contains::<T>(id) {
            return Err(AppError::nao_encontrado(T::ENTIDADE, id));
        }
        let mut proximo = self.clone();
        T::colecao_mut(&mut proximo).retain(|item| item.id() != id);
        Ok(proximo)
    }

    // --- Consultas usadas em vários serviços ---

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email.trim()))
    }

    pub fn alunos_da_turma<'a>(&'a self, turma_id: &'a str) -> impl Iterator<Item = &'a Aluno> + 'a {
        self.alunos.iter().filter(move |a| a.turma_id == turma_id)
    }

    pub fn diarios_da_turma<'a>(&'a self, turma_id: &'a str) -> impl Iterator<Item = &'a DiarioAula> + 'a {
        self.diarios.iter().filter(move |d| d.turma_id == turma_id)
    }

    /// Ementa associada à turma, se a turma tiver uma e ela existir.
    pub fn ementa_da_turma(&self, turma: &Turma) -> Option<&Ementa> {
        turma.ementa_id.as_deref().and_then(|id| self.get::<Ementa>(id))
    }
}

/// Gera um novo id para registos criados pela aplicação.
pub fn novo_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
