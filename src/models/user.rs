// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Papel de um utilizador no sistema.
/// Cada ecrã/rota protegido faz `match` exaustivo sobre esta enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coordenador,
    Instrutor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coordenador => "coordenador",
            Role::Instrutor => "instrutor",
        }
    }

    /// Rótulo apresentado no painel.
    pub fn rotulo(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Coordenador => "Coordenador",
            Role::Instrutor => "Instrutor",
        }
    }

    pub fn pode_acessar(&self, area: Area) -> bool {
        match (self, area) {
            (Role::Admin, _) => true,
            (Role::Coordenador, Area::Coordenacao | Area::Diarios) => true,
            (Role::Coordenador, Area::Administracao) => false,
            (Role::Instrutor, Area::Diarios) => true,
            (Role::Instrutor, Area::Administracao | Area::Coordenacao) => false,
        }
    }
}

/// Áreas da aplicação protegidas por papel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Utilizadores, coordenadores, instrutores, desfazer.
    Administracao,
    /// Cursos, turmas, ementas, interessados, alunos.
    Coordenacao,
    /// Diários de aula.
    Diarios,
}

// Representa um utilizador com login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// Id do registo de coordenador/instrutor a que este login pertence.
    pub vinculo_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Id gravado como `instrutor_id` nos diários criados por este utilizador:
    /// o registo de instrutor vinculado, ou o próprio utilizador.
    pub fn instrutor_ref(&self) -> &str {
        self.vinculo_id.as_deref().unwrap_or(&self.id)
    }
}

/// Vista pública de um utilizador (sem hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResumo {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub role: Role,
    pub vinculo_id: Option<String>,
}

impl From<&User> for UserResumo {
    fn from(user: &User) -> Self {
        UserResumo {
            id: user.id.clone(),
            nome: user.nome.clone(),
            email: user.email.clone(),
            role: user.role,
            vinculo_id: user.vinculo_id.clone(),
        }
    }
}

// Struct para dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}
