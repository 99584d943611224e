// src/models/pessoa.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordenador {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub ativo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrutor {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    #[serde(default)]
    pub especialidades: Vec<String>,
    pub ativo: bool,
}

/// Estado de um interessado no funil de matrícula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteressadoStatus {
    Novo,
    EmContato,
    Matriculado,
    Desistente,
}

/// Potencial aluno, ainda sem turma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interessado {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub data_nascimento: Option<NaiveDate>,
    pub curso_interesse: Option<String>,
    pub observacoes: Option<String>,
    pub status: InteressadoStatus,
    pub created_at: DateTime<Utc>,
}

/// Aluno matriculado, ligado a exatamente uma turma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aluno {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub data_nascimento: Option<NaiveDate>,
    pub turma_id: String,
    pub interessado_id: Option<String>,
    pub data_matricula: NaiveDate,
}

// --- Payloads recebidos pela API ---

#[derive(Debug, Clone, Deserialize)]
pub struct CoordenadorPayload {
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default = "ativo_por_omissao")]
    pub ativo: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrutorPayload {
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub especialidades: Vec<String>,
    #[serde(default = "ativo_por_omissao")]
    pub ativo: bool,
}

/// Dados do formulário de interessado (também usado no assistente de matrícula).
#[derive(Debug, Clone, Deserialize)]
pub struct InteressadoForm {
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub cpf: String,
    pub data_nascimento: Option<NaiveDate>,
    pub curso_interesse: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlunoPayload {
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub cpf: String,
    pub data_nascimento: Option<NaiveDate>,
    pub turma_id: String,
    pub data_matricula: NaiveDate,
}

fn ativo_por_omissao() -> bool {
    true
}
