// src/models/academico.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curso {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub carga_horaria: u32,
    pub ativo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurmaStatus {
    Planejada,
    EmAndamento,
    Concluida,
    Cancelada,
}

/// Turma com capacidade fixa (`vagas_total`) e contador de vagas ocupadas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turma {
    pub id: String,
    pub codigo: String,
    pub curso_id: String,
    pub ementa_id: Option<String>,
    pub instrutor_id: Option<String>,
    pub coordenador_id: Option<String>,
    pub vagas_total: u32,
    pub vagas_ocupadas: u32,
    pub horario: String,
    pub data_inicio: NaiveDate,
    pub data_fim: Option<NaiveDate>,
    pub status: TurmaStatus,
}

impl Turma {
    pub fn vagas_livres(&self) -> u32 {
        self.vagas_total.saturating_sub(self.vagas_ocupadas)
    }

    pub fn lotada(&self) -> bool {
        self.vagas_ocupadas >= self.vagas_total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoAula {
    Teorica,
    Pratica,
    Avaliacao,
    Revisao,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aula {
    pub id: String,
    pub numero: u32,
    pub titulo: String,
    pub tipo: TipoAula,
    #[serde(default)]
    pub objetivos: String,
    #[serde(default)]
    pub conteudo: String,
}

/// Ementa: lista ordenada de aulas de um curso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ementa {
    pub id: String,
    pub curso_id: String,
    pub titulo: String,
    pub aulas: Vec<Aula>,
}

impl Ementa {
    pub fn aula(&self, aula_id: &str) -> Option<&Aula> {
        self.aulas.iter().find(|a| a.id == aula_id)
    }
}

// --- Payloads recebidos pela API ---

#[derive(Debug, Clone, Deserialize)]
pub struct CursoPayload {
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    pub carga_horaria: u32,
    #[serde(default = "ativo_por_omissao")]
    pub ativo: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TurmaPayload {
    pub codigo: String,
    pub curso_id: String,
    pub ementa_id: Option<String>,
    pub instrutor_id: Option<String>,
    pub coordenador_id: Option<String>,
    pub vagas_total: u32,
    #[serde(default)]
    pub vagas_ocupadas: u32,
    #[serde(default)]
    pub horario: String,
    pub data_inicio: NaiveDate,
    pub data_fim: Option<NaiveDate>,
    pub status: TurmaStatus,
}

/// Aula enviada na criação/edição de ementa. Sem `id` gera um novo.
#[derive(Debug, Clone, Deserialize)]
pub struct AulaPayload {
    pub id: Option<String>,
    pub titulo: String,
    pub tipo: TipoAula,
    #[serde(default)]
    pub objetivos: String,
    #[serde(default)]
    pub conteudo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmentaPayload {
    pub curso_id: String,
    pub titulo: String,
    #[serde(default)]
    pub aulas: Vec<AulaPayload>,
}

fn ativo_por_omissao() -> bool {
    true
}
