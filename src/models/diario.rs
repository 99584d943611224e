// src/models/diario.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::academico::{Aula, TipoAula};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPresenca {
    Presente,
    Ausente,
}

/// Registo de presença de um aluno numa aula dada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presenca {
    pub aluno_id: String,
    pub status: StatusPresenca,
}

/// Uma sessão ministrada, ligada a uma aula da ementa da turma.
/// A mesma aula pode aparecer em vários diários (reposição).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarioAula {
    pub id: String,
    pub turma_id: String,
    pub aula_id: String,
    pub aula_numero: u32,
    pub aula_titulo: String,
    pub data: NaiveDate,
    pub instrutor_id: String,
    pub presencas: Vec<Presenca>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload de criação/edição de um diário.
#[derive(Debug, Clone, Deserialize)]
pub struct DiarioForm {
    pub turma_id: String,
    pub aula_id: String,
    pub data: NaiveDate,
    #[serde(default)]
    pub presencas: Vec<Presenca>,
    pub observacoes: Option<String>,
}

// --- Estruturas derivadas (nunca guardadas, recalculadas a cada leitura) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResumoPresenca {
    pub presentes: usize,
    pub total: usize,
    pub percentual: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiarioComResumo {
    #[serde(flatten)]
    pub diario: DiarioAula,
    pub resumo: ResumoPresenca,
}

/// Situação de uma aula da ementa face aos diários da turma.
#[derive(Debug, Clone, Serialize)]
pub struct SituacaoAula {
    pub aula_id: String,
    pub numero: u32,
    pub titulo: String,
    pub tipo: TipoAula,
    pub vezes_ministrada: usize,
    pub ministrada: bool,
}

impl SituacaoAula {
    pub fn new(aula: &Aula, vezes_ministrada: usize) -> Self {
        SituacaoAula {
            aula_id: aula.id.clone(),
            numero: aula.numero,
            titulo: aula.titulo.clone(),
            tipo: aula.tipo,
            vezes_ministrada,
            ministrada: vezes_ministrada > 0,
        }
    }
}

/// Dados para abrir o formulário de diário: aulas e seleção inicial.
#[derive(Debug, Clone, Serialize)]
pub struct FormularioDiario {
    pub turma_id: String,
    pub aulas: Vec<SituacaoAula>,
    pub aula_padrao: Option<String>,
}

/// Resumo do diário de uma turma.
#[derive(Debug, Clone, Serialize)]
pub struct ResumoDiarioTurma {
    pub turma_id: String,
    pub total_aulas: usize,
    pub aulas_ministradas: usize,
    pub progresso: u8,
    pub total_presencas: usize,
    pub total_registros: usize,
    pub taxa_presenca: u8,
    pub aulas: Vec<SituacaoAula>,
    pub diarios: Vec<DiarioComResumo>,
}
