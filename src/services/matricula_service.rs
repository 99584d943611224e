// src/services/matricula_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        academico::Turma,
        pessoa::{Aluno, Interessado, InteressadoForm, InteressadoStatus},
    },
    services::cadastro_service,
    store::{novo_id, Store},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Resultado de uma matrícula: o novo snapshot e os registos criados/alterados.
#[derive(Debug, Clone)]
pub struct Matricula {
    pub store: Store,
    pub interessado: Interessado,
    pub aluno: Option<Aluno>,
    pub turma: Option<Turma>,
}

/// Parte da `Matricula` devolvida pela API.
#[derive(Debug, Clone, Serialize)]
pub struct MatriculaResposta {
    pub interessado: Interessado,
    pub aluno: Option<Aluno>,
    pub turma: Option<Turma>,
}

impl From<&Matricula> for MatriculaResposta {
    fn from(m: &Matricula) -> Self {
        MatriculaResposta {
            interessado: m.interessado.clone(),
            aluno: m.aluno.clone(),
            turma: m.turma.clone(),
        }
    }
}

pub fn validar_interessado(form: &InteressadoForm) -> AppResult<()> {
    if form.nome.trim().is_empty() {
        return Err(AppError::Validacao("Nome é obrigatório".into()));
    }
    cadastro_service::email_valido(&form.email)
}

fn aluno_de(interessado: &Interessado, turma_id: &str, hoje: NaiveDate) -> Aluno {
    Aluno {
        id: novo_id(),
        nome: interessado.nome.clone(),
        email: interessado.email.clone(),
        telefone: interessado.telefone.clone(),
        cpf: interessado.cpf.clone(),
        data_nascimento: interessado.data_nascimento,
        turma_id: turma_id.to_string(),
        interessado_id: Some(interessado.id.clone()),
        data_matricula: hoje,
    }
}

/// Cria o aluno na turma e ocupa uma vaga.
/// Turma inexistente: o aluno é criado na mesma e a vaga não é contada.
fn inscrever(store: Store, interessado: &Interessado, turma_id: &str, hoje: NaiveDate) -> AppResult<(Store, Aluno, Option<Turma>)> {
    let turma = store.get::<Turma>(turma_id).cloned();
    if let Some(t) = &turma {
        if t.lotada() {
            tracing::warn!("Matrícula recusada: turma {} lotada ({}/{})", t.id, t.vagas_ocupadas, t.vagas_total);
            return Err(AppError::TurmaLotada(t.id.clone()));
        }
    }

    let aluno = aluno_de(interessado, turma_id, hoje);
    let store = store.add(aluno.clone())?;

    match turma {
        Some(mut turma) => {
            turma.vagas_ocupadas += 1;
            let store = store.update(turma.clone())?;
            Ok((store, aluno, Some(turma)))
        }
        None => {
            tracing::warn!(
                "Turma {} não encontrada: aluno {} criado sem atualizar vagas",
                turma_id,
                aluno.id
            );
            Ok((store, aluno, None))
        }
    }
}

/// Regista um interessado e, se `turma_id` for dado, matricula-o nessa turma.
pub fn matricular(store: &Store, form: InteressadoForm, turma_id: Option<&str>, hoje: NaiveDate) -> AppResult<Matricula> {
    validar_interessado(&form)?;

    let interessado = Interessado {
        id: novo_id(),
        nome: form.nome.trim().to_string(),
        email: form.email.trim().to_string(),
        telefone: form.telefone,
        cpf: form.cpf,
        data_nascimento: form.data_nascimento,
        curso_interesse: form.curso_interesse,
        observacoes: form.observacoes,
        status: InteressadoStatus::Novo,
        created_at: Utc::now(),
    };
    let store = store.add(interessado.clone())?;

    let Some(turma_id) = turma_id.filter(|id| !id.trim().is_empty()) else {
        tracing::info!("Interessado {} registado sem turma", interessado.id);
        return Ok(Matricula {
            store,
            interessado,
            aluno: None,
            turma: None,
        });
    };

    let (store, aluno, turma) = inscrever(store, &interessado, turma_id, hoje)?;
    tracing::info!("Interessado {} matriculado como aluno {} na turma {}", interessado.id, aluno.id, turma_id);
    Ok(Matricula {
        store,
        interessado,
        aluno: Some(aluno),
        turma,
    })
}

/// Matricula um interessado já existente; o interessado passa a `Matriculado`.
pub fn converter_interessado(store: &Store, interessado_id: &str, turma_id: &str, hoje: NaiveDate) -> AppResult<Matricula> {
    let existente = store.require::<Interessado>(interessado_id)?;
    if existente.status == InteressadoStatus::Matriculado {
        return Err(AppError::InteressadoImutavel(interessado_id.to_string()));
    }

    let interessado = Interessado {
        status: InteressadoStatus::Matriculado,
        ..existente.clone()
    };
    let (store, aluno, turma) = inscrever(store.clone(), &interessado, turma_id, hoje)?;
    let store = store.update(interessado.clone())?;

    tracing::info!("Interessado {} convertido no aluno {}", interessado_id, aluno.id);
    Ok(Matricula {
        store,
        interessado,
        aluno: Some(aluno),
        turma,
    })
}
