// src/services/diario_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        academico::{Aula, Ementa, Turma},
        diario::{
            DiarioAula, DiarioComResumo, DiarioForm, FormularioDiario, Presenca, ResumoDiarioTurma,
            ResumoPresenca, SituacaoAula, StatusPresenca,
        },
    },
    store::{novo_id, Store},
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// `round(parte / total * 100)` com arredondamento meio-para-cima, 0 se `total == 0`.
/// Limitado a 100.
pub fn percentual(parte: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let valor = (parte * 200 + total) / (total * 2);
    valor.min(100) as u8
}

/// Contagem de presenças de um único diário.
pub fn resumo_presenca(diario: &DiarioAula) -> ResumoPresenca {
    let presentes = diario
        .presencas
        .iter()
        .filter(|p| p.status == StatusPresenca::Presente)
        .count();
    let total = diario.presencas.len();
    ResumoPresenca {
        presentes,
        total,
        percentual: percentual(presentes, total),
    }
}

/// Taxa de presença agregada sobre todos os diários dados.
pub fn taxa_presenca<'a>(diarios: impl IntoIterator<Item = &'a DiarioAula>) -> ResumoPresenca {
    let (presentes, total) = diarios
        .into_iter()
        .map(resumo_presenca)
        .fold((0, 0), |(p, t), r| (p + r.presentes, t + r.total));
    ResumoPresenca {
        presentes,
        total,
        percentual: percentual(presentes, total),
    }
}

/// Progresso da ementa: diários registados face ao número de aulas.
pub fn progresso(aulas_ministradas: usize, total_aulas: usize) -> u8 {
    percentual(aulas_ministradas, total_aulas)
}

/// Quantas vezes cada aula foi ministrada, agrupando os diários por `aula_id`.
pub fn contagem_por_aula<'a>(diarios: impl IntoIterator<Item = &'a DiarioAula>) -> HashMap<&'a str, usize> {
    let mut contagem = HashMap::new();
    for diario in diarios {
        *contagem.entry(diario.aula_id.as_str()).or_insert(0) += 1;
    }
    contagem
}

/// Situação de cada aula da ementa, pela ordem da ementa.
pub fn situacao_aulas<'a>(
    ementa: Option<&Ementa>,
    diarios: impl IntoIterator<Item = &'a DiarioAula>,
) -> Vec<SituacaoAula> {
    let contagem = contagem_por_aula(diarios);
    ementa
        .map(|e| e.aulas.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|aula| SituacaoAula::new(aula, contagem.get(aula.id.as_str()).copied().unwrap_or(0)))
        .collect()
}

/// Aula pré-selecionada no formulário: a primeira ainda não ministrada,
/// ou a primeira da ementa se todas já foram dadas.
pub fn aula_padrao<'a>(ementa: &'a Ementa, diarios: &[&DiarioAula]) -> Option<&'a Aula> {
    let ministradas: HashSet<&str> = diarios.iter().map(|d| d.aula_id.as_str()).collect();
    ementa
        .aulas
        .iter()
        .find(|a| !ministradas.contains(a.id.as_str()))
        .or_else(|| ementa.aulas.first())
}

pub fn resumo_turma(store: &Store, turma_id: &str) -> AppResult<ResumoDiarioTurma> {
    let turma = store.require::<Turma>(turma_id)?;
    let ementa = store.ementa_da_turma(turma);

    let mut diarios: Vec<&DiarioAula> = store.diarios_da_turma(turma_id).collect();
    diarios.sort_by(|a, b| a.data.cmp(&b.data).then(a.created_at.cmp(&b.created_at)));

    let total_aulas = ementa.map(|e| e.aulas.len()).unwrap_or(0);
    let presenca = taxa_presenca(diarios.iter().copied());

    tracing::debug!(
        "Resumo do diário da turma {}: {} diários, {} aulas na ementa",
        turma_id,
        diarios.len(),
        total_aulas
    );

    Ok(ResumoDiarioTurma {
        turma_id: turma_id.to_string(),
        total_aulas,
        aulas_ministradas: diarios.len(),
        progresso: progresso(diarios.len(), total_aulas),
        total_presencas: presenca.presentes,
        total_registros: presenca.total,
        taxa_presenca: presenca.percentual,
        aulas: situacao_aulas(ementa, diarios.iter().copied()),
        diarios: diarios
            .into_iter()
            .map(|d| DiarioComResumo {
                diario: d.clone(),
                resumo: resumo_presenca(d),
            })
            .collect(),
    })
}

pub fn formulario(store: &Store, turma_id: &str) -> AppResult<FormularioDiario> {
    let turma = store.require::<Turma>(turma_id)?;
    let diarios: Vec<&DiarioAula> = store.diarios_da_turma(turma_id).collect();
    let ementa = store.ementa_da_turma(turma);

    Ok(FormularioDiario {
        turma_id: turma_id.to_string(),
        aulas: situacao_aulas(ementa, diarios.iter().copied()),
        aula_padrao: ementa.and_then(|e| aula_padrao(e, &diarios)).map(|a| a.id.clone()),
    })
}

/// Resolve a aula na ementa da turma e valida as presenças.
/// Não altera nada: devolve a aula encontrada para o chamador montar o diário.
fn validar<'a>(store: &'a Store, form: &DiarioForm) -> AppResult<&'a Aula> {
    let turma = store.require::<Turma>(&form.turma_id)?;
    let aula = store
        .ementa_da_turma(turma)
        .and_then(|e| e.aula(&form.aula_id))
        .ok_or_else(|| AppError::AulaNaoEncontrada(form.aula_id.clone()))?;

    let alunos: HashSet<&str> = store.alunos_da_turma(&turma.id).map(|a| a.id.as_str()).collect();
    let mut vistos = HashSet::new();
    for Presenca { aluno_id, .. } in &form.presencas {
        if !alunos.contains(aluno_id.as_str()) {
            return Err(AppError::Validacao(format!(
                "Aluno '{}' não pertence à turma '{}'",
                aluno_id, turma.id
            )));
        }
        if !vistos.insert(aluno_id.as_str()) {
            return Err(AppError::Validacao(format!("Presença duplicada para o aluno '{}'", aluno_id)));
        }
    }
    Ok(aula)
}

pub fn criar_diario(store: &Store, form: DiarioForm, instrutor_id: &str) -> AppResult<(Store, DiarioAula)> {
    let aula = validar(store, &form)?;
    let diario = DiarioAula {
        id: novo_id(),
        turma_id: form.turma_id,
        aula_id: aula.id.clone(),
        aula_numero: aula.numero,
        aula_titulo: aula.titulo.clone(),
        data: form.data,
        instrutor_id: instrutor_id.to_string(),
        presencas: form.presencas,
        observacoes: form.observacoes,
        created_at: Utc::now(),
    };
    let proximo = store.add(diario.clone())?;
    tracing::info!("Diário {} registado para a turma {} (aula {})", diario.id, diario.turma_id, diario.aula_numero);
    Ok((proximo, diario))
}

pub fn atualizar_diario(store: &Store, diario_id: &str, form: DiarioForm) -> AppResult<(Store, DiarioAula)> {
    let existente = store.require::<DiarioAula>(diario_id)?;
    if existente.turma_id != form.turma_id {
        return Err(AppError::Validacao("Não é possível mover um diário para outra turma".into()));
    }
    let aula = validar(store, &form)?;
    let diario = DiarioAula {
        id: existente.id.clone(),
        turma_id: existente.turma_id.clone(),
        aula_id: aula.id.clone(),
        aula_numero: aula.numero,
        aula_titulo: aula.titulo.clone(),
        data: form.data,
        instrutor_id: existente.instrutor_id.clone(),
        presencas: form.presencas,
        observacoes: form.observacoes,
        created_at: existente.created_at,
    };
    let proximo = store.update(diario.clone())?;
    tracing::info!("Diário {} atualizado", diario.id);
    Ok((proximo, diario))
}

/// Remove o diário. Sem confirmação explícita o pedido é recusado.
pub fn excluir_diario(store: &Store, diario_id: &str, confirmado: bool) -> AppResult<Store> {
    if !confirmado {
        return Err(AppError::Validacao("Confirme a exclusão do diário".into()));
    }
    let proximo = store.delete::<DiarioAula>(diario_id)?;
    tracing::info!("Diário {} excluído", diario_id);
    Ok(proximo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        academico::{TipoAula, TurmaStatus},
        pessoa::Aluno,
    };
    use chrono::NaiveDate;

    fn data(dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, dia).unwrap()
    }

    fn aula(id: &str, numero: u32) -> Aula {
        Aula {
            id: id.into(),
            numero,
            titulo: format!("Aula {numero}"),
            tipo: TipoAula::Teorica,
            objetivos: String::new(),
            conteudo: String::new(),
        }
    }

    fn aluno(id: &str, turma_id: &str) -> Aluno {
        Aluno {
            id: id.into(),
            nome: id.to_uppercase(),
            email: format!("{id}@mail.com"),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            turma_id: turma_id.into(),
            interessado_id: None,
            data_matricula: data(1),
        }
    }

    /// Turma t1 com ementa de `n_aulas` aulas e alunos a1, a2.
    fn cenario(n_aulas: u32) -> Store {
        let ementa = Ementa {
            id: "e1".into(),
            curso_id: "c1".into(),
            titulo: "Informática Básica".into(),
            aulas: (1..=n_aulas).map(|n| aula(&format!("aula{n}"), n)).collect(),
        };
        let turma = Turma {
            id: "t1".into(),
            codigo: "INF-01".into(),
            curso_id: "c1".into(),
            ementa_id: Some("e1".into()),
            instrutor_id: Some("i1".into()),
            coordenador_id: None,
            vagas_total: 10,
            vagas_ocupadas: 2,
            horario: "Seg 19h".into(),
            data_inicio: data(1),
            data_fim: None,
            status: TurmaStatus::EmAndamento,
        };
        Store::default()
            .add(ementa)
            .unwrap()
            .add(turma)
            .unwrap()
            .add(aluno("a1", "t1"))
            .unwrap()
            .add(aluno("a2", "t1"))
            .unwrap()
    }

    fn form(aula_id: &str, presencas: &[(&str, StatusPresenca)]) -> DiarioForm {
        DiarioForm {
            turma_id: "t1".into(),
            aula_id: aula_id.into(),
            data: data(10),
            presencas: presencas
                .iter()
                .map(|(aluno_id, status)| Presenca {
                    aluno_id: aluno_id.to_string(),
                    status: *status,
                })
                .collect(),
            observacoes: None,
        }
    }

    use StatusPresenca::{Ausente, Presente};

    #[test]
    fn percentual_rounds_half_up_and_guards_zero() {
        assert_eq!(percentual(0, 0), 0);
        assert_eq!(percentual(3, 4), 75);
        assert_eq!(percentual(1, 8), 13); // 12.5
        assert_eq!(percentual(1, 3), 33);
        assert_eq!(percentual(2, 3), 67);
        assert_eq!(percentual(5, 4), 100);
    }

    #[test]
    fn aggregates_attendance_and_progress_for_example_section() {
        let store = cenario(4);
        let (store, _) = criar_diario(&store, form("aula1", &[("a1", Presente), ("a2", Ausente)]), "i1").unwrap();
        let (store, _) = criar_diario(&store, form("aula2", &[("a1", Presente), ("a2", Presente)]), "i1").unwrap();

        let resumo = resumo_turma(&store, "t1").unwrap();
        assert_eq!(resumo.total_presencas, 3);
        assert_eq!(resumo.total_registros, 4);
        assert_eq!(resumo.taxa_presenca, 75);
        assert_eq!(resumo.progresso, 50);
        assert_eq!(resumo.diarios[0].resumo.percentual, 50);
        assert_eq!(resumo.diarios[1].resumo.percentual, 100);
    }

    #[test]
    fn rates_are_zero_without_records_or_lessons() {
        let store = cenario(0);
        let resumo = resumo_turma(&store, "t1").unwrap();
        assert_eq!(resumo.taxa_presenca, 0);
        assert_eq!(resumo.progresso, 0);
        assert!(resumo.aulas.is_empty());

        let store = cenario(3);
        let (store, _) = criar_diario(&store, form("aula1", &[]), "i1").unwrap();
        let resumo = resumo_turma(&store, "t1").unwrap();
        assert_eq!(resumo.taxa_presenca, 0);
        assert_eq!(resumo.progresso, 33);
    }

    #[test]
    fn progress_stays_within_bounds_when_lessons_are_retaught() {
        let mut store = cenario(2);
        for _ in 0..3 {
            store = criar_diario(&store, form("aula1", &[("a1", Presente)]), "i1").unwrap().0;
        }
        let resumo = resumo_turma(&store, "t1").unwrap();
        assert_eq!(resumo.aulas_ministradas, 3);
        assert_eq!(resumo.progresso, 100);
        assert_eq!(resumo.aulas[0].vezes_ministrada, 3);
        assert!(!resumo.aulas[1].ministrada);
    }

    #[test]
    fn default_lesson_is_first_untaught_then_first_overall() {
        let store = cenario(3);
        assert_eq!(formulario(&store, "t1").unwrap().aula_padrao.as_deref(), Some("aula1"));

        let (store, _) = criar_diario(&store, form("aula1", &[]), "i1").unwrap();
        let (store, _) = criar_diario(&store, form("aula3", &[]), "i1").unwrap();
        let f = formulario(&store, "t1").unwrap();
        assert_eq!(f.aula_padrao.as_deref(), Some("aula2"));
        assert!(f.aulas[0].ministrada && !f.aulas[1].ministrada && f.aulas[2].ministrada);

        let (store, _) = criar_diario(&store, form("aula2", &[]), "i1").unwrap();
        assert_eq!(formulario(&store, "t1").unwrap().aula_padrao.as_deref(), Some("aula1"));

        assert_eq!(formulario(&cenario(0), "t1").unwrap().aula_padrao, None);
    }

    #[test]
    fn create_with_unknown_lesson_leaves_collection_unchanged() {
        let store = cenario(4);
        let erro = criar_diario(&store, form("inexistente", &[]), "i1").unwrap_err();
        assert!(matches!(erro, AppError::AulaNaoEncontrada(_)));
        assert!(store.diarios.is_empty());
    }

    #[test]
    fn create_stamps_lesson_data_and_instructor() {
        let (store, diario) = criar_diario(&cenario(2), form("aula2", &[("a1", Presente)]), "i1").unwrap();
        assert_eq!(diario.aula_numero, 2);
        assert_eq!(diario.aula_titulo, "Aula 2");
        assert_eq!(diario.instrutor_id, "i1");
        assert_eq!(store.diarios.len(), 1);
    }

    #[test]
    fn rejects_attendance_for_students_outside_section() {
        let store = cenario(2).add(aluno("x1", "outra")).unwrap();
        let erro = criar_diario(&store, form("aula1", &[("x1", Presente)]), "i1").unwrap_err();
        assert!(matches!(erro, AppError::Validacao(_)));

        let erro = criar_diario(&store, form("aula1", &[("a1", Presente), ("a1", Ausente)]), "i1").unwrap_err();
        assert!(matches!(erro, AppError::Validacao(_)));
    }

    #[test]
    fn update_revalidates_lesson_and_keeps_identity() {
        let (store, original) = criar_diario(&cenario(3), form("aula1", &[("a1", Ausente)]), "i1").unwrap();

        let erro = atualizar_diario(&store, &original.id, form("nada", &[])).unwrap_err();
        assert!(matches!(erro, AppError::AulaNaoEncontrada(_)));

        let (store, atualizado) = atualizar_diario(&store, &original.id, form("aula3", &[("a1", Presente)])).unwrap();
        assert_eq!(atualizado.id, original.id);
        assert_eq!(atualizado.created_at, original.created_at);
        assert_eq!(atualizado.aula_numero, 3);
        assert_eq!(resumo_turma(&store, "t1").unwrap().taxa_presenca, 100);
    }

    #[test]
    fn delete_requires_confirmation_and_removes_only_target() {
        let store = cenario(4);
        let (store, d1) = criar_diario(&store, form("aula1", &[("a1", Presente), ("a2", Ausente)]), "i1").unwrap();
        let (store, d2) = criar_diario(&store, form("aula2", &[("a1", Presente), ("a2", Presente)]), "i1").unwrap();

        assert!(matches!(excluir_diario(&store, &d1.id, false), Err(AppError::Validacao(_))));

        let store = excluir_diario(&store, &d1.id, true).unwrap();
        assert_eq!(store.diarios.len(), 1);
        assert_eq!(store.diarios[0].id, d2.id);

        let resumo = resumo_turma(&store, "t1").unwrap();
        assert_eq!(resumo.taxa_presenca, 100);
        assert_eq!(resumo.progresso, 25);
        assert!(!resumo.aulas[0].ministrada);
    }
}
