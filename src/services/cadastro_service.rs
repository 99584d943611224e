// src/services/cadastro_service.rs
//! Criação e edição das entidades de cadastro, com as validações de cada uma.
//! Todas as funções recebem o snapshot atual e devolvem o próximo.

use crate::{
    error::{AppError, AppResult},
    models::{
        academico::{Aula, Curso, CursoPayload, Ementa, EmentaPayload, Turma, TurmaPayload},
        pessoa::{
            Aluno, AlunoPayload, Coordenador, CoordenadorPayload, Instrutor, InstrutorPayload, Interessado,
            InteressadoForm, InteressadoStatus,
        },
        user::{Role, User},
    },
    services::matricula_service::validar_interessado,
    store::{novo_id, Registro, Store},
};
use chrono::Utc;
use serde::Deserialize;

fn obrigatorio(valor: &str, campo: &str) -> AppResult<()> {
    if valor.trim().is_empty() {
        return Err(AppError::Validacao(format!("{} é obrigatório", campo)));
    }
    Ok(())
}

pub fn email_valido(email: &str) -> AppResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, dominio)) if !local.is_empty() && dominio.contains('.') => Ok(()),
        _ => Err(AppError::Validacao(format!("Email '{}' inválido", email))),
    }
}

/// Recusa a exclusão enquanto houver registos a apontar para `id`.
/// `referencias` são pares (quantidade, descrição).
fn livre_de_referencias(entidade: &'static str, id: &str, referencias: &[(usize, &str)]) -> AppResult<()> {
    let motivos: Vec<String> = referencias
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, descricao)| format!("{} {}", n, descricao))
        .collect();
    if motivos.is_empty() {
        return Ok(());
    }
    tracing::warn!("Exclusão de {} '{}' recusada: {}", entidade, id, motivos.join(", "));
    Err(AppError::EmUso {
        entidade,
        id: id.to_string(),
        motivo: motivos.join(", "),
    })
}

/// Exclusão com as verificações de integridade de cada entidade.
pub trait Excluivel: Registro {
    fn excluir(store: &Store, id: &str) -> AppResult<Store>;
}

macro_rules! excluivel {
    ($tipo:ty, $funcao:ident) => {
        impl Excluivel for $tipo {
            fn excluir(store: &Store, id: &str) -> AppResult<Store> {
                $funcao(store, id)
            }
        }
    };
}

excluivel!(Coordenador, excluir_coordenador);
excluivel!(Instrutor, excluir_instrutor);
excluivel!(Curso, excluir_curso);
excluivel!(Ementa, excluir_ementa);
excluivel!(Turma, excluir_turma);
excluivel!(Interessado, excluir_interessado);

// --- Utilizadores ---

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub nome: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub vinculo_id: Option<String>,
}

pub const PASSWORD_MIN: usize = 6;

pub fn validar_user(store: &Store, payload: &UserPayload, proprio_id: Option<&str>) -> AppResult<()> {
    obrigatorio(&payload.nome, "Nome")?;
    email_valido(&payload.email)?;
    if let Some(outro) = store.user_by_email(&payload.email) {
        if Some(outro.id.as_str()) != proprio_id {
            return Err(AppError::Duplicado {
                entidade: "Email",
                id: payload.email.trim().to_string(),
            });
        }
    }
    if let Some(password) = &payload.password {
        if password.len() < PASSWORD_MIN {
            return Err(AppError::Validacao(format!("Senha com mínimo de {} caracteres", PASSWORD_MIN)));
        }
    }
    // O vínculo tem de apontar para um registo do tipo do papel
    if let Some(vinculo) = payload.vinculo_id.as_deref() {
        let existe = match payload.role {
            Role::Admin => false,
            Role::Coordenador => store.contains::<Coordenador>(vinculo),
            Role::Instrutor => store.contains::<Instrutor>(vinculo),
        };
        if !existe {
            return Err(AppError::Validacao(format!(
                "Vínculo '{}' inválido para o papel {}",
                vinculo,
                payload.role.as_str()
            )));
        }
    }
    Ok(())
}

/// `password_hash` já calculado pelo chamador (bcrypt é assíncrono).
pub fn criar_user(store: &Store, payload: UserPayload, password_hash: String) -> AppResult<(Store, User)> {
    validar_user(store, &payload, None)?;
    let user = User {
        id: novo_id(),
        nome: payload.nome.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        password_hash,
        role: payload.role,
        vinculo_id: payload.vinculo_id,
        created_at: Utc::now(),
    };
    Ok((store.add(user.clone())?, user))
}

/// Atualiza dados e, se dado, o hash de uma nova senha.
pub fn atualizar_user(
    store: &Store,
    id: &str,
    payload: UserPayload,
    password_hash: Option<String>,
) -> AppResult<(Store, User)> {
    validar_user(store, &payload, Some(id))?;
    let existente = store.require::<User>(id)?;
    let user = User {
        nome: payload.nome.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        password_hash: password_hash.unwrap_or_else(|| existente.password_hash.clone()),
        role: payload.role,
        vinculo_id: payload.vinculo_id,
        ..existente.clone()
    };
    Ok((store.update(user.clone())?, user))
}

/// Não deixa remover o último administrador.
pub fn excluir_user(store: &Store, id: &str) -> AppResult<Store> {
    let user = store.require::<User>(id)?;
    if user.role == Role::Admin && store.users.iter().filter(|u| u.role == Role::Admin).count() == 1 {
        return Err(AppError::Validacao("Não é possível remover o último administrador".into()));
    }
    store.delete::<User>(id)
}

// --- Coordenadores e instrutores ---

fn coordenador_de(id: String, p: CoordenadorPayload) -> AppResult<Coordenador> {
    obrigatorio(&p.nome, "Nome")?;
    email_valido(&p.email)?;
    Ok(Coordenador {
        id,
        nome: p.nome.trim().to_string(),
        email: p.email.trim().to_string(),
        telefone: p.telefone,
        cpf: p.cpf,
        ativo: p.ativo,
    })
}

pub fn criar_coordenador(store: &Store, payload: CoordenadorPayload) -> AppResult<(Store, Coordenador)> {
    let coordenador = coordenador_de(novo_id(), payload)?;
    Ok((store.add(coordenador.clone())?, coordenador))
}

pub fn atualizar_coordenador(store: &Store, id: &str, payload: CoordenadorPayload) -> AppResult<(Store, Coordenador)> {
    let coordenador = coordenador_de(id.to_string(), payload)?;
    Ok((store.update(coordenador.clone())?, coordenador))
}

fn instrutor_de(id: String, p: InstrutorPayload) -> AppResult<Instrutor> {
    obrigatorio(&p.nome, "Nome")?;
    email_valido(&p.email)?;
    Ok(Instrutor {
        id,
        nome: p.nome.trim().to_string(),
        email: p.email.trim().to_string(),
        telefone: p.telefone,
        cpf: p.cpf,
        especialidades: p
            .especialidades
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
        ativo: p.ativo,
    })
}

pub fn excluir_coordenador(store: &Store, id: &str) -> AppResult<Store> {
    store.require::<Coordenador>(id)?;
    let turmas = store.turmas.iter().filter(|t| t.coordenador_id.as_deref() == Some(id)).count();
    let logins = store.users.iter().filter(|u| u.vinculo_id.as_deref() == Some(id)).count();
    livre_de_referencias("Coordenador", id, &[(turmas, "turma(s)"), (logins, "utilizador(es)")])?;
    store.delete::<Coordenador>(id)
}

pub fn criar_instrutor(store: &Store, payload: InstrutorPayload) -> AppResult<(Store, Instrutor)> {
    let instrutor = instrutor_de(novo_id(), payload)?;
    Ok((store.add(instrutor.clone())?, instrutor))
}

pub fn atualizar_instrutor(store: &Store, id: &str, payload: InstrutorPayload) -> AppResult<(Store, Instrutor)> {
    let instrutor = instrutor_de(id.to_string(), payload)?;
    Ok((store.update(instrutor.clone())?, instrutor))
}

pub fn excluir_instrutor(store: &Store, id: &str) -> AppResult<Store> {
    store.require::<Instrutor>(id)?;
    let turmas = store.turmas.iter().filter(|t| t.instrutor_id.as_deref() == Some(id)).count();
    let logins = store.users.iter().filter(|u| u.vinculo_id.as_deref() == Some(id)).count();
    let diarios = store.diarios.iter().filter(|d| d.instrutor_id == id).count();
    livre_de_referencias(
        "Instrutor",
        id,
        &[(turmas, "turma(s)"), (logins, "utilizador(es)"), (diarios, "diário(s)")],
    )?;
    store.delete::<Instrutor>(id)
}

// --- Cursos, ementas e turmas ---

fn curso_de(id: String, p: CursoPayload) -> AppResult<Curso> {
    obrigatorio(&p.nome, "Nome do curso")?;
    if p.carga_horaria == 0 {
        return Err(AppError::Validacao("Carga horária deve ser positiva".into()));
    }
    Ok(Curso {
        id,
        nome: p.nome.trim().to_string(),
        descricao: p.descricao,
        carga_horaria: p.carga_horaria,
        ativo: p.ativo,
    })
}

pub fn criar_curso(store: &Store, payload: CursoPayload) -> AppResult<(Store, Curso)> {
    let curso = curso_de(novo_id(), payload)?;
    Ok((store.add(curso.clone())?, curso))
}

pub fn atualizar_curso(store: &Store, id: &str, payload: CursoPayload) -> AppResult<(Store, Curso)> {
    let curso = curso_de(id.to_string(), payload)?;
    Ok((store.update(curso.clone())?, curso))
}

pub fn excluir_curso(store: &Store, id: &str) -> AppResult<Store> {
    store.require::<Curso>(id)?;
    let turmas = store.turmas.iter().filter(|t| t.curso_id == id).count();
    let ementas = store.ementas.iter().filter(|e| e.curso_id == id).count();
    livre_de_referencias("Curso", id, &[(turmas, "turma(s)"), (ementas, "ementa(s)")])?;
    store.delete::<Curso>(id)
}

/// Numera as aulas pela ordem recebida (1, 2, ...).
fn ementa_de(store: &Store, id: String, p: EmentaPayload) -> AppResult<Ementa> {
    obrigatorio(&p.titulo, "Título da ementa")?;
    store.require::<Curso>(&p.curso_id)?;
    let aulas = p
        .aulas
        .into_iter()
        .zip(1..)
        .map(|(aula, numero)| {
            obrigatorio(&aula.titulo, "Título da aula")?;
            Ok(Aula {
                id: aula.id.filter(|i| !i.trim().is_empty()).unwrap_or_else(novo_id),
                numero,
                titulo: aula.titulo.trim().to_string(),
                tipo: aula.tipo,
                objetivos: aula.objetivos,
                conteudo: aula.conteudo,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Ementa {
        id,
        curso_id: p.curso_id,
        titulo: p.titulo.trim().to_string(),
        aulas,
    })
}

pub fn criar_ementa(store: &Store, payload: EmentaPayload) -> AppResult<(Store, Ementa)> {
    let ementa = ementa_de(store, novo_id(), payload)?;
    Ok((store.add(ementa.clone())?, ementa))
}

/// Aulas já registadas em diários de turmas desta ementa não podem sair dela.
/// Os diários afetados recebem o número e o título atualizados da aula.
pub fn atualizar_ementa(store: &Store, id: &str, payload: EmentaPayload) -> AppResult<(Store, Ementa)> {
    let ementa = ementa_de(store, id.to_string(), payload)?;
    let turmas: Vec<&str> = store
        .turmas
        .iter()
        .filter(|t| t.ementa_id.as_deref() == Some(id))
        .map(|t| t.id.as_str())
        .collect();
    let usa_ementa = |turma_id: &str| turmas.iter().any(|t| *t == turma_id);

    if let Some(diario) = store
        .diarios
        .iter()
        .find(|d| usa_ementa(d.turma_id.as_str()) && ementa.aula(&d.aula_id).is_none())
    {
        return Err(AppError::EmUso {
            entidade: "Aula",
            id: diario.aula_id.clone(),
            motivo: format!("registada no diário '{}' de {}", diario.id, diario.data),
        });
    }

    let mut proximo = store.update(ementa.clone())?;
    for diario in proximo.diarios.iter_mut().filter(|d| usa_ementa(d.turma_id.as_str())) {
        if let Some(aula) = ementa.aula(&diario.aula_id) {
            diario.aula_numero = aula.numero;
            diario.aula_titulo = aula.titulo.clone();
        }
    }
    Ok((proximo, ementa))
}

pub fn excluir_ementa(store: &Store, id: &str) -> AppResult<Store> {
    store.require::<Ementa>(id)?;
    let turmas = store.turmas.iter().filter(|t| t.ementa_id.as_deref() == Some(id)).count();
    livre_de_referencias("Ementa", id, &[(turmas, "turma(s)")])?;
    store.delete::<Ementa>(id)
}

fn turma_de(store: &Store, id: String, p: TurmaPayload) -> AppResult<Turma> {
    obrigatorio(&p.codigo, "Código da turma")?;
    store.require::<Curso>(&p.curso_id)?;
    if let Some(ementa_id) = p.ementa_id.as_deref() {
        store.require::<Ementa>(ementa_id)?;
    }
    if let Some(instrutor_id) = p.instrutor_id.as_deref() {
        store.require::<Instrutor>(instrutor_id)?;
    }
    if let Some(coordenador_id) = p.coordenador_id.as_deref() {
        store.require::<Coordenador>(coordenador_id)?;
    }
    if p.vagas_total == 0 {
        return Err(AppError::Validacao("A turma precisa de pelo menos uma vaga".into()));
    }
    if p.vagas_ocupadas > p.vagas_total {
        return Err(AppError::Validacao(format!(
            "Vagas ocupadas ({}) excedem o total ({})",
            p.vagas_ocupadas, p.vagas_total
        )));
    }
    if matches!(p.data_fim, Some(fim) if fim < p.data_inicio) {
        return Err(AppError::Validacao("Data de fim anterior ao início".into()));
    }
    Ok(Turma {
        id,
        codigo: p.codigo.trim().to_string(),
        curso_id: p.curso_id,
        ementa_id: p.ementa_id,
        instrutor_id: p.instrutor_id,
        coordenador_id: p.coordenador_id,
        vagas_total: p.vagas_total,
        vagas_ocupadas: p.vagas_ocupadas,
        horario: p.horario,
        data_inicio: p.data_inicio,
        data_fim: p.data_fim,
        status: p.status,
    })
}

pub fn criar_turma(store: &Store, payload: TurmaPayload) -> AppResult<(Store, Turma)> {
    let turma = turma_de(store, novo_id(), payload)?;
    Ok((store.add(turma.clone())?, turma))
}

pub fn atualizar_turma(store: &Store, id: &str, payload: TurmaPayload) -> AppResult<(Store, Turma)> {
    let turma = turma_de(store, id.to_string(), payload)?;
    Ok((store.update(turma.clone())?, turma))
}

/// Turmas com alunos ou diários não são excluídas; cancela-se a turma.
pub fn excluir_turma(store: &Store, id: &str) -> AppResult<Store> {
    store.require::<Turma>(id)?;
    let alunos = store.alunos_da_turma(id).count();
    let diarios = store.diarios_da_turma(id).count();
    livre_de_referencias("Turma", id, &[(alunos, "aluno(s)"), (diarios, "diário(s)")])?;
    store.delete::<Turma>(id)
}

// --- Interessados e alunos ---

pub fn atualizar_interessado(
    store: &Store,
    id: &str,
    form: InteressadoForm,
    status: InteressadoStatus,
) -> AppResult<(Store, Interessado)> {
    let existente = store.require::<Interessado>(id)?;
    if existente.status == InteressadoStatus::Matriculado {
        return Err(AppError::InteressadoImutavel(id.to_string()));
    }
    if status == InteressadoStatus::Matriculado {
        return Err(AppError::Validacao("Use a conversão para matricular um interessado".into()));
    }
    validar_interessado(&form)?;
    let interessado = Interessado {
        nome: form.nome.trim().to_string(),
        email: form.email.trim().to_string(),
        telefone: form.telefone,
        cpf: form.cpf,
        data_nascimento: form.data_nascimento,
        curso_interesse: form.curso_interesse,
        observacoes: form.observacoes,
        status,
        ..existente.clone()
    };
    Ok((store.update(interessado.clone())?, interessado))
}

pub fn excluir_interessado(store: &Store, id: &str) -> AppResult<Store> {
    let interessado = store.require::<Interessado>(id)?;
    if interessado.status == InteressadoStatus::Matriculado {
        return Err(AppError::InteressadoImutavel(id.to_string()));
    }
    let alunos = store.alunos.iter().filter(|a| a.interessado_id.as_deref() == Some(id)).count();
    livre_de_referencias("Interessado", id, &[(alunos, "aluno(s)")])?;
    store.delete::<Interessado>(id)
}

/// Alunos só são editados; são criados pelo fluxo de matrícula.
/// Uma troca de turma segue as regras da matrícula (turma existente e com vaga)
/// e passa a vaga da turma antiga para a nova.
pub fn atualizar_aluno(store: &Store, id: &str, p: AlunoPayload) -> AppResult<(Store, Aluno)> {
    obrigatorio(&p.nome, "Nome")?;
    email_valido(&p.email)?;
    let existente = store.require::<Aluno>(id)?;
    let mut proximo = store.clone();

    if p.turma_id != existente.turma_id {
        let destino = store.require::<Turma>(&p.turma_id)?;
        if destino.lotada() {
            return Err(AppError::TurmaLotada(destino.id.clone()));
        }
        let com_presenca = store
            .diarios_da_turma(&existente.turma_id)
            .filter(|d| d.presencas.iter().any(|presenca| presenca.aluno_id == id))
            .count();
        livre_de_referencias("Aluno", id, &[(com_presenca, "diário(s) da turma atual")])?;

        if let Some(origem) = store.get::<Turma>(&existente.turma_id) {
            proximo = proximo.update(Turma {
                vagas_ocupadas: origem.vagas_ocupadas.saturating_sub(1),
                ..origem.clone()
            })?;
        }
        proximo = proximo.update(Turma {
            vagas_ocupadas: destino.vagas_ocupadas + 1,
            ..destino.clone()
        })?;
        tracing::info!("Aluno '{}' transferido de {} para {}", id, existente.turma_id, destino.id);
    }

    let aluno = Aluno {
        nome: p.nome.trim().to_string(),
        email: p.email.trim().to_string(),
        telefone: p.telefone,
        cpf: p.cpf,
        data_nascimento: p.data_nascimento,
        turma_id: p.turma_id,
        data_matricula: p.data_matricula,
        ..existente.clone()
    };
    Ok((proximo.update(aluno.clone())?, aluno))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        academico::{AulaPayload, TipoAula, TurmaStatus},
        diario::{DiarioAula, Presenca, StatusPresenca},
    };
    use chrono::NaiveDate;

    fn base() -> Store {
        let (store, _) = criar_curso(
            &Store::default(),
            CursoPayload {
                nome: "Informática".into(),
                descricao: String::new(),
                carga_horaria: 60,
                ativo: true,
            },
        )
        .unwrap();
        store
    }

    fn turma_payload(curso_id: &str, total: u32, ocupadas: u32) -> TurmaPayload {
        TurmaPayload {
            codigo: "INF-A".into(),
            curso_id: curso_id.into(),
            ementa_id: None,
            instrutor_id: None,
            coordenador_id: None,
            vagas_total: total,
            vagas_ocupadas: ocupadas,
            horario: String::new(),
            data_inicio: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            data_fim: None,
            status: TurmaStatus::Planejada,
        }
    }

    fn user_payload(email: &str, role: Role) -> UserPayload {
        UserPayload {
            nome: "Ana".into(),
            email: email.into(),
            password: Some("segredo1".into()),
            role,
            vinculo_id: None,
        }
    }

    #[test]
    fn turma_enforces_capacity_and_references() {
        let store = base();
        let curso_id = store.cursos[0].id.clone();

        assert!(matches!(
            criar_turma(&store, turma_payload(&curso_id, 10, 11)),
            Err(AppError::Validacao(_))
        ));
        assert!(matches!(
            criar_turma(&store, turma_payload("nenhum", 10, 0)),
            Err(AppError::NaoEncontrado { .. })
        ));

        let mut payload = turma_payload(&curso_id, 10, 0);
        payload.instrutor_id = Some("i-x".into());
        assert!(matches!(criar_turma(&store, payload), Err(AppError::NaoEncontrado { .. })));

        let (store, turma) = criar_turma(&store, turma_payload(&curso_id, 10, 4)).unwrap();
        assert_eq!(store.get::<Turma>(&turma.id).unwrap().vagas_livres(), 6);
    }

    #[test]
    fn ementa_numbers_lessons_in_order_and_keeps_given_ids() {
        let store = base();
        let payload = EmentaPayload {
            curso_id: store.cursos[0].id.clone(),
            titulo: "Módulo 1".into(),
            aulas: vec![
                AulaPayload {
                    id: Some("fixa".into()),
                    titulo: "Introdução".into(),
                    tipo: TipoAula::Teorica,
                    objetivos: String::new(),
                    conteudo: String::new(),
                },
                AulaPayload {
                    id: None,
                    titulo: "Prova".into(),
                    tipo: TipoAula::Avaliacao,
                    objetivos: String::new(),
                    conteudo: String::new(),
                },
            ],
        };
        let (_, ementa) = criar_ementa(&store, payload).unwrap();
        assert_eq!(ementa.aulas[0].id, "fixa");
        assert_eq!(ementa.aulas[0].numero, 1);
        assert_eq!(ementa.aulas[1].numero, 2);
        assert!(!ementa.aulas[1].id.is_empty());
    }

    #[test]
    fn user_email_is_unique_case_insensitive() {
        let (store, user) = criar_user(&Store::default(), user_payload("Ana@Escola.pt", Role::Admin), "h".into()).unwrap();
        assert_eq!(user.email, "ana@escola.pt");

        let erro = criar_user(&store, user_payload("ANA@escola.pt", Role::Instrutor), "h".into()).unwrap_err();
        assert!(matches!(erro, AppError::Duplicado { .. }));

        // Manter o próprio email numa edição é permitido
        let (_, editado) = atualizar_user(&store, &user.id, user_payload("ana@escola.pt", Role::Admin), None).unwrap();
        assert_eq!(editado.password_hash, "h");
    }

    #[test]
    fn user_link_must_match_role() {
        let mut payload = user_payload("i@escola.pt", Role::Instrutor);
        payload.vinculo_id = Some("desconhecido".into());
        assert!(matches!(criar_user(&Store::default(), payload, "h".into()), Err(AppError::Validacao(_))));
    }

    #[test]
    fn last_admin_cannot_be_removed() {
        let (store, admin) = criar_user(&Store::default(), user_payload("a@escola.pt", Role::Admin), "h".into()).unwrap();
        assert!(matches!(excluir_user(&store, &admin.id), Err(AppError::Validacao(_))));

        let (store, _) = criar_user(&store, user_payload("b@escola.pt", Role::Admin), "h".into()).unwrap();
        assert!(excluir_user(&store, &admin.id).is_ok());
    }

    #[test]
    fn enrolled_prospect_is_immutable() {
        let mut store = Store::default();
        let interessado = Interessado {
            id: "p1".into(),
            nome: "João".into(),
            email: "joao@mail.com".into(),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            curso_interesse: None,
            observacoes: None,
            status: InteressadoStatus::Matriculado,
            created_at: Utc::now(),
        };
        store = store.add(interessado).unwrap();
        let form = InteressadoForm {
            nome: "João".into(),
            email: "joao@mail.com".into(),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            curso_interesse: None,
            observacoes: None,
        };
        let erro = atualizar_interessado(&store, "p1", form, InteressadoStatus::EmContato).unwrap_err();
        assert!(matches!(erro, AppError::InteressadoImutavel(_)));
    }

    fn aula_payload(id: &str, titulo: &str) -> AulaPayload {
        AulaPayload {
            id: Some(id.into()),
            titulo: titulo.into(),
            tipo: TipoAula::Teorica,
            objetivos: String::new(),
            conteudo: String::new(),
        }
    }

    fn aluno(id: &str, turma_id: &str) -> Aluno {
        Aluno {
            id: id.into(),
            nome: "Rita".into(),
            email: "rita@mail.com".into(),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            turma_id: turma_id.into(),
            interessado_id: None,
            data_matricula: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    fn aluno_payload(turma_id: &str) -> AlunoPayload {
        AlunoPayload {
            nome: "Rita".into(),
            email: "rita@mail.com".into(),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            turma_id: turma_id.into(),
            data_matricula: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        }
    }

    /// Curso, ementa (a1, a2), turma com 1/2 vagas, aluno "al1" e um diário
    /// da aula a2 com a presença de "al1".
    fn cenario() -> (Store, String, String) {
        let store = base();
        let curso_id = store.cursos[0].id.clone();
        let (store, ementa) = criar_ementa(
            &store,
            EmentaPayload {
                curso_id: curso_id.clone(),
                titulo: "Módulo 1".into(),
                aulas: vec![aula_payload("a1", "Introdução"), aula_payload("a2", "Variáveis")],
            },
        )
        .unwrap();
        let mut payload = turma_payload(&curso_id, 2, 1);
        payload.ementa_id = Some(ementa.id.clone());
        let (store, turma) = criar_turma(&store, payload).unwrap();
        let store = store
            .add(aluno("al1", &turma.id))
            .unwrap()
            .add(DiarioAula {
                id: "d1".into(),
                turma_id: turma.id.clone(),
                aula_id: "a2".into(),
                aula_numero: 2,
                aula_titulo: "Variáveis".into(),
                data: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
                instrutor_id: "i1".into(),
                presencas: vec![Presenca {
                    aluno_id: "al1".into(),
                    status: StatusPresenca::Presente,
                }],
                observacoes: None,
                created_at: Utc::now(),
            })
            .unwrap();
        (store, turma.id, ementa.id)
    }

    #[test]
    fn section_with_students_or_diaries_is_not_deleted() {
        let (store, turma_id, _) = cenario();
        let erro = Turma::excluir(&store, &turma_id).unwrap_err();
        assert!(matches!(erro, AppError::EmUso { entidade: "Turma", .. }));

        let curso_id = store.cursos[0].id.clone();
        let (store, vazia) = criar_turma(&store, turma_payload(&curso_id, 5, 0)).unwrap();
        let store = Turma::excluir(&store, &vazia.id).unwrap();
        assert!(!store.contains::<Turma>(&vazia.id));
        assert!(store.contains::<Turma>(&turma_id));
    }

    #[test]
    fn curriculum_and_course_in_use_are_not_deleted() {
        let (store, turma_id, ementa_id) = cenario();
        assert!(matches!(excluir_ementa(&store, &ementa_id), Err(AppError::EmUso { .. })));
        let curso_id = store.cursos[0].id.clone();
        assert!(matches!(excluir_curso(&store, &curso_id), Err(AppError::EmUso { .. })));

        // Sem turma a apontar para ela, a ementa pode sair
        let turma = store.get::<Turma>(&turma_id).unwrap().clone();
        let store = store.update(Turma { ementa_id: None, ..turma }).unwrap();
        let store = excluir_ementa(&store, &ementa_id).unwrap();
        assert!(store.ementas.is_empty());
    }

    #[test]
    fn curriculum_update_keeps_lessons_already_taught() {
        let (store, _, ementa_id) = cenario();
        let curso_id = store.cursos[0].id.clone();

        let sem_a2 = EmentaPayload {
            curso_id: curso_id.clone(),
            titulo: "Módulo 1".into(),
            aulas: vec![aula_payload("a1", "Introdução")],
        };
        let erro = atualizar_ementa(&store, &ementa_id, sem_a2).unwrap_err();
        assert!(matches!(erro, AppError::EmUso { entidade: "Aula", .. }));

        // Reordenar e renomear atualiza os dados copiados para o diário
        let reordenada = EmentaPayload {
            curso_id,
            titulo: "Módulo 1".into(),
            aulas: vec![aula_payload("a2", "Tipos e variáveis"), aula_payload("a1", "Introdução")],
        };
        let (store, _) = atualizar_ementa(&store, &ementa_id, reordenada).unwrap();
        let diario = store.get::<DiarioAula>("d1").unwrap();
        assert_eq!(diario.aula_numero, 1);
        assert_eq!(diario.aula_titulo, "Tipos e variáveis");
    }

    #[test]
    fn moving_a_student_follows_enrollment_rules() {
        let (store, origem, _) = cenario();
        let curso_id = store.cursos[0].id.clone();

        let erro = atualizar_aluno(&store, "al1", aluno_payload("nenhuma")).unwrap_err();
        assert!(matches!(erro, AppError::NaoEncontrado { .. }));

        let (store, cheia) = criar_turma(&store, turma_payload(&curso_id, 1, 1)).unwrap();
        let erro = atualizar_aluno(&store, "al1", aluno_payload(&cheia.id)).unwrap_err();
        assert!(matches!(erro, AppError::TurmaLotada(_)));

        // "al1" tem presença registada na turma atual
        let (store, livre) = criar_turma(&store, turma_payload(&curso_id, 3, 0)).unwrap();
        let erro = atualizar_aluno(&store, "al1", aluno_payload(&livre.id)).unwrap_err();
        assert!(matches!(erro, AppError::EmUso { entidade: "Aluno", .. }));

        let store = store.add(aluno("al2", &origem)).unwrap();
        let (store, movido) = atualizar_aluno(&store, "al2", aluno_payload(&livre.id)).unwrap();
        assert_eq!(movido.turma_id, livre.id);
        assert_eq!(store.get::<Turma>(&origem).unwrap().vagas_ocupadas, 0);
        assert_eq!(store.get::<Turma>(&livre.id).unwrap().vagas_ocupadas, 1);

        // Editar sem trocar de turma não mexe nas vagas
        let (store, _) = atualizar_aluno(&store, "al2", aluno_payload(&livre.id)).unwrap();
        assert_eq!(store.get::<Turma>(&livre.id).unwrap().vagas_ocupadas, 1);
    }

    #[test]
    fn enrolled_or_linked_prospect_is_not_deleted() {
        let interessado = |id: &str, status| Interessado {
            id: id.into(),
            nome: "João".into(),
            email: "joao@mail.com".into(),
            telefone: String::new(),
            cpf: String::new(),
            data_nascimento: None,
            curso_interesse: None,
            observacoes: None,
            status,
            created_at: Utc::now(),
        };
        let store = Store::default()
            .add(interessado("p1", InteressadoStatus::Matriculado))
            .unwrap()
            .add(interessado("p2", InteressadoStatus::Novo))
            .unwrap()
            .add(interessado("p3", InteressadoStatus::Desistente))
            .unwrap()
            .add(Aluno {
                interessado_id: Some("p2".into()),
                ..aluno("al1", "t1")
            })
            .unwrap();

        assert!(matches!(
            Interessado::excluir(&store, "p1"),
            Err(AppError::InteressadoImutavel(_))
        ));
        assert!(matches!(Interessado::excluir(&store, "p2"), Err(AppError::EmUso { .. })));
        let store = Interessado::excluir(&store, "p3").unwrap();
        assert_eq!(store.interessados.len(), 2);
    }

    #[test]
    fn instructor_with_sections_is_not_deleted() {
        let (store, turma_id, _) = cenario();
        let (store, instrutor) = criar_instrutor(
            &store,
            InstrutorPayload {
                nome: "Carlos".into(),
                email: "carlos@escola.pt".into(),
                telefone: String::new(),
                cpf: String::new(),
                especialidades: vec![],
                ativo: true,
            },
        )
        .unwrap();
        let turma = store.get::<Turma>(&turma_id).unwrap().clone();
        let store = store
            .update(Turma {
                instrutor_id: Some(instrutor.id.clone()),
                ..turma
            })
            .unwrap();
        assert!(matches!(excluir_instrutor(&store, &instrutor.id), Err(AppError::EmUso { .. })));
    }
}
