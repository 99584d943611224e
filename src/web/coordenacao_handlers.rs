// src/web/coordenacao_handlers.rs
use crate::{
    error::AppResult,
    models::{
        academico::{Curso, CursoPayload, Ementa, EmentaPayload, Turma, TurmaPayload},
        pessoa::{Aluno, AlunoPayload, Interessado, InteressadoForm, InteressadoStatus},
    },
    services::{
        cadastro_service,
        matricula_service::{self, MatriculaResposta},
    },
    state::StoreHandle,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;

// --- Cursos ---

pub async fn criar_curso(
    State(store): State<StoreHandle>,
    Json(payload): Json<CursoPayload>,
) -> AppResult<(StatusCode, Json<Curso>)> {
    let curso = store.apply(|s| cadastro_service::criar_curso(s, payload)).await?;
    tracing::info!("Curso '{}' criado", curso.nome);
    Ok((StatusCode::CREATED, Json(curso)))
}

pub async fn atualizar_curso(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<CursoPayload>,
) -> AppResult<Json<Curso>> {
    Ok(Json(store.apply(|s| cadastro_service::atualizar_curso(s, &id, payload)).await?))
}

// --- Ementas ---

pub async fn criar_ementa(
    State(store): State<StoreHandle>,
    Json(payload): Json<EmentaPayload>,
) -> AppResult<(StatusCode, Json<Ementa>)> {
    let ementa = store.apply(|s| cadastro_service::criar_ementa(s, payload)).await?;
    tracing::info!("Ementa '{}' criada com {} aulas", ementa.titulo, ementa.aulas.len());
    Ok((StatusCode::CREATED, Json(ementa)))
}

pub async fn atualizar_ementa(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<EmentaPayload>,
) -> AppResult<Json<Ementa>> {
    Ok(Json(store.apply(|s| cadastro_service::atualizar_ementa(s, &id, payload)).await?))
}

// --- Turmas ---

pub async fn criar_turma(
    State(store): State<StoreHandle>,
    Json(payload): Json<TurmaPayload>,
) -> AppResult<(StatusCode, Json<Turma>)> {
    let turma = store.apply(|s| cadastro_service::criar_turma(s, payload)).await?;
    tracing::info!("Turma '{}' criada ({} vagas)", turma.codigo, turma.vagas_total);
    Ok((StatusCode::CREATED, Json(turma)))
}

pub async fn atualizar_turma(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<TurmaPayload>,
) -> AppResult<Json<Turma>> {
    Ok(Json(store.apply(|s| cadastro_service::atualizar_turma(s, &id, payload)).await?))
}

// --- Interessados e matrícula ---

#[derive(Debug, Deserialize)]
pub struct MatriculaPayload {
    #[serde(flatten)]
    pub interessado: InteressadoForm,
    pub turma_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InteressadoUpdatePayload {
    #[serde(flatten)]
    pub interessado: InteressadoForm,
    pub status: InteressadoStatus,
}

#[derive(Debug, Deserialize)]
pub struct ConversaoPayload {
    pub turma_id: String,
}

/// POST /interessados: regista um interessado sem turma.
pub async fn criar_interessado(
    State(store): State<StoreHandle>,
    Json(form): Json<InteressadoForm>,
) -> AppResult<(StatusCode, Json<Interessado>)> {
    let hoje = Local::now().date_naive();
    let interessado = store
        .apply(|s| {
            let m = matricula_service::matricular(s, form, None, hoje)?;
            Ok((m.store, m.interessado))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(interessado)))
}

/// POST /interessados/matricula: assistente de matrícula (interessado + aluno + vaga).
pub async fn matricular(
    State(store): State<StoreHandle>,
    Json(payload): Json<MatriculaPayload>,
) -> AppResult<(StatusCode, Json<MatriculaResposta>)> {
    let hoje = Local::now().date_naive();
    tracing::info!(
        "POST /interessados/matricula: '{}' na turma {:?}",
        payload.interessado.email,
        payload.turma_id
    );
    let resposta = store
        .apply(|s| {
            let m = matricula_service::matricular(s, payload.interessado, payload.turma_id.as_deref(), hoje)?;
            let resposta = MatriculaResposta::from(&m);
            Ok((m.store, resposta))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(resposta)))
}

pub async fn converter_interessado(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<ConversaoPayload>,
) -> AppResult<(StatusCode, Json<MatriculaResposta>)> {
    let hoje = Local::now().date_naive();
    let resposta = store
        .apply(|s| {
            let m = matricula_service::converter_interessado(s, &id, &payload.turma_id, hoje)?;
            let resposta = MatriculaResposta::from(&m);
            Ok((m.store, resposta))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(resposta)))
}

pub async fn atualizar_interessado(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<InteressadoUpdatePayload>,
) -> AppResult<Json<Interessado>> {
    let interessado = store
        .apply(|s| cadastro_service::atualizar_interessado(s, &id, payload.interessado, payload.status))
        .await?;
    Ok(Json(interessado))
}

// --- Alunos ---

#[derive(Debug, Deserialize)]
pub struct FiltroAlunos {
    pub turma_id: Option<String>,
}

pub async fn listar_alunos(
    State(store): State<StoreHandle>,
    Query(filtro): Query<FiltroAlunos>,
) -> Json<Vec<Aluno>> {
    let snapshot = store.snapshot().await;
    let alunos = match filtro.turma_id.as_deref() {
        Some(turma_id) => snapshot.alunos_da_turma(turma_id).cloned().collect(),
        None => snapshot.alunos.clone(),
    };
    Json(alunos)
}

pub async fn atualizar_aluno(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<AlunoPayload>,
) -> AppResult<Json<Aluno>> {
    Ok(Json(store.apply(|s| cadastro_service::atualizar_aluno(s, &id, payload)).await?))
}
