// src/web/diario_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        academico::Turma,
        diario::{DiarioAula, DiarioForm, FormularioDiario, ResumoDiarioTurma},
        user::{Role, User},
    },
    services::diario_service,
    state::StoreHandle,
    store::Store,
    web::mw_auth::UsuarioAtual,
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

/// Instrutores só acedem aos diários das turmas que lecionam.
pub fn exigir_acesso_turma(store: &Store, user: &User, turma_id: &str) -> AppResult<()> {
    let turma = store.require::<Turma>(turma_id)?;
    match user.role {
        Role::Admin | Role::Coordenador => Ok(()),
        Role::Instrutor if turma.instrutor_id.as_deref() == Some(user.instrutor_ref()) => Ok(()),
        Role::Instrutor => {
            tracing::warn!("Instrutor {} tentou aceder à turma {}", user.email, turma_id);
            Err(AppError::Forbidden)
        }
    }
}

pub async fn resumo_turma(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Path(turma_id): Path<String>,
) -> AppResult<Json<ResumoDiarioTurma>> {
    let snapshot = store.snapshot().await;
    exigir_acesso_turma(&snapshot, &user, &turma_id)?;
    Ok(Json(diario_service::resumo_turma(&snapshot, &turma_id)?))
}

pub async fn formulario(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Path(turma_id): Path<String>,
) -> AppResult<Json<FormularioDiario>> {
    let snapshot = store.snapshot().await;
    exigir_acesso_turma(&snapshot, &user, &turma_id)?;
    Ok(Json(diario_service::formulario(&snapshot, &turma_id)?))
}

pub async fn obter_diario(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Path(id): Path<String>,
) -> AppResult<Json<DiarioAula>> {
    let snapshot = store.snapshot().await;
    let diario = snapshot.require::<DiarioAula>(&id)?;
    exigir_acesso_turma(&snapshot, &user, &diario.turma_id)?;
    Ok(Json(diario.clone()))
}

pub async fn criar_diario(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Json(form): Json<DiarioForm>,
) -> AppResult<(StatusCode, Json<DiarioAula>)> {
    tracing::info!("POST /api/diarios: turma {} aula {}", form.turma_id, form.aula_id);
    let diario = store
        .apply(|s| {
            exigir_acesso_turma(s, &user, &form.turma_id)?;
            diario_service::criar_diario(s, form, user.instrutor_ref())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(diario)))
}

pub async fn atualizar_diario(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Path(id): Path<String>,
    Json(form): Json<DiarioForm>,
) -> AppResult<Json<DiarioAula>> {
    let diario = store
        .apply(|s| {
            exigir_acesso_turma(s, &user, &form.turma_id)?;
            diario_service::atualizar_diario(s, &id, form)
        })
        .await?;
    Ok(Json(diario))
}

#[derive(Debug, Deserialize)]
pub struct Confirmacao {
    #[serde(default)]
    pub confirmar: bool,
}

/// DELETE /api/diarios/{id}?confirmar=true
pub async fn excluir_diario(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    Path(id): Path<String>,
    Query(confirmacao): Query<Confirmacao>,
) -> AppResult<StatusCode> {
    store
        .apply(|s| {
            let turma_id = s.require::<DiarioAula>(&id)?.turma_id.clone();
            exigir_acesso_turma(s, &user, &turma_id)?;
            Ok((diario_service::excluir_diario(s, &id, confirmacao.confirmar)?, ()))
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academico::TurmaStatus;
    use chrono::{NaiveDate, Utc};

    fn store() -> Store {
        Store::default()
            .add(Turma {
                id: "t1".into(),
                codigo: "T1".into(),
                curso_id: "c1".into(),
                ementa_id: None,
                instrutor_id: Some("i1".into()),
                coordenador_id: None,
                vagas_total: 5,
                vagas_ocupadas: 0,
                horario: String::new(),
                data_inicio: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                data_fim: None,
                status: TurmaStatus::EmAndamento,
            })
            .unwrap()
    }

    fn user(role: Role, vinculo: Option<&str>) -> User {
        User {
            id: "u9".into(),
            nome: "U".into(),
            email: "u@escola.pt".into(),
            password_hash: String::new(),
            role,
            vinculo_id: vinculo.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn instructors_reach_only_their_sections() {
        let s = store();
        assert!(exigir_acesso_turma(&s, &user(Role::Instrutor, Some("i1")), "t1").is_ok());
        assert!(matches!(
            exigir_acesso_turma(&s, &user(Role::Instrutor, Some("i2")), "t1"),
            Err(AppError::Forbidden)
        ));
        assert!(exigir_acesso_turma(&s, &user(Role::Coordenador, None), "t1").is_ok());
        assert!(matches!(
            exigir_acesso_turma(&s, &user(Role::Admin, None), "nenhuma"),
            Err(AppError::NaoEncontrado { .. })
        ));
    }
}
