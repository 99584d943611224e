// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pessoa::{Coordenador, CoordenadorPayload, Instrutor, InstrutorPayload},
        user::{User, UserResumo},
    },
    services::{auth_service, cadastro_service::{self, UserPayload}},
    state::StoreHandle,
    web::mw_auth::UsuarioAtual,
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

// --- Utilizadores ---

pub async fn listar_users(State(store): State<StoreHandle>) -> Json<Vec<UserResumo>> {
    let snapshot = store.snapshot().await;
    Json(snapshot.users.iter().map(UserResumo::from).collect())
}

pub async fn criar_user(
    State(store): State<StoreHandle>,
    Json(payload): Json<UserPayload>,
) -> AppResult<(StatusCode, Json<UserResumo>)> {
    tracing::info!("POST /api/admin/users: criando '{}'", payload.email);
    let password = payload
        .password
        .clone()
        .ok_or_else(|| AppError::Validacao("Senha é obrigatória".into()))?;
    // Valida antes do hash para não gastar bcrypt com dados inválidos
    cadastro_service::validar_user(&*store.snapshot().await, &payload, None)?;
    let password_hash = auth_service::hash_password(&password).await?;

    let user = store
        .apply(|s| cadastro_service::criar_user(s, payload, password_hash))
        .await?;
    tracing::info!("✅ Utilizador '{}' criado com sucesso.", user.email);
    Ok((StatusCode::CREATED, Json(UserResumo::from(&user))))
}

pub async fn atualizar_user(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> AppResult<Json<UserResumo>> {
    tracing::info!("PUT /api/admin/users/{}", id);
    cadastro_service::validar_user(&*store.snapshot().await, &payload, Some(&id))?;
    let password_hash = match payload.password.as_deref() {
        Some(p) => Some(auth_service::hash_password(p).await?),
        None => None,
    };
    let user = store
        .apply(|s| cadastro_service::atualizar_user(s, &id, payload, password_hash))
        .await?;
    Ok(Json(UserResumo::from(&user)))
}

pub async fn excluir_user(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(atual)): Extension<UsuarioAtual>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if atual.id == id {
        return Err(AppError::Validacao("Não pode remover a sua própria conta".into()));
    }
    store
        .apply(|s| Ok((cadastro_service::excluir_user(s, &id)?, ())))
        .await?;
    tracing::info!("Utilizador '{}' removido por {}", id, atual.email);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn obter_user(State(store): State<StoreHandle>, Path(id): Path<String>) -> AppResult<Json<UserResumo>> {
    let snapshot = store.snapshot().await;
    Ok(Json(UserResumo::from(snapshot.require::<User>(&id)?)))
}

// --- Coordenadores ---

pub async fn criar_coordenador(
    State(store): State<StoreHandle>,
    Json(payload): Json<CoordenadorPayload>,
) -> AppResult<(StatusCode, Json<Coordenador>)> {
    let coordenador = store
        .apply(|s| cadastro_service::criar_coordenador(s, payload))
        .await?;
    tracing::info!("Coordenador '{}' criado", coordenador.id);
    Ok((StatusCode::CREATED, Json(coordenador)))
}

pub async fn atualizar_coordenador(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<CoordenadorPayload>,
) -> AppResult<Json<Coordenador>> {
    let coordenador = store
        .apply(|s| cadastro_service::atualizar_coordenador(s, &id, payload))
        .await?;
    Ok(Json(coordenador))
}

// --- Instrutores ---

pub async fn criar_instrutor(
    State(store): State<StoreHandle>,
    Json(payload): Json<InstrutorPayload>,
) -> AppResult<(StatusCode, Json<Instrutor>)> {
    let instrutor = store
        .apply(|s| cadastro_service::criar_instrutor(s, payload))
        .await?;
    tracing::info!("Instrutor '{}' criado", instrutor.id);
    Ok((StatusCode::CREATED, Json(instrutor)))
}

pub async fn atualizar_instrutor(
    State(store): State<StoreHandle>,
    Path(id): Path<String>,
    Json(payload): Json<InstrutorPayload>,
) -> AppResult<Json<Instrutor>> {
    let instrutor = store
        .apply(|s| cadastro_service::atualizar_instrutor(s, &id, payload))
        .await?;
    Ok(Json(instrutor))
}

// --- Histórico ---

#[derive(Debug, Serialize)]
pub struct DesfazerResposta {
    pub desfeito: bool,
}

/// POST /api/admin/desfazer: volta ao snapshot anterior.
pub async fn desfazer(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(atual)): Extension<UsuarioAtual>,
) -> AppResult<Json<DesfazerResposta>> {
    let desfeito = store.desfazer().await?;
    if desfeito {
        tracing::info!("Alteração desfeita por {}", atual.email);
    } else {
        tracing::debug!("Nada para desfazer");
    }
    Ok(Json(DesfazerResposta { desfeito }))
}
