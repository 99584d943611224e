// src/web/crud.rs
//! Handlers genéricos de leitura e exclusão, partilhados pelas várias coleções.
//! A exclusão passa pelas verificações de `Excluivel`.

use crate::{
    error::AppResult,
    services::cadastro_service::Excluivel,
    state::StoreHandle,
    store::Registro,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

pub async fn listar<T>(State(store): State<StoreHandle>) -> Json<Vec<T>>
where
    T: Registro + Serialize + Send + Sync + 'static,
{
    let snapshot = store.snapshot().await;
    Json(snapshot.list::<T>().to_vec())
}

pub async fn obter<T>(State(store): State<StoreHandle>, Path(id): Path<String>) -> AppResult<Json<T>>
where
    T: Registro + Serialize + Send + Sync + 'static,
{
    let snapshot = store.snapshot().await;
    Ok(Json(snapshot.require::<T>(&id)?.clone()))
}

pub async fn excluir<T>(State(store): State<StoreHandle>, Path(id): Path<String>) -> AppResult<StatusCode>
where
    T: Excluivel + Send + Sync + 'static,
{
    store.apply(|s| Ok((T::excluir(s, &id)?, ()))).await?;
    tracing::info!("{} '{}' excluído", T::ENTIDADE, id);
    Ok(StatusCode::NO_CONTENT)
}
