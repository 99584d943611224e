// src/services/persistence_service.rs
//! Leitura/escrita do snapshot inteiro, como JSON, sob uma chave fixa.

use crate::{error::AppResult, store::Store};
use chrono::Utc;
use sqlx::SqlitePool;

pub const CHAVE_ESTADO: &str = "gestao_academica_estado";

/// Carrega o último estado guardado, ou `None` numa base nova.
pub async fn carregar(pool: &SqlitePool) -> AppResult<Option<Store>> {
    let dados: Option<String> = sqlx::query_scalar("SELECT dados FROM estado_aplicacao WHERE chave = ?")
        .bind(CHAVE_ESTADO)
        .fetch_optional(pool)
        .await?;

    match dados {
        Some(json) => {
            let store: Store = serde_json::from_str(&json)?;
            tracing::info!(
                "Estado carregado: {} utilizadores, {} turmas, {} diários",
                store.users.len(),
                store.turmas.len(),
                store.diarios.len()
            );
            Ok(Some(store))
        }
        None => {
            tracing::info!("Nenhum estado guardado encontrado.");
            Ok(None)
        }
    }
}

pub async fn guardar(pool: &SqlitePool, store: &Store) -> AppResult<()> {
    let json = serde_json::to_string(store)?;
    sqlx::query(
        r#"
        INSERT INTO estado_aplicacao (chave, dados, atualizado_em)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(chave) DO UPDATE SET
           dados = excluded.dados,
           atualizado_em = excluded.atualizado_em
        "#,
    )
    .bind(CHAVE_ESTADO)
    .bind(json)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    tracing::debug!("Estado guardado.");
    Ok(())
}
