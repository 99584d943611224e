// src/state.rs
use crate::{error::AppResult, services::persistence_service, store::Store};
use sqlx::SqlitePool;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;

struct Historico {
    atual: Arc<Store>,
    anteriores: VecDeque<Arc<Store>>,
    limite: usize,
}

/// Dono do snapshot atual do `Store`.
///
/// Leituras clonam o `Arc` do snapshot; mutações passam pelo mutex, são
/// persistidas e só depois se tornam visíveis.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<Historico>>,
    db_pool: SqlitePool,
}

impl StoreHandle {
    pub fn new(store: Store, db_pool: SqlitePool, limite_historico: usize) -> Self {
        StoreHandle {
            inner: Arc::new(Mutex::new(Historico {
                atual: Arc::new(store),
                anteriores: VecDeque::new(),
                limite: limite_historico,
            })),
            db_pool,
        }
    }

    pub async fn snapshot(&self) -> Arc<Store> {
        self.inner.lock().await.atual.clone()
    }

    /// Aplica `f` ao snapshot atual. Se `f` falhar ou a gravação falhar,
    /// o estado fica como estava.
    pub async fn apply<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Store) -> AppResult<(Store, T)>,
    {
        let mut historico = self.inner.lock().await;
        let (proximo, resultado) = f(historico.atual.as_ref())?;
        persistence_service::guardar(&self.db_pool, &proximo).await?;

        let anterior = std::mem::replace(&mut historico.atual, Arc::new(proximo));
        if historico.limite > 0 {
            historico.anteriores.push_back(anterior);
            while historico.anteriores.len() > historico.limite {
                historico.anteriores.pop_front();
            }
        }
        Ok(resultado)
    }

    /// Volta ao snapshot anterior. Devolve `false` se não houver histórico.
    pub async fn desfazer(&self) -> AppResult<bool> {
        let mut historico = self.inner.lock().await;
        let Some(anterior) = historico.anteriores.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = persistence_service::guardar(&self.db_pool, &anterior).await {
            historico.anteriores.push_back(anterior);
            return Err(e);
        }
        historico.atual = anterior;
        tracing::info!("Última alteração desfeita ({} passos restantes)", historico.anteriores.len());
        Ok(true)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub store: StoreHandle,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for StoreHandle {
    fn from_ref(state: &AppState) -> StoreHandle {
        state.store.clone()
    }
}
