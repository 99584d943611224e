// src/web/mw_auth.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    services::user_service,
    state::AppState,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user_id";

/// Utilizador autenticado, posto nas extensões do pedido pelos middlewares.
#[derive(Clone, Debug)]
pub struct UsuarioAtual(pub User);

/// Lê o `user_id` da sessão e resolve-o no estado atual.
/// Um id que já não existe no estado conta como sessão anónima.
async fn usuario_da_sessao(state: &AppState, session: &Session) -> AppResult<Option<User>> {
    let user_id = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let store = state.store.snapshot().await;
    let user = user_service::find_user_by_id(&store, &user_id).cloned();
    if user.is_none() {
        tracing::warn!("Sessão aponta para utilizador removido '{}'", user_id);
    }
    Ok(user)
}

/// Páginas HTML: sem sessão redireciona para /login.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match usuario_da_sessao(&state, &session).await? {
        Some(user) => {
            tracing::debug!("Autenticação MW: '{}' autenticado", user.email);
            request.extensions_mut().insert(UsuarioAtual(user));
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Autenticação MW: não autenticado, redirecionando para /login");
            Ok(Redirect::to("/login").into_response())
        }
    }
}

/// API JSON: sem sessão responde 401.
pub async fn require_api_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = usuario_da_sessao(&state, &session)
        .await?
        .ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(UsuarioAtual(user));
    Ok(next.run(request).await)
}
