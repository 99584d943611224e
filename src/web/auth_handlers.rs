// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::LoginForm,
    services::auth_service,
    state::AppState,
    templates::LoginPage,
    web::mw_auth::SESSION_USER_KEY,
};
use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    error: Option<String>,
    success: Option<String>,
}

// GET /login
pub async fn show_login_form(session: Session, Query(params): Query<FeedbackParams>) -> AppResult<impl IntoResponse> {
    if session.get::<String>(SESSION_USER_KEY).await.ok().flatten().is_some() {
        tracing::debug!("GET /login: Utilizador já logado, redirecionando para /painel");
        return Ok(Redirect::to("/painel").into_response());
    }

    let template = LoginPage {
        error: params.error,
        success: params.success,
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

fn login_com_erro(mensagem: &str) -> Redirect {
    let redirect_url = format!("/login?error={}", urlencoding::encode(mensagem));
    Redirect::to(&redirect_url)
}

// POST /login (padrão Post/Redirect/Get em caso de erro)
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Redirect> {
    tracing::info!("Tentativa de login para: {}", form.email);

    let store = state.store.snapshot().await;
    let user = match auth_service::autenticar(&store, &form.email, &form.password).await {
        Ok(user) => user,
        Err(AppError::InvalidCredentials) => return Ok(login_com_erro("Email ou senha inválidos.")),
        Err(e) => return Err(e),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, &user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;

    tracing::info!("✅ Login bem-sucedido para: {} ({})", user.email, user.role.as_str());
    Ok(Redirect::to("/painel"))
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let user_id: Option<String> = session.get(SESSION_USER_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    match user_id {
        Some(id) => tracing::info!("🚪 Utilizador '{}' desligado.", id),
        None => tracing::info!("🚪 Sessão anónima desligada."),
    }

    let redirect_url = format!("/login?success={}", urlencoding::encode("Sessão terminada."));
    Ok(Redirect::to(&redirect_url))
}
