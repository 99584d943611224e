// src/web/painel_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::UserResumo,
    services::painel_service::{self, Painel},
    state::StoreHandle,
    templates::PainelPage,
    web::mw_auth::UsuarioAtual,
};
use askama::Template;
use axum::{
    extract::{Extension, State},
    response::{Html, IntoResponse},
    Json,
};

// GET /painel (protegido por require_auth)
pub async fn painel_page_handler(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /painel: Acesso para {}", user.email);
    let snapshot = store.snapshot().await;
    let painel = painel_service::painel_para(&snapshot, &user);

    let template = PainelPage::new(user.nome.clone(), user.role.rotulo(), &painel);
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Falha ao renderizar template PainelPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /api/me
pub async fn me(Extension(UsuarioAtual(user)): Extension<UsuarioAtual>) -> Json<UserResumo> {
    Json(UserResumo::from(&user))
}

// GET /api/painel
pub async fn painel_json(
    State(store): State<StoreHandle>,
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
) -> Json<Painel> {
    let snapshot = store.snapshot().await;
    Json(painel_service::painel_para(&snapshot, &user))
}
