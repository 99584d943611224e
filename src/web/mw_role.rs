// src/web/mw_role.rs
use crate::{
    error::AppError,
    models::user::{Area, User},
    web::mw_auth::UsuarioAtual,
};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Deve ser executado *depois* de `require_auth`/`require_api_auth`.
pub fn exigir_area(user: &User, area: Area) -> Result<(), AppError> {
    if user.role.pode_acessar(area) {
        tracing::debug!("Role MW: acesso a {:?} concedido para {}", area, user.email);
        Ok(())
    } else {
        tracing::warn!("Role MW: acesso a {:?} negado para {} ({})", area, user.email, user.role.as_str());
        Err(AppError::Forbidden)
    }
}

pub async fn require_admin(
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    exigir_area(&user, Area::Administracao)?;
    Ok(next.run(request).await)
}

pub async fn require_coordenacao(
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    exigir_area(&user, Area::Coordenacao)?;
    Ok(next.run(request).await)
}

pub async fn require_diarios(
    Extension(UsuarioAtual(user)): Extension<UsuarioAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    exigir_area(&user, Area::Diarios)?;
    Ok(next.run(request).await)
}
