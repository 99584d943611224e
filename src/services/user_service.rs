// src/services/user_service.rs
use crate::{
    config::Settings,
    error::AppResult,
    models::user::{Role, User},
    services::{
        auth_service,
        cadastro_service::{self, UserPayload},
    },
    state::StoreHandle,
    store::Store,
};

/// Cria o administrador inicial quando ainda não há utilizadores.
/// Devolve o utilizador criado, se algum.
pub async fn garantir_admin(store: &StoreHandle, settings: &Settings) -> AppResult<Option<User>> {
    if !store.snapshot().await.users.is_empty() {
        return Ok(None);
    }
    let Some(password) = settings.admin_password.as_deref() else {
        tracing::warn!("⚠️ Nenhum utilizador registado e ADMIN_PASSWORD não definida: ninguém conseguirá entrar.");
        return Ok(None);
    };

    let password_hash = auth_service::hash_password(password).await?;
    let payload = UserPayload {
        nome: "Administrador".into(),
        email: settings.admin_email.clone(),
        password: Some(password.to_string()),
        role: Role::Admin,
        vinculo_id: None,
    };
    let user = store
        .apply(|s| cadastro_service::criar_user(s, payload, password_hash))
        .await?;
    tracing::info!("✅ Administrador inicial '{}' criado.", user.email);
    Ok(Some(user))
}

/// Utilizador da sessão, se ainda existir no estado atual.
pub fn find_user_by_id<'a>(store: &'a Store, user_id: &str) -> Option<&'a User> {
    let user = store.get::<User>(user_id);
    if user.is_none() {
        tracing::debug!("Utilizador '{}' não encontrado.", user_id);
    }
    user
}
