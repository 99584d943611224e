// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    store::Store,
};

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
            AppError::PasswordHashingError
        })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str) -> AppResult<String> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST).await
}

pub async fn hash_password_with_cost(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
            AppError::PasswordHashingError
        })
}

/// Procura o utilizador pelo email e confere a senha.
/// Email desconhecido e senha errada dão o mesmo erro.
pub async fn autenticar(store: &Store, email: &str, password: &str) -> AppResult<User> {
    let Some(user) = store.user_by_email(email) else {
        tracing::warn!("Login falhou: email '{}' desconhecido", email);
        return Err(AppError::InvalidCredentials);
    };
    if verify_password(password, &user.password_hash).await? {
        Ok(user.clone())
    } else {
        tracing::warn!("Login falhou: senha incorreta para '{}'", email);
        Err(AppError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use chrono::Utc;

    async fn store_com(email: &str, password: &str) -> Store {
        let user = User {
            id: "u1".into(),
            nome: "Admin".into(),
            email: email.into(),
            password_hash: hash_password_with_cost(password, 4).await.unwrap(),
            role: Role::Admin,
            vinculo_id: None,
            created_at: Utc::now(),
        };
        Store::default().add(user).unwrap()
    }

    #[tokio::test]
    async fn authenticates_with_matching_password() {
        let store = store_com("admin@escola.pt", "senha123").await;
        let user = autenticar(&store, "ADMIN@escola.pt", "senha123").await.unwrap();
        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_email_alike() {
        let store = store_com("admin@escola.pt", "senha123").await;
        assert!(matches!(
            autenticar(&store, "admin@escola.pt", "errada").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            autenticar(&store, "outro@escola.pt", "senha123").await,
            Err(AppError::InvalidCredentials)
        ));
    }
}
