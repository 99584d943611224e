// src/config.rs
use crate::error::{AppError, AppResult};
use std::{collections::HashMap, net::SocketAddr};

const BIND_ADDR_PADRAO: &str = "0.0.0.0:3000";
const ADMIN_EMAIL_PADRAO: &str = "admin@escola.local";
const HISTORY_LIMIT_PADRAO: usize = 20;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub history_limit: usize,
}

impl Settings {
    /// Lê as variáveis de ambiente (depois de `dotenvy::dotenv()`).
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> AppResult<Self> {
        let obter = |nome: &str| vars.get(nome).map(|v| v.trim()).filter(|v| !v.is_empty());

        let database_url = obter("DATABASE_URL")
            .ok_or_else(|| AppError::Configuracao("DATABASE_URL não definida".into()))?
            .to_string();
        let session_secret = obter("SESSION_SECRET")
            .ok_or_else(|| AppError::Configuracao("SESSION_SECRET não definida".into()))?
            .to_string();

        let bind_addr = obter("BIND_ADDR")
            .unwrap_or(BIND_ADDR_PADRAO)
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Configuracao(format!("BIND_ADDR inválido: {}", e)))?;

        let history_limit = match obter("HISTORY_LIMIT") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|e| AppError::Configuracao(format!("HISTORY_LIMIT inválido: {}", e)))?,
            None => HISTORY_LIMIT_PADRAO,
        };

        Ok(Settings {
            database_url,
            session_secret,
            bind_addr,
            admin_email: obter("ADMIN_EMAIL").unwrap_or(ADMIN_EMAIL_PADRAO).to_lowercase(),
            admin_password: obter("ADMIN_PASSWORD").map(str::to_string),
            history_limit,
        })
    }

    pub fn session_secret_is_short(&self) -> bool {
        self.session_secret.len() < 64
    }
}
