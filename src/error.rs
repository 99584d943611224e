// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro ao (de)serializar estado: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuração inválida: {0}")]
    Configuracao(String),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Dados inválidos: {0}")]
    Validacao(String),

    #[error("{entidade} '{id}' não encontrado")]
    NaoEncontrado { entidade: &'static str, id: String },

    #[error("Aula '{0}' não encontrada na ementa da turma")]
    AulaNaoEncontrada(String),

    #[error("{entidade} '{id}' já existe")]
    Duplicado { entidade: &'static str, id: String },

    #[error("{entidade} '{id}' ainda é referenciado: {motivo}")]
    EmUso {
        entidade: &'static str,
        id: String,
        motivo: String,
    },

    #[error("Turma '{0}' sem vagas disponíveis")]
    TurmaLotada(String),

    #[error("Interessado '{0}' já matriculado não pode ser alterado")]
    InteressadoImutavel(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autenticado")]
    Unauthorized,

    #[error("Sem permissão")]
    Forbidden,
}

impl AppError {
    pub fn nao_encontrado(entidade: &'static str, id: impl Into<String>) -> Self {
        AppError::NaoEncontrado { entidade, id: id.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validacao(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NaoEncontrado { .. } | AppError::AulaNaoEncontrada(_) => StatusCode::NOT_FOUND,
            AppError::Duplicado { .. }
            | AppError::EmUso { .. }
            | AppError::TurmaLotada(_)
            | AppError::InteressadoImutavel(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Erro processado: {:?}", self);
        } else {
            tracing::warn!("Pedido rejeitado: {}", self);
        }

        // Erros internos não expõem detalhes ao cliente
        let mensagem = match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => "Erro ao aceder aos dados.".to_string(),
            AppError::Configuracao(_) => "Erro de configuração.".to_string(),
            AppError::PasswordHashingError => "Erro ao processar credenciais.".to_string(),
            AppError::SessionError(_) => "Erro na gestão da sua sessão.".to_string(),
            AppError::SerdeError(_) | AppError::InternalServerError => "Ocorreu um erro inesperado.".to_string(),
            outro => outro.to_string(),
        };

        (status, Json(serde_json::json!({ "erro": mensagem }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
