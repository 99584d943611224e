// src/services/mod.rs
pub mod auth_service;
pub mod cadastro_service;
pub mod diario_service;
pub mod matricula_service;
pub mod painel_service;
pub mod persistence_service;
pub mod user_service;
