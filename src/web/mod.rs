// src/web/mod.rs
pub mod admin_handlers;
pub mod auth_handlers;
pub mod coordenacao_handlers;
pub mod crud;
pub mod diario_handlers;
pub mod mw_auth;
pub mod mw_role;
pub mod painel_handlers;
pub mod routes;
