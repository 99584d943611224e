// src/models/mod.rs
pub mod academico;
pub mod diario;
pub mod pessoa;
pub mod user;
