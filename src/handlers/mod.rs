// src/handlers/mod.rs

pub mod admin;
pub mod health;
pub mod predictions;
pub mod quiz;
pub mod scores;
