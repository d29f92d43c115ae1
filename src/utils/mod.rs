// src/utils/mod.rs

pub mod admin_key;
