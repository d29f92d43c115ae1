// src/models/mod.rs

pub mod answers;
pub mod participant;
pub mod question;
pub mod response;
pub mod score;
pub mod submission;
