//! Core Module
//!
//! Lógica central do agendador, independente de plataforma: logging, tempo,
//! fila de timers e o driver global.

pub mod logging;
pub mod scheduler;
pub mod time;
