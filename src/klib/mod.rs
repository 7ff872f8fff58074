//! Biblioteca interna (KLib).
//!
//! Utilitários sem dependência de plataforma.

pub mod test_framework;
