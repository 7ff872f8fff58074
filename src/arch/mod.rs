//! # Platform Layer
//!
//! Ponte entre o agendador (lógica agnóstica) e o sistema operacional.
//! Toda interação com sinais, máscaras e relógios do kernel passa por aqui.
//!
//! ## Propósito
//! - **Isolamento:** `core::time` só conhece as traits de `hal::traits`.
//! - **Seleção de Plataforma:** `cfg` compila apenas o backend do alvo.
//!
//! ## Backends
//! - `unix`: `SIGALRM` + `setitimer(ITIMER_REAL)` + `clock_gettime`.
//! - (testes) `hal::sim`: tempo virtual, sem sinais.

#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use unix as platform;

#[cfg(unix)]
pub use platform::UnixPlatform;
