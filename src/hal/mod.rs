//! Hardware Abstraction Layer (HAL)
//!
//! Abstração das três peças de "hardware" do agendador para que o núcleo
//! (`core::time`) não saiba em qual plataforma está rodando.
//!
//! # Plataformas
//! - unix: `setitimer(ITIMER_REAL)` + SIGALRM (`arch::unix`)
//! - sim:  tempo virtual determinístico, sem sinais (`hal::sim`)

pub mod sim;
pub mod traits;

pub use traits::*;
