//! # Synchronization Primitives
//!
//! Primitivas de sincronização entre o fluxo normal e o handler de
//! interrupção do timer.
//!
//! ## Regras
//!
//! - **IrqSpinlock**: Única forma de tocar na fila de timers. Mascara a
//!   interrupção antes de girar, restaura ao soltar.
//! - **Nunca** segurar o lock da fila enquanto roda um callback do usuário.
//!   Exceção: o lock de disparo do `AlarmDriver`, que só o handler adquire e
//!   que serializa instâncias do handler durante os callbacks.
//! - **Ordem de Lock**: lock de disparo do handler ANTES do lock da fila.

/// Spinlock com máscara de interrupção (busy-wait, não dorme)
pub mod spinlock;

pub use spinlock::{IrqSpinlock, IrqSpinlockGuard};
