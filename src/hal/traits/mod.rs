//! Traits do HAL
//!
//! Define as interfaces abstratas para o "hardware" do agendador: um relógio,
//! um timer one-shot e a máscara da interrupção desse timer.

pub mod clock;
pub mod irq;
pub mod timer;

pub use clock::*;
pub use irq::*;
pub use timer::*;

/// Plataforma completa consumida pelo `AlarmDriver`.
///
/// Implementada por `arch::unix::UnixPlatform` (SIGALRM real) e por
/// `hal::sim::SimPlatform` (tempo virtual, testes).
pub trait Platform: ClockHal + TimerHal + IrqHal + Send + Sync {}

impl<T> Platform for T where T: ClockHal + TimerHal + IrqHal + Send + Sync {}
