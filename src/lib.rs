//! Tempo: agendador de alarmes one-shot dirigido por interrupção.
//!
//! Ponto central de exportação dos módulos. Define a estrutura hierárquica:
//!
//! ```text
//! core::scheduler  API global (init_scheduler / schedule / aschedule / deschedule)
//! core::time       TimeSpec, TimerQueue, AlarmDriver
//! hal              traits de plataforma + plataforma simulada
//! arch             backend Unix (SIGALRM, setitimer, clock_gettime)
//! sync             IrqSpinlock (seção crítica com máscara de sinal)
//! drivers          console de log async-signal-safe
//! sys              Errno e SchedError
//! ```

// --- Plataforma ---
pub mod arch; // Backend Unix (sinais, timer, relógio)
pub mod drivers; // Console de log (stderr)
pub mod hal; // Traits de plataforma + simulação

// --- Núcleo ---
pub mod core; // Logging, tempo, agendador global
pub mod klib; // Framework de auto-teste
pub mod sync; // IrqSpinlock
pub mod sys; // Errno, SchedError

pub use crate::core::scheduler::{
    aschedule, aschedule_with, deschedule, init_scheduler, init_scheduler_with, is_initialized,
    now, pending, schedule, schedule_with,
};
pub use crate::core::time::{ClockKind, RearmPolicy, SchedulerConfig, TimeSpec, TimerHandle};
pub use crate::sys::{Errno, SchedError};
