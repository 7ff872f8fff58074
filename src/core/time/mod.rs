//! Tempo e Timers
//!
//! - `clock`:  `TimeSpec`, o instante/intervalo com resolução de nanossegundo
//! - `timer`:  entrada agendada e handle opaco
//! - `queue`:  fila ordenada por deadline (FIFO em empates)
//! - `alarm`:  driver do timer one-shot + handler de interrupção
//! - `config`: relógio, política de rearme, capacidade

pub mod alarm;
pub mod clock;
pub mod config;
pub mod queue;
pub mod timer;

#[cfg(feature = "self_test")]
pub mod test;

pub use alarm::{AlarmDriver, TimerFlags};
pub use clock::TimeSpec;
pub use config::{ClockKind, RearmPolicy, SchedulerConfig};
pub use queue::{Insertion, TimerQueue};
pub use timer::{Callback, ScheduleEntry, TimerHandle};
