//! # Driver Layer
//!
//! Apenas o driver de console: sink dos macros de log, seguro em contexto de
//! interrupção (SIGALRM).
//!
//! O timer one-shot e a máscara de interrupção não moram aqui: são seams da
//! HAL (`hal::traits`) implementados por `arch::unix`.

pub mod console; // stderr via write(2) - Logs
