//! Trait de Relógio

use crate::core::time::TimeSpec;
use crate::sys::Errno;

/// Fonte de tempo do agendador.
///
/// O driver usa UM relógio para tudo (deadline, intervalo de rearme);
/// misturar relógios faria o deadline derivar.
pub trait ClockHal {
    /// Lê o tempo atual.
    fn now(&self) -> Result<TimeSpec, Errno>;
}
