//! Trait de Timer One-Shot

use crate::core::time::TimeSpec;
use crate::sys::Errno;

/// Timer one-shot que gera uma interrupção ao expirar.
pub trait TimerHal {
    /// Arma o timer para expirar daqui a `interval`.
    ///
    /// Substitui qualquer armação anterior. `interval == 0` significa
    /// "na próxima oportunidade", NUNCA "desarmar".
    fn arm(&self, interval: TimeSpec) -> Result<(), Errno>;

    /// Desarma o timer. Idempotente.
    fn disarm(&self) -> Result<(), Errno>;
}
