//! Backend Unix
//!
//! | Conceito HAL        | Realização POSIX                          |
//! |---------------------|-------------------------------------------|
//! | `ClockHal::now`     | `clock_gettime(CLOCK_MONOTONIC/REALTIME)` |
//! | `TimerHal::arm`     | `setitimer(ITIMER_REAL)` one-shot         |
//! | `IrqHal::mask`      | `pthread_sigmask(SIG_BLOCK, {SIGALRM})`   |
//! | interrupção         | handler de `SIGALRM` via `sigaction`      |

pub mod clock;
pub mod itimer;
pub mod signal;

use crate::core::time::{ClockKind, TimeSpec};
use crate::hal::traits::{ClockHal, IrqHal, TimerHal};
use crate::sys::Errno;

/// Plataforma real do processo.
///
/// Sem estado próprio além do relógio escolhido: o timer e a máscara são
/// recursos do processo/thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnixPlatform {
    clock: ClockKind,
}

impl UnixPlatform {
    pub const fn new(clock: ClockKind) -> Self {
        Self { clock }
    }

    pub const fn clock_kind(&self) -> ClockKind {
        self.clock
    }
}

impl ClockHal for UnixPlatform {
    fn now(&self) -> Result<TimeSpec, Errno> {
        clock::read(self.clock)
    }
}

impl TimerHal for UnixPlatform {
    fn arm(&self, interval: TimeSpec) -> Result<(), Errno> {
        itimer::arm(interval)
    }

    fn disarm(&self) -> Result<(), Errno> {
        itimer::disarm()
    }
}

impl IrqHal for UnixPlatform {
    fn mask(&self) -> Result<bool, Errno> {
        signal::block_alarm()
    }

    fn unmask(&self) -> Result<(), Errno> {
        signal::unblock_alarm()
    }

    fn is_masked(&self) -> bool {
        signal::alarm_blocked()
    }
}
