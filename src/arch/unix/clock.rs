//! Leitura de relógio via `clock_gettime`.

use crate::core::time::{ClockKind, TimeSpec};
use crate::sys::Errno;

const fn clock_id(kind: ClockKind) -> libc::clockid_t {
    match kind {
        ClockKind::Monotonic => libc::CLOCK_MONOTONIC,
        ClockKind::Realtime => libc::CLOCK_REALTIME,
    }
}

/// Lê o relógio `kind`. Async-signal-safe.
pub fn read(kind: ClockKind) -> Result<TimeSpec, Errno> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` é um timespec válido e exclusivo
    let rc = unsafe { libc::clock_gettime(clock_id(kind), &mut ts) };
    if rc != 0 {
        return Err(Errno::last());
    }
    Ok(TimeSpec::from(ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_never_goes_backwards() {
        let a = read(ClockKind::Monotonic).unwrap();
        let b = read(ClockKind::Monotonic).unwrap();
        assert!(b >= a);
    }

    #[test]
    fn realtime_is_after_2020() {
        // 2020-01-01T00:00:00Z
        let now = read(ClockKind::Realtime).unwrap();
        assert!(now.seconds > 1_577_836_800);
    }
}
