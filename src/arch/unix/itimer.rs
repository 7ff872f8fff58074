//! Timer one-shot `ITIMER_REAL`.
//!
//! `it_interval` é sempre zero: o driver rearma explicitamente a cada disparo.
//! Resolução de microssegundo; intervalos são arredondados PARA CIMA, então o
//! sinal nunca chega antes do deadline.

use crate::core::time::config::MIN_ARM_INTERVAL_US;
use crate::core::time::TimeSpec;
use crate::sys::Errno;

const MICROS_PER_SEC: i64 = 1_000_000;

/// Converte um intervalo para `timeval`, com teto no microssegundo e piso em
/// `MIN_ARM_INTERVAL_US` (valor zero desarmaria o timer).
fn to_timeval(interval: TimeSpec) -> libc::timeval {
    if interval.is_negative() || interval == TimeSpec::ZERO {
        return libc::timeval {
            tv_sec: 0,
            tv_usec: MIN_ARM_INTERVAL_US as libc::suseconds_t,
        };
    }

    let mut secs = interval.seconds;
    let mut micros = (i64::from(interval.nanos) + 999) / 1_000;
    if micros >= MICROS_PER_SEC {
        secs = secs.saturating_add(1);
        micros -= MICROS_PER_SEC;
    }

    libc::timeval {
        tv_sec: secs as libc::time_t,
        tv_usec: micros as libc::suseconds_t,
    }
}

fn set(value: libc::timeval) -> Result<(), Errno> {
    let timer = libc::itimerval {
        it_interval: libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
        it_value: value,
    };
    // SAFETY: `timer` é válido; o valor antigo não é pedido
    let rc = unsafe { libc::setitimer(libc::ITIMER_REAL, &timer, core::ptr::null_mut()) };
    if rc != 0 {
        return Err(Errno::last());
    }
    Ok(())
}

/// Arma o one-shot para daqui a `interval`. Zero/negativo: próxima oportunidade.
pub fn arm(interval: TimeSpec) -> Result<(), Errno> {
    set(to_timeval(interval))
}

/// Desarma o one-shot.
pub fn disarm() -> Result<(), Errno> {
    set(libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_become_minimum_interval() {
        for interval in [TimeSpec::ZERO, TimeSpec::from_secs(-3)] {
            let tv = to_timeval(interval);
            assert_eq!(tv.tv_sec, 0);
            assert_eq!(tv.tv_usec as i64, MIN_ARM_INTERVAL_US);
        }
    }

    #[test]
    fn nanoseconds_round_up_to_next_microsecond() {
        let tv = to_timeval(TimeSpec::new(2, 1));
        assert_eq!((tv.tv_sec as i64, tv.tv_usec as i64), (2, 1));

        let tv = to_timeval(TimeSpec::new(2, 999_999_001));
        assert_eq!((tv.tv_sec as i64, tv.tv_usec as i64), (3, 0));
    }

    #[test]
    fn whole_microseconds_are_exact() {
        let tv = to_timeval(TimeSpec::from_micros(1_500_250));
        assert_eq!((tv.tv_sec as i64, tv.tv_usec as i64), (1, 500_250));
    }
}
