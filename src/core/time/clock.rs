//! Arquivo: core/time/clock.rs
//!
//! Propósito: Representação de tempo do agendador.
//! Um `TimeSpec` serve tanto como instante absoluto (deadline) quanto como
//! intervalo relativo, que pode ser negativo (`schedule(-1s)` dispara na
//! próxima oportunidade).
//!
//! Detalhes de Implementação:
//! - Segundos com sinal + nanosegundos normalizados em `0..1_000_000_000`.
//! - Ordem total lexicográfica `(seconds, nanos)`.
//! - Aritmética saturante: um deadline nunca "dá a volta".

use core::time::Duration;

use crate::drivers::console::{emit_dec, emit_dec_padded, emit_str, LogValue};

pub const NANOS_PER_SEC: u32 = 1_000_000_000;
pub const NANOS_PER_MICRO: u32 = 1_000;

/// Segundos e nanosegundos. Instante ou intervalo, com sinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpec {
    pub seconds: i64,
    pub nanos: u32,
}

impl TimeSpec {
    pub const ZERO: TimeSpec = TimeSpec {
        seconds: 0,
        nanos: 0,
    };
    pub const MAX: TimeSpec = TimeSpec {
        seconds: i64::MAX,
        nanos: NANOS_PER_SEC - 1,
    };
    pub const MIN: TimeSpec = TimeSpec {
        seconds: i64::MIN,
        nanos: 0,
    };

    /// Cria um `TimeSpec`, normalizando `nanos` excedentes para segundos.
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        let carry = (nanos / NANOS_PER_SEC) as i64;
        Self {
            seconds: seconds.saturating_add(carry),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    pub const fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Milissegundos com sinal (`-1500` = 1.5s no passado).
    pub const fn from_millis(millis: i64) -> Self {
        Self::from_nanos_i128(millis as i128 * 1_000_000)
    }

    pub const fn from_micros(micros: i64) -> Self {
        Self::from_nanos_i128(micros as i128 * 1_000)
    }

    const fn from_nanos_i128(total: i128) -> Self {
        let secs = total.div_euclid(NANOS_PER_SEC as i128);
        let nanos = total.rem_euclid(NANOS_PER_SEC as i128) as u32;
        if secs > i64::MAX as i128 {
            Self::MAX
        } else if secs < i64::MIN as i128 {
            Self::MIN
        } else {
            Self {
                seconds: secs as i64,
                nanos,
            }
        }
    }

    fn as_nanos_i128(self) -> i128 {
        self.seconds as i128 * NANOS_PER_SEC as i128 + self.nanos as i128
    }

    pub fn is_negative(self) -> bool {
        self.seconds < 0
    }

    /// Soma saturante (deadline = agora + atraso).
    pub fn saturating_add(self, rhs: TimeSpec) -> TimeSpec {
        Self::from_nanos_i128(self.as_nanos_i128() + rhs.as_nanos_i128())
    }

    /// Subtração com sinal, saturante.
    pub fn saturating_sub(self, rhs: TimeSpec) -> TimeSpec {
        Self::from_nanos_i128(self.as_nanos_i128() - rhs.as_nanos_i128())
    }

    /// Intervalo de `self` (agora) até `deadline`, limitado a zero se o
    /// deadline já passou.
    pub fn interval_until(self, deadline: TimeSpec) -> TimeSpec {
        let delta = deadline.saturating_sub(self);
        if delta.is_negative() {
            TimeSpec::ZERO
        } else {
            delta
        }
    }

    /// Converte para `Duration`; intervalos negativos viram zero.
    pub fn to_duration(self) -> Duration {
        if self.is_negative() {
            Duration::ZERO
        } else {
            Duration::new(self.seconds as u64, self.nanos)
        }
    }

    /// Microssegundos da fração (para `timeval`).
    pub fn subsec_micros(self) -> u32 {
        self.nanos / NANOS_PER_MICRO
    }
}

impl From<Duration> for TimeSpec {
    fn from(d: Duration) -> Self {
        let secs = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
        TimeSpec {
            seconds: secs,
            nanos: d.subsec_nanos(),
        }
    }
}

impl From<libc::timespec> for TimeSpec {
    fn from(ts: libc::timespec) -> Self {
        let nanos = ts.tv_nsec.clamp(0, NANOS_PER_SEC as libc::c_long - 1) as u32;
        TimeSpec {
            seconds: ts.tv_sec as i64,
            nanos,
        }
    }
}

/// Emite `segundos.micros` (ex: `5.000250`, `-1.500000`).
impl LogValue for TimeSpec {
    fn emit_value(&self) {
        if self.is_negative() && self.nanos != 0 {
            // -1s + 0.5s = -0.5s
            let positive = TimeSpec::ZERO.saturating_sub(*self);
            emit_str("-");
            emit_dec(positive.seconds);
            emit_str(".");
            emit_dec_padded(positive.subsec_micros() as u64, 6);
        } else {
            emit_dec(self.seconds);
            emit_str(".");
            emit_dec_padded(self.subsec_micros() as u64, 6);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_excess_nanos() {
        let t = TimeSpec::new(1, 2_500_000_000);
        assert_eq!(t, TimeSpec::new(3, 500_000_000));
        assert_eq!(t.nanos, 500_000_000);
    }

    #[test]
    fn negative_millis_borrow_from_seconds() {
        let t = TimeSpec::from_millis(-1500);
        assert_eq!(t.seconds, -2);
        assert_eq!(t.nanos, 500_000_000);
        assert!(t.is_negative());
    }

    #[test]
    fn add_and_sub_carry_across_second_boundary() {
        let now = TimeSpec::new(10, 900_000_000);
        let deadline = now.saturating_add(TimeSpec::from_millis(200));
        assert_eq!(deadline, TimeSpec::new(11, 100_000_000));
        assert_eq!(deadline.saturating_sub(now), TimeSpec::from_millis(200));
    }

    #[test]
    fn interval_until_clamps_past_deadlines_to_zero() {
        let now = TimeSpec::from_secs(100);
        assert_eq!(now.interval_until(TimeSpec::from_secs(99)), TimeSpec::ZERO);
        assert_eq!(now.interval_until(now), TimeSpec::ZERO);
        assert_eq!(
            now.interval_until(TimeSpec::new(102, 5)),
            TimeSpec::new(2, 5)
        );
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let t = TimeSpec::MAX.saturating_add(TimeSpec::from_secs(1));
        assert_eq!(t, TimeSpec::MAX);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(TimeSpec::new(1, 999_999_999) < TimeSpec::new(2, 0));
        assert!(TimeSpec::from_millis(-1) < TimeSpec::ZERO);
    }

    #[test]
    fn duration_round_trip_drops_negative() {
        let d = Duration::from_millis(2_750);
        assert_eq!(TimeSpec::from(d).to_duration(), d);
        assert_eq!(TimeSpec::from_secs(-3).to_duration(), Duration::ZERO);
    }
}
