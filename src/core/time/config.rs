//! Constantes e configuração do agendador

/// Entradas reservadas na inicialização (fila de um agendador periódico é curta)
pub const DEFAULT_CAPACITY: usize = 16;

/// Menor intervalo que a plataforma Unix entrega ao `setitimer`.
///
/// `it_value == 0` desarma o ITIMER_REAL, então "disparar agora" vira 1 µs.
pub const MIN_ARM_INTERVAL_US: i64 = 1;

/// Relógio usado para deadlines e intervalos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockKind {
    /// CLOCK_MONOTONIC: imune a ajustes do relógio de parede
    #[default]
    Monotonic,
    /// CLOCK_REALTIME: deadlines absolutos em tempo Unix (como gettimeofday)
    Realtime,
}

/// O que `deschedule` faz quando remove a head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RearmPolicy {
    /// Não rearma. O timer pode disparar "cedo" para a head removida e não
    /// encontrar nada vencido; o handler então rearma para a nova head.
    #[default]
    Lazy,
    /// Rearma imediatamente para a nova head, ou desarma se a fila esvaziou.
    Eager,
}

/// Configuração de execução do agendador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub clock: ClockKind,
    pub rearm: RearmPolicy,
    /// Entradas reservadas na criação da fila
    pub initial_capacity: usize,
}

impl SchedulerConfig {
    pub const fn new() -> Self {
        Self {
            clock: ClockKind::Monotonic,
            rearm: RearmPolicy::Lazy,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }

    pub const fn with_clock(mut self, clock: ClockKind) -> Self {
        self.clock = clock;
        self
    }

    pub const fn with_rearm(mut self, rearm: RearmPolicy) -> Self {
        self.rearm = rearm;
        self
    }

    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}
