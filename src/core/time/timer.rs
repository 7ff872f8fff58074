//! Arquivo: core/time/timer.rs
//!
//! Propósito: A unidade de trabalho agendada (`ScheduleEntry`) e o handle
//! opaco devolvido ao chamador (`TimerHandle`).
//!
//! Detalhes de Implementação:
//! - O callback é um `FnOnce` em caixa: captura seu próprio contexto e é
//!   consumido no disparo, então roda no máximo uma vez.
//! - O handle é `(slot, geração)`. A geração do slot muda quando a entrada
//!   dispara ou é cancelada, então um handle velho nunca acerta outra entrada.

use super::clock::TimeSpec;

/// Callback executado em contexto de interrupção.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Handle opaco para uma entrada agendada. Usado apenas para `deschedule`.
///
/// Só a fila cria handles; código de fora não consegue forjar um:
///
/// ```compile_fail
/// let forged = tempo::TimerHandle::new(0, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: u32,
    generation: u32,
}

impl TimerHandle {
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub const fn slot(&self) -> u32 {
        self.slot
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Uma entrada pendente.
pub struct ScheduleEntry {
    /// Momento de disparo (absoluto, no relógio do driver)
    pub deadline: TimeSpec,
    /// Número de sequência de inserção (desempate e diagnóstico)
    pub seq: u64,
    callback: Callback,
}

impl ScheduleEntry {
    /// Cria uma nova entrada.
    pub fn new<F>(deadline: TimeSpec, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_boxed(deadline, Box::new(callback))
    }

    pub fn from_boxed(deadline: TimeSpec, callback: Callback) -> Self {
        Self {
            deadline,
            seq: 0,
            callback,
        }
    }

    /// Forma função + dados: `func(data)` no disparo.
    ///
    /// `data` é movido para a entrada e devolvido intacto à função; o
    /// agendador nunca o inspeciona.
    pub fn with_data<T>(deadline: TimeSpec, func: fn(T), data: T) -> Self
    where
        T: Send + 'static,
    {
        Self::new(deadline, move || func(data))
    }

    /// Verifica se a entrada venceu dado o tempo atual.
    pub fn is_due(&self, now: TimeSpec) -> bool {
        self.deadline <= now
    }

    /// Executa o callback, consumindo a entrada.
    pub fn fire(self) {
        (self.callback)();
    }
}

impl core::fmt::Debug for ScheduleEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScheduleEntry")
            .field("deadline", &self.deadline)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
