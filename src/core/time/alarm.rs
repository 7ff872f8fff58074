//! # Alarm Driver
//!
//! Ponte entre a `TimerQueue` e o timer one-shot da plataforma.
//!
//! ## Invariante
//!
//! O timer está armado para disparar NO MÁXIMO no deadline da head, ou está
//! desarmado se a fila está vazia. (Com `RearmPolicy::Lazy` o timer pode
//! ficar armado para uma head já cancelada: o disparo é espúrio e só rearma.)
//!
//! ## Fluxo
//!
//! ```text
//! schedule ──► now ──► [mask → lock] insert ─┬─ nova head? arm(deadline - now)
//!                                            └─ [unlock → unmask]
//!
//! SIGALRM ──► handler ──► lock disparo ──► now
//!                 ┌► [lock fila] drain_due(now, cabe no buffer) [unlock]
//!                 │  callbacks em ordem (podem chamar schedule)
//!                 └─ buffer encheu? drena de novo
//!                 now' ──► [lock fila] head? arm(head - now') : disarm [unlock]
//! ```
//!
//! ## Falhas
//!
//! Relógio, máscara, arm e alocação: reportados ao chamador e logados, nunca
//! fatais, nunca repetidos automaticamente. O handler não tem chamador: loga
//! e abandona.

use core::sync::atomic::{AtomicU32, Ordering};

use bitflags::bitflags;

use super::clock::TimeSpec;
use super::config::{RearmPolicy, SchedulerConfig};
use super::queue::{Insertion, TimerQueue};
use super::timer::{ScheduleEntry, TimerHandle};
use crate::hal::traits::Platform;
use crate::sync::IrqSpinlock;
use crate::sys::{Errno, SchedError};

bitflags! {
    /// Estado observável do timer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TimerFlags: u32 {
        /// O one-shot está armado.
        const ARMED  = 1 << 0;
        /// Um handler está drenando a fila / rodando callbacks.
        const FIRING = 1 << 1;
    }
}

/// Dono do timer one-shot e da fila de entradas.
pub struct AlarmDriver<P: Platform> {
    platform: P,
    config: SchedulerConfig,
    queue: IrqSpinlock<TimerQueue>,
    /// Serializa instâncias do handler e guarda o buffer de entradas vencidas.
    /// Só o handler adquire este lock, e o segura enquanto roda callbacks.
    /// A capacidade é fixada em `new`: o handler nunca a faz crescer.
    firing: IrqSpinlock<Vec<ScheduleEntry>>,
    flags: AtomicU32,
}

impl<P: Platform> AlarmDriver<P> {
    /// Cria o driver com a fila já reservada para `config.initial_capacity`.
    pub fn new(platform: P, config: SchedulerConfig) -> Result<Self, SchedError> {
        let queue = TimerQueue::with_capacity(config.initial_capacity)?;
        let mut due = Vec::new();
        // Pelo menos uma entrada por lote, senão o handler não progride
        due.try_reserve(config.initial_capacity.max(1))
            .map_err(|_| SchedError::AllocationFailure)?;

        Ok(Self {
            platform,
            config,
            queue: IrqSpinlock::new(queue),
            firing: IrqSpinlock::new(due),
            flags: AtomicU32::new(TimerFlags::empty().bits()),
        })
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Lê o relógio do driver (o mesmo usado para todos os deadlines).
    pub fn now(&self) -> Result<TimeSpec, SchedError> {
        self.platform.now().map_err(|errno| {
            crate::kerror!("(Alarm) Falha ao ler o relógio: ", errno);
            SchedError::ClockReadFailure(errno)
        })
    }

    // =========================================================================
    // API DE AGENDAMENTO
    // =========================================================================

    /// Agenda `callback` para daqui a `delay`.
    ///
    /// Atraso zero ou negativo dispara na próxima oportunidade.
    ///
    /// Em `Err(TimerArmFailure { handle, .. })` a entrada CONTINUA na fila;
    /// qualquer outro erro significa que nada foi agendado. Ignorar o erro
    /// pode perder a unidade de trabalho: o driver não tenta de novo.
    pub fn schedule<D, F>(&self, delay: D, callback: F) -> Result<TimerHandle, SchedError>
    where
        D: Into<TimeSpec>,
        F: FnOnce() + Send + 'static,
    {
        let now = self.now()?;
        let deadline = now.saturating_add(delay.into());
        self.enqueue(now, deadline, move |deadline| {
            ScheduleEntry::new(deadline, callback)
        })
    }

    /// Agenda `callback` para o instante absoluto `deadline` (no relógio do
    /// driver). Deadline no passado dispara na próxima oportunidade.
    pub fn aschedule<F>(&self, deadline: TimeSpec, callback: F) -> Result<TimerHandle, SchedError>
    where
        F: FnOnce() + Send + 'static,
    {
        let now = self.now()?;
        self.enqueue(now, deadline, move |deadline| {
            ScheduleEntry::new(deadline, callback)
        })
    }

    /// Forma função + dados de `schedule`: `func(data)` no disparo.
    pub fn schedule_with<D, T>(
        &self,
        delay: D,
        func: Option<fn(T)>,
        data: T,
    ) -> Result<TimerHandle, SchedError>
    where
        D: Into<TimeSpec>,
        T: Send + 'static,
    {
        let func = func.ok_or_else(|| {
            crate::kerror!("(Alarm) schedule: callback ausente");
            SchedError::InvalidCallback
        })?;
        let now = self.now()?;
        let deadline = now.saturating_add(delay.into());
        self.enqueue(now, deadline, move |deadline| {
            ScheduleEntry::with_data(deadline, func, data)
        })
    }

    /// Forma função + dados de `aschedule`.
    pub fn aschedule_with<T>(
        &self,
        deadline: TimeSpec,
        func: Option<fn(T)>,
        data: T,
    ) -> Result<TimerHandle, SchedError>
    where
        T: Send + 'static,
    {
        let func = func.ok_or_else(|| {
            crate::kerror!("(Alarm) aschedule: callback ausente");
            SchedError::InvalidCallback
        })?;
        let now = self.now()?;
        self.enqueue(now, deadline, move |deadline| {
            ScheduleEntry::with_data(deadline, func, data)
        })
    }

    /// Retira uma entrada antes do disparo.
    ///
    /// Retorna `true` se a entrada estava pendente. Handle velho (já disparou
    /// ou já cancelado) é no-op. Com `RearmPolicy::Eager`, remover a head
    /// rearma para a nova head (ou desarma); com `Lazy` o timer fica como está.
    pub fn deschedule(&self, handle: TimerHandle) -> bool {
        let removed = {
            let mut queue = match self.queue.lock(&self.platform) {
                Ok(queue) => queue,
                Err(errno) => {
                    crate::kerror!("(Alarm) deschedule: falha ao mascarar interrupção: ", errno);
                    return false;
                }
            };

            let was_head = queue.head_handle() == Some(handle);
            let removed = queue.remove(handle);

            if removed.is_some() && was_head && self.config.rearm == RearmPolicy::Eager {
                match self.platform.now() {
                    Ok(now) => {
                        if let Err(errno) = self.rearm_locked(&queue, now) {
                            crate::kerror!("(Alarm) deschedule: falha ao rearmar: ", errno);
                        }
                    }
                    Err(errno) => {
                        crate::kerror!("(Alarm) deschedule: falha ao ler relógio: ", errno);
                    }
                }
            }
            removed
        };

        // A entrada (e o que o callback capturou) é liberada fora da seção crítica
        match removed {
            Some(entry) => {
                crate::kinfo!("(Alarm) Entrada cancelada, seq=", entry.seq);
                true
            }
            None => {
                crate::ktrace!("(Alarm) deschedule: handle velho, slot=", handle.slot());
                false
            }
        }
    }

    // =========================================================================
    // HANDLER DE INTERRUPÇÃO
    // =========================================================================

    /// Handler do timer. Chamado pela entrada de interrupção da plataforma.
    ///
    /// Drena tudo que venceu até `now`, roda os callbacks em ordem de deadline
    /// FORA do lock da fila (podem chamar `schedule`/`deschedule`), e rearma
    /// para a nova head ou desarma.
    pub fn handle_timer_interrupt(&self) {
        // 1. Exclusão entre instâncias do handler
        let mut due = match self.firing.lock(&self.platform) {
            Ok(due) => due,
            Err(errno) => {
                crate::kerror!("(Alarm) handler: falha ao mascarar interrupção: ", errno);
                return;
            }
        };
        // O one-shot que nos trouxe aqui já expirou
        self.flags.fetch_and(!TimerFlags::ARMED.bits(), Ordering::AcqRel);
        self.flags.fetch_or(TimerFlags::FIRING.bits(), Ordering::AcqRel);

        // 2. Timekeeping
        let now = match self.platform.now() {
            Ok(now) => now,
            Err(errno) => {
                // Sem relógio não há como decidir o que venceu. Timer fica como
                // está; um próximo schedule rearma.
                crate::kerror!("(Alarm) handler: falha ao ler relógio, abandonando: ", errno);
                self.flags.fetch_and(!TimerFlags::FIRING.bits(), Ordering::AcqRel);
                return;
            }
        };

        // 3. Drenar em lotes que cabem no buffer, 4. executar em ordem de deadline
        let batch = due.capacity();
        let mut total = 0;
        loop {
            let drained = match self.queue.lock(&self.platform) {
                Ok(mut queue) => queue.drain_due_into(now, &mut due, batch),
                Err(errno) => {
                    crate::kerror!("(Alarm) handler: falha ao mascarar interrupção: ", errno);
                    self.flags.fetch_and(!TimerFlags::FIRING.bits(), Ordering::AcqRel);
                    return;
                }
            };
            total += drained;

            for entry in due.drain(..) {
                crate::kinfo!("(Alarm) Executando entrada seq=", entry.seq);
                entry.fire();
            }

            // Lote incompleto: nada mais venceu até `now`
            if drained < batch {
                break;
            }
        }
        crate::kdebug!("(Alarm) Disparo: entradas vencidas=", total);

        // 5. Rearmar para a nova head, com o relógio relido depois dos callbacks
        let now = match self.platform.now() {
            Ok(after) => after,
            Err(errno) => {
                crate::kwarn!("(Alarm) handler: relógio indisponível no rearme, usando leitura anterior: ", errno);
                now
            }
        };
        match self.queue.lock(&self.platform) {
            Ok(queue) => {
                if let Err(errno) = self.rearm_locked(&queue, now) {
                    crate::kerror!("(Alarm) handler: falha ao rearmar, abandonando: ", errno);
                }
            }
            Err(errno) => {
                crate::kerror!("(Alarm) handler: falha ao mascarar interrupção: ", errno);
            }
        }

        self.flags.fetch_and(!TimerFlags::FIRING.bits(), Ordering::AcqRel);
    }

    // =========================================================================
    // INTROSPECÇÃO
    // =========================================================================

    /// Número de entradas pendentes.
    pub fn pending(&self) -> Result<usize, SchedError> {
        let queue = self
            .queue
            .lock(&self.platform)
            .map_err(SchedError::IrqMaskFailure)?;
        Ok(queue.len())
    }

    /// Deadline da head, se houver.
    pub fn next_deadline(&self) -> Result<Option<TimeSpec>, SchedError> {
        let queue = self
            .queue
            .lock(&self.platform)
            .map_err(SchedError::IrqMaskFailure)?;
        Ok(queue.peek_earliest_deadline())
    }

    /// Verifica se o handle ainda aponta para uma entrada pendente.
    pub fn is_pending(&self, handle: TimerHandle) -> Result<bool, SchedError> {
        let queue = self
            .queue
            .lock(&self.platform)
            .map_err(SchedError::IrqMaskFailure)?;
        Ok(queue.contains(handle))
    }

    pub fn flags(&self) -> TimerFlags {
        TimerFlags::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    pub fn is_armed(&self) -> bool {
        self.flags().contains(TimerFlags::ARMED)
    }

    // =========================================================================
    // INTERNOS
    // =========================================================================

    /// Insere dentro da seção crítica e arma se preciso.
    ///
    /// A caixa do callback é construída por `make` JÁ com a interrupção
    /// mascarada: o handler nunca preempta esta thread dentro do alocador.
    fn enqueue<M>(&self, now: TimeSpec, deadline: TimeSpec, make: M) -> Result<TimerHandle, SchedError>
    where
        M: FnOnce(TimeSpec) -> ScheduleEntry,
    {
        let mut queue = self.queue.lock(&self.platform).map_err(|errno| {
            crate::kerror!("(Alarm) schedule: falha ao mascarar interrupção: ", errno);
            SchedError::IrqMaskFailure(errno)
        })?;

        let Insertion {
            handle,
            was_new_head,
        } = queue.insert(make(deadline)).map_err(|err| {
            crate::kerror!("(Alarm) schedule: falha de alocação, pendentes=", queue.len());
            err
        })?;

        crate::kinfo!("(Alarm) Agendado para t=", deadline);

        // Nova head, ou o timer ficou desarmado por uma falha anterior
        if was_new_head || !self.is_armed() {
            if let Err(errno) = self.rearm_locked(&queue, now) {
                crate::kerror!("(Alarm) schedule: falha ao armar timer: ", errno);
                return Err(SchedError::TimerArmFailure { handle, errno });
            }
        }

        Ok(handle)
    }

    /// Arma para `head - now` (limitado a zero) ou desarma se vazia.
    ///
    /// Deve ser chamado com o lock da fila adquirido.
    fn rearm_locked(&self, queue: &TimerQueue, now: TimeSpec) -> Result<(), Errno> {
        match queue.peek_earliest_deadline() {
            Some(head) => {
                let interval = now.interval_until(head);
                self.platform.arm(interval)?;
                self.flags.fetch_or(TimerFlags::ARMED.bits(), Ordering::AcqRel);
                crate::kinfo!("(Alarm) Timer armado, intervalo=", interval);
            }
            None => {
                self.platform.disarm()?;
                self.flags.fetch_and(!TimerFlags::ARMED.bits(), Ordering::AcqRel);
                crate::ktrace!("(Alarm) Fila vazia, timer desarmado");
            }
        }
        Ok(())
    }
}
