//! # Timer Queue
//!
//! Conjunto de entradas pendentes ordenado por deadline crescente.
//!
//! ## Estrutura
//!
//! ```text
//! slots: [ S0 | S1 | S2 | S3 ]      arena de entradas (geração por slot)
//! free:  [ 2 ]                      slots livres para reuso
//! order: [ 3, 0, 1 ]                ids de slot, head = order[0]
//! ```
//!
//! - Inserção: varredura linear a partir da frente; a nova entrada fica DEPOIS
//!   de todas com deadline `<=` (FIFO estável entre deadlines iguais).
//! - Head em O(1); remoção por handle em O(n).
//! - Liberar um slot incrementa sua geração: handles velhos são detectados de
//!   forma determinística.
//!
//! ## Regras
//!
//! - Toda mutação acontece dentro da seção crítica do `AlarmDriver`.
//! - Os caminhos usados pelo handler de interrupção (`drain_due_into`,
//!   `remove`) nunca alocam: `free` tem capacidade reservada para todos os
//!   slots já na inserção, e `drain_due_into` para em `limit` entradas para
//!   que o chamador nunca passe da capacidade do próprio buffer.

use std::collections::VecDeque;

use super::clock::TimeSpec;
use super::timer::{ScheduleEntry, TimerHandle};
use crate::sys::SchedError;

/// Um slot do arena.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<ScheduleEntry>,
}

/// Resultado de `TimerQueue::insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub handle: TimerHandle,
    /// A entrada virou a head: o timer precisa ser rearmado.
    pub was_new_head: bool,
}

/// Fila de timers ordenada por deadline.
#[derive(Debug, Default)]
pub struct TimerQueue {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: VecDeque<u32>,
    next_seq: u64,
}

impl TimerQueue {
    /// Cria fila vazia (sem alocar)
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: VecDeque::new(),
            next_seq: 0,
        }
    }

    /// Cria fila com espaço para `capacity` entradas.
    pub fn with_capacity(capacity: usize) -> Result<Self, SchedError> {
        let mut queue = Self::new();
        queue.reserve(capacity)?;
        Ok(queue)
    }

    /// Garante espaço para mais `additional` entradas sem realocar.
    pub fn reserve(&mut self, additional: usize) -> Result<(), SchedError> {
        let alloc_err = |_| SchedError::AllocationFailure;
        self.order.try_reserve(additional).map_err(alloc_err)?;
        self.slots.try_reserve(additional).map_err(alloc_err)?;
        let wanted = self.slots.len() + additional;
        self.free
            .try_reserve(wanted.saturating_sub(self.free.len()))
            .map_err(alloc_err)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insere mantendo a ordem por deadline.
    ///
    /// Entradas com o mesmo deadline mantêm a ordem de inserção.
    pub fn insert(&mut self, mut entry: ScheduleEntry) -> Result<Insertion, SchedError> {
        // Reservar tudo ANTES de tocar na estrutura: falha não deixa slot órfão.
        self.order
            .try_reserve(1)
            .map_err(|_| SchedError::AllocationFailure)?;
        if self.free.is_empty() {
            self.slots
                .try_reserve(1)
                .map_err(|_| SchedError::AllocationFailure)?;
            let wanted = self.slots.len() + 1;
            self.free
                .try_reserve(wanted - self.free.len())
                .map_err(|_| SchedError::AllocationFailure)?;
        }

        entry.seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        // Primeira posição cujo deadline é estritamente maior
        let deadline = entry.deadline;
        let pos = self
            .order
            .iter()
            .position(|&id| self.deadline_of(id) > deadline)
            .unwrap_or(self.order.len());

        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[id as usize];
        slot.entry = Some(entry);
        let handle = TimerHandle::new(id, slot.generation);

        self.order.insert(pos, id);

        Ok(Insertion {
            handle,
            was_new_head: pos == 0,
        })
    }

    /// Remove e devolve, em ordem, todas as entradas com `deadline <= now`.
    pub fn drain_due(&mut self, now: TimeSpec) -> Vec<ScheduleEntry> {
        let mut due = Vec::new();
        self.drain_due_into(now, &mut due, usize::MAX);
        due
    }

    /// Como `drain_due`, mas acumula em `out` (reuso de buffer pelo handler)
    /// e drena no máximo `limit` entradas. As restantes continuam na fila,
    /// na mesma ordem.
    ///
    /// Retorna quantas entradas foram drenadas.
    pub fn drain_due_into(
        &mut self,
        now: TimeSpec,
        out: &mut Vec<ScheduleEntry>,
        limit: usize,
    ) -> usize {
        let mut drained = 0;
        while let Some(&id) = self.order.front() {
            if drained == limit || self.deadline_of(id) > now {
                break;
            }
            self.order.pop_front();
            if let Some(entry) = self.release(id) {
                out.push(entry);
                drained += 1;
            }
        }
        drained
    }

    /// Remove uma entrada específica pela identidade.
    ///
    /// Handle velho (já disparou ou já removido) → `None`, sem efeito.
    pub fn remove(&mut self, handle: TimerHandle) -> Option<ScheduleEntry> {
        if !self.contains(handle) {
            return None;
        }
        let pos = self.order.iter().position(|&id| id == handle.slot())?;
        self.order.remove(pos);
        self.release(handle.slot())
    }

    /// Deadline da head, se houver.
    pub fn peek_earliest_deadline(&self) -> Option<TimeSpec> {
        self.order.front().map(|&id| self.deadline_of(id))
    }

    /// Handle da head, se houver.
    pub fn head_handle(&self) -> Option<TimerHandle> {
        self.order
            .front()
            .map(|&id| TimerHandle::new(id, self.slots[id as usize].generation))
    }

    /// Verifica se o handle ainda aponta para uma entrada pendente.
    pub fn contains(&self, handle: TimerHandle) -> bool {
        match self.slots.get(handle.slot() as usize) {
            Some(slot) => slot.generation == handle.generation() && slot.entry.is_some(),
            None => false,
        }
    }

    /// Deadlines pendentes, da head para o fim.
    pub fn deadlines(&self) -> impl Iterator<Item = TimeSpec> + '_ {
        self.order.iter().map(|&id| self.deadline_of(id))
    }

    fn deadline_of(&self, id: u32) -> TimeSpec {
        self.slots[id as usize]
            .entry
            .as_ref()
            .map_or(TimeSpec::MAX, |e| e.deadline)
    }

    /// Libera o slot: devolve a entrada, muda a geração, recicla o id.
    fn release(&mut self, id: u32) -> Option<ScheduleEntry> {
        let slot = &mut self.slots[id as usize];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        // Capacidade já reservada na inserção: não aloca.
        self.free.push(id);
        Some(entry)
    }
}
