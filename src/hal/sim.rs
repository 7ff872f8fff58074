//! Plataforma Simulada
//!
//! Relógio virtual monotônico + timer one-shot que apenas REGISTRA o que foi
//! pedido. Nada de sinais: a "interrupção" é entregue por `run_for`, que
//! avança o tempo até cada expiração e chama o handler do driver.
//!
//! Usada pelos testes unitários e pelo auto-teste (`self_test`).
//!
//! # Injeção de falhas
//! - `fail_clock_reads(n)`: as próximas `n` leituras do relógio falham
//! - `fail_arms(true)`:     todo `arm` falha com EIO
//! - `fail_masks(true)`:    todo `mask` falha com EINVAL

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use spin::Mutex;

use crate::core::time::{AlarmDriver, TimeSpec};
use crate::hal::traits::{ClockHal, IrqHal, TimerHal};
use crate::sys::Errno;

/// Limite de interrupções por `run_for` (proteção contra rearme em zero infinito)
const MAX_INTERRUPTS_PER_RUN: usize = 10_000;

#[derive(Debug, Default)]
struct SimState {
    now: TimeSpec,
    /// Instante absoluto em que o timer expira, se armado
    expires_at: Option<TimeSpec>,
    /// Intervalos pedidos a cada `arm`, em ordem
    arm_log: Vec<TimeSpec>,
    disarms: usize,
    interrupts: usize,
}

/// Plataforma de tempo virtual.
#[derive(Debug, Default)]
pub struct SimPlatform {
    state: Mutex<SimState>,
    masked: AtomicBool,
    failing_clock_reads: AtomicU32,
    failing_arms: AtomicBool,
    failing_masks: AtomicBool,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plataforma cujo relógio começa em `start`.
    pub fn starting_at(start: TimeSpec) -> Self {
        let sim = Self::new();
        sim.state.lock().now = start;
        sim
    }

    /// Tempo virtual atual (não sujeito à injeção de falhas).
    pub fn current_time(&self) -> TimeSpec {
        self.state.lock().now
    }

    /// Avança o relógio SEM entregar interrupções.
    pub fn advance(&self, delta: TimeSpec) {
        let mut state = self.state.lock();
        state.now = state.now.saturating_add(delta);
    }

    /// Instante absoluto da próxima expiração, se armado.
    pub fn expires_at(&self) -> Option<TimeSpec> {
        self.state.lock().expires_at
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().expires_at.is_some()
    }

    /// Intervalo pedido no `arm` mais recente.
    pub fn last_arm(&self) -> Option<TimeSpec> {
        self.state.lock().arm_log.last().copied()
    }

    /// Todos os intervalos pedidos, em ordem.
    pub fn arm_log(&self) -> Vec<TimeSpec> {
        self.state.lock().arm_log.clone()
    }

    pub fn arm_count(&self) -> usize {
        self.state.lock().arm_log.len()
    }

    pub fn disarm_count(&self) -> usize {
        self.state.lock().disarms
    }

    /// Interrupções entregues por `run_for`.
    pub fn interrupt_count(&self) -> usize {
        self.state.lock().interrupts
    }

    pub fn fail_clock_reads(&self, count: u32) {
        self.failing_clock_reads.store(count, Ordering::SeqCst);
    }

    pub fn fail_arms(&self, fail: bool) {
        self.failing_arms.store(fail, Ordering::SeqCst);
    }

    pub fn fail_masks(&self, fail: bool) {
        self.failing_masks.store(fail, Ordering::SeqCst);
    }

    /// Se o timer expira até `limit`, move o relógio para a expiração,
    /// consome o one-shot e retorna `true`.
    fn take_expiry_before(&self, limit: TimeSpec) -> bool {
        let mut state = self.state.lock();
        match state.expires_at {
            Some(at) if at <= limit => {
                if at > state.now {
                    state.now = at;
                }
                state.expires_at = None;
                state.interrupts += 1;
                true
            }
            _ => false,
        }
    }
}

impl ClockHal for SimPlatform {
    fn now(&self) -> Result<TimeSpec, Errno> {
        let pending = self.failing_clock_reads.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_clock_reads.store(pending - 1, Ordering::SeqCst);
            return Err(Errno::EINVAL);
        }
        Ok(self.state.lock().now)
    }
}

impl TimerHal for SimPlatform {
    fn arm(&self, interval: TimeSpec) -> Result<(), Errno> {
        if self.failing_arms.load(Ordering::SeqCst) {
            return Err(Errno::EIO);
        }
        let mut state = self.state.lock();
        state.arm_log.push(interval);
        state.expires_at = Some(state.now.saturating_add(interval));
        Ok(())
    }

    fn disarm(&self) -> Result<(), Errno> {
        let mut state = self.state.lock();
        state.expires_at = None;
        state.disarms += 1;
        Ok(())
    }
}

impl IrqHal for SimPlatform {
    fn mask(&self) -> Result<bool, Errno> {
        if self.failing_masks.load(Ordering::SeqCst) {
            return Err(Errno::EINVAL);
        }
        Ok(self.masked.swap(true, Ordering::SeqCst))
    }

    fn unmask(&self) -> Result<(), Errno> {
        self.masked.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_masked(&self) -> bool {
        self.masked.load(Ordering::SeqCst)
    }
}

/// Avança o tempo virtual em `delta`, entregando cada expiração do timer ao
/// handler do driver no instante exato em que ela ocorre.
///
/// Retorna o número de interrupções entregues.
pub fn run_for(driver: &AlarmDriver<SimPlatform>, delta: TimeSpec) -> usize {
    let sim = driver.platform();
    let target = sim.current_time().saturating_add(delta);
    let mut delivered = 0;

    while delivered < MAX_INTERRUPTS_PER_RUN && sim.take_expiry_before(target) {
        driver.handle_timer_interrupt();
        delivered += 1;
    }
    if delivered == MAX_INTERRUPTS_PER_RUN {
        crate::kwarn!("(Sim) Limite de interrupções por execução atingido: ", delivered);
    }

    let mut state = sim.state.lock();
    if state.now < target {
        state.now = target;
    }
    delivered
}
