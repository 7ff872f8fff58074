//! Agendador Global
//!
//! Instância única do `AlarmDriver` sobre a plataforma Unix, mais a entrada
//! de `SIGALRM` que a alimenta.
//!
//! ```text
//! init_scheduler() ──► sigaction(SIGALRM, on_sigalrm) ──► DRIVER.call_once
//! schedule(...)    ──► DRIVER ──► AlarmDriver::schedule
//! SIGALRM          ──► on_sigalrm ──► AlarmDriver::handle_timer_interrupt
//! ```
//!
//! Qualquer operação antes de `init_scheduler` retorna `NotInitialized`.

use spin::Once;

use crate::arch::unix::signal;
use crate::arch::UnixPlatform;
use crate::core::time::{AlarmDriver, SchedulerConfig, TimeSpec, TimerHandle};
use crate::sys::SchedError;

/// Driver global
static DRIVER: Once<AlarmDriver<UnixPlatform>> = Once::new();

/// Entrada de `SIGALRM`.
extern "C" fn on_sigalrm(_signo: libc::c_int) {
    // Sinal antes do driver existir: nada agendado ainda
    if let Some(driver) = DRIVER.get() {
        driver.handle_timer_interrupt();
    }
}

fn driver() -> Result<&'static AlarmDriver<UnixPlatform>, SchedError> {
    DRIVER.get().ok_or(SchedError::NotInitialized)
}

/// Inicializa o agendador com a configuração padrão.
pub fn init_scheduler() -> Result<(), SchedError> {
    init_scheduler_with(SchedulerConfig::new())
}

/// Inicializa o agendador.
///
/// Instala o handler de `SIGALRM` e cria o driver global. Só pode ser
/// chamado uma vez: chamadas seguintes retornam `AlreadyInitialized` e a
/// primeira configuração permanece.
pub fn init_scheduler_with(config: SchedulerConfig) -> Result<(), SchedError> {
    if DRIVER.is_completed() {
        crate::kwarn!("(Sched) init_scheduler chamado novamente, ignorando");
        return Err(SchedError::AlreadyInitialized);
    }

    let driver = AlarmDriver::new(UnixPlatform::new(config.clock), config)?;

    // Handler antes do driver: um SIGALRM nesse intervalo encontra DRIVER vazio
    signal::install_handler(on_sigalrm).map_err(|errno| {
        crate::kerror!("(Sched) Falha ao instalar handler de SIGALRM: ", errno);
        SchedError::HandlerInstallFailure(errno)
    })?;

    let mut created = false;
    DRIVER.call_once(|| {
        created = true;
        driver
    });
    if !created {
        crate::kwarn!("(Sched) init_scheduler concorrente perdeu a corrida");
        return Err(SchedError::AlreadyInitialized);
    }

    crate::kinfo!("(Sched) Agendador inicializado, capacidade=", config.initial_capacity);
    Ok(())
}

/// O agendador já foi inicializado?
pub fn is_initialized() -> bool {
    DRIVER.is_completed()
}

/// Agenda `callback` para daqui a `delay`. Ver [`AlarmDriver::schedule`].
pub fn schedule<D, F>(delay: D, callback: F) -> Result<TimerHandle, SchedError>
where
    D: Into<TimeSpec>,
    F: FnOnce() + Send + 'static,
{
    driver()?.schedule(delay, callback)
}

/// Agenda `callback` para o instante absoluto `deadline` (no relógio de [`now`]).
pub fn aschedule<F>(deadline: TimeSpec, callback: F) -> Result<TimerHandle, SchedError>
where
    F: FnOnce() + Send + 'static,
{
    driver()?.aschedule(deadline, callback)
}

pub fn schedule_with<D, T>(delay: D, func: Option<fn(T)>, data: T) -> Result<TimerHandle, SchedError>
where
    D: Into<TimeSpec>,
    T: Send + 'static,
{
    driver()?.schedule_with(delay, func, data)
}

pub fn aschedule_with<T>(deadline: TimeSpec, func: Option<fn(T)>, data: T) -> Result<TimerHandle, SchedError>
where
    T: Send + 'static,
{
    driver()?.aschedule_with(deadline, func, data)
}

/// Cancela uma entrada pendente. Handle velho ou agendador não inicializado: no-op.
pub fn deschedule(handle: TimerHandle) -> bool {
    match driver() {
        Ok(driver) => driver.deschedule(handle),
        Err(_) => false,
    }
}

/// Instante atual no relógio do agendador (base para `aschedule`).
pub fn now() -> Result<TimeSpec, SchedError> {
    driver()?.now()
}

/// Entradas pendentes.
pub fn pending() -> Result<usize, SchedError> {
    driver()?.pending()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nenhum teste unitário inicializa o driver global; o ciclo completo com
    // SIGALRM real fica em tests/alarm_signal.rs
    #[test]
    fn operations_before_init_report_not_initialized() {
        assert!(!is_initialized());
        assert_eq!(schedule(TimeSpec::from_secs(1), || {}).err(), Some(SchedError::NotInitialized));
        assert_eq!(
            aschedule(TimeSpec::ZERO, || {}).err(),
            Some(SchedError::NotInitialized)
        );
        assert_eq!(now().err(), Some(SchedError::NotInitialized));
        assert_eq!(pending().err(), Some(SchedError::NotInitialized));
        assert!(!deschedule(TimerHandle::new(0, 0)));
    }
}
