//! Helpers da demonstração: timestamps e espera por sinal.

use core::sync::atomic::{AtomicBool, Ordering};

use tempo::arch::unix::signal;
use tempo::Errno;

/// Formato do relógio de parede nas mensagens da demonstração
const TIMESTAMP_FORMAT: &[u8] = b"%Y-%m-%d %H:%M:%S\0";

/// Timestamp local `YYYY-MM-DD HH:MM:SS`.
///
/// Falhas de `localtime_r`/`strftime` viram um marcador fixo em vez de erro.
pub fn timestamp() -> String {
    let mut buf = [0u8; 32];

    // SAFETY: `tm` é preenchido por localtime_r; `buf` tem capacidade declarada
    let written = unsafe {
        let now = libc::time(core::ptr::null_mut());
        let mut tm: libc::tm = core::mem::zeroed();
        if libc::localtime_r(&now, &mut tm).is_null() {
            return String::from("????-??-?? ??:??:??");
        }
        libc::strftime(
            buf.as_mut_ptr().cast(),
            buf.len(),
            TIMESTAMP_FORMAT.as_ptr().cast(),
            &tm,
        )
    };

    String::from_utf8_lossy(&buf[..written]).into_owned()
}

/// Espera até `flag` ser levantado por um callback.
///
/// `SIGALRM` fica bloqueado entre a checagem e o `sigsuspend`, então um
/// disparo nunca cai na janela entre os dois.
pub fn wait_for_event(flag: &AtomicBool) -> Result<(), Errno> {
    let was_blocked = signal::block_alarm()?;
    while !flag.load(Ordering::Acquire) {
        signal::suspend_until_alarm()?;
    }
    if !was_blocked {
        signal::unblock_alarm()?;
    }
    Ok(())
}

/// Banner inicial
pub fn print_banner() {
    println!("------ Tempo Scheduler -------");
}
