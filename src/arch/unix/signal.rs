//! `SIGALRM`: instalação do handler e máscara por thread.
//!
//! A "interrupção" do agendador é o `SIGALRM`. Mascarar = bloquear o sinal na
//! thread corrente com `pthread_sigmask`; um sinal que chega mascarado fica
//! pendente e é entregue ao desmascarar.

use core::mem::MaybeUninit;

use crate::sys::Errno;

/// Entrada de interrupção: assinatura de `sa_handler`.
pub type SignalEntry = extern "C" fn(libc::c_int);

fn alarm_set() -> libc::sigset_t {
    let mut set = MaybeUninit::<libc::sigset_t>::uninit();
    // SAFETY: sigemptyset inicializa o conjunto; sigaddset com sinal válido
    unsafe {
        libc::sigemptyset(set.as_mut_ptr());
        libc::sigaddset(set.as_mut_ptr(), libc::SIGALRM);
        set.assume_init()
    }
}

fn change_mask(how: libc::c_int, set: Option<&libc::sigset_t>) -> Result<libc::sigset_t, Errno> {
    let mut old = MaybeUninit::<libc::sigset_t>::uninit();
    let set_ptr = set.map_or(core::ptr::null(), |s| s as *const libc::sigset_t);
    // SAFETY: ponteiros válidos ou nulo; `old` é preenchido em caso de sucesso
    let rc = unsafe { libc::pthread_sigmask(how, set_ptr, old.as_mut_ptr()) };
    if rc != 0 {
        // pthread_sigmask retorna o erro, não usa errno
        return Err(Errno::from_raw(rc));
    }
    // SAFETY: sucesso preenche `old`
    Ok(unsafe { old.assume_init() })
}

fn contains_alarm(set: &libc::sigset_t) -> bool {
    // SAFETY: conjunto inicializado
    unsafe { libc::sigismember(set, libc::SIGALRM) == 1 }
}

/// Bloqueia `SIGALRM` na thread corrente. Retorna se JÁ estava bloqueado.
pub fn block_alarm() -> Result<bool, Errno> {
    let old = change_mask(libc::SIG_BLOCK, Some(&alarm_set()))?;
    Ok(contains_alarm(&old))
}

/// Desbloqueia `SIGALRM` na thread corrente.
pub fn unblock_alarm() -> Result<(), Errno> {
    change_mask(libc::SIG_UNBLOCK, Some(&alarm_set())).map(|_| ())
}

/// `SIGALRM` está bloqueado na thread corrente?
pub fn alarm_blocked() -> bool {
    change_mask(libc::SIG_BLOCK, None)
        .map(|current| contains_alarm(&current))
        .unwrap_or(false)
}

/// Dorme até um sinal ser tratado, com `SIGALRM` liberado durante a espera.
///
/// Deve ser chamado com `SIGALRM` bloqueado: checar uma condição e depois
/// suspender sem essa janela fechada perderia o disparo.
pub fn suspend_until_alarm() -> Result<(), Errno> {
    let mut wait_mask = change_mask(libc::SIG_BLOCK, None)?;
    // SAFETY: conjunto inicializado por pthread_sigmask
    unsafe {
        libc::sigdelset(&mut wait_mask, libc::SIGALRM);
        // sigsuspend sempre retorna -1/EINTR depois de tratar um sinal
        libc::sigsuspend(&wait_mask);
    }
    Ok(())
}

/// Instala `entry` como handler de `SIGALRM`.
///
/// `SIGALRM` fica em `sa_mask` (o handler não é reentrado na própria thread)
/// e `SA_RESTART` evita `EINTR` em syscalls interrompidas pelo disparo.
pub fn install_handler(entry: SignalEntry) -> Result<(), Errno> {
    // SAFETY: sigaction zerado é um estado inicial válido
    let mut action: libc::sigaction = unsafe { core::mem::zeroed() };
    action.sa_sigaction = entry as libc::sighandler_t;
    action.sa_mask = alarm_set();
    action.sa_flags = libc::SA_RESTART;

    // SAFETY: `action` totalmente inicializado; handler é extern "C"
    let rc = unsafe { libc::sigaction(libc::SIGALRM, &action, core::ptr::null_mut()) };
    if rc != 0 {
        return Err(Errno::last());
    }
    crate::kdebug!("(Signal) Handler de SIGALRM instalado");
    Ok(())
}
