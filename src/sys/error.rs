//! # Error Codes
//!
//! Códigos de erro do agendador e números de erro do sistema operacional.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Errno:** Espelho tipado do `errno` POSIX para as chamadas usadas pela
//!   plataforma Unix (`clock_gettime`, `setitimer`, `sigaction`, `pthread_sigmask`).
//! - **SchedError:** Falhas reportadas ao chamador direto de `schedule`/`aschedule`.
//!   Nenhuma delas derruba o processo.
//!
//! Segue a numeração POSIX/Linux para facilitar leitura de logs.

use crate::core::time::TimerHandle;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Success = 0,
    EPERM = 1,   // Operation not permitted
    ESRCH = 3,   // No such process
    EINTR = 4,   // Interrupted system call
    EIO = 5,     // I/O error
    EAGAIN = 11, // Try again
    ENOMEM = 12, // Out of memory
    EFAULT = 14, // Bad address
    EBUSY = 16,  // Device or resource busy
    EINVAL = 22, // Invalid argument
    ERANGE = 34, // Math result not representable
    ENOSYS = 38, // Function not implemented

    // Valor fora da tabela acima
    EUNKNOWN = -1,
}

impl Errno {
    /// Converte um `errno` cru na variante correspondente.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Errno::Success,
            1 => Errno::EPERM,
            3 => Errno::ESRCH,
            4 => Errno::EINTR,
            5 => Errno::EIO,
            11 => Errno::EAGAIN,
            12 => Errno::ENOMEM,
            14 => Errno::EFAULT,
            16 => Errno::EBUSY,
            22 => Errno::EINVAL,
            34 => Errno::ERANGE,
            38 => Errno::ENOSYS,
            _ => Errno::EUNKNOWN,
        }
    }

    /// Lê o `errno` da thread atual.
    ///
    /// Não aloca: seguro dentro do handler de SIGALRM.
    pub fn last() -> Self {
        match std::io::Error::last_os_error().raw_os_error() {
            Some(raw) => Self::from_raw(raw),
            None => Errno::EUNKNOWN,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Falhas do agendador.
///
/// `Copy` e sem alocação: pode ser construído e logado dentro do handler de
/// interrupção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchedError {
    /// Forma função+dados chamada sem função.
    #[error("callback ausente")]
    InvalidCallback,

    /// O arena de entradas ou o índice de ordem não puderam crescer.
    #[error("falha de alocação da entrada")]
    AllocationFailure,

    /// O relógio do agendador não pôde ser lido.
    #[error("falha ao ler o relógio ({0:?})")]
    ClockReadFailure(Errno),

    /// O timer não pôde ser armado. A entrada CONTINUA na fila e `handle`
    /// ainda pode ser usado com `deschedule`.
    #[error("falha ao armar o timer ({errno:?}); entrada {handle:?} permanece na fila")]
    TimerArmFailure { handle: TimerHandle, errno: Errno },

    /// A interrupção não pôde ser mascarada; nada foi alterado.
    #[error("falha ao mascarar a interrupção ({0:?})")]
    IrqMaskFailure(Errno),

    /// `sigaction` falhou durante a inicialização.
    #[error("falha ao instalar o handler de interrupção ({0:?})")]
    HandlerInstallFailure(Errno),

    #[error("agendador não inicializado")]
    NotInitialized,

    #[error("agendador já inicializado")]
    AlreadyInitialized,
}
