// =============================================================================
// CONSOLE DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Saída de diagnóstico do agendador (stderr).
//
// ARQUITETURA:
// Este driver foi projetado para ser chamado de DENTRO do handler de SIGALRM:
// - SEM Mutex/Spinlock - Escrita direta via write(2)
// - SEM core::fmt - Números formatados em buffer de pilha
// - SEM alocação - Apenas strings e valores imediatos
//
// write(2) está na lista de funções async-signal-safe do POSIX; nada mais
// neste arquivo chama a libc.
//
// FUNÇÕES DISPONÍVEIS:
// - emit_str(s)      : Envia string
// - emit_dec(v)      : Envia i64 em decimal
// - emit_nl()        : Envia newline
// - LogValue::emit_value : Dispatch usado pelos macros de log
//
// NOTA IMPORTANTE:
// Não há exclusão mútua entre threads. Linhas de log podem se intercalar.
//
// =============================================================================

const STDERR: libc::c_int = libc::STDERR_FILENO;

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Escreve todos os bytes em stderr.
///
/// Erros são ignorados: não há para onde reportar uma falha de log.
#[inline(never)]
pub fn emit_bytes(mut bytes: &[u8]) {
    while !bytes.is_empty() {
        // SAFETY: ponteiro e tamanho vêm de um slice válido.
        let n = unsafe { libc::write(STDERR, bytes.as_ptr().cast(), bytes.len()) };
        if n < 0 {
            if crate::sys::Errno::last() == crate::sys::Errno::EINTR {
                continue;
            }
            return;
        }
        if n == 0 {
            return;
        }
        bytes = &bytes[n as usize..];
    }
}

/// Envia uma string.
#[inline]
pub fn emit_str(s: &str) {
    emit_bytes(s.as_bytes());
}

/// Envia newline.
#[inline]
pub fn emit_nl() {
    emit_bytes(b"\n");
}

/// Envia um inteiro com sinal em decimal.
pub fn emit_dec(value: i64) {
    let mut buf = [0u8; 20];
    emit_bytes(format_dec(&mut buf, value));
}

/// Envia `value` em decimal com pelo menos `width` dígitos (zeros à esquerda).
///
/// Usado para a parte fracionária de tempos (`5.000250`).
pub fn emit_dec_padded(value: u64, width: usize) {
    let mut buf = [0u8; 20];
    let digits = format_unsigned(&mut buf, value);
    let mut pad = width.saturating_sub(digits.len());
    while pad > 0 {
        emit_bytes(b"0");
        pad -= 1;
    }
    emit_bytes(digits);
}

// =============================================================================
// FORMATAÇÃO SEM ALOCAÇÃO
// =============================================================================

/// Formata `value` no fim de `buf` e retorna o trecho usado.
pub fn format_unsigned(buf: &mut [u8; 20], mut value: u64) -> &[u8] {
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[i..]
}

/// Formata `value` (com sinal) no fim de `buf` e retorna o trecho usado.
pub fn format_dec(buf: &mut [u8; 20], value: i64) -> &[u8] {
    // i64::MIN tem 19 dígitos + sinal = 20 bytes
    let magnitude = value.unsigned_abs();
    let start = {
        let digits = format_unsigned(buf, magnitude);
        20 - digits.len()
    };
    if value < 0 {
        buf[start - 1] = b'-';
        &buf[start - 1..]
    } else {
        &buf[start..]
    }
}

// =============================================================================
// VALORES DE LOG
// =============================================================================

/// Valor que sabe se escrever no console sem `core::fmt`.
pub trait LogValue {
    fn emit_value(&self);
}

macro_rules! impl_log_value_int {
    ($($t:ty),*) => {
        $(
            impl LogValue for $t {
                #[inline]
                fn emit_value(&self) {
                    emit_dec(*self as i64);
                }
            }
        )*
    };
}

impl_log_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, usize);

impl LogValue for u64 {
    fn emit_value(&self) {
        let mut buf = [0u8; 20];
        emit_bytes(format_unsigned(&mut buf, *self));
    }
}

impl LogValue for bool {
    fn emit_value(&self) {
        emit_str(if *self { "true" } else { "false" });
    }
}

impl LogValue for &str {
    fn emit_value(&self) {
        emit_str(self);
    }
}

impl LogValue for crate::sys::Errno {
    fn emit_value(&self) {
        emit_str("errno=");
        emit_dec(self.as_i32() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unsigned_values() {
        let mut buf = [0u8; 20];
        assert_eq!(format_unsigned(&mut buf, 0), b"0");
        let mut buf = [0u8; 20];
        assert_eq!(format_unsigned(&mut buf, 1_000_250), b"1000250");
        let mut buf = [0u8; 20];
        assert_eq!(format_unsigned(&mut buf, u64::MAX), b"18446744073709551615");
    }

    #[test]
    fn formats_signed_extremes() {
        let mut buf = [0u8; 20];
        assert_eq!(format_dec(&mut buf, -1), b"-1");
        let mut buf = [0u8; 20];
        assert_eq!(format_dec(&mut buf, i64::MIN), b"-9223372036854775808");
        let mut buf = [0u8; 20];
        assert_eq!(format_dec(&mut buf, 42), b"42");
    }
}
