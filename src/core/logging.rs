// =============================================================================
// LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging do agendador com custo ZERO quando desligado.
//
// ARQUITETURA:
// - Usa features do Cargo para compile-time filtering
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - o handler de SIGALRM também loga
// - SEM alocação - strings e valores `LogValue`
// - Escreve APENAS em stderr (drivers::console)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Falhas reportadas ao chamador (clock, timer, máscara)
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Inicialização e eventos raros
// - DEBUG: Cada agendamento, cancelamento e disparo
// - TRACE: Cada rearme do timer e cada seção crítica
//
// FEATURES (cumulativas, o nível mais verboso ativo vence):
// - no_logs:   Remove 100% dos logs
// - log_error: ERROR, WARN
// - log_info:  + INFO (padrão)
// - log_debug: + DEBUG
// - log_trace: + TRACE
//
// COMO USAR:
//   kinfo!("(Alarm) Inicializado");             // Apenas string
//   kdebug!("(Alarm) Pendentes=", count);       // String + valor
//   klog!("Deadline=", deadline, " Head=", h);  // Múltiplos valores
//
// =============================================================================

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================
//
// Formato: \x1b[<código>m  onde:
//   1;31 = Bold Red
//   1;33 = Bold Yellow
//   32   = Green
//   36   = Cyan
//   35   = Magenta
//   0    = Reset
//

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

/// Emite uma linha completa: prefixo + mensagem + valor opcional.
///
/// Ponto único usado pelos macros de nível.
#[doc(hidden)]
#[inline]
pub fn emit_line(prefix: &str, msg: &str, val: Option<&dyn crate::drivers::console::LogValue>) {
    crate::drivers::console::emit_str(prefix);
    crate::drivers::console::emit_str(msg);
    if let Some(val) = val {
        val.emit_value();
    }
    crate::drivers::console::emit_nl();
}

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    // Apenas string literal
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_ERROR, $msg, None);
    }};
    // String + valor
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_ERROR, $msg, Some(&$val as &dyn $crate::drivers::console::LogValue));
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_WARN, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_WARN, $msg, Some(&$val as &dyn $crate::drivers::console::LogValue));
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_INFO, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_INFO, $msg, Some(&$val as &dyn $crate::drivers::console::LogValue));
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_DEBUG, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_DEBUG, $msg, Some(&$val as &dyn $crate::drivers::console::LogValue));
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_TRACE, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_TRACE, $msg, Some(&$val as &dyn $crate::drivers::console::LogValue));
    }};
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS AUXILIARES
// =============================================================================

/// klog! - Log genérico sem prefixo de nível e sem newline.
///
/// Útil para construir linhas com múltiplos valores. Termine com `knl!()`.
///
/// # Uso
/// ```ignore
/// klog!("Deadline=", deadline);                 // String + valor
/// klog!("Head=", head, " Pendentes=", count);   // Múltiplos
/// knl!();
/// ```
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! klog {
    // Apenas string
    ($msg:expr) => {{
        $crate::drivers::console::emit_str($msg);
    }};
    // String + valor
    ($msg:expr, $val:expr) => {{
        $crate::drivers::console::emit_str($msg);
        $crate::drivers::console::LogValue::emit_value(&$val);
    }};
    // String + valor + string
    ($msg1:expr, $val:expr, $msg2:expr) => {{
        $crate::drivers::console::emit_str($msg1);
        $crate::drivers::console::LogValue::emit_value(&$val);
        $crate::drivers::console::emit_str($msg2);
    }};
    // String + valor + string + valor
    ($msg1:expr, $val1:expr, $msg2:expr, $val2:expr) => {{
        $crate::drivers::console::emit_str($msg1);
        $crate::drivers::console::LogValue::emit_value(&$val1);
        $crate::drivers::console::emit_str($msg2);
        $crate::drivers::console::LogValue::emit_value(&$val2);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! klog {
    ($($t:tt)*) => {{}};
}

/// knl! - Emite apenas newline.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! knl {
    () => {{
        $crate::drivers::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! knl {
    () => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {{
        $crate::core::logging::emit_line("\x1b[32m[OK]\x1b[0m ", $msg, None);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($msg:expr) => {{
        $crate::core::logging::emit_line("\x1b[1;31m[FAIL]\x1b[0m ", $msg, None);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
