//! Trait de Interrupção

use crate::sys::Errno;

/// Controle da interrupção do timer no contexto de execução atual.
pub trait IrqHal {
    /// Mascara a interrupção.
    ///
    /// Retorna `true` se ela JÁ estava mascarada (seção crítica aninhada ou
    /// dentro do próprio handler); nesse caso o chamador não deve desmascarar.
    fn mask(&self) -> Result<bool, Errno>;

    /// Desmascara a interrupção.
    fn unmask(&self) -> Result<(), Errno>;

    /// Verifica se a interrupção está mascarada.
    fn is_masked(&self) -> bool;
}
