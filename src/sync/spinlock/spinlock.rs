//! Spinlock com máscara de interrupção - bloqueio com busy-wait

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::hal::traits::IrqHal;
use crate::sys::Errno;

/// Spinlock que MASCARA a interrupção do timer antes de girar.
///
/// Esta é a seção crítica do agendador:
///
/// ```text
/// mask(irq) → spin(locked) → [mutação] → release(locked) → unmask(irq)
/// ```
///
/// - A máscara impede que o handler preempte o dono do lock no MESMO
///   contexto de execução (o handler giraria para sempre).
/// - O flag atômico dá exclusão mútua entre threads, que a máscara por
///   thread (`pthread_sigmask`) não dá.
///
/// # Quando usar
///
/// - Estado compartilhado entre código normal e o handler de interrupção
/// - Seções críticas MUITO curtas, que não bloqueiam
///
/// # Quando NÃO usar
///
/// - Em volta de callbacks do usuário, se o callback pode querer o mesmo
///   lock (`schedule` adquire o lock da fila). Um lock que nenhum callback
///   adquire, como o de disparo do handler, pode ficar retido.
pub struct IrqSpinlock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: IrqSpinlock protege acesso com lock atômico
unsafe impl<T: Send> Send for IrqSpinlock<T> {}
unsafe impl<T: Send> Sync for IrqSpinlock<T> {}

impl<T> IrqSpinlock<T> {
    /// Cria novo spinlock
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock com a interrupção de `irq` mascarada.
    ///
    /// Falha apenas se a máscara não puder ser aplicada; nesse caso o lock
    /// NÃO é adquirido.
    pub fn lock<'a, I>(&'a self, irq: &'a I) -> Result<IrqSpinlockGuard<'a, T, I>, Errno>
    where
        I: IrqHal + ?Sized,
    {
        // Mascarar antes de adquirir
        let was_masked = irq.mask()?;

        // Spin até conseguir o lock
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Hint para CPU que estamos em spin loop
            core::hint::spin_loop();
        }

        Ok(IrqSpinlockGuard {
            lock: self,
            irq,
            was_masked,
        })
    }

    /// Tenta adquirir sem girar
    pub fn try_lock<'a, I>(&'a self, irq: &'a I) -> Result<Option<IrqSpinlockGuard<'a, T, I>>, Errno>
    where
        I: IrqHal + ?Sized,
    {
        let was_masked = irq.mask()?;

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Ok(Some(IrqSpinlockGuard {
                lock: self,
                irq,
                was_masked,
            }))
        } else {
            // Não conseguiu, restaurar máscara
            if !was_masked {
                irq.unmask()?;
            }
            Ok(None)
        }
    }

    /// Verifica se o lock está adquirido (diagnóstico)
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Acesso exclusivo sem lock (o `&mut self` já garante exclusividade)
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

/// Guard do spinlock - libera e restaura a máscara ao sair do escopo
pub struct IrqSpinlockGuard<'a, T, I: IrqHal + ?Sized> {
    lock: &'a IrqSpinlock<T>,
    irq: &'a I,
    was_masked: bool,
}

impl<T, I: IrqHal + ?Sized> Deref for IrqSpinlockGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, I: IrqHal + ?Sized> DerefMut for IrqSpinlockGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, I: IrqHal + ?Sized> Drop for IrqSpinlockGuard<'_, T, I> {
    fn drop(&mut self) {
        // Liberar lock
        self.lock.locked.store(false, Ordering::Release);

        // Restaurar máscara se a interrupção estava livre
        if !self.was_masked && self.irq.unmask().is_err() {
            crate::kerror!("(Sync) Falha ao desmascarar interrupção na saída da seção crítica");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimPlatform;

    #[test]
    fn lock_masks_and_guard_restores() {
        let sim = SimPlatform::new();
        let lock = IrqSpinlock::new(0u32);
        {
            let mut guard = lock.lock(&sim).unwrap();
            *guard += 1;
            assert!(sim.is_masked());
            assert!(lock.is_locked());
        }
        assert!(!sim.is_masked());
        assert!(!lock.is_locked());
        assert_eq!(*lock.lock(&sim).unwrap(), 1);
    }

    #[test]
    fn nested_section_keeps_outer_mask() {
        let sim = SimPlatform::new();
        let outer = IrqSpinlock::new(());
        let inner = IrqSpinlock::new(());
        let _g1 = outer.lock(&sim).unwrap();
        {
            let _g2 = inner.lock(&sim).unwrap();
        }
        // O guard interno não pode desmascarar o que o externo mascarou
        assert!(sim.is_masked());
    }

    #[test]
    fn try_lock_fails_while_held_and_restores_mask() {
        let sim = SimPlatform::new();
        let other = SimPlatform::new();
        let lock = IrqSpinlock::new(());
        let _held = lock.lock(&sim).unwrap();
        assert!(lock.try_lock(&other).unwrap().is_none());
        assert!(!other.is_masked());
    }

    #[test]
    fn mask_failure_does_not_take_the_lock() {
        let sim = SimPlatform::new();
        sim.fail_masks(true);
        let lock = IrqSpinlock::new(());
        assert_eq!(lock.lock(&sim).err(), Some(Errno::EINVAL));
        assert!(!lock.is_locked());
    }
}
