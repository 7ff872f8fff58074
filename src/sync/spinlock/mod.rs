mod spinlock;

pub use spinlock::{IrqSpinlock, IrqSpinlockGuard};
