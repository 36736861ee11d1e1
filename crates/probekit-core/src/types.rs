//! Sharing aliases
//!
//! Two ownership patterns run through ProbeKit:
//! - [`Shared`]: state owned by the control thread, such as a preview that
//!   both the coordinator and the pipeline hold
//! - [`ThreadSafeRw`]: state written by the communication thread and read
//!   by the control thread, such as the machine status

use parking_lot::RwLock;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Single-threaded shared, interior-mutable value
pub type Shared<T> = Rc<RefCell<T>>;

/// Cross-thread value with many readers and an occasional writer
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Wrap a value as [`Shared`]
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Wrap a value as [`ThreadSafeRw`]
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_clones_see_writes() {
        let a = shared(1);
        let b = a.clone();
        *b.borrow_mut() = 2;
        assert_eq!(*a.borrow(), 2);
    }

    #[test]
    fn test_thread_safe_rw_across_threads() {
        let value = thread_safe_rw(0u32);
        let writer = value.clone();
        std::thread::spawn(move || *writer.write() = 7)
            .join()
            .unwrap();
        assert_eq!(*value.read(), 7);
    }
}
