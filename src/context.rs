//! Scoped access to an id generator
//!
//! Attach one generator for the duration of a closure with [`with`] and
//! retrieve it anywhere below with [`current`] or [`must`], without
//! threading it through every call. Attachment is per thread and nests:
//! leaving a scope, by return or by unwinding, restores the outer generator.

use std::cell::RefCell;
use std::sync::Arc;

use crate::error::SfidError;

/// Anything that hands out snowflake ids
pub trait IdGenerator: Send + Sync {
    /// Generate the next id
    fn next_id(&self) -> Result<i64, SfidError>;

    /// Generate the next id, panicking on error
    fn must_id(&self) -> i64 {
        self.next_id().unwrap_or_else(|err| panic!("{err}"))
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<dyn IdGenerator>>> = const { RefCell::new(None) };
}

/// Puts the outer generator back when a scope ends
struct Restore(Option<Arc<dyn IdGenerator>>);

impl Drop for Restore {
    fn drop(&mut self) {
        let outer = self.0.take();
        let _ = CURRENT.try_with(|current| *current.borrow_mut() = outer);
    }
}

/// Run `f` with `generator` attached to the current thread
pub fn with<R>(generator: Arc<dyn IdGenerator>, f: impl FnOnce() -> R) -> R {
    let outer = CURRENT.with(|current| current.replace(Some(generator)));
    let _restore = Restore(outer);
    f()
}

/// The generator attached by the innermost enclosing [`with`], if any
pub fn current() -> Option<Arc<dyn IdGenerator>> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Like [`current`] but panics when no generator is attached
///
/// # Panics
/// Panics if called outside of [`with`].
pub fn must() -> Arc<dyn IdGenerator> {
    current().unwrap_or_else(|| panic!("missing sfid id generator in scope"))
}
