//! Close-callback registration.
//!
//! Level outputs may carry close actions (see [`Lazy::on_close`]). A producer
//! never runs them itself; it forwards them to whatever owns the surrounding
//! pipeline's lifecycle through a [`CloseRegistry`].
//!
//! [`Lazy::on_close`]: crate::Lazy::on_close

use std::{cell::RefCell, fmt};

/// Deferred cleanup for a sequence that holds closeable resources.
pub type CloseAction<'a> = Box<dyn FnOnce() + 'a>;

/// The outbound side of resource cleanup: somewhere to park close actions
/// until the owner decides to close.
pub trait CloseRegistry<'a> {
    fn register_close(&self, action: CloseAction<'a>);
}

/// A single-threaded [`CloseRegistry`] that runs its actions on [`close`].
///
/// ```rust
/// use std::cell::Cell;
/// use headtail::{CloseRegistry, Closer};
///
/// let closed = Cell::new(0);
/// let closer = Closer::new();
/// closer.register_close(Box::new(|| closed.set(closed.get() + 1)));
/// assert_eq!(closer.pending(), 1);
///
/// closer.close();
/// assert_eq!(closed.get(), 1);
/// assert_eq!(closer.pending(), 0);
/// ```
///
/// [`close`]: Closer::close
#[derive(Default)]
pub struct Closer<'a> {
    actions: RefCell<Vec<CloseAction<'a>>>,
}

impl<'a> Closer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions waiting for the next [`close`](Closer::close).
    pub fn pending(&self) -> usize {
        self.actions.borrow().len()
    }

    /// Run every registered action once, in registration order.
    ///
    /// Actions registered while closing are kept for the next call.
    pub fn close(&self) {
        let actions = self.actions.take();
        tracing::trace!(actions = actions.len(), "running close actions");
        for action in actions {
            action();
        }
    }
}

impl<'a> CloseRegistry<'a> for Closer<'a> {
    fn register_close(&self, action: CloseAction<'a>) {
        self.actions.borrow_mut().push(action);
    }
}

impl fmt::Debug for Closer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closer").field("pending", &self.pending()).finish()
    }
}
