//! The caller-facing lazy sequence.
//!
//! [`Lazy`] pairs a [`Link`] with the close actions that belong to it. It is
//! what a transform receives as its tail and what it hands back as a level's
//! output.
//!
//! Sequences built by [`Lazy::head_tail`] also share a [`Closer`]: every level
//! of a recursive decomposition parks the close actions of its output there,
//! and closing the outermost sequence runs them.

use std::{
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    CloseAction, CloseRegistry, Closer, Estimate, HeadTail, Link, Producer, TailCall,
    combinators::{Concat, FromIter, Once},
};

/// A lazy, single-pass sequence with optional close actions.
///
/// Nothing is computed until an element is demanded.
///
/// ```rust
/// use headtail::prelude::*;
///
/// let seq = Lazy::of(1..=3).prepend(0).append(4);
/// assert_eq!(seq.collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
/// ```
pub struct Lazy<'a, T> {
    link: Link<'a, T>,
    close: Vec<CloseAction<'a>>,
    registry: Option<Rc<Closer<'a>>>,
}

impl<'a, T: 'a> Lazy<'a, T> {
    pub fn empty() -> Self {
        Link::empty().into()
    }

    pub fn once(value: T) -> Self {
        Self::from_producer(Once::new(value))
    }

    /// Lazily pull elements from `iter`.
    pub fn of<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_producer(FromIter::new(iter))
    }

    pub fn from_producer<P>(producer: P) -> Self
    where
        P: Producer<T> + 'a,
    {
        Link::Terminal(Box::new(producer)).into()
    }

    pub fn from_tail_call<C>(chained: C) -> Self
    where
        C: TailCall<'a, T> + 'a,
    {
        Link::Chained(Box::new(chained)).into()
    }

    pub fn from_parts(link: Link<'a, T>, close: Vec<CloseAction<'a>>) -> Self {
        Lazy {
            link,
            close,
            registry: None,
        }
    }

    /// Split into the producer and everything [`close`](Lazy::close) would
    /// run, in the same order.
    pub fn into_parts(self) -> (Link<'a, T>, Vec<CloseAction<'a>>) {
        let (link, mut close, registry) = self.split();
        if let Some(registry) = registry {
            close.push(Box::new(move || registry.close()));
        }
        (link, close)
    }

    pub(crate) fn split(self) -> (Link<'a, T>, Vec<CloseAction<'a>>, Option<Rc<Closer<'a>>>) {
        (self.link, self.close, self.registry)
    }

    /// Walk the chain up to the first producer that has to be pulled.
    pub(crate) fn traversed(self) -> Self {
        let Lazy {
            link,
            close,
            registry,
        } = self;
        Lazy {
            link: link.traverse(),
            close,
            registry,
        }
    }

    /// Attach an action to run when this sequence is closed.
    pub fn on_close<F>(mut self, action: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.close.push(Box::new(action));
        self
    }

    pub fn has_close_actions(&self) -> bool {
        !self.close.is_empty() || self.pending_in_registry() > 0
    }

    /// Run the attached close actions in the order they were attached, then
    /// those registered by the levels of a decomposition so far.
    pub fn close(&mut self) {
        for action in std::mem::take(&mut self.close) {
            action();
        }
        if let Some(registry) = &self.registry {
            registry.close();
        }
    }

    fn pending_in_registry(&self) -> usize {
        self.registry.as_ref().map_or(0, |registry| registry.pending())
    }

    /// Decompose this sequence into its first element and the rest, and let
    /// `transform` decide what to produce from them.
    ///
    /// Nothing is pulled until the returned sequence is. Close actions of
    /// `self` move to the returned sequence, and so do close actions of every
    /// level output once that level has run.
    ///
    /// ```rust
    /// use headtail::prelude::*;
    ///
    /// // Keep every element up to and including the first negative one.
    /// fn until_negative<'a>(seq: Lazy<'a, i32>) -> Lazy<'a, i32> {
    ///     seq.head_tail(|head, tail| {
    ///         if head < 0 {
    ///             Some(Lazy::once(head))
    ///         } else {
    ///             Some(until_negative(tail).prepend(head))
    ///         }
    ///     })
    /// }
    ///
    /// let out: Vec<_> = until_negative(Lazy::of([3, 1, -4, 1, -5])).collect();
    /// assert_eq!(out, vec![3, 1, -4]);
    /// ```
    pub fn head_tail<U, F>(self, transform: F) -> Lazy<'a, U>
    where
        U: 'a,
        F: FnOnce(T, Lazy<'a, T>) -> Option<Lazy<'a, U>> + 'a,
    {
        let (link, close, registry) = self.split();
        // Recursing on the tail reuses this registry instead of nesting a new one.
        let registry = registry.unwrap_or_default();
        let weak: Weak<Closer<'a>> = Rc::downgrade(&registry);
        let owner: Weak<dyn CloseRegistry<'a> + 'a> = weak;
        let source = Lazy {
            link,
            close: Vec::new(),
            registry: Some(registry.clone()),
        };
        let producer = HeadTail::with_owner(source, transform, owner);
        Lazy {
            link: Link::Chained(Box::new(producer)),
            close,
            registry: Some(registry),
        }
    }

    /// Run `self`, then `other`. Close actions of both are kept.
    pub fn concat(self, other: Lazy<'a, T>) -> Self {
        let (left, mut close, registry) = self.split();
        let (right, more, other_registry) = other.split();
        close.extend(more);
        let registry = match (registry, other_registry) {
            (Some(registry), Some(other)) if !Rc::ptr_eq(&registry, &other) => {
                close.push(Box::new(move || other.close()));
                Some(registry)
            }
            (registry, other) => registry.or(other),
        };
        Lazy {
            link: Link::Chained(Box::new(Concat::new(left, right))),
            close,
            registry,
        }
    }

    pub fn prepend(self, value: T) -> Self {
        Lazy::once(value).concat(self)
    }

    pub fn append(self, value: T) -> Self {
        self.concat(Lazy::once(value))
    }
}

impl<'a, T: 'a> From<Link<'a, T>> for Lazy<'a, T> {
    fn from(link: Link<'a, T>) -> Self {
        Lazy::from_parts(link, Vec::new())
    }
}

impl<'a, T: 'a> Producer<T> for Lazy<'a, T> {
    fn pull(&mut self, visit: &mut dyn FnMut(T)) -> bool {
        self.link.pull(visit)
    }

    fn drain(&mut self, visit: &mut dyn FnMut(T)) {
        self.link.drain(visit)
    }

    fn estimate_size(&self) -> Estimate {
        self.link.estimate_size()
    }
}

impl<'a, T: 'a> Iterator for Lazy<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut out = None;
        self.link.pull(&mut |value| out = Some(value));
        out
    }
}

impl<T> fmt::Debug for Lazy<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("chained", &matches!(self.link, Link::Chained(_)))
            .field(
                "close_actions",
                &(self.close.len() + self.registry.as_ref().map_or(0, |r| r.pending())),
            )
            .finish()
    }
}
