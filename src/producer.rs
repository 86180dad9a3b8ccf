//! The pull protocol shared by every lazy sequence in this crate.
//!
//! A [`Producer`] hands out elements one at a time through a visitor. A
//! [`TailCall`] producer can additionally step aside and reveal the producer
//! that continues it, which lets a caller-driven loop walk arbitrarily long
//! chains without recursing. [`Link`] tags a producer with which of the two it
//! is.

use std::mem;

use either::Either;

use crate::{Estimate, combinators::Empty};

/// A lazy, single-pass, destructively consumed sequence.
///
/// ```rust
/// use headtail::prelude::*;
///
/// let mut seq = Lazy::of([1, 2, 3]);
/// let mut seen = Vec::new();
/// assert!(seq.pull(&mut |x| seen.push(x)));
/// seq.drain(&mut |x| seen.push(x));
/// assert_eq!(seen, vec![1, 2, 3]);
/// assert!(!seq.pull(&mut |x| seen.push(x)));
/// ```
pub trait Producer<T> {
    /// Deliver at most one element to `visit`. Returns `false` once exhausted.
    fn pull(&mut self, visit: &mut dyn FnMut(T)) -> bool;

    /// Deliver every remaining element to `visit`.
    fn drain(&mut self, visit: &mut dyn FnMut(T)) {
        while self.pull(visit) {}
    }

    /// Advisory count of the remaining elements.
    fn estimate_size(&self) -> Estimate;
}

/// Outcome of [`TailCall::tail`].
///
/// `Left` gives the producer back because it cannot step aside yet; `Right`
/// is the producer that continues it.
pub type Tail<'a, T> = Either<Box<dyn TailCall<'a, T> + 'a>, Link<'a, T>>;

/// Outcome of [`TailCall::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// One element went to the visitor.
    Delivered,
    /// Nothing is left, here or in any successor.
    Exhausted,
    /// Nothing was delivered, but the producer can now step aside; traverse
    /// again and continue with its successor.
    Retraverse,
}

/// A producer that can expose its continuation to a caller-driven loop.
pub trait TailCall<'a, T>: Producer<T> {
    /// Perform a bounded amount of work and reveal the successor, if there is
    /// one. Elements are never delivered from here.
    fn tail(self: Box<Self>) -> Tail<'a, T>;

    /// Pull on behalf of a traversal loop.
    ///
    /// Producers that would otherwise pull from their successor themselves
    /// return [`Advance::Retraverse`] instead, so the loop, not the call
    /// stack, moves on to the next producer.
    fn advance(&mut self, visit: &mut dyn FnMut(T)) -> Advance {
        if self.pull(visit) {
            Advance::Delivered
        } else {
            Advance::Exhausted
        }
    }
}

/// A producer tagged with whether it takes part in tail-call traversal.
pub enum Link<'a, T> {
    /// Plain producer; traversal stops here and delegates to it.
    Terminal(Box<dyn Producer<T> + 'a>),
    /// Tail-call capable producer; traversal may replace it with a successor.
    Chained(Box<dyn TailCall<'a, T> + 'a>),
}

impl<'a, T: 'a> Link<'a, T> {
    pub fn empty() -> Self {
        Link::Terminal(Box::new(Empty))
    }

    #[inline]
    pub fn is_chained(&self) -> bool {
        matches!(self, Link::Chained(_))
    }

    /// Follow the chain until a producer refuses to step aside or a terminal
    /// producer is reached. Uses constant stack regardless of chain length.
    pub fn traverse(self) -> Self {
        let mut link = self;
        loop {
            link = match link {
                Link::Chained(chained) => match chained.tail() {
                    Either::Left(stay) => return Link::Chained(stay),
                    Either::Right(next) => next,
                },
                terminal => return terminal,
            };
        }
    }

    /// Delegate one pull to whatever this link currently holds, without
    /// traversing first.
    fn advance_here(&mut self, visit: &mut dyn FnMut(T)) -> Advance {
        match self {
            Link::Terminal(producer) => {
                if producer.pull(visit) {
                    Advance::Delivered
                } else {
                    Advance::Exhausted
                }
            }
            Link::Chained(chained) => chained.advance(visit),
        }
    }
}

impl<'a, T: 'a> Producer<T> for Link<'a, T> {
    fn pull(&mut self, visit: &mut dyn FnMut(T)) -> bool {
        loop {
            if self.is_chained() {
                let link = mem::replace(self, Link::empty());
                *self = link.traverse();
            }
            match self.advance_here(visit) {
                Advance::Delivered => return true,
                Advance::Exhausted => return false,
                Advance::Retraverse => {}
            }
        }
    }

    /// Pulls one element at a time while the current link is chained and
    /// bulk-delegates once a terminal producer is reached.
    fn drain(&mut self, visit: &mut dyn FnMut(T)) {
        let mut link = mem::replace(self, Link::empty());
        loop {
            link = link.traverse();
            match &mut link {
                Link::Terminal(producer) => return producer.drain(visit),
                Link::Chained(chained) => {
                    if chained.advance(visit) == Advance::Exhausted {
                        return;
                    }
                }
            }
        }
    }

    fn estimate_size(&self) -> Estimate {
        match self {
            Link::Terminal(producer) => producer.estimate_size(),
            Link::Chained(chained) => chained.estimate_size(),
        }
    }
}
