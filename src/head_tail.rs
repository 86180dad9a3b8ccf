//! Head/tail decomposition with stack-safe chaining.
//!
//! A [`HeadTail`] pulls exactly one element (the head) from its source the
//! first time anything is demanded of it, hands the head and the lazy rest of
//! the source to a transform, and then produces whatever the transform
//! returned. Transforms that recurse by returning another `HeadTail` form a
//! chain that is walked by the loop in [`Link::traverse`] instead of by nested
//! calls, so a chain of any length runs in constant stack.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──(first demand)──▶ Active ──(exhausted / handed off)──▶ Finished
//!    │                          │
//!    └──(source or transform unwinds)──▶ Poisoned
//! ```
//!
//! Entering `Finished` drops the source, the transform and the level output
//! in one assignment. `Poisoned` is terminal: the head consumed by the failed
//! step cannot be recovered.

use std::{
    fmt,
    rc::{Rc, Weak},
};

use either::Either;
use tracing::{trace, warn};

use crate::{
    CloseRegistry, Error, Estimate, Lazy, Link, Producer, Result, Tail, TailCall,
};

/// Where a [`HeadTail`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No head extracted yet; the source and transform are held.
    Pending,
    /// The head was extracted and the level output is being produced.
    Active,
    /// Exhausted or handed off; permanently empty.
    Finished,
    /// A step unwound part way through; permanently unusable.
    Poisoned,
}

enum State<'a, T, U, F> {
    Pending { source: Lazy<'a, T>, transform: F },
    Active(Link<'a, U>),
    Finished,
    Poisoned,
}

impl<'a, T, U, F> State<'a, T, U, F> {
    /// Move the state out, leaving `Poisoned` until it is put back.
    fn take(&mut self) -> Self {
        std::mem::replace(self, State::Poisoned)
    }

    fn phase(&self) -> Phase {
        match self {
            State::Pending { .. } => Phase::Pending,
            State::Active(_) => Phase::Active,
            State::Finished => Phase::Finished,
            State::Poisoned => Phase::Poisoned,
        }
    }
}

/// Lazily decomposes a source into head and tail and produces the sequence a
/// transform builds from them.
///
/// ```rust
/// use headtail::prelude::*;
///
/// let mut producer = HeadTail::new(Lazy::of(["a", "b", "c"]), |head, tail| {
///     Some(tail.append(head))
/// });
/// assert_eq!(producer.phase(), Phase::Pending);
/// assert_eq!(producer.estimate_size(), Estimate::Finite(2));
///
/// let rotated: Vec<_> = producer.by_ref().collect();
/// assert_eq!(rotated, vec!["b", "c", "a"]);
/// assert_eq!(producer.phase(), Phase::Finished);
/// ```
pub struct HeadTail<'a, T, U, F> {
    state: State<'a, T, U, F>,
    owner: Option<Weak<dyn CloseRegistry<'a> + 'a>>,
}

impl<'a, T, U, F> HeadTail<'a, T, U, F>
where
    T: 'a,
    U: 'a,
    F: FnOnce(T, Lazy<'a, T>) -> Option<Lazy<'a, U>> + 'a,
{
    pub fn new(source: Lazy<'a, T>, transform: F) -> Self {
        HeadTail {
            state: State::Pending { source, transform },
            owner: None,
        }
    }

    /// Like [`new`](HeadTail::new) with the owner already attached.
    pub(crate) fn with_owner(
        source: Lazy<'a, T>,
        transform: F,
        owner: Weak<dyn CloseRegistry<'a> + 'a>,
    ) -> Self {
        HeadTail {
            state: State::Pending { source, transform },
            owner: Some(owner),
        }
    }

    /// Attach the registry that receives close actions of the level output.
    ///
    /// Only a weak handle is kept. Must happen before the first pull, since
    /// registration happens while the head is extracted.
    pub fn set_owner<O>(&mut self, owner: &Rc<O>) -> Result<()>
    where
        O: CloseRegistry<'a> + 'a,
    {
        match self.state.phase() {
            Phase::Pending => {}
            Phase::Poisoned => return Err(Error::Poisoned),
            Phase::Active | Phase::Finished => return Err(Error::AlreadyStarted),
        }
        let weak: Weak<O> = Rc::downgrade(owner);
        let owner: Weak<dyn CloseRegistry<'a> + 'a> = weak;
        self.owner = Some(owner);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Like [`Producer::pull`], but reports a poisoned producer as an error
    /// rather than as exhaustion.
    pub fn try_pull(&mut self, visit: &mut dyn FnMut(U)) -> Result<bool> {
        if self.phase() == Phase::Poisoned {
            return Err(Error::Poisoned);
        }
        Ok(self.pull(visit))
    }

    /// Like [`Producer::drain`], but reports a poisoned producer as an error.
    pub fn try_drain(&mut self, visit: &mut dyn FnMut(U)) -> Result<()> {
        if self.phase() == Phase::Poisoned {
            return Err(Error::Poisoned);
        }
        self.drain(visit);
        Ok(())
    }

    /// Hand the level output over to the caller and finish this producer.
    ///
    /// Extracts the head first if that has not happened yet. The returned
    /// sequence is independent of `self`; this is how one chain splices itself
    /// into another.
    pub fn into_tail(mut self) -> Lazy<'a, U> {
        self.handoff().into()
    }

    /// Extract the head and build the level output, unless already done.
    /// Returns `false` once there is nothing left to produce.
    fn init(&mut self) -> bool {
        match self.state.take() {
            State::Pending { mut source, transform } => {
                let mut head = None;
                source.pull(&mut |value| head = Some(value));
                let Some(head) = head else {
                    trace!("source exhausted before a head was extracted");
                    self.finish();
                    return false;
                };

                let tail = source.traversed();
                let output = match transform(head, tail) {
                    Some(output) => self.adopt(output),
                    None => {
                        trace!("transform produced nothing for this level");
                        Link::empty()
                    }
                };
                trace!(chained = output.is_chained(), "head extracted");
                self.state = State::Active(output);
                true
            }
            State::Active(output) => {
                self.state = State::Active(output);
                true
            }
            State::Finished => {
                self.state = State::Finished;
                false
            }
            State::Poisoned => {
                warn!("demand on a poisoned head/tail producer");
                false
            }
        }
    }

    /// Strip close actions off a level output, forwarding them to the owner.
    ///
    /// An output built on the owner's own registry already reports there; any
    /// other registry it carries is closed along with the owner.
    fn adopt(&self, output: Lazy<'a, U>) -> Link<'a, U> {
        let (link, mut close, registry) = output.split();
        let owner = self.owner.as_ref().and_then(Weak::upgrade);
        if let Some(registry) = registry {
            let shared = owner.as_ref().is_some_and(|owner| {
                Rc::as_ptr(owner) as *const () == Rc::as_ptr(&registry) as *const ()
            });
            if !shared {
                close.push(Box::new(move || registry.close()));
            }
        }
        if close.is_empty() {
            return link;
        }
        match owner {
            Some(owner) => {
                trace!(actions = close.len(), "registering level close actions");
                owner.register_close(Box::new(move || {
                    for action in close {
                        action();
                    }
                }));
            }
            None => trace!(actions = close.len(), "no owner; dropping level close actions"),
        }
        link
    }

    fn handoff(&mut self) -> Link<'a, U> {
        if !self.init() {
            return Link::empty();
        }
        match self.state.take() {
            State::Active(output) => {
                self.finish();
                trace!("level output handed off");
                output
            }
            other => {
                self.state = other;
                Link::empty()
            }
        }
    }

    fn finish(&mut self) {
        self.state = State::Finished;
    }
}

impl<'a, T, U, F> Producer<U> for HeadTail<'a, T, U, F>
where
    T: 'a,
    U: 'a,
    F: FnOnce(T, Lazy<'a, T>) -> Option<Lazy<'a, U>> + 'a,
{
    fn pull(&mut self, visit: &mut dyn FnMut(U)) -> bool {
        if !self.init() {
            return false;
        }
        match self.state.take() {
            State::Active(mut output) => {
                if output.pull(visit) {
                    self.state = State::Active(output);
                    return true;
                }
                trace!("head/tail producer exhausted");
                self.finish();
                false
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    fn drain(&mut self, visit: &mut dyn FnMut(U)) {
        if !self.init() {
            return;
        }
        match self.state.take() {
            State::Active(mut output) => {
                output.drain(visit);
                trace!("head/tail producer drained");
                self.finish();
            }
            other => self.state = other,
        }
    }

    fn estimate_size(&self) -> Estimate {
        match &self.state {
            State::Pending { source, .. } => source.estimate_size().decrement(),
            State::Active(output) => output.estimate_size(),
            State::Finished | State::Poisoned => Estimate::EMPTY,
        }
    }
}

impl<'a, T, U, F> TailCall<'a, U> for HeadTail<'a, T, U, F>
where
    T: 'a,
    U: 'a,
    F: FnOnce(T, Lazy<'a, T>) -> Option<Lazy<'a, U>> + 'a,
{
    fn tail(mut self: Box<Self>) -> Tail<'a, U> {
        Either::Right(self.handoff())
    }
}

impl<'a, T, U, F> Iterator for HeadTail<'a, T, U, F>
where
    T: 'a,
    U: 'a,
    F: FnOnce(T, Lazy<'a, T>) -> Option<Lazy<'a, U>> + 'a,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        let mut out = None;
        self.pull(&mut |value| out = Some(value));
        out
    }
}

impl<T, U, F> fmt::Debug for HeadTail<'_, T, U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadTail")
            .field("phase", &self.state.phase())
            .field("owner", &self.owner.is_some())
            .finish()
    }
}
