//! # Headtail: lazy head/tail decomposition
//!
//! Split a single-pass sequence into its first element and a lazy remainder,
//! let a function decide what to produce from the two, and flatten arbitrarily
//! deep recursive decompositions into one forward-only stream in constant
//! stack.
//!
//! ## Core Types
//!
//! - **[`Producer<T>`]**: the pull protocol (`pull`, `drain`, `estimate_size`)
//! - **[`TailCall`]**: producers that can step aside and reveal their successor
//! - **[`Link`]**: a producer tagged `Terminal` or `Chained`
//! - **[`Lazy<T>`]**: the caller-facing sequence, with close actions
//! - **[`HeadTail`]**: the decomposing producer itself
//!
//! ## Example
//!
//! ```
//! use headtail::prelude::*;
//!
//! // Drop the first `n` elements, one decomposition level per element.
//! fn skip<'a, T: 'a>(seq: Lazy<'a, T>, n: usize) -> Lazy<'a, T> {
//!     seq.head_tail(move |head, tail| {
//!         if n == 0 {
//!             Some(tail.prepend(head))
//!         } else {
//!             Some(skip(tail, n - 1))
//!         }
//!     })
//! }
//!
//! let out: Vec<_> = skip(Lazy::of(0..10), 7).collect();
//! assert_eq!(out, vec![7, 8, 9]);
//! ```
//!
//! ## Guarantees
//!
//! - No element is pulled and no transform runs before something is demanded.
//! - Each transform runs at most once, for exactly one head.
//! - Chains of nested producers are walked by a loop, never by recursion.
//! - Size estimates are advisory only.
//!
//! Producers are single-threaded and single-consumer.

pub mod combinators;
mod error;
mod estimate;
mod head_tail;
mod lazy;
mod owner;
pub mod prelude;
mod producer;

pub use error::{Error, Result};
pub use estimate::Estimate;
pub use head_tail::{HeadTail, Phase};
pub use lazy::Lazy;
pub use owner::{CloseAction, CloseRegistry, Closer};
pub use producer::{Advance, Link, Producer, Tail, TailCall};
