//! Commonly used imports
//!
//! Use `use headtail::prelude::*;` for quick access to the most common types.

// Core protocol
pub use crate::{Advance, Link, Producer, TailCall};

// Sequences and the decomposing producer
pub use crate::{HeadTail, Lazy, Phase};

// Estimates and cleanup
pub use crate::{CloseRegistry, Closer, Estimate};
