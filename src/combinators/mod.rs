mod concat;
mod leaf;

pub use concat::Concat;
pub use leaf::{Empty, FromIter, Once};
