use std::iter::Fuse;

use crate::{Estimate, Producer};

/// Producer with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<T> Producer<T> for Empty {
    fn pull(&mut self, _visit: &mut dyn FnMut(T)) -> bool {
        false
    }

    fn drain(&mut self, _visit: &mut dyn FnMut(T)) {}

    fn estimate_size(&self) -> Estimate {
        Estimate::EMPTY
    }
}

/// Produces a single value, then is exhausted.
#[derive(Debug, Clone)]
pub struct Once<T>(Option<T>);

impl<T> Once<T> {
    pub fn new(value: T) -> Self {
        Once(Some(value))
    }
}

impl<T> Producer<T> for Once<T> {
    fn pull(&mut self, visit: &mut dyn FnMut(T)) -> bool {
        match self.0.take() {
            Some(value) => {
                visit(value);
                true
            }
            None => false,
        }
    }

    fn estimate_size(&self) -> Estimate {
        Estimate::Finite(usize::from(self.0.is_some()))
    }
}

/// Lazily pulls from a standard iterator.
///
/// The iterator is fused, so a source that yields again after `None` is never
/// observed doing so.
#[derive(Debug, Clone)]
pub struct FromIter<I>(Fuse<I>);

impl<I: Iterator> FromIter<I> {
    pub fn new<S>(iter: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        FromIter(iter.into_iter().fuse())
    }
}

impl<I: Iterator> Producer<I::Item> for FromIter<I> {
    fn pull(&mut self, visit: &mut dyn FnMut(I::Item)) -> bool {
        match self.0.next() {
            Some(value) => {
                visit(value);
                true
            }
            None => false,
        }
    }

    fn drain(&mut self, visit: &mut dyn FnMut(I::Item)) {
        for value in &mut self.0 {
            visit(value);
        }
    }

    fn estimate_size(&self) -> Estimate {
        Estimate::from_size_hint(self.0.size_hint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_yields_single_value() {
        let mut once = Once::new("x");
        assert_eq!(once.estimate_size(), Estimate::Finite(1));

        let mut seen = Vec::new();
        assert!(once.pull(&mut |v| seen.push(v)));
        assert!(!once.pull(&mut |v| seen.push(v)));
        assert_eq!(seen, vec!["x"]);
        assert_eq!(once.estimate_size(), Estimate::EMPTY);
    }

    #[test]
    fn test_from_iter_is_lazy() {
        let mut pulled = 0;
        let mut seen = Vec::new();
        {
            let mut producer = FromIter::new((0..10).inspect(|_| pulled += 1));
            assert!(producer.pull(&mut |v| seen.push(v)));
            assert!(producer.pull(&mut |v| seen.push(v)));
        }
        assert_eq!(pulled, 2);
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn test_from_iter_estimate_tracks_progress() {
        let mut producer = FromIter::new(vec![1, 2, 3]);
        assert_eq!(producer.estimate_size(), Estimate::Finite(3));
        producer.pull(&mut |_| {});
        assert_eq!(producer.estimate_size(), Estimate::Finite(2));

        let endless = FromIter::new(std::iter::repeat(1));
        assert_eq!(endless.estimate_size(), Estimate::Infinite);

        let filtered = FromIter::new(std::iter::repeat(1).take_while(|_| true));
        assert_eq!(filtered.estimate_size(), Estimate::Unknown);
    }

    #[test]
    fn test_empty() {
        let mut seen: Vec<u8> = Vec::new();
        assert!(!Empty.pull(&mut |v| seen.push(v)));
        assert_eq!(Producer::<u8>::estimate_size(&Empty), Estimate::EMPTY);
    }
}
