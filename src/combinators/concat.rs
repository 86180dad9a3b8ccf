use either::Either;

use crate::{Advance, Estimate, Link, Producer, Tail, TailCall};

/// Runs `left` to exhaustion, then continues with `right`.
///
/// The left side is dropped as soon as it reports exhaustion. From then on the
/// concatenation steps aside during traversal and hands `right` to the caller,
/// so recursive definitions such as "emit the head, then recurse on the tail"
/// never nest one concatenation inside another.
pub struct Concat<'a, T> {
    left: Option<Link<'a, T>>,
    right: Link<'a, T>,
}

impl<'a, T: 'a> Concat<'a, T> {
    pub fn new(left: Link<'a, T>, right: Link<'a, T>) -> Self {
        Concat {
            left: Some(left),
            right,
        }
    }
}

impl<'a, T: 'a> Producer<T> for Concat<'a, T> {
    fn pull(&mut self, visit: &mut dyn FnMut(T)) -> bool {
        if let Some(left) = self.left.as_mut() {
            if left.pull(visit) {
                return true;
            }
            self.left = None;
        }
        self.right.pull(visit)
    }

    fn drain(&mut self, visit: &mut dyn FnMut(T)) {
        if let Some(mut left) = self.left.take() {
            left.drain(visit);
        }
        self.right.drain(visit);
    }

    fn estimate_size(&self) -> Estimate {
        let right = self.right.estimate_size();
        match &self.left {
            Some(left) => left.estimate_size().saturating_add(right),
            None => right,
        }
    }
}

impl<'a, T: 'a> TailCall<'a, T> for Concat<'a, T> {
    fn tail(self: Box<Self>) -> Tail<'a, T> {
        if self.left.is_some() {
            return Either::Left(self);
        }
        Either::Right(self.right)
    }

    /// Never pulls from `right`: once `left` is gone the traversal loop takes
    /// over, so levels that contribute nothing do not stack up frames.
    fn advance(&mut self, visit: &mut dyn FnMut(T)) -> Advance {
        if let Some(left) = self.left.as_mut() {
            if left.pull(visit) {
                return Advance::Delivered;
            }
            self.left = None;
        }
        Advance::Retraverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{FromIter, Once};

    fn terminal<I>(iter: I) -> Link<'static, u32>
    where
        I: IntoIterator<Item = u32>,
        I::IntoIter: 'static,
    {
        Link::Terminal(Box::new(FromIter::new(iter)))
    }

    #[test]
    fn test_concat_pulls_left_then_right() {
        let mut concat = Concat::new(terminal([1, 2]), terminal([3]));
        let mut seen = Vec::new();
        while concat.pull(&mut |x| seen.push(x)) {}
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_concat_drain_after_partial_pull() {
        let mut concat = Concat::new(terminal([1, 2]), terminal([3, 4]));
        let mut seen = Vec::new();
        assert!(concat.pull(&mut |x| seen.push(x)));
        concat.drain(&mut |x| seen.push(x));
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert!(!concat.pull(&mut |x| seen.push(x)));
    }

    #[test]
    fn test_concat_stays_until_left_is_dropped() {
        let concat = Box::new(Concat::new(
            Link::Terminal(Box::new(Once::new(1))),
            terminal([2]),
        ));
        let mut stayed = match concat.tail() {
            Either::Left(stay) => stay,
            Either::Right(_) => panic!("left side still pending"),
        };

        let mut seen = Vec::new();
        assert!(stayed.pull(&mut |x| seen.push(x)));
        // Left is exhausted but not yet observed as such.
        let mut stayed = match stayed.tail() {
            Either::Left(stay) => stay,
            Either::Right(_) => panic!("left side not yet dropped"),
        };
        assert!(stayed.pull(&mut |x| seen.push(x)));
        match stayed.tail() {
            Either::Right(mut right) => assert!(!right.pull(&mut |x| seen.push(x))),
            Either::Left(_) => panic!("expected handoff to the right side"),
        }
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_advance_hands_control_back_once_left_is_empty() {
        let mut concat = Concat::new(terminal([1]), terminal([2]));
        let mut seen = Vec::new();
        assert_eq!(concat.advance(&mut |x| seen.push(x)), Advance::Delivered);
        assert_eq!(concat.advance(&mut |x| seen.push(x)), Advance::Retraverse);
        assert_eq!(seen, vec![1]);

        match Box::new(concat).tail() {
            Either::Right(mut right) => assert!(right.pull(&mut |x| seen.push(x))),
            Either::Left(_) => panic!("expected handoff to the right side"),
        }
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_nested_empty_levels_pull_through_link() {
        // Fifty levels that contribute nothing before the last one does.
        let inner = (0..50).fold(terminal([42]), |right, _| {
            Link::Chained(Box::new(Concat::new(terminal([]), right)))
        });
        let mut link = inner;
        let mut seen = Vec::new();
        assert!(link.pull(&mut |x| seen.push(x)));
        assert!(!link.pull(&mut |x| seen.push(x)));
        assert_eq!(seen, vec![42]);
    }

    #[test]
    fn test_concat_estimate() {
        let concat = Concat::new(terminal([1, 2]), terminal([3]));
        assert_eq!(concat.estimate_size(), Estimate::Finite(3));

        let endless = Concat::new(terminal([1]), terminal(std::iter::repeat(0)));
        assert_eq!(endless.estimate_size(), Estimate::Infinite);
    }
}
