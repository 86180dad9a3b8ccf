//! Deep recursive decompositions must run in constant stack.
//!
//! Each test runs on a thread with a deliberately small stack; a traversal
//! that recursed once per level would overflow it long before finishing.

use std::{iter, thread};

use headtail::prelude::*;

const DEPTH: usize = 100_000;
const SMALL_STACK: usize = 256 * 1024;

fn on_small_stack<R, F>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    thread::Builder::new()
        .stack_size(SMALL_STACK)
        .spawn(f)
        .expect("spawn test thread")
        .join()
        .expect("test thread panicked")
}

fn skip<'a, T: 'a>(seq: Lazy<'a, T>, n: usize) -> Lazy<'a, T> {
    seq.head_tail(move |head, tail| {
        if n == 0 {
            Some(tail.prepend(head))
        } else {
            Some(skip(tail, n - 1))
        }
    })
}

fn squares<'a>(seq: Lazy<'a, u64>) -> Lazy<'a, u64> {
    seq.head_tail(|head, tail| Some(squares(tail).prepend(head * head)))
}

fn evens<'a>(seq: Lazy<'a, u64>) -> Lazy<'a, u64> {
    seq.head_tail(|head, tail| {
        if head % 2 == 0 {
            Some(evens(tail).prepend(head))
        } else {
            Some(evens(tail))
        }
    })
}

/// Re-emits every 50,000th element; every other level concatenates an empty
/// run in front of the recursive rest.
fn gaps<'a>(seq: Lazy<'a, u64>) -> Lazy<'a, u64> {
    seq.head_tail(|head, tail| {
        let n = usize::from(head % 50_000 == 0);
        Some(Lazy::of(iter::repeat(head).take(n)).concat(gaps(tail)))
    })
}

#[test]
fn test_deep_skip_drains() {
    let out = on_small_stack(|| {
        let mut out = Vec::new();
        skip(Lazy::of(0..DEPTH as u64 + 3), DEPTH).drain(&mut |x| out.push(x));
        out
    });
    assert_eq!(out, vec![DEPTH as u64, DEPTH as u64 + 1, DEPTH as u64 + 2]);
}

#[test]
fn test_deep_skip_pulls() {
    let first = on_small_stack(|| skip(Lazy::of(0..DEPTH as u64 + 1), DEPTH).next());
    assert_eq!(first, Some(DEPTH as u64));
}

#[test]
fn test_deep_map_drains() {
    let (count, last) = on_small_stack(|| {
        let mut count = 0usize;
        let mut last = 0u64;
        squares(Lazy::of(0..DEPTH as u64)).drain(&mut |x| {
            count += 1;
            last = x;
        });
        (count, last)
    });
    assert_eq!(count, DEPTH);
    let top = DEPTH as u64 - 1;
    assert_eq!(last, top * top);
}

#[test]
fn test_deep_map_iterates() {
    let sum = on_small_stack(|| squares(Lazy::of(0..DEPTH as u64)).take(DEPTH).sum::<u64>());
    let expected: u64 = (0..DEPTH as u64).map(|x| x * x).sum();
    assert_eq!(sum, expected);
}

#[test]
fn test_deep_filter_with_long_gaps() {
    // Long runs of odd numbers are skipped by levels that emit nothing.
    let out = on_small_stack(|| {
        let source = (0..DEPTH as u64 * 2).filter(|x| x % 2 == 1 || x % 50_000 == 0);
        evens(Lazy::of(source)).collect::<Vec<_>>()
    });
    assert_eq!(out, vec![0, 50_000, 100_000, 150_000]);
}

#[test]
fn test_deep_chain_via_direct_producer() {
    let out = on_small_stack(|| {
        let mut producer = HeadTail::new(Lazy::of(0..DEPTH as u64 + 1), |_, tail| {
            Some(skip(tail, DEPTH - 1))
        });
        let mut out = Vec::new();
        producer.drain(&mut |x| out.push(x));
        (out, producer.phase())
    });
    assert_eq!(out, (vec![DEPTH as u64], Phase::Finished));
}

#[test]
fn test_deep_empty_concat_levels_drain() {
    let out = on_small_stack(|| {
        let mut out = Vec::new();
        gaps(Lazy::of(0..DEPTH as u64)).drain(&mut |x| out.push(x));
        out
    });
    assert_eq!(out, vec![0, 50_000]);
}

#[test]
fn test_deep_empty_concat_levels_iterate() {
    let out = on_small_stack(|| gaps(Lazy::of(0..DEPTH as u64)).collect::<Vec<_>>());
    assert_eq!(out, vec![0, 50_000]);
}
