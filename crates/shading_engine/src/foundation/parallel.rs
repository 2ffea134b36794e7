//! Ordered map over independent per-instruction work
//!
//! With the `parallel` feature the closure runs on the rayon thread pool;
//! `collect` on an indexed parallel iterator keeps the input order, so the
//! output is identical to the serial build.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `f` over `items`, preserving input order in the result
#[cfg(feature = "parallel")]
pub fn ordered_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Map `f` over `items`, preserving input order in the result
#[cfg(not(feature = "parallel"))]
pub fn ordered_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    items.iter().map(f).collect()
}
