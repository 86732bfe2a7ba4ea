//! Parallel utilities with feature-gated implementations
//!
//! With the `native` feature (default) these use rayon; without it they fall
//! back to sequential iteration. Output order always matches input order.

/// Check if parallel processing is available
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "native")
}

/// Parallel map over a slice
#[cfg(feature = "native")]
pub(crate) fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map (fallback when parallel is not available)
#[cfg(not(feature = "native"))]
pub(crate) fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Parallel map with index
#[cfg(feature = "native")]
pub(crate) fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Sequential map with index (fallback)
#[cfg(not(feature = "native"))]
pub(crate) fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}

/// Parallel filter_map with index
#[cfg(feature = "native")]
pub(crate) fn parallel_filter_map_indexed<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> Option<U> + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter()
        .enumerate()
        .filter_map(|(i, x)| f(i, x))
        .collect()
}

/// Sequential filter_map with index (fallback)
#[cfg(not(feature = "native"))]
pub(crate) fn parallel_filter_map_indexed<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(usize, &T) -> Option<U>,
{
    data.iter()
        .enumerate()
        .filter_map(|(i, x)| f(i, x))
        .collect()
}
