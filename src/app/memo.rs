//! Memoized derivations keyed on a parameter tuple.
//!
//! A [`Memoized`] cell remembers the last parameters it was called with and the
//! value (or pending computation) they produced. Calling it again with equal
//! parameters hands back the stored computation without recomputing; any
//! difference recomputes and replaces both.
//!
//! Pending computations are stored as [`Shared`] futures so the same
//! computation can be handed to several callers. [`Memoized::current`] only
//! ever reports a *settled* value: while the latest computation is still
//! pending it reports `None` rather than an older result.
//!
//! The menu keeps two of these: one for the caption, keyed on the context
//! generation, and one for the filtered item list, keyed on
//! `(items, query, generation)`.

use crate::domain::{Derived, MenuError, Result};
use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use std::fmt;

/// A memoized value as handed back to callers.
///
/// Cloning a pending computation shares the underlying future; awaiting any
/// clone drives it to completion for all of them.
pub enum Computation<R: Clone> {
    Ready(R),
    Pending(Shared<LocalBoxFuture<'static, R>>),
}

impl<R: Clone> Computation<R> {
    fn from_derived(derived: Derived<R>) -> Self {
        match derived {
            Derived::Ready(value) => Self::Ready(value),
            Derived::Pending(future) => Self::Pending(future.shared()),
        }
    }

    /// The value, if it has settled.
    #[must_use]
    pub fn settled(&self) -> Option<R> {
        match self {
            Self::Ready(value) => Some(value.clone()),
            Self::Pending(shared) => shared.peek().cloned(),
        }
    }

    /// Waits for the value.
    pub async fn resolve(self) -> R {
        match self {
            Self::Ready(value) => value,
            Self::Pending(shared) => shared.await,
        }
    }
}

impl<R: Clone> Clone for Computation<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(value) => Self::Ready(value.clone()),
            Self::Pending(shared) => Self::Pending(shared.clone()),
        }
    }
}

impl<R: Clone + fmt::Debug> fmt::Debug for Computation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(shared) => f.debug_tuple("Pending").field(&shared.peek()).finish(),
        }
    }
}

/// Cache cell holding the last parameters and what they produced.
pub struct Memoized<P, R: Clone> {
    params: Option<P>,
    value: Option<Computation<R>>,
}

impl<P: PartialEq, R: Clone> Memoized<P, R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: None,
            value: None,
        }
    }

    /// Returns the computation for `params`, running `compute` only if
    /// `params` differ from the previous call's.
    pub fn call(&mut self, params: P, compute: impl FnOnce(&P) -> Derived<R>) -> Computation<R> {
        if let (Some(previous), Some(value)) = (&self.params, &self.value) {
            if *previous == params {
                return value.clone();
            }
        }

        let computation = Computation::from_derived(compute(&params));
        tracing::trace!(ready = matches!(computation, Computation::Ready(_)), "memoized value recomputed");
        self.params = Some(params);
        self.value = Some(computation.clone());
        computation
    }

    /// The last settled value.
    ///
    /// Returns `Ok(None)` while the latest computation is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Uninitialized`] if [`call`](Self::call) has never
    /// been invoked.
    pub fn current(&self) -> Result<Option<R>> {
        self.value
            .as_ref()
            .map(Computation::settled)
            .ok_or(MenuError::Uninitialized)
    }

    /// Returns `true` once [`call`](Self::call) has been invoked.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.value.is_some()
    }
}

impl<P: PartialEq, R: Clone> Default for Memoized<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug, R: Clone + fmt::Debug> fmt::Debug for Memoized<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("params", &self.params)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[test]
    fn current_before_first_call_is_uninitialized() {
        let memo: Memoized<u64, String> = Memoized::new();

        assert!(matches!(memo.current(), Err(MenuError::Uninitialized)));
        assert!(!memo.is_initialized());
    }

    #[test]
    fn equal_params_compute_once() {
        let calls = Cell::new(0);
        let mut memo = Memoized::new();

        for _ in 0..3 {
            memo.call(("ctx", 0_u64), |_| {
                calls.set(calls.get() + 1);
                Derived::Ready("caption".to_string())
            });
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(memo.current().unwrap().as_deref(), Some("caption"));
    }

    #[test]
    fn different_params_recompute() {
        let calls = Cell::new(0);
        let mut memo = Memoized::new();

        for generation in [0_u64, 0, 1, 1, 2] {
            memo.call(generation, |g| {
                calls.set(calls.get() + 1);
                Derived::Ready(*g * 10)
            });
        }

        assert_eq!(calls.get(), 3);
        assert_eq!(memo.current().unwrap(), Some(20));
    }

    #[test]
    fn pending_value_is_not_current_until_settled() {
        let (tx, rx) = oneshot::channel::<String>();
        let mut memo = Memoized::new();
        memo.call(0_u64, |_| Derived::Ready("old".to_string()));

        let computation = memo.call(1, |_| {
            Derived::pending(async move { rx.await.unwrap_or_default() })
        });

        assert_eq!(memo.current().unwrap(), None);

        tx.send("new".to_string()).unwrap();
        assert_eq!(block_on(computation.resolve()), "new");
        assert_eq!(memo.current().unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn repeated_call_shares_the_pending_computation() {
        let calls = Cell::new(0);
        let mut memo = Memoized::new();

        let first = memo.call(5_u64, |_| {
            calls.set(calls.get() + 1);
            Derived::pending(async { 42_u32 })
        });
        let second = memo.call(5, |_| {
            calls.set(calls.get() + 1);
            Derived::pending(async { 0_u32 })
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(block_on(second.resolve()), 42);
        assert_eq!(first.settled(), Some(42));
    }
}
