//! Values that are either available now or arrive later.
//!
//! Caption functions and item actions may answer synchronously or hand back a
//! future. [`Derived`] makes that distinction explicit instead of probing the
//! returned value at runtime.

use futures_util::future::{FutureExt, LocalBoxFuture};
use std::fmt;
use std::future::Future;

/// A value produced immediately or by a pending computation.
pub enum Derived<R> {
    /// The value is already available.
    Ready(R),
    /// The value is produced when the future completes.
    Pending(LocalBoxFuture<'static, R>),
}

impl<R> Derived<R> {
    /// Wraps a future as a pending value.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = R> + 'static,
    {
        Self::Pending(future.boxed_local())
    }

    /// Returns `true` if the value is available without waiting.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Waits for the value.
    pub async fn resolve(self) -> R {
        match self {
            Self::Ready(value) => value,
            Self::Pending(future) => future.await,
        }
    }
}

impl<R> From<R> for Derived<R> {
    fn from(value: R) -> Self {
        Self::Ready(value)
    }
}

impl<R: fmt::Debug> fmt::Debug for Derived<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}
