//! Combinator mirrors for futures that resolve to an [`Outcome`].
//!
//! Each method awaits the receiver exactly once and then delegates to the
//! synchronous combinator of the same shape. Panics and cancellation of the
//! awaited future travel through the ordinary async channel; the `Outcome`
//! error channel is untouched by them.

use std::future::Future;

use super::Outcome;

/// Extension methods available on any `Future<Output = Outcome<V, E>>`.
///
/// ```
/// use outcome_core::{FutureOutcomeExt, Outcome};
///
/// async fn fetch() -> Outcome<i32, String> {
///     Outcome::ok(20)
/// }
///
/// # async fn demo() {
/// let doubled = fetch().map_ok(|n| n * 2).await;
/// assert_eq!(doubled, Outcome::ok(40));
/// # }
/// ```
pub trait FutureOutcomeExt<V, E>: Future<Output = Outcome<V, E>> + Sized {
    /// Async mirror of [`Outcome::map`].
    fn map_ok<U, F>(self, f: F) -> impl Future<Output = Outcome<U, E>>
    where
        F: FnOnce(V) -> U,
    {
        async move { self.await.map(f) }
    }

    /// Async mirror of [`Outcome::map_err`].
    fn map_err<F2, G>(self, g: G) -> impl Future<Output = Outcome<V, F2>>
    where
        G: FnOnce(E) -> F2,
    {
        async move { self.await.map_err(g) }
    }

    /// Async mirror of [`Outcome::and_then`]. The continuation is never
    /// invoked when the awaited value is `Err`.
    fn and_then<U, F>(self, f: F) -> impl Future<Output = Outcome<U, E>>
    where
        F: FnOnce(V) -> Outcome<U, E>,
    {
        async move { self.await.and_then(f) }
    }

    /// Async mirror of [`Outcome::or_else`]. The continuation is never
    /// invoked when the awaited value is `Ok`.
    fn or_else<F2, G>(self, g: G) -> impl Future<Output = Outcome<V, F2>>
    where
        G: FnOnce(E) -> Outcome<V, F2>,
    {
        async move { self.await.or_else(g) }
    }

    /// Async mirror of [`Outcome::unwrap_or`].
    fn unwrap_or(self, fallback: V) -> impl Future<Output = V> {
        async move { self.await.unwrap_or(fallback) }
    }

    /// Async mirror of [`Outcome::unwrap_or_else`].
    fn unwrap_or_else<F>(self, f: F) -> impl Future<Output = V>
    where
        F: FnOnce(E) -> V,
    {
        async move { self.await.unwrap_or_else(f) }
    }
}

impl<Fut, V, E> FutureOutcomeExt<V, E> for Fut where Fut: Future<Output = Outcome<V, E>> {}

/// Async mirror of [`Outcome::flatten`].
pub async fn flatten<Fut, V, E>(fut: Fut) -> Outcome<V, E>
where
    Fut: Future<Output = Outcome<Outcome<V, E>, E>>,
{
    fut.await.flatten()
}
