//! Transformation and short-circuit combinators for [`Outcome`].
//!
//! Every combinator consumes its receiver and builds a fresh value; metadata
//! is carried through verbatim. The lazy forms (`and_then`, `or_else`) never
//! evaluate their continuation on the short-circuiting branch.

use super::{Metadata, Outcome};

impl<V, E> Outcome<V, E> {
    /// Apply `f` to the success payload; an `Err` passes through untouched.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Outcome<U, E> {
        match self {
            Self::Ok(v, meta) => Outcome::Ok(f(v), meta),
            Self::Err(e, meta) => Outcome::Err(e, meta),
        }
    }

    /// Apply `g` to the failure payload; an `Ok` passes through untouched.
    #[inline]
    pub fn map_err<F>(self, g: impl FnOnce(E) -> F) -> Outcome<V, F> {
        match self {
            Self::Ok(v, meta) => Outcome::Ok(v, meta),
            Self::Err(e, meta) => Outcome::Err(g(e), meta),
        }
    }

    /// Return `next` if this is `Ok`, otherwise the existing failure
    /// re-typed against `next`'s value parameter.
    ///
    /// `next` is eagerly evaluated at the call site; use
    /// [`Outcome::and_then`] when the continuation must stay lazy.
    #[inline]
    pub fn and<U>(self, next: Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Self::Ok(..) => next,
            Self::Err(e, meta) => Outcome::Err(e, meta),
        }
    }

    /// Feed the success payload into `f`; on `Err` the continuation is
    /// never invoked and the failure is re-typed as-is.
    #[inline]
    pub fn and_then<U>(self, f: impl FnOnce(V) -> Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Self::Ok(v, _) => f(v),
            Self::Err(e, meta) => Outcome::Err(e, meta),
        }
    }

    /// Return self if `Ok`, otherwise the fallback.
    ///
    /// The fallback is eagerly evaluated; use [`Outcome::or_else`] for a
    /// lazy fallback.
    #[inline]
    pub fn or<F>(self, fallback: Outcome<V, F>) -> Outcome<V, F> {
        match self {
            Self::Ok(v, meta) => Outcome::Ok(v, meta),
            Self::Err(..) => fallback,
        }
    }

    /// Return self if `Ok`; otherwise feed the failure payload into `f`.
    /// The continuation is never invoked on the success branch.
    #[inline]
    pub fn or_else<F>(self, f: impl FnOnce(E) -> Outcome<V, F>) -> Outcome<V, F> {
        match self {
            Self::Ok(v, meta) => Outcome::Ok(v, meta),
            Self::Err(e, _) => f(e),
        }
    }
}

impl<V, E> Outcome<Outcome<V, E>, E> {
    /// Collapse one level of nesting.
    ///
    /// `Ok(inner)` yields `inner` (with the inner value's own metadata);
    /// an outer `Err` passes through.
    #[inline]
    pub fn flatten(self) -> Outcome<V, E> {
        match self {
            Self::Ok(inner, _) => inner,
            Self::Err(e, meta) => Outcome::Err(e, meta),
        }
    }
}

impl<V, E> Outcome<V, E> {
    /// Keep the payloads, replace the metadata wholesale.
    ///
    /// Mostly useful to strip debugging context before comparing values in
    /// logs; prefer [`Outcome::with_meta`] for incremental updates.
    #[must_use]
    pub fn with_metadata(self, meta: Metadata) -> Self {
        match self {
            Self::Ok(v, _) => Self::Ok(v, meta),
            Self::Err(e, _) => Self::Err(e, meta),
        }
    }
}
