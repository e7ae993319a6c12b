//! The `Outcome` value: a closed success/error union with a metadata
//! side-channel.
//!
//! An [`Outcome<V, E>`] is always exactly one of `Ok(V, Metadata)` or
//! `Err(E, Metadata)`. There is no third state to construct and no way to
//! mutate an existing value; every transformation builds a new one.
//! Metadata rides along with either variant, is preserved verbatim by the
//! combinators, and never participates in equality or hashing.
//!
//! # Module Organization
//!
//! - [`metadata`]: the immutable key-value side-channel
//! - [`combinators`]: `map`, `and_then`, `or_else` and friends
//! - [`convert`]: std `Result` interop and panic-capturing factories
//! - [`iter`]: 0-or-1 iteration over the success payload
//! - [`future`]: combinator mirrors for futures resolving to an `Outcome`

pub mod combinators;
pub mod convert;
pub mod future;
pub mod iter;
pub mod metadata;

use std::hash::{Hash, Hasher};

pub use convert::Caught;
pub use future::FutureOutcomeExt;
pub use iter::{IntoIter, Iter};
pub use metadata::{MetaValue, Metadata};

/// A success (`Ok`) or failure (`Err`) value carrying opaque metadata.
///
/// The two variants are the whole story: the enum is closed by construction
/// and a value of any other shape is unrepresentable. The second field of
/// each variant is the metadata side-channel; prefer the [`Outcome::ok`] and
/// [`Outcome::err`] factories, which attach an empty map.
///
/// ```
/// use outcome_core::Outcome;
///
/// fn halve(n: i32) -> Outcome<i32, String> {
///     if n % 2 == 0 {
///         Outcome::ok(n / 2)
///     } else {
///         Outcome::err(format!("{n} is odd"))
///     }
/// }
///
/// assert_eq!(halve(10).map(|n| n + 1), Outcome::ok(6));
/// assert!(halve(3).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Outcome<V, E> {
    /// The success case.
    Ok(V, Metadata),
    /// The failure case.
    Err(E, Metadata),
}

impl<V, E> Outcome<V, E> {
    /// Construct a success value with empty metadata.
    #[inline]
    pub fn ok(value: V) -> Self {
        Self::Ok(value, Metadata::new())
    }

    /// Construct a failure value with empty metadata.
    #[inline]
    pub fn err(error: E) -> Self {
        Self::Err(error, Metadata::new())
    }

    /// Construct a success value with the given metadata.
    #[inline]
    pub fn ok_with(value: V, meta: Metadata) -> Self {
        Self::Ok(value, meta)
    }

    /// Construct a failure value with the given metadata.
    #[inline]
    pub fn err_with(error: E, meta: Metadata) -> Self {
        Self::Err(error, meta)
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(..))
    }

    #[inline]
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Err(..))
    }

    /// Borrow the success payload, if present.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Ok(v, _) => Some(v),
            Self::Err(..) => None,
        }
    }

    /// Borrow the failure payload, if present.
    #[inline]
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Ok(..) => None,
            Self::Err(e, _) => Some(e),
        }
    }

    /// Consume the value and return the success payload, if present.
    #[inline]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Ok(v, _) => Some(v),
            Self::Err(..) => None,
        }
    }

    /// Consume the value and return the failure payload, if present.
    #[inline]
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Ok(..) => None,
            Self::Err(e, _) => Some(e),
        }
    }

    /// Extract the success payload, or hand back the failure re-typed
    /// against a fresh value parameter with its metadata intact.
    ///
    /// This supports the early-return idiom:
    ///
    /// ```
    /// use outcome_core::Outcome;
    ///
    /// fn step(input: Outcome<i32, String>) -> Outcome<String, String> {
    ///     let n = match input.take_value() {
    ///         Ok(n) => n,
    ///         Err(failure) => return failure,
    ///     };
    ///     Outcome::ok(format!("{n}"))
    /// }
    ///
    /// assert_eq!(step(Outcome::ok(4)), Outcome::ok("4".to_string()));
    /// assert_eq!(step(Outcome::err("no".into())), Outcome::err("no".to_string()));
    /// ```
    #[inline]
    pub fn take_value<U>(self) -> Result<V, Outcome<U, E>> {
        match self {
            Self::Ok(v, _) => Ok(v),
            Self::Err(e, meta) => Err(Outcome::Err(e, meta)),
        }
    }

    /// Extract the failure payload, or hand back the success re-typed
    /// against a fresh error parameter with its metadata intact.
    #[inline]
    pub fn take_error<F>(self) -> Result<E, Outcome<V, F>> {
        match self {
            Self::Ok(v, meta) => Err(Outcome::Ok(v, meta)),
            Self::Err(e, _) => Ok(e),
        }
    }

    /// Return the success payload, panicking on `Err`.
    ///
    /// This is a programmer-error signal, not a recoverable condition. Use
    /// [`Outcome::unwrap_or`] or [`Outcome::unwrap_or_else`] to recover.
    #[track_caller]
    pub fn unwrap(self) -> V {
        match self {
            Self::Ok(v, _) => v,
            Self::Err(..) => panic!("called `Outcome::unwrap()` on an `Err` value"),
        }
    }

    /// Return the success payload, panicking with `msg` on `Err`.
    #[track_caller]
    pub fn expect(self, msg: &str) -> V {
        match self {
            Self::Ok(v, _) => v,
            Self::Err(..) => panic!("{msg}: expected `Ok`, found `Err`"),
        }
    }

    /// Return the failure payload, panicking on `Ok`.
    #[track_caller]
    pub fn unwrap_err(self) -> E {
        match self {
            Self::Ok(..) => panic!("called `Outcome::unwrap_err()` on an `Ok` value"),
            Self::Err(e, _) => e,
        }
    }

    /// Return the failure payload, panicking with `msg` on `Ok`.
    #[track_caller]
    pub fn expect_err(self, msg: &str) -> E {
        match self {
            Self::Ok(..) => panic!("{msg}: expected `Err`, found `Ok`"),
            Self::Err(e, _) => e,
        }
    }

    /// Return the success payload or the given fallback.
    #[inline]
    pub fn unwrap_or(self, fallback: V) -> V {
        match self {
            Self::Ok(v, _) => v,
            Self::Err(..) => fallback,
        }
    }

    /// Return the success payload or a fallback computed from the error.
    #[inline]
    pub fn unwrap_or_else(self, f: impl FnOnce(E) -> V) -> V {
        match self {
            Self::Ok(v, _) => v,
            Self::Err(e, _) => f(e),
        }
    }

    /// Return the success payload or the value type's default.
    #[inline]
    pub fn unwrap_or_default(self) -> V
    where
        V: Default,
    {
        match self {
            Self::Ok(v, _) => v,
            Self::Err(..) => V::default(),
        }
    }

    /// Borrow this value's metadata.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Ok(_, meta) | Self::Err(_, meta) => meta,
        }
    }

    /// Return a new value, same variant and payload, with `key` set.
    ///
    /// The receiver is unchanged; an existing entry under `key` is
    /// overwritten in the copy.
    #[must_use]
    pub fn with_meta(self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        match self {
            Self::Ok(v, meta) => Self::Ok(v, meta.with(key, value)),
            Self::Err(e, meta) => Self::Err(e, meta.with(key, value)),
        }
    }

    /// Return a new value with `extra` overlaid onto the current metadata.
    ///
    /// On key collision the entry from `extra` wins.
    #[must_use]
    pub fn with_meta_all(self, extra: &Metadata) -> Self {
        match self {
            Self::Ok(v, meta) => Self::Ok(v, meta.merged(extra)),
            Self::Err(e, meta) => Self::Err(e, meta.merged(extra)),
        }
    }
}

/// Equality depends only on the variant tag and payload. Metadata is
/// deliberately excluded.
impl<V: PartialEq, E: PartialEq> PartialEq for Outcome<V, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ok(a, _), Self::Ok(b, _)) => a == b,
            (Self::Err(a, _), Self::Err(b, _)) => a == b,
            _ => false,
        }
    }
}

impl<V: Eq, E: Eq> Eq for Outcome<V, E> {}

/// Hashing matches equality: variant tag plus payload, never metadata.
impl<V: Hash, E: Hash> Hash for Outcome<V, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Ok(v, _) => {
                state.write_u8(0);
                v.hash(state);
            }
            Self::Err(e, _) => {
                state.write_u8(1);
                e.hash(state);
            }
        }
    }
}
