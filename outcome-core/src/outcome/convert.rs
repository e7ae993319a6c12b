//! Conversions into and out of [`Outcome`], including factories that turn
//! fallible or panicking operations into ordinary failure values.
//!
//! [`Outcome::from_fallible`] and [`Outcome::capture`] trade transparency
//! for inspectability: whatever goes wrong inside the callback, the caller
//! receives a plain `Err(Caught)` and no panic escapes.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use super::Outcome;

/// Failure value produced by the capturing factories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Caught {
    /// The fallible operation declined to produce a value.
    #[error("the fallible operation reported failure")]
    Failed,
    /// The operation panicked; the payload message is kept when it is a
    /// string, which covers `panic!("...")` and friends.
    #[error("the operation panicked: {0}")]
    Panicked(String),
}

/// Render a panic payload as text. Non-string payloads are summarized.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

impl<V, E> Outcome<V, E> {
    /// Convert into a std `Result`, dropping the metadata.
    #[inline]
    pub fn into_result(self) -> Result<V, E> {
        match self {
            Self::Ok(v, _) => Ok(v),
            Self::Err(e, _) => Err(e),
        }
    }

    /// Convert into an `Option` of the success payload, dropping error and
    /// metadata alike.
    #[inline]
    pub fn ok_value(self) -> Option<V> {
        self.into_value()
    }
}

impl<V, E> From<Result<V, E>> for Outcome<V, E> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(v) => Outcome::ok(v),
            Err(e) => Outcome::err(e),
        }
    }
}

impl<V> Outcome<V, Caught> {
    /// Run a fallible operation and capture its failure modes as data.
    ///
    /// `Some(v)` becomes `Ok(v)`; `None` becomes `Err(Caught::Failed)`; a
    /// panic inside `op` becomes `Err(Caught::Panicked(..))` and does not
    /// propagate.
    ///
    /// ```
    /// use outcome_core::{Caught, Outcome};
    ///
    /// let parsed = Outcome::from_fallible(|| "42".parse::<i32>().ok());
    /// assert_eq!(parsed, Outcome::ok(42));
    ///
    /// let failed = Outcome::from_fallible(|| "xx".parse::<i32>().ok());
    /// assert_eq!(failed, Outcome::err(Caught::Failed));
    /// ```
    pub fn from_fallible(op: impl FnOnce() -> Option<V>) -> Self {
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Some(v)) => Outcome::ok(v),
            Ok(None) => Outcome::err(Caught::Failed),
            Err(payload) => Outcome::err(Caught::Panicked(panic_message(payload))),
        }
    }

    /// Run an operation that is only expected to fail by panicking.
    ///
    /// The returned value is `Ok` unless `op` panics, in which case the
    /// panic is absorbed into `Err(Caught::Panicked(..))`.
    pub fn capture(op: impl FnOnce() -> V) -> Self {
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(v) => Outcome::ok(v),
            Err(payload) => Outcome::err(Caught::Panicked(panic_message(payload))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: Outcome<i32, String> = Ok(5).into();
        let err: Outcome<i32, String> = Err("boom".to_string()).into();
        assert_eq!(ok, Outcome::ok(5));
        assert_eq!(err, Outcome::err("boom".to_string()));
    }

    #[test]
    fn test_into_result_drops_metadata() {
        let ok: Outcome<i32, String> = Outcome::ok(5).with_meta("k", "v");
        assert_eq!(ok.into_result(), Ok(5));
        let err: Outcome<i32, String> = Outcome::err("boom".into());
        assert_eq!(err.into_result(), Err("boom".to_string()));
    }

    #[test]
    fn test_from_fallible_parse_success() {
        let parsed = Outcome::from_fallible(|| "42".parse::<i32>().ok());
        assert_eq!(parsed, Outcome::ok(42));
    }

    #[test]
    fn test_from_fallible_parse_failure() {
        let failed = Outcome::from_fallible(|| "xx".parse::<i32>().ok());
        assert_eq!(failed, Outcome::err(Caught::Failed));
        assert_eq!(
            failed.error().map(|e| e.to_string()),
            Some("the fallible operation reported failure".to_string())
        );
    }

    #[test]
    fn test_from_fallible_absorbs_panic() {
        let caught: Outcome<i32, Caught> = Outcome::from_fallible(|| panic!("exploded"));
        match caught.error() {
            Some(Caught::Panicked(msg)) => assert_eq!(msg, "exploded"),
            other => panic!("expected Panicked, got {other:?}"),
        }
    }

    #[test]
    fn test_capture_ok() {
        let out = Outcome::capture(|| 2 + 2);
        assert_eq!(out, Outcome::ok(4));
    }

    #[test]
    fn test_capture_absorbs_formatted_panic() {
        let out: Outcome<i32, Caught> = Outcome::capture(|| panic!("bad index {}", 9));
        match out.error() {
            Some(Caught::Panicked(msg)) => assert_eq!(msg, "bad index 9"),
            other => panic!("expected Panicked, got {other:?}"),
        }
    }

    #[test]
    fn test_caught_display() {
        assert_eq!(
            Caught::Panicked("boom".into()).to_string(),
            "the operation panicked: boom"
        );
    }
}
