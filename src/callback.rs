//! Callback/future duality for pipeline operations.
//!
//! Every boundary operation on [`Client`](crate::Client) accepts an optional
//! trailing callback, mirroring the error-first `(err, result)` convention the
//! provider's other client libraries expose. With a callback the outcome is
//! delivered to it and the operation returns `None`, leaving the caller with
//! nothing further to handle. Without one, the operation returns
//! `Some(outcome)` and behaves like any future-returning API.
//!
//! [`settle`] is the single point where an outcome is routed one way or the
//! other; the pipeline itself only ever produces a [`Result`].

use crate::{Body, Result};

/// An error-first completion callback for a pipeline operation.
///
/// # Examples
///
/// ```no_run
/// use postwing::{Callback, Client, RequestSpec};
///
/// # async fn example() -> Result<(), postwing::Error> {
/// let client = Client::builder().api_key("my-key").build()?;
///
/// let callback: Callback = Box::new(|outcome| match outcome {
///     Ok(body) => println!("templates: {:?}", body),
///     Err(e) => eprintln!("request failed: {}", e),
/// });
///
/// let returned = client.get(RequestSpec::new("templates"), Some(callback)).await;
/// assert!(returned.is_none());
/// # Ok(())
/// # }
/// ```
pub type Callback = Box<dyn FnOnce(Result<Body>) + Send + 'static>;

/// Routes an outcome to the callback, or back to the caller.
///
/// Returns `None` when a callback consumed the outcome and `Some(outcome)`
/// otherwise. This is the only place the two delivery modes meet, so success
/// and failure have exactly one source of truth.
pub(crate) fn settle(outcome: Result<Body>, callback: Option<Callback>) -> Option<Result<Body>> {
    match callback {
        Some(callback) => {
            callback(outcome);
            None
        }
        None => Some(outcome),
    }
}
