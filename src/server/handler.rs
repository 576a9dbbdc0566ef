//! Async handler abstraction.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::server::error::HandlerError;
use crate::server::input::Input;
use crate::server::reply::{HandlerOutput, IntoOutput};

/// An operation implementation.
///
/// Implemented for every `Fn(Input) -> impl Future<Output = Result<O, HandlerError>>`
/// where `O: IntoOutput`, so plain async closures can be bound directly.
/// State is captured by the closure.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, input: Input) -> BoxFuture<'static, Result<HandlerOutput, HandlerError>>;
}

impl<F, Fut, O> Handler for F
where
    F: Fn(Input) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    O: IntoOutput,
{
    fn call(&self, input: Input) -> BoxFuture<'static, Result<HandlerOutput, HandlerError>> {
        let fut = (self)(input);
        Box::pin(async move { fut.await?.into_output() })
    }
}

/// Shared handler reference.
pub type BoxedHandler = Arc<dyn Handler>;
