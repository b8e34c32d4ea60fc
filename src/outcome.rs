use std::future::Future;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::{Error, TaskQueue};

/// What a work function produced: a value that is available now, or one
/// that settles later.
pub enum Outcome<T, E> {
	Ready(Result<T, E>),
	Deferred(Deferred<T, E>),
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
	fn from(result: Result<T, E>) -> Self {
		Outcome::Ready(result)
	}
}

impl<T, E> From<Deferred<T, E>> for Outcome<T, E> {
	fn from(deferred: Deferred<T, E>) -> Self {
		Outcome::Deferred(deferred)
	}
}

/// A result that is not available yet.
pub struct Deferred<T, E> {
	future: LocalBoxFuture<'static, Result<T, E>>,
}

impl<T, E> Deferred<T, E>
where
	T: 'static,
	E: 'static,
{
	pub fn new(future: impl Future<Output = Result<T, E>> + 'static) -> Self {
		Deferred {
			future: future.boxed_local(),
		}
	}

	/// Registers the success and failure continuations. Exactly one of them
	/// runs, on `queue`, once the value settles.
	pub fn then(
		self,
		queue: &dyn TaskQueue,
		on_success: impl FnOnce(T) + 'static,
		on_failure: impl FnOnce(E) + 'static,
	) -> Result<(), Error> {
		let future = self.future;
		queue.enqueue(
			async move {
				match future.await {
					Ok(value) => on_success(value),
					Err(error) => on_failure(error),
				}
			}
			.boxed_local(),
		)
	}
}
