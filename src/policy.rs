use std::rc::Rc;

use crate::JobState;

type Predicate<P, T, E> = dyn Fn(&P, &P, &JobState<T, E>) -> bool;

/// Decides whether new props restart the job.
///
/// Without a predicate the job never runs again after activation.
pub struct RetriggerPolicy<P, T, E> {
	predicate: Option<Rc<Predicate<P, T, E>>>,
}

impl<P, T, E> Clone for RetriggerPolicy<P, T, E> {
	fn clone(&self) -> Self {
		RetriggerPolicy {
			predicate: self.predicate.clone(),
		}
	}
}

impl<P, T, E> Default for RetriggerPolicy<P, T, E> {
	fn default() -> Self {
		RetriggerPolicy::never()
	}
}

impl<P, T, E> RetriggerPolicy<P, T, E> {
	pub fn never() -> Self {
		RetriggerPolicy { predicate: None }
	}

	pub fn new(predicate: impl Fn(&P, &P, &JobState<T, E>) -> bool + 'static) -> Self {
		RetriggerPolicy {
			predicate: Some(Rc::new(predicate)),
		}
	}

	pub fn should_work_again(&self, prev: &P, next: &P, state: &JobState<T, E>) -> bool {
		match &self.predicate {
			Some(predicate) => predicate(prev, next, state),
			None => false,
		}
	}
}
