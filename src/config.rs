use std::rc::Rc;

use crate::{JobState, RetriggerPolicy, TaskQueue};

/// Options of [`with_job`](crate::with_job).
pub struct Config<P, T, E> {
	pub(crate) policy: RetriggerPolicy<P, T, E>,
	pub(crate) queue: Option<Rc<dyn TaskQueue>>,
}

impl<P, T, E> Default for Config<P, T, E> {
	fn default() -> Self {
		Config {
			policy: RetriggerPolicy::never(),
			queue: crate::queue::default_queue(),
		}
	}
}

impl<P, T, E> Config<P, T, E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Consulted with the previous props, the next props and the current job
	/// state whenever props change. The job restarts when it returns `true`.
	#[must_use]
	pub fn should_work_again(
		mut self,
		predicate: impl Fn(&P, &P, &JobState<T, E>) -> bool + 'static,
	) -> Self {
		self.policy = RetriggerPolicy::new(predicate);
		self
	}

	#[must_use]
	pub fn task_queue(mut self, queue: impl TaskQueue + 'static) -> Self {
		self.queue = Some(Rc::new(queue));
		self
	}
}
