use std::rc::Rc;

use crate::JobState;

pub type Observer<T, E> = Rc<dyn Fn(&JobState<T, E>)>;

/// Hands a settled job state to the host's observer.
///
/// Only asynchronous settlements are reported. Panics raised by the
/// observer propagate to the task queue that ran the continuation.
pub struct ResultNotifier<T, E> {
	observer: Option<Observer<T, E>>,
}

impl<T, E> Clone for ResultNotifier<T, E> {
	fn clone(&self) -> Self {
		ResultNotifier {
			observer: self.observer.clone(),
		}
	}
}

impl<T, E> Default for ResultNotifier<T, E> {
	fn default() -> Self {
		ResultNotifier { observer: None }
	}
}

impl<T, E> From<Option<Observer<T, E>>> for ResultNotifier<T, E> {
	fn from(observer: Option<Observer<T, E>>) -> Self {
		ResultNotifier { observer }
	}
}

impl<T, E> ResultNotifier<T, E> {
	pub fn new(observer: impl Fn(&JobState<T, E>) + 'static) -> Self {
		ResultNotifier {
			observer: Some(Rc::new(observer)),
		}
	}

	pub fn notify(&self, state: &JobState<T, E>) {
		debug_assert!(!state.in_progress);
		if let Some(observer) = &self.observer {
			observer(state);
		}
	}
}
