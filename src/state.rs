use std::fmt::Debug;

/// Progress, result and error of the current job of a component instance.
///
/// A fresh state is idle. A deferred job keeps it `in_progress` until it
/// settles; a settled state is `completed` with exactly one of `result` or
/// `error` populated.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JobState<T, E> {
	pub in_progress: bool,
	pub completed: bool,
	pub result: Option<T>,
	pub error: Option<E>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum JobPhase {
	Idle,
	Running,
	Settled,
}

impl<T, E> Default for JobState<T, E> {
	fn default() -> Self {
		JobState::idle()
	}
}

impl<T, E> JobState<T, E> {
	pub fn idle() -> Self {
		JobState {
			in_progress: false,
			completed: false,
			result: None,
			error: None,
		}
	}

	pub fn succeeded(result: T) -> Self {
		JobState {
			in_progress: false,
			completed: true,
			result: Some(result),
			error: None,
		}
	}

	pub fn failed(error: E) -> Self {
		JobState {
			in_progress: false,
			completed: true,
			result: None,
			error: Some(error),
		}
	}

	pub fn phase(&self) -> JobPhase {
		if self.in_progress {
			JobPhase::Running
		} else if self.completed {
			JobPhase::Settled
		} else {
			JobPhase::Idle
		}
	}

	#[inline]
	pub fn is_running(&self) -> bool {
		self.phase() == JobPhase::Running
	}

	#[inline]
	pub fn is_settled(&self) -> bool {
		self.phase() == JobPhase::Settled
	}

	/// Marks a deferred job as outstanding. The previous result or error
	/// stays visible until the job settles.
	pub(crate) fn begin(&mut self) {
		self.in_progress = true;
		self.completed = false;
	}

	pub(crate) fn settle(&mut self, outcome: Result<T, E>) {
		self.in_progress = false;
		self.completed = true;
		match outcome {
			Ok(result) => {
				self.result = Some(result);
				self.error = None;
			}
			Err(error) => {
				self.result = None;
				self.error = Some(error);
			}
		}
	}
}

impl<T, E> Debug for JobState<T, E>
where
	T: Debug,
	E: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JobState")
			.field("phase", &self.phase())
			.field("result", &self.result)
			.field("error", &self.error)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn idle_by_default() {
		let state = JobState::<u32, String>::default();
		assert_eq!(state.phase(), JobPhase::Idle);
		assert!(!state.in_progress);
		assert!(!state.completed);
	}

	#[test]
	fn settle_replaces_previous_error() {
		let mut state = JobState::<u32, String>::failed("boom".into());
		state.begin();
		assert!(state.is_running());
		assert_eq!(state.error.as_deref(), Some("boom"));

		state.settle(Ok(7));
		assert!(state.is_settled());
		assert_eq!(state.result, Some(7));
		assert_eq!(state.error, None);
	}

	#[test]
	fn settle_with_error_clears_result() {
		let mut state = JobState::<u32, String>::succeeded(1);
		state.settle(Err("late".into()));
		assert_eq!(state, JobState::failed("late".into()));
	}
}
