use std::cell::{Cell, RefCell};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Readiness {
	/// The instance was created but not activated yet.
	Pending,
	Ready,
	/// The instance was deactivated. This phase is final.
	Retired,
}

/// Tracks whether the owning component instance is alive.
///
/// Readiness is checked when a mutation is attempted, not when the work
/// that produced it was started. Mutations outside of the `Ready` phase
/// are dropped.
pub struct ReadinessGuard {
	phase: Cell<Readiness>,
}

impl Default for ReadinessGuard {
	fn default() -> Self {
		ReadinessGuard::new()
	}
}

impl ReadinessGuard {
	pub fn new() -> Self {
		ReadinessGuard {
			phase: Cell::new(Readiness::Pending),
		}
	}

	/// Returns `false` when the guard was already retired.
	pub fn activate(&self) -> bool {
		match self.phase.get() {
			Readiness::Retired => false,
			_ => {
				self.phase.set(Readiness::Ready);
				true
			}
		}
	}

	pub fn deactivate(&self) {
		self.phase.set(Readiness::Retired);
	}

	#[inline]
	pub fn phase(&self) -> Readiness {
		self.phase.get()
	}

	#[inline]
	pub fn is_ready(&self) -> bool {
		self.phase.get() == Readiness::Ready
	}

	pub fn mutate<S>(&self, cell: &RefCell<S>, func: impl FnOnce(&mut S)) -> bool {
		if !self.is_ready() {
			tracing::trace!(phase = ?self.phase.get(), "mutation dropped");
			return false;
		}

		func(&mut *cell.borrow_mut());
		true
	}
}
