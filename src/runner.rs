use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use smallvec::SmallVec;

use crate::{Deferred, Error, JobState, Outcome, ReadinessGuard, Readiness, ResultNotifier, TaskQueue};

pub(crate) type WorkFn<P, T, E> = Rc<dyn Fn(&P) -> Outcome<T, E>>;

type Listener = Rc<dyn Fn()>;

/// Reference to the most recently started deferred job.
///
/// Starting another job does not cancel this one: its continuations stay
/// registered and still apply when it settles.
#[derive(Clone)]
pub struct WorkHandle {
	cycle: u64,
	done: Rc<Cell<bool>>,
	settled: Shared<LocalBoxFuture<'static, ()>>,
}

impl WorkHandle {
	#[inline]
	pub fn cycle(&self) -> u64 {
		self.cycle
	}

	pub fn is_settled(&self) -> bool {
		self.done.get()
	}

	/// Completes once the job has settled, whether or not its result was
	/// still accepted by the component.
	pub fn settled(&self) -> impl Future<Output = ()> {
		self.settled.clone()
	}
}

impl std::fmt::Debug for WorkHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WorkHandle")
			.field("cycle", &self.cycle)
			.field("settled", &self.done.get())
			.finish()
	}
}

/// Runs the work function and keeps the job state of one component
/// instance.
pub struct JobRunner<P, T, E> {
	body: Rc<RunnerBody<P, T, E>>,
}

struct RunnerBody<P, T, E> {
	state: RefCell<JobState<T, E>>,
	guard: ReadinessGuard,
	inner: RefCell<RunnerInner<P, T, E>>,
}

struct RunnerInner<P, T, E> {
	name: Cow<'static, str>,
	work: WorkFn<P, T, E>,
	queue: Option<Rc<dyn TaskQueue>>,
	cycle: u64,
	executing: Option<WorkHandle>,
	listeners: SmallVec<[Listener; 2]>,
	this: Weak<RunnerBody<P, T, E>>,
}

struct Settlement<P, T, E> {
	body: Weak<RunnerBody<P, T, E>>,
	cycle: u64,
	notifier: ResultNotifier<T, E>,
	done: Rc<Cell<bool>>,
	signal: RefCell<Option<oneshot::Sender<()>>>,
}

impl<P, T, E> JobRunner<P, T, E>
where
	P: 'static,
	T: Clone + 'static,
	E: Clone + 'static,
{
	pub fn new<F, R>(work: F) -> Self
	where
		F: Fn(&P) -> R + 'static,
		R: Into<Outcome<T, E>>,
	{
		Self::from_parts(
			Cow::Borrowed("<unnamed>"),
			Rc::new(move |input: &P| -> Outcome<T, E> { work(input).into() }),
			crate::queue::default_queue(),
		)
	}

	pub(crate) fn from_parts(
		name: Cow<'static, str>,
		work: WorkFn<P, T, E>,
		queue: Option<Rc<dyn TaskQueue>>,
	) -> Self {
		JobRunner {
			body: Rc::new_cyclic(|this| RunnerBody {
				state: RefCell::new(JobState::idle()),
				guard: ReadinessGuard::new(),
				inner: RefCell::new(RunnerInner {
					name,
					work,
					queue,
					cycle: 0,
					executing: None,
					listeners: SmallVec::new(),
					this: this.clone(),
				}),
			}),
		}
	}

	#[must_use]
	pub fn with_name(self, name: impl Into<Cow<'static, str>>) -> Self {
		self.body.inner.borrow_mut().name = name.into();
		self
	}

	#[must_use]
	pub fn with_queue(self, queue: impl TaskQueue + 'static) -> Self {
		self.body.inner.borrow_mut().queue = Some(Rc::new(queue));
		self
	}

	pub fn activate(&self) -> bool {
		self.body.guard.activate()
	}

	pub fn deactivate(&self) {
		self.body.guard.deactivate()
	}

	#[inline]
	pub fn readiness(&self) -> Readiness {
		self.body.guard.phase()
	}

	/// Replaces the job state wholesale, e.g. with state computed ahead of
	/// activation.
	pub fn seed(&self, state: JobState<T, E>) -> bool {
		self.body.apply(move |current| *current = state)
	}

	/// Starts a new job cycle for `input`.
	///
	/// Work failures end up in the job state. An error is returned only
	/// when deferred work cannot be scheduled on the task queue, in which
	/// case the state is left as it was.
	pub fn start(&self, input: &P, notifier: ResultNotifier<T, E>) -> Result<(), Error> {
		let body = &self.body;
		if !body.guard.is_ready() {
			tracing::trace!(phase = ?body.guard.phase(), "start ignored");
			return Ok(());
		}

		let work = body.inner.borrow().work.clone();
		match work(input) {
			Outcome::Ready(outcome) => {
				tracing::debug!(
					component = %body.inner.borrow().name,
					ok = outcome.is_ok(),
					"job settled synchronously"
				);
				body.apply(|state| state.settle(outcome));
				Ok(())
			}
			Outcome::Deferred(deferred) => body.defer(deferred, notifier),
		}
	}

	pub fn job_state(&self) -> JobState<T, E> {
		self.body.job_state()
	}

	pub fn executing_job(&self) -> Option<WorkHandle> {
		self.body.inner.borrow().executing.clone()
	}

	/// Registers a listener called after every applied state change.
	pub fn subscribe(&self, listener: impl Fn() + 'static) {
		self.body.inner.borrow_mut().listeners.push(Rc::new(listener));
	}
}

impl<P, T, E> RunnerBody<P, T, E>
where
	P: 'static,
	T: Clone + 'static,
	E: Clone + 'static,
{
	fn job_state(&self) -> JobState<T, E> {
		self.state.borrow().clone()
	}

	fn apply(&self, func: impl FnOnce(&mut JobState<T, E>)) -> bool {
		let applied = self.guard.mutate(&self.state, func);
		if applied {
			self.changed();
		}
		applied
	}

	fn changed(&self) {
		// the list is cloned so listeners may subscribe, read state or start
		// another cycle
		let listeners = self.inner.borrow().listeners.clone();
		for listener in listeners {
			listener();
		}
	}

	fn defer(&self, deferred: Deferred<T, E>, notifier: ResultNotifier<T, E>) -> Result<(), Error> {
		let (queue, cycle, this) = {
			let inner = self.inner.borrow();
			let queue = inner.queue.clone().ok_or(Error::NoTaskQueue)?;
			(queue, inner.cycle + 1, inner.this.clone())
		};

		let (sender, receiver) = oneshot::channel();
		let done = Rc::new(Cell::new(false));
		let settlement = Rc::new(Settlement {
			body: this,
			cycle,
			notifier,
			done: done.clone(),
			signal: RefCell::new(Some(sender)),
		});

		deferred.then(
			&*queue,
			{
				let settlement = settlement.clone();
				move |result| settlement.complete(Ok(result))
			},
			move |error| settlement.complete(Err(error)),
		)?;

		{
			let mut inner = self.inner.borrow_mut();
			inner.cycle = cycle;
			inner.executing = Some(WorkHandle {
				cycle,
				done,
				settled: receiver.map(|_| ()).boxed_local().shared(),
			});
			tracing::debug!(component = %inner.name, cycle, "job deferred");
		}

		self.apply(JobState::begin);
		Ok(())
	}

	fn settle(&self, cycle: u64, outcome: Result<T, E>, notifier: &ResultNotifier<T, E>) {
		{
			let inner = self.inner.borrow();
			if cycle != inner.cycle {
				tracing::debug!(
					component = %inner.name,
					cycle,
					current = inner.cycle,
					"stale job settled over a newer one"
				);
			}
		}

		let ok = outcome.is_ok();
		if !self.guard.mutate(&self.state, |state| state.settle(outcome)) {
			return;
		}

		// listeners may start another cycle, the observer gets this one
		let settled = self.job_state();
		tracing::debug!(component = %self.inner.borrow().name, cycle, ok, "job settled");
		self.changed();
		notifier.notify(&settled);
	}
}

impl<P, T, E> Settlement<P, T, E>
where
	P: 'static,
	T: Clone + 'static,
	E: Clone + 'static,
{
	fn complete(&self, outcome: Result<T, E>) {
		self.done.set(true);
		if let Some(body) = self.body.upgrade() {
			body.settle(self.cycle, outcome, &self.notifier);
		}

		if let Some(signal) = self.signal.borrow_mut().take() {
			let _ = signal.send(());
		}
	}
}
