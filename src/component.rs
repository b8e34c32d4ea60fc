use std::borrow::Cow;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::notifier::Observer;
use crate::runner::WorkFn;
use crate::{
	Config, Error, JobRunner, JobState, Outcome, Readiness, ResultNotifier, RetriggerPolicy,
	TaskQueue, WorkHandle,
};

/// Something that renders props into an output.
pub trait Component {
	type Props;
	type Output;

	fn render(&self, props: Self::Props) -> Self::Output;

	fn display_name(&self) -> Cow<'static, str> {
		Cow::Borrowed(short_type_name::<Self>())
	}
}

fn short_type_name<T: ?Sized>() -> &'static str {
	let name = std::any::type_name::<T>();
	let path = name.split('<').next().unwrap_or(name);
	path.rsplit("::").next().unwrap_or(path)
}

/// A [`Component`] made from a function.
pub struct FnComponent<F, Props> {
	name: Cow<'static, str>,
	func: F,
	_props: PhantomData<fn(Props)>,
}

pub fn component_fn<F, Props, O>(name: impl Into<Cow<'static, str>>, func: F) -> FnComponent<F, Props>
where
	F: Fn(Props) -> O,
{
	FnComponent {
		name: name.into(),
		func,
		_props: PhantomData,
	}
}

impl<F, Props, O> Component for FnComponent<F, Props>
where
	F: Fn(Props) -> O,
{
	type Props = Props;
	type Output = O;

	fn render(&self, props: Props) -> O {
		(self.func)(props)
	}

	fn display_name(&self) -> Cow<'static, str> {
		self.name.clone()
	}
}

/// Props received by a job-wrapped component.
pub struct JobProps<P, T, E> {
	pub props: P,
	/// Seeds the job state and skips the first run.
	pub job_init_state: Option<JobState<T, E>>,
	/// Called when a deferred job started with these props settles.
	pub on_job_processed: Option<Observer<T, E>>,
}

impl<P, T, E> JobProps<P, T, E> {
	pub fn new(props: P) -> Self {
		JobProps {
			props,
			job_init_state: None,
			on_job_processed: None,
		}
	}

	#[must_use]
	pub fn with_init_state(mut self, state: JobState<T, E>) -> Self {
		self.job_init_state = Some(state);
		self
	}

	#[must_use]
	pub fn on_job_processed(mut self, observer: impl Fn(&JobState<T, E>) + 'static) -> Self {
		self.on_job_processed = Some(Rc::new(observer));
		self
	}
}

impl<P, T, E> Clone for JobProps<P, T, E>
where
	P: Clone,
	T: Clone,
	E: Clone,
{
	fn clone(&self) -> Self {
		JobProps {
			props: self.props.clone(),
			job_init_state: self.job_init_state.clone(),
			on_job_processed: self.on_job_processed.clone(),
		}
	}
}

/// Props handed down to the wrapped component.
#[derive(Clone, Debug, PartialEq)]
pub struct WithJobProps<P, T, E> {
	pub props: P,
	pub job: JobState<T, E>,
}

pub struct JobDecorator<P, T, E> {
	work: WorkFn<P, T, E>,
	policy: RetriggerPolicy<P, T, E>,
	queue: Option<Rc<dyn TaskQueue>>,
}

/// Attaches a job to components: `work` runs with the component props on
/// activation and again whenever `config` approves a props change.
pub fn with_job<P, T, E, F, R>(work: F, config: Config<P, T, E>) -> JobDecorator<P, T, E>
where
	F: Fn(&P) -> R + 'static,
	R: Into<Outcome<T, E>>,
	P: 'static,
	T: 'static,
	E: 'static,
{
	JobDecorator {
		work: Rc::new(move |props: &P| -> Outcome<T, E> { work(props).into() }),
		policy: config.policy,
		queue: config.queue,
	}
}

impl<P, T, E> JobDecorator<P, T, E> {
	pub fn wrap<C>(&self, component: C) -> WithJob<C, P, T, E>
	where
		C: Component<Props = WithJobProps<P, T, E>>,
	{
		let name = format!("{}WithJob", component.display_name());
		WithJob {
			component: Rc::new(component),
			name: Rc::from(name),
			work: self.work.clone(),
			policy: self.policy.clone(),
			queue: self.queue.clone(),
		}
	}
}

/// A component wrapped with a job. Each mounted occurrence gets its own
/// [`JobInstance`].
pub struct WithJob<C, P, T, E> {
	component: Rc<C>,
	name: Rc<str>,
	work: WorkFn<P, T, E>,
	policy: RetriggerPolicy<P, T, E>,
	queue: Option<Rc<dyn TaskQueue>>,
}

impl<C, P, T, E> Clone for WithJob<C, P, T, E> {
	fn clone(&self) -> Self {
		WithJob {
			component: self.component.clone(),
			name: self.name.clone(),
			work: self.work.clone(),
			policy: self.policy.clone(),
			queue: self.queue.clone(),
		}
	}
}

impl<C, P, T, E> WithJob<C, P, T, E>
where
	C: Component<Props = WithJobProps<P, T, E>>,
	P: Clone + 'static,
	T: Clone + 'static,
	E: Clone + 'static,
{
	pub fn display_name(&self) -> &str {
		&self.name
	}

	pub fn instantiate(&self) -> JobInstance<C, P, T, E> {
		JobInstance {
			component: self.component.clone(),
			name: self.name.clone(),
			runner: JobRunner::from_parts(
				Cow::Owned(self.name.to_string()),
				self.work.clone(),
				self.queue.clone(),
			),
			policy: self.policy.clone(),
			props: RefCell::new(None),
		}
	}
}

/// One mounted occurrence of a [`WithJob`] component.
pub struct JobInstance<C, P, T, E> {
	component: Rc<C>,
	name: Rc<str>,
	runner: JobRunner<P, T, E>,
	policy: RetriggerPolicy<P, T, E>,
	props: RefCell<Option<JobProps<P, T, E>>>,
}

impl<C, P, T, E> JobInstance<C, P, T, E>
where
	C: Component<Props = WithJobProps<P, T, E>>,
	P: Clone + 'static,
	T: Clone + 'static,
	E: Clone + 'static,
{
	pub fn display_name(&self) -> &str {
		&self.name
	}

	/// Mounts the instance. The job starts right away unless the props carry
	/// an initial job state.
	pub fn on_activate(&self, props: JobProps<P, T, E>) -> Result<(), Error> {
		if self.runner.readiness() != Readiness::Pending || !self.runner.activate() {
			return Err(Error::AlreadyActivated(self.name.to_string()));
		}

		let input = props.props.clone();
		let init = props.job_init_state.clone();
		let notifier = ResultNotifier::from(props.on_job_processed.clone());
		*self.props.borrow_mut() = Some(props);

		match init {
			Some(state) => {
				tracing::debug!(component = %self.name, "job state seeded");
				self.runner.seed(state);
				Ok(())
			}
			None => self.runner.start(&input, notifier),
		}
	}

	/// Returns whether the new props started another job cycle.
	pub fn on_receive_props(&self, next: JobProps<P, T, E>) -> Result<bool, Error> {
		if self.props.borrow().is_none() {
			return Err(Error::NotActivated(self.name.to_string()));
		}

		// a retired instance only keeps the props for rendering
		let again = self.runner.readiness() == Readiness::Ready && {
			let state = self.runner.job_state();
			let current = self.props.borrow();
			current
				.as_ref()
				.is_some_and(|prev| self.policy.should_work_again(&prev.props, &next.props, &state))
		};

		let input = next.props.clone();
		let notifier = ResultNotifier::from(next.on_job_processed.clone());
		*self.props.borrow_mut() = Some(next);

		if !again {
			return Ok(false);
		}

		tracing::debug!(component = %self.name, "props changed, working again");
		self.runner.start(&input, notifier)?;
		Ok(true)
	}

	pub fn on_deactivate(&self) {
		tracing::debug!(component = %self.name, "deactivated");
		self.runner.deactivate();
	}

	/// Renders the wrapped component with the current props and job state.
	/// Returns `None` before activation.
	pub fn render(&self) -> Option<C::Output> {
		let props = self.props.borrow().as_ref().map(|p| p.props.clone())?;
		Some(self.component.render(WithJobProps {
			props,
			job: self.runner.job_state(),
		}))
	}

	pub fn job_state(&self) -> JobState<T, E> {
		self.runner.job_state()
	}

	pub fn executing_job(&self) -> Option<WorkHandle> {
		self.runner.executing_job()
	}

	/// Registers a listener called whenever the job state changes, so the
	/// host can render again.
	pub fn on_change(&self, listener: impl Fn() + 'static) {
		self.runner.subscribe(listener)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Profile;

	impl Component for Profile {
		type Props = WithJobProps<u32, String, String>;
		type Output = String;

		fn render(&self, props: Self::Props) -> String {
			format!("{}: {:?}", props.props, props.job.result)
		}
	}

	#[test]
	fn display_name_is_derived_from_the_wrapped_component() {
		let wrapped = with_job(|id: &u32| Ok::<_, String>(id.to_string()), Config::new()).wrap(Profile);
		assert_eq!(wrapped.display_name(), "ProfileWithJob");

		let named = with_job(|id: &u32| Ok::<_, String>(id.to_string()), Config::new())
			.wrap(component_fn("Avatar", |p: WithJobProps<u32, String, String>| p.props));
		assert_eq!(named.display_name(), "AvatarWithJob");
	}

	#[test]
	fn renders_with_job_state() {
		let wrapped = with_job(|id: &u32| Ok::<_, String>(format!("user {id}")), Config::new()).wrap(Profile);
		let instance = wrapped.instantiate();
		assert_eq!(instance.render(), None);

		instance.on_activate(JobProps::new(4)).unwrap();
		assert_eq!(instance.render().as_deref(), Some("4: Some(\"user 4\")"));
	}

	#[test]
	fn activation_happens_once() {
		let instance = with_job(|_: &u32| Ok::<_, String>(String::new()), Config::new())
			.wrap(Profile)
			.instantiate();

		instance.on_activate(JobProps::new(1)).unwrap();
		assert!(matches!(
			instance.on_activate(JobProps::new(1)),
			Err(Error::AlreadyActivated(_))
		));

		instance.on_deactivate();
		assert!(instance.on_activate(JobProps::new(1)).is_err());
	}

	#[test]
	fn retired_instance_does_not_consult_the_policy() {
		let consulted = Rc::new(std::cell::Cell::new(0));
		let instance = with_job(
			|id: &u32| Ok::<_, String>(id.to_string()),
			Config::new().should_work_again({
				let consulted = consulted.clone();
				move |_: &u32, _: &u32, _: &JobState<String, String>| {
					consulted.set(consulted.get() + 1);
					true
				}
			}),
		)
		.wrap(Profile)
		.instantiate();

		instance.on_activate(JobProps::new(1)).unwrap();
		assert!(instance.on_receive_props(JobProps::new(2)).unwrap());
		assert_eq!(consulted.get(), 1);

		instance.on_deactivate();
		assert!(!instance.on_receive_props(JobProps::new(3)).unwrap());
		assert_eq!(consulted.get(), 1);
		assert_eq!(instance.job_state(), JobState::succeeded("2".to_string()));
		assert_eq!(instance.render().as_deref(), Some("3: Some(\"2\")"));
	}

	#[test]
	fn props_before_activation_are_rejected() {
		let instance = with_job(|_: &u32| Ok::<_, String>(String::new()), Config::new())
			.wrap(Profile)
			.instantiate();

		assert!(matches!(
			instance.on_receive_props(JobProps::new(1)),
			Err(Error::NotActivated(_))
		));
	}
}
