//! Asynchronous job lifecycle for UI components.
//!
//! [`with_job`] wraps a [`Component`] so that a work function runs when an
//! instance is activated and, if the configured policy agrees, again when its
//! props change. The progress, result and error of the work are kept as a
//! [`JobState`] owned by the instance and handed down to the wrapped
//! component on every render.
//!
//! Everything runs on a single thread. Work either returns a value right away
//! or a [`Deferred`] value whose continuations are scheduled on the host's
//! [`TaskQueue`]. Once an instance is deactivated, late results are dropped.

pub mod macros;

mod component;
mod config;
mod error;
mod guard;
mod notifier;
mod outcome;
mod policy;
mod queue;
mod runner;
mod state;

pub use component::{
	component_fn, with_job, Component, FnComponent, JobDecorator, JobInstance, JobProps, WithJob,
	WithJobProps,
};
pub use config::Config;
pub use error::Error;
pub use guard::{Readiness, ReadinessGuard};
pub use notifier::{Observer, ResultNotifier};
pub use outcome::{Deferred, Outcome};
pub use policy::RetriggerPolicy;
#[cfg(target_arch = "wasm32")]
pub use queue::Microtask;
pub use queue::TaskQueue;
pub use runner::{JobRunner, WorkHandle};
pub use state::{JobPhase, JobState};
