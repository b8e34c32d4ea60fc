use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::Error;

/// The host's task queue. Continuations of deferred work are scheduled
/// here and never run inline with `enqueue`.
pub trait TaskQueue {
	fn enqueue(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), Error>;
}

impl<Q> TaskQueue for Rc<Q>
where
	Q: TaskQueue + ?Sized,
{
	fn enqueue(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), Error> {
		(**self).enqueue(task)
	}
}

impl TaskQueue for LocalSpawner {
	fn enqueue(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), Error> {
		self.spawn_local(task)?;
		Ok(())
	}
}

#[cfg(feature = "tokio")]
impl TaskQueue for tokio::task::LocalSet {
	fn enqueue(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), Error> {
		// detached: the handle is not needed to observe settlement
		let _ = self.spawn_local(task);
		Ok(())
	}
}

#[cfg(target_arch = "wasm32")]
pub struct Microtask;

#[cfg(target_arch = "wasm32")]
impl TaskQueue for Microtask {
	fn enqueue(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), Error> {
		wasm_bindgen_futures::spawn_local(task);
		Ok(())
	}
}

pub(crate) fn default_queue() -> Option<Rc<dyn TaskQueue>> {
	#[cfg(target_arch = "wasm32")]
	{
		Some(Rc::new(Microtask))
	}

	#[cfg(not(target_arch = "wasm32"))]
	{
		None
	}
}
