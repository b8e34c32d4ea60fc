use futures::task::SpawnError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("deferred work needs a task queue, none was configured")]
	NoTaskQueue,

	#[error("task queue refused the continuation: {0}")]
	Spawn(#[from] SpawnError),

	#[error("component `{0}` is already active")]
	AlreadyActivated(String),

	#[error("component `{0}` received props before activation")]
	NotActivated(String),
}
