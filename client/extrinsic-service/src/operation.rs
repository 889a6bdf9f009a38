// Copyright (C) Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.

//! Asynchronous operations with explicit dependencies.
//!
//! Every operation is spawned onto the `async-std` executor as soon as it is created, so
//! operations without dependency edges run in parallel. An operation waits for its
//! predecessors by awaiting their (shared) results. Results are cloned to every successor,
//! which is why operation results and errors are `Clone`.

use crate::{
	error::{Error, Result},
	LOG_TARGET,
};

use futures::{
	future::{AbortHandle, Abortable, BoxFuture, Shared},
	FutureExt,
};
use parking_lot::Mutex;
use std::{fmt::Debug, future::Future, sync::Arc};

/// Lifecycle state of the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
	/// Operation has been created, but not yet started.
	Pending,
	/// Operation is waiting for its dependencies or preparing its request.
	Configuring,
	/// Operation has submitted its request to the node.
	Submitted,
	/// Operation has completed successfully.
	Completed,
	/// Operation has failed.
	Failed,
	/// Operation has been cancelled.
	Cancelled,
}

impl OperationState {
	/// Returns true if the state is terminal.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OperationState::Completed | OperationState::Failed | OperationState::Cancelled
		)
	}
}

/// Handle that the operation body may use to report its progress.
#[derive(Debug, Clone)]
pub struct OperationTracker {
	state: Arc<Mutex<OperationState>>,
}

impl OperationTracker {
	fn new(state: OperationState) -> Self {
		OperationTracker { state: Arc::new(Mutex::new(state)) }
	}

	/// Current operation state.
	pub fn state(&self) -> OperationState {
		*self.state.lock()
	}

	/// Mark operation as one that has submitted its request.
	pub fn mark_submitted(&self) {
		self.set(OperationState::Submitted);
	}

	fn set(&self, new_state: OperationState) {
		let mut state = self.state.lock();
		if !state.is_terminal() {
			*state = new_state;
		}
	}
}

/// Operation that may be cancelled.
pub trait Cancellable: Send + Sync {
	/// Cancel the operation. Does nothing if the operation has already finished.
	fn cancel(&self);
}

/// Asynchronous operation, producing a value of type `T`.
#[derive(Clone)]
pub struct Operation<T: Clone> {
	name: &'static str,
	future: Shared<BoxFuture<'static, Result<T>>>,
	abort_handle: AbortHandle,
	tracker: OperationTracker,
}

impl<T: Clone + Send + Sync + 'static> Operation<T> {
	/// Spawn operation, computing its result with given future.
	pub fn spawn<Fut>(name: &'static str, future: Fut) -> Self
	where
		Fut: Future<Output = Result<T>> + Send + 'static,
	{
		Self::spawn_tracked(name, |_| future)
	}

	/// Spawn operation, giving its body access to the operation tracker.
	pub fn spawn_tracked<F, Fut>(name: &'static str, body: F) -> Self
	where
		F: FnOnce(OperationTracker) -> Fut,
		Fut: Future<Output = Result<T>> + Send + 'static,
	{
		let tracker = OperationTracker::new(OperationState::Pending);
		let (abort_handle, abort_registration) = AbortHandle::new_pair();
		let future = Abortable::new(body(tracker.clone()), abort_registration);

		let task_tracker = tracker.clone();
		let task = async_std::task::spawn(async move {
			task_tracker.set(OperationState::Configuring);
			match future.await {
				Ok(Ok(value)) => {
					task_tracker.set(OperationState::Completed);
					Ok(value)
				},
				Ok(Err(error)) => {
					log::trace!(target: LOG_TARGET, "Operation {name} has failed: {error}");
					task_tracker.set(OperationState::Failed);
					Err(error)
				},
				Err(_) => {
					log::trace!(target: LOG_TARGET, "Operation {name} has been cancelled");
					task_tracker.set(OperationState::Cancelled);
					Err(Error::ParentOperationCancelled)
				},
			}
		});

		Operation { name, future: task.boxed().shared(), abort_handle, tracker }
	}

	/// Operation that has already completed with given value.
	pub fn ready(name: &'static str, value: T) -> Self {
		Self::from_result(name, Ok(value))
	}

	/// Operation that has already completed with given result.
	pub fn from_result(name: &'static str, result: Result<T>) -> Self {
		let state =
			if result.is_ok() { OperationState::Completed } else { OperationState::Failed };
		Operation {
			name,
			future: futures::future::ready(result).boxed().shared(),
			abort_handle: AbortHandle::new_pair().0,
			tracker: OperationTracker::new(state),
		}
	}

	/// Spawn operation that maps result of this operation.
	pub fn map<U, F>(&self, name: &'static str, f: F) -> Operation<U>
	where
		U: Clone + Send + Sync + 'static,
		F: FnOnce(T) -> Result<U> + Send + 'static,
	{
		let parent = self.clone();
		Operation::spawn(name, async move { f(parent.result().await?) })
	}

	/// Wait for the operation result.
	///
	/// Result of cancelled operation is `Error::ParentOperationCancelled`.
	pub async fn result(&self) -> Result<T> {
		self.future.clone().await
	}

	/// Operation name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Current operation state.
	pub fn state(&self) -> OperationState {
		self.tracker.state()
	}
}

impl<T: Clone + Send + Sync + 'static> Cancellable for Operation<T> {
	fn cancel(&self) {
		self.abort_handle.abort();
	}
}

impl<T: Clone> Debug for Operation<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Operation")
			.field("name", &self.name)
			.field("state", &self.tracker.state())
			.finish()
	}
}

/// Operation together with all operations it depends on.
pub struct OperationWrapper<T: Clone> {
	target: Operation<T>,
	dependencies: Vec<Arc<dyn Cancellable>>,
}

impl<T: Clone + Send + Sync + 'static> OperationWrapper<T> {
	/// Wrap operation with given dependencies.
	pub fn with_dependencies(
		target: Operation<T>,
		dependencies: Vec<Arc<dyn Cancellable>>,
	) -> Self {
		OperationWrapper { target, dependencies }
	}

	/// Target operation.
	pub fn target(&self) -> &Operation<T> {
		&self.target
	}

	/// All operations of the wrapper, dependencies first.
	pub fn all_operations(&self) -> Vec<Arc<dyn Cancellable>> {
		let mut operations = self.dependencies.clone();
		operations.push(Arc::new(self.target.clone()));
		operations
	}

	/// Cancel target operation and all its dependencies.
	pub fn cancel(&self) {
		self.dependencies.iter().for_each(|operation| operation.cancel());
		self.target.cancel();
	}

	/// Wait for the target operation result.
	pub async fn result(&self) -> Result<T> {
		self.target.result().await
	}
}
