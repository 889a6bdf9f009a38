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

//! Sources of chain state changes.

use crate::error::Result;

use async_trait::async_trait;
use std::marker::PhantomData;

/// Source of chain state changes, that may be synced on demand.
#[async_trait]
pub trait StreamableSource: Send + Sync {
	/// Type of the change.
	type Item: Send;

	/// Fetch changes that have happened since the previous refresh, oldest first.
	async fn refresh(&self) -> Result<Vec<Self::Item>>;
}

/// Source that has no backing store and never reports any changes.
#[derive(Debug)]
pub struct EmptyStreamableSource<T>(PhantomData<fn() -> T>);

impl<T> EmptyStreamableSource<T> {
	/// Create new empty source.
	pub fn new() -> Self {
		EmptyStreamableSource(PhantomData)
	}
}

impl<T> Default for EmptyStreamableSource<T> {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl<T: Send + 'static> StreamableSource for EmptyStreamableSource<T> {
	type Item = T;

	async fn refresh(&self) -> Result<Vec<T>> {
		Ok(Vec::new())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[async_std::test]
	async fn empty_source_has_no_changes() {
		let source = EmptyStreamableSource::<u32>::new();
		assert!(source.refresh().await.unwrap().is_empty());
		assert!(source.refresh().await.unwrap().is_empty());
	}
}
