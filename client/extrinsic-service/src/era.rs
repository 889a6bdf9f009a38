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

//! Resolvers of the transaction mortality.

use crate::{
	config::DEFAULT_MORTALITY_PERIOD,
	connection::{self, ConnectionRef},
	operation::Operation,
	rpc::{RpcHeader, CHAIN_GET_HEADER},
	runtime::RuntimeProvider,
	LOG_TARGET,
};

use extrinsic_primitives::Era;
use std::sync::Arc;

/// Resolved transaction era with the block it is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraInfo {
	/// Number of the block, used to compute the era.
	pub block_number: u64,
	/// Transaction era.
	pub era: Era,
}

impl EraInfo {
	/// Number of the block whose hash is signed with the transaction.
	pub fn anchor_block_number(&self) -> u64 {
		self.era.birth(self.block_number)
	}
}

/// Factory of operations that resolve the transaction era.
pub trait EraOperationFactory: Send + Sync {
	/// Create era resolution operation.
	fn create_operation(
		&self,
		connection: ConnectionRef,
		runtime: Arc<dyn RuntimeProvider>,
	) -> Operation<EraInfo>;
}

/// Mortal era with fixed period, anchored to the best block.
#[derive(Debug, Clone, Copy)]
pub struct MortalEraOperationFactory {
	period: u64,
}

impl MortalEraOperationFactory {
	/// Create factory with given mortality period.
	pub fn new(period: u64) -> Self {
		MortalEraOperationFactory { period }
	}
}

impl Default for MortalEraOperationFactory {
	fn default() -> Self {
		Self::new(DEFAULT_MORTALITY_PERIOD)
	}
}

impl EraOperationFactory for MortalEraOperationFactory {
	fn create_operation(
		&self,
		connection: ConnectionRef,
		_runtime: Arc<dyn RuntimeProvider>,
	) -> Operation<EraInfo> {
		let period = self.period;
		Operation::spawn("mortal-era", async move {
			let header: RpcHeader =
				connection::request(&*connection, CHAIN_GET_HEADER, Vec::new()).await?;
			let block_number = header.block_number()?;
			let era = Era::mortal(period, block_number);
			log::trace!(target: LOG_TARGET, "Resolved era {era:?} at block {block_number}");

			Ok(EraInfo { block_number, era })
		})
	}
}

/// Immortal era, anchored to the genesis block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmortalEraOperationFactory;

impl EraOperationFactory for ImmortalEraOperationFactory {
	fn create_operation(
		&self,
		_connection: ConnectionRef,
		_runtime: Arc<dyn RuntimeProvider>,
	) -> Operation<EraInfo> {
		Operation::ready("immortal-era", EraInfo { block_number: 0, era: Era::Immortal })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{test_runtime_provider, TestConnection};
	use assert_matches::assert_matches;
	use serde_json::json;

	#[async_std::test]
	async fn mortal_era_is_anchored_to_best_block() {
		let connection = Arc::new(
			TestConnection::new()
				.with_response(CHAIN_GET_HEADER, json!({"number": "0x3e8", "parentHash": "0x00"})),
		);
		let info = MortalEraOperationFactory::default()
			.create_operation(connection, test_runtime_provider())
			.result()
			.await
			.unwrap();

		assert_eq!(info.block_number, 1_000);
		assert_eq!(info.era, Era::mortal(DEFAULT_MORTALITY_PERIOD, 1_000));
		assert_eq!(info.anchor_block_number(), 1_000);
	}

	#[async_std::test]
	async fn mortal_era_fails_without_header() {
		let connection = Arc::new(TestConnection::new().with_error(CHAIN_GET_HEADER, "offline"));
		let result = MortalEraOperationFactory::new(128)
			.create_operation(connection, test_runtime_provider())
			.result()
			.await;

		assert_matches!(result, Err(crate::Error::Transport(_)));
	}

	#[async_std::test]
	async fn immortal_era_does_not_need_node() {
		let connection = Arc::new(TestConnection::new());
		let info = ImmortalEraOperationFactory
			.create_operation(connection.clone(), test_runtime_provider())
			.result()
			.await
			.unwrap();

		assert_eq!(info, EraInfo { block_number: 0, era: Era::Immortal });
		assert!(connection.requests().is_empty());
	}

	#[test]
	fn anchor_is_quantized_with_long_periods() {
		let info = EraInfo { block_number: 100_005, era: Era::mortal(1 << 16, 100_005) };
		assert_eq!(info.anchor_block_number(), 100_000);
	}
}
