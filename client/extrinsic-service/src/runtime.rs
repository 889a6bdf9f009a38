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

//! Providers of the runtime coder factory.

use crate::{
	config::ChainConfig,
	connection::{self, ConnectionRef},
	error::Result,
	operation::{Operation, OperationState},
	rpc::{RpcRuntimeVersion, STATE_GET_RUNTIME_VERSION, TRANSACTION_PAYMENT_API},
	source::StreamableSource,
	LOG_TARGET,
};

use extrinsic_primitives::{
	ExtrinsicLayout, RuntimeCoderFactory, StaticRuntimeCoderFactory, RUNTIME_DISPATCH_INFO_TYPE,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared reference to the coder factory.
pub type CoderFactoryRef = Arc<dyn RuntimeCoderFactory>;

/// First version of `TransactionPaymentApi` that reports two-dimensional weights.
const WEIGHT_V2_PAYMENT_API_VERSION: u32 = 2;

/// Provider of the coder factory for the current runtime.
pub trait RuntimeProvider: Send + Sync {
	/// Return operation that resolves to the coder factory of the current runtime.
	fn fetch_coder_factory_operation(&self) -> Operation<CoderFactoryRef>;
}

/// Provider that always returns the same coder factory.
#[derive(Debug, Clone)]
pub struct StaticRuntimeProvider {
	coder_factory: CoderFactoryRef,
}

impl StaticRuntimeProvider {
	/// Create provider of given coder factory.
	pub fn new(coder_factory: CoderFactoryRef) -> Self {
		StaticRuntimeProvider { coder_factory }
	}
}

impl RuntimeProvider for StaticRuntimeProvider {
	fn fetch_coder_factory_operation(&self) -> Operation<CoderFactoryRef> {
		Operation::ready("coder-factory", self.coder_factory.clone())
	}
}

/// Provider that builds the coder factory from the runtime version, reported by the node.
///
/// The coder factory is fetched once and cached until it is invalidated.
pub struct RpcRuntimeProvider {
	connection: ConnectionRef,
	config: Arc<ChainConfig>,
	layout: ExtrinsicLayout,
	cached: Mutex<Option<Operation<CoderFactoryRef>>>,
}

impl RpcRuntimeProvider {
	/// Create provider for the chain with given extrinsic layout.
	pub fn new(
		connection: ConnectionRef,
		config: Arc<ChainConfig>,
		layout: ExtrinsicLayout,
	) -> Self {
		RpcRuntimeProvider { connection, config, layout, cached: Mutex::new(None) }
	}

	/// Drop cached coder factory. The next request will fetch it from the node.
	pub fn invalidate(&self) {
		self.cached.lock().take();
	}

	/// Sync with the source of runtime upgrades, invalidating the cached coder factory if the
	/// runtime has been upgraded. Returns number of changes, reported by the source.
	pub async fn sync(
		&self,
		source: &dyn StreamableSource<Item = RpcRuntimeVersion>,
	) -> Result<usize> {
		let changes = source.refresh().await?;
		let latest = match changes.last() {
			Some(latest) => latest,
			None => return Ok(0),
		};

		let cached = self.cached.lock().clone();
		if let Some(cached) = cached {
			let is_outdated = match cached.result().await {
				Ok(coder) =>
					coder.spec_version() != latest.spec_version ||
						coder.transaction_version() != latest.transaction_version,
				Err(_) => true,
			};
			if is_outdated {
				log::info!(
					target: LOG_TARGET,
					"{} runtime has been upgraded to {}. Dropping cached coder factory",
					self.config.name,
					latest.spec_version,
				);
				self.invalidate();
			}
		}

		Ok(changes.len())
	}
}

impl RuntimeProvider for RpcRuntimeProvider {
	fn fetch_coder_factory_operation(&self) -> Operation<CoderFactoryRef> {
		// cancelling the returned operation must leave the cached one intact
		self.cached_operation().map("coder-factory", Ok)
	}
}

impl RpcRuntimeProvider {
	fn cached_operation(&self) -> Operation<CoderFactoryRef> {
		let mut cached = self.cached.lock();
		if let Some(ref operation) = *cached {
			if !matches!(operation.state(), OperationState::Failed | OperationState::Cancelled) {
				return operation.clone()
			}
		}

		let connection = self.connection.clone();
		let config = self.config.clone();
		let layout = self.layout.clone();
		let operation = Operation::spawn("coder-factory", async move {
			let version: RpcRuntimeVersion =
				connection::request(&*connection, STATE_GET_RUNTIME_VERSION, Vec::new()).await?;
			log::debug!(
				target: LOG_TARGET,
				"Fetched {} runtime version: {}/{}",
				config.name,
				version.spec_version,
				version.transaction_version,
			);

			let coder: CoderFactoryRef = Arc::new(build_coder_factory(&config, layout, version));
			Ok(coder)
		});

		*cached = Some(operation.clone());
		operation
	}
}

fn build_coder_factory(
	config: &ChainConfig,
	layout: ExtrinsicLayout,
	version: RpcRuntimeVersion,
) -> StaticRuntimeCoderFactory {
	let mut coder =
		StaticRuntimeCoderFactory::new(version.spec_version, version.transaction_version, layout);
	for known_call in &config.known_calls {
		coder =
			coder.with_call(known_call.pallet.clone(), known_call.call.clone(), known_call.index);
	}

	match version.api_version(TRANSACTION_PAYMENT_API) {
		Some(api_version) => coder
			.with_type(RUNTIME_DISPATCH_INFO_TYPE)
			.with_legacy_weight(api_version < WEIGHT_V2_PAYMENT_API_VERSION),
		None => coder,
	}
}
