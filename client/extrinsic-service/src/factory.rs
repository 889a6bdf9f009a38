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

//! Facade of the extrinsic service: fee estimation, submission and building of extrinsics.

use crate::{
	assembly::{
		CustomizerRef, DefaultExtrinsicBuilderOperationFactory, ExtrinsicBuilderOperationFactory,
		ExtrinsicCustomizer, ExtrinsicSender,
	},
	config::ChainConfig,
	connection::ConnectionRef,
	error::{Error, Result},
	fee::fee_operation,
	operation::{Cancellable, Operation, OperationWrapper},
	rpc::to_hex,
	runtime::RuntimeProvider,
	signing::SigningWrapper,
	submit::submit_operation,
};

use extrinsic_primitives::{DispatchInfo, ExtrinsicBuilder};
use futures::future::join_all;
use std::sync::Arc;

/// Result of fee estimation of a single extrinsic.
pub type FeeExtrinsicResult = Result<DispatchInfo>;
/// Result of submission of a single extrinsic: its hash.
pub type SubmitExtrinsicResult = Result<String>;

/// Estimates fees of, submits and builds extrinsics of a single sender on a single chain.
pub struct ExtrinsicOperationFactory {
	connection: ConnectionRef,
	config: Arc<ChainConfig>,
	runtime: Arc<dyn RuntimeProvider>,
	builder_factory: Arc<dyn ExtrinsicBuilderOperationFactory>,
}

impl ExtrinsicOperationFactory {
	/// Create factory that assembles extrinsics on behalf of the sender.
	pub fn new(
		config: ChainConfig,
		connection: ConnectionRef,
		runtime: Arc<dyn RuntimeProvider>,
		sender: ExtrinsicSender,
	) -> Result<Self> {
		config.validate()?;
		let builder_factory = DefaultExtrinsicBuilderOperationFactory::new(
			&config,
			connection.clone(),
			runtime.clone(),
			sender,
		)?;

		Ok(ExtrinsicOperationFactory {
			connection,
			config: Arc::new(config),
			runtime,
			builder_factory: Arc::new(builder_factory),
		})
	}

	/// Use another factory to assemble extrinsics.
	#[must_use]
	pub fn with_builder_factory(
		mut self,
		builder_factory: Arc<dyn ExtrinsicBuilderOperationFactory>,
	) -> Self {
		self.builder_factory = builder_factory;
		self
	}

	/// Chain configuration.
	pub fn config(&self) -> &ChainConfig {
		&self.config
	}

	/// Estimate fees of `count` extrinsics, signed with dummy signature.
	///
	/// The result always has `count` entries. Failure to fetch chain state fails every entry,
	/// other failures only fail the entry of the failed extrinsic.
	pub fn estimate_fee_operation(
		&self,
		customizer: impl ExtrinsicCustomizer + 'static,
		count: usize,
	) -> OperationWrapper<Vec<FeeExtrinsicResult>> {
		self.fee_results(Arc::new(customizer), count)
	}

	/// Sign with given signer and submit `count` extrinsics.
	///
	/// The result always has `count` entries, one per extrinsic.
	pub fn submit(
		&self,
		customizer: impl ExtrinsicCustomizer + 'static,
		signer: Arc<dyn SigningWrapper>,
		count: usize,
	) -> OperationWrapper<Vec<SubmitExtrinsicResult>> {
		self.submit_results(Arc::new(customizer), signer, count)
	}

	/// Build single extrinsic, returning its hex representation.
	pub fn build_extrinsic(
		&self,
		customizer: impl Fn(ExtrinsicBuilder) -> Result<ExtrinsicBuilder> + Send + Sync + 'static,
		signer: Arc<dyn SigningWrapper>,
	) -> OperationWrapper<String> {
		let extrinsics =
			self.builder_factory.create_extrinsic_operations(single(customizer), 1, signer);
		let extrinsic = extrinsics.extrinsics.first().cloned();

		let target = Operation::spawn("build-extrinsic", async move {
			let extrinsic = extrinsic.ok_or(Error::UnexpectedDependentResult)?;
			Ok(to_hex(&extrinsic.result().await?))
		});

		OperationWrapper::with_dependencies(target, extrinsics.all_operations())
	}

	/// Estimate fee of single extrinsic.
	pub fn estimate_fee(
		&self,
		customizer: impl Fn(ExtrinsicBuilder) -> Result<ExtrinsicBuilder> + Send + Sync + 'static,
	) -> OperationWrapper<DispatchInfo> {
		first_result(self.fee_results(single(customizer), 1))
	}

	/// Sign and submit single extrinsic.
	pub fn submit_single(
		&self,
		customizer: impl Fn(ExtrinsicBuilder) -> Result<ExtrinsicBuilder> + Send + Sync + 'static,
		signer: Arc<dyn SigningWrapper>,
	) -> OperationWrapper<String> {
		first_result(self.submit_results(single(customizer), signer, 1))
	}

	fn fee_results(
		&self,
		customizer: CustomizerRef,
		count: usize,
	) -> OperationWrapper<Vec<FeeExtrinsicResult>> {
		let extrinsics = self.builder_factory.create_extrinsic_operations(
			customizer,
			count,
			self.builder_factory.dummy_signer(),
		);
		let coder = self.runtime.fetch_coder_factory_operation();
		let fees: Vec<_> = extrinsics
			.extrinsics
			.iter()
			.map(|extrinsic| {
				fee_operation(
					self.connection.clone(),
					self.config.clone(),
					coder.clone(),
					extrinsic.clone(),
				)
			})
			.collect();

		let mut dependencies = extrinsics.all_operations();
		dependencies.push(Arc::new(coder));
		collect_results("fee-results", fees, dependencies)
	}

	fn submit_results(
		&self,
		customizer: CustomizerRef,
		signer: Arc<dyn SigningWrapper>,
		count: usize,
	) -> OperationWrapper<Vec<SubmitExtrinsicResult>> {
		let extrinsics =
			self.builder_factory.create_extrinsic_operations(customizer, count, signer);
		let submissions: Vec<_> = extrinsics
			.extrinsics
			.iter()
			.map(|extrinsic| submit_operation(self.connection.clone(), extrinsic.clone()))
			.collect();

		collect_results("submit-results", submissions, extrinsics.all_operations())
	}
}

fn single(
	customizer: impl Fn(ExtrinsicBuilder) -> Result<ExtrinsicBuilder> + Send + Sync + 'static,
) -> CustomizerRef {
	Arc::new(move |builder: ExtrinsicBuilder, _: usize| customizer(builder))
}

fn collect_results<T: Clone + Send + Sync + 'static>(
	name: &'static str,
	operations: Vec<Operation<T>>,
	mut dependencies: Vec<Arc<dyn Cancellable>>,
) -> OperationWrapper<Vec<Result<T>>> {
	dependencies.extend(operations.iter().map(|op| Arc::new(op.clone()) as Arc<dyn Cancellable>));
	let target = Operation::spawn(name, async move {
		Ok(join_all(operations.iter().map(|operation| operation.result())).await)
	});

	OperationWrapper::with_dependencies(target, dependencies)
}

fn first_result<T: Clone + Send + Sync + 'static>(
	wrapper: OperationWrapper<Vec<Result<T>>>,
) -> OperationWrapper<T> {
	let dependencies = wrapper.all_operations();
	let results = wrapper.target().clone();
	let target = Operation::spawn("first-result", async move {
		results.result().await?.into_iter().next().ok_or(Error::UnexpectedDependentResult)?
	});

	OperationWrapper::with_dependencies(target, dependencies)
}
