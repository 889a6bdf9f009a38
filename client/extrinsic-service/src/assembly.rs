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

//! Assembly of signed extrinsics from chain state and caller customizations.

use crate::{
	config::ChainConfig,
	connection::ConnectionRef,
	era::{EraInfo, EraOperationFactory, MortalEraOperationFactory},
	error::Result,
	operation::{Cancellable, Operation},
	runtime::{CoderFactoryRef, RuntimeProvider},
	signing::{sign_extrinsic, DummySigner, SigningContext, SigningWrapper},
	state, LOG_TARGET,
};

use extrinsic_primitives::{
	BlockHash, CryptoType, ExtensionRef, ExtrinsicAddress, ExtrinsicBuilder, Nonce,
};
use std::sync::Arc;

/// Per-index customization of the extrinsic builder.
pub trait ExtrinsicCustomizer: Send + Sync {
	/// Customize builder of the extrinsic with given index.
	fn customize(&self, builder: ExtrinsicBuilder, index: usize) -> Result<ExtrinsicBuilder>;
}

impl<F> ExtrinsicCustomizer for F
where
	F: Fn(ExtrinsicBuilder, usize) -> Result<ExtrinsicBuilder> + Send + Sync,
{
	fn customize(&self, builder: ExtrinsicBuilder, index: usize) -> Result<ExtrinsicBuilder> {
		self(builder, index)
	}
}

/// Shared reference to the customizer.
pub type CustomizerRef = Arc<dyn ExtrinsicCustomizer>;

/// Operations, producing encoded extrinsics.
pub struct ExtrinsicOperations {
	/// Operation per extrinsic, in index order.
	pub extrinsics: Vec<Operation<Vec<u8>>>,
	/// Operations that fetch chain state, shared by all extrinsics.
	pub dependencies: Vec<Arc<dyn Cancellable>>,
}

impl ExtrinsicOperations {
	/// All operations: shared dependencies followed by per-extrinsic operations.
	pub fn all_operations(&self) -> Vec<Arc<dyn Cancellable>> {
		let mut operations = self.dependencies.clone();
		operations.extend(
			self.extrinsics.iter().map(|op| Arc::new(op.clone()) as Arc<dyn Cancellable>),
		);
		operations
	}
}

/// Factory of extrinsic assembly operations.
///
/// The fee estimation and submission pipelines are generic over this factory, so extrinsics
/// may be assembled differently (e.g. wrapped into proxy calls) without changing them.
pub trait ExtrinsicBuilderOperationFactory: Send + Sync {
	/// Create operations that assemble `count` extrinsics, signed with given signer.
	fn create_extrinsic_operations(
		&self,
		customizer: CustomizerRef,
		count: usize,
		signer: Arc<dyn SigningWrapper>,
	) -> ExtrinsicOperations;

	/// Signer that is used to build extrinsics for fee estimation.
	fn dummy_signer(&self) -> Arc<dyn SigningWrapper> {
		Arc::new(DummySigner)
	}
}

/// Sender of the extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicSender {
	/// Raw account id.
	pub account_id: Vec<u8>,
	/// Crypto type of the account.
	pub crypto_type: CryptoType,
}

/// Chain state, shared by all extrinsics of a single invocation.
#[derive(Debug, Clone)]
struct SharedState {
	nonce: Nonce,
	coder: CoderFactoryRef,
	genesis_hash: BlockHash,
	era: EraInfo,
	era_block_hash: BlockHash,
}

/// Values, that every builder is seeded with.
#[derive(Debug, Clone)]
struct BuilderSeed {
	address: ExtrinsicAddress,
	default_tip: Option<u128>,
	extensions: Vec<ExtensionRef>,
	context: SigningContext,
}

/// Default extrinsic assembly: the sender signs extrinsics on their own behalf.
pub struct DefaultExtrinsicBuilderOperationFactory {
	connection: ConnectionRef,
	runtime: Arc<dyn RuntimeProvider>,
	era_factory: Arc<dyn EraOperationFactory>,
	text_address: String,
	seed: Arc<BuilderSeed>,
}

impl DefaultExtrinsicBuilderOperationFactory {
	/// Create factory for given sender.
	///
	/// Fails if the sender account id does not match the chain address format.
	pub fn new(
		config: &ChainConfig,
		connection: ConnectionRef,
		runtime: Arc<dyn RuntimeProvider>,
		sender: ExtrinsicSender,
	) -> Result<Self> {
		let chain_format = config.chain_format;
		let address = chain_format.address(&sender.account_id)?;
		let text_address = chain_format.text_address(&sender.account_id)?;

		Ok(DefaultExtrinsicBuilderOperationFactory {
			connection,
			runtime,
			era_factory: Arc::new(MortalEraOperationFactory::new(config.mortality_period)),
			text_address,
			seed: Arc::new(BuilderSeed {
				address,
				default_tip: config.default_tip,
				extensions: config.extension_refs(),
				context: SigningContext { crypto_type: sender.crypto_type, chain_format },
			}),
		})
	}

	/// Use given era resolver.
	#[must_use]
	pub fn with_era_factory(mut self, era_factory: Arc<dyn EraOperationFactory>) -> Self {
		self.era_factory = era_factory;
		self
	}

	/// Add custom extension to every extrinsic, after the extensions of the chain configuration.
	#[must_use]
	pub fn with_extension(mut self, extension: ExtensionRef) -> Self {
		Arc::make_mut(&mut self.seed).extensions.push(extension);
		self
	}

	fn shared_state_operation(&self) -> (Operation<SharedState>, Vec<Arc<dyn Cancellable>>) {
		let nonce = state::nonce_operation(self.connection.clone(), self.text_address.clone());
		let coder = self.runtime.fetch_coder_factory_operation();
		let genesis_hash = state::genesis_hash_operation(self.connection.clone());
		let era = self.era_factory.create_operation(self.connection.clone(), self.runtime.clone());
		let era_block_hash = state::block_hash_operation(self.connection.clone(), {
			let era = era.clone();
			async move { era.result().await.map(|era| era.anchor_block_number()) }
		});

		let dependencies: Vec<Arc<dyn Cancellable>> = vec![
			Arc::new(nonce.clone()),
			Arc::new(coder.clone()),
			Arc::new(genesis_hash.clone()),
			Arc::new(era.clone()),
			Arc::new(era_block_hash.clone()),
		];

		let shared_state = Operation::spawn("extrinsic-state", async move {
			let (nonce, coder, genesis_hash, era, era_block_hash) = futures::try_join!(
				nonce.result(),
				coder.result(),
				genesis_hash.result(),
				era.result(),
				era_block_hash.result(),
			)?;

			Ok(SharedState { nonce, coder, genesis_hash, era, era_block_hash })
		});

		(shared_state, dependencies)
	}
}

impl ExtrinsicBuilderOperationFactory for DefaultExtrinsicBuilderOperationFactory {
	fn create_extrinsic_operations(
		&self,
		customizer: CustomizerRef,
		count: usize,
		signer: Arc<dyn SigningWrapper>,
	) -> ExtrinsicOperations {
		let (shared_state, mut dependencies) = self.shared_state_operation();
		dependencies.push(Arc::new(shared_state.clone()));

		let extrinsics = (0..count)
			.map(|index| {
				let shared_state = shared_state.clone();
				let seed = self.seed.clone();
				let customizer = customizer.clone();
				let signer = signer.clone();
				Operation::spawn("extrinsic", async move {
					let state = shared_state.result().await?;
					build_extrinsic(&state, &seed, &*customizer, &*signer, index)
				})
			})
			.collect();

		ExtrinsicOperations { extrinsics, dependencies }
	}
}

fn build_extrinsic(
	state: &SharedState,
	seed: &BuilderSeed,
	customizer: &dyn ExtrinsicCustomizer,
	signer: &dyn SigningWrapper,
	index: usize,
) -> Result<Vec<u8>> {
	let coder = &*state.coder;
	let nonce = state.nonce.wrapping_add(index as Nonce);

	let mut builder =
		ExtrinsicBuilder::new(coder.spec_version(), coder.transaction_version(), state.genesis_hash)
			.with_era(state.era.era, state.era_block_hash)
			.with_nonce(nonce);
	if let Some(default_tip) = seed.default_tip {
		builder = builder.with_tip(default_tip);
	}
	for extension in &seed.extensions {
		builder = builder.adding_extension(extension.clone());
	}
	builder = builder.with_address(seed.address);

	let builder = customizer.customize(builder, index)?;
	let builder = sign_extrinsic(builder, signer, &seed.context, coder)?;
	let extrinsic = builder.build(coder)?;

	log::debug!(
		target: LOG_TARGET,
		"Built extrinsic #{index} with nonce {nonce}: {} bytes",
		extrinsic.len(),
	);

	Ok(extrinsic)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		config::ExtensionConfig,
		runtime::StaticRuntimeProvider,
		test_utils::{test_chain_config, test_connection, test_sender, TEST_NONCE},
	};
	use extrinsic_primitives::{
		extensions::{check_metadata_hash, CHECK_METADATA_HASH},
		test_utils::{test_coder_with_layout, TEST_CHAIN_FORMAT},
		ExtrinsicLayout, RuntimeCoderFactory,
	};
	use sp_core::H256;

	#[async_std::test]
	async fn custom_extensions_are_added_to_every_extrinsic() {
		let extension: ExtensionRef = Arc::new(check_metadata_hash(None));
		let coder = Arc::new(test_coder_with_layout(
			ExtrinsicLayout::new(TEST_CHAIN_FORMAT).with_extension(extension.clone()),
		));
		let factory = DefaultExtrinsicBuilderOperationFactory::new(
			&test_chain_config(),
			Arc::new(test_connection()),
			Arc::new(StaticRuntimeProvider::new(coder.clone())),
			test_sender(),
		)
		.unwrap()
		.with_extension(extension);

		let customizer: CustomizerRef =
			Arc::new(|builder: ExtrinsicBuilder, _: usize| -> Result<ExtrinsicBuilder> {
				Ok(builder.adding_encoded_call(vec![0, 1]))
			});
		let operations = factory.create_extrinsic_operations(customizer, 2, Arc::new(DummySigner));

		assert_eq!(operations.extrinsics.len(), 2);
		for (index, operation) in operations.extrinsics.iter().enumerate() {
			let extrinsic = operation.result().await.unwrap();
			let signature = coder.decode_extrinsic(&extrinsic).unwrap().signature.unwrap();
			assert_eq!(signature.nonce, TEST_NONCE + index as u32);
			assert_eq!(signature.extensions, vec![(CHECK_METADATA_HASH.to_owned(), vec![0])]);
		}
	}

	#[async_std::test]
	async fn configured_extensions_are_added_to_every_extrinsic() {
		let config = ChainConfig {
			extensions: vec![ExtensionConfig::CheckMetadataHash {
				metadata_hash: Some(H256::repeat_byte(7)),
			}],
			..test_chain_config()
		};
		let coder = Arc::new(test_coder_with_layout(config.extrinsic_layout()));
		let factory = DefaultExtrinsicBuilderOperationFactory::new(
			&config,
			Arc::new(test_connection()),
			Arc::new(StaticRuntimeProvider::new(coder.clone())),
			test_sender(),
		)
		.unwrap();

		let customizer: CustomizerRef =
			Arc::new(|builder: ExtrinsicBuilder, _: usize| -> Result<ExtrinsicBuilder> {
				Ok(builder.adding_encoded_call(vec![0, 1]))
			});
		let operations = factory.create_extrinsic_operations(customizer, 1, Arc::new(DummySigner));

		let extrinsic = operations.extrinsics[0].result().await.unwrap();
		let signature = coder.decode_extrinsic(&extrinsic).unwrap().signature.unwrap();
		assert_eq!(signature.extensions, vec![(CHECK_METADATA_HASH.to_owned(), vec![1])]);
	}
}
