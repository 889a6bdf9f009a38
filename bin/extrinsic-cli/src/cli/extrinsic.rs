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


//! Build, estimate fees of and submit extrinsics with given calls.

use crate::cli::{
	chain_schema::{ChainCliParams, ConnectionCliParams, Signer, SigningCliParams},
	HexBytes,
};

use clap::Args;
use extrinsic_primitives::ExtrinsicBuilder;
use extrinsic_service::{
	ConnectionRef, ExtrinsicOperationFactory, RpcConnection, RpcRuntimeProvider, LOG_TARGET,
};
use std::sync::Arc;

/// Params, shared by all extrinsic commands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicParams {
	#[command(flatten)]
	pub connection: ConnectionCliParams,
	#[command(flatten)]
	pub signing: SigningCliParams,
	#[command(flatten)]
	pub chain: ChainCliParams,
	/// Hex-encoded runtime call. Several calls are wrapped into `Utility.batch_all` call,
	/// whose index must be known to the chain configuration.
	#[arg(long = "call", required = true)]
	pub calls: Vec<HexBytes>,
}

impl ExtrinsicParams {
	/// Connect to the node and create factory of extrinsics.
	async fn connect(&self) -> anyhow::Result<(ExtrinsicOperationFactory, Signer)> {
		let connection = RpcConnection::new(&self.connection.clone().into()).await?;
		self.factory(Arc::new(connection))
	}

	/// Create factory of extrinsics, that uses given connection.
	fn factory(
		&self,
		connection: ConnectionRef,
	) -> anyhow::Result<(ExtrinsicOperationFactory, Signer)> {
		let config = self.chain.chain_config()?;
		let signer = self.signing.to_signer()?;
		let runtime = RpcRuntimeProvider::new(
			connection.clone(),
			Arc::new(config.clone()),
			config.extrinsic_layout(),
		);
		let factory = ExtrinsicOperationFactory::new(
			config,
			connection,
			Arc::new(runtime),
			signer.sender.clone(),
		)?;

		Ok((factory, signer))
	}

	fn calls(&self) -> Vec<Vec<u8>> {
		self.calls.iter().map(|call| call.0.clone()).collect()
	}
}

fn with_calls(builder: ExtrinsicBuilder, calls: &[Vec<u8>]) -> ExtrinsicBuilder {
	calls.iter().cloned().fold(builder, ExtrinsicBuilder::adding_encoded_call)
}

/// Build single signed extrinsic.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct BuildExtrinsic {
	#[command(flatten)]
	pub params: ExtrinsicParams,
}

impl BuildExtrinsic {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		let (factory, signer) = self.params.connect().await?;
		println!("{}", self.build(&factory, signer).await?);
		Ok(())
	}

	async fn build(
		&self,
		factory: &ExtrinsicOperationFactory,
		signer: Signer,
	) -> anyhow::Result<String> {
		let calls = self.params.calls();
		let extrinsic = factory
			.build_extrinsic(move |builder| Ok(with_calls(builder, &calls)), signer.signer)
			.result()
			.await?;
		Ok(extrinsic)
	}
}

/// Estimate fees of extrinsics.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EstimateFee {
	#[command(flatten)]
	pub params: ExtrinsicParams,
	/// Number of extrinsics.
	#[arg(long, default_value_t = 1)]
	pub count: usize,
}

impl EstimateFee {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		let (factory, _) = self.params.connect().await?;
		for fee in self.estimate(&factory).await? {
			println!("{}", serde_json::to_string(&fee)?);
		}
		Ok(())
	}

	async fn estimate(
		&self,
		factory: &ExtrinsicOperationFactory,
	) -> anyhow::Result<Vec<extrinsic_primitives::DispatchInfo>> {
		let calls = self.params.calls();
		let results = factory
			.estimate_fee_operation(
				move |builder: ExtrinsicBuilder, _index: usize| -> extrinsic_service::Result<_> {
					Ok(with_calls(builder, &calls))
				},
				self.count,
			)
			.result()
			.await?;

		collect_results("estimate fee of", results)
	}
}

/// Sign and submit extrinsics.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SubmitExtrinsics {
	#[command(flatten)]
	pub params: ExtrinsicParams,
	/// Number of extrinsics. Every extrinsic uses the next nonce of the signer.
	#[arg(long, default_value_t = 1)]
	pub count: usize,
}

impl SubmitExtrinsics {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		let (factory, signer) = self.params.connect().await?;
		for hash in self.submit(&factory, signer).await? {
			println!("{hash}");
		}
		Ok(())
	}

	async fn submit(
		&self,
		factory: &ExtrinsicOperationFactory,
		signer: Signer,
	) -> anyhow::Result<Vec<String>> {
		let calls = self.params.calls();
		let results = factory
			.submit(
				move |builder: ExtrinsicBuilder, _index: usize| -> extrinsic_service::Result<_> {
					Ok(with_calls(builder, &calls))
				},
				signer.signer,
				self.count,
			)
			.result()
			.await?;

		collect_results("submit", results)
	}
}

/// Log every failed extrinsic and fail if there are any.
fn collect_results<T>(
	action: &str,
	results: Vec<extrinsic_service::Result<T>>,
) -> anyhow::Result<Vec<T>> {
	let total = results.len();
	let mut values = Vec::with_capacity(total);
	let mut failures = 0;
	for (index, result) in results.into_iter().enumerate() {
		match result {
			Ok(value) => values.push(value),
			Err(error) => {
				log::error!(target: LOG_TARGET, "Failed to {action} extrinsic #{index}: {error}");
				failures += 1;
			},
		}
	}

	if failures != 0 {
		return Err(anyhow::format_err!("Failed to {action} {failures} of {total} extrinsics"))
	}

	log::info!(target: LOG_TARGET, "Processed {total} extrinsics");
	Ok(values)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cli::chain_schema::SignerCrypto;
	use extrinsic_primitives::DecodedExtrinsic;
	use extrinsic_service::{
		rpc::AUTHOR_SUBMIT_EXTRINSIC,
		test_utils::{extrinsic_from_param, test_connection, TEST_BASE_FEE},
	};

	fn params() -> ExtrinsicParams {
		ExtrinsicParams {
			connection: ConnectionCliParams {
				uri: None,
				host: "127.0.0.1".into(),
				port: 9944,
				path: None,
				secure: false,
			},
			signing: SigningCliParams {
				signer: Some("//Alice".into()),
				signer_password: None,
				signer_file: None,
				signer_password_file: None,
				signer_crypto: SignerCrypto::Sr25519,
			},
			chain: ChainCliParams {
				chain_config: None,
				ss58_prefix: None,
				tip: None,
				transactions_mortality: None,
			},
			calls: vec![HexBytes(vec![0, 7, 42])],
		}
	}

	#[async_std::test]
	async fn fee_is_estimated_for_every_extrinsic() {
		let command = EstimateFee { params: params(), count: 3 };
		let (factory, _) = command.params.factory(Arc::new(test_connection())).unwrap();

		let fees = command.estimate(&factory).await.unwrap();

		assert_eq!(fees.len(), 3);
		assert!(fees.iter().all(|fee| fee.fee == TEST_BASE_FEE.to_string()));
	}

	#[async_std::test]
	async fn submitted_extrinsics_carry_the_call_and_tip() {
		let mut params = params();
		params.chain.tip = Some(5);
		let command = SubmitExtrinsics { params, count: 2 };
		let connection = Arc::new(test_connection());
		let (factory, signer) = command.params.factory(connection.clone()).unwrap();

		let hashes = command.submit(&factory, signer).await.unwrap();

		assert_eq!(hashes.len(), 2);
		let layout = factory.config().extrinsic_layout();
		for request in connection.requests_of(AUTHOR_SUBMIT_EXTRINSIC) {
			let extrinsic = extrinsic_from_param(&request[0]);
			let decoded = DecodedExtrinsic::decode_with(&layout, &extrinsic).unwrap();
			assert_eq!(decoded.call, vec![0, 7, 42]);
			assert_eq!(decoded.tip(), Some(5));
		}
	}

	#[async_std::test]
	async fn failed_submission_fails_command() {
		let connection =
			Arc::new(test_connection().with_error(AUTHOR_SUBMIT_EXTRINSIC, "pool is full"));
		let command = SubmitExtrinsics { params: params(), count: 1 };
		let (factory, signer) = command.params.factory(connection).unwrap();

		assert!(command.submit(&factory, signer).await.is_err());
	}

	#[async_std::test]
	async fn built_extrinsic_is_hex_encoded() {
		let command = BuildExtrinsic { params: params() };
		let (factory, signer) = command.params.factory(Arc::new(test_connection())).unwrap();

		let extrinsic = command.build(&factory, signer).await.unwrap();

		assert!(extrinsic.starts_with("0x"));
		let extrinsic = hex::decode(&extrinsic[2..]).unwrap();
		let layout = factory.config().extrinsic_layout();
		let decoded = DecodedExtrinsic::decode_with(&layout, &extrinsic).unwrap();
		assert!(decoded.signature.is_some());
	}
}
