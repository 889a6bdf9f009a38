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

//! Utilities that are useful when testing code that uses the extrinsic service.

use crate::{
	assembly::ExtrinsicSender,
	config::ChainConfig,
	connection::Connection,
	error::{Error, Result},
	rpc::*,
	runtime::{RuntimeProvider, StaticRuntimeProvider},
};

use async_trait::async_trait;
use codec::Encode;
use futures::{
	channel::oneshot,
	future::{BoxFuture, FutureExt},
};
use extrinsic_primitives::{
	dispatch_info::DispatchClass,
	test_utils::{test_coder, TEST_SPEC_VERSION, TEST_TRANSACTION_VERSION},
	BlockHash, CryptoType, RuntimeDispatchInfo, Weight,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use sp_core::hashing::{blake2_256, blake2_64};
use std::{collections::HashMap, future::Future, sync::Arc};

/// Account id of the test sender.
pub const TEST_ACCOUNT_ID: [u8; 32] = [1u8; 32];
/// Next nonce of the test sender.
pub const TEST_NONCE: u32 = 10;
/// Number of the best block of the test chain.
pub const TEST_BEST_BLOCK: u64 = 100;
/// Genesis hash of the test chain.
pub const TEST_GENESIS_HASH: BlockHash = BlockHash::repeat_byte(0x11);
/// Hash of all non-genesis blocks of the test chain.
pub const TEST_BLOCK_HASH: BlockHash = BlockHash::repeat_byte(0x22);
/// Fee that the test chain reports for every extrinsic.
pub const TEST_BASE_FEE: u128 = 1_000;
/// Weight that the test chain reports for every extrinsic.
pub const TEST_WEIGHT: Weight = Weight::from_parts(1_000, 64);

type Handler = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Connection with scripted responses, that records all requests.
#[derive(Default)]
pub struct TestConnection {
	handlers: HashMap<String, Handler>,
	requests: Mutex<Vec<(String, Vec<Value>)>>,
}

impl TestConnection {
	/// Create connection that fails all requests.
	pub fn new() -> Self {
		Self::default()
	}

	/// Handle requests of given method with given function.
	#[must_use]
	pub fn with_handler(
		self,
		method: &str,
		handler: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
	) -> Self {
		self.with_async_handler(method, move |params| futures::future::ready(handler(&params)))
	}

	/// Handle requests of given method with given asynchronous function.
	#[must_use]
	pub fn with_async_handler<Fut>(
		mut self,
		method: &str,
		handler: impl Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
	) -> Self
	where
		Fut: Future<Output = Result<Value>> + Send + 'static,
	{
		let handler: Handler = Arc::new(move |params| handler(params).boxed());
		self.handlers.insert(method.into(), handler);
		self
	}

	/// Respond to requests of given method with given value, but only after the returned
	/// sender is triggered (or dropped).
	#[must_use]
	pub fn with_delayed_response(
		self,
		method: &str,
		response: Value,
	) -> (Self, oneshot::Sender<()>) {
		let (release, released) = oneshot::channel::<()>();
		let released = released.shared();
		let connection = self.with_async_handler(method, move |_| {
			let released = released.clone();
			let response = response.clone();
			async move {
				let _ = released.await;
				Ok(response)
			}
		});

		(connection, release)
	}

	/// Respond to all requests of given method with given value.
	#[must_use]
	pub fn with_response(self, method: &str, response: Value) -> Self {
		self.with_handler(method, move |_| Ok(response.clone()))
	}

	/// Fail all requests of given method with transport error.
	#[must_use]
	pub fn with_error(self, method: &str, error: &str) -> Self {
		let error = error.to_owned();
		self.with_handler(method, move |_| {
			Err(Error::transport(jsonrpsee::core::ClientError::Custom(error.clone())))
		})
	}

	/// All requests, in order they have been received.
	pub fn requests(&self) -> Vec<(String, Vec<Value>)> {
		self.requests.lock().clone()
	}

	/// Parameters of all requests of given method.
	pub fn requests_of(&self, method: &str) -> Vec<Vec<Value>> {
		self.requests
			.lock()
			.iter()
			.filter(|(request_method, _)| request_method == method)
			.map(|(_, params)| params.clone())
			.collect()
	}
}

#[async_trait]
impl Connection for TestConnection {
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		self.requests.lock().push((method.into(), params.clone()));
		match self.handlers.get(method).cloned() {
			Some(handler) => handler(params).await,
			None => Err(Error::Custom(format!("Unexpected request: {method}"))),
		}
	}
}

/// Response of `state_getRuntimeVersion`.
pub fn runtime_version_json(spec_version: u32, payment_api_version: Option<u32>) -> Value {
	let apis: Vec<(String, u32)> = payment_api_version
		.map(|version| (to_hex(&blake2_64(TRANSACTION_PAYMENT_API.as_bytes())), version))
		.into_iter()
		.collect();
	json!({
		"specName": "test",
		"specVersion": spec_version,
		"transactionVersion": TEST_TRANSACTION_VERSION,
		"apis": apis,
	})
}

/// Connection to the test chain, that responds to all requests of the service.
///
/// Submitted extrinsics are accepted and their hashes are returned.
pub fn test_connection() -> TestConnection {
	let dispatch_info = RuntimeDispatchInfo {
		weight: TEST_WEIGHT,
		class: DispatchClass::Normal,
		partial_fee: TEST_BASE_FEE,
	};

	TestConnection::new()
		.with_response(SYSTEM_ACCOUNT_NEXT_INDEX, json!(TEST_NONCE))
		.with_response(
			CHAIN_GET_HEADER,
			json!({
				"number": hex_block_number(TEST_BEST_BLOCK),
				"parentHash": to_hex(&[0u8; 32]),
			}),
		)
		.with_handler(CHAIN_GET_BLOCK_HASH, |params| {
			let hash = match params.first() {
				Some(number) if *number == json!(hex_block_number(0)) => TEST_GENESIS_HASH,
				_ => TEST_BLOCK_HASH,
			};
			Ok(json!(to_hex(hash.as_bytes())))
		})
		.with_response(
			STATE_GET_RUNTIME_VERSION,
			runtime_version_json(TEST_SPEC_VERSION, Some(2)),
		)
		.with_response(STATE_CALL, json!(to_hex(&dispatch_info.encode())))
		.with_response(
			PAYMENT_QUERY_INFO,
			json!({
				"weight": TEST_WEIGHT,
				"class": "normal",
				"partialFee": TEST_BASE_FEE.to_string(),
			}),
		)
		.with_handler(AUTHOR_SUBMIT_EXTRINSIC, |params| {
			let extrinsic = params.first().and_then(Value::as_str).unwrap_or_default();
			let extrinsic = from_hex(AUTHOR_SUBMIT_EXTRINSIC, extrinsic)?;
			Ok(json!(to_hex(&blake2_256(&extrinsic))))
		})
}

/// Extrinsic from hex-encoded request parameter.
pub fn extrinsic_from_param(param: &Value) -> Vec<u8> {
	from_hex(AUTHOR_SUBMIT_EXTRINSIC, param.as_str().unwrap_or_default()).unwrap_or_default()
}

/// Provider of the test runtime coder factory.
pub fn test_runtime_provider() -> Arc<dyn RuntimeProvider> {
	Arc::new(StaticRuntimeProvider::new(Arc::new(test_coder())))
}

/// Sender of test extrinsics.
pub fn test_sender() -> ExtrinsicSender {
	ExtrinsicSender { account_id: TEST_ACCOUNT_ID.to_vec(), crypto_type: CryptoType::Sr25519 }
}

/// Configuration of the test chain.
pub fn test_chain_config() -> ChainConfig {
	ChainConfig { name: "Test".into(), ..Default::default() }
}
