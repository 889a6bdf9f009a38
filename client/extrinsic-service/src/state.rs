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

//! Operations that fetch chain state, required to build the extrinsic.

use crate::{
	connection::{self, ConnectionRef},
	error::{Error, Result},
	operation::Operation,
	rpc::{from_hex, hex_block_number, CHAIN_GET_BLOCK_HASH, SYSTEM_ACCOUNT_NEXT_INDEX},
	LOG_TARGET,
};

use extrinsic_primitives::{BlockHash, Nonce};
use serde_json::json;
use std::future::Future;

/// Fetch next nonce of the account with given (chain-formatted) address.
pub fn nonce_operation(connection: ConnectionRef, address: String) -> Operation<Nonce> {
	Operation::spawn("nonce", async move {
		let nonce: Nonce =
			connection::request(&*connection, SYSTEM_ACCOUNT_NEXT_INDEX, vec![json!(address)])
				.await?;
		log::trace!(target: LOG_TARGET, "Next nonce of {address} is {nonce}");
		Ok(nonce)
	})
}

/// Fetch hash of the block with given number.
///
/// The block number is computed when the operation starts. If it can't be computed, the
/// request is not sent and the operation fails with the same error.
pub fn block_hash_operation<F>(connection: ConnectionRef, block_number: F) -> Operation<BlockHash>
where
	F: Future<Output = Result<u64>> + Send + 'static,
{
	Operation::spawn("block-hash", async move {
		let block_number = block_number.await?;
		let hash: Option<String> = connection::request(
			&*connection,
			CHAIN_GET_BLOCK_HASH,
			vec![json!(hex_block_number(block_number))],
		)
		.await?;

		let hash = hash.ok_or_else(|| Error::UnknownBlock(block_number.to_string()))?;
		parse_block_hash(&hash)
	})
}

/// Fetch hash of the genesis block.
pub fn genesis_hash_operation(connection: ConnectionRef) -> Operation<BlockHash> {
	block_hash_operation(connection, futures::future::ready(Ok(0)))
}

fn parse_block_hash(hash: &str) -> Result<BlockHash> {
	let raw = from_hex(CHAIN_GET_BLOCK_HASH, hash)?;
	if raw.len() != BlockHash::len_bytes() {
		return Err(Error::response_decoding(
			CHAIN_GET_BLOCK_HASH,
			format!("invalid hash length {}", raw.len()),
		))
	}

	Ok(BlockHash::from_slice(&raw))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		rpc::to_hex,
		test_utils::{TestConnection, TEST_GENESIS_HASH},
	};
	use assert_matches::assert_matches;
	use serde_json::Value;
	use std::sync::Arc;

	#[async_std::test]
	async fn nonce_is_fetched_for_address() {
		let connection =
			Arc::new(TestConnection::new().with_response(SYSTEM_ACCOUNT_NEXT_INDEX, json!(7)));
		let nonce = nonce_operation(connection.clone(), "5Gr".into()).result().await;

		assert_matches!(nonce, Ok(7));
		assert_eq!(connection.requests_of(SYSTEM_ACCOUNT_NEXT_INDEX), vec![vec![json!("5Gr")]]);
	}

	#[async_std::test]
	async fn genesis_hash_is_requested_by_zero_number() {
		let connection = Arc::new(
			TestConnection::new()
				.with_response(CHAIN_GET_BLOCK_HASH, json!(to_hex(TEST_GENESIS_HASH.as_bytes()))),
		);
		let hash = genesis_hash_operation(connection.clone()).result().await;

		assert_matches!(hash, Ok(hash) if hash == TEST_GENESIS_HASH);
		assert_eq!(connection.requests_of(CHAIN_GET_BLOCK_HASH), vec![vec![json!("0x0")]]);
	}

	#[async_std::test]
	async fn request_is_not_sent_if_block_number_is_unknown() {
		let connection = Arc::new(TestConnection::new());
		let hash = block_hash_operation(
			connection.clone(),
			futures::future::ready(Err(Error::Custom("no era".into()))),
		)
		.result()
		.await;

		assert_matches!(hash, Err(Error::Custom(_)));
		assert!(connection.requests().is_empty());
	}

	#[async_std::test]
	async fn missing_block_is_reported() {
		let connection =
			Arc::new(TestConnection::new().with_response(CHAIN_GET_BLOCK_HASH, Value::Null));
		let hash = block_hash_operation(connection, futures::future::ready(Ok(100))).result().await;

		assert_matches!(hash, Err(Error::UnknownBlock(number)) if number == "100");
	}
}
