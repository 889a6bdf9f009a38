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

//! Substrate RPC methods and types, used by the service.

use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use sp_core::hashing::blake2_64;

/// Returns next transaction index of the account.
pub const SYSTEM_ACCOUNT_NEXT_INDEX: &str = "system_accountNextIndex";
/// Returns hash of the block with given number.
pub const CHAIN_GET_BLOCK_HASH: &str = "chain_getBlockHash";
/// Returns header of the best block.
pub const CHAIN_GET_HEADER: &str = "chain_getHeader";
/// Returns version of the runtime.
pub const STATE_GET_RUNTIME_VERSION: &str = "state_getRuntimeVersion";
/// Legacy fee query method.
pub const PAYMENT_QUERY_INFO: &str = "payment_queryInfo";
/// Calls runtime API function.
pub const STATE_CALL: &str = "state_call";
/// Submits extrinsic to the transaction pool.
pub const AUTHOR_SUBMIT_EXTRINSIC: &str = "author_submitExtrinsic";

/// Name of the runtime API that estimates transaction fees.
pub const TRANSACTION_PAYMENT_API: &str = "TransactionPaymentApi";
/// Runtime function that estimates transaction fee.
pub const TRANSACTION_PAYMENT_QUERY_INFO: &str = "TransactionPaymentApi_query_info";

/// Header of the block, as it is returned by `chain_getHeader`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcHeader {
	/// Hex-encoded block number.
	pub number: String,
	/// Hash of the parent block.
	pub parent_hash: String,
}

impl RpcHeader {
	/// Decoded block number.
	pub fn block_number(&self) -> Result<u64> {
		u64::from_str_radix(self.number.trim_start_matches("0x"), 16)
			.map_err(|e| Error::response_decoding(CHAIN_GET_HEADER, e))
	}
}

/// Version of the runtime, as it is returned by `state_getRuntimeVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRuntimeVersion {
	/// Version of the runtime specification.
	pub spec_version: u32,
	/// Version of the transaction format.
	pub transaction_version: u32,
	/// Runtime APIs, identified by hex-encoded `blake2_64` hash of their name, with versions.
	#[serde(default)]
	pub apis: Vec<(String, u32)>,
}

impl RpcRuntimeVersion {
	/// Version of given runtime API, if the runtime implements it.
	pub fn api_version(&self, api_name: &str) -> Option<u32> {
		let api_id = to_hex(&blake2_64(api_name.as_bytes()));
		self.apis
			.iter()
			.find(|(id, _)| id.eq_ignore_ascii_case(&api_id))
			.map(|(_, version)| *version)
	}
}

/// Encode bytes as `0x`-prefixed hex string.
pub fn to_hex(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex string, returned by given method.
pub fn from_hex(method: &str, value: &str) -> Result<Vec<u8>> {
	hex::decode(value.trim_start_matches("0x")).map_err(|e| Error::response_decoding(method, e))
}

/// Encode block number as it is expected by `chain_getBlockHash`.
pub fn hex_block_number(number: u64) -> String {
	format!("0x{number:x}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_number_is_parsed() {
		let header: RpcHeader =
			serde_json::from_value(serde_json::json!({"number": "0x1f4", "parentHash": "0x00"}))
				.unwrap();
		assert_eq!(header.block_number().unwrap(), 500);
	}

	#[test]
	fn runtime_api_is_found_by_name() {
		let version = RpcRuntimeVersion {
			spec_version: 1,
			transaction_version: 1,
			apis: vec![(to_hex(&blake2_64(TRANSACTION_PAYMENT_API.as_bytes())), 4)],
		};
		assert_eq!(version.api_version(TRANSACTION_PAYMENT_API), Some(4));
		assert_eq!(version.api_version("Core"), None);
	}

	#[test]
	fn hex_helpers_use_prefix() {
		assert_eq!(to_hex(&[1, 255]), "0x01ff");
		assert_eq!(from_hex(STATE_CALL, "0x01ff").unwrap(), vec![1, 255]);
		assert_eq!(hex_block_number(0), "0x0");
		assert_eq!(hex_block_number(255), "0xff");
	}
}
