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

//! Fee and weight of the dispatchable.

use codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize};

/// Runtime type of the `TransactionPaymentApi::query_info` result.
pub const RUNTIME_DISPATCH_INFO_TYPE: &str =
	"pallet_transaction_payment::types::RuntimeDispatchInfo";

/// Weight of the dispatchable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase", from = "WeightRepr")]
pub struct Weight {
	/// Computational time.
	#[codec(compact)]
	pub ref_time: u64,
	/// Size of the storage proof.
	#[codec(compact)]
	pub proof_size: u64,
}

impl Weight {
	/// Create weight from its parts.
	pub const fn from_parts(ref_time: u64, proof_size: u64) -> Self {
		Weight { ref_time, proof_size }
	}
}

/// Weight, as it is returned by old and new runtimes.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeightRepr {
	V1(u64),
	V2 {
		#[serde(alias = "ref_time", rename = "refTime")]
		ref_time: u64,
		#[serde(alias = "proof_size", rename = "proofSize", default)]
		proof_size: u64,
	},
}

impl From<WeightRepr> for Weight {
	fn from(repr: WeightRepr) -> Self {
		match repr {
			WeightRepr::V1(ref_time) => Weight::from_parts(ref_time, 0),
			WeightRepr::V2 { ref_time, proof_size } => Weight::from_parts(ref_time, proof_size),
		}
	}
}

/// Dispatch class of the dispatchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum DispatchClass {
	/// Normal transaction.
	Normal,
	/// Operational transaction.
	Operational,
	/// Mandatory (inherent) dispatch.
	Mandatory,
}

/// `RuntimeDispatchInfo` of runtimes using two-dimensional weights.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RuntimeDispatchInfo {
	/// Weight of the dispatchable.
	pub weight: Weight,
	/// Class of the dispatchable.
	pub class: DispatchClass,
	/// Inclusion fee, excluding the tip.
	pub partial_fee: u128,
}

/// `RuntimeDispatchInfo` of runtimes using single-dimensional weights.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RuntimeDispatchInfoV1 {
	/// Weight of the dispatchable.
	pub weight: u64,
	/// Class of the dispatchable.
	pub class: DispatchClass,
	/// Inclusion fee, excluding the tip.
	pub partial_fee: u128,
}

impl From<RuntimeDispatchInfoV1> for RuntimeDispatchInfo {
	fn from(info: RuntimeDispatchInfoV1) -> Self {
		RuntimeDispatchInfo {
			weight: Weight::from_parts(info.weight, 0),
			class: info.class,
			partial_fee: info.partial_fee,
		}
	}
}

/// Fee and weight of the extrinsic, in the shape reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchInfo {
	/// Fee, decimal string.
	#[serde(alias = "partialFee", deserialize_with = "deserialize_fee")]
	pub fee: String,
	/// Weight of the extrinsic.
	pub weight: Weight,
}

impl DispatchInfo {
	/// Fee as a number. `None` if the fee string is not a valid unsigned integer.
	pub fn fee_value(&self) -> Option<u128> {
		self.fee.parse().ok()
	}
}

impl From<RuntimeDispatchInfo> for DispatchInfo {
	fn from(info: RuntimeDispatchInfo) -> Self {
		DispatchInfo { fee: info.partial_fee.to_string(), weight: info.weight }
	}
}

fn deserialize_fee<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Fee {
		Text(String),
		Number(u128),
	}

	Ok(match Fee::deserialize(deserializer)? {
		Fee::Text(fee) => fee,
		Fee::Number(fee) => fee.to_string(),
	})
}
