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

//! Runtime coder factory: the runtime-aware encode/decode capability used by the builder.

use crate::{
	dispatch_info::{
		DispatchInfo, RuntimeDispatchInfo, RuntimeDispatchInfoV1, RUNTIME_DISPATCH_INFO_TYPE,
	},
	error::{EncodingError, Result},
	extrinsic::{DecodedExtrinsic, ExtrinsicLayout},
};

use codec::Decode;
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt::Debug,
};

/// Pallet and call indices of the runtime call.
pub type CallIndex = [u8; 2];

/// Name of the utility pallet.
pub const UTILITY_PALLET: &str = "Utility";
/// Name of the `batch_all` call of the utility pallet.
pub const BATCH_ALL_CALL: &str = "batch_all";

/// Runtime-aware encoding and decoding capability, valid for a single runtime version.
pub trait RuntimeCoderFactory: Debug + Send + Sync {
	/// Version of the runtime specification.
	fn spec_version(&self) -> u32;
	/// Version of the transaction format.
	fn transaction_version(&self) -> u32;
	/// Returns true if the runtime declares given type.
	fn has_type(&self, type_name: &str) -> bool;
	/// Returns index of the given call, if the runtime declares it.
	fn call_index(&self, pallet: &str, call: &str) -> Option<CallIndex>;
	/// Decode SCALE-encoded extrinsic.
	fn decode_extrinsic(&self, data: &[u8]) -> Result<DecodedExtrinsic>;
	/// Decode dispatch info of given runtime type, returned by the runtime API call.
	fn decode_dispatch_info(&self, type_name: &str, data: &[u8]) -> Result<DispatchInfo>;
}

/// Coder factory with statically known set of types and calls.
#[derive(Debug, Clone)]
pub struct StaticRuntimeCoderFactory {
	spec_version: u32,
	transaction_version: u32,
	layout: ExtrinsicLayout,
	types: BTreeSet<String>,
	calls: BTreeMap<(String, String), CallIndex>,
	legacy_weight: bool,
}

impl StaticRuntimeCoderFactory {
	/// Create coder factory for given runtime version and extrinsic layout.
	pub fn new(spec_version: u32, transaction_version: u32, layout: ExtrinsicLayout) -> Self {
		StaticRuntimeCoderFactory {
			spec_version,
			transaction_version,
			layout,
			types: BTreeSet::new(),
			calls: BTreeMap::new(),
			legacy_weight: false,
		}
	}

	/// Declare runtime type.
	#[must_use]
	pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
		self.types.insert(type_name.into());
		self
	}

	/// Declare runtime call.
	#[must_use]
	pub fn with_call(
		mut self,
		pallet: impl Into<String>,
		call: impl Into<String>,
		index: CallIndex,
	) -> Self {
		self.calls.insert((pallet.into(), call.into()), index);
		self
	}

	/// Use single-dimensional weights when decoding dispatch info.
	#[must_use]
	pub fn with_legacy_weight(mut self, legacy_weight: bool) -> Self {
		self.legacy_weight = legacy_weight;
		self
	}

	/// Extrinsic layout of the runtime.
	pub fn layout(&self) -> &ExtrinsicLayout {
		&self.layout
	}
}

impl RuntimeCoderFactory for StaticRuntimeCoderFactory {
	fn spec_version(&self) -> u32 {
		self.spec_version
	}

	fn transaction_version(&self) -> u32 {
		self.transaction_version
	}

	fn has_type(&self, type_name: &str) -> bool {
		self.types.contains(type_name)
	}

	fn call_index(&self, pallet: &str, call: &str) -> Option<CallIndex> {
		self.calls.get(&(pallet.to_owned(), call.to_owned())).copied()
	}

	fn decode_extrinsic(&self, data: &[u8]) -> Result<DecodedExtrinsic> {
		DecodedExtrinsic::decode_with(&self.layout, data)
	}

	fn decode_dispatch_info(&self, type_name: &str, data: &[u8]) -> Result<DispatchInfo> {
		if type_name != RUNTIME_DISPATCH_INFO_TYPE || !self.has_type(type_name) {
			return Err(EncodingError::TypeNotFound(type_name.into()))
		}

		let mut input = data;
		let info: RuntimeDispatchInfo = if self.legacy_weight {
			RuntimeDispatchInfoV1::decode(&mut input).map(Into::into)
		} else {
			RuntimeDispatchInfo::decode(&mut input)
		}
		.map_err(|e| EncodingError::codec("dispatch info", e))?;

		Ok(info.into())
	}
}
