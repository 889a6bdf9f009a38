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

//! Chain configuration.

use crate::error::{Error, Result};

use extrinsic_primitives::{
	era::{MAX_MORTAL_PERIOD, MIN_MORTAL_PERIOD},
	extensions::{check_metadata_hash, ExtensionRef},
	Balance, CallIndex, ChainFormat, ExtrinsicLayout,
};
use serde::{Deserialize, Serialize};
use sp_core::H256;
use std::sync::Arc;

/// Default number of blocks the extrinsic stays valid.
pub const DEFAULT_MORTALITY_PERIOD: u64 = 64;

/// Runtime call, whose index is known in advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownCall {
	/// Pallet name.
	pub pallet: String,
	/// Call name.
	pub call: String,
	/// Pallet and call indices.
	pub index: CallIndex,
}

/// Custom extension, that the chain runtime expects after the core signed extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtensionConfig {
	/// `CheckMetadataHash` extension. Metadata hash checks are only enabled when the hash is set.
	#[serde(rename_all = "camelCase")]
	CheckMetadataHash {
		/// Hash of the runtime metadata.
		#[serde(default)]
		metadata_hash: Option<H256>,
	},
}

impl ExtensionConfig {
	/// Create the extension.
	pub fn extension(&self) -> ExtensionRef {
		match *self {
			ExtensionConfig::CheckMetadataHash { metadata_hash } =>
				Arc::new(check_metadata_hash(metadata_hash.map(|hash| hash.to_fixed_bytes()))),
		}
	}
}

/// Configuration of the chain the service works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainConfig {
	/// Chain name, used in logs.
	pub name: String,
	/// Address format of the chain.
	pub chain_format: ChainFormat,
	/// Tip that is added to every extrinsic, unless the caller sets another one.
	pub default_tip: Option<Balance>,
	/// Estimate fees with `TransactionPaymentApi_query_info` state call, when the runtime
	/// supports it.
	pub uses_state_call_for_fee: bool,
	/// Fee query of the chain already accounts for the tip.
	pub fee_includes_tip: bool,
	/// Number of blocks the extrinsic stays valid.
	pub mortality_period: u64,
	/// Calls with known indices.
	pub known_calls: Vec<KnownCall>,
	/// Custom extensions, in the order the runtime declares them.
	pub extensions: Vec<ExtensionConfig>,
}

impl Default for ChainConfig {
	fn default() -> Self {
		ChainConfig {
			name: "Substrate".into(),
			chain_format: ChainFormat::Substrate { ss58_prefix: 42 },
			default_tip: None,
			uses_state_call_for_fee: true,
			fee_includes_tip: false,
			mortality_period: DEFAULT_MORTALITY_PERIOD,
			known_calls: Vec::new(),
			extensions: Vec::new(),
		}
	}
}

impl ChainConfig {
	/// Check that the configuration is valid.
	pub fn validate(&self) -> Result<()> {
		let period = self.mortality_period;
		if !period.is_power_of_two() || !(MIN_MORTAL_PERIOD..=MAX_MORTAL_PERIOD).contains(&period) {
			return Err(Error::Custom(format!(
				"Mortality period of {} must be a power of two in [{MIN_MORTAL_PERIOD}; \
				{MAX_MORTAL_PERIOD}], got {period}",
				self.name,
			)))
		}

		Ok(())
	}

	/// Custom extensions of the chain.
	pub fn extension_refs(&self) -> Vec<ExtensionRef> {
		self.extensions.iter().map(ExtensionConfig::extension).collect()
	}

	/// Layout of the chain extrinsics, including all custom extensions.
	pub fn extrinsic_layout(&self) -> ExtrinsicLayout {
		self.extension_refs()
			.into_iter()
			.fold(ExtrinsicLayout::new(self.chain_format), ExtrinsicLayout::with_extension)
	}
}
