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

//! Chain address formats and extrinsic sender addresses.

use crate::error::{EncodingError, Result};

use codec::{Decode, Encode, Input, Output};
use serde::{Deserialize, Serialize};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use sp_runtime::MultiAddress;

/// Address type of Substrate chains without account indices.
type SubstrateAddress = MultiAddress<AccountId32, ()>;

/// Address format of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainFormat {
	/// Substrate chain with 32-byte account ids and SS58 addresses.
	Substrate {
		/// SS58 address prefix of the chain.
		ss58_prefix: u16,
	},
	/// Ethereum-compatible chain with 20-byte account ids.
	Ethereum,
}

impl ChainFormat {
	/// Length of account id on the chain.
	pub fn account_id_len(&self) -> usize {
		match self {
			ChainFormat::Substrate { .. } => 32,
			ChainFormat::Ethereum => 20,
		}
	}

	/// Returns true if chain is Ethereum-compatible.
	pub fn is_ethereum(&self) -> bool {
		matches!(self, ChainFormat::Ethereum)
	}

	/// Convert raw account id into extrinsic sender address.
	pub fn address(&self, account_id: &[u8]) -> Result<ExtrinsicAddress> {
		match self {
			ChainFormat::Substrate { .. } => account_id
				.try_into()
				.map(ExtrinsicAddress::Id)
				.map_err(|_| EncodingError::InvalidAccountId(account_id.len())),
			ChainFormat::Ethereum => account_id
				.try_into()
				.map(ExtrinsicAddress::Address20)
				.map_err(|_| EncodingError::InvalidAccountId(account_id.len())),
		}
	}

	/// Convert raw account id into its textual chain representation (as accepted by RPC methods).
	pub fn text_address(&self, account_id: &[u8]) -> Result<String> {
		Ok(match (self, self.address(account_id)?) {
			(ChainFormat::Substrate { ss58_prefix }, ExtrinsicAddress::Id(id)) =>
				AccountId32::new(id)
					.to_ss58check_with_version(Ss58AddressFormat::custom(*ss58_prefix)),
			(_, address) => format!("0x{}", hex::encode(address.account_id())),
		})
	}
}

/// Address of the extrinsic sender, as it is encoded in the extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrinsicAddress {
	/// `MultiAddress::Id` of Substrate chains.
	Id([u8; 32]),
	/// Raw 20-byte address of Ethereum-compatible chains.
	Address20([u8; 20]),
}

impl ExtrinsicAddress {
	/// Raw account id of the sender.
	pub fn account_id(&self) -> &[u8] {
		match self {
			ExtrinsicAddress::Id(id) => &id[..],
			ExtrinsicAddress::Address20(id) => &id[..],
		}
	}

	/// Decode address that has been encoded using given chain format.
	pub fn decode_with<I: Input>(format: ChainFormat, input: &mut I) -> Result<Self> {
		match format {
			ChainFormat::Substrate { .. } => {
				let address = SubstrateAddress::decode(input)
					.map_err(|e| EncodingError::codec("address", e))?;
				match address {
					MultiAddress::Id(id) => Ok(ExtrinsicAddress::Id(id.into())),
					address => Err(EncodingError::Codec {
						what: "address",
						reason: format!("unsupported address {address:?}"),
					}),
				}
			},
			ChainFormat::Ethereum => <[u8; 20]>::decode(input)
				.map(ExtrinsicAddress::Address20)
				.map_err(|e| EncodingError::codec("address", e)),
		}
	}
}

impl Encode for ExtrinsicAddress {
	fn size_hint(&self) -> usize {
		match self {
			ExtrinsicAddress::Id(_) => 33,
			ExtrinsicAddress::Address20(_) => 20,
		}
	}

	fn encode_to<T: Output + ?Sized>(&self, output: &mut T) {
		match self {
			ExtrinsicAddress::Id(id) =>
				SubstrateAddress::Id(AccountId32::new(*id)).encode_to(output),
			ExtrinsicAddress::Address20(id) => output.write(&id[..]),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	const POLKADOT: ChainFormat = ChainFormat::Substrate { ss58_prefix: 0 };

	#[test]
	fn substrate_address_is_multi_address_id() {
		let address = POLKADOT.address(&[7u8; 32]).unwrap();
		let encoded = address.encode();
		assert_eq!(encoded, SubstrateAddress::Id(AccountId32::new([7u8; 32])).encode());
		assert_eq!(encoded.len(), 33);
		assert_eq!(ExtrinsicAddress::decode_with(POLKADOT, &mut &encoded[..]), Ok(address));
	}

	#[test]
	fn only_account_id_addresses_are_decoded() {
		let encoded = SubstrateAddress::Address20([7u8; 20]).encode();
		assert_matches!(
			ExtrinsicAddress::decode_with(POLKADOT, &mut &encoded[..]),
			Err(EncodingError::Codec { what: "address", .. })
		);
	}

	#[test]
	fn ethereum_address_is_raw() {
		let address = ChainFormat::Ethereum.address(&[9u8; 20]).unwrap();
		assert_eq!(address.encode(), vec![9u8; 20]);
		assert_eq!(
			ChainFormat::Ethereum.text_address(&[0xab; 20]).unwrap(),
			format!("0x{}", "ab".repeat(20))
		);
	}

	#[test]
	fn account_id_length_is_checked() {
		assert_matches!(POLKADOT.address(&[1u8; 20]), Err(EncodingError::InvalidAccountId(20)));
		assert_matches!(
			ChainFormat::Ethereum.address(&[1u8; 32]),
			Err(EncodingError::InvalidAccountId(32))
		);
	}

	#[test]
	fn ss58_address_uses_chain_prefix() {
		let polkadot = POLKADOT.text_address(&[0u8; 32]).unwrap();
		let kusama = ChainFormat::Substrate { ss58_prefix: 2 }.text_address(&[0u8; 32]).unwrap();
		assert_ne!(polkadot, kusama);
		assert!(polkadot.starts_with('1'));
	}
}
