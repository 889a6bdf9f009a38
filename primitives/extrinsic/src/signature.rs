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

//! Signature formats, supported by extrinsics.

use crate::{
	address::ChainFormat,
	error::{EncodingError, Result},
};

use codec::{Decode, Encode, Input, Output};
use serde::{Deserialize, Serialize};
use sp_core::{ecdsa, ed25519, sr25519};
use sp_runtime::MultiSignature;

/// Crypto type of the Substrate account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CryptoType {
	/// Ed25519 keys.
	Ed25519,
	/// Sr25519 (schnorrkel) keys.
	Sr25519,
	/// Secp256k1 keys.
	Ecdsa,
}

impl CryptoType {
	/// Length of raw signature.
	pub fn signature_len(&self) -> usize {
		match self {
			CryptoType::Ed25519 | CryptoType::Sr25519 => 64,
			CryptoType::Ecdsa => 65,
		}
	}
}

/// Length of the recoverable Ethereum signature.
pub const ETHEREUM_SIGNATURE_LEN: usize = 65;

/// Recoverable secp256k1 signature used by Ethereum-compatible chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct EthereumSignature {
	/// `r` component.
	pub r: [u8; 32],
	/// `s` component.
	pub s: [u8; 32],
	/// Recovery id.
	pub v: u8,
}

impl TryFrom<&[u8]> for EthereumSignature {
	type Error = EncodingError;

	fn try_from(raw: &[u8]) -> Result<Self> {
		if raw.len() != ETHEREUM_SIGNATURE_LEN {
			return Err(EncodingError::InvalidRawSignature(raw.to_vec()))
		}

		let mut r = [0u8; 32];
		let mut s = [0u8; 32];
		r.copy_from_slice(&raw[..32]);
		s.copy_from_slice(&raw[32..64]);
		Ok(EthereumSignature { r, s, v: raw[64] })
	}
}

/// Signature of the extrinsic, in chain-specific format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtrinsicSignature {
	/// `MultiSignature` of Substrate chains.
	Substrate(MultiSignature),
	/// Recoverable signature of Ethereum-compatible chains.
	Ethereum(EthereumSignature),
}

impl ExtrinsicSignature {
	/// Create Substrate signature of given crypto type, checking its length.
	pub fn substrate(crypto_type: CryptoType, raw: Vec<u8>) -> Result<Self> {
		let signature = match crypto_type {
			CryptoType::Ed25519 => <[u8; 64]>::try_from(raw.as_slice())
				.map(|raw| MultiSignature::Ed25519(ed25519::Signature::from_raw(raw))),
			CryptoType::Sr25519 => <[u8; 64]>::try_from(raw.as_slice())
				.map(|raw| MultiSignature::Sr25519(sr25519::Signature::from_raw(raw))),
			CryptoType::Ecdsa => <[u8; 65]>::try_from(raw.as_slice())
				.map(|raw| MultiSignature::Ecdsa(ecdsa::Signature::from_raw(raw))),
		};

		signature
			.map(ExtrinsicSignature::Substrate)
			.map_err(|_| EncodingError::InvalidRawSignature(raw))
	}

	/// Create Ethereum signature from its `r ++ s ++ v` representation.
	pub fn ethereum(raw: &[u8]) -> Result<Self> {
		EthereumSignature::try_from(raw).map(ExtrinsicSignature::Ethereum)
	}

	/// Decode signature that has been encoded using given chain format.
	pub fn decode_with<I: Input>(format: ChainFormat, input: &mut I) -> Result<Self> {
		match format {
			ChainFormat::Substrate { .. } => MultiSignature::decode(input)
				.map(ExtrinsicSignature::Substrate)
				.map_err(|e| EncodingError::codec("signature", e)),
			ChainFormat::Ethereum => EthereumSignature::decode(input)
				.map(ExtrinsicSignature::Ethereum)
				.map_err(|e| EncodingError::codec("signature", e)),
		}
	}
}

impl Encode for ExtrinsicSignature {
	fn encode_to<T: Output + ?Sized>(&self, output: &mut T) {
		match self {
			ExtrinsicSignature::Substrate(signature) => signature.encode_to(output),
			ExtrinsicSignature::Ethereum(signature) => signature.encode_to(output),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn ethereum_signature_requires_exact_length() {
		assert_matches!(
			ExtrinsicSignature::ethereum(&[1u8; 64]),
			Err(EncodingError::InvalidRawSignature(raw)) if raw.len() == 64
		);
		assert_matches!(ExtrinsicSignature::ethereum(&[1u8; 66]), Err(_));

		let mut raw = vec![1u8; 32];
		raw.extend(vec![2u8; 32]);
		raw.push(27);
		let signature = ExtrinsicSignature::ethereum(&raw).unwrap();
		assert_eq!(signature.encode(), raw);
		assert_eq!(
			ExtrinsicSignature::decode_with(ChainFormat::Ethereum, &mut &raw[..]),
			Ok(signature)
		);
	}

	#[test]
	fn substrate_signature_is_tagged_with_crypto_type() {
		let signature = ExtrinsicSignature::substrate(CryptoType::Sr25519, vec![5u8; 64]).unwrap();
		let encoded = signature.encode();
		let expected = MultiSignature::Sr25519(sr25519::Signature::from_raw([5u8; 64]));
		assert_eq!(encoded, expected.encode());
		assert_eq!(encoded[0], 1);

		let format = ChainFormat::Substrate { ss58_prefix: 42 };
		assert_eq!(ExtrinsicSignature::decode_with(format, &mut &encoded[..]), Ok(signature));
	}

	#[test]
	fn substrate_signature_length_is_checked() {
		assert_matches!(
			ExtrinsicSignature::substrate(CryptoType::Ecdsa, vec![0u8; 64]),
			Err(EncodingError::InvalidRawSignature(_))
		);
		assert!(ExtrinsicSignature::substrate(CryptoType::Ecdsa, vec![0u8; 65]).is_ok());
	}
}
