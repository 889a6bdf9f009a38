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

//! Decoding of encoded extrinsics.

use crate::{
	address::{ChainFormat, ExtrinsicAddress},
	era::Era,
	error::{EncodingError, Result},
	extensions::ExtensionRef,
	signature::ExtrinsicSignature,
};

use codec::{Compact, Decode};

/// Version of the extrinsic format.
pub const EXTRINSIC_FORMAT_VERSION: u8 = 4;
/// Bit of the version byte that is set for signed extrinsics.
pub const SIGNED_EXTRINSIC_BIT: u8 = 0b1000_0000;

/// Layout of extrinsics of the runtime: how addresses and signatures are encoded and which
/// custom extensions follow the core signed extra.
#[derive(Debug, Clone)]
pub struct ExtrinsicLayout {
	/// Address format of the chain.
	pub chain_format: ChainFormat,
	/// Custom extensions, in the order they are declared by the runtime.
	pub extensions: Vec<ExtensionRef>,
}

impl ExtrinsicLayout {
	/// Create layout without custom extensions.
	pub fn new(chain_format: ChainFormat) -> Self {
		ExtrinsicLayout { chain_format, extensions: Vec::new() }
	}

	/// Append custom extension to the layout.
	#[must_use]
	pub fn with_extension(mut self, extension: ExtensionRef) -> Self {
		self.extensions.push(extension);
		self
	}
}

/// Signed part of the decoded extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSignature {
	/// Sender address.
	pub address: ExtrinsicAddress,
	/// Signature.
	pub signature: ExtrinsicSignature,
	/// Transaction era.
	pub era: Era,
	/// Transaction nonce.
	pub nonce: u32,
	/// Tip, included into transaction.
	pub tip: u128,
	/// Encoded payloads of custom extensions, with their names.
	pub extensions: Vec<(String, Vec<u8>)>,
}

/// Decoded extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedExtrinsic {
	/// Signature with signed extra, if the extrinsic is signed.
	pub signature: Option<DecodedSignature>,
	/// Encoded call.
	pub call: Vec<u8>,
}

impl DecodedExtrinsic {
	/// Decode length-prefixed extrinsic using given layout.
	pub fn decode_with(layout: &ExtrinsicLayout, data: &[u8]) -> Result<Self> {
		let mut input = data;
		let Compact(length) = Compact::<u32>::decode(&mut input)
			.map_err(|e| EncodingError::codec("extrinsic length", e))?;
		if length as usize != input.len() {
			return Err(EncodingError::Codec {
				what: "extrinsic length",
				reason: format!("prefix declares {length} bytes, {} available", input.len()),
			})
		}

		let version =
			u8::decode(&mut input).map_err(|e| EncodingError::codec("extrinsic version", e))?;
		if version & !SIGNED_EXTRINSIC_BIT != EXTRINSIC_FORMAT_VERSION {
			return Err(EncodingError::UnsupportedVersion(version))
		}

		let signature = if version & SIGNED_EXTRINSIC_BIT != 0 {
			Some(Self::decode_signature(layout, &mut input)?)
		} else {
			None
		};

		Ok(DecodedExtrinsic { signature, call: input.to_vec() })
	}

	/// Non-zero tip, included into the signed extrinsic.
	pub fn tip(&self) -> Option<u128> {
		self.signature.as_ref().map(|signature| signature.tip).filter(|tip| *tip != 0)
	}

	fn decode_signature(layout: &ExtrinsicLayout, input: &mut &[u8]) -> Result<DecodedSignature> {
		let address = ExtrinsicAddress::decode_with(layout.chain_format, input)?;
		let signature = ExtrinsicSignature::decode_with(layout.chain_format, input)?;
		let era = Era::decode(input).map_err(|e| EncodingError::codec("era", e))?;
		let Compact(nonce) =
			Compact::<u32>::decode(input).map_err(|e| EncodingError::codec("nonce", e))?;
		let Compact(tip) =
			Compact::<u128>::decode(input).map_err(|e| EncodingError::codec("tip", e))?;
		let extensions = layout
			.extensions
			.iter()
			.map(|extension| {
				let payload = extension.decode_payload(input)?;
				Ok((extension.name().to_owned(), payload))
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(DecodedSignature { address, signature, era, nonce, tip, extensions })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::TEST_CHAIN_FORMAT;
	use codec::Encode;

	#[test]
	fn unsigned_extrinsic_is_decoded() {
		let body = vec![EXTRINSIC_FORMAT_VERSION, 0, 1, 2];
		let encoded = body.encode();
		let decoded =
			DecodedExtrinsic::decode_with(&ExtrinsicLayout::new(TEST_CHAIN_FORMAT), &encoded)
				.unwrap();
		assert_eq!(decoded, DecodedExtrinsic { signature: None, call: vec![0, 1, 2] });
		assert_eq!(decoded.tip(), None);
	}

	#[test]
	fn length_prefix_mismatch_is_rejected() {
		let mut encoded = vec![EXTRINSIC_FORMAT_VERSION, 0].encode();
		encoded.push(0);
		assert!(matches!(
			DecodedExtrinsic::decode_with(&ExtrinsicLayout::new(TEST_CHAIN_FORMAT), &encoded),
			Err(EncodingError::Codec { what: "extrinsic length", .. })
		));
	}

	#[test]
	fn unsupported_version_is_rejected() {
		let encoded = vec![0x85u8, 0].encode();
		assert_eq!(
			DecodedExtrinsic::decode_with(&ExtrinsicLayout::new(TEST_CHAIN_FORMAT), &encoded),
			Err(EncodingError::UnsupportedVersion(0x85))
		);
	}
}
