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

//! Protocol extensions that are appended to the core signed extra of every extrinsic.
//!
//! Every extension contributes two parts: the `payload`, which is included in the extrinsic, and
//! the `implicit` data, which only contributes to the signing payload. Chains that need
//! additional extensions register them in order, without touching the builder itself.

use crate::{
	coder::RuntimeCoderFactory,
	error::{EncodingError, Result},
};

use codec::{Decode, Encode};
use std::{fmt::Debug, sync::Arc};

/// Shared reference to the extension.
pub type ExtensionRef = Arc<dyn ExtrinsicExtension>;

/// Name of the `frame_metadata_hash_extension::CheckMetadataHash` extension.
pub const CHECK_METADATA_HASH: &str = "CheckMetadataHash";

/// Custom protocol extension of the extrinsic.
pub trait ExtrinsicExtension: Debug + Send + Sync {
	/// Extension identifier, as it is declared in the runtime metadata.
	fn name(&self) -> &str;
	/// Encoded data that is included in the extrinsic.
	fn payload(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>>;
	/// Encoded data that is signed, but not included in the extrinsic.
	fn implicit(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>>;
	/// Read the payload of this extension from the encoded extrinsic.
	fn decode_payload(&self, input: &mut &[u8]) -> Result<Vec<u8>>;
}

/// Extension with statically known payload and implicit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericExtension<P, I> {
	name: String,
	payload: P,
	implicit: I,
	required_type: Option<String>,
}

impl<P, I> GenericExtension<P, I> {
	/// Create new extension.
	pub fn new(name: impl Into<String>, payload: P, implicit: I) -> Self {
		GenericExtension { name: name.into(), payload, implicit, required_type: None }
	}

	/// Only allow encoding this extension when the runtime knows given type.
	#[must_use]
	pub fn requiring_type(mut self, type_name: impl Into<String>) -> Self {
		self.required_type = Some(type_name.into());
		self
	}

	fn ensure_supported(&self, coder: &dyn RuntimeCoderFactory) -> Result<()> {
		match self.required_type {
			Some(ref type_name) if !coder.has_type(type_name) =>
				Err(EncodingError::TypeNotFound(type_name.clone())),
			_ => Ok(()),
		}
	}
}

impl<P, I> ExtrinsicExtension for GenericExtension<P, I>
where
	P: Encode + Decode + Debug + Send + Sync,
	I: Encode + Debug + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	fn payload(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		self.ensure_supported(coder)?;
		Ok(self.payload.encode())
	}

	fn implicit(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		self.ensure_supported(coder)?;
		Ok(self.implicit.encode())
	}

	fn decode_payload(&self, input: &mut &[u8]) -> Result<Vec<u8>> {
		let start = *input;
		P::decode(input).map_err(|e| EncodingError::codec("extension payload", e))?;
		Ok(start[..start.len() - input.len()].to_vec())
	}
}

/// The `CheckMetadataHash` extension: mode byte in the payload, optional hash in implicit data.
pub type CheckMetadataHash = GenericExtension<u8, Option<[u8; 32]>>;

/// Create `CheckMetadataHash` extension. Metadata hash checks are enabled iff the hash is known.
pub fn check_metadata_hash(metadata_hash: Option<[u8; 32]>) -> CheckMetadataHash {
	GenericExtension::new(CHECK_METADATA_HASH, metadata_hash.is_some() as u8, metadata_hash)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::test_coder;
	use codec::Compact;

	#[test]
	fn generic_extension_encodes_both_parts() {
		let coder = test_coder();
		let extension = GenericExtension::new("ChargeAssetTxPayment", Compact(5u128), 42u32);
		assert_eq!(extension.payload(&coder), Ok(Compact(5u128).encode()));
		assert_eq!(extension.implicit(&coder), Ok(42u32.encode()));
	}

	#[test]
	fn extension_requires_runtime_type() {
		let coder = test_coder();
		let extension = GenericExtension::new("Custom", 1u8, ()).requiring_type("UnknownType");
		assert_eq!(
			extension.payload(&coder),
			Err(EncodingError::TypeNotFound("UnknownType".into()))
		);
	}

	#[test]
	fn payload_is_decoded_without_consuming_rest() {
		let extension = GenericExtension::new("Custom", Compact(1_000u64), ());
		let mut encoded = Compact(1_000u64).encode();
		encoded.extend_from_slice(&[1, 2, 3]);

		let mut input = &encoded[..];
		assert_eq!(extension.decode_payload(&mut input), Ok(Compact(1_000u64).encode()));
		assert_eq!(input, &[1, 2, 3]);
	}

	#[test]
	fn disabled_metadata_hash_check_is_encoded() {
		let coder = test_coder();
		let extension = check_metadata_hash(None);
		assert_eq!(extension.name(), CHECK_METADATA_HASH);
		assert_eq!(extension.payload(&coder), Ok(vec![0]));
		assert_eq!(extension.implicit(&coder), Ok(vec![0]));
	}
}
