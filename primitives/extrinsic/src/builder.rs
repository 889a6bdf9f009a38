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

//! Builder of signed extrinsics.

use crate::{
	address::ExtrinsicAddress,
	coder::{RuntimeCoderFactory, BATCH_ALL_CALL, UTILITY_PALLET},
	era::Era,
	error::{EncodingError, Result},
	extensions::ExtensionRef,
	extrinsic::{EXTRINSIC_FORMAT_VERSION, SIGNED_EXTRINSIC_BIT},
	signature::ExtrinsicSignature,
};

use codec::{Compact, Encode};
use sp_core::{hashing::blake2_256, H256};

/// Signing payloads longer than this are hashed before signing.
pub const MAX_UNHASHED_SIGNING_PAYLOAD_LEN: usize = 256;

/// Builder of a single extrinsic.
///
/// Every method returns an updated copy of the builder. Any change to a signed builder drops
/// its signature, so a signed builder always matches the data it has signed.
#[derive(Debug, Clone)]
pub struct ExtrinsicBuilder {
	spec_version: u32,
	transaction_version: u32,
	genesis_hash: H256,
	era: Option<Era>,
	era_block_hash: Option<H256>,
	nonce: Option<u32>,
	tip: Option<u128>,
	address: Option<ExtrinsicAddress>,
	extensions: Vec<ExtensionRef>,
	calls: Vec<Vec<u8>>,
	signature: Option<ExtrinsicSignature>,
}

impl ExtrinsicBuilder {
	/// Create builder for given runtime version and chain.
	pub fn new(spec_version: u32, transaction_version: u32, genesis_hash: H256) -> Self {
		ExtrinsicBuilder {
			spec_version,
			transaction_version,
			genesis_hash,
			era: None,
			era_block_hash: None,
			nonce: None,
			tip: None,
			address: None,
			extensions: Vec::new(),
			calls: Vec::new(),
			signature: None,
		}
	}

	/// Set transaction era and hash of the block it is anchored to.
	#[must_use]
	pub fn with_era(mut self, era: Era, block_hash: H256) -> Self {
		self.era = Some(era);
		self.era_block_hash = Some(block_hash);
		self.unsigned()
	}

	/// Set transaction nonce.
	#[must_use]
	pub fn with_nonce(mut self, nonce: u32) -> Self {
		self.nonce = Some(nonce);
		self.unsigned()
	}

	/// Set transaction tip.
	#[must_use]
	pub fn with_tip(mut self, tip: u128) -> Self {
		self.tip = Some(tip);
		self.unsigned()
	}

	/// Set sender address.
	#[must_use]
	pub fn with_address(mut self, address: ExtrinsicAddress) -> Self {
		self.address = Some(address);
		self.unsigned()
	}

	/// Append custom extension.
	#[must_use]
	pub fn adding_extension(mut self, extension: ExtensionRef) -> Self {
		self.extensions.push(extension);
		self.unsigned()
	}

	/// Append encoded call. Several calls are dispatched as `Utility::batch_all`.
	#[must_use]
	pub fn adding_encoded_call(mut self, call: Vec<u8>) -> Self {
		self.calls.push(call);
		self.unsigned()
	}

	/// Append call.
	#[must_use]
	pub fn adding_call<C: Encode>(self, call: &C) -> Self {
		self.adding_encoded_call(call.encode())
	}

	/// Version of the runtime specification.
	pub fn spec_version(&self) -> u32 {
		self.spec_version
	}

	/// Version of the transaction format.
	pub fn transaction_version(&self) -> u32 {
		self.transaction_version
	}

	/// Hash of the genesis block.
	pub fn genesis_hash(&self) -> H256 {
		self.genesis_hash
	}

	/// Transaction era.
	pub fn era(&self) -> Option<Era> {
		self.era
	}

	/// Transaction nonce.
	pub fn nonce(&self) -> Option<u32> {
		self.nonce
	}

	/// Transaction tip.
	pub fn tip(&self) -> Option<u128> {
		self.tip
	}

	/// Sender address.
	pub fn address(&self) -> Option<&ExtrinsicAddress> {
		self.address.as_ref()
	}

	/// Encoded calls, added so far.
	pub fn calls(&self) -> &[Vec<u8>] {
		&self.calls
	}

	/// Returns true if the builder has been signed.
	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}

	/// Encoded call of the extrinsic.
	pub fn encoded_call(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		match self.calls.as_slice() {
			[] => Err(EncodingError::MissingField("call")),
			[call] => Ok(call.clone()),
			calls => {
				let call_index = coder.call_index(UTILITY_PALLET, BATCH_ALL_CALL).ok_or_else(|| {
					EncodingError::CallNotFound {
						pallet: UTILITY_PALLET.into(),
						call: BATCH_ALL_CALL.into(),
					}
				})?;

				let mut encoded = call_index.to_vec();
				Compact(calls.len() as u32).encode_to(&mut encoded);
				calls.iter().for_each(|call| encoded.extend_from_slice(call));
				Ok(encoded)
			},
		}
	}

	/// Payload that has to be signed by the sender.
	///
	/// It is `call ++ extra ++ implicit`, hashed with blake2-256 if it is longer than
	/// `MAX_UNHASHED_SIGNING_PAYLOAD_LEN` bytes.
	pub fn signing_payload(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		self.address.ok_or(EncodingError::MissingField("address"))?;

		let mut payload = self.encoded_call(coder)?;
		payload.extend(self.extra(coder)?);
		payload.extend(self.implicit(coder)?);

		if payload.len() > MAX_UNHASHED_SIGNING_PAYLOAD_LEN {
			Ok(blake2_256(&payload).to_vec())
		} else {
			Ok(payload)
		}
	}

	/// Sign the extrinsic.
	///
	/// The `sign` closure receives the signing payload and returns the signature in the chain
	/// format.
	pub fn signing<E, F>(
		mut self,
		sign: F,
		coder: &dyn RuntimeCoderFactory,
	) -> std::result::Result<Self, E>
	where
		E: From<EncodingError>,
		F: FnOnce(&[u8]) -> std::result::Result<ExtrinsicSignature, E>,
	{
		let payload = self.signing_payload(coder)?;
		self.signature = Some(sign(&payload)?);
		Ok(self)
	}

	/// Encode the signed extrinsic.
	pub fn build(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		let address = self.address.ok_or(EncodingError::MissingField("address"))?;
		let signature = self.signature.as_ref().ok_or(EncodingError::MissingField("signature"))?;

		let mut body = vec![EXTRINSIC_FORMAT_VERSION | SIGNED_EXTRINSIC_BIT];
		address.encode_to(&mut body);
		signature.encode_to(&mut body);
		body.extend(self.extra(coder)?);
		body.extend(self.encoded_call(coder)?);

		Ok(body.encode())
	}

	/// Encode the extrinsic without signature.
	pub fn build_unsigned(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		let mut body = vec![EXTRINSIC_FORMAT_VERSION];
		body.extend(self.encoded_call(coder)?);

		Ok(body.encode())
	}

	/// Signed extra: core extensions payload, followed by custom extensions payload.
	fn extra(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		let era = self.era.ok_or(EncodingError::MissingField("era"))?;
		let nonce = self.nonce.ok_or(EncodingError::MissingField("nonce"))?;

		// CheckNonZeroSender, CheckSpecVersion, CheckTxVersion and CheckGenesis have no payload
		let mut extra = era.encode();
		Compact(nonce).encode_to(&mut extra);
		// CheckWeight has no payload
		Compact(self.tip.unwrap_or_default()).encode_to(&mut extra);
		for extension in &self.extensions {
			extra.extend(extension.payload(coder)?);
		}

		Ok(extra)
	}

	/// Implicit data of core and custom extensions.
	fn implicit(&self, coder: &dyn RuntimeCoderFactory) -> Result<Vec<u8>> {
		let era_block_hash = match (self.era, self.era_block_hash) {
			(_, Some(block_hash)) => block_hash,
			(Some(Era::Immortal), None) => self.genesis_hash,
			_ => return Err(EncodingError::MissingField("era block hash")),
		};

		let mut implicit = (self.spec_version, self.transaction_version).encode();
		self.genesis_hash.encode_to(&mut implicit);
		era_block_hash.encode_to(&mut implicit);
		for extension in &self.extensions {
			implicit.extend(extension.implicit(coder)?);
		}

		Ok(implicit)
	}

	fn unsigned(mut self) -> Self {
		self.signature = None;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		extensions::GenericExtension,
		extrinsic::ExtrinsicLayout,
		signature::CryptoType,
		test_utils::{test_coder, test_coder_with_layout, TEST_CHAIN_FORMAT},
	};
	use std::sync::Arc;

	const CALL: [u8; 4] = [0, 7, 4, 42];

	fn sr25519_signature(payload: &[u8]) -> Result<ExtrinsicSignature> {
		// deterministic stand-in, the builder does not verify signatures
		let mut raw = blake2_256(payload).to_vec();
		raw.extend_from_slice(&blake2_256(&raw));
		ExtrinsicSignature::substrate(CryptoType::Sr25519, raw)
	}

	fn ready_builder() -> ExtrinsicBuilder {
		ExtrinsicBuilder::new(1_000, 25, H256::repeat_byte(1))
			.with_era(Era::mortal(64, 1_000), H256::repeat_byte(2))
			.with_nonce(5)
			.with_address(TEST_CHAIN_FORMAT.address(&[3u8; 32]).unwrap())
			.adding_call(&CALL)
	}

	#[test]
	fn round_trip_preserves_fields() {
		let coder = test_coder();
		let encoded = ready_builder()
			.with_tip(100)
			.signing(sr25519_signature, &coder)
			.unwrap()
			.build(&coder)
			.unwrap();

		let decoded = coder.decode_extrinsic(&encoded).unwrap();
		let signature = decoded.signature.clone().unwrap();
		assert_eq!(decoded.call, CALL.to_vec());
		assert_eq!(signature.era, Era::mortal(64, 1_000));
		assert_eq!(signature.nonce, 5);
		assert_eq!(signature.tip, 100);
		assert_eq!(decoded.tip(), Some(100));
		assert_eq!(signature.address, TEST_CHAIN_FORMAT.address(&[3u8; 32]).unwrap());
	}

	#[test]
	fn custom_extensions_are_encoded_in_order() {
		let first: ExtensionRef = Arc::new(GenericExtension::new("First", 7u8, 1u32));
		let second: ExtensionRef = Arc::new(GenericExtension::new("Second", Compact(300u64), ()));
		let coder = test_coder_with_layout(
			ExtrinsicLayout::new(TEST_CHAIN_FORMAT)
				.with_extension(first.clone())
				.with_extension(second.clone()),
		);

		let encoded = ready_builder()
			.adding_extension(first)
			.adding_extension(second)
			.signing(sr25519_signature, &coder)
			.unwrap()
			.build(&coder)
			.unwrap();

		let signature = coder.decode_extrinsic(&encoded).unwrap().signature.unwrap();
		assert_eq!(
			signature.extensions,
			vec![("First".to_owned(), vec![7u8]), ("Second".to_owned(), Compact(300u64).encode())]
		);
	}

	#[test]
	fn required_fields_are_checked() {
		let coder = test_coder();
		let builder = ExtrinsicBuilder::new(1, 1, H256::zero());
		assert_eq!(builder.signing_payload(&coder), Err(EncodingError::MissingField("address")));

		let builder = builder.with_address(TEST_CHAIN_FORMAT.address(&[3u8; 32]).unwrap());
		assert_eq!(builder.signing_payload(&coder), Err(EncodingError::MissingField("call")));

		let builder = builder.adding_encoded_call(CALL.to_vec());
		assert_eq!(builder.signing_payload(&coder), Err(EncodingError::MissingField("era")));

		let builder = builder.with_era(Era::Immortal, H256::zero());
		assert_eq!(builder.signing_payload(&coder), Err(EncodingError::MissingField("nonce")));

		assert_eq!(
			builder.with_nonce(0).build(&coder),
			Err(EncodingError::MissingField("signature"))
		);
	}

	#[test]
	fn typed_call_is_scale_encoded() {
		let builder =
			ExtrinsicBuilder::new(1, 1, H256::zero()).adding_call(&(4u8, 2u8, Compact(1u64)));
		assert_eq!(builder.calls().to_vec(), vec![vec![4u8, 2, 4]]);
	}

	#[test]
	fn changing_signed_builder_drops_signature() {
		let coder = test_coder();
		let signed = ready_builder().signing(sr25519_signature, &coder).unwrap();
		assert!(signed.is_signed());
		assert!(!signed.with_nonce(6).is_signed());
	}

	#[test]
	fn long_signing_payload_is_hashed() {
		let coder = test_coder().with_call(UTILITY_PALLET, BATCH_ALL_CALL, [40, 2]);
		let builder = ready_builder().adding_encoded_call(vec![1u8; 300]);
		assert_eq!(builder.signing_payload(&coder).unwrap().len(), 32);
	}

	#[test]
	fn batch_requires_utility_call() {
		let coder = test_coder();
		let builder = ready_builder().adding_encoded_call(vec![1, 2]);
		assert_eq!(
			builder.encoded_call(&coder),
			Err(EncodingError::CallNotFound {
				pallet: UTILITY_PALLET.into(),
				call: BATCH_ALL_CALL.into(),
			})
		);

		let coder = coder.with_call(UTILITY_PALLET, BATCH_ALL_CALL, [40, 2]);
		let mut expected = vec![40, 2, 8];
		expected.extend_from_slice(&CALL);
		expected.extend_from_slice(&[1, 2]);
		assert_eq!(builder.encoded_call(&coder), Ok(expected));
	}

	#[test]
	fn unsigned_extrinsic_contains_only_call() {
		let coder = test_coder();
		let encoded = ready_builder().build_unsigned(&coder).unwrap();
		let decoded = coder.decode_extrinsic(&encoded).unwrap();
		assert_eq!(decoded.signature, None);
		assert_eq!(decoded.call, CALL.to_vec());
	}
}
