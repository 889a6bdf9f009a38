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

//! Signing of extrinsics.

use crate::error::{Error, Result};

use extrinsic_primitives::{
	signature::ETHEREUM_SIGNATURE_LEN, ChainFormat, CryptoType, EncodingError, ExtrinsicBuilder,
	ExtrinsicSignature, RuntimeCoderFactory,
};
use sp_core::{hashing::blake2_256, Pair};

/// Sender-related data, required to produce the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
	/// Crypto type of the sender account.
	pub crypto_type: CryptoType,
	/// Address format of the chain.
	pub chain_format: ChainFormat,
}

impl SigningContext {
	/// Length of the raw signature, expected by the chain.
	pub fn signature_len(&self) -> usize {
		match self.chain_format {
			ChainFormat::Substrate { .. } => self.crypto_type.signature_len(),
			ChainFormat::Ethereum => ETHEREUM_SIGNATURE_LEN,
		}
	}
}

/// Capability of signing raw payloads.
pub trait SigningWrapper: Send + Sync {
	/// Sign payload, returning raw signature bytes.
	///
	/// Failures of the signing capability itself are reported as `Error::Signing`.
	fn sign(&self, payload: &[u8], context: &SigningContext) -> Result<Vec<u8>>;
}

/// Signer, backed by the key pair.
pub struct PairSigner<P: Pair> {
	pair: P,
	crypto_type: CryptoType,
}

impl<P: Pair> PairSigner<P> {
	/// Create signer of given crypto type.
	pub fn new(pair: P, crypto_type: CryptoType) -> Self {
		PairSigner { pair, crypto_type }
	}

	/// Crypto type of the signer.
	pub fn crypto_type(&self) -> CryptoType {
		self.crypto_type
	}

	/// Account id of the signer on Substrate chains.
	///
	/// Public keys longer than 32 bytes (ECDSA) are hashed, as `MultiSigner` does.
	pub fn account_id(&self) -> Vec<u8> {
		let public = self.pair.public();
		let public = public.as_ref();
		if public.len() <= 32 {
			public.to_vec()
		} else {
			blake2_256(public).to_vec()
		}
	}
}

impl<P: Pair + Send + Sync> SigningWrapper for PairSigner<P> {
	fn sign(&self, payload: &[u8], context: &SigningContext) -> Result<Vec<u8>> {
		if context.crypto_type != self.crypto_type {
			return Err(Error::Signing(format!(
				"{:?} key can not sign on behalf of {:?} account",
				self.crypto_type, context.crypto_type,
			)))
		}

		Ok(self.pair.sign(payload).as_ref().to_vec())
	}
}

/// Signer, producing zero signatures of the right length. Used to estimate fees.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummySigner;

impl SigningWrapper for DummySigner {
	fn sign(&self, _payload: &[u8], context: &SigningContext) -> Result<Vec<u8>> {
		Ok(vec![0u8; context.signature_len()])
	}
}

/// Convert raw signature into the chain signature format.
pub fn extrinsic_signature(raw: Vec<u8>, context: &SigningContext) -> Result<ExtrinsicSignature> {
	let signature = match context.chain_format {
		ChainFormat::Substrate { .. } => ExtrinsicSignature::substrate(context.crypto_type, raw),
		ChainFormat::Ethereum => ExtrinsicSignature::ethereum(&raw),
	};

	signature.map_err(|e| match e {
		EncodingError::InvalidRawSignature(raw) => Error::InvalidRawSignature(raw),
		e => e.into(),
	})
}

/// Sign the extrinsic with given signer.
pub fn sign_extrinsic(
	builder: ExtrinsicBuilder,
	signer: &dyn SigningWrapper,
	context: &SigningContext,
	coder: &dyn RuntimeCoderFactory,
) -> Result<ExtrinsicBuilder> {
	builder.signing(
		|payload| {
			let raw = signer.sign(payload, context)?;
			extrinsic_signature(raw, context)
		},
		coder,
	)
}
