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

//! Errors that may happen while building or decoding extrinsics.

use thiserror::Error;

/// Result type used by extrinsic primitives.
pub type Result<T> = std::result::Result<T, EncodingError>;

/// Extrinsic encoding or decoding error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
	/// Required builder field has not been set.
	#[error("Extrinsic field `{0}` is required, but has not been set")]
	MissingField(&'static str),
	/// Type is not known to the runtime metadata.
	#[error("Type `{0}` is not found in the runtime metadata")]
	TypeNotFound(String),
	/// Call is not known to the runtime metadata.
	#[error("Call `{pallet}.{call}` is not found in the runtime metadata")]
	CallNotFound {
		/// Name of the pallet.
		pallet: String,
		/// Name of the call.
		call: String,
	},
	/// Signature has unexpected length for the chain format.
	#[error("Invalid raw signature of {} bytes: 0x{}", .0.len(), hex::encode(.0))]
	InvalidRawSignature(Vec<u8>),
	/// Account id has unexpected length for the chain format.
	#[error("Invalid account id of {0} bytes")]
	InvalidAccountId(usize),
	/// Only version 4 extrinsics are supported.
	#[error("Unsupported extrinsic version byte: {0:#04x}")]
	UnsupportedVersion(u8),
	/// SCALE codec failure.
	#[error("Codec error while processing {what}: {reason}")]
	Codec {
		/// What has been encoded or decoded.
		what: &'static str,
		/// Codec error description.
		reason: String,
	},
}

impl EncodingError {
	/// Create codec error from `codec::Error`.
	pub fn codec(what: &'static str, error: codec::Error) -> Self {
		EncodingError::Codec { what, reason: error.to_string() }
	}
}
