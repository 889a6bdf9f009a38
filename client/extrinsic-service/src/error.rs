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

//! Extrinsic service errors.

use extrinsic_primitives::EncodingError;
use std::sync::Arc;
use thiserror::Error;

/// Result type used by the extrinsic service.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, estimating or submitting extrinsics.
///
/// Results of a single operation may be shared by several dependent operations, so the error
/// is cheaply cloneable.
#[derive(Error, Debug, Clone)]
pub enum Error {
	/// Failed to encode or decode extrinsic.
	#[error("Extrinsic encoding error: {0}")]
	Encoding(#[from] EncodingError),
	/// Signing capability has returned signature that does not match the chain format.
	#[error("Invalid raw signature: 0x{}", hex::encode(.0))]
	InvalidRawSignature(Vec<u8>),
	/// RPC request has failed.
	#[error("RPC transport error: {0}")]
	Transport(Arc<jsonrpsee::core::ClientError>),
	/// Failed to decode RPC response.
	#[error("Failed to decode response of `{method}`: {reason}")]
	ResponseDecoding {
		/// RPC method.
		method: String,
		/// Decoding error.
		reason: String,
	},
	/// Node does not know the requested block.
	#[error("Block {0} is unknown to the node")]
	UnknownBlock(String),
	/// Operation, that this operation depends on, has been cancelled.
	#[error("Parent operation has been cancelled")]
	ParentOperationCancelled,
	/// Operation has produced result of unexpected shape.
	#[error("Unexpected result of dependent operation")]
	UnexpectedDependentResult,
	/// Signing capability has failed.
	#[error("Failed to sign extrinsic: {0}")]
	Signing(String),
	/// Custom error.
	#[error("{0}")]
	Custom(String),
}

impl Error {
	/// Wrap transport error.
	pub fn transport(error: jsonrpsee::core::ClientError) -> Self {
		Error::Transport(Arc::new(error))
	}

	/// Create response decoding error.
	pub fn response_decoding(method: &str, reason: impl ToString) -> Self {
		Error::ResponseDecoding { method: method.into(), reason: reason.to_string() }
	}
}

impl From<jsonrpsee::core::ClientError> for Error {
	fn from(error: jsonrpsee::core::ClientError) -> Self {
		Error::transport(error)
	}
}
