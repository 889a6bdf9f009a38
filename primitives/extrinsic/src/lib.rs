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

//! Primitives for building, signing and decoding Substrate extrinsics.

#![warn(missing_docs)]

pub mod address;
pub mod builder;
pub mod coder;
pub mod dispatch_info;
pub mod era;
pub mod error;
pub mod extensions;
pub mod extrinsic;
pub mod signature;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use address::{ChainFormat, ExtrinsicAddress};
pub use builder::ExtrinsicBuilder;
pub use coder::{CallIndex, RuntimeCoderFactory, StaticRuntimeCoderFactory};
pub use dispatch_info::{DispatchInfo, RuntimeDispatchInfo, Weight, RUNTIME_DISPATCH_INFO_TYPE};
pub use era::Era;
pub use error::EncodingError;
pub use extensions::{ExtensionRef, ExtrinsicExtension, GenericExtension};
pub use extrinsic::{DecodedExtrinsic, DecodedSignature, ExtrinsicLayout};
pub use signature::{CryptoType, EthereumSignature, ExtrinsicSignature};

/// Block hash type of Substrate chains.
pub type BlockHash = sp_core::H256;
/// Balance type, used for tips and fees.
pub type Balance = u128;
/// Transaction index (nonce) type.
pub type Nonce = u32;
