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

//! Utilities that are useful when testing extrinsic-related code.

use crate::{
	address::ChainFormat, coder::StaticRuntimeCoderFactory,
	dispatch_info::RUNTIME_DISPATCH_INFO_TYPE, extrinsic::ExtrinsicLayout,
};

/// Spec version of the test runtime.
pub const TEST_SPEC_VERSION: u32 = 1_000;
/// Transaction version of the test runtime.
pub const TEST_TRANSACTION_VERSION: u32 = 25;
/// Address format of the test chain.
pub const TEST_CHAIN_FORMAT: ChainFormat = ChainFormat::Substrate { ss58_prefix: 42 };

/// Coder factory of the test runtime, that knows the `RuntimeDispatchInfo` type.
pub fn test_coder() -> StaticRuntimeCoderFactory {
	test_coder_with_layout(ExtrinsicLayout::new(TEST_CHAIN_FORMAT))
}

/// Coder factory of the test runtime with custom extrinsic layout.
pub fn test_coder_with_layout(layout: ExtrinsicLayout) -> StaticRuntimeCoderFactory {
	StaticRuntimeCoderFactory::new(TEST_SPEC_VERSION, TEST_TRANSACTION_VERSION, layout)
		.with_type(RUNTIME_DISPATCH_INFO_TYPE)
}
