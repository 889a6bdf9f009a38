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

//! Asynchronous pipeline that builds, signs, estimates fees of and submits Substrate
//! extrinsics.
//!
//! Chain state (nonce, runtime, genesis hash and mortality) is fetched once per invocation and
//! shared by all extrinsics of the batch. Every extrinsic is then assembled, signed and
//! processed by its own operation, so a failure of one extrinsic never affects the others.

#![warn(missing_docs)]

pub mod assembly;
pub mod config;
pub mod connection;
pub mod era;
pub mod error;
pub mod factory;
pub mod fee;
pub mod operation;
pub mod rpc;
pub mod runtime;
pub mod signing;
pub mod source;
pub mod state;
pub mod submit;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use assembly::{
	DefaultExtrinsicBuilderOperationFactory, ExtrinsicBuilderOperationFactory, ExtrinsicCustomizer,
	ExtrinsicSender,
};
pub use config::{ChainConfig, ExtensionConfig};
pub use connection::{Connection, ConnectionParams, ConnectionRef, RpcConnection};
pub use era::{EraInfo, EraOperationFactory, ImmortalEraOperationFactory, MortalEraOperationFactory};
pub use error::{Error, Result};
pub use factory::{ExtrinsicOperationFactory, FeeExtrinsicResult, SubmitExtrinsicResult};
pub use operation::{Operation, OperationState, OperationWrapper};
pub use runtime::{RpcRuntimeProvider, RuntimeProvider, StaticRuntimeProvider};
pub use signing::{DummySigner, PairSigner, SigningContext, SigningWrapper};
pub use source::{EmptyStreamableSource, StreamableSource};

/// Log target of the service.
pub const LOG_TARGET: &str = "extrinsic";
