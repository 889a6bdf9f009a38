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

//! Submission of assembled extrinsics.

use crate::{
	connection::{self, ConnectionRef},
	operation::Operation,
	rpc::{to_hex, AUTHOR_SUBMIT_EXTRINSIC},
	LOG_TARGET,
};

use serde_json::json;

/// Create operation that submits the extrinsic and returns its hash.
pub fn submit_operation(
	connection: ConnectionRef,
	extrinsic: Operation<Vec<u8>>,
) -> Operation<String> {
	Operation::spawn_tracked("submit", move |tracker| async move {
		let extrinsic = extrinsic.result().await?;

		tracker.mark_submitted();
		let hash: String = connection::request(
			&*connection,
			AUTHOR_SUBMIT_EXTRINSIC,
			vec![json!(to_hex(&extrinsic))],
		)
		.await?;
		log::info!(target: LOG_TARGET, "Submitted extrinsic {hash}");

		Ok(hash)
	})
}
