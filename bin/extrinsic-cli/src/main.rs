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


//! Command line tool that builds, estimates fees of and submits Substrate extrinsics.

#![warn(missing_docs)]

mod cli;
mod initialize;

fn main() {
	let command = cli::parse_args();
	command.init_logger();

	let result = async_std::task::block_on(command.run());
	if let Err(error) = result {
		log::error!(target: extrinsic_service::LOG_TARGET, "Command has failed: {error:?}");
		std::process::exit(1);
	}
}
