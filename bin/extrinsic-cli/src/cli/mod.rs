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


//! Deal with CLI args of the extrinsic tool.

use clap::{Parser, Subcommand};

mod chain_schema;
mod extrinsic;

/// Parse CLI args.
pub fn parse_args() -> Command {
	Cli::parse().command
}

#[derive(Parser, Debug)]
#[command(version, about = "Substrate extrinsic builder")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

/// Extrinsic tool commands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build and sign single extrinsic with given calls.
	///
	/// Prints hex-encoded extrinsic, which may be submitted later.
	Build(extrinsic::BuildExtrinsic),
	/// Estimate fees of extrinsics with given calls.
	///
	/// Extrinsics are signed with dummy signatures, so the signer only needs to know the
	/// public key of the sender.
	EstimateFee(extrinsic::EstimateFee),
	/// Sign and submit extrinsics with given calls, using consecutive nonces.
	Submit(extrinsic::SubmitExtrinsics),
}

impl Command {
	/// Initialize logger depending on the command.
	pub fn init_logger(&self) {
		match self {
			Self::Submit(_) => crate::initialize::initialize_logger(true),
			Self::Build(_) | Self::EstimateFee(_) => crate::initialize::initialize_logger(false),
		}
	}

	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		match self {
			Self::Build(arg) => arg.run().await?,
			Self::EstimateFee(arg) => arg.run().await?,
			Self::Submit(arg) => arg.run().await?,
		}
		Ok(())
	}
}

/// Nicer formatting for raw bytes vectors.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl std::str::FromStr for HexBytes {
	type Err = hex::FromHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(hex::decode(s.trim_start_matches("0x"))?))
	}
}

impl std::fmt::Debug for HexBytes {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(fmt, "0x{}", self)
	}
}

impl std::fmt::Display for HexBytes {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(fmt, "{}", hex::encode(&self.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_bytes_are_parsed_with_or_without_prefix() {
		assert_eq!("0x0500".parse::<HexBytes>(), Ok(HexBytes(vec![5, 0])));
		assert_eq!("0500".parse::<HexBytes>(), Ok(HexBytes(vec![5, 0])));
		assert!("0x05z0".parse::<HexBytes>().is_err());
		assert_eq!(format!("{:?}", HexBytes(vec![0xde, 0xad])), "0xdead");
	}

	#[test]
	fn command_is_parsed() {
		let cli = Cli::try_parse_from([
			"extrinsic-cli",
			"estimate-fee",
			"--signer",
			"//Alice",
			"--call",
			"0x0001",
			"--call",
			"0x0002",
			"--count",
			"3",
		])
		.unwrap();

		match cli.command {
			Command::EstimateFee(arg) => {
				assert_eq!(arg.count, 3);
				assert_eq!(arg.params.calls, vec![HexBytes(vec![0, 1]), HexBytes(vec![0, 2])]);
				assert_eq!(arg.params.connection.port, 9944);
			},
			command => panic!("Unexpected command: {command:?}"),
		}
	}

	#[test]
	fn call_is_required() {
		assert!(Cli::try_parse_from(["extrinsic-cli", "build", "--signer", "//Alice"]).is_err());
	}
}
