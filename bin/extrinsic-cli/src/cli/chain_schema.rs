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


//! Connection, signing and chain CLI options.

use clap::{Args, ValueEnum};
use extrinsic_primitives::{ChainFormat, CryptoType};
use extrinsic_service::{ChainConfig, ConnectionParams, ExtrinsicSender, PairSigner, SigningWrapper};
use sp_core::{ecdsa, ed25519, sr25519, Pair};
use std::{path::PathBuf, sync::Arc};

/// Node connection params.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCliParams {
	/// WS endpoint of the node: full URI. Overrides all other connection string components
	/// (host, port, path, secure).
	#[arg(long)]
	pub uri: Option<String>,
	/// WS endpoint of the node: host component.
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,
	/// WS endpoint of the node: port component.
	#[arg(long, default_value_t = 9944)]
	pub port: u16,
	/// WS endpoint of the node: path component.
	#[arg(long)]
	pub path: Option<String>,
	/// Use secure websocket connection.
	#[arg(long)]
	pub secure: bool,
}

impl From<ConnectionCliParams> for ConnectionParams {
	fn from(params: ConnectionCliParams) -> ConnectionParams {
		ConnectionParams {
			uri: params.uri,
			host: params.host,
			port: params.port,
			path: params.path,
			secure: params.secure,
		}
	}
}

/// Crypto of the signer key.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerCrypto {
	/// Sr25519 key.
	Sr25519,
	/// Ed25519 key.
	Ed25519,
	/// ECDSA (secp256k1) key.
	Ecdsa,
}

impl From<SignerCrypto> for CryptoType {
	fn from(crypto: SignerCrypto) -> CryptoType {
		match crypto {
			SignerCrypto::Sr25519 => CryptoType::Sr25519,
			SignerCrypto::Ed25519 => CryptoType::Ed25519,
			SignerCrypto::Ecdsa => CryptoType::Ecdsa,
		}
	}
}

/// Signing params.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SigningCliParams {
	/// The SURI of secret key to sign extrinsics with.
	#[arg(long)]
	pub signer: Option<String>,
	/// The password for the SURI of secret key.
	#[arg(long)]
	pub signer_password: Option<String>,
	/// Path to the file, that contains SURI of secret key. Can be overridden with `signer`
	/// option.
	#[arg(long)]
	pub signer_file: Option<PathBuf>,
	/// Path to the file, that contains password for the SURI of secret key. Can be overridden
	/// with `signer_password` option.
	#[arg(long)]
	pub signer_password_file: Option<PathBuf>,
	/// Crypto of the secret key.
	#[arg(long, value_enum, default_value_t = SignerCrypto::Sr25519)]
	pub signer_crypto: SignerCrypto,
}

/// Signer and the account it signs on behalf of.
pub struct Signer {
	/// Signer of extrinsics.
	pub signer: Arc<dyn SigningWrapper>,
	/// Sender of extrinsics.
	pub sender: ExtrinsicSender,
}

impl SigningCliParams {
	/// Parse signing params into signer.
	pub fn to_signer(&self) -> anyhow::Result<Signer> {
		let suri = match (self.signer.as_ref(), self.signer_file.as_ref()) {
			(Some(suri), _) => suri.to_owned(),
			(None, Some(suri_file)) => std::fs::read_to_string(suri_file).map_err(|err| {
				anyhow::format_err!("Failed to read SURI from file {:?}: {}", suri_file, err)
			})?,
			(None, None) =>
				return Err(anyhow::format_err!(
					"One of options must be specified: 'signer' or 'signer-file'"
				)),
		};

		let suri_password = match (
			self.signer_password.as_ref(),
			self.signer_password_file.as_ref(),
		) {
			(Some(suri_password), _) => Some(suri_password.to_owned()),
			(None, Some(suri_password_file)) => std::fs::read_to_string(suri_password_file)
				.map(Some)
				.map_err(|err| {
					anyhow::format_err!(
						"Failed to read SURI password from file {:?}: {}",
						suri_password_file,
						err,
					)
				})?,
			_ => None,
		};

		let suri = suri.trim();
		let suri_password = suri_password.as_deref().map(str::trim);
		let crypto_type = self.signer_crypto.into();
		match self.signer_crypto {
			SignerCrypto::Sr25519 =>
				pair_signer::<sr25519::Pair>(suri, suri_password, crypto_type),
			SignerCrypto::Ed25519 =>
				pair_signer::<ed25519::Pair>(suri, suri_password, crypto_type),
			SignerCrypto::Ecdsa => pair_signer::<ecdsa::Pair>(suri, suri_password, crypto_type),
		}
	}
}

fn pair_signer<P: Pair + Send + Sync + 'static>(
	suri: &str,
	password: Option<&str>,
	crypto_type: CryptoType,
) -> anyhow::Result<Signer> {
	let pair = P::from_string(suri, password)
		.map_err(|e| anyhow::format_err!("Failed to parse signer SURI: {:?}", e))?;
	let signer = PairSigner::new(pair, crypto_type);
	let sender = ExtrinsicSender { account_id: signer.account_id(), crypto_type };
	Ok(Signer { signer: Arc::new(signer), sender })
}

/// Chain params.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ChainCliParams {
	/// Path to the JSON file with chain configuration. Other chain options override values
	/// from this file.
	#[arg(long)]
	pub chain_config: Option<PathBuf>,
	/// SS58 prefix of the chain addresses.
	#[arg(long)]
	pub ss58_prefix: Option<u16>,
	/// Tip that is added to every extrinsic.
	#[arg(long)]
	pub tip: Option<u128>,
	/// Transactions mortality period, in blocks. MUST be a power of two in [4; 65536] range.
	/// MAY NOT be larger than `BlockHashCount` parameter of the chain system module.
	#[arg(long)]
	pub transactions_mortality: Option<u64>,
}

impl ChainCliParams {
	/// Return transactions mortality.
	pub fn transactions_mortality(&self) -> anyhow::Result<Option<u64>> {
		self.transactions_mortality
			.map(|transactions_mortality| {
				if !(4..=65536).contains(&transactions_mortality) ||
					!transactions_mortality.is_power_of_two()
				{
					Err(anyhow::format_err!(
						"Transactions mortality {} is not a power of two in a [4; 65536] range",
						transactions_mortality,
					))
				} else {
					Ok(transactions_mortality)
				}
			})
			.transpose()
	}

	/// Read chain configuration and apply overrides.
	pub fn chain_config(&self) -> anyhow::Result<ChainConfig> {
		let mut config = match self.chain_config {
			Some(ref path) => {
				let json = std::fs::read_to_string(path).map_err(|err| {
					anyhow::format_err!("Failed to read chain config from {:?}: {}", path, err)
				})?;
				serde_json::from_str(&json).map_err(|err| {
					anyhow::format_err!("Failed to parse chain config from {:?}: {}", path, err)
				})?
			},
			None => ChainConfig::default(),
		};

		if let Some(ss58_prefix) = self.ss58_prefix {
			config.chain_format = ChainFormat::Substrate { ss58_prefix };
		}
		if config.chain_format.is_ethereum() {
			return Err(anyhow::format_err!(
				"Signing extrinsics of Ethereum-compatible chain {} is not supported",
				config.name,
			))
		}
		if let Some(tip) = self.tip {
			config.default_tip = Some(tip);
		}
		if let Some(transactions_mortality) = self.transactions_mortality()? {
			config.mortality_period = transactions_mortality;
		}

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sp_core::crypto::Ss58Codec;

	fn chain_params() -> ChainCliParams {
		ChainCliParams {
			chain_config: None,
			ss58_prefix: None,
			tip: None,
			transactions_mortality: None,
		}
	}

	fn signing_params(suri: &str, signer_crypto: SignerCrypto) -> SigningCliParams {
		SigningCliParams {
			signer: Some(suri.into()),
			signer_password: None,
			signer_file: None,
			signer_password_file: None,
			signer_crypto,
		}
	}

	#[test]
	fn transactions_mortality_is_validated() {
		for valid in [4, 64, 65536] {
			let params = ChainCliParams { transactions_mortality: Some(valid), ..chain_params() };
			assert_eq!(params.transactions_mortality().unwrap(), Some(valid));
		}
		for invalid in [2, 63, 131072] {
			let params = ChainCliParams { transactions_mortality: Some(invalid), ..chain_params() };
			assert!(params.transactions_mortality().is_err());
		}
		assert_eq!(chain_params().transactions_mortality().unwrap(), None);
	}

	#[test]
	fn chain_config_overrides_are_applied() {
		let params = ChainCliParams {
			ss58_prefix: Some(0),
			tip: Some(10),
			transactions_mortality: Some(128),
			..chain_params()
		};

		let config = params.chain_config().unwrap();
		assert_eq!(config.chain_format, ChainFormat::Substrate { ss58_prefix: 0 });
		assert_eq!(config.default_tip, Some(10));
		assert_eq!(config.mortality_period, 128);
		assert_eq!(config.name, ChainConfig::default().name);
	}

	#[test]
	fn sr25519_signer_signs_on_behalf_of_its_public_key() {
		let signer = signing_params("//Alice", SignerCrypto::Sr25519).to_signer().unwrap();
		let alice = sr25519::Pair::from_string("//Alice", None).unwrap();

		assert_eq!(signer.sender.crypto_type, CryptoType::Sr25519);
		assert_eq!(signer.sender.account_id, AsRef::<[u8]>::as_ref(&alice.public()).to_vec());
		assert_eq!(
			sp_core::crypto::AccountId32::from(alice.public()).to_ss58check(),
			"5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY",
		);
	}

	#[test]
	fn ecdsa_signer_account_id_is_hashed_public_key() {
		let signer = signing_params("//Alice", SignerCrypto::Ecdsa).to_signer().unwrap();
		let alice = ecdsa::Pair::from_string("//Alice", None).unwrap();

		assert_eq!(
			signer.sender.account_id,
			sp_core::hashing::blake2_256(alice.public().as_ref()).to_vec()
		);
	}

	#[test]
	fn signer_is_required() {
		let params = SigningCliParams { signer: None, ..signing_params("", SignerCrypto::Sr25519) };
		assert!(params.to_signer().is_err());
		assert!(signing_params("not a suri", SignerCrypto::Ed25519).to_signer().is_err());
	}
}
