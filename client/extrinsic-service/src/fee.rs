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

//! Fee estimation of assembled extrinsics.

use crate::{
	config::ChainConfig,
	connection::{self, Connection, ConnectionRef},
	error::{Error, Result},
	operation::Operation,
	rpc::{from_hex, to_hex, PAYMENT_QUERY_INFO, STATE_CALL, TRANSACTION_PAYMENT_QUERY_INFO},
	runtime::CoderFactoryRef,
	LOG_TARGET,
};

use codec::Encode;
use extrinsic_primitives::{DispatchInfo, RuntimeCoderFactory, RUNTIME_DISPATCH_INFO_TYPE};
use serde_json::json;
use std::sync::Arc;

/// Create operation that estimates fee of the extrinsic.
pub fn fee_operation(
	connection: ConnectionRef,
	config: Arc<ChainConfig>,
	coder: Operation<CoderFactoryRef>,
	extrinsic: Operation<Vec<u8>>,
) -> Operation<DispatchInfo> {
	Operation::spawn("fee", async move {
		let coder = coder.result().await?;
		let extrinsic = extrinsic.result().await?;

		let info = query_fee(&*connection, &config, &*coder, &extrinsic).await?;
		include_tip(info, &extrinsic, &*coder, &config)
	})
}

/// Ask the node to estimate fee of the extrinsic.
///
/// The `TransactionPaymentApi_query_info` runtime call is used when the runtime declares its
/// result type. Otherwise the legacy `payment_queryInfo` method is used.
pub async fn query_fee(
	connection: &dyn Connection,
	config: &ChainConfig,
	coder: &dyn RuntimeCoderFactory,
	extrinsic: &[u8],
) -> Result<DispatchInfo> {
	if config.uses_state_call_for_fee && coder.has_type(RUNTIME_DISPATCH_INFO_TYPE) {
		let mut call_data = extrinsic.to_vec();
		(extrinsic.len() as u32).encode_to(&mut call_data);

		let response: String = connection::request(
			connection,
			STATE_CALL,
			vec![json!(TRANSACTION_PAYMENT_QUERY_INFO), json!(to_hex(&call_data))],
		)
		.await?;
		let response = from_hex(STATE_CALL, &response)?;

		Ok(coder.decode_dispatch_info(RUNTIME_DISPATCH_INFO_TYPE, &response)?)
	} else {
		connection::request(connection, PAYMENT_QUERY_INFO, vec![json!(to_hex(extrinsic))]).await
	}
}

/// Add tip of the extrinsic to the fee, unless the chain fee already includes it.
///
/// Fails if the node has reported a fee that is not a decimal `u128`, or if the fee with the tip
/// overflows.
pub fn include_tip(
	info: DispatchInfo,
	extrinsic: &[u8],
	coder: &dyn RuntimeCoderFactory,
	config: &ChainConfig,
) -> Result<DispatchInfo> {
	if config.fee_includes_tip {
		return Ok(info)
	}

	let tip = match coder.decode_extrinsic(extrinsic)?.tip() {
		Some(tip) => tip,
		None => return Ok(info),
	};

	// state call results are always numeric, so only the legacy method may return a bad fee
	let fee = info.fee_value().ok_or_else(|| {
		Error::response_decoding(PAYMENT_QUERY_INFO, format!("invalid fee {:?}", info.fee))
	})?;
	let fee_with_tip = fee.checked_add(tip).ok_or_else(|| {
		Error::Custom(format!("{} fee {fee} overflows with tip {tip}", config.name))
	})?;
	log::trace!(target: LOG_TARGET, "Added tip {tip} to the {} fee {fee}", config.name);

	Ok(DispatchInfo { fee: fee_with_tip.to_string(), weight: info.weight })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{test_connection, TEST_BASE_FEE, TEST_WEIGHT};
	use assert_matches::assert_matches;
	use extrinsic_primitives::{
		test_utils::test_coder, CryptoType, Era, ExtrinsicBuilder, ExtrinsicSignature,
		StaticRuntimeCoderFactory,
	};
	use sp_core::H256;

	fn extrinsic(tip: Option<u128>, coder: &StaticRuntimeCoderFactory) -> Vec<u8> {
		let mut builder = ExtrinsicBuilder::new(1, 1, H256::zero())
			.with_era(Era::Immortal, H256::zero())
			.with_nonce(0)
			.with_address(coder.layout().chain_format.address(&[1u8; 32]).unwrap())
			.adding_encoded_call(vec![0, 1]);
		if let Some(tip) = tip {
			builder = builder.with_tip(tip);
		}

		builder
			.signing(
				|_| ExtrinsicSignature::substrate(CryptoType::Ed25519, vec![0u8; 64]),
				coder,
			)
			.unwrap()
			.build(coder)
			.unwrap()
	}

	#[async_std::test]
	async fn state_call_is_used_when_runtime_knows_fee_type() {
		let connection = test_connection();
		let coder = test_coder();
		let extrinsic = extrinsic(None, &coder);

		let info = query_fee(&connection, &ChainConfig::default(), &coder, &extrinsic).await;

		let expected = DispatchInfo { fee: TEST_BASE_FEE.to_string(), weight: TEST_WEIGHT };
		assert_eq!(info.unwrap(), expected);
		let requests = connection.requests_of(STATE_CALL);
		let mut call_data = extrinsic.clone();
		call_data.extend_from_slice(&(extrinsic.len() as u32).to_le_bytes());
		assert_eq!(
			requests,
			vec![vec![json!(TRANSACTION_PAYMENT_QUERY_INFO), json!(to_hex(&call_data))]]
		);
		assert!(connection.requests_of(PAYMENT_QUERY_INFO).is_empty());
	}

	#[async_std::test]
	async fn legacy_method_is_used_without_fee_type() {
		let connection = test_connection();
		let coder = StaticRuntimeCoderFactory::new(1, 1, test_coder().layout().clone());
		let extrinsic = extrinsic(None, &coder);

		let info = query_fee(&connection, &ChainConfig::default(), &coder, &extrinsic).await;

		assert_eq!(info.unwrap().fee, TEST_BASE_FEE.to_string());
		assert_eq!(
			connection.requests_of(PAYMENT_QUERY_INFO),
			vec![vec![json!(to_hex(&extrinsic))]]
		);
		assert!(connection.requests_of(STATE_CALL).is_empty());
	}

	#[async_std::test]
	async fn legacy_method_is_used_when_state_call_is_disabled() {
		let connection = test_connection();
		let coder = test_coder();
		let config = ChainConfig { uses_state_call_for_fee: false, ..Default::default() };

		query_fee(&connection, &config, &coder, &extrinsic(None, &coder)).await.unwrap();

		assert_eq!(connection.requests_of(PAYMENT_QUERY_INFO).len(), 1);
		assert!(connection.requests_of(STATE_CALL).is_empty());
	}

	#[test]
	fn tip_is_added_to_base_fee() {
		let coder = test_coder();
		let info = DispatchInfo { fee: "1000".into(), weight: TEST_WEIGHT };

		let config = ChainConfig::default();
		let with_tip = include_tip(info.clone(), &extrinsic(Some(50), &coder), &coder, &config);
		assert_eq!(with_tip.unwrap().fee, "1050");

		let without_tip = include_tip(info.clone(), &extrinsic(None, &coder), &coder, &config);
		assert_eq!(without_tip.unwrap(), info);
	}

	#[test]
	fn invalid_fee_with_tip_is_rejected() {
		let coder = test_coder();
		let config = ChainConfig::default();
		let extrinsic = extrinsic(Some(50), &coder);

		let invalid = DispatchInfo { fee: "lots".into(), weight: TEST_WEIGHT };
		assert_matches!(
			include_tip(invalid, &extrinsic, &coder, &config),
			Err(Error::ResponseDecoding { method, .. }) if method == PAYMENT_QUERY_INFO
		);

		let huge = DispatchInfo { fee: u128::MAX.to_string(), weight: TEST_WEIGHT };
		assert_matches!(include_tip(huge, &extrinsic, &coder, &config), Err(Error::Custom(_)));
	}

	#[test]
	fn tip_is_not_added_when_fee_includes_it() {
		let coder = test_coder();
		let info = DispatchInfo { fee: "1000".into(), weight: TEST_WEIGHT };
		let config = ChainConfig { fee_includes_tip: true, ..Default::default() };

		let extrinsic = extrinsic(Some(50), &coder);
		assert_eq!(include_tip(info.clone(), &extrinsic, &coder, &config).unwrap(), info);
	}
}
