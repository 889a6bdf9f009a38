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

//! Connection to the node: the capability of submitting JSON-RPC requests.

use crate::{
	error::{Error, Result},
	LOG_TARGET,
};

use async_trait::async_trait;
use jsonrpsee::{
	core::{client::ClientT, params::ArrayParams},
	ws_client::{WsClient, WsClientBuilder},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

/// Default timeout of a single RPC request.
pub const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared reference to the connection.
pub type ConnectionRef = Arc<dyn Connection>;

/// Capability of submitting JSON-RPC requests to the node.
///
/// The connection is shared by all operations of the service, so it must be safe for
/// concurrent use.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
	/// Submit request and return raw response.
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value>;
}

/// Submit request and decode its response.
pub async fn request<T: DeserializeOwned>(
	connection: &dyn Connection,
	method: &str,
	params: Vec<Value>,
) -> Result<T> {
	let response = connection.request(method, params).await?;
	serde_json::from_value(response).map_err(|e| Error::response_decoding(method, e))
}

/// Node connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
	/// Full WS endpoint URI. Overrides all other components.
	pub uri: Option<String>,
	/// Host name.
	pub host: String,
	/// Port.
	pub port: u16,
	/// Path.
	pub path: Option<String>,
	/// Use secure websocket connection.
	pub secure: bool,
}

impl Default for ConnectionParams {
	fn default() -> Self {
		ConnectionParams {
			uri: None,
			host: "127.0.0.1".into(),
			port: 9944,
			path: None,
			secure: false,
		}
	}
}

impl ConnectionParams {
	/// Endpoint URI.
	pub fn uri(&self) -> String {
		match self.uri {
			Some(ref uri) => uri.clone(),
			None => format!(
				"{}://{}:{}{}",
				if self.secure { "wss" } else { "ws" },
				self.host,
				self.port,
				self.path.as_deref().unwrap_or_default(),
			),
		}
	}
}

/// Connection over `jsonrpsee` WebSocket client.
///
/// The client needs a Tokio reactor, so the connection owns a Tokio runtime and executes all
/// client futures there. Callers may then await requests from any executor.
pub struct RpcConnection {
	uri: String,
	client: Arc<WsClient>,
	tokio: Arc<tokio::runtime::Runtime>,
}

impl RpcConnection {
	/// Connect to the node.
	pub async fn new(params: &ConnectionParams) -> Result<Self> {
		let uri = params.uri();
		log::info!(target: LOG_TARGET, "Connecting to node at {uri}");

		let tokio = tokio::runtime::Runtime::new()
			.map_err(|e| Error::Custom(format!("Failed to start Tokio runtime: {e}")))?;
		let client_uri = uri.clone();
		let client = tokio
			.spawn(async move {
				WsClientBuilder::default()
					.request_timeout(RPC_REQUEST_TIMEOUT)
					.build(&client_uri)
					.await
			})
			.await
			.map_err(|e| Error::Custom(format!("Connection task has failed: {e}")))?
			.map_err(Error::transport)?;

		Ok(RpcConnection { uri, client: Arc::new(client), tokio: Arc::new(tokio) })
	}

	/// Endpoint URI.
	pub fn uri(&self) -> &str {
		&self.uri
	}
}

#[async_trait]
impl Connection for RpcConnection {
	async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
		let mut rpc_params = ArrayParams::new();
		for param in params {
			rpc_params.insert(param).map_err(|e| Error::Custom(e.to_string()))?;
		}

		log::trace!(target: LOG_TARGET, "Sending {method} request to {}", self.uri);
		let client = self.client.clone();
		let method = method.to_owned();
		self.tokio
			.spawn(async move { client.request::<Value, _>(&method, rpc_params).await })
			.await
			.map_err(|e| Error::Custom(format!("Request task has failed: {e}")))?
			.map_err(Error::transport)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rpc::SYSTEM_ACCOUNT_NEXT_INDEX;
	use assert_matches::assert_matches;
	use async_std::net::TcpListener;
	use serde_json::json;
	use soketto::handshake::{server::Response, Server};

	/// Serve single WebSocket connection, answering every JSON-RPC request with given result.
	async fn serve_connection(listener: TcpListener, result: Value) {
		let (socket, _) = listener.accept().await.unwrap();
		let mut server = Server::new(socket);
		let key = server.receive_request().await.unwrap().key();
		server.send_response(&Response::Accept { key, protocol: None }).await.unwrap();

		let (mut sender, mut receiver) = server.into_builder().finish();
		let mut message = Vec::new();
		while receiver.receive_data(&mut message).await.is_ok() {
			let request: Value = serde_json::from_slice(&message).unwrap();
			let response = json!({"jsonrpc": "2.0", "id": request["id"], "result": result});
			sender.send_text(response.to_string()).await.unwrap();
			message.clear();
		}
	}

	#[test]
	fn uri_is_built_from_components() {
		assert_eq!(ConnectionParams::default().uri(), "ws://127.0.0.1:9944");
		assert_eq!(
			ConnectionParams {
				host: "rpc.polkadot.io".into(),
				port: 443,
				path: Some("/ws".into()),
				secure: true,
				..Default::default()
			}
			.uri(),
			"wss://rpc.polkadot.io:443/ws"
		);
		assert_eq!(
			ConnectionParams { uri: Some("ws://node:1".into()), ..Default::default() }.uri(),
			"ws://node:1"
		);
	}

	#[async_std::test]
	async fn connection_failure_is_reported_outside_of_tokio_runtime() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let address = listener.local_addr().unwrap();
		drop(listener);

		let params =
			ConnectionParams { uri: Some(format!("ws://{address}")), ..Default::default() };
		assert_matches!(RpcConnection::new(&params).await.err(), Some(Error::Transport(_)));
	}

	#[async_std::test]
	async fn requests_are_served_outside_of_tokio_runtime() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let address = listener.local_addr().unwrap();
		async_std::task::spawn(serve_connection(listener, json!(7)));

		let params =
			ConnectionParams { uri: Some(format!("ws://{address}")), ..Default::default() };
		let connection = RpcConnection::new(&params).await.unwrap();
		let nonce: u32 =
			request(&connection, SYSTEM_ACCOUNT_NEXT_INDEX, vec![json!("alice")]).await.unwrap();

		assert_eq!(nonce, 7);
	}
}
