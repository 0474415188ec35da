// ABOUTME: MCP server - reads newline-delimited JSON-RPC from a reader, routes
// ABOUTME: methods to the Dispatcher, and writes responses from a single writer task.

use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use super::types::error_codes;
use super::{
    DEFAULT_PROTOCOL_VERSION, McpImplementation, McpInitializeParams, McpInitializeResult,
    McpRequest, McpResponse, McpServerCapabilities, McpToolCallParams, McpToolResult,
    McpToolsCapability, McpToolsListResult,
};
use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::error::ServerError;

/// Serves the tool catalog over MCP.
///
/// Each incoming line is handled on its own task, so slow provider calls do
/// not hold up later requests. Responses are written in completion order.
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Dispatcher,
    info: McpImplementation,
}

impl McpServer {
    /// Create a server identified by the configured name and version.
    pub fn new(dispatcher: Dispatcher, config: &ServerConfig) -> Self {
        Self::with_info(
            dispatcher,
            config.server_name.clone(),
            config.server_version.clone(),
        )
    }

    /// Create a server with an explicit name and version.
    pub fn with_info(
        dispatcher: Dispatcher,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            info: McpImplementation {
                name: name.into(),
                version: version.into(),
            },
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve over the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<(), ServerError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until `reader` reaches end of input and every in-flight request
    /// has been answered.
    ///
    /// A panic inside a request task is returned as
    /// [`ServerError::UncaughtFault`]; the caller is expected to terminate.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<McpResponse>(64);

        let writer_handle = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = rx.recv().await {
                let json = serde_json::to_string(&response)?;
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<_, ServerError>(())
        });

        tracing::info!(server = %self.info.name, "MCP server listening");

        let mut segments = BufReader::new(reader).split(b'\n');
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                segment = segments.next_segment() => {
                    let Some(segment) = segment? else {
                        break;
                    };
                    let line = segment.trim_ascii();
                    if line.is_empty() {
                        continue;
                    }

                    tracing::debug!(request = %String::from_utf8_lossy(line), "received message");

                    let server = self.clone();
                    let tx = tx.clone();
                    let line = line.to_vec();
                    tasks.spawn(async move {
                        if let Some(response) = server.handle_message(&line).await {
                            // The writer only goes away when the server is shutting down.
                            let _ = tx.send(response).await;
                        }
                    });
                }
                Some(joined) = tasks.join_next() => check_task(joined)?,
            }
        }

        tracing::info!(in_flight = tasks.len(), "input closed, draining requests");
        while let Some(joined) = tasks.join_next().await {
            check_task(joined)?;
        }

        drop(tx);
        writer_handle
            .await
            .map_err(|e| ServerError::UncaughtFault(e.to_string()))??;

        tracing::info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw message. Returns `None` when no response is due.
    ///
    /// Bytes that are not valid UTF-8 JSON get a parse error like any other
    /// malformed input.
    pub async fn handle_message(&self, message: impl AsRef<[u8]>) -> Option<McpResponse> {
        let value: Value = match serde_json::from_slice(message.as_ref()) {
            Ok(value) => value,
            Err(e) => {
                return Some(McpResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        if value.get("method").is_none()
            && (value.get("result").is_some() || value.get("error").is_some())
        {
            tracing::debug!("ignoring response from client");
            return None;
        }

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<McpRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(McpResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Invalid request: {}", e),
            )),
        }
    }

    /// Route a parsed request to its method handler.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => McpResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Value, params: Option<Value>) -> McpResponse {
        let params: McpInitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = %client.version,
                "client connected"
            );
        }

        let result = McpInitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: McpServerCapabilities {
                tools: Some(McpToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
        };
        result_response(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> McpResponse {
        let result = McpToolsListResult {
            tools: self.dispatcher.registry().to_definitions(),
        };
        result_response(id, &result)
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> McpResponse {
        let params = match params.map(serde_json::from_value::<McpToolCallParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return McpResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
            None => {
                return McpResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Invalid params: missing tool name",
                );
            }
        };

        let result = self
            .dispatcher
            .call_tool(&params.name, params.arguments.unwrap_or(Value::Null))
            .await;
        result_response(id, &McpToolResult::from(result))
    }
}

fn result_response<T: Serialize>(id: Value, result: &T) -> McpResponse {
    match serde_json::to_value(result) {
        Ok(value) => McpResponse::success(id, value),
        Err(e) => McpResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Internal error: {}", e),
        ),
    }
}

fn check_task(joined: Result<(), JoinError>) -> Result<(), ServerError> {
    joined.map_err(|e| {
        tracing::error!(error = %e, "request task failed");
        ServerError::UncaughtFault(e.to_string())
    })
}
