// MCP server dispatcher
//
// Reads framed requests from the transport, routes each one to the resource
// or tool registry on its own task, and writes the correlated response back
// through a single writer task. Responses may leave in a different order than
// requests arrived; each one carries its request's id.

mod handlers;

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Settings;
use crate::errors::{FrameError, McpError};
use crate::models::notes::NotesStore;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, ServerInfo};
use crate::resources::{self, ResourceRegistry};
use crate::search::GithubSearchClient;
use crate::tools::{self, ToolRegistry};
use crate::transport::{FrameReader, FrameWriter};

/// Methods the dispatcher understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Ping,
    ListResources,
    ReadResource,
    ListTools,
    CallTool,
}

impl Method {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "initialize" => Some(Method::Initialize),
            "ping" => Some(Method::Ping),
            "resources/list" => Some(Method::ListResources),
            "resources/read" => Some(Method::ReadResource),
            "tools/list" => Some(Method::ListTools),
            "tools/call" => Some(Method::CallTool),
            _ => None,
        }
    }
}

/// The request dispatcher
pub struct McpServer {
    info: ServerInfo,
    resources: Arc<ResourceRegistry>,
    tools: Arc<ToolRegistry>,
    initialized: AtomicBool,
    max_frame_bytes: usize,
}

impl McpServer {
    /// Create a dispatcher over the given registries
    pub fn new(info: ServerInfo, resources: Arc<ResourceRegistry>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            info,
            resources,
            tools,
            initialized: AtomicBool::new(false),
            max_frame_bytes: crate::defaults::MAX_FRAME_BYTES,
        }
    }

    /// Limit the size of a single inbound message
    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// Wire up the notes store, search client and registries from settings
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let info = ServerInfo {
            name: settings.server.name.clone(),
            version: settings.server.version.clone(),
        };

        let store = Arc::new(NotesStore::new(settings.storage.notes_file.clone()));
        let search = Arc::new(GithubSearchClient::new(&settings.search)?);

        let resources = resources::init_registry(store.clone(), info.clone());
        let tools = tools::init_registry(store, search, settings.search.per_page);
        log::info!(
            "Initialized {} resources and {} tools",
            resources.list().len(),
            tools.list_tools().len()
        );

        Ok(Self::new(info, resources, tools).with_max_frame_bytes(settings.server.max_frame_bytes))
    }

    /// Whether the initialization handshake has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Serve requests until the reader closes or `cancel` fires.
    ///
    /// Once reading stops, requests already dispatched run to completion and
    /// their responses are written before this returns.
    pub async fn serve<R, W>(
        self: Arc<Self>,
        reader: R,
        writer: W,
        cancel: CancellationToken,
    ) -> Result<(), FrameError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        log::info!("MCP server '{}' {} serving", self.info.name, self.info.version);

        let mut frames = FrameReader::new(reader, self.max_frame_bytes);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut writer_task = tokio::spawn(write_responses(FrameWriter::new(writer), rx));
        let in_flight = TaskTracker::new();
        let mut read_failure = None;
        let mut writer_result = None;

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("Cancellation requested, no longer accepting requests");
                    break;
                }
                result = &mut writer_task => {
                    log::error!("Response writer stopped, shutting down");
                    writer_result = Some(result);
                    break;
                }
                next = frames.next_request() => next,
            };

            match next {
                None => {
                    log::info!("Transport closed");
                    break;
                }
                Some(Err(FrameError::Io(e))) => {
                    log::error!("Failed to read from transport: {}", e);
                    read_failure = Some(FrameError::Io(e));
                    break;
                }
                Some(Err(e)) => {
                    log::warn!("Rejected inbound message: {}", e);
                    let id = match &e {
                        FrameError::Decode { id: Some(id), .. } => id.clone(),
                        _ => Value::Null,
                    };
                    let _ = tx.send(JsonRpcResponse::error(id, &McpError::from(e)));
                }
                Some(Ok(request)) => self.dispatch(request, &tx, &in_flight),
            }
        }

        in_flight.close();
        if !in_flight.is_empty() {
            log::info!("Waiting for {} in-flight requests", in_flight.len());
        }
        in_flight.wait().await;
        drop(tx);

        let writer_result = match writer_result {
            Some(result) => result,
            None => writer_task.await,
        };
        let written = match writer_result {
            Ok(result) => result,
            Err(e) => Err(FrameError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))),
        };
        log::info!("MCP server stopped");

        match read_failure {
            Some(e) => Err(e),
            None => written,
        }
    }

    /// Answer handshake messages inline, hand everything else to a task
    fn dispatch(
        self: &Arc<Self>,
        request: JsonRpcRequest,
        tx: &mpsc::UnboundedSender<JsonRpcResponse>,
        in_flight: &TaskTracker,
    ) {
        let JsonRpcRequest { id, method, params, .. } = request;
        let Some(id) = id else {
            self.handle_notification(&method);
            return;
        };
        log::debug!("Request {} '{}'", id, method);

        let Some(parsed) = Method::parse(&method) else {
            log::warn!("Unknown method '{}' (id={})", method, id);
            let _ = tx.send(JsonRpcResponse::error(id, &McpError::unknown_method(&method)));
            return;
        };

        match parsed {
            Method::Initialize => {
                let _ = tx.send(JsonRpcResponse::from_result(id, self.initialize(&params)));
            }
            Method::Ping => {
                let _ = tx.send(JsonRpcResponse::success(id, serde_json::json!({})));
            }
            _ if !self.is_initialized() => {
                let _ = tx.send(JsonRpcResponse::error(id, &McpError::not_initialized(&method)));
            }
            _ => {
                let server = Arc::clone(self);
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let result = AssertUnwindSafe(server.handle(parsed, params))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| {
                            log::error!("Handler for '{}' panicked (id={})", method, id);
                            Err(McpError::internal(format!("Handler for '{}' failed unexpectedly", method)))
                        });

                    if let Err(e) = &result {
                        log::warn!("Request {} '{}' failed: {}", id, method, e);
                    }
                    if tx.send(JsonRpcResponse::from_result(id, result)).is_err() {
                        log::debug!("Response dropped, writer already closed");
                    }
                });
            }
        }
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => log::debug!("Client finished initialization"),
            "notifications/cancelled" => log::debug!("Client cancelled a request; handlers run to completion"),
            other => log::debug!("Ignoring notification '{}'", other),
        }
    }
}

/// Drain the response queue into the transport
async fn write_responses<W>(
    mut writer: FrameWriter<W>,
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        if let Err(e) = writer.send_response(&response).await {
            log::error!("Failed to write response {}: {}", response.id, e);
            return Err(e);
        }
    }
    Ok(())
}
