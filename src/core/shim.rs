//! Local RPC shim: JSON envelopes over a Unix domain socket
//!
//! One request per connection: connect → send request → (half-close) →
//! receive response → disconnect. This is a local harness, not the
//! canonical transport; it does no authentication beyond owner-only
//! socket permissions.
//!
//! A request read ends at EOF, as soon as the buffered bytes form one
//! complete JSON value, or at the size limit. Every connection gets a
//! well-formed envelope back, including on read failures.

use serde::de::IgnoredAny;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use crate::config::ShimConfig;
use crate::core::omega::PromotionEngine;
use crate::core::protocol::{handle, Request, Response};
use crate::error::ShimError;

const READ_CHUNK: usize = 64 * 1024;

/// Socket server wrapping the promotion engine and world weighting
#[derive(Debug, Clone)]
pub struct ShimServer {
    config: ShimConfig,
    engine: Arc<PromotionEngine>,
}

impl ShimServer {
    pub fn new(config: ShimConfig, engine: PromotionEngine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Remove a stale socket, bind, restrict to owner
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(&self) -> Result<UnixListener, ShimError> {
        let path = &self.config.socket_path;
        let bind_err = |source| ShimError::Bind {
            path: path.display().to_string(),
            source,
        };

        if path.exists() {
            debug!(path = %path.display(), "removing stale socket");
            std::fs::remove_file(path).map_err(bind_err)?;
        }

        let listener = UnixListener::bind(path).map_err(bind_err)?;

        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                warn!(path = %path.display(), error = %e, "could not restrict socket permissions");
            }
        }

        info!(path = %path.display(), "omega shim listening");
        Ok(listener)
    }

    /// Bind and serve forever
    pub async fn run(self) -> Result<(), ShimError> {
        let listener = self.bind()?;
        self.serve(listener).await
    }

    /// Bind and serve until `shutdown` resolves, then remove the socket
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ShimError>
    where
        F: Future<Output = ()>,
    {
        let listener = self.bind()?;
        let path = self.config.socket_path.clone();
        let result = tokio::select! {
            r = self.serve(listener) => r,
            _ = shutdown => Ok(()),
        };
        if let Err(e) = std::fs::remove_file(&path) {
            debug!(path = %path.display(), error = %e, "socket already gone");
        }
        info!(path = %path.display(), "omega shim stopped");
        result
    }

    /// Accept loop; each connection runs on its own task
    pub async fn serve(self, listener: UnixListener) -> Result<(), ShimError> {
        loop {
            let (stream, _) = listener.accept().await?;
            let engine = Arc::clone(&self.engine);
            let config = self.config.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &engine, &config).await {
                    warn!(error = %e, "connection error");
                }
            });
        }
    }
}

/// One full exchange on an accepted connection
async fn handle_connection(
    mut stream: UnixStream,
    engine: &PromotionEngine,
    config: &ShimConfig,
) -> Result<(), ShimError> {
    let response = match read_request(&mut stream, config.max_request_bytes, config.read_timeout_ms).await {
        Ok(bytes) => respond(engine, &bytes),
        Err(e) => {
            warn!(error = %e, "failed to read request");
            Response::failure(e.to_string())
        }
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn respond(engine: &PromotionEngine, bytes: &[u8]) -> Response {
    match Request::decode(bytes) {
        Ok(request) => {
            let rpc = request.rpc_name().to_string();
            let response = handle(engine, request);
            debug!(rpc = %rpc, ok = response.is_ok(), bytes = bytes.len(), "handled request");
            response
        }
        Err(e) => {
            warn!(error = %e, "rejected malformed envelope");
            Response::failure(e.to_string())
        }
    }
}

/// Read one request with a deadline
pub async fn read_request<R>(reader: &mut R, max_bytes: usize, timeout_ms: u64) -> Result<Vec<u8>, ShimError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(Duration::from_millis(timeout_ms), read_until_complete(reader, max_bytes))
        .await
        .map_err(|_| ShimError::Timeout(timeout_ms))?
}

async fn read_until_complete<R>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>, ShimError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(buf);
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > max_bytes {
            return Err(ShimError::TooLarge(max_bytes));
        }
        if is_complete_json(&buf) {
            return Ok(buf);
        }
    }
}

fn is_complete_json(buf: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(buf).is_ok()
}

/// Client for one request/response exchange
#[derive(Debug, Clone)]
pub struct ShimClient {
    socket_path: PathBuf,
}

impl ShimClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Send a JSON request, return the decoded response envelope
    pub async fn call(&self, request: &serde_json::Value) -> Result<serde_json::Value, ShimError> {
        let bytes = serde_json::to_vec(request)?;
        self.call_raw(&bytes).await
    }

    /// Send raw bytes as-is (may be malformed)
    pub async fn call_raw(&self, bytes: &[u8]) -> Result<serde_json::Value, ShimError> {
        let mut stream = UnixStream::connect(&self.socket_path).await?;
        stream.write_all(bytes).await?;
        stream.shutdown().await?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;
        Ok(serde_json::from_slice(&response)?)
    }
}
