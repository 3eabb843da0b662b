use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time;

use salreg_linear::RegressionEngine;

use crate::error::{Result, ServerError};
use crate::{http, routes};

/// How long a client may take to send its whole request.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Read one request from `stream`, answer it and close the stream.
pub async fn serve_connection<S>(stream: S, engine: &RegressionEngine) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);

    let read = match time::timeout(READ_TIMEOUT, http::read_request(&mut stream)).await {
        Ok(read) => read,
        Err(_) => {
            warn!("no request within {READ_TIMEOUT:?}");
            Ok(None)
        }
    };

    let response = match read {
        Ok(Some(request)) => {
            debug!("{} {}", request.method, request.path);
            routes::handle(engine, &request)
        }
        Ok(None) => return Ok(()),
        Err(ServerError::BadRequest(reason)) => {
            warn!("rejected request: {reason}");
            routes::bad_request(&reason)
        }
        Err(e) => return Err(e),
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Accept connections forever, one task per connection.
pub async fn run(listener: TcpListener, engine: Arc<RegressionEngine>) -> Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let engine = Arc::clone(&engine);

        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream, &engine).await {
                warn!("connection from {addr} failed: {e}");
            }
        });
    }
}
