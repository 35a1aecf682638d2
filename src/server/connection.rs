use crate::{
    errors::{ErrorKind, HandlerError},
    http::{request::request_from_reader, response::Writer},
    limits::ReqLimits,
    server::server_impl::Handler,
};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};

/// Drives one accepted connection: one request, one response, close.
pub(crate) async fn handle_connection<H: Handler>(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<H>,
    limits: Arc<ReqLimits>,
) {
    tracing::debug!(%peer, "connection accepted");

    if let Err(err) = serve_connection(&mut stream, &*handler, &limits).await {
        tracing::debug!(%peer, error = %err, "connection dropped");
    }

    if let Err(err) = stream.shutdown().await {
        tracing::debug!(%peer, error = %err, "shutdown failed");
    }
}

/// Reads a request from `stream` and answers it.
///
/// Malformed requests are answered with `400 Bad Request` and the error
/// text. Transport failures are returned without writing anything.
pub(crate) async fn serve_connection<S, H>(
    stream: &mut S,
    handler: &H,
    limits: &ReqLimits,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
    H: Handler,
{
    let request = match request_from_reader(stream, limits).await {
        Ok(request) => request,
        Err(ErrorKind::Io(err)) => return Err(err.0),
        Err(err) => {
            tracing::debug!(error = %err, "malformed request");
            return Writer::new(stream)
                .write_handler_error(&HandlerError::from(err))
                .await;
        }
    };

    tracing::debug!(
        method = request.method(),
        target = request.target(),
        body_len = request.body.len(),
        "request parsed"
    );

    let mut writer = Writer::new(stream);

    if let Err(err) = handler.handle(&mut writer, &request).await {
        if writer.is_started() {
            tracing::warn!(
                error = %err,
                bytes_written = writer.bytes_written(),
                "handler failed after the response was started"
            );
            return Ok(());
        }

        writer.write_handler_error(&err).await?;
    }

    Ok(())
}
