//! `curl --raw -i localhost:42069/stream/5` shows the chunks and the trailers.

use craft_http::{
    default_headers, Handler, HandlerError, HeaderMap, Request, StatusCode, Writer,
};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct Stream;

impl Handler for Stream {
    async fn handle(&self, w: &mut Writer<'_>, req: &Request) -> Result<(), HandlerError> {
        let Some(count) = req.target().strip_prefix("/stream/") else {
            return Err(HandlerError::bad_request("try /stream/<n>\n"));
        };
        let count: usize = count
            .parse()
            .map_err(|_| HandlerError::bad_request("<n> must be a number\n"))?;

        let mut headers = default_headers(0);
        headers.delete("content-length");
        headers.set("transfer-encoding", "chunked");
        headers.set("trailer", "x-content-sha256,x-content-length,x-chunk-count");

        w.write_status_line(StatusCode::OK).await?;
        w.write_headers(&headers).await?;

        let mut body = Vec::new();
        for i in 0..count {
            let line = format!("{{\"id\": {i}, \"url\": \"{}\"}}\n", req.target());
            w.write_chunked_body(line.as_bytes()).await?;
            body.extend_from_slice(line.as_bytes());

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut trailers = HeaderMap::new();
        trailers.set("x-content-sha256", format!("{:x}", Sha256::digest(&body)));
        trailers.set("x-content-length", body.len().to_string());
        trailers.set("x-chunk-count", count.to_string());

        w.write_chunked_body_done(true).await?;
        w.write_trailers(&trailers).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let server = craft_http::serve(42069, Stream).await?;
    tracing::info!("listening on port 42069");

    tokio::signal::ctrl_c().await?;
    server.close().await;
    Ok(())
}
