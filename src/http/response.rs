//! Response serialization straight onto the connection.

use crate::{
    errors::HandlerError,
    http::headers::{HeaderMap, CRLF},
    StatusCode,
};
use std::{fmt, io};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes an HTTP/1.1 response to a byte sink.
///
/// Nothing is buffered: every call goes out as a single `write_all`, and the
/// first failure is returned as is. The writer does not enforce an order;
/// callers are expected to follow
///
/// ```text
/// status line -> headers -> body            (fixed length)
/// status line -> headers -> chunk* -> done -> trailers?   (chunked)
/// ```
///
/// Instances are created by the server and passed to
/// [`Handler::handle`](crate::Handler::handle). Any
/// [`AsyncWrite`] works, which is handy for tests:
///
/// # Examples
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> std::io::Result<()> {
/// use craft_http::{default_headers, StatusCode, Writer};
///
/// let mut sink: Vec<u8> = Vec::new();
/// let mut w = Writer::new(&mut sink);
///
/// w.write_status_line(StatusCode::OK).await?;
/// w.write_headers(&default_headers(2)).await?;
/// w.write_body(b"hi").await?;
///
/// assert_eq!(
///     sink,
///     b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\nhi"
/// );
/// # Ok(())
/// # }
/// ```
pub struct Writer<'a> {
    sink: &'a mut (dyn AsyncWrite + Send + Unpin),
    bytes_written: usize,
}

impl fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl<'a> Writer<'a> {
    #[inline]
    pub fn new(sink: &'a mut (dyn AsyncWrite + Send + Unpin)) -> Self {
        Self {
            sink,
            bytes_written: 0,
        }
    }

    /// `true` once any byte has been handed to the sink.
    #[inline(always)]
    pub fn is_started(&self) -> bool {
        self.bytes_written > 0
    }

    #[inline(always)]
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    #[inline]
    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.sink.write_all(data).await?;
        self.bytes_written += data.len();
        Ok(())
    }
}

impl Writer<'_> {
    /// `HTTP/1.1 <code> <reason>\r\n`
    #[inline]
    pub async fn write_status_line(&mut self, code: StatusCode) -> io::Result<()> {
        self.send(&code.status_line()).await
    }

    /// Every field as `name: value\r\n` in iteration order, then the empty
    /// line that ends the header block.
    pub async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()> {
        let mut buffer = Vec::with_capacity(64);
        serialize_fields(headers, &mut buffer);
        self.send(&buffer).await
    }

    /// Raw bytes, no framing.
    #[inline]
    pub async fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        self.send(data).await
    }

    /// One chunk: `<hex length>\r\n<data>\r\n`.
    ///
    /// An empty slice writes nothing, since a zero-length chunk is the end
    /// marker (see [`write_chunked_body_done`](Self::write_chunked_body_done)).
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let size = format!("{:x}\r\n", data.len());

        let mut buffer = Vec::with_capacity(size.len() + data.len() + CRLF.len());
        buffer.extend_from_slice(size.as_bytes());
        buffer.extend_from_slice(data);
        buffer.extend_from_slice(CRLF);

        self.send(&buffer).await
    }

    /// The last chunk, `0\r\n`.
    ///
    /// Without trailers the message ends here, so the closing `\r\n` is
    /// written too. With trailers it is left to
    /// [`write_trailers`](Self::write_trailers).
    #[inline]
    pub async fn write_chunked_body_done(&mut self, has_trailers: bool) -> io::Result<()> {
        match has_trailers {
            true => self.send(b"0\r\n").await,
            false => self.send(b"0\r\n\r\n").await,
        }
    }

    /// Trailer fields after the last chunk, serialized like
    /// [`write_headers`](Self::write_headers). The names should have been
    /// announced in a `trailer` header.
    #[inline]
    pub async fn write_trailers(&mut self, trailers: &HeaderMap) -> io::Result<()> {
        self.write_headers(trailers).await
    }

    /// A complete `text/plain` response carrying `err.message`.
    pub async fn write_handler_error(&mut self, err: &HandlerError) -> io::Result<()> {
        self.write_status_line(err.code).await?;
        self.write_headers(&default_headers(err.message.len())).await?;
        self.write_body(err.message.as_bytes()).await
    }
}

#[inline]
fn serialize_fields(fields: &HeaderMap, buffer: &mut Vec<u8>) {
    fields.for_each(|name, value| {
        buffer.extend_from_slice(name.as_bytes());
        buffer.extend_from_slice(b": ");
        buffer.extend_from_slice(value.as_bytes());
        buffer.extend_from_slice(CRLF);
    });
    buffer.extend_from_slice(CRLF);
}

/// The headers of a plain, connection-closing response with a body of
/// `content_length` bytes:
///
/// ```text
/// content-length: <content_length>
/// connection: close
/// content-type: text/plain
/// ```
///
/// Adjust with [`HeaderMap::replace`] or [`HeaderMap::delete`] before
/// writing, e.g. for HTML or chunked responses.
pub fn default_headers(content_length: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.set("content-length", content_length.to_string());
    headers.set("connection", "close");
    headers.set("content-type", "text/plain");
    headers
}
