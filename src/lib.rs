//! craft_http - a small HTTP/1.1 server stack built from the ground up
//!
//! Parses requests straight off a TCP stream with an incremental state
//! machine, hands them to your [`Handler`] together with a [`Writer`], and
//! closes the connection once the handler is done. One request per
//! connection, one task per connection.
//!
//! # Protocol Support
//!
//! - **HTTP/1.1** only: `HTTP/1.1` in the request line, nothing else
//! - **Request bodies** framed by `Content-Length`
//! - **Responses** with a fixed length or `Transfer-Encoding: chunked`,
//!   including trailers
//!
//! No keep-alive, no pipelining, no TLS.
//!
//! # Pieces
//!
//! - [`HeaderMap`] - case-insensitive header storage and the header-block parser
//! - [`Request`] - the parser state machine; [`request_from_reader`] drives
//!   it from any [`AsyncRead`](tokio::io::AsyncRead)
//! - [`Writer`] - response serialization onto any
//!   [`AsyncWrite`](tokio::io::AsyncWrite)
//! - [`Server`] - accept loop with a [`close`](Server::close) handle
//!
//! # Examples
//!
//! Quick start:
//! ```no_run
//! use craft_http::{default_headers, Handler, HandlerError, Request, StatusCode, Writer};
//!
//! struct MyHandler;
//!
//! impl Handler for MyHandler {
//!     async fn handle(&self, w: &mut Writer<'_>, _: &Request) -> Result<(), HandlerError> {
//!         let body = b"Hello World!";
//!         w.write_status_line(StatusCode::OK).await?;
//!         w.write_headers(&default_headers(body.len())).await?;
//!         w.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = craft_http::serve(42069, MyHandler).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await;
//!     Ok(())
//! }
//! ```
//! Streaming with chunked encoding:
//! ```no_run
//! use craft_http::{default_headers, Handler, HandlerError, HeaderMap, Request, StatusCode, Writer};
//!
//! struct Numbers;
//!
//! impl Handler for Numbers {
//!     async fn handle(&self, w: &mut Writer<'_>, _: &Request) -> Result<(), HandlerError> {
//!         let mut headers = default_headers(0);
//!         headers.delete("content-length");
//!         headers.set("transfer-encoding", "chunked");
//!         headers.set("trailer", "x-count");
//!
//!         w.write_status_line(StatusCode::OK).await?;
//!         w.write_headers(&headers).await?;
//!
//!         for i in 0..10 {
//!             w.write_chunked_body(format!("{i}\n").as_bytes()).await?;
//!         }
//!
//!         let mut trailers = HeaderMap::new();
//!         trailers.set("x-count", "10");
//!         w.write_chunked_body_done(true).await?;
//!         w.write_trailers(&trailers).await?;
//!         Ok(())
//!     }
//! }
//! ```
//! Advanced configuration:
//! ```no_run
//! # craft_http::impt_default_handler!{MyHandler}
//! use craft_http::{bind, Server, limits::{EofPolicy, ReqLimits}};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::builder()
//!         .listener(bind(8080)?)
//!         .handler(MyHandler)
//!         .request_limits(ReqLimits {
//!             eof_policy: EofPolicy::Lenient,
//!             ..ReqLimits::default()
//!         })
//!         .build();
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await;
//!     Ok(())
//! }
//! ```

pub(crate) mod http {
    pub(crate) mod headers;
    pub(crate) mod request;
    pub(crate) mod response;
    pub(crate) mod types;
}
pub(crate) mod server {
    pub(crate) mod connection;
    pub(crate) mod server_impl;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::{ErrorKind, HandlerError, IoError},
    http::{
        headers::HeaderMap,
        request::{request_from_reader, ParseState, Request, RequestLine},
        response::{default_headers, Writer},
        types::StatusCode,
    },
    server::server_impl::{bind, serve, Handler, Server, ServerBuilder},
};

#[doc(hidden)]
#[macro_export]
macro_rules! impt_default_handler {
    ($name:ident) => {
        use craft_http::{default_headers, Handler, HandlerError, Request, StatusCode, Writer};
        struct $name;

        impl Handler for $name {
            async fn handle(&self, w: &mut Writer<'_>, _: &Request) -> Result<(), HandlerError> {
                let body = b"Hello world!";
                w.write_status_line(StatusCode::OK).await?;
                w.write_headers(&default_headers(body.len())).await?;
                w.write_body(body).await?;
                Ok(())
            }
        }
    };
}
