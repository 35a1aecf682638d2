//! Server configuration
//!
//! The stack has no request size limits and no timeouts: the read buffer
//! grows as needed and connections live until the handler returns. What
//! can be tuned is how the parser starts out and how it reacts to a peer
//! that closes early, plus how the accept loop backs off after a failure.
//!
//! # Examples
//!
//! ```no_run
//! # craft_http::impt_default_handler!{MyHandler}
//! use craft_http::{Server, limits::{EofPolicy, ReqLimits, ServerLimits, WaitStrategy}};
//! use tokio::net::TcpListener;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder()
//!         .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
//!         .handler(MyHandler)
//!         .request_limits(ReqLimits {
//!             initial_buffer_size: 8 * 1024,
//!             eof_policy: EofPolicy::Lenient,
//!             ..ReqLimits::default()
//!         })
//!         .server_limits(ServerLimits {
//!             accept_error_wait: WaitStrategy::Sleep(Duration::from_millis(50)),
//!             ..ServerLimits::default()
//!         })
//!         .build();
//!
//!     tokio::signal::ctrl_c().await.unwrap();
//!     server.close().await;
//! }
//! ```

use std::time::Duration;

/// Request parsing settings, applied per connection.
///
/// # Memory allocation strategy
///
/// Each connection starts with a read buffer of `initial_buffer_size` bytes.
/// When a read fills it before the parser can consume anything, the buffer
/// doubles. There is no upper bound: a client that sends a request line
/// or a header block without ever terminating it makes the buffer grow for
/// as long as it keeps sending.
#[derive(Debug, Clone)]
pub struct ReqLimits {
    /// Capacity of the read buffer when a connection starts (default: `2048`).
    ///
    /// Values below `1` are treated as `1`.
    pub initial_buffer_size: usize,

    /// What a premature end of stream means (default: [`EofPolicy::Strict`]).
    pub eof_policy: EofPolicy,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ReqLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            initial_buffer_size: 2048,
            eof_policy: EofPolicy::Strict,

            _priv: (),
        }
    }
}

/// Handling of a transport that reaches end of stream before the request
/// is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Any end of stream before the request is done is
    /// [`UnexpectedEof`](crate::ErrorKind::UnexpectedEof).
    #[default]
    Strict,

    /// Once the header block is complete, end of stream finishes the request
    /// with the body received so far. Before that it is still
    /// [`UnexpectedEof`](crate::ErrorKind::UnexpectedEof).
    ///
    /// Useful for clients that announce a `Content-Length` and then close
    /// their side early.
    Lenient,
}

/// Accept loop settings.
#[derive(Debug, Clone)]
pub struct ServerLimits {
    /// Pause after a failed `accept()` (default: `Sleep(10ms)`)
    ///
    /// Failures such as running out of file descriptors tend to repeat
    /// immediately. The loop logs the error, waits, and accepts again.
    pub accept_error_wait: WaitStrategy,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            accept_error_wait: WaitStrategy::Sleep(Duration::from_millis(10)),

            _priv: (),
        }
    }
}

/// How the accept loop waits before retrying after an error.
#[derive(Debug, Clone)]
pub enum WaitStrategy {
    /// Uses [`tokio::task::yield_now()`]
    ///
    /// # Note
    /// Retries almost immediately. With a persistent error the loop keeps a
    /// core busy logging, so prefer `Sleep` outside of tests.
    Yield,

    /// Uses [`tokio::time::sleep()`]
    Sleep(Duration),
}

impl WaitStrategy {
    #[inline]
    pub(crate) async fn wait(&self) {
        match self {
            WaitStrategy::Yield => tokio::task::yield_now().await,
            WaitStrategy::Sleep(time) => tokio::time::sleep(*time).await,
        }
    }
}
