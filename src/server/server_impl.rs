use crate::{
    errors::HandlerError,
    http::{request::Request, response::Writer},
    limits::{ReqLimits, ServerLimits},
    server::connection,
};
use socket2::{Domain, Protocol, Socket, Type};
use std::{
    future::Future,
    io,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tokio::{
    net::TcpListener,
    sync::Notify,
    task::JoinHandle,
};

/// Application code that answers a request.
///
/// Called once per connection, after the request has been read completely.
/// The handler owns the response: whatever it writes through `w` is what the
/// client gets, and the connection is closed when the returned future
/// completes. Writing nothing produces an empty response.
///
/// Returning `Err` before anything was written makes the server send the
/// error as a `text/plain` response with its status code. Once the handler
/// has written anything the error can only be logged.
///
/// # Examples
/// ```
/// use craft_http::{default_headers, Handler, HandlerError, Request, StatusCode, Writer};
///
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn handle(&self, w: &mut Writer<'_>, req: &Request) -> Result<(), HandlerError> {
///         if req.target() == "/teapot" {
///             return Err(HandlerError::new(StatusCode::from(418), "short and stout\n"));
///         }
///
///         let body = b"Hello World!\n";
///         w.write_status_line(StatusCode::OK).await?;
///         w.write_headers(&default_headers(body.len())).await?;
///         w.write_body(body).await?;
///         Ok(())
///     }
/// }
/// ```
pub trait Handler
where
    Self: Sync + Send + 'static,
{
    fn handle(
        &self,
        w: &mut Writer<'_>,
        request: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// A running HTTP/1.1 server.
///
/// Every accepted connection gets its own task and is served independently.
/// The handle stops the accept loop; connections already accepted are left
/// to finish on their own.
///
/// # Examples
///
/// ```no_run
/// # craft_http::impt_default_handler!{MyHandler}
/// #[tokio::main]
/// async fn main() -> std::io::Result<()> {
///     let server = craft_http::serve(42069, MyHandler).await?;
///
///     tokio::signal::ctrl_c().await?;
///     server.close().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Server {
    local_addr: Option<SocketAddr>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Creates a new builder for configuring the server instance.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # craft_http::impt_default_handler!{ MyStruct }
    /// # #[tokio::main]
    /// # async fn main() {
    /// use tokio::net::TcpListener;
    /// use craft_http::Server;
    ///
    /// let server = Server::builder()
    ///     .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
    ///     .handler(MyStruct) // structure with Handler implementation
    ///     .build();
    /// # }
    /// ```
    #[inline]
    pub fn builder<H: Handler>() -> ServerBuilder<H> {
        ServerBuilder {
            listener: None,
            handler: None,

            server_limits: None,
            request_limits: None,
        }
    }

    /// The address the listener is bound to, if the OS reported one.
    #[inline]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting and releases the listening socket.
    ///
    /// Returns once the accept loop has exited, so the port can be bound
    /// again right away. In-flight connections keep running.
    pub async fn close(self) {
        self.closed.store(true, Ordering::Release);
        // Leaves a permit if the loop is not waiting right now.
        self.shutdown.notify_one();

        if let Err(err) = self.accept_task.await {
            tracing::warn!(error = %err, "accept loop ended abnormally");
        }
    }

    async fn accept_loop<H: Handler>(listener: TcpListener, parts: LoopParts<H>) {
        let LoopParts {
            handler,
            req_limits,
            server_limits,
            closed,
            shutdown,
        } = parts;

        tracing::info!(addr = ?listener.local_addr().ok(), "accepting connections");

        loop {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.notified() => break,
                accepted = listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(connection::handle_connection(
                        stream,
                        peer,
                        handler.clone(),
                        req_limits.clone(),
                    ));
                }
                Err(_) if closed.load(Ordering::Acquire) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "accept failed");
                    server_limits.accept_error_wait.wait().await;
                }
            }
        }

        tracing::info!(addr = ?listener.local_addr().ok(), "server closed");
    }
}

struct LoopParts<H> {
    handler: Arc<H>,
    req_limits: Arc<ReqLimits>,
    server_limits: ServerLimits,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

//

/// Builder for configuring and creating [`Server`] instances.
pub struct ServerBuilder<H: Handler> {
    listener: Option<TcpListener>,
    handler: Option<Arc<H>>,

    server_limits: Option<ServerLimits>,
    request_limits: Option<ReqLimits>,
}

impl<H: Handler> ServerBuilder<H> {
    /// Sets the TCP listener that the server will use to accept connections.
    ///
    /// **This is a required component.** See [`bind`] for a listener that
    /// can be rebound immediately after a restart.
    #[inline(always)]
    pub fn listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Sets the request handler that will process incoming requests.
    ///
    /// **This is a required component.**
    #[inline(always)]
    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Configures accept loop behaviour.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # craft_http::impt_default_handler!{ MyStruct }
    /// # #[tokio::main]
    /// # async fn main() {
    /// use craft_http::{Server, limits::{ServerLimits, WaitStrategy}};
    /// use tokio::net::TcpListener;
    ///
    /// let server = Server::builder()
    ///     .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
    ///     .handler(MyStruct)
    ///     .server_limits(ServerLimits {
    ///         accept_error_wait: WaitStrategy::Yield,
    ///         ..ServerLimits::default() // Required line
    ///     })
    ///     .build();
    /// # }
    /// ```
    #[inline(always)]
    pub fn server_limits(mut self, limits: ServerLimits) -> Self {
        self.server_limits = Some(limits);
        self
    }

    /// Configures request parsing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # craft_http::impt_default_handler!{ MyStruct }
    /// # #[tokio::main]
    /// # async fn main() {
    /// use craft_http::{Server, limits::ReqLimits};
    /// use tokio::net::TcpListener;
    ///
    /// let server = Server::builder()
    ///     .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
    ///     .handler(MyStruct)
    ///     .request_limits(ReqLimits {
    ///         initial_buffer_size: 512,
    ///         ..ReqLimits::default() // Required line
    ///     })
    ///     .build();
    /// # }
    /// ```
    #[inline(always)]
    pub fn request_limits(mut self, limits: ReqLimits) -> Self {
        self.request_limits = Some(limits);
        self
    }

    /// Spawns the accept loop and returns its handle.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Panics
    ///
    /// Error messages:
    /// - ``The `listener` method must be called to create``
    /// - ``The `handler` method must be called to create``
    ///
    /// Panics when:
    /// - The `listener` method was not called.
    /// - The `handler` method was not called.
    #[inline]
    #[track_caller]
    pub fn build(self) -> Server {
        let listener = self
            .listener
            .expect("The `listener` method must be called to create");
        let handler = self
            .handler
            .expect("The `handler` method must be called to create");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let local_addr = listener.local_addr().ok();

        let parts = LoopParts {
            handler,
            req_limits: Arc::new(self.request_limits.unwrap_or_default()),
            server_limits: self.server_limits.unwrap_or_default(),
            closed: closed.clone(),
            shutdown: shutdown.clone(),
        };

        Server {
            local_addr,
            closed,
            shutdown,
            accept_task: tokio::spawn(Server::accept_loop(listener, parts)),
        }
    }
}

/// Binds `port` on all interfaces and starts serving with default limits.
///
/// # Examples
/// ```no_run
/// # craft_http::impt_default_handler!{MyHandler}
/// # #[tokio::main]
/// # async fn main() -> std::io::Result<()> {
/// let server = craft_http::serve(42069, MyHandler).await?;
/// // ...
/// server.close().await;
/// # Ok(())
/// # }
/// ```
pub async fn serve<H: Handler>(port: u16, handler: H) -> io::Result<Server> {
    let listener = bind(port)?;
    Ok(Server::builder().listener(listener).handler(handler).build())
}

/// A listener on `0.0.0.0:<port>` with `SO_REUSEADDR` set, so a restarted
/// server does not fail on sockets still in `TIME_WAIT`.
///
/// Must be called from within a Tokio runtime.
pub fn bind(port: u16) -> io::Result<TcpListener> {
    bind_addr(SocketAddr::from(([0, 0, 0, 0], port)))
}

pub(crate) fn bind_addr(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    TcpListener::from_std(socket.into())
}
