use craft_http::{default_headers, Handler, HandlerError, Request, StatusCode, Writer};
use tracing_subscriber::EnvFilter;

const PAGE_200: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

const PAGE_400: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const PAGE_500: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

struct Pages;

impl Handler for Pages {
    async fn handle(&self, w: &mut Writer<'_>, req: &Request) -> Result<(), HandlerError> {
        let (status, page) = match req.target() {
            "/yourproblem" => (StatusCode::BAD_REQUEST, PAGE_400),
            "/myproblem" => (StatusCode::INTERNAL_SERVER_ERROR, PAGE_500),
            _ => (StatusCode::OK, PAGE_200),
        };

        let mut headers = default_headers(page.len());
        headers.replace("content-type", "text/html");

        w.write_status_line(status).await?;
        w.write_headers(&headers).await?;
        w.write_body(page.as_bytes()).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let server = craft_http::serve(42069, Pages).await?;
    tracing::info!("listening on port 42069");

    tokio::signal::ctrl_c().await?;
    server.close().await;
    Ok(())
}
