use craft_http::{
    bind, default_headers, limits::{EofPolicy, ReqLimits}, Handler, HandlerError, Request,
    Server, StatusCode, Writer,
};
use tracing_subscriber::EnvFilter;

struct Echo;

impl Handler for Echo {
    async fn handle(&self, w: &mut Writer<'_>, req: &Request) -> Result<(), HandlerError> {
        let mut headers = default_headers(req.body.len());
        if let Some(content_type) = req.header("content-type") {
            headers.replace("content-type", content_type);
        }
        headers.set("x-echo-method", req.method());
        headers.set("x-echo-target", req.target());

        w.write_status_line(StatusCode::OK).await?;
        w.write_headers(&headers).await?;
        w.write_body(&req.body).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let server = Server::builder()
        .listener(bind(8080)?)
        .handler(Echo)
        .request_limits(ReqLimits {
            // Echo whatever arrived if the client hangs up mid-body.
            eof_policy: EofPolicy::Lenient,
            ..ReqLimits::default()
        })
        .build();
    tracing::info!("listening on port 8080");

    tokio::signal::ctrl_c().await?;
    server.close().await;
    Ok(())
}
