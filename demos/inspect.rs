//! Prints every request sent to port 42069 without answering it.
//!
//! `curl -X POST localhost:42069/coffee -d '{"flavor":"dark mode"}'`

use craft_http::{limits::ReqLimits, request_from_reader};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:42069").await?;
    let limits = ReqLimits::default();

    loop {
        let (mut stream, peer) = listener.accept().await?;
        println!("connection from {peer}");

        match request_from_reader(&mut stream, &limits).await {
            Ok(req) => {
                println!("Request line:");
                println!("- Method: {}", req.request_line.method);
                println!("- Target: {}", req.request_line.target);
                println!("- Version: {}", req.request_line.version);
                println!("Headers:");
                req.headers.for_each(|name, value| println!("- {name}: {value}"));
                println!("Body:");
                println!("{}", String::from_utf8_lossy(&req.body));
            }
            Err(err) => println!("error: {err}"),
        }
    }
}
