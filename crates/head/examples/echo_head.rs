//! Blocking server answering every request with the headers it received.
//!
//! ```sh
//! cargo run -p micro-head --example echo_head
//! curl -i http://127.0.0.1:8080/hello
//! ```

use std::net::{TcpListener, TcpStream};

use bytes::BytesMut;
use http::StatusCode;
use micro_head::codec::HeaderEncoder;
use micro_head::connection::StreamConnection;
use micro_head::protocol::{HeadError, HeaderBlock, HeaderLimits};
use tokio_util::codec::Encoder;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let listener = match TcpListener::bind("127.0.0.1:8080") {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = serve(stream) {
                    warn!(cause = %e, "connection closed with error");
                }
            }
            Err(e) => warn!(cause = %e, "failed to accept"),
        }
    }
}

fn serve(stream: TcpStream) -> Result<(), HeadError> {
    let mut connection = StreamConnection::new(stream);

    let mut request = HeaderBlock::with_limits(HeaderLimits::new(32));
    if !request.read_header(&mut connection)? {
        info!("peer closed the connection");
        return Ok(());
    }
    info!(method = ?request.method(), path = ?request.request_path(), headers = request.len(), "request received");

    let mut body = BytesMut::new();
    HeaderEncoder.encode(&request, &mut body)?;

    let mut response = HeaderBlock::new();
    response.set_response_first_line("1.1", StatusCode::OK);
    response.set_content_type("text/plain; charset=utf-8");
    response.set_header_value("Content-Length", body.len().to_string());
    response.set_header_value("Connection", "close");
    response.write_to(&mut connection)?;

    if let Some(stream) = connection.get_mut() {
        std::io::Write::write_all(stream, &body)?;
    }
    Ok(())
}
