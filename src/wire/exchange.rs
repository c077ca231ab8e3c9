/* src/wire/exchange.rs */

use super::WireError;
use super::message::{Reply, Request};
use tokio::io::BufReader;
use tokio::net::TcpStream;

pub async fn round_trip(addr: &str, request: &Request) -> Result<Reply, WireError> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    request.write_to(&mut stream).await?;

    let mut reader = BufReader::new(stream);
    Reply::read_from(&mut reader, request.reply_shape()).await
}
