// Startup helpers

pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

/// One socket serves every activity: wildcard-bound for receive, with
/// broadcast enabled for HELLO transmission.
pub async fn init_socket(port: u16) -> crate::error::Result<std::sync::Arc<tokio::net::UdpSocket>> {
    let socket =
        std::sync::Arc::new(tokio::net::UdpSocket::bind(format!("0.0.0.0:{}", port)).await?);
    socket.set_broadcast(true)?;
    Ok(socket)
}
