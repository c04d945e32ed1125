use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// address for the HTTP server to listen on
    pub listen_addr: SocketAddr,
    /// log level used for request/response tracing
    pub log_level: tracing::Level,
}
