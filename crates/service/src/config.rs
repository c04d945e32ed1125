use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// address for the API server to listen on.
    ///  if not set then 0.0.0.0:5000 will be used
    pub api_listen_addr: Option<SocketAddr>,

    // provider configuration
    /// permit the shape-only fallback provider when the real KEM
    ///  primitive is not compiled in. the fallback provides no
    ///  cryptographic security and is never selected silently
    pub allow_insecure_fallback: bool,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_listen_addr: Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 5000)),
            allow_insecure_fallback: false,
            log_level: tracing::Level::INFO,
        }
    }
}
