use std::io;

use payamak::GatewayClient;
use tracing_subscriber::EnvFilter;

pub fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

/// Install a `RUST_LOG`-driven subscriber and build a client from
/// `PAYAMAK_USERNAME`, `PAYAMAK_PASSWORD` and `PAYAMAK_SENDER`.
pub fn client_from_env() -> Result<GatewayClient, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = GatewayClient::new(
        required_env("PAYAMAK_USERNAME")?,
        required_env("PAYAMAK_PASSWORD")?,
        required_env("PAYAMAK_SENDER")?,
    )?;
    Ok(client)
}
