//! Serve command - run the HTTP API

use anyhow::Result;
use spa_config::Config;
use spa_server::ArchiveServer;
use tracing::info;

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let service = super::build_service(config)?;
    info!(
        "Serving archive {}/{} (epoch {})",
        config.archive.owner, config.archive.repo, config.archive.epoch
    );

    ArchiveServer::serve(service, &host, port).await
}
