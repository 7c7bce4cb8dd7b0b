use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use tokio_health::config::Config;
use tokio_health::server::Server;
use tokio_health::{build_info, logging, Health, LogObserver, PingCheck, TcpPinger, UrlCheck};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    logging::init(&config.logging);

    info!(
        "Starting tokio_health {} ({})",
        tokio_health::PKG_VERSION,
        tokio_health::BUILD_VERSION
    );
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let health = Arc::new(Health::new(config.health.clone()).with_observer(LogObserver));

    for url in &config.checks.urls {
        health.add_check(UrlCheck::get(url.as_str()));
    }
    for addr in &config.checks.tcp {
        health.add_check(PingCheck::new(TcpPinger::new(addr.as_str())).named(addr.as_str()));
    }

    if config.server.info_enabled {
        let fields = serde_json::json!({ "service": config.logging.service_name });
        health.enable_info(&build_info!(), &fields)?;
    }

    info!("Registered {} readiness checks", health.check_count());

    let listener = TcpListener::bind(config.server.listen_addr).await?;
    let server = Server::new(health);

    tokio::select! {
        result = server.run(listener) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    server.trigger_shutdown();
    server.wait_for_drain(config.server.drain_timeout).await;

    Ok(())
}
