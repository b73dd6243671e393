use crate::repository::blocklist::BlocklistService;
use crate::repository::cache::CacheService;
use donos_server::UdpServer;
use std::net::IpAddr;
use std::sync::Arc;

pub(crate) mod error;
pub(crate) mod handler;

/// Bootstraps and runs the DNS server: seeds the blocklist and answer
/// caches from the configured hosts file, binds the upstream resolver, and
/// serves until shutdown.
pub async fn run(config: crate::config::Config) {
    tracing::info!("preparing dns server");

    let hosts = donos_blocklist_loader::HostsFile::load(&config.filename)
        .expect("unable to load hosts file");

    let blocklist_service = crate::repository::blocklist::Config {
        size: config.cache_size,
    }
    .build();
    for domain in hosts.blocked {
        blocklist_service.block(&domain).await;
    }

    let cache_service = crate::repository::cache::Config {
        size: config.cache_size,
    }
    .build();
    for (domain, addr) in hosts.overrides {
        cache_service.insert(&domain, addr).await;
    }

    let resolver = donos_resolver::RemoteResolver::bind(
        ([0, 0, 0, 0], 0).into(),
        IpAddr::V4(config.dns_server_ipaddr),
    )
    .await
    .expect("unable to bind upstream resolver socket");

    let handler = handler::DnsHandler::new(
        Arc::new(blocklist_service),
        Arc::new(cache_service),
        Arc::new(resolver),
    );

    let address = config.address();
    UdpServer::new(address, handler)
        .run()
        .await
        .expect("unable to run udp server")
}
