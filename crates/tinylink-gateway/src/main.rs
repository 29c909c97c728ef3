use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tinylink_cache::moka::DEFAULT_CAPACITY;
use tinylink_cache::{MokaLinkCache, RedisLinkCache};
use tinylink_core::RandomCodeGenerator;
use tinylink_gateway::cli::{CacheBackendArg, Cli, StorageBackendArg};
use tinylink_gateway::{App, AppState};
use tinylink_service::{LinkService, Shortener, TokenService};
use tinylink_storage::{InMemoryRepository, MySqlRepository};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

async fn build_shortener(cli: &Cli) -> Result<Arc<dyn Shortener>, Box<dyn std::error::Error>> {
    let ttl = Duration::from_secs(cli.cache_ttl_secs);
    let generator = RandomCodeGenerator;
    let base_url = cli.base_url.trim_end_matches('/').to_owned();

    let shortener: Arc<dyn Shortener> = match (cli.storage, cli.cache) {
        (StorageBackendArg::InMemory, CacheBackendArg::Moka) => Arc::new(LinkService::new(
            InMemoryRepository::new(),
            MokaLinkCache::with_ttl(DEFAULT_CAPACITY, ttl),
            generator,
            base_url,
        )),
        (StorageBackendArg::InMemory, CacheBackendArg::Redis) => Arc::new(LinkService::new(
            InMemoryRepository::new(),
            redis_cache(cli, ttl).await?,
            generator,
            base_url,
        )),
        (StorageBackendArg::Mysql, CacheBackendArg::Moka) => Arc::new(LinkService::new(
            mysql_repository(cli).await?,
            MokaLinkCache::with_ttl(DEFAULT_CAPACITY, ttl),
            generator,
            base_url,
        )),
        (StorageBackendArg::Mysql, CacheBackendArg::Redis) => Arc::new(LinkService::new(
            mysql_repository(cli).await?,
            redis_cache(cli, ttl).await?,
            generator,
            base_url,
        )),
    };
    Ok(shortener)
}

async fn mysql_repository(cli: &Cli) -> Result<MySqlRepository, Box<dyn std::error::Error>> {
    let dsn = cli
        .mysql_dsn
        .as_deref()
        .ok_or("mysql storage selected but no DSN configured")?;
    Ok(MySqlRepository::connect(dsn).await?)
}

async fn redis_cache(cli: &Cli, ttl: Duration) -> Result<RedisLinkCache, Box<dyn std::error::Error>> {
    let url = cli
        .redis_url
        .as_deref()
        .ok_or("redis cache selected but no URL configured")?;
    let client = redis::Client::open(url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok(RedisLinkCache::with_ttl(conn, ttl))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tinylink=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(storage = %cli.storage, cache = %cli.cache, "starting gateway");

    let shortener = build_shortener(&cli).await?;
    let tokens = Arc::new(TokenService::new(&cli.jwt_secret));
    let state = AppState::new(shortener, tokens, cli.base_url.trim_end_matches('/'));

    let listener = tokio::net::TcpListener::bind(cli.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");
    axum::serve(listener, App::router(state)).await?;

    Ok(())
}
