use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use tracing::{error, info};

use realmwatch::config::Config;
use realmwatch::discord::WebhookClient;
use realmwatch::notifier::{self, classify};
use realmwatch::onchain::rpc::RpcClient;
use realmwatch::registry::RealmRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = if Path::new("realmwatch.toml").exists() {
        Config::load(Path::new("realmwatch.toml"))?
    } else {
        Config::from_env()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("realmwatch v{} starting", env!("CARGO_PKG_VERSION"));

    if config.webhook.url.is_empty() {
        bail!("no webhook configured - set WEBHOOK_URL or [webhook] url");
    }
    if config.realm.identifier.is_empty() {
        bail!("no realm configured - set REALM or [realm] identifier");
    }

    let registry = RealmRegistry::certified();
    let Some(realm) = registry.lookup(&config.realm.identifier).cloned() else {
        bail!(
            "realm {:?} is not in the certified registry",
            config.realm.identifier
        );
    };

    info!(
        realm = %realm.symbol,
        cluster = %config.rpc.cluster_url,
        "monitoring realm"
    );

    let rpc = Arc::new(RpcClient::new(config.rpc.cluster_url.clone()));
    let webhook = Arc::new(WebhookClient::new(config.webhook.url.clone()));
    let realm = Arc::new(realm);
    let identifier = Arc::new(config.realm.identifier.clone());

    // First pass fires immediately, then one per tick. Passes are spawned
    // rather than awaited in the loop, so a pass slower than the period may
    // overlap the next one.
    let mut interval = tokio::time::interval(Duration::from_secs(classify::TICK_SECONDS as u64));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let rpc = rpc.clone();
                let webhook = webhook.clone();
                let realm = realm.clone();
                let identifier = identifier.clone();
                tokio::spawn(async move {
                    if let Err(error) = notifier::run_pass(&rpc, &webhook, &realm, &identifier).await {
                        error!(error = %error, "notifier pass failed");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down...");
                break;
            }
        }
    }

    Ok(())
}
