//! Manual webhook announcement.
//!
//! Posts a plain-text message to the configured webhook - the escape hatch
//! for announcing by hand when the notifier itself is down.
//!
//! Usage: `WEBHOOK_URL=... post <message..>`

use anyhow::bail;

use realmwatch::discord::WebhookClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let url = match std::env::var("WEBHOOK_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => bail!("WEBHOOK_URL is not set"),
    };

    let words: Vec<String> = std::env::args().skip(1).collect();
    if words.is_empty() {
        bail!("usage: post <message..>");
    }

    let client = WebhookClient::new(url);
    client.send_text(&words.join(" ")).await?;
    println!("delivered");
    Ok(())
}
