//! Discord webhook delivery and embed rendering.
//!
//! Rendering is a pure mapping from a notification event to an embed so the
//! output can be asserted in tests; the webhook client does the I/O and
//! accepts either plain text or embeds.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::fmt;
use crate::governance::Proposal;
use crate::notifier::outcome;
use crate::onchain::Pubkey;

const REALMS_BASE_URL: &str = "https://v2.realms.today";
const REALMS_LOGO: &str =
    "https://raw.githubusercontent.com/solana-labs/governance-ui/main/public/img/logo-realms.png";

const COLOR_OPENED: u32 = 0x0099ff;
const COLOR_ENDING: u32 = 0xf8d91c;
const COLOR_SUCCESS: u32 = 0x00cc66;
const COLOR_DEFEATED: u32 = 0xcc3300;

/// Zero-width space, Discord's blank-field placeholder.
const BLANK: &str = "\u{200B}";

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook rejected message: {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// One rich embed, in the shape Discord's webhook API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub thumbnail: EmbedThumbnail,
    /// RFC 3339, rendered by Discord as the embed footer time.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WebhookPayload<'a> {
    Content { content: &'a str },
    Embeds { embeds: &'a [Embed] },
}

pub struct WebhookClient {
    url: String,
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    /// Deliver a plain-text message (the manual/debug path).
    pub async fn send_text(&self, content: &str) -> Result<(), WebhookError> {
        self.post(&WebhookPayload::Content { content }).await
    }

    /// Deliver rich embeds.
    pub async fn send_embeds(&self, embeds: &[Embed]) -> Result<(), WebhookError> {
        self.post(&WebhookPayload::Embeds { embeds }).await
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<(), WebhookError> {
        let resp = self.http.post(&self.url).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WebhookError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!("webhook delivered");
        Ok(())
    }
}

/// Deep link to a proposal in the realms web app. The realm identifier is
/// escaped as a path segment (symbols contain spaces and apostrophes).
pub fn proposal_url(realm_identifier: &str, proposal: &Pubkey) -> String {
    let mut url = Url::parse(REALMS_BASE_URL).expect("static base URL");
    let address = proposal.to_string();
    url.path_segments_mut()
        .expect("https URL has path segments")
        .extend(["dao", realm_identifier, "proposal", address.as_str()]);
    url.to_string()
}

fn base_embed(title: &str, description: String, proposal_url: &str, color: u32) -> Embed {
    Embed {
        title: title.to_string(),
        description,
        url: proposal_url.to_string(),
        color,
        thumbnail: EmbedThumbnail {
            url: REALMS_LOGO.to_string(),
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
        fields: Vec::new(),
    }
}

/// Embed for a proposal that just opened for voting.
pub fn proposal_created(proposal: &Proposal, proposal_url: &str) -> Embed {
    base_embed(
        "🗳  Proposal Created",
        format!(
            "**{}** proposal just opened for voting.\n\nGo vote: {}",
            proposal.name, proposal_url
        ),
        proposal_url,
        COLOR_OPENED,
    )
}

/// Embed for a proposal roughly 24 hours from its voting deadline.
pub fn proposal_ending(proposal: &Proposal, proposal_url: &str, remaining_seconds: i64) -> Embed {
    base_embed(
        "⏰  24 Hours Left",
        format!(
            "**{}** proposal will close for voting in {}.\n\nGo vote if you haven't already: {}",
            proposal.name,
            fmt::secs_to_string(remaining_seconds),
            proposal_url
        ),
        proposal_url,
        COLOR_ENDING,
    )
}

/// Embed for a closed proposal, with tallies and the resolved outcome.
pub fn proposal_ended(proposal: &Proposal, proposal_url: &str) -> Embed {
    let result = outcome::resolve(proposal);
    let color = if result.outcome.is_success() {
        COLOR_SUCCESS
    } else {
        COLOR_DEFEATED
    };

    let mut embed = base_embed(
        "⚖️  Proposal Ended",
        format!(
            "**{}** ({})\n\nStatus: **{}**",
            proposal.name,
            result.kind.label(),
            result.outcome.label()
        ),
        proposal_url,
        color,
    );
    embed.fields = vec![
        EmbedField {
            name: BLANK.to_string(),
            value: BLANK.to_string(),
            inline: false,
        },
        EmbedField {
            name: "✅ Yes Votes".to_string(),
            value: fmt::thousands(result.yes_votes),
            inline: true,
        },
        EmbedField {
            name: "❌ No Votes".to_string(),
            value: fmt::thousands(result.no_votes),
            inline: true,
        },
    ];
    embed
}
