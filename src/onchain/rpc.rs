//! Minimal Solana JSON-RPC client.
//!
//! Implements the one call the notifier needs: `getProgramAccounts` with
//! server-side memcmp/dataSize filters and base64-encoded account data.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::onchain::Pubkey;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("RPC node error {code}: {message}")]
    Node { code: i64, message: String },
    #[error("malformed RPC response: {0}")]
    Malformed(String),
    #[error("account data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A server-side account filter, mirroring the RPC `filters` parameter.
#[derive(Debug, Clone)]
pub enum AccountFilter {
    /// Exact account size in bytes.
    DataSize(u64),
    /// Byte equality at `offset` against base58-encoded `bytes`.
    Memcmp { offset: usize, bytes: String },
}

impl AccountFilter {
    /// Match accounts whose bytes at `offset` equal the given pubkey.
    pub fn pubkey_at(offset: usize, pubkey: &Pubkey) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: pubkey.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            AccountFilter::DataSize(size) => json!({ "dataSize": size }),
            AccountFilter::Memcmp { offset, bytes } => {
                json!({ "memcmp": { "offset": offset, "bytes": bytes } })
            }
        }
    }
}

/// A program-owned account row returned by `getProgramAccounts`.
#[derive(Debug, Clone)]
pub struct KeyedAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Vec<RawKeyedAccount>>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RawKeyedAccount {
    pubkey: String,
    account: RawAccount,
}

#[derive(Deserialize)]
struct RawAccount {
    /// `[data, encoding]` pair, as returned for base64 encoding.
    data: (String, String),
}

pub struct RpcClient {
    url: String,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch all accounts owned by `program_id` that match `filters`.
    pub async fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, RpcError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getProgramAccounts",
            "params": [
                program_id.to_string(),
                {
                    "encoding": "base64",
                    "filters": filters.iter().map(AccountFilter::to_json).collect::<Vec<_>>(),
                }
            ],
        });

        let resp = self.http.post(&self.url).json(&request).send().await?;
        let envelope: RpcEnvelope = resp.error_for_status()?.json().await?;

        if let Some(error) = envelope.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }
        let rows = envelope
            .result
            .ok_or_else(|| RpcError::Malformed("missing result".to_string()))?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            let pubkey = row
                .pubkey
                .parse()
                .map_err(|e| RpcError::Malformed(format!("bad pubkey {}: {e}", row.pubkey)))?;
            let data = BASE64.decode(row.account.data.0.as_bytes())?;
            accounts.push(KeyedAccount { pubkey, data });
        }

        debug!(program = %program_id, accounts = accounts.len(), "getProgramAccounts");
        Ok(accounts)
    }
}
