//! LCD REST client.
//!
//! Implements every node port of both modules against the light client
//! daemon's REST API.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use shared_types::{Address, BlockMeta, Coin, DepositRecord, Height, ProposalId, TxRecord};
use thiserror::Error;
use tracing::{debug, trace};
use wc_01_transaction_history::{BlockInfoSource, TxHistoryError, TxSource};
use wc_02_proposal_deposits::{
    DepositError, DepositSource, SendTxRequest, SubmitType, TxReceipt, TxSender,
};

use crate::adapters::proposals::ProposalSource;
use crate::container::LcdConfig;

/// Errors that can occur when talking to the LCD.
#[derive(Debug, Error)]
pub enum LcdError {
    /// Transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node could not be reached at all.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The node answered with a non-success status.
    #[error("{path} returned {status}: {body}")]
    Status {
        /// Request path
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, as sent
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse response from {path}: {message}")]
    Parse {
        /// Request path
        path: String,
        /// Decoder message
        message: String,
    },

    /// The request cannot be served by this client.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<LcdError> for TxHistoryError {
    fn from(error: LcdError) -> Self {
        match error {
            LcdError::Parse { .. } => TxHistoryError::Decode(error.to_string()),
            other => TxHistoryError::Node(other.to_string()),
        }
    }
}

impl From<LcdError> for DepositError {
    fn from(error: LcdError) -> Self {
        match error {
            LcdError::Parse { .. } => DepositError::Decode(error.to_string()),
            other => DepositError::Node(other.to_string()),
        }
    }
}

// =============================================================================
// Paths
// =============================================================================

fn delegator_txs_path(address: &Address) -> String {
    format!("/staking/delegators/{address}/txs")
}

/// Proposals submitted, deposits made and votes cast by `address`.
fn governance_txs_paths(address: &Address) -> [String; 3] {
    [
        format!("/txs?action=submit_proposal&proposer={address}"),
        format!("/txs?action=deposit&depositor={address}"),
        format!("/txs?action=vote&voter={address}"),
    ]
}

/// Transfers sent and received by `address`.
fn wallet_txs_paths(address: &Address) -> [String; 2] {
    [
        format!("/txs?sender={address}"),
        format!("/txs?recipient={address}"),
    ]
}

fn block_path(height: Height) -> String {
    format!("/blocks/{height}")
}

fn deposits_path(proposal_id: &ProposalId) -> String {
    format!("/gov/proposals/{proposal_id}/deposits")
}

fn proposal_path(proposal_id: &ProposalId) -> String {
    format!("/gov/proposals/{proposal_id}")
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct BlockResponse {
    block_meta: BlockMeta,
}

#[derive(Serialize)]
struct BaseReq<'a> {
    name: &'a str,
    password: &'a str,
    chain_id: &'a str,
}

#[derive(Serialize)]
struct DepositBody<'a> {
    base_req: BaseReq<'a>,
    depositor: &'a str,
    amount: &'a [Coin],
}

#[derive(Debug, Default, Deserialize)]
struct TxResult {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    log: Option<String>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    #[serde(alias = "hash")]
    txhash: String,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    height: Option<Height>,
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    raw_log: Option<String>,
    #[serde(default)]
    check_tx: Option<TxResult>,
    #[serde(default)]
    deliver_tx: Option<TxResult>,
}

impl BroadcastResponse {
    /// First non-zero result code with its log.
    fn rejection(&self) -> Option<(u32, String)> {
        if let Some(code) = self.code.filter(|c| *c != 0) {
            return Some((code, self.raw_log.clone().unwrap_or_default()));
        }
        [&self.check_tx, &self.deliver_tx]
            .into_iter()
            .flatten()
            .find_map(|r| {
                r.code
                    .filter(|c| *c != 0)
                    .map(|c| (c, r.log.clone().unwrap_or_default()))
            })
    }

    fn into_receipt(self) -> Result<TxReceipt, DepositError> {
        if let Some((code, log)) = self.rejection() {
            return Err(DepositError::Rejected { code, log });
        }
        Ok(TxReceipt {
            txhash: self.txhash,
            height: self.height,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// LCD REST client.
pub struct LcdClient {
    client: Client,
    base_url: String,
    chain_id: String,
}

impl LcdClient {
    /// Create a client for `config`.
    pub fn new(config: &LcdConfig) -> Result<Self, LcdError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(LcdError::Http)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            chain_id: config.chain_id.clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, error: reqwest::Error) -> LcdError {
        if error.is_connect() {
            LcdError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            LcdError::Http(error)
        }
    }

    /// GET `path`. A 404 is `None`.
    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, LcdError> {
        trace!(path, "LCD GET");
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(path, response).await.map(Some)
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, LcdError> {
        trace!(path, "LCD POST");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        decode(path, response).await
    }

    /// GET a transaction list; the LCD answers `null` for no results.
    async fn get_txs(&self, path: &str) -> Result<Vec<TxRecord>, LcdError> {
        let txs: Option<Option<Vec<TxRecord>>> = self.get(path).await?;
        Ok(txs.flatten().unwrap_or_default())
    }

    /// Run several transaction queries concurrently and concatenate the
    /// results in query order.
    async fn get_txs_all(&self, paths: &[String]) -> Result<Vec<TxRecord>, LcdError> {
        let lists = try_join_all(paths.iter().map(|p| self.get_txs(p))).await?;
        Ok(lists.into_iter().flatten().collect())
    }

    /// Whether the node answers at all.
    pub async fn is_reachable(&self) -> bool {
        self.get::<serde_json::Value>("/node_info").await.is_ok()
    }
}

async fn decode<R: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<R, LcdError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(LcdError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| LcdError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl TxSource for LcdClient {
    async fn get_delegator_txs(&self, address: &Address) -> Result<Vec<TxRecord>, TxHistoryError> {
        Ok(self.get_txs(&delegator_txs_path(address)).await?)
    }

    async fn get_governance_txs(
        &self,
        address: &Address,
    ) -> Result<Vec<TxRecord>, TxHistoryError> {
        Ok(self.get_txs_all(&governance_txs_paths(address)).await?)
    }

    async fn txs(&self, address: &Address) -> Result<Vec<TxRecord>, TxHistoryError> {
        Ok(self.get_txs_all(&wallet_txs_paths(address)).await?)
    }
}

#[async_trait]
impl BlockInfoSource for LcdClient {
    async fn block_meta(&self, height: Height) -> Result<Option<BlockMeta>, TxHistoryError> {
        let block: Option<BlockResponse> = self.get(&block_path(height)).await?;
        Ok(block.map(|b| b.block_meta))
    }
}

#[async_trait]
impl DepositSource for LcdClient {
    async fn get_proposal_deposits(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<Vec<DepositRecord>, DepositError> {
        let deposits: Option<Option<Vec<DepositRecord>>> =
            self.get(&deposits_path(proposal_id)).await?;
        Ok(deposits.flatten().unwrap_or_default())
    }
}

#[async_trait]
impl TxSender for LcdClient {
    async fn send_tx(&self, request: SendTxRequest) -> Result<TxReceipt, DepositError> {
        if request.submit_type == SubmitType::Ledger {
            return Err(LcdError::Unsupported(
                "Ledger signing is not available through the LCD".to_string(),
            )
            .into());
        }

        let body = DepositBody {
            base_req: BaseReq {
                name: request.depositor.as_str(),
                password: &request.password,
                chain_id: &self.chain_id,
            },
            depositor: request.depositor.as_str(),
            amount: &request.amount,
        };
        let path = deposits_path(&request.proposal_id);
        debug!(path = %path, "Broadcasting deposit");

        let response: BroadcastResponse = self.post(&path, &body).await?;
        response.into_receipt()
    }
}

#[async_trait]
impl ProposalSource for LcdClient {
    async fn get_proposal(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<Option<serde_json::Value>, DepositError> {
        Ok(self.get(&proposal_path(proposal_id)).await?)
    }
}
