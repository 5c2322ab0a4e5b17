//! EVM wallet collector: native and ERC-20 balances over JSON-RPC.
//!
//! Talks directly to configured RPC endpoints with `eth_getBalance` and
//! `eth_call` (`balanceOf`, plus `symbol`/`name`/`decimals` metadata
//! reads so newly seen tokens can be auto-discovered downstream).

use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use networth_core::currencies::TokenMetadata;
use networth_core::errors::ValidationError;
use networth_core::ingestion::{RawObservation, SourceCollector, SourceKind};
use networth_core::{Error, Result};

// ERC-20 function selectors.
const SELECTOR_BALANCE_OF: &str = "0x70a08231";
const SELECTOR_DECIMALS: &str = "0x313ce567";
const SELECTOR_SYMBOL: &str = "0x95d89b41";
const SELECTOR_NAME: &str = "0x06fdde03";

/// One EVM network endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
}

fn default_native_decimals() -> u8 {
    18
}

/// One owned wallet: an account name plus its address per network.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub account_name: String,
    pub addresses: HashMap<String, String>,
}

/// TOML-backed wallet configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WalletsConfig {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
    #[serde(default)]
    pub wallets: Vec<WalletConfig>,
    /// Extra contract addresses to check, per network, on top of the
    /// mappings already registered in the database.
    #[serde(default)]
    pub contracts: HashMap<String, Vec<String>>,
}

impl WalletsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "invalid wallets config {}: {e}",
                path.display()
            )))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcError>,
}

/// Minimal JSON-RPC client for one endpoint.
struct RpcClient<'a> {
    client: &'a reqwest::Client,
    url: &'a str,
}

impl RpcClient<'_> {
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<String> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: RpcResponse = self
            .client
            .post(self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Unexpected(format!("rpc request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Unexpected(format!("rpc response invalid: {e}")))?;

        if let Some(error) = response.error {
            return Err(Error::Unexpected(format!("rpc error: {}", error.message)));
        }
        match response.result {
            Some(serde_json::Value::String(hex)) => Ok(hex),
            other => Err(Error::Unexpected(format!(
                "unexpected rpc result: {other:?}"
            ))),
        }
    }

    async fn get_native_balance(&self, address: &str) -> Result<f64> {
        let hex = self
            .call("eth_getBalance", serde_json::json!([address, "latest"]))
            .await?;
        decode_uint(&hex).ok_or_else(|| Error::Unexpected(format!("bad balance word: {hex}")))
    }

    async fn eth_call(&self, to: &str, data: String) -> Result<String> {
        self.call(
            "eth_call",
            serde_json::json!([{ "to": to, "data": data }, "latest"]),
        )
        .await
    }

    async fn get_erc20_balance(&self, contract: &str, owner: &str) -> Result<f64> {
        let hex = self
            .eth_call(contract, encode_balance_of(owner)?)
            .await?;
        decode_uint(&hex).ok_or_else(|| Error::Unexpected(format!("bad balance word: {hex}")))
    }

    async fn get_token_metadata(&self, contract: &str) -> Result<Option<TokenMetadata>> {
        let decimals_hex = self.eth_call(contract, SELECTOR_DECIMALS.to_string()).await?;
        let Some(decimals) = decode_uint(&decimals_hex) else {
            return Ok(None);
        };
        let symbol_hex = self.eth_call(contract, SELECTOR_SYMBOL.to_string()).await?;
        let Some(symbol) = decode_abi_string(&symbol_hex) else {
            return Ok(None);
        };
        let name = self
            .eth_call(contract, SELECTOR_NAME.to_string())
            .await
            .ok()
            .and_then(|hex| decode_abi_string(&hex));

        Ok(Some(TokenMetadata {
            symbol,
            name,
            decimals: decimals as u8,
        }))
    }
}

/// Encodes `balanceOf(address)` call data.
fn encode_balance_of(owner: &str) -> Result<String> {
    let stripped = owner.trim_start_matches("0x");
    if stripped.len() != 40 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "invalid address '{owner}'"
        ))));
    }
    Ok(format!(
        "{SELECTOR_BALANCE_OF}{:0>64}",
        stripped.to_lowercase()
    ))
}

/// Decodes a 256-bit unsigned word into an f64.
///
/// Balances above 2^53 lose precision; that is the pipeline's numeric
/// model for quantities anyway.
fn decode_uint(hex: &str) -> Option<f64> {
    let stripped = hex.trim_start_matches("0x");
    if stripped.is_empty() {
        return None;
    }
    let mut value = 0.0f64;
    for c in stripped.chars() {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    Some(value)
}

/// Decodes an ABI-encoded string return value.
///
/// Handles the dynamic `string` encoding (offset, length, data) and the
/// legacy `bytes32` symbol some old tokens return.
fn decode_abi_string(hex: &str) -> Option<String> {
    let stripped = hex.trim_start_matches("0x");
    let bytes = hex::decode(stripped).ok()?;

    let text = if bytes.len() == 32 {
        // bytes32: null-padded fixed word.
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        String::from_utf8(bytes[..end].to_vec()).ok()?
    } else if bytes.len() >= 64 {
        let length = u64::from_be_bytes(bytes[56..64].try_into().ok()?) as usize;
        let data = bytes.get(64..64 + length)?;
        String::from_utf8(data.to_vec()).ok()?
    } else {
        return None;
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Divides a raw integer amount by 10^decimals.
fn scale_quantity(raw: f64, decimals: u8) -> f64 {
    raw / 10f64.powi(decimals as i32)
}

/// Collector for all configured wallets across all configured networks.
pub struct EvmWalletCollector {
    client: reqwest::Client,
    config: WalletsConfig,
    /// Account display name -> account id, resolved by the caller.
    account_ids: HashMap<String, String>,
    /// Known contract addresses per network (database mappings plus
    /// config extras), stored lowercase.
    known_contracts: HashMap<String, Vec<String>>,
}

impl EvmWalletCollector {
    pub fn new(
        config: WalletsConfig,
        account_ids: HashMap<String, String>,
        mut known_contracts: HashMap<String, Vec<String>>,
    ) -> Self {
        for (network, extras) in &config.contracts {
            let entry = known_contracts.entry(network.clone()).or_default();
            for address in extras {
                let address = address.to_lowercase();
                if !entry.contains(&address) {
                    entry.push(address);
                }
            }
        }
        Self {
            client: reqwest::Client::new(),
            config,
            account_ids,
            known_contracts,
        }
    }

    async fn collect_wallet_network(
        &self,
        account_id: &str,
        network: &str,
        network_config: &NetworkConfig,
        address: &str,
    ) -> Result<Vec<RawObservation>> {
        let rpc = RpcClient {
            client: &self.client,
            url: &network_config.rpc_url,
        };
        let mut observations = Vec::new();

        let native_raw = rpc.get_native_balance(address).await?;
        if native_raw > 0.0 {
            observations.push(RawObservation::Wallet {
                account_id: account_id.to_string(),
                network: network.to_string(),
                contract_address: None,
                metadata: None,
                quantity: scale_quantity(native_raw, network_config.native_decimals),
            });
        }

        for contract in self.known_contracts.get(network).into_iter().flatten() {
            let raw = match rpc.get_erc20_balance(contract, address).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("{network}: balanceOf failed for {contract}: {e}");
                    continue;
                }
            };
            if raw <= 0.0 {
                continue;
            }
            let Some(metadata) = rpc.get_token_metadata(contract).await? else {
                warn!("{network}: no metadata for {contract}, skipping");
                continue;
            };
            observations.push(RawObservation::Wallet {
                account_id: account_id.to_string(),
                network: network.to_string(),
                contract_address: Some(contract.clone()),
                quantity: scale_quantity(raw, metadata.decimals),
                metadata: Some(metadata),
            });
        }

        Ok(observations)
    }
}

#[async_trait]
impl SourceCollector for EvmWalletCollector {
    fn kind(&self) -> SourceKind {
        SourceKind::Wallets
    }

    fn name(&self) -> &str {
        "evm-wallets"
    }

    async fn collect(&self) -> Result<Vec<RawObservation>> {
        let mut observations = Vec::new();

        for wallet in &self.config.wallets {
            let Some(account_id) = self.account_ids.get(&wallet.account_name) else {
                warn!(
                    "Account '{}' not found in database, skipping",
                    wallet.account_name
                );
                continue;
            };

            for (network, address) in &wallet.addresses {
                let Some(network_config) = self.config.networks.get(network) else {
                    warn!("{network}: no RPC endpoint configured, skipping");
                    continue;
                };
                match self
                    .collect_wallet_network(account_id, network, network_config, address)
                    .await
                {
                    Ok(mut batch) => {
                        info!(
                            "{}: fetched {} balances on {network}",
                            wallet.account_name,
                            batch.len()
                        );
                        observations.append(&mut batch);
                    }
                    Err(e) => {
                        warn!(
                            "{}: failed to fetch balances on {network}: {e}",
                            wallet.account_name
                        );
                    }
                }
            }
        }

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_balance_of_call_data() {
        let data = encode_balance_of("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap();
        assert_eq!(
            data,
            "0x70a08231000000000000000000000000ab5801a7d398351b8be11c439e05c5b3259aec9b"
        );
    }

    #[test]
    fn rejects_invalid_address() {
        assert!(encode_balance_of("not-an-address").is_err());
        assert!(encode_balance_of("0x1234").is_err());
    }

    #[test]
    fn decodes_uint_words() {
        assert_eq!(decode_uint("0x0"), Some(0.0));
        assert_eq!(decode_uint("0xde0b6b3a7640000"), Some(1e18));
        assert_eq!(
            decode_uint(
                "0x0000000000000000000000000000000000000000000000000de0b6b3a7640000"
            ),
            Some(1e18)
        );
        assert_eq!(decode_uint("0xzz"), None);
    }

    #[test]
    fn decodes_dynamic_string() {
        // offset 0x20, length 4, "USDC"
        let hex = "0x\
            0000000000000000000000000000000000000000000000000000000000000020\
            0000000000000000000000000000000000000000000000000000000000000004\
            5553444300000000000000000000000000000000000000000000000000000000";
        assert_eq!(decode_abi_string(hex), Some("USDC".to_string()));
    }

    #[test]
    fn decodes_bytes32_string() {
        // "MKR" null-padded into one word (legacy tokens).
        let hex = "0x4d4b520000000000000000000000000000000000000000000000000000000000";
        assert_eq!(decode_abi_string(hex), Some("MKR".to_string()));
    }

    #[test]
    fn scales_by_decimals() {
        assert_eq!(scale_quantity(1e18, 18), 1.0);
        assert_eq!(scale_quantity(2_500_000.0, 6), 2.5);
    }

    #[test]
    fn config_contracts_are_merged_lowercase() {
        let config = WalletsConfig {
            networks: HashMap::new(),
            wallets: Vec::new(),
            contracts: HashMap::from([(
                "ethereum".to_string(),
                vec!["0xABCDEF0000000000000000000000000000000001".to_string()],
            )]),
        };
        let known = HashMap::from([(
            "ethereum".to_string(),
            vec!["0x0000000000000000000000000000000000000002".to_string()],
        )]);

        let collector = EvmWalletCollector::new(config, HashMap::new(), known);

        let contracts = &collector.known_contracts["ethereum"];
        assert_eq!(contracts.len(), 2);
        assert!(contracts.contains(&"0xabcdef0000000000000000000000000000000001".to_string()));
    }
}
