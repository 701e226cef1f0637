//! Quote request and quote result types.
//!
//! `QuoteRequest` is the fully validated parameter set for one `getQuote`
//! call. `QuoteResults` is the JSON document the trading CLI returns,
//! kept as opaque values: the CLI owns the schema of each field.

use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::trade::{ChainId, CowEnv, OrderKind, TokenAmount};

/// Key holding the unsigned order payload.
pub const ORDER_TO_SIGN: &str = "orderToSign";
/// Key holding the amounts and costs breakdown.
pub const AMOUNTS_AND_COSTS: &str = "amountsAndCosts";
/// Key holding the raw order book quote response.
pub const QUOTE_RESPONSE: &str = "quoteResponse";

/// Keys every quote document must carry, in print order.
pub const REQUIRED_FIELDS: [&str; 3] = [ORDER_TO_SIGN, AMOUNTS_AND_COSTS, QUOTE_RESPONSE];

/// Signer private key handed to the CLI.
///
/// The hex key is only reachable through [`SignerKey::expose`]; `Debug`
/// prints the derived address instead.
#[derive(Clone)]
pub struct SignerKey {
    hex: String,
    address: Address,
}

impl SignerKey {
    /// Parse a 32-byte hex private key (with or without `0x`).
    ///
    /// # Errors
    /// Returns an error that never echoes the key material.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let signer = PrivateKeySigner::from_str(raw)
            .map_err(|_| "signer private key is not a valid secp256k1 key".to_string())?;
        let hex = if raw.starts_with("0x") {
            raw.to_ascii_lowercase()
        } else {
            format!("0x{}", raw.to_ascii_lowercase())
        };
        Ok(Self {
            hex,
            address: signer.address(),
        })
    }

    /// Address derived from the key (the quote's owner).
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The `0x`-prefixed key, for the CLI argument only.
    pub fn expose(&self) -> &str {
        &self.hex
    }
}

impl std::fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerKey")
            .field("address", &self.address)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Partner fee charged on top of the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerFee {
    /// Fee in basis points.
    pub bps: u32,
    /// Address receiving the fee.
    pub recipient: Address,
}

/// Everything the CLI needs to produce a swap quote.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub chain_id: ChainId,
    pub signer: SignerKey,
    /// App code attached to the order's app-data.
    pub app_code: String,
    pub kind: OrderKind,
    pub sell_token: Address,
    pub sell_token_decimals: u8,
    pub buy_token: Address,
    pub buy_token_decimals: u8,
    /// Amount in atoms of the sell token (sell orders) or buy token (buy orders).
    pub amount: TokenAmount,
    pub env: CowEnv,
    pub partially_fillable: bool,
    /// `None` lets the CLI suggest a slippage from the quote.
    pub slippage_bps: Option<u32>,
    pub receiver: Option<Address>,
    /// Order lifetime in seconds.
    pub valid_for_secs: u32,
    pub partner_fee: Option<PartnerFee>,
}

/// Quote document returned by the trading CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResults {
    /// Unsigned order the caller is expected to sign.
    pub order_to_sign: Value,
    /// Amounts before/after network costs, partner and protocol fees, slippage.
    pub amounts_and_costs: Value,
    /// Raw response from the order book `/quote` endpoint.
    pub quote_response: Value,
    /// Remaining top-level keys (trade parameters, app-data, typed data...).
    pub extra: Map<String, Value>,
    /// When the document was received.
    pub fetched_at: DateTime<Utc>,
}

impl QuoteResults {
    /// Split a top-level JSON object into the required fields and the rest.
    ///
    /// # Errors
    /// Returns the name of the first required key that is absent.
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self, &'static str> {
        if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|k| !object.contains_key(*k)) {
            return Err(missing);
        }

        let mut take = |key: &str| object.shift_remove(key).unwrap_or(Value::Null);
        let order_to_sign = take(ORDER_TO_SIGN);
        let amounts_and_costs = take(AMOUNTS_AND_COSTS);
        let quote_response = take(QUOTE_RESPONSE);

        Ok(Self {
            order_to_sign,
            amounts_and_costs,
            quote_response,
            extra: object,
            fetched_at: Utc::now(),
        })
    }

    /// Required fields paired with their labels, in print order.
    pub fn labelled_fields(&self) -> [(&'static str, &Value); 3] {
        [
            (ORDER_TO_SIGN, &self.order_to_sign),
            (AMOUNTS_AND_COSTS, &self.amounts_and_costs),
            (QUOTE_RESPONSE, &self.quote_response),
        ]
    }

    /// Order book quote id, when the response carries one.
    pub fn quote_id(&self) -> Option<i64> {
        self.quote_response.get("id").and_then(Value::as_i64)
    }

    /// `validTo` of the unsigned order, in Unix seconds.
    pub fn valid_to(&self) -> Option<u64> {
        self.order_to_sign.get("validTo").and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Well-known hardhat test key; never holds funds.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_signer_key_derives_address_and_redacts() {
        let key = SignerKey::parse(TEST_KEY).unwrap();
        assert_eq!(
            key.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        let debug = format!("{key:?}");
        assert!(!debug.contains(&TEST_KEY[2..]));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_signer_key_adds_prefix() {
        let key = SignerKey::parse(&TEST_KEY[2..]).unwrap();
        assert_eq!(key.expose(), TEST_KEY);
    }

    #[test]
    fn test_signer_key_rejects_garbage_without_echo() {
        let err = SignerKey::parse("0xdeadbeef").unwrap_err();
        assert!(!err.contains("deadbeef"));
    }

    #[test]
    fn test_from_object_splits_fields() {
        let results = QuoteResults::from_object(object(json!({
            "orderToSign": {"validTo": 1_700_000_600u64},
            "amountsAndCosts": {"isSell": true},
            "quoteResponse": {"id": 42},
            "suggestedSlippageBps": 50
        })))
        .unwrap();

        assert_eq!(results.quote_id(), Some(42));
        assert_eq!(results.valid_to(), Some(1_700_000_600));
        assert_eq!(results.amounts_and_costs, json!({"isSell": true}));
        assert_eq!(results.extra.get("suggestedSlippageBps"), Some(&json!(50)));
        assert!(!results.extra.contains_key(ORDER_TO_SIGN));
    }

    #[test]
    fn test_from_object_reports_missing_field() {
        let err = QuoteResults::from_object(object(json!({
            "orderToSign": {},
            "quoteResponse": {}
        })))
        .unwrap_err();
        assert_eq!(err, AMOUNTS_AND_COSTS);
    }

    #[test]
    fn test_null_values_count_as_present() {
        let results = QuoteResults::from_object(object(json!({
            "orderToSign": null,
            "amountsAndCosts": null,
            "quoteResponse": null
        })))
        .unwrap();
        assert_eq!(results.order_to_sign, Value::Null);
        assert_eq!(results.quote_id(), None);
    }

    #[test]
    fn test_labelled_fields_order() {
        let results = QuoteResults::from_object(object(json!({
            "quoteResponse": 3,
            "amountsAndCosts": 2,
            "orderToSign": 1
        })))
        .unwrap();
        let labels: Vec<_> = results.labelled_fields().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, REQUIRED_FIELDS);
    }
}
