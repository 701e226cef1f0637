//! Core trade parameter types.
//!
//! Strongly typed values for everything the trading CLI receives on its
//! command line: network, order kind, environment, token addresses and
//! token amounts. Parsing happens once at the edge (config loading); the
//! rest of the crate only handles already-valid values.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────
// Networks
// ────────────────────────────────────────────

/// Networks the CoW Protocol trading CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    Mainnet,
    GnosisChain,
    Polygon,
    Base,
    ArbitrumOne,
    Avalanche,
    Sepolia,
}

impl ChainId {
    /// Every supported network, in chain-id order.
    pub const ALL: [Self; 7] = [
        Self::Mainnet,
        Self::GnosisChain,
        Self::Polygon,
        Self::Base,
        Self::ArbitrumOne,
        Self::Avalanche,
        Self::Sepolia,
    ];

    /// Numeric EIP-155 chain id.
    pub const fn id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::GnosisChain => 100,
            Self::Polygon => 137,
            Self::Base => 8453,
            Self::ArbitrumOne => 42161,
            Self::Avalanche => 43114,
            Self::Sepolia => 11_155_111,
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.id() == value)
            .ok_or_else(|| format!("unsupported chain id {value}"))
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.id()
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ────────────────────────────────────────────
// Enums passed verbatim to the CLI
// ────────────────────────────────────────────

/// Order kind: sell an exact amount, or buy an exact amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Sell,
    Buy,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "sell"),
            Self::Buy => write!(f, "buy"),
        }
    }
}

/// Order book API environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CowEnv {
    #[default]
    Prod,
    Staging,
}

impl std::fmt::Display for CowEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prod => write!(f, "prod"),
            Self::Staging => write!(f, "staging"),
        }
    }
}

// ────────────────────────────────────────────
// Token amounts
// ────────────────────────────────────────────

/// Largest decimals value whose scale factor still fits a `Decimal`.
pub const MAX_TOKEN_DECIMALS: u8 = 28;

/// A token amount in atoms (the smallest indivisible unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(U256);

impl TokenAmount {
    /// Parse a base-10 integer string of atoms.
    ///
    /// # Errors
    /// Rejects empty strings, signs, separators, hex and values above `U256::MAX`.
    pub fn from_atoms(atoms: &str) -> Result<Self, String> {
        let atoms = atoms.trim();
        if atoms.is_empty() || !atoms.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("amount {atoms:?} is not a base-10 integer"));
        }
        U256::from_str_radix(atoms, 10)
            .map(Self)
            .map_err(|e| format!("amount {atoms:?} out of range: {e}"))
    }

    /// Convert a human amount (e.g. `1.5`) into atoms using `decimals`.
    ///
    /// The conversion is exact: a remainder below one atom is an error
    /// instead of being truncated.
    ///
    /// # Errors
    /// Negative values, too many decimals, overflow and sub-atom remainders.
    pub fn from_units(units: Decimal, decimals: u8) -> Result<Self, String> {
        if units.is_sign_negative() {
            return Err(format!("amount {units} is negative"));
        }
        if decimals > MAX_TOKEN_DECIMALS {
            return Err(format!(
                "token decimals {decimals} exceed the supported maximum {MAX_TOKEN_DECIMALS}"
            ));
        }

        let mut scaled = units;
        for _ in 0..decimals {
            scaled = scaled
                .checked_mul(Decimal::TEN)
                .ok_or_else(|| format!("amount {units} with {decimals} decimals overflows"))?;
        }

        if !scaled.fract().is_zero() {
            return Err(format!(
                "amount {units} has more precision than {decimals} decimals allow"
            ));
        }

        Self::from_atoms(&scaled.trunc().to_string())
    }

    /// Whether the amount is zero atoms.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Raw atoms.
    pub const fn atoms(&self) -> U256 {
        self.0
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a `0x`-prefixed 20-byte address.
///
/// # Errors
/// Returns a readable message naming `field` when the value is not an address.
pub fn parse_address(field: &str, value: &str) -> Result<Address, String> {
    let value = value.trim();
    if !value.starts_with("0x") {
        return Err(format!("{field} {value:?} must be 0x-prefixed"));
    }
    Address::from_str(value).map_err(|e| format!("{field} {value:?} is not an address: {e}"))
}

/// Render an address in EIP-55 checksummed form.
pub fn checksummed(address: &Address) -> String {
    address.to_checksum(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chain_id_round_trip_through_u64() {
        for chain in ChainId::ALL {
            assert_eq!(ChainId::try_from(chain.id()).unwrap(), chain);
        }
        assert!(ChainId::try_from(5).is_err());
    }

    #[test]
    fn test_chain_id_deserializes_from_integer() {
        #[derive(Deserialize)]
        struct Wrapper {
            chain_id: ChainId,
        }
        let w: Wrapper = toml::from_str("chain_id = 100").unwrap();
        assert_eq!(w.chain_id, ChainId::GnosisChain);
        assert!(toml::from_str::<Wrapper>("chain_id = 5").is_err());
    }

    #[test]
    fn test_enum_display_matches_cli_values() {
        assert_eq!(OrderKind::Sell.to_string(), "sell");
        assert_eq!(OrderKind::Buy.to_string(), "buy");
        assert_eq!(CowEnv::Prod.to_string(), "prod");
        assert_eq!(CowEnv::Staging.to_string(), "staging");
        assert_eq!(ChainId::Sepolia.to_string(), "11155111");
    }

    #[test]
    fn test_amount_from_atoms() {
        let amount = TokenAmount::from_atoms("120000000000000000").unwrap();
        assert_eq!(amount.to_string(), "120000000000000000");
        assert!(TokenAmount::from_atoms("0").unwrap().is_zero());
        assert!(TokenAmount::from_atoms("").is_err());
        assert!(TokenAmount::from_atoms("-1").is_err());
        assert!(TokenAmount::from_atoms("1.5").is_err());
        assert!(TokenAmount::from_atoms("0x10").is_err());
    }

    #[test]
    fn test_amount_from_units() {
        let amount = TokenAmount::from_units(dec!(0.12), 18).unwrap();
        assert_eq!(amount.to_string(), "120000000000000000");

        let usdc = TokenAmount::from_units(dec!(250.5), 6).unwrap();
        assert_eq!(usdc.to_string(), "250500000");
    }

    #[test]
    fn test_amount_from_units_rejects_sub_atom_precision() {
        assert!(TokenAmount::from_units(dec!(0.0000001), 6).is_err());
        assert!(TokenAmount::from_units(dec!(-1), 6).is_err());
        assert!(TokenAmount::from_units(dec!(1), 29).is_err());
    }

    #[test]
    fn test_parse_address() {
        let addr =
            parse_address("sell_token", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
        assert_eq!(
            checksummed(&addr),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
        assert!(parse_address("sell_token", "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").is_err());
        assert!(parse_address("sell_token", "0x1234").is_err());
    }
}
