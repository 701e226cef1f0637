//! Trading CLI Argument Builder
//!
//! Renders a `QuoteRequest` as the `--flag=value` vector the CoW
//! Protocol trading CLI parses. Flag order is fixed so that runs are
//! reproducible and logs diff cleanly.

use crate::domain::quote::QuoteRequest;
use crate::domain::trade::checksummed;

/// Action selector understood by the CLI.
pub const GET_QUOTE_ACTION: &str = "getQuote";

/// Flag carrying the signer private key.
pub const SIGNER_FLAG: &str = "--signer";

const REDACTED: &str = "<redacted>";

fn flag(name: &str, value: impl std::fmt::Display) -> String {
  format!("--{name}={value}")
}

/// Build the argument vector for a `getQuote` call.
///
/// Optional parameters are omitted rather than sent empty, so the CLI
/// falls back to its own defaults (e.g. auto slippage).
pub fn quote_args(request: &QuoteRequest) -> Vec<String> {
  let mut args = vec![
    flag("action", GET_QUOTE_ACTION),
    flag("chainId", request.chain_id),
    format!("{SIGNER_FLAG}={}", request.signer.expose()),
    flag("appCode", &request.app_code),
    flag("orderKind", request.kind),
    flag("sellToken", checksummed(&request.sell_token)),
    flag("sellTokenDecimals", request.sell_token_decimals),
    flag("buyToken", checksummed(&request.buy_token)),
    flag("buyTokenDecimals", request.buy_token_decimals),
    flag("amount", request.amount),
    flag("env", request.env),
    flag("partiallyFillable", request.partially_fillable),
  ];

  if let Some(bps) = request.slippage_bps {
    args.push(flag("slippageBps", bps));
  }
  if let Some(receiver) = &request.receiver {
    args.push(flag("receiver", checksummed(receiver)));
  }
  args.push(flag("validFor", request.valid_for_secs));
  if let Some(fee) = &request.partner_fee {
    args.push(flag("partnerFeeBps", fee.bps));
    args.push(flag("partnerFeeRecipient", checksummed(&fee.recipient)));
  }

  args
}

/// Copy of `args` safe to log: the signer value is masked.
pub fn redacted(args: &[String]) -> Vec<String> {
  args
    .iter()
    .map(|arg| {
      if arg
        .strip_prefix(SIGNER_FLAG)
        .is_some_and(|rest| rest.starts_with('='))
      {
        format!("{SIGNER_FLAG}={REDACTED}")
      } else {
        arg.clone()
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::quote::{PartnerFee, SignerKey};
  use crate::domain::trade::{ChainId, CowEnv, OrderKind, TokenAmount, parse_address};

  const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

  fn request() -> QuoteRequest {
    QuoteRequest {
      chain_id: ChainId::Sepolia,
      signer: SignerKey::parse(TEST_KEY).unwrap(),
      app_code: "quote-runner".to_string(),
      kind: OrderKind::Sell,
      sell_token: parse_address("sell", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
      sell_token_decimals: 18,
      buy_token: parse_address("buy", "0x6b175474e89094c44da98b954eedeac495271d0f").unwrap(),
      buy_token_decimals: 18,
      amount: TokenAmount::from_atoms("120000000000000000").unwrap(),
      env: CowEnv::Staging,
      partially_fillable: false,
      slippage_bps: None,
      receiver: None,
      valid_for_secs: 300,
      partner_fee: None,
    }
  }

  #[test]
  fn test_minimal_request_args() {
    let args = quote_args(&request());
    assert_eq!(
      args,
      vec![
        "--action=getQuote".to_string(),
        "--chainId=11155111".to_string(),
        format!("--signer={TEST_KEY}"),
        "--appCode=quote-runner".to_string(),
        "--orderKind=sell".to_string(),
        "--sellToken=0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string(),
        "--sellTokenDecimals=18".to_string(),
        "--buyToken=0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string(),
        "--buyTokenDecimals=18".to_string(),
        "--amount=120000000000000000".to_string(),
        "--env=staging".to_string(),
        "--partiallyFillable=false".to_string(),
        "--validFor=300".to_string(),
      ]
    );
  }

  #[test]
  fn test_full_request_carries_seventeen_flags() {
    let mut req = request();
    req.slippage_bps = Some(50);
    req.receiver = Some(req.signer.address());
    req.partner_fee = Some(PartnerFee {
      bps: 25,
      recipient: req.signer.address(),
    });

    let args = quote_args(&req);
    assert_eq!(args.len(), 17);
    assert!(args.contains(&"--slippageBps=50".to_string()));
    assert!(args.contains(&"--partnerFeeBps=25".to_string()));
    assert!(args.contains(
      &"--partnerFeeRecipient=0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string()
    ));
    assert!(args
      .iter()
      .position(|a| a.starts_with("--receiver="))
      .is_some_and(|i| args[i + 1].starts_with("--validFor=")));
  }

  #[test]
  fn test_redacted_masks_signer_only() {
    let args = quote_args(&request());
    let safe = redacted(&args);
    assert_eq!(safe.len(), args.len());
    assert!(safe.contains(&"--signer=<redacted>".to_string()));
    assert!(safe.iter().all(|a| !a.contains(&TEST_KEY[2..])));
    assert_eq!(safe[0], args[0]);
  }

  #[test]
  fn test_redacted_ignores_similar_flags() {
    let args = vec!["--signerless=1".to_string(), "run-cli".to_string()];
    assert_eq!(redacted(&args), args);
  }
}
