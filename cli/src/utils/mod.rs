//citrate/cli/src/utils/mod.rs

use citrate_tokenomics::U256;

/// Parse a decimal or `0x`-prefixed hex amount
pub fn parse_amount(raw: &str) -> Result<U256, String> {
    let raw = raw.trim().replace('_', "");
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16).map_err(|e| format!("invalid hex amount {}: {:?}", raw, e))
    } else {
        U256::from_dec_str(&raw).map_err(|e| format!("invalid amount {}: {:?}", raw, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1_000").unwrap(), U256::from(1_000u64));
        assert_eq!(parse_amount("0xff").unwrap(), U256::from(255u64));
        assert_eq!(
            parse_amount("1000000000000000000").unwrap(),
            U256::exp10(18)
        );
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("-1").is_err());
    }
}
