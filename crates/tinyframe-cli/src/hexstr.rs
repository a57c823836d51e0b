//! Hex text helpers for payloads and wire dumps.

/// Render bytes as lowercase hex with no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse hex text into bytes. Whitespace and `0x` prefixes are accepted,
/// so "01 80", "0x01 0x80" and "0180" all mean the same two bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let mut digits = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        digits.push_str(token.strip_prefix("0x").unwrap_or(token));
    }

    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    let raw = digits.as_bytes();
    for pair in raw.chunks(2) {
        let pair = std::str::from_utf8(pair).map_err(|_| "invalid hex text".to_string())?;
        let byte =
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte {pair:?}"))?;
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Parse a decimal or `0x`-prefixed integer argument.
pub fn parse_u32(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("invalid number {text:?}"))
}

/// Parse a single byte argument, decimal or `0x`-prefixed.
pub fn parse_byte(text: &str) -> Result<u8, String> {
    let value = parse_u32(text)?;
    u8::try_from(value).map_err(|_| format!("{text:?} does not fit a byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let bytes = [0x01, 0x80, 0x00, 0xFF];
        assert_eq!(parse_hex(&to_hex(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn accepts_spaced_and_prefixed_forms() {
        assert_eq!(parse_hex("01 80").unwrap(), vec![0x01, 0x80]);
        assert_eq!(parse_hex("0x01 0x80").unwrap(), vec![0x01, 0x80]);
        assert_eq!(parse_hex("0180").unwrap(), vec![0x01, 0x80]);
    }

    #[test]
    fn rejects_odd_and_garbage_input() {
        assert!(parse_hex("012").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn numbers_parse_in_both_bases() {
        assert_eq!(parse_u32("34").unwrap(), 34);
        assert_eq!(parse_u32("0x22").unwrap(), 0x22);
        assert!(parse_u32("x").is_err());
        assert!(parse_byte("0x100").is_err());
    }
}
