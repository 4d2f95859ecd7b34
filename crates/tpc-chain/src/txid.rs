use ethers::types::H256;

/// Converts a client-chosen hex transaction id into its 32-byte, on-chain form.
///
/// The hex string is right-aligned and zero-padded on the left, so `"ab"` becomes
/// `0x00..00ab` and a string already 64 hex characters long (32 bytes) passes through
/// unchanged. This is the same key used off-chain (as the `StagingArea`/`Deadline` map key,
/// compared as a string) and on-chain (as the contract's record key).
///
/// # Errors
/// Returns an error if `hex_tx_id` contains non-hex-digit characters or decodes to more than 32
/// bytes.
pub fn to_onchain_key(hex_tx_id: &str) -> Result<H256, InvalidTxId> {
    let cleaned = hex_tx_id.strip_prefix("0x").unwrap_or(hex_tx_id);
    if cleaned.len() > 64 {
        return Err(InvalidTxId::TooLong {
            len: cleaned.len(),
        });
    }
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvalidTxId::NotHex);
    }

    let padded = format!("{cleaned:0>64}");
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(&padded, &mut bytes).map_err(|_| InvalidTxId::NotHex)?;
    Ok(H256::from(bytes))
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidTxId {
    #[error("transaction id is not valid hexadecimal")]
    NotHex,
    #[error("transaction id decodes to more than 32 bytes (got {len} hex characters)")]
    TooLong { len: usize },
}

#[cfg(test)]
mod tests {
    use super::to_onchain_key;

    #[test]
    fn short_hex_is_left_padded() {
        let key = to_onchain_key("ab").unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 0xab;
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn full_width_hex_passes_through() {
        let full = "a".repeat(64);
        let key = to_onchain_key(&full).unwrap();
        assert_eq!(key.as_bytes(), &[0xaa; 32]);
    }

    #[test]
    fn too_long_is_rejected() {
        let too_long = "a".repeat(65);
        assert!(matches!(
            to_onchain_key(&too_long),
            Err(super::InvalidTxId::TooLong { .. })
        ));
    }

    #[test]
    fn non_hex_is_rejected() {
        assert!(matches!(
            to_onchain_key("not-hex"),
            Err(super::InvalidTxId::NotHex)
        ));
    }
}
