use anyhow::{anyhow, Result};
use solana_sdk::transaction::{Transaction, VersionedTransaction};

// Signatures are serialized as fixed 64-byte arrays
const SIGNATURE_LEN: usize = 64;

// High bit of the first message byte marks a versioned message
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Wire format of a serialized transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFormat {
    Legacy,
    Versioned(u8),
}

// compact-u16: 7 bits per byte, little endian, at most 3 bytes
fn decode_short_u16(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut value = 0usize;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as usize) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(anyhow!("Invalid signature count encoding"))
}

/// Read the version marker that follows the signature section
pub fn detect_format(bytes: &[u8]) -> Result<TransactionFormat> {
    let (signature_count, prefix_len) = decode_short_u16(bytes)?;
    let message_start = prefix_len + signature_count * SIGNATURE_LEN;

    let marker = *bytes
        .get(message_start)
        .ok_or_else(|| anyhow!("Transaction payload truncated at {} bytes", bytes.len()))?;

    if marker & VERSION_PREFIX_MASK != 0 {
        Ok(TransactionFormat::Versioned(marker & !VERSION_PREFIX_MASK))
    } else {
        Ok(TransactionFormat::Legacy)
    }
}

/// Deserialize an unsigned payload from the swap API in whichever format it uses
pub fn decode_transaction(bytes: &[u8]) -> Result<(TransactionFormat, VersionedTransaction)> {
    let format = detect_format(bytes)?;

    let transaction = match format {
        TransactionFormat::Legacy => {
            let legacy: Transaction = bincode::deserialize(bytes)
                .map_err(|e| anyhow!("Failed to deserialize legacy transaction: {}", e))?;
            VersionedTransaction::from(legacy)
        }
        TransactionFormat::Versioned(0) => bincode::deserialize(bytes)
            .map_err(|e| anyhow!("Failed to deserialize versioned transaction: {}", e))?,
        TransactionFormat::Versioned(version) => {
            return Err(anyhow!("Unsupported transaction version {}", version));
        }
    };

    Ok((format, transaction))
}
