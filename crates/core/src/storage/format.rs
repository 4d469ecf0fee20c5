use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};
use crate::errors::CoreError;

/// Magic bytes identifying a PTRD (Paper Trader) snapshot.
pub const MAGIC: &[u8; 4] = b"PTRD";

/// Current snapshot format version.
pub const CURRENT_VERSION: u16 = 1;

/// Minimum header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const MIN_HEADER_SIZE: usize = 54;

/// Header read from an encrypted .ptrd snapshot.
#[derive(Debug)]
pub struct SnapshotHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext_len: u64,
}

/// Write a complete encrypted snapshot to bytes.
///
/// Layout:
/// ```text
/// [PTRD: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn write_snapshot(
    version: u16,
    kdf_params: &KdfParams,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Vec<u8> {
    let ciphertext_len = ciphertext.len() as u64;
    let mut buf = Vec::with_capacity(MIN_HEADER_SIZE + ciphertext.len());

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&ciphertext_len.to_le_bytes());
    // Ciphertext (includes AES-GCM auth tag)
    buf.extend_from_slice(ciphertext);

    buf
}

/// Parse the header from raw snapshot bytes.
/// Returns the header and the ciphertext slice.
pub fn read_snapshot(data: &[u8]) -> Result<(SnapshotHeader, &[u8]), CoreError> {
    if data.len() < MIN_HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid PTRD snapshot".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a PTRD snapshot".into(),
        ));
    }

    let mut offset = 4;

    let version = u16::from_le_bytes([data[offset], data[offset + 1]]);
    offset += 2;

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let read_u32 = |field: &str, off: &mut usize| -> Result<u32, CoreError> {
        let value = u32::from_le_bytes(data[*off..*off + 4].try_into().map_err(|_| {
            CoreError::InvalidFileFormat(format!("Failed to read KDF {field}"))
        })?);
        *off += 4;
        Ok(value)
    };

    let memory_cost = read_u32("memory_cost", &mut offset)?;
    let time_cost = read_u32("time_cost", &mut offset)?;
    let parallelism = read_u32("parallelism", &mut offset)?;

    // Bound KDF params to prevent resource-exhaustion attacks from
    // crafted files: memory 8 KiB..1 GiB, up to 20 iterations, up to
    // 16 threads.
    if !(8..=1_048_576).contains(&memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of safe range: {memory_cost} KiB (expected 8..1048576)"
        )));
    }
    if !(1..=20).contains(&time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of safe range: {time_cost} (expected 1..20)"
        )));
    }
    if !(1..=16).contains(&parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of safe range: {parallelism} (expected 1..16)"
        )));
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
    offset += SALT_LEN;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
    offset += NONCE_LEN;

    let ciphertext_len = u64::from_le_bytes(data[offset..offset + 8].try_into().map_err(
        |_| CoreError::InvalidFileFormat("Failed to read ciphertext length".into()),
    )?);
    offset += 8;

    // Compare in u64 so a crafted length near u64::MAX cannot overflow
    // the offset arithmetic before the check.
    let available = (data.len() - offset) as u64;
    if ciphertext_len > available {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {ciphertext_len} bytes of ciphertext, got {available}"
        )));
    }

    let ciphertext = &data[offset..offset + ciphertext_len as usize];

    let header = SnapshotHeader {
        version,
        kdf_params: KdfParams {
            memory_cost,
            time_cost,
            parallelism,
        },
        salt,
        nonce,
        ciphertext_len,
    };

    Ok((header, ciphertext))
}
