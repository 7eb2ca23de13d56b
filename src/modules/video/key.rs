use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::TryRngCore;
use rand::rngs::OsRng;
use thiserror::Error;

const KEY_ENTROPY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("secure randomness unavailable: {0}")]
    Entropy(String),
}

/// Builds `[prefix/]<random>.<ext>` where `<random>` is 256 bits from the OS
/// RNG, URL-safe base64 without padding. There is no fallback source: if the
/// OS RNG fails, no key is produced.
pub fn storage_key(prefix: Option<&str>, extension: &str) -> Result<String, KeyError> {
    let mut bytes = [0u8; KEY_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| KeyError::Entropy(e.to_string()))?;

    let name = URL_SAFE_NO_PAD.encode(bytes);
    Ok(match prefix {
        Some(prefix) => format!("{}/{}.{}", prefix, name, extension),
        None => format!("{}.{}", name, extension),
    })
}
