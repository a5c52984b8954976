//! Ed25519 transaction signing.
//!
//! Sui's signature envelope is `flag(0x00) ‖ signature ‖ public key`, base64
//! encoded, over `blake2b-256(intent ‖ tx_bytes)` where the intent for
//! transaction data is the three zero bytes. The address is
//! `blake2b-256(flag ‖ public key)`.

use anyhow::{Context, Result};
use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};

const ED25519_FLAG: u8 = 0x00;
const TX_DATA_INTENT: [u8; 3] = [0, 0, 0];

pub struct Signer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Signer {
    /// From a 32-byte hex private key, `0x` prefix optional.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let stripped = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let bytes = hex::decode(stripped).context("private key is not valid hex")?;
        let key_bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("private key must be 32 bytes, got {}", bytes.len()))?;

        let signing_key = SigningKey::from_bytes(&key_bytes);
        let verifying_key = signing_key.verifying_key();
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// The wallet address this key controls.
    pub fn address(&self) -> String {
        let digest = blake2b256(&[&[ED25519_FLAG], self.verifying_key.as_bytes().as_slice()]);
        format!("0x{}", hex::encode(digest))
    }

    /// Sign base64 transaction bytes into the serialized signature envelope.
    pub fn sign_transaction(&self, tx_bytes_base64: &str) -> Result<String> {
        let tx_bytes = base64::engine::general_purpose::STANDARD
            .decode(tx_bytes_base64)
            .context("transaction bytes are not valid base64")?;

        let digest = blake2b256(&[&TX_DATA_INTENT, tx_bytes.as_slice()]);
        let signature = self.signing_key.sign(&digest);

        let mut envelope = Vec::with_capacity(1 + 64 + 32);
        envelope.push(ED25519_FLAG);
        envelope.extend_from_slice(&signature.to_bytes());
        envelope.extend_from_slice(self.verifying_key.as_bytes());
        Ok(base64::engine::general_purpose::STANDARD.encode(envelope))
    }
}

fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
    for part in parts {
        state.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}
