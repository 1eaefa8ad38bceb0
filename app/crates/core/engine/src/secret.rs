//! Master-secret handling.
//!
//! The secret exists only inside one invocation: read from the environment
//! exactly once, validated, and held behind [`Zeroizing`] so the buffer is
//! overwritten on every exit path, error paths included.

use zeroize::Zeroizing;

use crate::EngineError;

/// Environment variable carrying the master secret.
pub const MASTER_SECRET_VAR: &str = "DAO_MASTER_SECRET";

/// Expected length of the hex rendering: 32 bytes, lowercase.
const MASTER_SECRET_HEX_LEN: usize = 64;

/// The 32-byte master secret, zeroized on drop.
pub struct MasterSecret(Zeroizing<[u8; crypto::MASTER_SECRET_LEN]>);

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MasterSecret").field(&"<redacted>").finish()
    }
}

impl MasterSecret {
    /// Read the secret from [`MASTER_SECRET_VAR`].
    pub fn from_env() -> Result<Self, EngineError> {
        let value = Zeroizing::new(
            std::env::var(MASTER_SECRET_VAR).map_err(|_| EngineError::MasterSecretMissing)?,
        );
        Self::from_hex(&value)
    }

    /// Parse the secret from its 64-char lowercase hex rendering.
    pub fn from_hex(hex_value: &str) -> Result<Self, EngineError> {
        if hex_value.len() != MASTER_SECRET_HEX_LEN
            || !hex_value
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(EngineError::MasterSecretMalformed);
        }
        let decoded = Zeroizing::new(
            hex::decode(hex_value).map_err(|_| EngineError::MasterSecretMalformed)?,
        );
        let mut bytes = Zeroizing::new([0u8; crypto::MASTER_SECRET_LEN]);
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Borrow the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; crypto::MASTER_SECRET_LEN] {
        &self.0
    }
}
