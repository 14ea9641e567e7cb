use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::envelope::KeyEnvelope;
use crate::errors::{IdentityError, Result};
use crate::KeyKind;

pub use ed25519_dalek::Signature;

const SEED_LEN: usize = 32;
const PUBLIC_LEN: usize = 32;
const KEYPAIR_LEN: usize = SEED_LEN + PUBLIC_LEN;
// Older libp2p writers appended the public key a second time.
const LEGACY_KEYPAIR_LEN: usize = KEYPAIR_LEN + PUBLIC_LEN;

/// Multihash code for the identity hash, used to build peer ids.
const MULTIHASH_IDENTITY: u8 = 0x00;

/// Ed25519 private key of a node.
///
/// `Debug` never prints key material.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

/// Ed25519 public key of a node.
///
/// Displays as its ID52, the 52 character BASE32_DNSSEC form of the raw key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PrivateKey {
    /// Generates a new key from the operating system's CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::GenerationFailure`] if the entropy source fails.
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; SEED_LEN];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| IdentityError::GenerationFailure(e.to_string()))?;
        let key = Self::from_seed(&seed);
        seed.fill(0);
        Ok(key)
    }

    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Returns the 32-byte seed. Handle with care.
    pub fn to_secret_bytes(&self) -> [u8; SEED_LEN] {
        self.signing_key.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Marshals the key into a libp2p private key envelope (seed followed by
    /// public key).
    pub fn marshal(&self) -> Vec<u8> {
        KeyEnvelope::ed25519(self.signing_key.to_keypair_bytes().to_vec()).to_bytes()
    }

    /// Reconstructs a key from a libp2p private key envelope.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self> {
        let kind = KeyKind::Private;
        let payload = KeyEnvelope::ed25519_payload(bytes)
            .map_err(|reason| IdentityError::unsupported(kind, reason))?;

        let keypair = match payload.len() {
            KEYPAIR_LEN => &payload[..],
            LEGACY_KEYPAIR_LEN => {
                if payload[SEED_LEN..KEYPAIR_LEN] != payload[KEYPAIR_LEN..] {
                    return Err(IdentityError::unsupported(
                        kind,
                        "redundant public key copies differ",
                    ));
                }
                &payload[..KEYPAIR_LEN]
            }
            other => {
                return Err(IdentityError::unsupported(
                    kind,
                    format!("expected {KEYPAIR_LEN} bytes of Ed25519 key data, got {other}"),
                ));
            }
        };
        let keypair = <[u8; KEYPAIR_LEN]>::try_from(keypair)
            .map_err(|_| IdentityError::unsupported(kind, "invalid Ed25519 key data"))?;

        let signing_key = SigningKey::from_keypair_bytes(&keypair)
            .map_err(|e| IdentityError::unsupported(kind, e.to_string()))?;

        Ok(Self { signing_key })
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl PublicKey {
    pub fn to_bytes(&self) -> [u8; PUBLIC_LEN] {
        self.0.to_bytes()
    }

    pub fn id52(&self) -> String {
        data_encoding::BASE32_DNSSEC.encode(self.0.as_bytes())
    }

    /// libp2p peer id: base58btc of the identity multihash over the marshaled
    /// public key.
    pub fn peer_id(&self) -> String {
        let marshaled = self.marshal();
        let mut multihash = Vec::with_capacity(marshaled.len() + 2);
        multihash.push(MULTIHASH_IDENTITY);
        multihash.push(marshaled.len() as u8);
        multihash.extend_from_slice(&marshaled);
        bs58::encode(multihash).into_string()
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.0.verify_strict(message, signature).is_ok()
    }

    pub fn marshal(&self) -> Vec<u8> {
        KeyEnvelope::ed25519(self.0.to_bytes().to_vec()).to_bytes()
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Self> {
        let kind = KeyKind::Public;
        let payload = KeyEnvelope::ed25519_payload(bytes)
            .map_err(|reason| IdentityError::unsupported(kind, reason))?;

        let raw = <[u8; PUBLIC_LEN]>::try_from(&payload[..]).map_err(|_| {
            IdentityError::unsupported(
                kind,
                format!(
                    "expected {PUBLIC_LEN} bytes of Ed25519 key data, got {}",
                    payload.len()
                ),
            )
        })?;

        VerifyingKey::from_bytes(&raw)
            .map(Self)
            .map_err(|e| IdentityError::unsupported(kind, e.to_string()))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id52())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.id52())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::KeyType;

    #[test]
    fn generated_keys_differ() {
        let a = PrivateKey::generate().unwrap();
        let b = PrivateKey::generate().unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn id52_is_52_chars() {
        let id52 = PrivateKey::generate().unwrap().public_key().id52();
        assert_eq!(id52.len(), 52);
        assert!(id52.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn peer_id_has_ed25519_prefix() {
        // identity multihash of an Ed25519 envelope always starts this way
        let peer_id = PrivateKey::generate().unwrap().public_key().peer_id();
        assert!(peer_id.starts_with("12D3KooW"), "{peer_id}");
    }

    #[test]
    fn marshal_roundtrip() {
        let key = PrivateKey::generate().unwrap();
        let restored = PrivateKey::unmarshal(&key.marshal()).unwrap();
        assert_eq!(key.to_secret_bytes(), restored.to_secret_bytes());

        let public = key.public_key();
        assert_eq!(PublicKey::unmarshal(&public.marshal()).unwrap(), public);
    }

    #[test]
    fn legacy_private_payload_is_accepted() {
        let key = PrivateKey::from_seed(&[7u8; 32]);
        let mut data = key.signing_key.to_keypair_bytes().to_vec();
        data.extend_from_slice(&key.public_key().to_bytes());

        let restored = PrivateKey::unmarshal(&KeyEnvelope::ed25519(data).to_bytes()).unwrap();
        assert_eq!(restored, key);
    }

    #[test]
    fn private_payload_with_foreign_public_half_is_rejected() {
        let key = PrivateKey::from_seed(&[7u8; 32]);
        let other = PrivateKey::from_seed(&[8u8; 32]);
        let mut data = key.to_secret_bytes().to_vec();
        data.extend_from_slice(&other.public_key().to_bytes());

        let err = PrivateKey::unmarshal(&KeyEnvelope::ed25519(data).to_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IdentityError::UnsupportedKeyMaterial {
                kind: KeyKind::Private,
                ..
            }
        ));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let bytes = KeyEnvelope::ed25519(vec![1u8; 31]).to_bytes();
        assert!(matches!(
            PublicKey::unmarshal(&bytes),
            Err(IdentityError::UnsupportedKeyMaterial { .. })
        ));
        assert!(matches!(
            PrivateKey::unmarshal(&bytes),
            Err(IdentityError::UnsupportedKeyMaterial { .. })
        ));
    }

    #[test]
    fn rsa_envelope_is_rejected() {
        let bytes = KeyEnvelope {
            key_type: KeyType::Rsa as i32,
            data: vec![0x30; 64],
        }
        .to_bytes();
        assert!(matches!(
            PrivateKey::unmarshal(&bytes),
            Err(IdentityError::UnsupportedKeyMaterial { .. })
        ));
    }

    #[test]
    fn signatures_verify_with_matching_key_only() {
        let key = PrivateKey::generate().unwrap();
        let other = PrivateKey::generate().unwrap();
        let signature = key.sign(b"relay hello");

        assert!(key.public_key().verify(b"relay hello", &signature));
        assert!(!key.public_key().verify(b"relay bye", &signature));
        assert!(!other.public_key().verify(b"relay hello", &signature));
    }

    #[test]
    fn debug_hides_secret() {
        let key = PrivateKey::from_seed(&[0x42; 32]);
        let printed = format!("{key:?}");
        assert!(printed.contains(&key.public_key().id52()));
        assert!(!printed.contains("66, 66"));
    }
}
