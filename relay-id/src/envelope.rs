//! Binary key envelope.
//!
//! Keys are marshaled in the libp2p key format so that identity files written
//! by other libp2p implementations load unchanged:
//!
//! ```text
//! enum KeyType { RSA = 0; Ed25519 = 1; Secp256k1 = 2; ECDSA = 3; }
//! message PublicKey  { required KeyType Type = 1; required bytes Data = 2; }
//! message PrivateKey { required KeyType Type = 1; required bytes Data = 2; }
//! ```
//!
//! Public and private envelopes share the same wire layout, so one message
//! type serves both.

use prost::Message;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub(crate) enum KeyType {
    Rsa = 0,
    Ed25519 = 1,
    Secp256k1 = 2,
    Ecdsa = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct KeyEnvelope {
    #[prost(enumeration = "KeyType", required, tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", required, tag = "2")]
    pub data: Vec<u8>,
}

impl KeyEnvelope {
    pub(crate) fn ed25519(data: Vec<u8>) -> Self {
        Self {
            key_type: KeyType::Ed25519 as i32,
            data,
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Parses an envelope and returns its payload if it carries an Ed25519 key.
    pub(crate) fn ed25519_payload(bytes: &[u8]) -> Result<Vec<u8>, String> {
        let envelope =
            Self::decode(bytes).map_err(|e| format!("not a marshaled key envelope: {e}"))?;

        match KeyType::try_from(envelope.key_type) {
            Ok(KeyType::Ed25519) => Ok(envelope.data),
            Ok(other) => Err(format!("key type {other:?} is not supported")),
            Err(_) => Err(format!("unknown key type {}", envelope.key_type)),
        }
    }
}
