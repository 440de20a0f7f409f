//! # Signing Capability
//!
//! The core treats signing and verification as an injected capability.
//! Identities are the hex encoding of an Ed25519 public key when the
//! [`Ed25519Verifier`] is in use.
//!
//! ## Implementations
//!
//! - [`Ed25519KeyPair`] / [`Ed25519Verifier`]: deterministic Ed25519
//! - [`UncheckedSignatures`]: accepts everything; development networks only

use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
/// Produces signatures over canonical transaction bytes.
pub trait TransactionSigner: Send + Sync {
    /// Sign a message.
    fn sign(&self, message: &[u8]) -> Vec<u8>;

    /// Identity string the signatures verify against.
    fn identity(&self) -> String;
}

/// Verifies signatures over canonical transaction bytes.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` for the signer named by `public_key`.
    fn verify(&self, message: &[u8], signature: &[u8], public_key: &str)
        -> Result<(), CryptoError>;
}

/// Verifier that accepts every signature.
///
/// Stand-in until a security layer supplies a real scheme. Never use on a
/// network with untrusted submitters.
#[derive(Clone, Copy, Debug, Default)]
pub struct UncheckedSignatures;

impl SignatureVerifier for UncheckedSignatures {
    fn verify(
        &self,
        _message: &[u8],
        _signature: &[u8],
        _public_key: &str,
    ) -> Result<(), CryptoError> {
        Ok(())
    }
}

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Parse from a hex identity string.
    pub fn from_hex(identity: &str) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(identity, &mut bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex identity string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice of exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 64] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureFormat {
                    expected: 64,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// Ed25519 keypair.
///
/// The secret scalar lives only inside `SigningKey`, which wipes itself on
/// drop.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign_message(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl TransactionSigner for Ed25519KeyPair {
    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.sign_message(message).as_bytes().to_vec()
    }

    fn identity(&self) -> String {
        self.public_key().to_hex()
    }
}

/// Ed25519 verification over hex identities.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &str,
    ) -> Result<(), CryptoError> {
        let key = Ed25519PublicKey::from_hex(public_key)?;
        let signature = Ed25519Signature::from_slice(signature)?;
        key.verify(message, &signature)
    }
}
