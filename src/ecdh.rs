//! Elliptic Curve Diffie-Hellman (ECDH) key exchange implementation.

use crate::{Error, Result};
use curve25519_dalek::MontgomeryPoint;
use rand::{RngCore as _, rngs::OsRng};

/// An X25519 keypair.
pub struct Keypair {
    /// The private scalar bytes.
    pub private_key: [u8; 32],
    /// The corresponding public key.
    pub public_key: [u8; 32],
}

impl Keypair {
    /// Generates a fresh keypair from the system CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut private_key = [0; 32];
        OsRng
            .try_fill_bytes(&mut private_key)
            .map_err(|_| Error::RngFailure)?;
        let public_key = public_key(private_key);
        Ok(Self {
            private_key,
            public_key,
        })
    }
}

/// Computes the public key.
pub fn public_key(private_key: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint::mul_base_clamped(private_key).to_bytes()
}

/// Computes a shared secret.
pub fn shared_secret(private_key: [u8; 32], public_key: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint(public_key).mul_clamped(private_key).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_exchange_agrees() {
        let alice = Keypair::generate().unwrap();
        let bob = Keypair::generate().unwrap();
        assert_eq!(
            shared_secret(alice.private_key, bob.public_key),
            shared_secret(bob.private_key, alice.public_key)
        );
    }

    #[test]
    fn distinct_peers_derive_distinct_secrets() {
        let alice = Keypair::generate().unwrap();
        let bob = Keypair::generate().unwrap();
        let carol = Keypair::generate().unwrap();
        assert_ne!(
            shared_secret(alice.private_key, bob.public_key),
            shared_secret(alice.private_key, carol.public_key)
        );
    }

    #[test]
    fn rfc7748_base_point_vector() {
        // RFC 7748 §6.1, Alice's keypair.
        let private_key =
            *b"\x77\x07\x6d\x0a\x73\x18\xa5\x7d\x3c\x16\xc1\x72\x51\xb2\x66\x45\
               \xdf\x4c\x2f\x87\xeb\xc0\x99\x2a\xb1\x77\xfb\xa5\x1d\xb9\x2c\x2a";
        let expected =
            *b"\x85\x20\xf0\x09\x89\x30\xa7\x54\x74\x8b\x7d\xdc\xb4\x3e\xf7\x5a\
               \x0d\xbf\x3a\x0d\x26\x38\x1a\xf4\xeb\xa4\xa9\x8e\xaa\x9b\x4e\x6a";
        assert_eq!(public_key(private_key), expected);
    }
}
