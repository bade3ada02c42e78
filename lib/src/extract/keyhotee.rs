use super::IdentityDeriver;
use crate::{Error, Result};
use bitcoin::hashes::{sha512, Hash, HashEngine};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::util::bip32::{ChildNumber, ExtendedPrivKey};
use bitcoin::{Network, PrivateKey};
use std::fmt;

const STRETCH_ROUNDS: usize = 1024;

/// Keyhotee identity profile
#[derive(Clone)]
pub struct Profile {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub brain_key: String,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("brain_key", &"[redacted]")
            .finish()
    }
}

impl Profile {
    /// sha512 of the concatenated profile fields, stretched
    fn seed(&self) -> [u8; 64] {
        let mut engine = sha512::Hash::engine();
        for field in &[
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.brain_key,
        ] {
            engine.input(field.as_bytes());
        }
        let mut hash = sha512::Hash::from_engine(engine);
        for _ in 0..STRETCH_ROUNDS {
            hash = sha512::Hash::hash(&hash[..]);
        }
        hash.into_inner()
    }
}

/// Derives the identity key: a bip32 master from the profile seed, then one
/// hardened child per byte of the handle.
pub struct KeyhoteeDeriver {
    pub network: Network,
}

impl IdentityDeriver for KeyhoteeDeriver {
    fn derive(&self, profile: &Profile, handle: &str) -> Result<PrivateKey> {
        if profile.brain_key.is_empty() {
            return Err(Error::Extraction("keyhotee: brain key is empty".to_string()));
        }
        if handle.is_empty() {
            return Err(Error::Extraction("keyhotee: handle is empty".to_string()));
        }
        let secp = Secp256k1::signing_only();
        let mut child_key = ExtendedPrivKey::new_master(self.network, &profile.seed())?;
        for byte in handle.as_bytes() {
            let path = [ChildNumber::from_hardened_idx(*byte as u32)?];
            child_key = child_key.derive_priv(&secp, &path)?;
        }
        let mut key = child_key.private_key;
        key.compressed = true;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyhoteeDeriver, Profile};
    use crate::extract::IdentityDeriver;
    use crate::Error;
    use bitcoin::Network;

    fn profile(brain_key: &str) -> Profile {
        Profile {
            first_name: "Alice".to_string(),
            middle_name: "".to_string(),
            last_name: "Liddell".to_string(),
            brain_key: brain_key.to_string(),
        }
    }

    #[test]
    fn test_derive_deterministic() {
        let deriver = KeyhoteeDeriver {
            network: Network::Testnet,
        };
        let first = deriver.derive(&profile("rabbit hole"), "alice").unwrap();
        let second = deriver.derive(&profile("rabbit hole"), "alice").unwrap();
        assert_eq!(first, second);
        assert!(first.compressed);
        assert_eq!(first.network, Network::Testnet);

        let other_handle = deriver.derive(&profile("rabbit hole"), "alice2").unwrap();
        assert_ne!(first.key, other_handle.key);
        let other_brain = deriver.derive(&profile("looking glass"), "alice").unwrap();
        assert_ne!(first.key, other_brain.key);
        // the handle is used as given, lowercasing is up to the caller
        let upper = deriver.derive(&profile("rabbit hole"), "Alice").unwrap();
        assert_ne!(first.key, upper.key);
    }

    #[test]
    fn test_derive_empty_inputs() {
        let deriver = KeyhoteeDeriver {
            network: Network::Bitcoin,
        };
        assert_matches!(
            deriver.derive(&profile(""), "alice"),
            Err(Error::Extraction(_))
        );
        assert_matches!(
            deriver.derive(&profile("rabbit hole"), ""),
            Err(Error::Extraction(_))
        );
    }

    #[test]
    fn test_debug_redacts_brain_key() {
        let debug = format!("{:?}", profile("rabbit hole"));
        assert!(debug.contains("Liddell"));
        assert!(!debug.contains("rabbit"));
    }
}
