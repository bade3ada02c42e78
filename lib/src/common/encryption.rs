use crate::{Error, Result, StringEncoding};
use aes_gcm_siv::aead::{generic_array::GenericArray, Aead, NewAead};
use aes_gcm_siv::Aes256GcmSiv;
use log::warn;
use rand::{thread_rng, Rng};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

pub type EncryptionKey = [u8; 32];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "t", content = "c", rename_all = "lowercase")]
pub enum MaybeEncrypted<T> {
    Plain(T),
    Encrypted(StringEncoding),
}

impl<T> MaybeEncrypted<T>
where
    T: Serialize + DeserializeOwned + Debug,
{
    pub fn plain(element: T) -> Self {
        MaybeEncrypted::Plain(element)
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, MaybeEncrypted::Encrypted(_))
    }

    pub fn encrypt(&self, encryption_key: &EncryptionKey) -> Result<Self> {
        match self {
            MaybeEncrypted::Plain(plaintext) => {
                let cipher = get_cipher(encryption_key);
                let mut nonce_bytes = [0u8; 12]; // Suggested 96 bits
                thread_rng().fill(&mut nonce_bytes);
                let nonce = GenericArray::from_slice(&nonce_bytes);
                let plaintext = serde_json::to_vec(plaintext)?;
                let ciphertext = cipher.encrypt(nonce, &plaintext[..])?;
                let mut result = nonce_bytes.to_vec();
                result.extend(ciphertext);
                Ok(MaybeEncrypted::Encrypted(StringEncoding::new_base64(
                    &result,
                )))
            }
            MaybeEncrypted::Encrypted(_) => Err(Error::MaybeEncryptedWrongState),
        }
    }

    pub fn decrypt(&self, encryption_key: &EncryptionKey) -> Result<Self> {
        match self {
            MaybeEncrypted::Plain(_) => Err(Error::MaybeEncryptedWrongState),
            MaybeEncrypted::Encrypted(ciphertext) => {
                let cipher = get_cipher(encryption_key);
                let ciphertext = ciphertext.as_bytes()?;
                if ciphertext.len() < 12 {
                    return Err(Error::MaybeEncryptedWrongState);
                }
                let nonce = GenericArray::from_slice(&ciphertext[0..12]);
                let plaintext = cipher.decrypt(nonce, &ciphertext[12..]).map_err(|e| {
                    warn!("decryption failed {:?}", e);
                    Error::WrongEncryptionKey
                })?;
                let result = serde_json::from_slice(&plaintext)?;
                Ok(MaybeEncrypted::Plain(result))
            }
        }
    }

    /// Decrypt if needed and return the inner value
    pub fn into_plain(self, encryption_key: &EncryptionKey) -> Result<T> {
        let plain = match self {
            plain @ MaybeEncrypted::Plain(_) => plain,
            encrypted => encrypted.decrypt(encryption_key)?,
        };
        match plain {
            MaybeEncrypted::Plain(value) => Ok(value),
            MaybeEncrypted::Encrypted(_) => Err(Error::MaybeEncryptedWrongState),
        }
    }
}

fn get_cipher(encryption_key: &EncryptionKey) -> Aes256GcmSiv {
    let encryption_key = GenericArray::from_slice(&encryption_key[..]);
    Aes256GcmSiv::new(encryption_key)
}
