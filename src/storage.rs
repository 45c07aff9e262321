//! Session Store Module
//!
//! Persists the auth token across restarts. Data is encrypted at rest
//! with Windows DPAPI; on other platforms it is written as-is.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[cfg(windows)]
use windows::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
};

const TOKEN_FILE: &str = "user_token.dat";

/// The persisted record: the opaque token plus when it was written.
/// `saved_at` is diagnostic only, tokens do not expire here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// Single-key persisted store for the auth token.
pub struct SessionStore {
    storage_path: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at the platform-local data directory.
    pub fn new() -> Self {
        let storage_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("WearCity");

        Self::at(storage_path)
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(storage_path: PathBuf) -> Self {
        // Ensure directory exists
        if let Err(e) = std::fs::create_dir_all(&storage_path) {
            error!("Failed to create storage directory: {}", e);
        }

        debug!("Session store initialized at: {:?}", storage_path);

        Self { storage_path }
    }

    /// Persist the token. Overwrites any previous record.
    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        let record = TokenRecord {
            token: token.to_string(),
            saved_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let protected = protect(json.as_bytes())?;

        std::fs::write(self.token_path(), protected)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        info!("Persisted auth token ({} chars)", token.len());
        Ok(())
    }

    /// Read the persisted token. `Ok(None)` when nothing is stored.
    pub fn load_token(&self) -> Result<Option<String>, StorageError> {
        let path = self.token_path();

        if !path.exists() {
            debug!("No persisted token found");
            return Ok(None);
        }

        let protected = std::fs::read(&path).map_err(|e| StorageError::Io(e.to_string()))?;

        let plain = unprotect(&protected)?;

        let json =
            String::from_utf8(plain).map_err(|e| StorageError::Decryption(e.to_string()))?;

        let record: TokenRecord =
            serde_json::from_str(&json).map_err(|e| StorageError::Serialization(e.to_string()))?;

        debug!("Loaded persisted token saved at {}", record.saved_at);
        Ok(Some(record.token))
    }

    /// Delete the persisted token, if any.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        let path = self.token_path();

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| StorageError::Io(e.to_string()))?;
            info!("Cleared persisted auth token");
        }

        Ok(())
    }

    /// Check if a token record exists on disk
    pub fn has_token(&self) -> bool {
        self.token_path().exists()
    }

    fn token_path(&self) -> PathBuf {
        self.storage_path.join(TOKEN_FILE)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
fn protect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    use std::ptr::null_mut;

    let input = CRYPT_INTEGER_BLOB {
        cbData: data.len() as u32,
        pbData: data.as_ptr() as *mut u8,
    };

    let mut output = CRYPT_INTEGER_BLOB {
        cbData: 0,
        pbData: null_mut(),
    };

    unsafe {
        let result = CryptProtectData(
            &input,
            None,
            None,
            None,
            None,
            CRYPTPROTECT_UI_FORBIDDEN,
            &mut output,
        );

        if result.is_err() {
            return Err(StorageError::Encryption("DPAPI encryption failed".into()));
        }

        let protected =
            std::slice::from_raw_parts(output.pbData, output.cbData as usize).to_vec();

        // Free the memory allocated by CryptProtectData
        windows::Win32::Foundation::LocalFree(windows::Win32::Foundation::HLOCAL(
            output.pbData as *mut std::ffi::c_void,
        ));

        Ok(protected)
    }
}

#[cfg(windows)]
fn unprotect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    use std::ptr::null_mut;

    let input = CRYPT_INTEGER_BLOB {
        cbData: data.len() as u32,
        pbData: data.as_ptr() as *mut u8,
    };

    let mut output = CRYPT_INTEGER_BLOB {
        cbData: 0,
        pbData: null_mut(),
    };

    unsafe {
        let result = CryptUnprotectData(
            &input,
            None,
            None,
            None,
            None,
            CRYPTPROTECT_UI_FORBIDDEN,
            &mut output,
        );

        if result.is_err() {
            return Err(StorageError::Decryption("DPAPI decryption failed".into()));
        }

        let plain = std::slice::from_raw_parts(output.pbData, output.cbData as usize).to_vec();

        // Free the memory allocated by CryptUnprotectData
        windows::Win32::Foundation::LocalFree(windows::Win32::Foundation::HLOCAL(
            output.pbData as *mut std::ffi::c_void,
        ));

        Ok(plain)
    }
}

#[cfg(not(windows))]
fn protect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    Ok(data.to_vec())
}

#[cfg(not(windows))]
fn unprotect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    Ok(data.to_vec())
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().to_path_buf());

        assert!(store.load_token().unwrap().is_none());

        store.save_token("abc123").unwrap();
        assert!(store.has_token());
        assert_eq!(store.load_token().unwrap().as_deref(), Some("abc123"));

        store.clear_token().unwrap();
        assert!(!store.has_token());
        assert!(store.load_token().unwrap().is_none());
    }

    #[test]
    fn clear_without_token_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().to_path_buf());

        store.clear_token().unwrap();
        store.clear_token().unwrap();
    }

    #[cfg(not(windows))]
    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().to_path_buf());

        std::fs::write(dir.path().join(TOKEN_FILE), b"not json").unwrap();
        assert!(store.load_token().is_err());
    }
}
