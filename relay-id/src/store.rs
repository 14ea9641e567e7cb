//! Durable load-or-create storage of the node identity.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{IdentityError, Result};
use crate::record::{IdentityRecord, generate_identity};

/// File name used when no path is configured, relative to the working
/// directory.
pub const DEFAULT_KEY_FILE: &str = "key.toml";

/// Outcome of reading the identity file. Only `Missing` may lead to a new
/// identity being minted.
#[derive(Debug)]
enum Stored {
    Found(Vec<u8>),
    Missing,
}

/// Location of a node's identity file and how to load it.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
    verify_pairing: bool,
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FILE)
    }
}

impl KeyStore {
    /// Pairing verification is on by default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            verify_pairing: true,
        }
    }

    /// Whether to check on load that the stored public key is derived from the
    /// stored private key.
    pub fn verify_pairing(mut self, verify: bool) -> Self {
        self.verify_pairing = verify;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the identity, or generates and persists a new one if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Any read failure other than "not found" is
    /// [`IdentityError::StorageReadError`]; a new identity is never created in
    /// that case. Decoding and write failures are returned as-is.
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    pub fn obtain_identity(&self) -> Result<IdentityRecord> {
        match self.read()? {
            Stored::Found(bytes) => self.parse(&bytes),
            Stored::Missing => {
                tracing::info!("No identity file found, generating new identity");
                let record = generate_identity()?;
                self.persist_identity(&record)?;
                tracing::info!(
                    id52 = %record.public_key().id52(),
                    peer_id = %record.public_key().peer_id(),
                    "Generated and saved new identity"
                );
                Ok(record)
            }
        }
    }

    /// Loads an existing identity and never creates one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdentityNotFound`] if the file is missing.
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    pub fn load_identity(&self) -> Result<IdentityRecord> {
        match self.read()? {
            Stored::Found(bytes) => self.parse(&bytes),
            Stored::Missing => Err(IdentityError::IdentityNotFound {
                path: self.path.clone(),
            }),
        }
    }

    /// Writes the record's text fields to the identity file.
    ///
    /// The document goes to a temporary file in the same directory first and
    /// is renamed over the target, so a crash never leaves a half-written
    /// identity behind. On unix the file is readable by its owner only.
    pub fn persist_identity(&self, record: &IdentityRecord) -> Result<()> {
        let unavailable = |source: std::io::Error| IdentityError::StorageUnavailable {
            path: self.path.clone(),
            source,
        };

        let document = record
            .to_document()
            .map_err(|e| unavailable(std::io::Error::other(e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(unavailable)?;

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(unavailable)?;
        file.write_all(document.as_bytes()).map_err(unavailable)?;
        file.as_file().sync_all().map_err(unavailable)?;
        set_owner_only(file.path()).map_err(unavailable)?;
        file.persist(&self.path).map_err(|e| unavailable(e.error))?;

        tracing::debug!(path = %self.path.display(), "Identity file written");
        Ok(())
    }

    fn read(&self) -> Result<Stored> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Stored::Found(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Stored::Missing),
            Err(source) => Err(IdentityError::StorageReadError {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<IdentityRecord> {
        warn_if_exposed(&self.path);
        let record = IdentityRecord::from_document(bytes, &self.path, self.verify_pairing)?;
        tracing::info!(
            id52 = %record.public_key().id52(),
            peer_id = %record.public_key().peer_id(),
            "Loaded existing identity"
        );
        Ok(record)
    }
}

/// Loads or creates the identity at [`DEFAULT_KEY_FILE`].
pub fn obtain_identity() -> Result<IdentityRecord> {
    KeyStore::default().obtain_identity()
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn warn_if_exposed(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode & 0o777),
                "Identity file is accessible to other users; consider chmod 600"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_exposed(_path: &Path) {}
