// Session token storage
// The gateway only sees the `SessionStore` trait; the binary persists to a JSON file

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use super::types::{SessionTokens, TokenKind};
use crate::error::{ApiError, Result};

/// Durable key-value storage for the two session tokens
pub trait SessionStore: Send + Sync {
    /// Read one token
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;

    /// Write one token, leaving the other untouched
    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    /// Remove both tokens
    fn clear(&self) -> Result<()>;

    fn access_token(&self) -> Result<Option<String>> {
        self.get(TokenKind::Access)
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        self.get(TokenKind::Refresh)
    }

    /// Store a freshly issued pair
    fn save_pair(&self, access: &str, refresh: &str) -> Result<()> {
        self.set(TokenKind::Access, access)?;
        self.set(TokenKind::Refresh, refresh)
    }
}

fn slot(tokens: &mut SessionTokens, kind: TokenKind) -> &mut Option<String> {
    match kind {
        TokenKind::Access => &mut tokens.access_token,
        TokenKind::Refresh => &mut tokens.refresh_token,
    }
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<SessionTokens>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    /// Snapshot of both tokens
    pub fn snapshot(&self) -> SessionTokens {
        match self.tokens.read() {
            Ok(tokens) => tokens.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let mut tokens = self
            .tokens
            .read()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?
            .clone();
        Ok(slot(&mut tokens, kind).take())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?;
        *slot(&mut tokens, kind) = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?;
        *tokens = SessionTokens::default();
        Ok(())
    }
}

/// Store backed by a JSON file, surviving restarts of the client
pub struct FileSessionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<SessionTokens> {
        if !self.path.exists() {
            return Ok(SessionTokens::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(SessionTokens::default());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))
    }

    fn persist(&self, tokens: &SessionTokens) -> anyhow::Result<()> {
        if tokens.is_empty() {
            return self.remove();
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(tokens)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write session file: {}", tmp.display()))?;
        restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace session file: {}", self.path.display()))?;
        Ok(())
    }

    fn remove(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))
    }
}

fn to_session_error(e: anyhow::Error) -> ApiError {
    ApiError::Session(format!("{:#}", e))
}

impl SessionStore for FileSessionStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let _guard = self.guard()?;
        let mut tokens = self.load().map_err(to_session_error)?;
        Ok(slot(&mut tokens, kind).take())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut tokens = self.load().map_err(to_session_error)?;
        *slot(&mut tokens, kind) = Some(value.to_string());
        self.persist(&tokens).map_err(to_session_error)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.guard()?;
        self.remove().map_err(to_session_error)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
