//! Remote transport selection and credential material.
//!
//! The remote URL decides the transport: `git@` prefixed URLs use SSH with
//! the configured in-memory private key, `https://` URLs use basic auth.
//! Anything else is rejected before a single network call is made.

use std::io::Write as _;
use std::path::PathBuf;

use git2::{CertificateCheckStatus, Cred, RemoteCallbacks};
use tempfile::NamedTempFile;

use crate::config::GitConfig;
use crate::error::{ReleaseNotesError, Result};

/// Authentication material for the configured remote.
#[derive(Debug, Clone)]
pub enum Credentials {
    Ssh { private_key: String },
    Https { username: String, password: String },
}

impl Credentials {
    /// Inspects the remote URL and picks the matching credential set.
    ///
    /// # Errors
    /// * [ReleaseNotesError::UnsupportedTransport] - URL is neither
    ///   `git@`- nor `https://`-prefixed
    /// * [ReleaseNotesError::Initialization] - the URL or the credential
    ///   material required by its transport is missing
    pub fn from_config(config: &GitConfig) -> Result<Self> {
        let url = config.repo_url.as_str();
        if url.is_empty() {
            return Err(ReleaseNotesError::initialization(
                "GIT_REPO_URL must be set to reach the repository",
            ));
        }

        if url.starts_with("git@") {
            match &config.private_key {
                Some(key) if !key.is_empty() => Ok(Credentials::Ssh {
                    private_key: key.clone(),
                }),
                _ => Err(ReleaseNotesError::initialization(
                    "SSH transport requires GIT_PRIVATE_KEY for a git@ remote URL",
                )),
            }
        } else if url.starts_with("https://") {
            match (&config.username, &config.password) {
                (Some(username), Some(password)) => Ok(Credentials::Https {
                    username: username.clone(),
                    password: password.clone(),
                }),
                _ => Err(ReleaseNotesError::initialization(
                    "HTTPS transport requires GIT_USERNAME and GIT_PASSWORD for an https:// remote URL",
                )),
            }
        } else {
            Err(ReleaseNotesError::UnsupportedTransport(url.to_string()))
        }
    }

    /// Stages the credential material for one network operation.
    ///
    /// For SSH the private key is written to a temporary file that lives
    /// exactly as long as the returned session and is removed on drop.
    pub fn session(&self) -> Result<TransportSession> {
        match self {
            Credentials::Ssh { private_key } => {
                let mut key_file = NamedTempFile::new()?;
                key_file.write_all(private_key.as_bytes())?;
                key_file.flush()?;
                let key_path = key_file.path().to_path_buf();
                Ok(TransportSession {
                    auth: SessionAuth::SshKey(key_path),
                    _key_file: Some(key_file),
                })
            }
            Credentials::Https { username, password } => Ok(TransportSession {
                auth: SessionAuth::Password(username.clone(), password.clone()),
                _key_file: None,
            }),
        }
    }
}

enum SessionAuth {
    SshKey(PathBuf),
    Password(String, String),
}

/// Credential material staged for a single clone or push.
pub struct TransportSession {
    auth: SessionAuth,
    _key_file: Option<NamedTempFile>,
}

impl TransportSession {
    /// Builds remote callbacks wired to this session's credentials.
    ///
    /// Host-key checking is disabled for SSH remotes; the clone runs in
    /// throwaway CI environments with no known_hosts to consult.
    pub fn callbacks(&self) -> RemoteCallbacks<'static> {
        let mut callbacks = RemoteCallbacks::new();

        match &self.auth {
            SessionAuth::SshKey(key_path) => {
                let key_path = key_path.clone();
                callbacks.credentials(move |_url, username_from_url, _allowed_types| {
                    Cred::ssh_key(username_from_url.unwrap_or("git"), None, &key_path, None)
                });
                callbacks.certificate_check(|_cert, _hostname| {
                    Ok(CertificateCheckStatus::CertificateOk)
                });
            }
            SessionAuth::Password(username, password) => {
                let username = username.clone();
                let password = password.clone();
                callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
                    Cred::userpass_plaintext(&username, &password)
                });
            }
        }

        callbacks
    }
}
