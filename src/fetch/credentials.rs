// src/fetch/credentials.rs

use crate::providers::HeaderSet;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ACCEPT: &str = "application/vnd.github.v3+json";
pub const USER_AGENT: &str = concat!("account-auditor/", env!("CARGO_PKG_VERSION"));

/// Ordered credentials with a cursor that only moves forward within a run.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialRotator {
    pub fn new(credentials: Vec<String>) -> Self {
        Self {
            credentials,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Request headers for the credential at the cursor. No Authorization
    /// header when the sequence is empty.
    pub fn headers(&self) -> HeaderSet {
        self.current().1
    }

    /// Cursor position together with the headers built from it, so a caller
    /// can later tell which credential a response belongs to.
    pub fn current(&self) -> (usize, HeaderSet) {
        let index = self.cursor();
        let mut headers: HeaderSet = vec![
            ("Accept", ACCEPT.to_string()),
            ("User-Agent", USER_AGENT.to_string()),
        ];
        if let Some(token) = self.credentials.get(index) {
            headers.push(("Authorization", format!("token {}", token)));
        }
        (index, headers)
    }

    /// Advance to the next credential. Returns false, leaving the cursor
    /// alone, when the current one is the last.
    pub fn rotate(&self) -> bool {
        let len = self.credentials.len();
        self.cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                if c + 1 < len {
                    Some(c + 1)
                } else {
                    None
                }
            })
            .is_ok()
    }

    /// Move past credential `observed`. When a concurrent request already
    /// rotated beyond it, nothing changes and the call still succeeds.
    pub fn advance_past(&self, observed: usize) -> bool {
        let len = self.credentials.len();
        self.cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                if c > observed {
                    Some(c)
                } else if c + 1 < len {
                    Some(c + 1)
                } else {
                    None
                }
            })
            .is_ok()
    }

    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}
