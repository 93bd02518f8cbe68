//! Status code to message tables.

use std::collections::HashMap;

use axum::http::StatusCode;

/// Message used when a table has no entry even for 500.
const FALLBACK_MESSAGE: &str = "Internal Server Error";

/// Maps status codes to the message text shown on their error pages.
///
/// Tables are meant to be filled in at startup and treated as read-only once
/// the service is serving traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessages {
    table: HashMap<StatusCode, String>,
}

impl StatusMessages {
    /// An empty table. Every lookup degrades to the hardcoded 500 message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the canonical reason phrase of every 4xx
    /// and 5xx code that has one, 418 included.
    pub fn standard() -> Self {
        let table = (400..600)
            .filter_map(|code| {
                let code = StatusCode::from_u16(code).ok()?;
                Some((code, code.canonical_reason()?.to_owned()))
            })
            .collect();
        Self { table }
    }

    /// Sets the message for `code`, replacing any existing entry.
    pub fn insert(&mut self, code: StatusCode, message: impl Into<String>) {
        self.table.insert(code, message.into());
    }

    /// Chainable [`insert`](Self::insert).
    pub fn with(mut self, code: StatusCode, message: impl Into<String>) -> Self {
        self.insert(code, message);
        self
    }

    /// The message for exactly `code`, if one is set.
    pub fn get(&self, code: StatusCode) -> Option<&str> {
        self.table.get(&code).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusCode, &str)> {
        self.table.iter().map(|(code, text)| (*code, text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// The code and message to render for `code`.
    ///
    /// Prefer this over [`get`](Self::get): it never comes back empty. A code
    /// with no entry is treated as an internal error and resolves to the 500
    /// entry; if even that is missing, `"Internal Server Error"` is used.
    pub fn message(&self, code: StatusCode) -> (StatusCode, &str) {
        if let Some(message) = self.get(code) {
            return (code, message);
        }
        let code = StatusCode::INTERNAL_SERVER_ERROR;
        (code, self.get(code).unwrap_or(FALLBACK_MESSAGE))
    }
}
