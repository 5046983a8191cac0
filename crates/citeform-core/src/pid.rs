//! Persistent identifiers (DOI, Handle).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing a persistent identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PidError {
    #[error("malformed persistent identifier: {0:?}")]
    Malformed(String),
}

/// A `protocol:authority/identifier` triple, e.g. `doi:10.18150/ZENON`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersistentId {
    pub protocol: String,
    pub authority: String,
    pub identifier: String,
}

impl PersistentId {
    pub fn new(
        protocol: impl Into<String>,
        authority: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            authority: authority.into(),
            identifier: identifier.into(),
        }
    }

    /// Parse the `protocol:authority/identifier` form.
    ///
    /// The identifier may itself contain `/`; only the first one separates
    /// it from the authority.
    pub fn parse(s: &str) -> Result<Self, PidError> {
        let malformed = || PidError::Malformed(s.to_string());
        let (protocol, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (authority, identifier) = rest.split_once('/').ok_or_else(malformed)?;
        if protocol.is_empty() || authority.is_empty() || identifier.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(protocol, authority, identifier))
    }

    /// `protocol:authority/identifier`.
    pub fn as_string(&self) -> String {
        format!("{}:{}/{}", self.protocol, self.authority, self.identifier)
    }

    /// `authority/identifier`, the bare DOI form used by BibTeX and RIS.
    pub fn authority_path(&self) -> String {
        format!("{}/{}", self.authority, self.identifier)
    }

    /// Resolvable URL, if the protocol has a known resolver.
    pub fn to_url(&self) -> Option<String> {
        let resolver = match self.protocol.to_lowercase().as_str() {
            "doi" => "https://doi.org",
            "hdl" => "https://hdl.handle.net",
            _ => return None,
        };
        Some(format!("{}/{}", resolver, self.authority_path()))
    }
}

impl fmt::Display for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for PersistentId {
    type Err = PidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PersistentId {
    type Error = PidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PersistentId> for String {
    fn from(pid: PersistentId) -> Self {
        pid.as_string()
    }
}
