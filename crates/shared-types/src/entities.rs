//! # Core Domain Entities
//!
//! Defines identity and document entities shared across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`
//! - **Content**: `ContentHash`
//! - **Documents**: `DocumentId`, `DocumentType`, `DocumentStatus`,
//!   `DocumentRecord`

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expiry sentinel stored by the ledger: "never expires".
pub const NO_EXPIRY: u64 = 0;

/// A 20-byte identity address for citizens and issuers.
///
/// Renders as lowercase `0x`-prefixed hex; parsing accepts the prefix as
/// optional and is case-insensitive, so addresses received from an upstream
/// layer compare equal regardless of casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Access the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] = bytes.try_into().map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 20,
            got: b.len(),
        })?;
        Ok(Self(array))
    }
}

/// A 32-byte SHA-256 content identifier returned by content-addressed storage.
///
/// Same content always yields the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Access the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 32,
            got: b.len(),
        })?;
        Ok(Self(array))
    }
}

/// Ledger-assigned document identifier.
///
/// Exists only after a successful ledger registration; there are no
/// client-chosen ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of identity document categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Aadhar,
    Pan,
    VoterId,
    DrivingLicense,
    Passport,
    BirthCertificate,
    Other,
}

impl DocumentType {
    /// Wire name used in metadata JSON and upstream payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aadhar => "aadhar",
            Self::Pan => "pan",
            Self::VoterId => "voter_id",
            Self::DrivingLicense => "driving_license",
            Self::Passport => "passport",
            Self::BirthCertificate => "birth_certificate",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aadhar" => Ok(Self::Aadhar),
            "pan" => Ok(Self::Pan),
            "voter_id" => Ok(Self::VoterId),
            "driving_license" => Ok(Self::DrivingLicense),
            "passport" => Ok(Self::Passport),
            "birth_certificate" => Ok(Self::BirthCertificate),
            "other" => Ok(Self::Other),
            unknown => Err(ParseError::UnknownDocumentType(unknown.to_string())),
        }
    }
}

/// Document lifecycle status.
///
/// `Pending` is entered only by a successful ledger registration.
/// `Verified` and `Rejected` are terminal; the ledger refuses any
/// transition out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl DocumentStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// The ledger's authoritative view of a document.
///
/// Ownership, content identifiers, and lifecycle fields all originate here;
/// projection rows are derived copies and may lag behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The submitting citizen. Immutable after registration.
    pub owner: Address,
    /// Declared document category.
    pub document_type: DocumentType,
    /// Content identifier of the prepared document bytes.
    pub content_hash: ContentHash,
    /// Content identifier of the metadata JSON.
    pub metadata_hash: ContentHash,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Expiry as Unix epoch seconds; [`NO_EXPIRY`] means "never expires".
    pub expiry: u64,
    /// Registration time as Unix epoch seconds.
    pub registered_at: u64,
    /// Issuer that verified the document, if verified.
    pub verified_by: Option<Address>,
    /// Verification time as Unix epoch seconds, if verified.
    pub verified_at: Option<u64>,
    /// Issuer that rejected the document, if rejected.
    pub rejected_by: Option<Address>,
    /// Rejection time as Unix epoch seconds, if rejected.
    pub rejected_at: Option<u64>,
    /// Reason supplied on rejection, if rejected.
    pub rejection_reason: Option<String>,
}

impl DocumentRecord {
    /// Expiry as an `Option`, mapping the ledger's zero sentinel to `None`.
    #[must_use]
    pub fn expires_at(&self) -> Option<u64> {
        (self.expiry != NO_EXPIRY).then_some(self.expiry)
    }

    /// Whether the document has expired at `now` (epoch seconds).
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}
