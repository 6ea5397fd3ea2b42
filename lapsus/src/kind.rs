//! Error kinds for lapsus errors

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The semantic category of an error.
///
/// The set is closed: every kind has exactly one name and one numeric code,
/// and unknown names or codes always resolve to [`Kind::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum Kind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Catch-all for errors without a more specific category
    #[default]
    General = 0,

    // =========================================================================
    // Access errors
    // =========================================================================
    /// The caller could not be identified
    Authentication = 1,

    /// The caller is not allowed to perform the operation
    Authorization = 2,

    // =========================================================================
    // Input errors
    // =========================================================================
    /// The request is malformed
    BadRequest = 3,

    /// The request is well-formed but fails validation
    Validation = 4,

    // =========================================================================
    // State errors
    // =========================================================================
    /// The requested entity does not exist
    NotFound = 5,

    /// The entity being created already exists
    AlreadyExists = 6,

    /// A quota or rate limit was hit
    LimitExceeded = 7,

    /// Stored state contradicts itself
    Inconsistent = 8,

    // =========================================================================
    // Backend errors
    // =========================================================================
    /// The storage layer failed
    Persistence = 9,

    /// Internal infrastructure failed
    Infrastructure = 10,

    /// An external service failed
    ThirdParties = 11,

    /// The operation did not finish in time
    Timeout = 12,
}

impl Kind {
    /// Every kind, in code order.
    pub const ALL: [Kind; 13] = [
        Kind::General,
        Kind::Authentication,
        Kind::Authorization,
        Kind::BadRequest,
        Kind::Validation,
        Kind::NotFound,
        Kind::AlreadyExists,
        Kind::LimitExceeded,
        Kind::Inconsistent,
        Kind::Persistence,
        Kind::Infrastructure,
        Kind::ThirdParties,
        Kind::Timeout,
    ];

    /// Returns the canonical name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::General => "General",
            Kind::Authentication => "Authentication",
            Kind::Authorization => "Authorization",
            Kind::BadRequest => "BadRequest",
            Kind::Validation => "Validation",
            Kind::NotFound => "NotFound",
            Kind::AlreadyExists => "AlreadyExists",
            Kind::LimitExceeded => "LimitExceeded",
            Kind::Inconsistent => "Inconsistent",
            Kind::Persistence => "Persistence",
            Kind::Infrastructure => "Infrastructure",
            Kind::ThirdParties => "ThirdParties",
            Kind::Timeout => "Timeout",
        }
    }

    /// Returns the numeric code of the kind
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Parses a kind name. Unknown names yield [`Kind::General`].
    pub fn parse(name: &str) -> Kind {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or_default()
    }

    /// Looks a kind up by code. Unknown codes yield [`Kind::General`].
    pub fn from_code(code: u16) -> Kind {
        Kind::ALL.get(usize::from(code)).copied().unwrap_or_default()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Kind::parse(name)
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Kind::parse(&name))
    }
}
