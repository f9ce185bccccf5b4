//! Server version encoding
//!
//! Version-dependent behavior is decided by comparing one integer:
//! `major * 10000 + minor * 100 + patch`. "5.4.0" becomes 50400, "3.0"
//! becomes 30000.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Integer-encoded server version
///
/// # Examples
///
/// ```rust
/// use zapi_core::ApiVersion;
///
/// let version: ApiVersion = "6.0.25".parse().unwrap();
/// assert_eq!(version.as_i64(), 60025);
/// assert!(version >= ApiVersion::V5_4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(i64);

impl ApiVersion {
    /// `user.login` takes `username` instead of `user` from here on
    pub const V5_4: ApiVersion = ApiVersion::new(5, 4, 0);

    /// The `auth` request member is removed from here on; only the bearer
    /// header authenticates
    pub const V7_2: ApiVersion = ApiVersion::new(7, 2, 0);

    /// Build a version from its parts
    pub const fn new(major: i64, minor: i64, patch: i64) -> Self {
        Self(major * 10000 + minor * 100 + patch)
    }

    /// Parse a dotted version string "X[.Y[.Z]]"
    ///
    /// Missing segments count as 0 and anything past the third segment is
    /// ignored. Each consulted segment must be a base-10 integer.
    pub fn parse(version: &str) -> Result<Self> {
        let mut parts = version.split('.');
        let mut segment = |weight: i64, required: bool| -> Result<i64> {
            match parts.next() {
                Some(part) => part
                    .parse::<i64>()
                    .map_err(|e| Error::Version(format!("{:?}: {}", version, e)))?
                    .checked_mul(weight)
                    .ok_or_else(|| Error::Version(format!("{:?}: segment out of range", version))),
                None if required => Err(Error::Version(format!("{:?}: empty", version))),
                None => Ok(0),
            }
        };

        let major = segment(10000, true)?;
        let minor = segment(100, false)?;
        let patch = segment(1, false)?;
        major
            .checked_add(minor)
            .and_then(|n| n.checked_add(patch))
            .map(Self)
            .ok_or_else(|| Error::Version(format!("{:?}: out of range", version)))
    }

    /// The encoded integer
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether this is the zero value used before negotiation
    pub fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ApiVersion> for i64 {
    fn from(version: ApiVersion) -> Self {
        version.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
