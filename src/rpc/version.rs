//! Server version descriptor and the authentication conventions derived from it

use crate::error::RpcError;
use serde::{Deserialize, Serialize};

/// Parsed server version plus the conventions it implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version string as reported by the server
    pub version: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,

    /// 7.2+: token goes in `Authorization: Bearer`, not in the body
    pub use_bearer_header: bool,

    /// 6.4+: `user.login` takes `username` instead of `user`
    pub use_username_field: bool,
}

impl VersionInfo {
    /// Parse a dotted version string such as `7.4.0` or `6.4`.
    ///
    /// Major and minor are required. A missing patch component is 0; a patch
    /// with a suffix (`0rc1`) keeps its leading digits.
    pub fn parse(version: &str) -> Result<Self, RpcError> {
        let invalid = || RpcError::InvalidVersion(version.to_string());

        let mut parts = version.trim().split('.');
        let major: u32 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let minor: u32 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let patch = parts.next().map(leading_number).unwrap_or(0);

        Ok(Self {
            version: version.to_string(),
            major,
            minor,
            patch,
            use_bearer_header: major > 7 || (major == 7 && minor >= 2),
            use_username_field: major > 6 || (major == 6 && minor >= 4),
        })
    }

    /// Name of the credential field expected by `user.login`
    pub fn login_field(&self) -> &'static str {
        if self.use_username_field {
            "username"
        } else {
            "user"
        }
    }
}

fn leading_number(part: &str) -> u32 {
    let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
