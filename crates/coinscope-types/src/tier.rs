//! Account tiers, credentials, and endpoint routing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base address of the public (demo) API.
const DEMO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Base address of the paid (pro) API.
const PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// API account tier.
///
/// The tier selects both the host and the name of the header that carries
/// the API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free demo account.
    #[default]
    Demo,
    /// Paid pro account.
    Pro,
}

impl Tier {
    /// Returns the tier as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Pro => "pro",
        }
    }

    /// Returns the base address and auth header for this tier.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Demo => Endpoint {
                base_url: DEMO_BASE_URL,
                auth_header: "x-cg-demo-api-key",
            },
            Self::Pro => Endpoint {
                base_url: PRO_BASE_URL,
                auth_header: "x-cg-pro-api-key",
            },
        }
    }

    /// Returns all tiers.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Demo, Self::Pro]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown tier name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tier: {0}. Valid options: demo, pro")]
pub struct TierParseError(pub String);

impl std::str::FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "pro" => Ok(Self::Pro),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Routing information for one tier: where to send requests and which
/// header carries the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Base address, without trailing slash.
    pub base_url: &'static str,
    /// Name of the authentication header.
    pub auth_header: &'static str,
}

impl Endpoint {
    /// Resolves routing for an optionally configured tier.
    ///
    /// An unconfigured tier resolves to [`Tier::Demo`].
    #[must_use]
    pub fn resolve(tier: Option<Tier>) -> Self {
        tier.unwrap_or_default().endpoint()
    }

    /// Joins the base address with an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// API credentials borrowed by each request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Raw API key. `None` sends unauthenticated requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Account tier.
    #[serde(default)]
    pub tier: Tier,
}

impl Credentials {
    /// Creates credentials with a key for the given tier.
    #[must_use]
    pub fn new(api_key: impl Into<String>, tier: Tier) -> Self {
        Self {
            api_key: Some(api_key.into()),
            tier,
        }
    }

    /// Creates credentials without a key.
    #[must_use]
    pub const fn anonymous(tier: Tier) -> Self {
        Self { api_key: None, tier }
    }

    /// Returns the API key if one is configured and non-empty.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Returns the routing for these credentials.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.tier.endpoint()
    }

    /// Returns the key with all but the last four characters hidden.
    #[must_use]
    pub fn masked_key(&self) -> Option<String> {
        self.api_key().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().min(4);
            let hidden = chars.len() - visible;
            let tail: String = chars[hidden..].iter().collect();
            format!("{}{}", "*".repeat(hidden), tail)
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_key())
            .field("tier", &self.tier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults_to_demo() {
        let endpoint = Endpoint::resolve(None);
        assert_eq!(endpoint, Tier::Demo.endpoint());
        assert_eq!(endpoint.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(endpoint.auth_header, "x-cg-demo-api-key");
    }

    #[test]
    fn test_endpoint_pro() {
        let endpoint = Endpoint::resolve(Some(Tier::Pro));
        assert_eq!(endpoint.base_url, "https://pro-api.coingecko.com/api/v3");
        assert_eq!(endpoint.auth_header, "x-cg-pro-api-key");
    }

    #[test]
    fn test_endpoint_url_join() {
        let endpoint = Tier::Demo.endpoint();
        assert_eq!(
            endpoint.url("/coins/markets"),
            "https://api.coingecko.com/api/v3/coins/markets"
        );
        assert_eq!(endpoint.url("ping"), "https://api.coingecko.com/api/v3/ping");
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("PRO".parse::<Tier>().unwrap(), Tier::Pro);
        assert_eq!(" demo ".parse::<Tier>().unwrap(), Tier::Demo);
        assert!("enterprise".parse::<Tier>().is_err());
    }

    #[test]
    fn test_empty_key_is_absent() {
        let creds = Credentials::new("", Tier::Demo);
        assert!(creds.api_key().is_none());
    }

    #[test]
    fn test_masked_key() {
        let creds = Credentials::new("CG-abcdef1234", Tier::Pro);
        assert_eq!(creds.masked_key().unwrap(), "*********1234");
        assert!(!format!("{creds:?}").contains("abcdef"));
    }

    #[test]
    fn test_credentials_json_defaults() {
        let creds: Credentials = serde_json::from_str("{}").unwrap();
        assert_eq!(creds, Credentials::anonymous(Tier::Demo));
    }
}
