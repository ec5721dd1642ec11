//! Endpoints that may be called without an authenticated session

/// Establish a session
pub const LOGIN_PATH: &str = "/login";
/// End a session
pub const LOGOUT_PATH: &str = "/logout";
/// Renew a session from the refresh cookie
pub const REFRESH_PATH: &str = "/refresh";
/// Create an account
pub const REGISTER_PATH: &str = "/register";
/// Ask the server whether the current session is alive
pub const STATUS_PATH: &str = "/auth/status";

/// Fragments that are always public. Without them a failing refresh or
/// login would itself be gated or trigger another refresh.
const REQUIRED: [&str; 2] = [LOGIN_PATH, REFRESH_PATH];

const DEFAULTS: [&str; 5] = [
    LOGIN_PATH,
    LOGOUT_PATH,
    REFRESH_PATH,
    REGISTER_PATH,
    STATUS_PATH,
];

/// Set of path fragments exempt from the request gate and from
/// refresh-and-retry.
///
/// Matching is by substring: a request path is public when any fragment
/// occurs anywhere in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEndpoints {
    fragments: Vec<String>,
}

impl PublicEndpoints {
    /// The default set plus additional fragments
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut endpoints = Self::default();
        for fragment in extra {
            endpoints.insert(fragment);
        }
        endpoints
    }

    /// Only the fragments the refresh mechanism cannot work without
    pub fn minimal() -> Self {
        Self {
            fragments: REQUIRED.iter().map(ToString::to_string).collect(),
        }
    }

    /// Add a fragment; empty fragments are ignored since they would match
    /// every path
    pub fn insert(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() && !self.fragments.contains(&fragment) {
            self.fragments.push(fragment);
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.fragments
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }

    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }
}

impl Default for PublicEndpoints {
    fn default() -> Self {
        Self {
            fragments: DEFAULTS.iter().map(ToString::to_string).collect(),
        }
    }
}
