//! Push payload assembly and basic-auth credentials.

use base64::Engine as _;
use std::fmt;

/// Username/password pair for the push target.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    user: String,
    pass: String,
}

impl BasicAuth {
    /// Only a pair with both halves set produces credentials.
    pub fn from_parts(user: &str, pass: &str) -> Option<Self> {
        if user.is_empty() || pass.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            pass: pass.to_string(),
        })
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.user, self.pass).as_bytes());
        format!("Basic {}", token)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// One POST to the push target.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub body: Vec<u8>,
    pub auth: Option<BasicAuth>,
}

/// Scraped body, then a newline and the fragment when there is one.
pub fn build_push_payload(mut scrape_body: Vec<u8>, fragment: &[u8]) -> Vec<u8> {
    if !fragment.is_empty() {
        scrape_body.reserve(fragment.len() + 1);
        scrape_body.push(b'\n');
        scrape_body.extend_from_slice(fragment);
    }
    scrape_body
}
