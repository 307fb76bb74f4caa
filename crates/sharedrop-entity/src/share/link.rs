//! Share link value object.

use serde::{Deserialize, Serialize};

use sharedrop_core::types::ShareToken;

/// Path segment preceding the token in share URLs.
const SHARE_SEGMENT: &str = "/share/";

/// A share link for external access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    /// The full URL for accessing the share.
    pub url: String,
    /// The share token.
    pub token: ShareToken,
}

/// Extract a share token from either a bare token or a URL whose path ends
/// in `/share/<token>`.
pub fn parse_share_reference(input: &str) -> Option<ShareToken> {
    let input = input.trim();
    let candidate = match input.rfind(SHARE_SEGMENT) {
        Some(pos) => &input[pos + SHARE_SEGMENT.len()..],
        None if input.contains('/') => return None,
        None => input,
    };

    let token = candidate
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if token.is_empty() || token.contains('/') {
        None
    } else {
        Some(ShareToken::new(token))
    }
}
