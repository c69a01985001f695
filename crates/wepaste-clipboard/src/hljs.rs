//! External highlighter stylesheet fetch.
//!
//! The code blocks carry highlighter classes; their colors live in a
//! stylesheet served from a CDN. Fetching it is best-effort with no retry:
//! on any failure the contribution degrades to an empty string and the
//! paste simply ships uncolored code.

use std::time::Duration;

use tracing::warn;
use ureq::Agent;

/// Fetch timeout for the stylesheet request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the highlighter stylesheet, degrading to empty CSS on failure.
#[must_use]
pub fn fetch_highlight_css(url: &str) -> String {
    match try_fetch(url) {
        Ok(css) => css,
        Err(err) => {
            warn!("failed to fetch highlighter styles from {url}: {err}");
            String::new()
        }
    }
}

fn try_fetch(url: &str) -> Result<String, ureq::Error> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();
    let mut body = agent.get(url).call()?.into_body();
    body.read_to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_degrades_to_empty() {
        let css = fetch_highlight_css("not a url");
        assert_eq!(css, "");
    }
}
