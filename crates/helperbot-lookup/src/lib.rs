//! Helperbot Lookup — HTTP adapters behind the core lookup traits.
//!
//! Every adapter takes a shared `reqwest::Client` (which carries the request
//! timeout) and a base URL, so tests can point it at a local server.

pub mod answer;
pub mod earthquake;
pub mod weather;

pub use answer::OpenAiAnswerClient;
pub use earthquake::P2pQuakeClient;
pub use weather::JmaWeatherClient;

use helperbot_core::lookup::LookupError;
use reqwest::Response;

/// `User-Agent` sent to public feeds.
pub const USER_AGENT: &str = concat!("helperbot/", env!("CARGO_PKG_VERSION"));

/// Maps a transport failure or non-success status to `LookupError`.
pub(crate) fn check_response(
    result: Result<Response, reqwest::Error>,
) -> Result<Response, LookupError> {
    let response = result.map_err(|e| LookupError::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(LookupError::Transport(format!("upstream returned {status}")))
    }
}
