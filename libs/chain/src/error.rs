use std::error::Error;

use alloy::transports::TransportError;
use alloy::transports::http::reqwest;

/// Whether a failed call ran out of time, either in the HTTP client or upstream.
pub fn is_timeout(err: &TransportError) -> bool {
    let mut source: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout) {
            return true;
        }
        let message = e.to_string().to_lowercase();
        if message.contains("timeout") || message.contains("timed out") || message.contains("took too long")
        {
            return true;
        }
        source = e.source();
    }
    false
}
