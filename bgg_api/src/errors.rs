//! Error types for the BoardGameGeek client.

/// Errors that can occur when talking to BoardGameGeek.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("Request failed")]
    RequestFailed,
    /// The body arrived but is not the expected JSON. Retrying will not help.
    #[error("Response could not be decoded")]
    Decode,
    /// The server answered with a non-success status. `body` holds a snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::RequestFailed => true,
            Error::Decode => false,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_and_server_failures_are_transient() {
        assert!(Error::RequestFailed.is_transient());
        assert!(Error::HttpStatus { status: 429, body: String::new() }.is_transient());
        assert!(Error::HttpStatus { status: 502, body: String::new() }.is_transient());
        assert!(!Error::HttpStatus { status: 404, body: String::new() }.is_transient());
        assert!(!Error::Decode.is_transient());
    }
}
