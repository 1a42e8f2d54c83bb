//! Response status classification.

/// Result of classifying a response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Continue to body decoding.
    Pass,
    /// Short-circuit with this message; the body is never decoded.
    Fail(String),
}

/// Classify a status code. Only 4xx and 5xx fail.
pub fn classify(status: u16) -> Outcome {
    match status {
        400..=599 => Outcome::Fail(format!("Client returned {} status code", status)),
        _ => Outcome::Pass,
    }
}
