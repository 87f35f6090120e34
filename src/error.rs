/// Failures surfaced to the user. Anything else that reaches `main` is
/// reported as `INTERNAL`.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    RequestFailed(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::RequestFailed(_) => "REQUEST_FAILED",
            CliError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<CliError>()
        .map(CliError::code)
        .unwrap_or("INTERNAL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_variant() {
        let e: anyhow::Error = CliError::RequestFailed("Upload failed: boom".into()).into();
        assert_eq!(error_code(&e), "REQUEST_FAILED");
        assert_eq!(e.to_string(), "Upload failed: boom");
        let e: anyhow::Error = CliError::InvalidInput("empty batch".into()).into();
        assert_eq!(error_code(&e), "INVALID_INPUT");
        assert_eq!(error_code(&anyhow::anyhow!("other")), "INTERNAL");
    }
}
