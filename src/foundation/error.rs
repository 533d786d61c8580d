pub type AtlasmendResult<T> = Result<T, AtlasmendError>;

#[derive(thiserror::Error, Debug)]
pub enum AtlasmendError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AtlasmendError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            AtlasmendError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            AtlasmendError::codec("x")
                .to_string()
                .contains("codec error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = AtlasmendError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
