/// Validation errors for inbound uploads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed})")]
    InvalidContentType {
        content_type: String,
        allowed: String,
    },

    #[error("Empty file")]
    EmptyFile,
}

/// Upload validator
///
/// Checks an upload's declared and actual size against the configured limit and
/// its media type against the single accepted container format.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: u64,
    accepted_content_type: String,
}

impl MediaValidator {
    pub fn new(max_file_size: u64, accepted_content_type: impl Into<String>) -> Self {
        Self {
            max_file_size,
            accepted_content_type: normalize_content_type(&accepted_content_type.into()),
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check a declared length before any bytes are read. Unknown lengths pass.
    pub fn validate_declared_size(&self, declared: Option<u64>) -> Result<(), ValidationError> {
        match declared {
            Some(size) if size > self.max_file_size => Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            }),
            _ => Ok(()),
        }
    }

    /// Check the number of bytes actually received
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the media type, ignoring parameters and case.
    ///
    /// Returns the normalized type on success.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, ValidationError> {
        let normalized = normalize_content_type(content_type);

        if normalized != self.accepted_content_type {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.accepted_content_type.clone(),
            });
        }

        Ok(normalized)
    }
}

/// `"Video/MP4; codecs=avc1"` -> `"video/mp4"`
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> MediaValidator {
        MediaValidator::new(1000, "video/mp4")
    }

    #[test]
    fn test_validate_file_size() {
        let v = validator();
        assert!(v.validate_file_size(1).is_ok());
        assert!(v.validate_file_size(1000).is_ok());
        assert!(matches!(
            v.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
        assert!(matches!(
            v.validate_file_size(1001),
            Err(ValidationError::FileTooLarge {
                size: 1001,
                max: 1000
            })
        ));
    }

    #[test]
    fn test_validate_declared_size() {
        let v = validator();
        assert!(v.validate_declared_size(None).is_ok());
        assert!(v.validate_declared_size(Some(1000)).is_ok());
        assert!(v.validate_declared_size(Some(1001)).is_err());
    }

    #[test]
    fn test_validate_content_type() {
        let v = validator();
        assert_eq!(v.validate_content_type("video/mp4").unwrap(), "video/mp4");
        assert_eq!(
            v.validate_content_type("Video/MP4; codecs=\"avc1.42E01E\"").unwrap(),
            "video/mp4"
        );
        assert!(v.validate_content_type("video/quicktime").is_err());
        assert!(v.validate_content_type("image/png").is_err());
        assert!(v.validate_content_type("").is_err());
    }
}
