use crate::utils::error::{ConvertError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConvertError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// SDIF codes are plain ASCII letters/digits of a bounded length.
pub fn validate_code(field_name: &str, value: &str, min_len: usize, max_len: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min_len || len > max_len {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Length must be between {} and {}", min_len, max_len),
        });
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Only ASCII letters and digits are allowed".to_string(),
        });
    }
    Ok(())
}

pub fn validate_max_len(field_name: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value is longer than {} characters", max_len),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ConvertError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ConvertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("touchpad.base_url", "https://example.com").is_ok());
        assert!(validate_url("touchpad.base_url", "http://example.com").is_ok());
        assert!(validate_url("touchpad.base_url", "").is_err());
        assert!(validate_url("touchpad.base_url", "invalid-url").is_err());
        assert!(validate_url("touchpad.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("team.lsc", "OD", 2, 2).is_ok());
        assert!(validate_code("team.lsc", "ODX", 2, 2).is_err());
        assert!(validate_code("team.code", "WW-S", 1, 5).is_err());
        assert!(validate_code("team.code", "WWST", 1, 5).is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("events.number", 12, 1, 999).is_ok());
        assert!(validate_range("events.number", 0, 1, 999).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("OD".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("team.lsc", &present).unwrap(), "OD");
        assert!(validate_required_field("team.lsc", &missing).is_err());
    }
}
