//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_HOST" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
            if value.chars().any(char::is_whitespace) {
                return Err("must not contain whitespace".into());
            }
        }
        "SERVER_PORT" => validate_int_range(value, 1, 65_535)?,
        "FETCH_TIMEOUT_SECS" => validate_int_range(value, 1, 300)?,
        "MAX_IMAGE_BYTES" => validate_int_range(value, 1024, 268_435_456)?,
        "MAX_CANVAS_PIXELS" => validate_int_range(value, 1, 1_000_000_000)?,
        "JPEG_QUALITY" => validate_int_range(value, 1, 100)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_server_port() {
        assert!(validate_setting("SERVER_PORT", "8080").is_ok());
        assert!(validate_setting("SERVER_PORT", "65535").is_ok());
        assert!(validate_setting("SERVER_PORT", "0").is_err());
        assert!(validate_setting("SERVER_PORT", "70000").is_err());
        assert!(validate_setting("SERVER_PORT", "http").is_err());
    }

    #[test]
    fn test_valid_server_host() {
        assert!(validate_setting("SERVER_HOST", "127.0.0.1").is_ok());
        assert!(validate_setting("SERVER_HOST", "").is_err());
        assert!(validate_setting("SERVER_HOST", "local host").is_err());
    }

    #[test]
    fn test_valid_jpeg_quality() {
        assert!(validate_setting("JPEG_QUALITY", "1").is_ok());
        assert!(validate_setting("JPEG_QUALITY", "100").is_ok());
        assert!(validate_setting("JPEG_QUALITY", "101").is_err());
        assert_eq!(
            validate_setting("JPEG_QUALITY", "0"),
            Err("must be between 1 and 100".to_string())
        );
    }

    #[test]
    fn test_valid_limits() {
        assert!(validate_setting("MAX_IMAGE_BYTES", "1048576").is_ok());
        assert!(validate_setting("MAX_IMAGE_BYTES", "10").is_err());
        assert!(validate_setting("MAX_CANVAS_PIXELS", "2.5").is_err());
        assert!(validate_setting("FETCH_TIMEOUT_SECS", "301").is_err());
    }

    #[test]
    fn test_unknown_key_is_accepted() {
        assert!(validate_setting("SOMETHING_ELSE", "whatever").is_ok());
    }
}
