use super::error::{AppError, AppResult};

/// Trims the URL and checks for an `http://` or `https://` prefix, ignoring case.
/// The trimmed string is returned as is.
pub fn validate_url(raw: &str) -> AppResult<&str> {
    let url = raw.trim();
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if !has_scheme {
        return Err(AppError::Validation("invalid or missing URL".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod validate_url_tests {
    use test_case::test_case;

    use super::validate_url;
    use crate::cli::error::AppError;

    #[test_case("https://example.com", "https://example.com")]
    #[test_case("http://example.com", "http://example.com")]
    #[test_case("  HTTPS://Example.com/a?b=c  ", "HTTPS://Example.com/a?b=c")]
    #[test_case("\thttp://x\n", "http://x")]
    #[test_case("HtTp://", "HtTp://")]
    #[test_case("https://exa mple.com/é", "https://exa mple.com/é")]
    fn test_accepts(raw: &str, expected: &str) {
        assert_eq!(validate_url(raw).unwrap(), expected);
    }

    #[test_case("not-a-url")]
    #[test_case("")]
    #[test_case("   ")]
    #[test_case("ftp://example.com")]
    #[test_case("example.com")]
    #[test_case("http:/example.com")]
    #[test_case("https:example.com")]
    #[test_case("xhttps://example.com")]
    #[test_case("é")]
    fn test_rejects(raw: &str) {
        let err = validate_url(raw).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "validation error: invalid or missing URL");
    }
}
