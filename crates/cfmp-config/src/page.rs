//! The `PAGE` section of the config file

use crate::error::{ConfigError, Result};
use crate::file::PAGE_SECTION;
use cfmp_worker::PageConfig;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw `PAGE` section; `null` and missing keys both land as `None`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct PageSection {
    status_code: Option<Integer>,
    title: Option<String>,
    message: Option<String>,
    expected_completion_iso: Option<String>,
    retry_after_seconds: Option<Integer>,
    contact_email: Option<String>,
    status_page: Option<String>,
    bypass_value: Option<String>,
}

/// A JSON number, or a string holding one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Integer {
    Number(u64),
    Text(String),
}

/// Parse and validate page settings
///
/// `STATUS_CODE`, `TITLE`, `MESSAGE`, `RETRY_AFTER_SECONDS` and
/// `CONTACT_EMAIL` are required; the rest may be absent, `null` or empty.
pub fn parse_page_config(section: Option<&Map<String, Value>>) -> Result<PageConfig> {
    let section = section.ok_or_else(|| ConfigError::MissingField(PAGE_SECTION.to_string()))?;
    let page: PageSection = serde_json::from_value(Value::Object(section.clone()))
        .map_err(|e| ConfigError::invalid(PAGE_SECTION, e.to_string()))?;

    let status_code = required_integer(page.status_code, "STATUS_CODE")?;
    if !(200..=599).contains(&status_code) {
        return Err(ConfigError::invalid(
            key("STATUS_CODE"),
            format!("{} is not an HTTP status between 200 and 599", status_code),
        ));
    }

    Ok(PageConfig {
        status_code: status_code as u16,
        title: required(page.title, "TITLE")?,
        message: required(page.message, "MESSAGE")?,
        expected_completion_iso: non_empty(page.expected_completion_iso),
        retry_after_seconds: required_integer(page.retry_after_seconds, "RETRY_AFTER_SECONDS")?,
        contact_email: required(page.contact_email, "CONTACT_EMAIL")?,
        status_page: non_empty(page.status_page),
        bypass_value: non_empty(page.bypass_value),
    })
}

fn key(name: &str) -> String {
    format!("{}.{}", PAGE_SECTION, name)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| ConfigError::MissingField(key(name)))
}

fn required_integer(value: Option<Integer>, name: &str) -> Result<u64> {
    match value.ok_or_else(|| ConfigError::MissingField(key(name)))? {
        Integer::Number(n) => Ok(n),
        Integer::Text(text) => text.trim().parse().map_err(|_| {
            ConfigError::invalid(key(name), format!("expected an integer, found {:?}", text))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn full_section() -> Map<String, Value> {
        section(json!({
            "STATUS_CODE": 503,
            "TITLE": "Down for maintenance",
            "MESSAGE": "Back soon",
            "EXPECTED_COMPLETION_ISO": "2028-01-01T00:00:00Z",
            "RETRY_AFTER_SECONDS": 600,
            "CONTACT_EMAIL": "ops@example.com",
            "STATUS_PAGE": "https://status.example.com",
            "BYPASS_VALUE": "letme123"
        }))
    }

    #[test]
    fn test_parse_full_page() {
        let page = parse_page_config(Some(&full_section())).unwrap();

        assert_eq!(page.status_code, 503);
        assert_eq!(page.title, "Down for maintenance");
        assert_eq!(page.retry_after_seconds, 600);
        assert_eq!(page.status_page.as_deref(), Some("https://status.example.com"));
        assert_eq!(page.bypass(), Some("letme123"));
    }

    #[test]
    fn test_optional_fields_null_or_empty() {
        let mut values = full_section();
        values.insert("EXPECTED_COMPLETION_ISO".into(), Value::Null);
        values.insert("STATUS_PAGE".into(), json!(""));
        values.remove("BYPASS_VALUE");

        let page = parse_page_config(Some(&values)).unwrap();

        assert_eq!(page.expected_completion_iso, None);
        assert_eq!(page.status_page, None);
        assert_eq!(page.bypass_value, None);
    }

    #[test]
    fn test_missing_title() {
        let mut values = full_section();
        values.remove("TITLE");

        match parse_page_config(Some(&values)) {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "PAGE.TITLE"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_section() {
        assert!(matches!(
            parse_page_config(None),
            Err(ConfigError::MissingField(field)) if field == "PAGE"
        ));
    }

    #[test]
    fn test_status_code_range() {
        for code in [199, 600, 1000] {
            let mut values = full_section();
            values.insert("STATUS_CODE".into(), json!(code));

            assert!(matches!(
                parse_page_config(Some(&values)),
                Err(ConfigError::InvalidField { key, .. }) if key == "PAGE.STATUS_CODE"
            ));
        }
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut values = full_section();
        values.insert("STATUS_CODE".into(), json!("502"));
        values.insert("RETRY_AFTER_SECONDS".into(), json!(" 120 "));

        let page = parse_page_config(Some(&values)).unwrap();
        assert_eq!(page.status_code, 502);
        assert_eq!(page.retry_after_seconds, 120);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let mut values = full_section();
        values.insert("RETRY_AFTER_SECONDS".into(), json!(-5));
        assert!(matches!(
            parse_page_config(Some(&values)),
            Err(ConfigError::InvalidField { .. })
        ));

        let mut values = full_section();
        values.insert("TITLE".into(), json!(42));
        assert!(matches!(
            parse_page_config(Some(&values)),
            Err(ConfigError::InvalidField { key, .. }) if key == "PAGE"
        ));

        let mut values = full_section();
        values.insert("RETRY_AFTER_SECONDS".into(), json!("soon"));
        assert!(matches!(
            parse_page_config(Some(&values)),
            Err(ConfigError::InvalidField { key, .. }) if key == "PAGE.RETRY_AFTER_SECONDS"
        ));
    }

    #[test]
    fn test_empty_required_string_is_missing() {
        let mut values = full_section();
        values.insert("CONTACT_EMAIL".into(), json!(""));

        assert!(matches!(
            parse_page_config(Some(&values)),
            Err(ConfigError::MissingField(field)) if field == "PAGE.CONTACT_EMAIL"
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut values = full_section();
        values.insert("THEME".into(), json!("dark"));

        assert!(parse_page_config(Some(&values)).is_ok());
    }
}
