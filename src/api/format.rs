//! Small response-shaping helpers shared by handlers.

/// Mask an email for display in search results: keep the first character of
/// the local part and the full domain. The complete address never leaves
/// the server.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = &local[..local
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(local.len())];
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

/// Platform settings store their values as text; interpret the usual
/// spellings of "on" as true and everything else as false.
pub fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_the_first_local_character() {
        assert_eq!(mask_email("dana@example.com"), "d***@example.com");
        assert_eq!(mask_email("x@example.com"), "x***@example.com");
    }

    #[test]
    fn masking_survives_multibyte_local_parts() {
        assert_eq!(mask_email("éloise@example.com"), "é***@example.com");
    }

    #[test]
    fn degenerate_addresses_are_fully_masked() {
        assert_eq!(mask_email("@example.com"), "***");
        assert_eq!(mask_email("no-at-sign"), "***");
        assert_eq!(mask_email(""), "***");
    }

    #[test]
    fn recognizes_common_truthy_spellings() {
        for value in ["true", "TRUE", " t ", "1", "yes", "on"] {
            assert!(truthy(value), "{value:?} should be truthy");
        }
        for value in ["false", "0", "no", "off", "", "enabled"] {
            assert!(!truthy(value), "{value:?} should be falsy");
        }
    }
}
