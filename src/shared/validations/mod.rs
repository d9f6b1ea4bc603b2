//! Field checks shared by services and request DTOs

/// Minimal e-mail sanity check: one `@`, non-empty local part, a dot in the domain.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Usernames: 3–50 chars of letters, digits, `_`, `-` or `.`.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=50).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_checks() {
        assert!(is_plausible_email("loofgodd@rot.com"));
        assert!(!is_plausible_email("no-at-sign"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a b@rot.com"));
        assert!(!is_plausible_email("@rot.com"));
    }

    #[test]
    fn username_checks() {
        assert!(is_valid_username("loofgodd"));
        assert!(is_valid_username("cafe.fan_01"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
    }
}
