/// Strip everything but ASCII digits from a phone number.
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonicalize a phone number to DDD-DDD-DDDD.
/// Returns the input unchanged if it does not contain exactly 10 digits,
/// so partial input survives keystroke-by-keystroke reformatting.
pub fn canonical_phone(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }
    let digits = digits_only(phone);
    if digits.len() == 10 {
        format!("{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
    } else {
        phone.to_string()
    }
}

/// Check that an email has a local@domain.tld shape.
/// Empty is considered valid - the field is optional.
pub fn valid_email(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // Domain needs a dot with something on both sides
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Derive a display name from the three name parts, space-joined,
/// skipping parts that are empty or whitespace.
pub fn staff_name(first: &str, middle: &str, last: &str) -> String {
    [first, middle, last]
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_phone() {
        assert_eq!(canonical_phone("5551234567"), "555-123-4567");
        assert_eq!(canonical_phone("(555) 123-4567"), "555-123-4567");
        assert_eq!(canonical_phone("555.123.4567"), "555-123-4567");
        assert_eq!(canonical_phone(""), "");
        assert_eq!(canonical_phone("555-12"), "555-12"); // Partial input, untouched
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email(""));
        assert!(valid_email("coach@college.edu"));
        assert!(valid_email("first.last@athletics.college.edu"));
        assert!(!valid_email("bad-email"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@college.edu"));
        assert!(!valid_email("a@@college.edu"));
        assert!(!valid_email("@college.edu"));
        assert!(!valid_email("coach@.edu"));
    }

    #[test]
    fn test_staff_name() {
        assert_eq!(staff_name("John", "", "Smith"), "John Smith");
        assert_eq!(staff_name("John", "Q", "Smith"), "John Q Smith");
        assert_eq!(staff_name("", "", ""), "");
        assert_eq!(staff_name("  ", "Q", " "), "Q");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }
}
