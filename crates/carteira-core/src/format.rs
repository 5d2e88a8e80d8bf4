use regex::Regex;

pub const PHONE_PATTERN: &str = r"^\(\d{2}\) \d{5}-\d{4}$";
pub const POSTAL_CODE_PATTERN: &str = r"^\d{5}-\d{3}$";

const PHONE_DIGIT_CAP: usize = 11;
const POSTAL_CODE_DIGIT_CAP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Phone,
    PostalCode,
}

impl Mask {
    #[must_use]
    pub fn apply(self, raw: &str) -> String {
        match self {
            Mask::Phone => format_phone(raw),
            Mask::PostalCode => format_postal_code(raw),
        }
    }
}

#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw, PHONE_DIGIT_CAP);
    if digits.len() <= 2 {
        return digits;
    }
    if digits.len() <= 7 {
        return format!("({}) {}", &digits[..2], &digits[2..]);
    }
    format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
}

#[must_use]
pub fn format_postal_code(raw: &str) -> String {
    let digits = digits(raw, POSTAL_CODE_DIGIT_CAP);
    if digits.len() <= 5 {
        return digits;
    }
    format!("{}-{}", &digits[..5], &digits[5..])
}

#[must_use]
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        Err(err) => {
            tracing::error!(pattern, error = %err, "failed to compile field pattern");
            false
        }
    }
}

fn digits(raw: &str, cap: usize) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(cap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_grows_with_digit_count() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "1");
        assert_eq!(format_phone("11"), "11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("119999"), "(11) 9999");
        assert_eq!(format_phone("1199999"), "(11) 99999");
        assert_eq!(format_phone("11999999"), "(11) 99999-9");
        assert_eq!(format_phone("11999999999"), "(11) 99999-9999");
    }

    #[test]
    fn phone_strips_punctuation_and_caps_at_eleven_digits() {
        assert_eq!(format_phone("11 9.9999-9999"), "(11) 99999-9999");
        assert_eq!(format_phone("119999999990000"), "(11) 99999-9999");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn phone_is_idempotent_on_canonical_form() {
        let canonical = "(11) 99999-9999";
        assert_eq!(format_phone(canonical), canonical);
        assert_eq!(format_phone(&format_phone("11999999999")), canonical);
    }

    #[test]
    fn postal_code_grows_with_digit_count() {
        assert_eq!(format_postal_code(""), "");
        assert_eq!(format_postal_code("012"), "012");
        assert_eq!(format_postal_code("01234"), "01234");
        assert_eq!(format_postal_code("012345"), "01234-5");
        assert_eq!(format_postal_code("01234567"), "01234-567");
    }

    #[test]
    fn postal_code_is_idempotent_on_canonical_form() {
        let canonical = "01234-567";
        assert_eq!(format_postal_code(canonical), canonical);
        assert_eq!(format_postal_code("01234-56789"), canonical);
    }

    #[test]
    fn masks_dispatch_to_their_formatter() {
        assert_eq!(Mask::Phone.apply("11999999999"), "(11) 99999-9999");
        assert_eq!(Mask::PostalCode.apply("01310100"), "01310-100");
    }

    #[test]
    fn canonical_patterns_accept_only_full_forms() {
        assert!(matches_pattern(PHONE_PATTERN, "(11) 99999-9999"));
        assert!(!matches_pattern(PHONE_PATTERN, "(11) 99999"));
        assert!(!matches_pattern(PHONE_PATTERN, "11999999999"));
        assert!(matches_pattern(POSTAL_CODE_PATTERN, "01310-100"));
        assert!(!matches_pattern(POSTAL_CODE_PATTERN, "01310100"));
    }
}
