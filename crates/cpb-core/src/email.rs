use std::sync::OnceLock;

use regex::Regex;

/// Institutional address accepted by `/invite`: `s` + 6 digits at the student domain.
pub const STUDENT_EMAIL_PATTERN: &str = r"^s\d{6}@studenti\.polito\.it$";

static STUDENT_EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Returns true iff the whole candidate is a student address.
///
/// Matching is case-sensitive and nothing is trimmed; `\d` is restricted to
/// ASCII digits.
pub fn validate_email(candidate: &str) -> bool {
    STUDENT_EMAIL_RE
        .get_or_init(|| {
            regex::RegexBuilder::new(STUDENT_EMAIL_PATTERN)
                .unicode(false)
                .build()
                .expect("valid regex")
        })
        .is_match(candidate)
}

/// Builds the candidate address from `/invite` arguments.
pub fn candidate_from_args(args: &[String]) -> String {
    args.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_student_address() {
        assert!(validate_email("s123456@studenti.polito.it"));
        assert!(validate_email("s000000@studenti.polito.it"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [
            "",
            "S123456@studenti.polito.it",
            "s123456@STUDENTI.polito.it",
            "s12345@studenti.polito.it",
            "s1234567@studenti.polito.it",
            " s123456@studenti.polito.it",
            "s123456@studenti.polito.it ",
            "s123456@studenti.polito.it\n",
            "xs123456@studenti.polito.it",
            "s123456@polito.it",
            "s123456@studentiXpolito.it",
            "d123456@studenti.polito.it",
            "s12a456@studenti.polito.it",
        ] {
            assert!(!validate_email(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert!(!validate_email("s١٢٣٤٥٦@studenti.polito.it"));
    }

    #[test]
    fn candidate_joins_with_single_space() {
        let args = vec!["s123456@studenti".to_string(), ".polito.it".to_string()];
        assert_eq!(candidate_from_args(&args), "s123456@studenti .polito.it");
        assert!(!validate_email(&candidate_from_args(&args)));
        assert_eq!(candidate_from_args(&[]), "");
    }
}
