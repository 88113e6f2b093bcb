//! Password complexity scoring, mirroring the server-side checker so the
//! client can give instant feedback before a credential ever leaves the
//! device.

use serde::{Deserialize, Serialize};

/// Maximum achievable score: six independent criteria.
pub const MAX_SCORE: u8 = 6;

/// Qualitative strength label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    /// >=6 Strong, >=4 Medium, else Weak.
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        if score >= 6 {
            StrengthLabel::Strong
        } else if score >= 4 {
            StrengthLabel::Medium
        } else {
            StrengthLabel::Weak
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        }
    }
}

/// Result of a strength check: one point per satisfied criterion plus a
/// suggestion for each missed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReport {
    pub score: u8,
    pub label: StrengthLabel,
    pub suggestions: Vec<String>,
}

/// Scores a password against six criteria: length 8+, length 12+, uppercase,
/// lowercase, digit, ASCII special character.
#[must_use]
pub fn check_password_strength(password: &str) -> PasswordReport {
    let mut score = 0u8;
    let mut suggestions = Vec::new();

    let mut criterion = |met: bool, suggestion: &str| {
        if met {
            score += 1;
        } else {
            suggestions.push(suggestion.to_owned());
        }
    };

    criterion(password.len() >= 8, "Use at least 8 characters");
    criterion(password.len() >= 12, "Use at least 12 characters");
    criterion(
        password.chars().any(|c| c.is_ascii_uppercase()),
        "Add uppercase letters",
    );
    criterion(
        password.chars().any(|c| c.is_ascii_lowercase()),
        "Add lowercase letters",
    );
    criterion(
        password.chars().any(|c| c.is_ascii_digit()),
        "Add numbers",
    );
    criterion(
        password.chars().any(is_ascii_special),
        "Add special characters",
    );

    PasswordReport {
        score,
        label: StrengthLabel::for_score(score),
        suggestions,
    }
}

/// Printable ASCII that is neither alphanumeric nor a space.
fn is_ascii_special(c: char) -> bool {
    c.is_ascii_punctuation()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_fails_everything() {
        let report = check_password_strength("");
        assert_eq!(report.score, 0);
        assert_eq!(report.label, StrengthLabel::Weak);
        assert_eq!(report.suggestions.len(), 6);
    }

    #[test]
    fn long_mixed_password_is_strong() {
        let report = check_password_strength("Correct-Horse-Battery-9");
        assert_eq!(report.score, MAX_SCORE);
        assert_eq!(report.label, StrengthLabel::Strong);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn medium_band_starts_at_four() {
        // 8+ chars, upper, lower, digit; misses 12+ and special.
        let report = check_password_strength("Abcdef12");
        assert_eq!(report.score, 4);
        assert_eq!(report.label, StrengthLabel::Medium);
        assert_eq!(
            report.suggestions,
            vec![
                "Use at least 12 characters".to_owned(),
                "Add special characters".to_owned()
            ]
        );
    }

    #[test]
    fn lowercase_only_is_weak() {
        let report = check_password_strength("password");
        assert_eq!(report.score, 2); // length 8 + lowercase
        assert_eq!(report.label, StrengthLabel::Weak);
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(StrengthLabel::for_score(6), StrengthLabel::Strong);
        assert_eq!(StrengthLabel::for_score(5), StrengthLabel::Medium);
        assert_eq!(StrengthLabel::for_score(4), StrengthLabel::Medium);
        assert_eq!(StrengthLabel::for_score(3), StrengthLabel::Weak);
    }
}
