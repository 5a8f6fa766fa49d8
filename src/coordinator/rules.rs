//! Ordered command classification rules
//!
//! Rules are evaluated top to bottom and the first match wins. Interrupts
//! come first, then one show/hide pair per overlay.

use crate::ui::surface::OverlayKind;

/// What a command should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Cancel speech, nothing else
    Interrupt,
    LocalOverlayToggle { target: OverlayKind, show: bool },
    /// Forward to the remote command service
    RemoteForward,
}

/// Keyword set mapped to a classification. Matches when any keyword is a
/// substring of the normalized command.
#[derive(Debug, Clone, Copy)]
pub struct CommandRule {
    pub keywords: &'static [&'static str],
    pub classification: Classification,
}

impl CommandRule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }
}

pub const RULES: &[CommandRule] = &[
    CommandRule {
        keywords: &["stop", "silence", "quiet", "shut up"],
        classification: Classification::Interrupt,
    },
    CommandRule {
        keywords: &["show system", "system performance", "status"],
        classification: Classification::LocalOverlayToggle {
            target: OverlayKind::Diagnostics,
            show: true,
        },
    },
    CommandRule {
        keywords: &["hide system", "close system"],
        classification: Classification::LocalOverlayToggle {
            target: OverlayKind::Diagnostics,
            show: false,
        },
    },
    CommandRule {
        keywords: &["show vitals", "check vitals", "biometrics"],
        classification: Classification::LocalOverlayToggle {
            target: OverlayKind::Vitals,
            show: true,
        },
    },
    CommandRule {
        keywords: &["hide vitals", "close vitals"],
        classification: Classification::LocalOverlayToggle {
            target: OverlayKind::Vitals,
            show: false,
        },
    },
];

/// Lower-case and trim.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classify an already normalized command.
pub fn classify(normalized: &str) -> Classification {
    RULES
        .iter()
        .find(|rule| rule.matches(normalized))
        .map(|rule| rule.classification)
        .unwrap_or(Classification::RemoteForward)
}

/// Spoken acknowledgement for an overlay toggle
pub fn acknowledgement(target: OverlayKind, show: bool) -> &'static str {
    match (target, show) {
        (OverlayKind::Diagnostics, true) => "Displaying system diagnostics.",
        (OverlayKind::Diagnostics, false) => "Closing diagnostics.",
        (OverlayKind::Vitals, true) => "Displaying biometric data.",
        (OverlayKind::Vitals, false) => "Closing biometric monitor.",
    }
}

/// Notification raised when an overlay is shown
pub fn shown_notification(target: OverlayKind) -> &'static str {
    match target {
        OverlayKind::Diagnostics => "SYSTEM OVERLAY ACTIVE",
        OverlayKind::Vitals => "VITALS OVERLAY ACTIVE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(target: OverlayKind, show: bool) -> Classification {
        Classification::LocalOverlayToggle { target, show }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Show Vitals \n"), "show vitals");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_interrupt_words() {
        for cmd in ["stop", "please stop talking", "silence", "be quiet", "shut up"] {
            assert_eq!(classify(cmd), Classification::Interrupt, "{}", cmd);
        }
    }

    #[test]
    fn test_overlay_rules() {
        assert_eq!(classify("show system"), toggle(OverlayKind::Diagnostics, true));
        assert_eq!(classify("system performance"), toggle(OverlayKind::Diagnostics, true));
        assert_eq!(classify("status"), toggle(OverlayKind::Diagnostics, true));
        assert_eq!(classify("check vitals"), toggle(OverlayKind::Vitals, true));
        assert_eq!(classify("biometrics please"), toggle(OverlayKind::Vitals, true));
        assert_eq!(classify("hide system"), toggle(OverlayKind::Diagnostics, false));
        assert_eq!(classify("close vitals"), toggle(OverlayKind::Vitals, false));
    }

    #[test]
    fn test_first_match_wins() {
        // Interrupt beats overlay
        assert_eq!(classify("stop and show system"), Classification::Interrupt);
        // Diagnostics rules come before vitals rules
        assert_eq!(
            classify("hide vitals and show system"),
            toggle(OverlayKind::Diagnostics, true)
        );
        assert_eq!(
            classify("hide system and check vitals"),
            toggle(OverlayKind::Diagnostics, false)
        );
        // "status" is a show keyword even inside a hide phrase
        assert_eq!(
            classify("close system status"),
            toggle(OverlayKind::Diagnostics, true)
        );
    }

    #[test]
    fn test_fallback_is_remote() {
        assert_eq!(classify("open youtube"), Classification::RemoteForward);
        assert_eq!(classify("what time is it"), Classification::RemoteForward);
    }

    #[test]
    fn test_acknowledgements() {
        assert_eq!(
            acknowledgement(OverlayKind::Vitals, false),
            "Closing biometric monitor."
        );
        assert_eq!(shown_notification(OverlayKind::Diagnostics), "SYSTEM OVERLAY ACTIVE");
    }
}
