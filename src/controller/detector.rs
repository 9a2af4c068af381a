//! Controller Detector - classifies a device by its identifier string
//!
//! Detection is a first-match-wins scan over [`DETECTION_RULES`]. Substrings
//! overlap between vendors ("Wireless Controller" is contained in the DualSense
//! identifier), so the rule order is part of the contract: more specific
//! substrings come before the generic ones they contain.
//!
//! The generic `"Wireless Controller"` rule for the PS4 pad is a known weak
//! spot. Any future device whose identifier contains that phrase and no earlier
//! rule's substring will be classified as a PS4 controller.

use tracing::trace;

use super::profile::{ControllerKind, ControllerProfile};

/// An ordered `(substring, family)` classification rule
#[derive(Debug, Clone, Copy)]
pub struct DetectionRule {
    pub needle: &'static str,
    pub kind: ControllerKind,
}

/// Rules in evaluation order
pub const DETECTION_RULES: [DetectionRule; 7] = [
    DetectionRule {
        needle: "Xbox",
        kind: ControllerKind::Xbox,
    },
    DetectionRule {
        needle: "PLAYSTATION(R)3",
        kind: ControllerKind::PS3,
    },
    DetectionRule {
        needle: "DualSense Wireless Controller",
        kind: ControllerKind::PS5,
    },
    DetectionRule {
        needle: "Wireless Controller",
        kind: ControllerKind::PS4,
    },
    DetectionRule {
        needle: "Joy-Con (L)",
        kind: ControllerKind::JoyConL,
    },
    DetectionRule {
        needle: "Joy-Con (R)",
        kind: ControllerKind::JoyConR,
    },
    DetectionRule {
        needle: "Joy-Con L+R",
        kind: ControllerKind::JoyConLR,
    },
];

/// Outcome of classifying a device identifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    Known(&'static ControllerProfile),
    /// No rule matched. A valid classification, not an error.
    Unknown,
}

impl Detection {
    pub fn profile(self) -> Option<&'static ControllerProfile> {
        match self {
            Detection::Known(profile) => Some(profile),
            Detection::Unknown => None,
        }
    }
}

/// Classifies `raw_id` against [`DETECTION_RULES`]
pub fn detect(raw_id: &str) -> Detection {
    match DETECTION_RULES
        .iter()
        .find(|rule| raw_id.contains(rule.needle))
    {
        Some(rule) => {
            trace!("Device '{}' matched rule '{}' -> {}", raw_id, rule.needle, rule.kind);
            Detection::Known(rule.kind.profile())
        }
        None => {
            trace!("Device '{}' matched no detection rule", raw_id);
            Detection::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(raw_id: &str) -> Option<ControllerKind> {
        detect(raw_id).profile().map(|p| p.kind)
    }

    #[test]
    fn each_rule_wins_when_no_earlier_rule_matches() {
        for rule in DETECTION_RULES {
            let raw_id = format!("Vendor {} (STANDARD GAMEPAD)", rule.needle);
            assert_eq!(kind_of(&raw_id), Some(rule.kind), "rule '{}'", rule.needle);
        }
    }

    #[test]
    fn dualsense_is_not_shadowed_by_generic_wireless_rule() {
        let profile = detect("Sony Interactive Entertainment DualSense Wireless Controller")
            .profile()
            .unwrap();
        assert_eq!(profile.kind, ControllerKind::PS5);
        assert_eq!(profile.buttons.len(), 16);
        assert_eq!(profile.axes.len(), 4);
    }

    #[test]
    fn generic_wireless_controller_is_ps4() {
        assert_eq!(
            kind_of("054c-09cc-Wireless Controller"),
            Some(ControllerKind::PS4)
        );
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // contains both the Xbox and the generic wireless substring
        assert_eq!(
            kind_of("Xbox Wireless Controller"),
            Some(ControllerKind::Xbox)
        );
    }

    #[test]
    fn unmatched_ids_are_unknown() {
        assert_eq!(detect("8BitDo SN30 Pro"), Detection::Unknown);
        assert_eq!(detect(""), Detection::Unknown);
        // matching is case sensitive
        assert_eq!(detect("xbox 360 pad"), Detection::Unknown);
    }

    #[test]
    fn detection_is_idempotent() {
        let raw_id = "Nintendo Joy-Con (R)";
        assert_eq!(detect(raw_id), detect(raw_id));
    }
}
