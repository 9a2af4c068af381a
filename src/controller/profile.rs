//! Controller Registry - static metadata for every supported controller family
//!
//! Each [`ControllerProfile`] lists its button and axis identifiers in the order
//! the hardware reports them. Position is the only link between a raw sample
//! index and its semantic name, so these lists must never be reordered.
//!
//! The identifiers double as lookup keys for the display: every id becomes one
//! placeholder element, and [`overlay_class`] maps ids onto the parts of the
//! controller artwork that light up or move.

use std::fmt;

/// Key of a controller family in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Xbox,
    PS3,
    PS4,
    PS5,
    JoyConL,
    JoyConR,
    JoyConLR,
}

impl ControllerKind {
    /// Every registered family, in declaration order
    pub const ALL: [ControllerKind; 7] = [
        ControllerKind::Xbox,
        ControllerKind::PS3,
        ControllerKind::PS4,
        ControllerKind::PS5,
        ControllerKind::JoyConL,
        ControllerKind::JoyConR,
        ControllerKind::JoyConLR,
    ];

    /// Looks up the static profile for this family
    pub fn profile(self) -> &'static ControllerProfile {
        match self {
            ControllerKind::Xbox => &XBOX,
            ControllerKind::PS3 => &PS3,
            ControllerKind::PS4 => &PS4,
            ControllerKind::PS5 => &PS5,
            ControllerKind::JoyConL => &JOY_CON_L,
            ControllerKind::JoyConR => &JOY_CON_R,
            ControllerKind::JoyConLR => &JOY_CON_LR,
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Immutable description of one controller family
///
/// `buttons[i]` names the button reported at raw index `i`, and the same holds
/// for `axes`. Axes are consumed in pairs: an even index is a horizontal axis
/// and the following odd index is its vertical partner.
#[derive(Debug, PartialEq)]
pub struct ControllerProfile {
    pub kind: ControllerKind,
    /// Human readable name shown in the title bar
    pub name: &'static str,
    pub buttons: &'static [&'static str],
    pub axes: &'static [&'static str],
    /// File name of the controller artwork, relative to the asset directory
    pub visual_asset: Option<&'static str>,
}

const STICK_AXES: &[&str] = &["LSX", "LSY", "RSX", "RSY"];

static XBOX: ControllerProfile = ControllerProfile {
    kind: ControllerKind::Xbox,
    name: "Xbox Controller",
    buttons: &[
        "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "Back", "Start", "LS", "RS", "DPadUp",
        "DPadDown", "DPadLeft", "DPadRight",
    ],
    axes: STICK_AXES,
    visual_asset: None,
};

static PS3: ControllerProfile = ControllerProfile {
    kind: ControllerKind::PS3,
    name: "PlayStation 3 Controller",
    buttons: &[
        "Cross", "Circle", "Square", "Triangle", "L1", "R1", "L2", "R2", "Select", "Start", "L3",
        "R3", "PS", "Up", "Down", "Left", "Right",
    ],
    axes: STICK_AXES,
    visual_asset: None,
};

static PS4: ControllerProfile = ControllerProfile {
    kind: ControllerKind::PS4,
    name: "PlayStation 4 Controller",
    buttons: &[
        "Cross", "Circle", "Square", "Triangle", "L1", "R1", "L2", "R2", "Share", "Options", "L3",
        "R3", "DPadUp", "DPadDown", "DPadLeft", "DPadRight", "PS", "Touchpad",
    ],
    axes: STICK_AXES,
    visual_asset: Some("dual-shock-4.svg"),
};

static PS5: ControllerProfile = ControllerProfile {
    kind: ControllerKind::PS5,
    name: "PlayStation 5 Controller",
    buttons: &[
        "Cross", "Circle", "Square", "Triangle", "L1", "R1", "L2", "R2", "Create", "Options",
        "L3", "R3", "DPadUp", "DPadDown", "DPadLeft", "DPadRight",
    ],
    axes: STICK_AXES,
    visual_asset: None,
};

// The "?n" entries are indices the Joy-Con reports without a known meaning.
static JOY_CON_L: ControllerProfile = ControllerProfile {
    kind: ControllerKind::JoyConL,
    name: "Joy-Con (L)",
    buttons: &[
        "Left", "Down", "Up", "Right", "SL", "SR", "ZL", "?1", "L", "Minus", "LS", "?2", "?3",
        "?4", "?5", "?6", "Capture",
    ],
    axes: &["LSX", "LSY"],
    visual_asset: Some("joy-con.svg"),
};

static JOY_CON_R: ControllerProfile = ControllerProfile {
    kind: ControllerKind::JoyConR,
    name: "Joy-Con (R)",
    buttons: &[
        "A", "X", "B", "Y", "SL", "SR", "?1", "ZR", "R", "Plus", "RS", "?3", "?4", "?5", "?6",
        "?7", "Home",
    ],
    axes: &["RSX", "RSY"],
    visual_asset: Some("joy-con.svg"),
};

static JOY_CON_LR: ControllerProfile = ControllerProfile {
    kind: ControllerKind::JoyConLR,
    name: "Joy-Con L+R",
    buttons: &[
        "B", "A", "Y", "X", "L", "R", "ZL", "ZR", "Minus", "Plus", "L3", "R3", "Up", "Down",
        "Left", "Right", "Home", "Capture", "SL", "SR", "LS", "RS",
    ],
    axes: STICK_AXES,
    visual_asset: Some("joy-con.svg"),
};

/// Maps a button or axis id onto the artwork part it drives
///
/// Both axes of a stick share one class, the stick indicator is moved as a
/// whole. Ids without artwork (e.g. `"Back"`) return `None`.
pub fn overlay_class(id: &str) -> Option<&'static str> {
    let class = match id {
        "L3" => "button-l3",
        "R3" => "button-r3",
        "DPadUp" => "button-dpad-up",
        "DPadDown" => "button-dpad-down",
        "DPadLeft" => "button-dpad-left",
        "DPadRight" => "button-dpad-right",
        "Triangle" => "button-triangle",
        "Circle" => "button-circle",
        "Cross" => "button-cross",
        "Square" => "button-square",
        "L1" => "button-l1",
        "R1" => "button-r1",
        "L2" => "button-l2",
        "R2" => "button-r2",
        "PS" => "button-ps",
        "Touchpad" => "button-touchpad",
        "Share" => "button-share",
        "Options" => "button-options",
        "B" => "button-b",
        "A" => "button-a",
        "Y" => "button-y",
        "X" => "button-x",
        "L" => "button-l",
        "R" => "button-r",
        "ZL" => "button-zl",
        "ZR" => "button-zr",
        "Minus" => "button-minus",
        "Plus" => "button-plus",
        "LS" => "button-ls",
        "RS" => "button-rs",
        "Up" => "button-up",
        "Down" => "button-down",
        "Left" => "button-left",
        "Right" => "button-right",
        "Home" => "button-home",
        "Capture" => "button-capture",
        "LSX" | "LSY" => "axis-l-container",
        "RSX" | "RSY" => "axis-r-container",
        _ => return None,
    };
    Some(class)
}

/// Every overlay class some registered profile drives, without duplicates
pub fn overlay_classes() -> Vec<&'static str> {
    let mut classes = Vec::new();
    for kind in ControllerKind::ALL {
        let profile = kind.profile();
        for class in profile
            .buttons
            .iter()
            .chain(profile.axes)
            .filter_map(|id| overlay_class(id))
        {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn profiles_report_their_own_kind() {
        for kind in ControllerKind::ALL {
            assert_eq!(kind.profile().kind, kind);
        }
    }

    #[test]
    fn declared_counts_match_hardware_layouts() {
        let counts: Vec<(usize, usize)> = ControllerKind::ALL
            .iter()
            .map(|k| (k.profile().buttons.len(), k.profile().axes.len()))
            .collect();
        assert_eq!(
            counts,
            vec![(16, 4), (17, 4), (18, 4), (16, 4), (17, 2), (17, 2), (22, 4)]
        );
    }

    #[test]
    fn axis_lists_come_in_pairs() {
        for kind in ControllerKind::ALL {
            assert_eq!(kind.profile().axes.len() % 2, 0, "{kind} has an odd axis count");
        }
    }

    #[test]
    fn button_ids_are_unique_within_a_profile() {
        for kind in ControllerKind::ALL {
            let profile = kind.profile();
            let unique: HashSet<_> = profile.buttons.iter().collect();
            assert_eq!(unique.len(), profile.buttons.len(), "{kind} repeats a button id");
        }
    }

    #[test]
    fn stick_axes_share_a_container() {
        assert_eq!(overlay_class("LSX"), overlay_class("LSY"));
        assert_eq!(overlay_class("RSX"), Some("axis-r-container"));
        assert_ne!(overlay_class("LSX"), overlay_class("RSX"));
    }

    #[test]
    fn unmapped_ids_have_no_overlay() {
        assert_eq!(overlay_class("Back"), None);
        assert_eq!(overlay_class("?1"), None);
        assert_eq!(overlay_class("Cross"), Some("button-cross"));
    }

    #[test]
    fn overlay_classes_cover_all_profiles_once() {
        let classes = overlay_classes();
        let unique: HashSet<_> = classes.iter().collect();
        assert_eq!(unique.len(), classes.len());
        assert!(classes.contains(&"button-touchpad"));
        assert!(classes.contains(&"axis-r-container"));
        assert!(!classes.iter().any(|c| c.is_empty()));
    }
}
