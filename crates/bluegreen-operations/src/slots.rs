//! Naming of the managed application slots.
//!
//! The suffixes are part of the external contract: tooling that inspects
//! the platform recognises `<name>-g1` and `<name>-g2` as slots owned by
//! blue-green pushes of `<name>`.

use std::fmt;

/// Suffix of the slot holding the previously live version.
pub const PREVIOUS_SLOT_SUFFIX: &str = "-g1";

/// Suffix of the slot holding the version demoted one rotation earlier.
pub const TWO_BACK_SLOT_SUFFIX: &str = "-g2";

#[must_use]
pub fn previous_slot(name: &str) -> String {
    format!("{name}{PREVIOUS_SLOT_SUFFIX}")
}

#[must_use]
pub fn two_back_slot(name: &str) -> String {
    format!("{name}{TWO_BACK_SLOT_SUFFIX}")
}

/// Whether `name` carries one of the managed slot suffixes.
#[must_use]
pub fn is_managed_slot(name: &str) -> bool {
    [PREVIOUS_SLOT_SUFFIX, TWO_BACK_SLOT_SUFFIX]
        .iter()
        .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix))
}

/// The three application names derived from one base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotNames {
    pub live: String,
    pub previous: String,
    pub two_back: String,
}

impl SlotNames {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            live: name.to_string(),
            previous: previous_slot(name),
            two_back: two_back_slot(name),
        }
    }
}

/// Which slots exist, probed once before planning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub live: bool,
    pub previous: bool,
    pub two_back: bool,
}

impl SlotState {
    #[must_use]
    pub fn new(live: bool, previous: bool, two_back: bool) -> Self {
        Self {
            live,
            previous,
            two_back,
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |exists: bool| if exists { "present" } else { "absent" };
        write!(
            f,
            "live {}, previous {}, two-back {}",
            mark(self.live),
            mark(self.previous),
            mark(self.two_back)
        )
    }
}
