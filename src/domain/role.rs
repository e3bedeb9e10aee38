use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::Displayable;

/// Publisher classification carrying a default monthly hour goal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Publisher,
    AuxiliaryPioneer,
    RegularPioneer,
    SpecialPioneer,
    Missionary,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Publisher,
        Role::AuxiliaryPioneer,
        Role::RegularPioneer,
        Role::SpecialPioneer,
        Role::Missionary,
    ];

    /// Default monthly hour goal. The publisher value is a sentinel, not a real goal.
    pub fn goal(&self) -> u32 {
        match self {
            Role::Publisher => 1,
            Role::AuxiliaryPioneer => 30,
            Role::RegularPioneer => 50,
            Role::SpecialPioneer => 100,
            Role::Missionary => 130,
        }
    }

    /// Any pioneer classification, auxiliary pioneers included.
    pub fn is_pioneer(&self) -> bool {
        *self != Role::Publisher
    }

    /// Roles that pioneer against a yearly goal.
    pub fn has_yearly_goal(&self) -> bool {
        matches!(
            self,
            Role::RegularPioneer | Role::SpecialPioneer | Role::Missionary
        )
    }

    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "publisher" => Some(Role::Publisher),
            "auxiliarypioneer" | "auxiliary" => Some(Role::AuxiliaryPioneer),
            "regularpioneer" | "pioneer" | "regular" => Some(Role::RegularPioneer),
            "specialpioneer" | "special" => Some(Role::SpecialPioneer),
            "missionary" => Some(Role::Missionary),
            _ => None,
        }
    }
}

impl Displayable for Role {
    fn display_label(&self) -> String {
        match self {
            Role::Publisher => "Publisher".into(),
            Role::AuxiliaryPioneer => "Auxiliary pioneer".into(),
            Role::RegularPioneer => "Regular pioneer".into(),
            Role::SpecialPioneer => "Special pioneer".into(),
            Role::Missionary => "Missionary".into(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}
