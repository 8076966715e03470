//! Posture - the behavioral mode a room currently runs in
//!
//! Downstream planners gate their work on the predicates below rather than
//! matching on the enum themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Posture {
    #[default]
    Eco,
    Expand,
    Defensive,
    War,
    Siege,
    Evacuate,
    NukePrep,
}

impl Posture {
    pub const ALL: [Posture; 7] = [
        Posture::Eco,
        Posture::Expand,
        Posture::Defensive,
        Posture::War,
        Posture::Siege,
        Posture::Evacuate,
        Posture::NukePrep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Posture::Eco => "eco",
            Posture::Expand => "expand",
            Posture::Defensive => "defensive",
            Posture::War => "war",
            Posture::Siege => "siege",
            Posture::Evacuate => "evacuate",
            Posture::NukePrep => "nukePrep",
        }
    }

    #[inline]
    pub fn allows_building(self) -> bool {
        !matches!(self, Posture::Evacuate | Posture::Siege)
    }

    #[inline]
    pub fn allows_upgrading(self) -> bool {
        !matches!(self, Posture::Evacuate | Posture::Siege | Posture::War)
    }

    #[inline]
    pub fn allows_expansion(self) -> bool {
        matches!(self, Posture::Eco | Posture::Expand)
    }

    #[inline]
    pub fn is_combat(self) -> bool {
        matches!(self, Posture::Defensive | Posture::War | Posture::Siege)
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let building: Vec<_> = Posture::ALL.iter().filter(|p| !p.allows_building()).collect();
        assert_eq!(building, vec![&Posture::Siege, &Posture::Evacuate]);

        assert!(!Posture::War.allows_upgrading());
        assert!(Posture::Defensive.allows_upgrading());
        assert!(Posture::NukePrep.allows_upgrading());

        let expanding: Vec<_> = Posture::ALL.iter().filter(|p| p.allows_expansion()).collect();
        assert_eq!(expanding, vec![&Posture::Eco, &Posture::Expand]);

        let combat: Vec<_> = Posture::ALL.iter().filter(|p| p.is_combat()).collect();
        assert_eq!(combat, vec![&Posture::Defensive, &Posture::War, &Posture::Siege]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Posture::NukePrep).unwrap(), "\"nukePrep\"");
        let p: Posture = serde_json::from_str("\"siege\"").unwrap();
        assert_eq!(p, Posture::Siege);
    }
}
