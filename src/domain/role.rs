// ============================================================
// Layer 3 — Role Domain Type
// ============================================================
// The closed vocabulary of semantic roles a DOM node inside a
// news block can play:
//
//   Title     — the headline text (usually wraps the link)
//   Kicker    — the short line above the headline
//   Image_URL — the element carrying the picture source
//   Other     — everything else
//
// The serialised names are the exact strings used in label files,
// so an unknown role in a label file fails deserialisation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Title,
    Kicker,
    #[serde(rename = "Image_URL")]
    ImageUrl,
    Other,
}

impl Role {
    /// Every role, in class-index order.
    pub const ALL: [Role; 4] = [Role::Title, Role::Kicker, Role::ImageUrl, Role::Other];

    /// Position of this role in `Role::ALL`; used as the class index by the classifier.
    pub fn index(self) -> usize {
        match self {
            Role::Title    => 0,
            Role::Kicker   => 1,
            Role::ImageUrl => 2,
            Role::Other    => 3,
        }
    }

    /// Label-file spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Title    => "Title",
            Role::Kicker   => "Kicker",
            Role::ImageUrl => "Image_URL",
            Role::Other    => "Other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}' (expected Title, Kicker, Image_URL or Other)"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_position() {
        for (i, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn test_label_spelling() {
        let json = serde_json::to_string(&Role::ImageUrl).unwrap();
        assert_eq!(json, "\"Image_URL\"");
        let back: Role = serde_json::from_str("\"Kicker\"").unwrap();
        assert_eq!(back, Role::Kicker);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"Headline\"").is_err());
        assert!("ImageUrl".parse::<Role>().is_err());
        assert_eq!("Image_URL".parse::<Role>(), Ok(Role::ImageUrl));
    }
}
