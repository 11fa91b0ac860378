use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Server-assigned user identifier.
    UserId
);
string_id!(
    /// Server-assigned challenge identifier.
    ChallengeId
);
string_id!(
    /// Server-assigned idea identifier.
    IdeaId
);
string_id!(
    /// Server-assigned reaction identifier.
    ReactionId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Blocked,
    Pending,
    Active,
}

/// Who may see a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivacyMode {
    #[serde(rename = "PUBLIC")]
    Public,
    /// Restricted to users of the email domain held in `privacy_data`.
    #[serde(rename = "BYDOMAIN")]
    ByDomain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = IdeaId::from("i1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"i1\"");
        assert_eq!(id.to_string(), "i1");
    }

    #[test]
    fn test_privacy_mode_wire_names() {
        let mode: PrivacyMode = serde_json::from_str("\"BYDOMAIN\"").unwrap();
        assert_eq!(mode, PrivacyMode::ByDomain);
        assert_eq!(serde_json::to_string(&PrivacyMode::Public).unwrap(), "\"PUBLIC\"");
    }

    #[test]
    fn test_user_status_wire_names() {
        let status: UserStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(status, UserStatus::Pending);
    }
}
