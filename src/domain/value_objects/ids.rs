//! Strongly-typed identifiers for domain entities

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(FlorbId);
define_id!(PlacedFlorbId);
define_id!(ResourceNodeId);
define_id!(UserId);
define_id!(GatheringRecordId);

/// Externally-facing opaque florb identifier, distinct from the storage id
///
/// Always `florb_` followed by 16 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlorbCode(String);

impl FlorbCode {
    pub const PREFIX: &'static str = "florb_";

    /// Draw 8 random bytes and hex-encode them behind the fixed prefix
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: u64 = rng.gen();
        Self(format!("{}{:016x}", Self::PREFIX, suffix))
    }

    /// Wrap a code read back from storage
    pub fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlorbCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_florb_code_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = FlorbCode::generate(&mut rng);
        let suffix = code.as_str().strip_prefix(FlorbCode::PREFIX).unwrap();

        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_id_round_trips_through_string() {
        let id = FlorbId::new();
        let parsed: FlorbId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
