// src/models/participant.rs

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A member of the fixed gift-exchange roster.
///
/// Serialized as the participant's display name, which is also the key
/// used for documents and prediction maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Participant {
    Miriam,
    Paula,
    Adriana,
    Lula,
    Diego,
    #[serde(rename = "Carlos A")]
    CarlosA,
    Padrino,
}

/// Giver -> receiver assignment over the roster.
pub type PredictionMap = BTreeMap<Participant, Participant>;

impl Participant {
    /// The full roster, in display order.
    pub const ALL: [Participant; 7] = [
        Participant::Miriam,
        Participant::Paula,
        Participant::Adriana,
        Participant::Lula,
        Participant::Diego,
        Participant::CarlosA,
        Participant::Padrino,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Participant::Miriam => "Miriam",
            Participant::Paula => "Paula",
            Participant::Adriana => "Adriana",
            Participant::Lula => "Lula",
            Participant::Diego => "Diego",
            Participant::CarlosA => "Carlos A",
            Participant::Padrino => "Padrino",
        }
    }

    /// Comma separated roster, used in validation messages.
    pub fn roster_list() -> String {
        Self::ALL
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParticipant(pub String);

impl fmt::Display for UnknownParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a participant", self.0)
    }
}

impl std::error::Error for UnknownParticipant {}

impl FromStr for Participant {
    type Err = UnknownParticipant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownParticipant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for participant in Participant::ALL {
            assert_eq!(participant.name().parse::<Participant>(), Ok(participant));
        }
        assert!("Santa".parse::<Participant>().is_err());
        assert!("carlos a".parse::<Participant>().is_err());
    }

    #[test]
    fn serializes_as_display_name_in_map_keys() {
        let mut map = PredictionMap::new();
        map.insert(Participant::CarlosA, Participant::Miriam);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "Carlos A": "Miriam" }));

        let back: PredictionMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
