use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Competitive strength tier, ordered weakest to strongest.
///
/// Serialized as the upper-case token regardless of source casing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    G,
    F,
    E,
    D,
    C,
    B,
    A,
    S,
    Ss,
}

impl Tier {
    /// Parse a tier token case-insensitively ("s" → `S`, "ss" → `SS`).
    pub fn parse(token: &str) -> Option<Tier> {
        match token.trim().to_ascii_uppercase().as_str() {
            "G" => Some(Tier::G),
            "F" => Some(Tier::F),
            "E" => Some(Tier::E),
            "D" => Some(Tier::D),
            "C" => Some(Tier::C),
            "B" => Some(Tier::B),
            "A" => Some(Tier::A),
            "S" => Some(Tier::S),
            "SS" => Some(Tier::Ss),
            _ => None,
        }
    }
}

/// Career period a race falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Early,
    Mid,
    Late,
    Unspecified,
}

impl Period {
    /// Derive the period from the schedule text's leading word.
    pub fn from_schedule(text: &str) -> Period {
        let lower = text.trim_start().to_lowercase();
        if lower.starts_with("early") {
            Period::Early
        } else if lower.starts_with("mid") {
            Period::Mid
        } else if lower.starts_with("late") {
            Period::Late
        } else {
            Period::Unspecified
        }
    }
}

/// Race distance bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Short,
    Mile,
    Medium,
    Long,
}

impl Distance {
    pub fn parse(text: &str) -> Option<Distance> {
        match text.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Distance::Short),
            "mile" => Some(Distance::Mile),
            "medium" => Some(Distance::Medium),
            "long" => Some(Distance::Long),
            _ => None,
        }
    }
}

/// One entry of the race catalog loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RaceDescriptor {
    /// Race name, unique within the catalog.
    pub name: String,
    pub period: Period,
    pub tier: Tier,
    pub distance: Distance,
    /// Display form of the schedule cell, e.g. "Early Oct • Classic • Senior".
    pub schedule: String,
}

/// Recommended training stats. Absent fields are missing on the page, not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamina: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wit: Option<u32>,
}

impl StatBlock {
    pub fn is_empty(&self) -> bool {
        self.speed.is_none()
            && self.stamina.is_none()
            && self.power.is_none()
            && self.guts.is_none()
            && self.wit.is_none()
    }
}

/// A training event extracted from one markup block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventRecord {
    /// Event name; blocks without one are dropped by the parser.
    pub name: String,
    /// Trigger condition text, may be empty.
    pub conditions: String,
    /// Effect text, may be empty.
    pub effects: String,
}

/// Which part of the event text mentioned the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MentionedIn {
    Conditions,
    Effects,
}

/// A known race mentioned inside an event's text.
///
/// At most one match exists per (race name, event name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RaceMatch {
    pub race: RaceDescriptor,
    pub event_name: String,
    pub mentioned_in: MentionedIn,
}

/// The normalized record returned for one character request.
///
/// Constructed once per request; never cached or mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterResult {
    pub url: String,
    pub title: String,
    pub overall_rank: Option<Tier>,
    pub recommended_stats: Option<StatBlock>,
    /// Page order.
    pub events: Vec<EventRecord>,
    /// First-seen order.
    pub matching_races: Vec<RaceMatch>,
}

impl CharacterResult {
    /// A successful fetch that yielded no recognizable character content.
    /// Surfaced as an empty-state result, not an error.
    pub fn is_not_found(&self) -> bool {
        self.title.is_empty() && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_order_is_g_through_ss() {
        assert!(Tier::G < Tier::F);
        assert!(Tier::F < Tier::E);
        assert!(Tier::E < Tier::D);
        assert!(Tier::D < Tier::C);
        assert!(Tier::C < Tier::B);
        assert!(Tier::B < Tier::A);
        assert!(Tier::A < Tier::S);
        assert!(Tier::S < Tier::Ss);
    }

    #[test]
    fn tier_parse_is_case_insensitive() {
        assert_eq!(Tier::parse("s"), Some(Tier::S));
        assert_eq!(Tier::parse("ss"), Some(Tier::Ss));
        assert_eq!(Tier::parse(" B "), Some(Tier::B));
        assert_eq!(Tier::parse("X"), None);
        assert_eq!(Tier::parse(""), None);
    }

    #[test]
    fn tier_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Tier::Ss).unwrap(), "\"SS\"");
        assert_eq!(serde_json::to_string(&Tier::G).unwrap(), "\"G\"");
    }

    #[test]
    fn period_from_schedule_prefix() {
        assert_eq!(Period::from_schedule("Early Oct • Classic"), Period::Early);
        assert_eq!(Period::from_schedule("mid Dec • Senior"), Period::Mid);
        assert_eq!(Period::from_schedule("Late Jan"), Period::Late);
        assert_eq!(Period::from_schedule("Debut"), Period::Unspecified);
        assert_eq!(Period::from_schedule(""), Period::Unspecified);
    }

    #[test]
    fn distance_parse() {
        assert_eq!(Distance::parse("Short"), Some(Distance::Short));
        assert_eq!(Distance::parse("MILE"), Some(Distance::Mile));
        assert_eq!(Distance::parse("dirt"), None);
    }

    #[test]
    fn stat_block_emptiness() {
        assert!(StatBlock::default().is_empty());
        let partial = StatBlock {
            wit: Some(300),
            ..StatBlock::default()
        };
        assert!(!partial.is_empty());
    }
}
