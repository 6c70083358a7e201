use crate::model::{CharacterResult, RaceMatch};
use crate::parser::ParsedPage;

/// Combine parser and matcher output into the final record.
///
/// Pure data combination: never fails, performs no I/O. Absent fields stay
/// encoded as `None`; the boundary layer decides what an empty result means.
pub fn assemble(url: String, page: ParsedPage, matching_races: Vec<RaceMatch>) -> CharacterResult {
    CharacterResult {
        url,
        title: page.title,
        overall_rank: page.overall_rank,
        recommended_stats: page.recommended_stats,
        events: page.events,
        matching_races,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventRecord, StatBlock, Tier};

    fn empty_page() -> ParsedPage {
        ParsedPage {
            title: String::new(),
            overall_rank: None,
            recommended_stats: None,
            events: Vec::new(),
        }
    }

    #[test]
    fn empty_title_and_events_classify_as_not_found() {
        let result = assemble("https://example.test/1".to_string(), empty_page(), Vec::new());
        assert!(result.is_not_found());
    }

    #[test]
    fn a_title_alone_is_partial_data_not_not_found() {
        let page = ParsedPage {
            title: "Agnes Tachyon".to_string(),
            ..empty_page()
        };
        let result = assemble("https://example.test/1".to_string(), page, Vec::new());
        assert!(!result.is_not_found());
        assert_eq!(result.overall_rank, None);
    }

    #[test]
    fn events_alone_are_partial_data_not_not_found() {
        let page = ParsedPage {
            events: vec![EventRecord {
                name: "Rising Star".to_string(),
                conditions: String::new(),
                effects: String::new(),
            }],
            ..empty_page()
        };
        let result = assemble("https://example.test/1".to_string(), page, Vec::new());
        assert!(!result.is_not_found());
    }

    #[test]
    fn fields_pass_through_unchanged() {
        let page = ParsedPage {
            title: "Agnes Tachyon".to_string(),
            overall_rank: Some(Tier::S),
            recommended_stats: Some(StatBlock {
                speed: Some(1100),
                ..StatBlock::default()
            }),
            events: Vec::new(),
        };
        let result = assemble("https://example.test/1".to_string(), page, Vec::new());
        assert_eq!(result.title, "Agnes Tachyon");
        assert_eq!(result.overall_rank, Some(Tier::S));
        assert_eq!(result.recommended_stats.unwrap().speed, Some(1100));
    }
}
