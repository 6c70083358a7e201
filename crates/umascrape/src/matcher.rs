/// Cross-references event text against the race catalog.
///
/// Matching is a case-insensitive substring test of each race name inside
/// the event's combined text, in page order then catalog order. Substring,
/// not word-boundary: race names carry punctuation that does not tokenize
/// cleanly, and consumers depend on the existing match behavior.
use tracing::debug;

use crate::model::{EventRecord, MentionedIn, RaceDescriptor, RaceMatch};

pub fn find_matching_races(
    events: &[EventRecord],
    catalog: &[RaceDescriptor],
) -> Vec<RaceMatch> {
    let lowered: Vec<String> = catalog.iter().map(|r| r.name.to_lowercase()).collect();
    let mut matches: Vec<RaceMatch> = Vec::new();

    for event in events {
        let text = format!("{} {} {}", event.name, event.conditions, event.effects).to_lowercase();
        let conditions = event.conditions.to_lowercase();

        for (race, race_lower) in catalog.iter().zip(&lowered) {
            if race_lower.is_empty() || !text.contains(race_lower.as_str()) {
                continue;
            }
            let already = matches
                .iter()
                .any(|m| m.race.name == race.name && m.event_name == event.name);
            if already {
                continue;
            }
            let mentioned_in = if conditions.contains(race_lower.as_str()) {
                MentionedIn::Conditions
            } else {
                MentionedIn::Effects
            };
            matches.push(RaceMatch {
                race: race.clone(),
                event_name: event.name.clone(),
                mentioned_in,
            });
        }
    }

    debug!(
        events = events.len(),
        races = catalog.len(),
        matches = matches.len(),
        "race matching complete"
    );
    matches
}
