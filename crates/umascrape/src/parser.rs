/// Parser for a character's wiki page.
///
/// The page has a deterministic layout:
/// - Page title in the primary `<h1>` heading
/// - Tier rank and recommended stats in labeled table cells
/// - Training events in tables following the "Hidden Events" `<h2>`,
///   terminated by the next `<h2>`; `<h3>`–`<h5>` siblings name the events
///
/// Parser approach: DOM walk with declarative label lookups. Missing fields
/// become absent values; a page without the expected structure yields an
/// empty result rather than an error.
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::AppError;
use crate::model::{EventRecord, StatBlock, Tier};

/// Everything extracted from one character page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    pub overall_rank: Option<Tier>,
    pub recommended_stats: Option<StatBlock>,
    pub events: Vec<EventRecord>,
}

/// Stat labels as they appear on the page, in field order.
const STAT_LABELS: [&str; 5] = ["Speed", "Stamina", "Power", "Guts", "Wit"];

/// Section heading that opens the training-event blocks.
const EVENTS_SECTION_MARKER: &str = "Hidden Events";

pub fn parse_character_page(html: &str) -> Result<ParsedPage, AppError> {
    if html.trim().is_empty() {
        return Err(AppError::Parse("empty document".to_string()));
    }

    let doc = Html::parse_document(html);

    Ok(ParsedPage {
        title: extract_title(&doc),
        overall_rank: extract_rank(&doc),
        recommended_stats: extract_stats(&doc),
        events: extract_events(&doc),
    })
}

/// Element text with embedded markup collapsed to space-separated plain text.
pub(crate) fn collapse_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Element text chunks trimmed and concatenated with no separator.
/// Used where the site fuses adjacent values into one cell.
pub(crate) fn concat_text(el: ElementRef) -> String {
    el.text().map(str::trim).collect()
}

fn extract_title(doc: &Html) -> String {
    let h1_sel = Selector::parse("h1").expect("valid selector");
    doc.select(&h1_sel)
        .next()
        .map(collapse_text)
        .unwrap_or_default()
}

fn extract_rank(doc: &Html) -> Option<Tier> {
    let value = labeled_cell_value(doc, "Tier")?;
    tier_token(&value)
}

fn extract_stats(doc: &Html) -> Option<StatBlock> {
    let [speed, stamina, power, guts, wit] = STAT_LABELS.map(|label| {
        labeled_cell_value(doc, label).and_then(|value| value.trim().parse::<u32>().ok())
    });
    let stats = StatBlock {
        speed,
        stamina,
        power,
        guts,
        wit,
    };
    (!stats.is_empty()).then_some(stats)
}

/// Declarative field locator: find a table cell whose text equals `label`
/// (case-insensitive) and return the adjacent cell's text.
fn labeled_cell_value(doc: &Html, label: &str) -> Option<String> {
    let row_sel = Selector::parse("tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");
    for row in doc.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        for pair in cells.windows(2) {
            if collapse_text(pair[0]).eq_ignore_ascii_case(label) {
                return Some(collapse_text(pair[1]));
            }
        }
    }
    None
}

/// Extract the first tier token from a value cell, `SS` before single letters.
fn tier_token(text: &str) -> Option<Tier> {
    let re = Regex::new(r"(?i)\b(SS|[A-GS])\b").expect("valid regex");
    Tier::parse(re.find(text)?.as_str())
}

/// Walk the siblings after the events section heading, collecting one flat
/// ordered event list. `<h3>`–`<h5>` siblings set the current event name;
/// bold text inside a conditions cell overrides it (and carries over to
/// later rows of the same table). Rows without a name are dropped.
fn extract_events(doc: &Html) -> Vec<EventRecord> {
    let h2_sel = Selector::parse("h2").expect("valid selector");
    let Some(header) = doc
        .select(&h2_sel)
        .find(|h| collapse_text(*h).contains(EVENTS_SECTION_MARKER))
    else {
        debug!("no events section heading found");
        return Vec::new();
    };

    let mut events = Vec::new();
    let mut current_name: Option<String> = None;
    let mut node = header.next_sibling();
    while let Some(n) = node {
        if let Some(el) = ElementRef::wrap(n) {
            match el.value().name() {
                "h2" => break,
                "h3" | "h4" | "h5" => {
                    current_name = Some(collapse_text(el)).filter(|s| !s.is_empty());
                }
                "table" => parse_event_table(el, &mut current_name, &mut events),
                _ => {}
            }
        }
        node = n.next_sibling();
    }
    events
}

fn parse_event_table(
    table: ElementRef,
    current_name: &mut Option<String>,
    events: &mut Vec<EventRecord>,
) {
    let row_sel = Selector::parse("tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");
    let bold_sel = Selector::parse("b, strong").expect("valid selector");

    // First row is the column header.
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let mut conditions = collapse_text(cells[0]);
        let effects = format_effects(&collapse_text(cells[1]));

        if let Some(bold) = cells[0].select(&bold_sel).next() {
            let bold_text = collapse_text(bold);
            if !bold_text.is_empty() {
                conditions = conditions.replacen(&bold_text, "", 1).trim().to_string();
                *current_name = Some(bold_text);
            }
        }

        match current_name.as_deref() {
            Some(name) if !name.is_empty() => events.push(EventRecord {
                name: name.to_string(),
                conditions,
                effects,
            }),
            _ => debug!("dropping event row with no name"),
        }
    }
}

/// Normalize an effects cell with comma separation between gains,
/// e.g. "+10 Speed +5 Guts" → "+10, Speed +5, Guts".
fn format_effects(raw: &str) -> String {
    let stat_re = Regex::new(r"(\+\d+)\s+(Speed|Power|Stamina|Guts|Wisdom|Skill Points)")
        .expect("valid regex");
    let skill_re = Regex::new(r"(\+\d+)\s+([A-Z])").expect("valid regex");

    let formatted = stat_re.replace_all(raw, "$1, $2");
    skill_re.replace_all(&formatted, "$1, $2").into_owned()
}
