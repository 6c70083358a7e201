/// Race catalog loader.
///
/// The catalog is fetched and parsed once at process start and treated as
/// immutable for the process lifetime; the matcher receives it by reference.
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use uma_common::http::PageClient;

use crate::error::AppError;
use crate::model::{Distance, Period, RaceDescriptor, Tier};
use crate::parser::{collapse_text, concat_text};

/// The race schedule is the third `a-table` on the list page.
const RACE_TABLE_INDEX: usize = 2;

/// Fetch the race-list page and parse it into the catalog.
pub async fn load_catalog(
    client: &PageClient,
    url: &str,
) -> Result<Vec<RaceDescriptor>, AppError> {
    info!(url, "loading race catalog");
    let body = client.get_text(url).await?;
    Ok(parse_race_list(&body))
}

pub fn parse_race_list(html: &str) -> Vec<RaceDescriptor> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table.a-table").expect("valid selector");
    let tables: Vec<ElementRef> = doc.select(&table_sel).collect();

    let Some(table) = tables.get(RACE_TABLE_INDEX) else {
        warn!(
            found = tables.len(),
            expected = RACE_TABLE_INDEX + 1,
            "race list page missing expected tables"
        );
        return Vec::new();
    };

    parse_race_table(*table)
}

/// Row layout: period, tier, race name (fused with "Racecourse: ..."), distance.
fn parse_race_table(table: ElementRef) -> Vec<RaceDescriptor> {
    let row_sel = Selector::parse("tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");

    let mut races = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 4 {
            continue;
        }

        let name = concat_text(cells[2])
            .split("Racecourse:")
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        if name.is_empty() {
            continue;
        }

        let tier_raw = collapse_text(cells[1]);
        let Some(tier) = leading_tier(&tier_raw) else {
            warn!(race = %name, tier = %tier_raw, "skipping race with unrecognized tier");
            continue;
        };

        let distance_raw = collapse_text(cells[3]);
        let Some(distance) = Distance::parse(&distance_raw) else {
            warn!(race = %name, distance = %distance_raw, "skipping race with unrecognized distance");
            continue;
        };

        let schedule = format_schedule(&concat_text(cells[0]));
        let period = Period::from_schedule(&schedule);

        races.push(RaceDescriptor {
            name,
            period,
            tier,
            distance,
            schedule,
        });
    }
    races
}

/// Tier cells fuse the tier letter with a grade digit ("G1"); take the
/// leading alphabetic run.
fn leading_tier(text: &str) -> Option<Tier> {
    let token: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    Tier::parse(&token)
}

/// The site fuses the schedule words: "Early OctClassicSenior".
/// Insert bullet separators at lower-to-upper boundaries.
fn format_schedule(period: &str) -> String {
    let mut formatted = String::with_capacity(period.len() + 8);
    let mut prev: Option<char> = None;
    for ch in period.chars() {
        if let Some(p) = prev {
            if ch.is_uppercase() && p.is_lowercase() {
                formatted.push_str(" • ");
            }
        }
        formatted.push(ch);
        prev = Some(ch);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    const RACE_LIST_PAGE: &str = r#"
<html><body>
<table class="a-table"><tr><th>decoy</th></tr></table>
<table class="a-table"><tr><th>decoy</th></tr></table>
<table class="a-table">
  <tr><th>Period</th><th>Tier</th><th>Race</th><th>Distance</th></tr>
  <tr>
    <td>Early OctClassicSenior</td>
    <td>B</td>
    <td>Tokyo Sprint<span>Racecourse: Tokyo</span></td>
    <td>Short</td>
  </tr>
  <tr>
    <td>LateDecSenior</td>
    <td>G1</td>
    <td>Japan Cup<span>Racecourse: Tokyo</span></td>
    <td>Medium</td>
  </tr>
  <tr>
    <td>MidJun</td>
    <td>OP</td>
    <td>Unranked Meet</td>
    <td>Mile</td>
  </tr>
  <tr>
    <td>MidJun</td>
    <td>A</td>
    <td>Dirt Derby</td>
    <td>Dirt</td>
  </tr>
</table>
</body></html>
"#;

    #[test]
    fn parses_the_third_table_and_skips_malformed_rows() {
        let races = parse_race_list(RACE_LIST_PAGE);
        let names: Vec<&str> = races.iter().map(|r| r.name.as_str()).collect();
        // "OP" tier and "Dirt" distance rows are skipped.
        assert_eq!(names, ["Tokyo Sprint", "Japan Cup"]);
    }

    #[test]
    fn race_fields_are_normalized() {
        let races = parse_race_list(RACE_LIST_PAGE);

        let tokyo = &races[0];
        assert_eq!(tokyo.period, Period::Early);
        assert_eq!(tokyo.tier, Tier::B);
        assert_eq!(tokyo.distance, Distance::Short);
        assert_eq!(tokyo.schedule, "Early Oct • Classic • Senior");

        let japan = &races[1];
        assert_eq!(japan.period, Period::Late);
        assert_eq!(japan.tier, Tier::G, "G1 grade collapses to tier G");
        assert_eq!(japan.schedule, "Late • Dec • Senior");
    }

    #[test]
    fn too_few_tables_yields_empty_catalog() {
        let html = r#"<html><body><table class="a-table"><tr><td>x</td></tr></table></body></html>"#;
        assert!(parse_race_list(html).is_empty());
    }

    #[test]
    fn schedule_formatting_inserts_bullets_at_case_boundaries() {
        assert_eq!(
            format_schedule("Early OctClassicSenior"),
            "Early Oct • Classic • Senior"
        );
        assert_eq!(format_schedule("Debut"), "Debut");
        assert_eq!(format_schedule(""), "");
    }
}
