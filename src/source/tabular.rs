use super::{FetchError, Fetcher, SourceRef};
use crate::catalog::ScheduleEntry;

pub async fn load_schedule<F: Fetcher>(
    fetcher: &F,
    source: &SourceRef,
) -> Result<Vec<ScheduleEntry>, FetchError> {
    let text = fetcher.fetch_text(source).await?;
    Ok(parse_schedule(&text))
}

/// Parses the schedule sheet export: header line first, then
/// `day,artist,photo` rows.
///
/// Rows with fewer than two columns (trailing blank lines) are skipped
/// silently. Rows with unbalanced quotes are skipped and logged.
pub fn parse_schedule(text: &str) -> Vec<ScheduleEntry> {
    let mut out = Vec::new();
    for (line_no, line) in text.lines().enumerate().skip(1) {
        let cols = match split_row(line) {
            Some(cols) => cols,
            None => {
                log::warn!(
                    "schedule: skipping line {} with unbalanced quotes: {line}",
                    line_no + 1
                );
                continue;
            }
        };
        if cols.len() < 2 {
            continue;
        }
        out.push(ScheduleEntry {
            day: unquote(cols[0]),
            artist: unquote(cols[1]),
            photo: cols.get(2).map(|c| unquote(c)).unwrap_or_default(),
        });
    }
    out
}

/// Splits on commas outside double quotes. `None` when the quotes don't pair up.
fn split_row(line: &str) -> Option<Vec<&str>> {
    let mut cols = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cols.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return None;
    }
    cols.push(&line[start..]);
    Some(cols)
}

fn unquote(col: &str) -> String {
    col.replace('"', "").trim().to_string()
}
