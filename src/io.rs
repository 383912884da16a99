use std::fs::File;

use crate::error::NocturneError;

pub type UserId = u32;
pub type ItemId = u64;
pub type Rating = f64;
pub type Time = usize;

/// One rating line from disk: who rated what, how high, and when.
pub type RatingEvent = (UserId, ItemId, Rating, Time);

/// Reads tab-separated rating data in the format
/// `user_id <tab> item_id <tab> rating <tab> timestamp`, no header row.
/// Fields past the fourth are ignored. Events are returned in file order.
///
/// The timestamp is kept for dataset statistics only; a missing or
/// unparseable timestamp is read as 0 since the model never looks at it.
pub fn read_rating_events(path: &str) -> Result<Vec<RatingEvent>, NocturneError> {
    let file = File::open(path).map_err(|source| NocturneError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut events = Vec::new();
    for (record_index, result) in reader.records().enumerate() {
        let line = record_index + 1;
        let record = result.map_err(|e| NocturneError::MalformedRecord {
            path: path.to_string(),
            line,
            detail: e.to_string(),
        })?;
        if record.len() < 3 {
            return Err(NocturneError::MalformedRecord {
                path: path.to_string(),
                line,
                detail: format!(
                    "expected at least 3 tab-separated fields, got {}",
                    record.len()
                ),
            });
        }
        let user_id = parse_field::<UserId>(&record[0], "user id", path, line)?;
        let item_id = parse_field::<ItemId>(&record[1], "item id", path, line)?;
        let rating = parse_field::<Rating>(&record[2], "rating", path, line)?;
        let time = record
            .get(3)
            .and_then(|raw| raw.trim().parse::<Time>().ok())
            .unwrap_or(0);
        events.push((user_id, item_id, rating, time));
    }
    Ok(events)
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    what: &str,
    path: &str,
    line: usize,
) -> Result<T, NocturneError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| NocturneError::MalformedRecord {
            path: path.to_string(),
            line,
            detail: format!("cannot parse {} from '{}'", what, raw),
        })
}
