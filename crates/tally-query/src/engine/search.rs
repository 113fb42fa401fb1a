//! Free-text search.

use tally_core::Fields;

/// Keep records where any search field contains the text, ignoring case.
///
/// Empty search text keeps everything.
pub fn apply_search<'a, R, I>(records: I, search_text: &str, search_fields: &[String]) -> Vec<&'a R>
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    if search_text.is_empty() {
        return records.into_iter().collect();
    }

    let needle = search_text.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches_search(*record, &needle, search_fields))
        .collect()
}

/// Check one record against an already lower-cased needle.
fn matches_search<R: Fields>(
    record: &R,
    needle: &str,
    search_fields: &[String],
) -> bool {
    search_fields.iter().any(|field| {
        record
            .field(field)
            .is_some_and(|value| value.to_string().to_lowercase().contains(needle))
    })
}
