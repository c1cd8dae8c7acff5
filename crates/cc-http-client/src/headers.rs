//! Header collection rules

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Merge `headers` into `target`.
///
/// Entries with a blank name or value are dropped, names already present in
/// `target` keep their first value, and names or values the HTTP grammar
/// rejects are skipped. Values may carry non-ASCII text; only control
/// characters are refused. Returns how many headers were inserted.
pub(crate) fn merge_headers<I, K, V>(target: &mut HeaderMap, headers: I) -> usize
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut inserted = 0;

    for (key, value) in headers {
        let (key, value) = (key.as_ref(), value.as_ref());
        if key.trim().is_empty() || value.trim().is_empty() {
            continue;
        }

        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!("Skipping header with invalid name {key}: {err}");
                continue;
            }
        };

        if target.contains_key(&name) {
            tracing::debug!("Header {name} already set, keeping the first value");
            continue;
        }

        let value = match HeaderValue::from_bytes(value.as_bytes()) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Skipping header {name} with invalid value: {err}");
                continue;
            }
        };

        target.insert(name, value);
        inserted += 1;
    }

    inserted
}
