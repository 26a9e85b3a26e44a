use std::collections::HashSet;

use super::placeholder::PlaceholderMaps;

/// Orders `(placeholder, original)` pairs longest placeholder first.
///
/// A short token such as `X_10` is a prefix of `X_100`; replacing the
/// longer one first keeps the shorter pattern from biting into it.
/// The sort is stable, so equal lengths keep their input order.
pub fn by_descending_length<'a, I>(entries: I) -> Vec<(&'a str, &'a str)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entries
}

/// Replaces every occurrence of each key, in the order given.
///
/// Replacement is literal: `$` in the original text has no special meaning.
pub fn substitute(text: &str, entries: &[(&str, &str)]) -> String {
    entries
        .iter()
        .fold(text.to_string(), |text, (placeholder, original)| {
            if text.contains(placeholder) {
                text.replace(placeholder, original)
            } else {
                text
            }
        })
}

/// Puts the original content back in place of every placeholder.
///
/// A protected span can itself contain placeholders of rules that ran
/// earlier (inline code inside a link, a fence inside a `$$` block). Those
/// only appear once the outer one is restored, so passes repeat until
/// nothing is left to replace. Each placeholder is substituted in one pass
/// only.
pub fn restore(text: &str, maps: &PlaceholderMaps) -> String {
    let ordered = by_descending_length(maps.iter().map(|(_, key, value)| (key, value)));
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut text = text.to_string();

    loop {
        let pending: Vec<(&str, &str)> = ordered
            .iter()
            .filter(|(key, _)| !consumed.contains(key) && text.contains(key))
            .copied()
            .collect();
        if pending.is_empty() {
            return text;
        }
        text = substitute(&text, &pending);
        consumed.extend(pending.iter().map(|(key, _)| *key));
    }
}

/// Strips each whitespace-separated item of `chars` from `text`, in order.
pub fn remove_chars(text: &str, chars: &str) -> String {
    chars
        .split_whitespace()
        .fold(text.to_string(), |text, target| text.replace(target, ""))
}
