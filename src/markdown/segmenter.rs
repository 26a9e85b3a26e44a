use super::placeholder::{PLACEHOLDER_RE, is_placeholder};

/// A piece of a tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A placeholder token, passed through untouched.
    Placeholder(&'a str),
    /// Plain text, possibly whitespace only.
    Text(&'a str),
}

impl<'a> Segment<'a> {
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Placeholder(s) | Self::Text(s) => *s,
        }
    }
}

/// Splits a line into alternating text and placeholder segments.
///
/// Concatenating the segments gives back the line exactly. Empty text
/// between adjacent placeholders is dropped.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in PLACEHOLDER_RE.find_iter(line) {
        if m.start() > last {
            pieces.push(&line[last..m.start()]);
        }
        pieces.push(m.as_str());
        last = m.end();
    }
    if last < line.len() {
        pieces.push(&line[last..]);
    }

    pieces
        .into_iter()
        .map(|piece| {
            if is_placeholder(piece) {
                Segment::Placeholder(piece)
            } else {
                Segment::Text(piece)
            }
        })
        .collect()
}

/// Splits `text` into `(leading whitespace, content, trailing whitespace)`.
pub fn split_edges(text: &str) -> (&str, &str, &str) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);
    (&text[..start], &text[start..end], &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments_alternates() {
        let segments = split_segments("<<<HEADING_100>>>Hello <<<CODE_100>>> world");
        assert_eq!(
            segments,
            vec![
                Segment::Placeholder("<<<HEADING_100>>>"),
                Segment::Text("Hello "),
                Segment::Placeholder("<<<CODE_100>>>"),
                Segment::Text(" world"),
            ]
        );
    }

    #[test]
    fn test_split_segments_adjacent_placeholders() {
        let segments = split_segments("<<<LIST_100>>><<<LINK_100>>>");
        assert_eq!(
            segments,
            vec![
                Segment::Placeholder("<<<LIST_100>>>"),
                Segment::Placeholder("<<<LINK_100>>>"),
            ]
        );
    }

    #[test]
    fn test_split_segments_plain_and_empty() {
        assert_eq!(split_segments("just text"), vec![Segment::Text("just text")]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_unknown_token_is_text() {
        assert_eq!(
            split_segments("a <<<OTHER_1>>> b"),
            vec![Segment::Text("a <<<OTHER_1>>> b")]
        );
    }

    #[test]
    fn test_segments_concatenate_to_line() {
        let line = "  <<<LIST_100>>>Item <<<CODE_101>>>, done ";
        let rebuilt: String = split_segments(line).iter().map(Segment::as_str).collect();
        assert_eq!(rebuilt, line);
    }

    #[test]
    fn test_split_edges() {
        assert_eq!(split_edges("  hello world \t"), ("  ", "hello world", " \t"));
        assert_eq!(split_edges("hello"), ("", "hello", ""));
        assert_eq!(split_edges("   "), ("   ", "", ""));
        assert_eq!(split_edges(""), ("", "", ""));
    }
}
