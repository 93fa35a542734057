use regex::Regex;
use std::sync::OnceLock;

/// A `<% tp.file.cursor(N) %>` placeholder found in rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMarker {
    /// The exact matched text, delimiters and whitespace included
    pub raw_text: String,
    /// Explicit jump order, `None` for the default `tp.file.cursor()`
    pub order: Option<u8>,
    /// Character (not byte) index of the marker in the scanned text
    pub char_index: usize,
}

impl CursorMarker {
    /// Length of the raw text in characters
    pub fn char_len(&self) -> usize {
        self.raw_text.chars().count()
    }
}

fn cursor_regex() -> &'static Regex {
    static CURSOR_REGEX: OnceLock<Regex> = OnceLock::new();
    CURSOR_REGEX.get_or_init(|| {
        Regex::new(r"<%\s*tp\.file\.cursor\((?<order>[0-9]{0,2})\)\s*%>")
            .expect("Invalid cursor marker regex")
    })
}

/// Find every cursor marker in `text`, in document order.
pub fn scan_markers(text: &str) -> Vec<CursorMarker> {
    let mut markers = Vec::new();
    // Byte offsets from the regex are converted to char indices incrementally
    let mut last_byte = 0;
    let mut last_char = 0;

    for caps in cursor_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        last_char += text[last_byte..whole.start()].chars().count();
        last_byte = whole.start();

        let order = caps
            .name("order")
            .map(|m| m.as_str())
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse::<u8>().ok());

        markers.push(CursorMarker {
            raw_text: whole.as_str().to_string(),
            order,
            char_index: last_char,
        });
    }

    markers
}
