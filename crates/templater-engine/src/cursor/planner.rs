use super::markers::scan_markers;
use super::position::{CursorPosition, resolve_position};

/// Result of planning: marker-free content and the carets to place in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPlan {
    pub content: String,
    pub positions: Vec<CursorPosition>,
}

impl CursorPlan {
    /// Consume the plan, handing the positions over to a caret transaction.
    pub fn into_positions(self) -> std::vec::IntoIter<CursorPosition> {
        self.positions.into_iter()
    }
}

/// Strip the next round of cursor markers from `content` and compute where
/// the carets go.
///
/// Returns `None` when the content holds no markers at all. Otherwise the
/// marker with the lowest explicit order wins (default markers come last) and
/// only exact textual duplicates of the winning marker are consumed. A default
/// `tp.file.cursor()` marker only ever yields its first occurrence.
pub fn plan_cursors(content: &str) -> Option<CursorPlan> {
    let mut markers = scan_markers(content);
    if markers.is_empty() {
        return None;
    }

    // Stable, so markers with equal order stay in document order
    markers.sort_by_key(|m| (m.order.is_none(), m.order));
    let match_str = markers[0].raw_text.clone();

    let mut selected: Vec<_> = markers
        .into_iter()
        .filter(|m| m.raw_text == match_str)
        .collect();
    selected.sort_by_key(|m| m.char_index);

    let mut content = content.to_string();
    let mut positions = Vec::with_capacity(selected.len());
    let mut index_offset = 0;

    for marker in &selected {
        let index = marker.char_index - index_offset;
        positions.push(resolve_position(&content, index));

        content = content.replacen(&marker.raw_text, "", 1);
        index_offset += marker.char_len();

        if marker.order.is_none() {
            break;
        }
    }

    log::debug!(
        "planned {} cursor(s) for marker {match_str:?}",
        positions.len()
    );

    Some(CursorPlan { content, positions })
}
