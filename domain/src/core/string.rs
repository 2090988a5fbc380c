//! Short excerpts of chat lines for logs and status replies.

/// Marker appended to a shortened excerpt
const ELLIPSIS: &str = "...";

/// Shorten a chat line to at most `max_chars` characters.
///
/// Runs of whitespace collapse to one space so a pasted multi-line
/// proposal stays on one log line. Long lines are cut at the last word
/// break that fits, or mid-word when the first word alone is too long.
pub fn excerpt(line: &str, max_chars: usize) -> String {
    let flat = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }

    let budget = max_chars.saturating_sub(ELLIPSIS.len());
    let cut = flat
        .char_indices()
        .nth(budget)
        .map_or(flat.len(), |(index, _)| index);
    let head = &flat[..cut];
    let head = match head.rfind(' ') {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{head}{ELLIPSIS}")
}
