//! Text helpers for caret-based queries.

/// The expression that ends at the end of `text`: identifiers, dots and
/// balanced bracket groups, e.g. `list.get(i).pos` in `x = list.get(i).pos`.
pub fn trailing_expression(text: &str) -> &str {
    let mut depth = 0usize;
    let mut start = text.len();
    for (at, ch) in text.char_indices().rev() {
        match ch {
            ')' | ']' => depth += 1,
            '(' | '[' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            ch if is_identifier_char(ch) || ch == '.' => {}
            _ => break,
        }
        start = at;
    }
    if depth > 0 {
        return "";
    }
    text[start..].trim_start_matches('.')
}

/// Split `receiver.member` at its last top-level dot. Text without a dot has
/// no receiver.
pub fn split_receiver(expression: &str) -> (Option<&str>, &str) {
    let mut depth = 0usize;
    for (at, ch) in expression.char_indices().rev() {
        match ch {
            ')' | ']' => depth += 1,
            '(' | '[' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => return (Some(&expression[..at]), &expression[at + 1..]),
            _ => {}
        }
    }
    (None, expression)
}

/// Case-insensitive prefix test.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| chars.next() == Some(p))
}

pub fn is_identifier_char(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_ident::is_xid_continue(ch)
}
