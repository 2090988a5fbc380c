//! IRC nickname comparison.
//!
//! Nicknames are case-insensitive under RFC 1459 rules, where `{}|^` are the
//! lowercase forms of `[]\~`.

/// Fold a single character to its RFC 1459 lowercase form.
fn fold_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        c => c.to_ascii_lowercase(),
    }
}

/// Fold a nickname to its canonical lowercase form.
pub fn fold_nick(nick: &str) -> String {
    nick.chars().map(fold_char).collect()
}

/// Compare two nicknames under RFC 1459 case folding.
pub fn nick_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_case_insensitive() {
        assert!(nick_eq("Alice", "alice"));
        assert!(!nick_eq("alice", "alicea"));
    }

    #[test]
    fn test_rfc1459_brackets() {
        assert!(nick_eq("nick[away]", "NICK{AWAY}"));
        assert!(nick_eq("a\\b", "A|B"));
        assert!(nick_eq("x~", "X^"));
        assert_eq!(fold_nick("Foo[]"), "foo{}");
    }
}
