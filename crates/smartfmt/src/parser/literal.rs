//! Character-literal decoding for literal template text.

use std::borrow::Cow;

/// Decode escape sequences such as `\n`, `\t`, `\{` and `\u00e9`.
///
/// Unrecognized sequences are written verbatim, escape character included.
pub(crate) fn unescape(raw: &str, escape: char) -> Cow<'_, str> {
    if !raw.contains(escape) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != escape {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push(c);
            break;
        };
        let decoded = match next {
            'u' => {
                let hex: String = chars.clone().skip(1).take(4).collect();
                match unicode_escape(&hex) {
                    Some(decoded) => {
                        // 'u' plus four hex digits
                        for _ in 0..5 {
                            chars.next();
                        }
                        out.push(decoded);
                    }
                    None => out.push(c),
                }
                continue;
            }
            n if n == escape => escape,
            other => match char_literal(other) {
                Some(decoded) => decoded,
                None => {
                    out.push(c);
                    continue;
                }
            },
        };
        chars.next();
        out.push(decoded);
    }
    Cow::Owned(out)
}

/// Whether `text` starts with four hex digits forming a valid `\u` escape.
pub(crate) fn is_unicode_escape(text: &str) -> bool {
    let hex: String = text.chars().take(4).collect();
    unicode_escape(&hex).is_some()
}

fn unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn char_literal(c: char) -> Option<char> {
    Some(match c {
        '\'' => '\'',
        '"' => '"',
        '0' => '\0',
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        '{' => '{',
        '}' => '}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(unescape("hello", '\\'), Cow::Borrowed("hello")));
    }

    #[test]
    fn decodes_common_literals() {
        assert_eq!(unescape(r"a\tb\nc", '\\'), "a\tb\nc");
        assert_eq!(unescape(r"\\", '\\'), "\\");
        assert_eq!(unescape(r"\{x\}", '\\'), "{x}");
    }

    #[test]
    fn decodes_unicode_escape() {
        assert_eq!(unescape(r"caf\u00e9", '\\'), "caf\u{e9}");
    }

    #[test]
    fn keeps_unknown_and_truncated_sequences() {
        assert_eq!(unescape(r"\q", '\\'), r"\q");
        assert_eq!(unescape(r"\u12", '\\'), r"\u12");
        assert_eq!(unescape("end\\", '\\'), "end\\");
    }

    #[test]
    fn custom_escape_char() {
        assert_eq!(unescape("~n~~", '~'), "\n~");
    }
}
