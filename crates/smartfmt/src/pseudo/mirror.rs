use unicode_segmentation::UnicodeSegmentation;

use crate::pseudo::message::Message;
use crate::pseudo::PseudoLocalizationMethod;

/// Reverses each line of each writable fragment, simulating right-to-left text.
///
/// Grapheme clusters are kept intact and line breaks stay where they were.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mirror;

impl PseudoLocalizationMethod for Mirror {
    fn transform(&mut self, message: &mut Message) {
        for fragment in message.writable_fragments_mut() {
            let mirrored = mirror_lines(fragment.text());
            fragment.set_text(mirrored);
        }
    }
}

fn mirror_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (content, line_break) = match line.strip_suffix("\r\n") {
            Some(content) => (content, "\r\n"),
            None => match line.strip_suffix('\n') {
                Some(content) => (content, "\n"),
                None => (line, ""),
            },
        };
        out.extend(content.graphemes(true).rev());
        out.push_str(line_break);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_each_line() {
        assert_eq!(
            mirror_lines("This is some\nmultiple\nLines of text"),
            "emos si sihT\nelpitlum\ntxet fo seniL"
        );
    }

    #[test]
    fn keeps_crlf_and_trailing_break() {
        assert_eq!(mirror_lines("ab\r\ncd\n"), "ba\r\ndc\n");
    }

    #[test]
    fn keeps_grapheme_clusters() {
        assert_eq!(mirror_lines("e\u{301}x"), "xe\u{301}");
    }
}
