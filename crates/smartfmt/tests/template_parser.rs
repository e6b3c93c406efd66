//! Integration tests for template parsing.

use proptest::prelude::*;
use smartfmt::parser::{Format, FormatItem, Parser, Placeholder};
use smartfmt::{CaseSensitivity, ParserSettings, ParsingError, SmartFormatter, args};

fn parse(text: &str) -> (Format, smartfmt::ParsingErrors) {
    Parser::default().parse(text, &["list", "choose", "plural"])
}

fn placeholder(format: &Format, index: usize) -> &Placeholder {
    match &format.items()[index] {
        FormatItem::Placeholder(p) => p,
        FormatItem::Literal(l) => panic!("expected placeholder, got literal {:?}", l.raw_text()),
    }
}

/// Greatest number of braces open at once, for templates without escapes.
fn max_open_braces(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0;
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth -= 1,
            _ => {}
        }
    }
    max
}

/// Templates with balanced placeholders, some holding nested formats.
fn balanced_template() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[xyz ]{1,4}",
        "[a-c]{1,3}".prop_map(|name| format!("{{{name}}}")),
    ];
    let node = leaf.prop_recursive(4, 32, 4, |inner| {
        ("[a-c]{1,3}", prop::collection::vec(inner, 0..4))
            .prop_map(|(name, parts)| format!("{{{name}:{}}}", parts.concat()))
    });
    prop::collection::vec(node, 1..4).prop_map(|parts| parts.concat())
}

fn kinds(text: &str) -> Vec<ParsingError> {
    parse(text).1.issues().iter().map(|issue| issue.kind).collect()
}

// =============================================================================
// Literal Text
// =============================================================================

#[test]
fn plain_text_is_one_literal() {
    let (format, errors) = parse("Hello, world!");
    assert!(errors.is_empty());
    assert_eq!(format.items().len(), 1);
    assert_eq!(format.literal_text(), "Hello, world!");
    assert!(!format.has_nested());
}

#[test]
fn doubled_braces_are_literal() {
    let (format, errors) = parse("{{x}}");
    assert!(errors.is_empty());
    assert_eq!(format.literal_text(), "{x}");
    assert!(!format.has_nested());
}

#[test]
fn alternative_escaping_uses_escape_char() {
    let settings = ParserSettings::builder().alternative_escaping(true).build();
    let (format, errors) = Parser::new(settings).parse(r"\{x\}", &[]);
    assert!(errors.is_empty());
    assert_eq!(format.literal_text(), "{x}");
}

#[test]
fn character_literals_are_decoded() {
    let (format, _) = parse(r"café\tok");
    assert_eq!(format.literal_text(), "caf\u{e9}\tok");
}

#[test]
fn character_literals_can_be_kept() {
    let settings = ParserSettings::builder().convert_character_literals(false).build();
    let (format, _) = Parser::new(settings).parse(r"a\tb", &[]);
    assert_eq!(format.literal_text(), r"a\tb");
}

// =============================================================================
// Placeholders and Selectors
// =============================================================================

#[test]
fn placeholder_between_literals() {
    let (format, errors) = parse("Hi {name}!");
    assert!(errors.is_empty());
    assert_eq!(format.items().len(), 3);
    let p = placeholder(&format, 1);
    assert_eq!(p.raw_text(), "{name}");
    assert_eq!(p.span(), 3..9);
    assert_eq!(p.nested_depth(), 1);
    assert!(p.format().is_none());
}

#[test]
fn selector_chain_with_operators() {
    let (format, errors) = parse("{player.items[2].name}");
    assert!(errors.is_empty());
    let selectors: Vec<(&str, &str, usize)> = placeholder(&format, 0)
        .selectors()
        .iter()
        .map(|s| (s.operator(), s.text(), s.index()))
        .collect();
    assert_eq!(
        selectors,
        vec![("", "player", 0), (".", "items", 1), ("[", "2", 2), ("].", "name", 3)]
    );
}

#[test]
fn alignment_selector() {
    let (format, _) = parse("{0,-10}");
    let selectors = placeholder(&format, 0).selectors();
    assert_eq!(selectors[1].operator(), ",");
    assert_eq!(selectors[1].text(), "-10");
}

#[test]
fn empty_placeholder_has_no_selectors() {
    let (format, errors) = parse("{}");
    assert!(errors.is_empty());
    assert!(placeholder(&format, 0).selectors().is_empty());
}

#[test]
fn nested_formats() {
    let (format, errors) = parse("{a:{b:{c}}}");
    assert!(errors.is_empty());
    assert_eq!(format.max_nesting_depth(), 3);
    let outer = placeholder(&format, 0);
    let inner = placeholder(outer.format().expect("outer format"), 0);
    assert_eq!(inner.raw_text(), "{b:{c}}");
    assert_eq!(inner.nested_depth(), 2);
}

#[test]
fn nested_format_closing_next_to_parent() {
    let (format, errors) = parse("{a:{b:x}}");
    assert!(errors.is_empty());
    let outer = placeholder(&format, 0);
    assert_eq!(outer.raw_text(), "{a:{b:x}}");
    let inner = placeholder(outer.format().expect("outer format"), 0);
    assert_eq!(inner.format().map(Format::raw_text), Some("x"));
}

#[test]
fn doubled_closing_brace_after_nested_format_evaluates() {
    let text = SmartFormatter::default().format("{0:{0:D3}}", &args![7]).unwrap();
    assert_eq!(text, "007");
}

#[test]
fn format_section_is_kept_raw() {
    let (format, _) = parse("{count:one|many}");
    let p = placeholder(&format, 0);
    assert_eq!(p.formatter_name(), None);
    assert_eq!(p.format().map(Format::raw_text), Some("one|many"));
}

// =============================================================================
// Named Formatters
// =============================================================================

#[test]
fn named_formatter_with_options() {
    let (format, errors) = parse("{x:choose(a|b):A|B}");
    assert!(errors.is_empty());
    let p = placeholder(&format, 0);
    assert_eq!(p.formatter_name(), Some("choose"));
    assert_eq!(p.formatter_options(), Some("a|b"));
    assert_eq!(p.format().map(Format::raw_text), Some("A|B"));
}

#[test]
fn named_formatter_without_options() {
    let (format, _) = parse("{items:list:{}|, }");
    let p = placeholder(&format, 0);
    assert_eq!(p.formatter_name(), Some("list"));
    assert_eq!(p.formatter_options(), None);
    assert_eq!(p.format().map(Format::raw_text), Some("{}|, "));
}

#[test]
fn options_may_contain_parentheses() {
    let (format, _) = parse("{x:choose((a)|b):A|B}");
    let p = placeholder(&format, 0);
    assert_eq!(p.formatter_options(), Some("(a)|b"));
}

#[test]
fn unknown_name_is_format_text() {
    let (format, _) = parse("{x:shout:hello}");
    let p = placeholder(&format, 0);
    assert_eq!(p.formatter_name(), None);
    assert_eq!(p.format().map(Format::raw_text), Some("shout:hello"));
}

#[test]
fn formatter_names_follow_case_sensitivity() {
    let sensitive = Parser::default();
    let (format, _) = sensitive.parse("{x:LIST:a|b}", &["list"]);
    assert_eq!(placeholder(&format, 0).formatter_name(), None);

    let insensitive =
        Parser::with_case_sensitivity(ParserSettings::default(), CaseSensitivity::CaseInsensitive);
    let (format, _) = insensitive.parse("{x:LIST:a|b}", &["list"]);
    assert_eq!(placeholder(&format, 0).formatter_name(), Some("LIST"));
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn split_ignores_nested_separators() {
    let (format, _) = parse("a|{x:b|c}|d");
    let parts: Vec<String> = format.split('|').iter().map(|f| f.raw_text().to_string()).collect();
    assert_eq!(parts, vec!["a", "{x:b|c}", "d"]);
}

#[test]
fn split_keeps_empty_parts() {
    let (format, _) = parse("|x|");
    let parts: Vec<String> = format.split('|').iter().map(|f| f.raw_text().to_string()).collect();
    assert_eq!(parts, vec!["", "x", ""]);
}

// =============================================================================
// Parse Issues
// =============================================================================

#[test]
fn missing_closing_brace() {
    let (format, errors) = parse("{0");
    assert_eq!(kinds("{0"), vec![ParsingError::MissingClosingBrace]);
    assert_eq!(errors.issues()[0].span(), 2..2);
    assert_eq!(placeholder(&format, 0).selectors()[0].text(), "0");
}

#[test]
fn too_many_closing_braces() {
    let (format, errors) = parse("a}b");
    assert_eq!(errors.issues()[0].kind, ParsingError::TooManyClosingBraces);
    assert_eq!(errors.issues()[0].span(), 1..2);
    assert_eq!(format.literal_text(), "ab");
}

#[test]
fn invalid_selector_character() {
    assert_eq!(kinds("{a b}"), vec![ParsingError::InvalidCharactersInSelector]);
    assert_eq!(parse("{a b}").1.issues()[0].span(), 2..3);
}

#[test]
fn trailing_operator() {
    assert_eq!(kinds("{a.}"), vec![ParsingError::TrailingOperatorsInSelector]);
    assert!(kinds("{a[0]}").is_empty());
}

#[test]
fn unclosed_nested_placeholders_report_once() {
    assert_eq!(kinds("{a:{b:x"), vec![ParsingError::MissingClosingBrace]);
}

#[test]
fn parse_errors_display() {
    let (_, errors) = parse("{0");
    insta::assert_snapshot!(
        errors.to_string(),
        @r#"the format string has 1 issue: format string is missing a closing brace at 2..2 in "{0""#
    );
}

#[test]
fn parse_format_honors_error_action() {
    let throwing = Parser::default();
    assert!(throwing.parse_format("{0", &[]).is_err());

    let settings = ParserSettings::builder()
        .parse_error_action(smartfmt::ErrorAction::Ignore)
        .build();
    let lenient = Parser::new(settings);
    assert!(lenient.parse_format("{0", &[]).is_ok());
}

proptest! {
    #[test]
    fn text_without_special_characters_is_literal(text in "[a-zA-Z0-9 .,!?]{1,40}") {
        let (format, errors) = parse(&text);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(format.items().len(), 1);
        prop_assert!(matches!(format.items()[0], FormatItem::Literal(_)));
        prop_assert_eq!(format.literal_text(), text.clone());
        prop_assert_eq!(SmartFormatter::default().format(&text, &[]).unwrap(), text);
    }

    #[test]
    fn balanced_templates_parse_cleanly(text in balanced_template()) {
        let (format, errors) = parse(&text);
        prop_assert!(errors.is_empty(), "{text}: {errors}");
        prop_assert_eq!(format.max_nesting_depth(), max_open_braces(&text));
    }

    #[test]
    fn parsing_never_loses_the_source(text in "[a-z{}:|.\\\\]{0,30}") {
        let (format, _) = parse(&text);
        prop_assert_eq!(format.source(), text.as_str());
        prop_assert_eq!(format.span(), 0..text.len());
    }
}
