//! Integration tests for parse and format error handling.

use smartfmt::extensions::{PluralFormatter, SubStringFormatter, SubStringOutOfRange, TimeFormatter};
use smartfmt::{
    ConfigError, ErrorAction, FormatError, ParserSettings, ParsingError, SmartFormatter, SmartSettings,
    args,
};

fn formatter_with(format_error_action: ErrorAction) -> SmartFormatter {
    let settings = SmartSettings::builder()
        .format_error_action(format_error_action)
        .build();
    SmartFormatter::builder().settings(settings).build()
}

fn substr_with(out_of_range: SubStringOutOfRange) -> SmartFormatter {
    let mut formatter = SmartFormatter::default();
    formatter.insert_formatter(0, SubStringFormatter::new(out_of_range));
    formatter
}

fn formatter_with_parse_action(parse_error_action: ErrorAction) -> SmartFormatter {
    let parser = ParserSettings::builder()
        .parse_error_action(parse_error_action)
        .build();
    let settings = SmartSettings::builder().parser(parser).build();
    SmartFormatter::builder().settings(settings).build()
}

// =============================================================================
// Format Errors
// =============================================================================

#[test]
fn unresolved_selector_is_an_error_by_default() {
    let err = SmartFormatter::default().format("a {missing} b", &[]).unwrap_err();
    match err {
        FormatError::UnresolvedSelector {
            selector,
            index,
            placeholder,
        } => {
            assert_eq!(selector, "missing");
            assert_eq!(index, 0);
            assert_eq!(placeholder, "{missing}");
        }
        other => panic!("expected UnresolvedSelector, got {other:?}"),
    }
}

#[test]
fn missing_argument_is_unresolved() {
    let err = SmartFormatter::default().format("{1}", &args!["only one"]).unwrap_err();
    assert!(matches!(err, FormatError::UnresolvedSelector { .. }));
}

#[test]
fn maintain_tokens_writes_placeholder_back() {
    let formatter = formatter_with(ErrorAction::MaintainTokens);
    assert_eq!(formatter.format("a {missing} b", &[]).unwrap(), "a {missing} b");
}

#[test]
fn ignore_drops_placeholder() {
    let formatter = formatter_with(ErrorAction::Ignore);
    assert_eq!(formatter.format("a {missing} b", &[]).unwrap(), "a  b");
}

#[test]
fn output_error_in_result() {
    let formatter = formatter_with(ErrorAction::OutputErrorInResult);
    let text = formatter.format("a {missing} b", &[]).unwrap();
    assert!(text.starts_with("a could not evaluate the selector 'missing'"));
    assert!(text.ends_with(" b"));
}

#[test]
fn nested_failures_are_handled_in_place() {
    let formatter = formatter_with(ErrorAction::MaintainTokens);
    let text = formatter
        .format("[{0:list:{}{1}|, }]", &args![vec!["x", "y"]])
        .unwrap();
    assert_eq!(text, "[x{1}, y{1}]");
}

#[test]
fn no_suitable_formatter() {
    let err = SmartFormatter::default()
        .format("{0:choose:a|b}", &args!["a"])
        .unwrap_err();
    match err {
        FormatError::NoSuitableFormatter { formatter, .. } => {
            assert_eq!(formatter.as_deref(), Some("choose"));
        }
        other => panic!("expected NoSuitableFormatter, got {other:?}"),
    }
}

#[test]
fn formatter_failure_names_the_formatter() {
    let err = SmartFormatter::default()
        .format("{0:choose(a|b):A|B|C|D}", &args!["a"])
        .unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "choose", .. }));
    assert!(err.to_string().starts_with("choose formatter failed on '{0:choose(a|b):A|B|C|D}'"));
}

#[test]
fn choose_with_too_few_choices_fails() {
    let err = SmartFormatter::default()
        .format("{0:choose(a|b|c):A|B}", &args!["a"])
        .unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "choose", .. }));
}

#[test]
fn choose_without_match_or_default_fails() {
    let err = SmartFormatter::default()
        .format("{0:choose(a|b):A|B}", &args!["z"])
        .unwrap_err();
    assert!(err.to_string().contains("no option matches 'z'"));
}

#[test]
fn oversized_number_precision_fails() {
    let err = SmartFormatter::default().format("{0:F70000}", &args![1.5]).unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "default", .. }));
}

// =============================================================================
// Substrings
// =============================================================================

#[test]
fn substr_out_of_range_is_empty_by_default() {
    let formatter = SmartFormatter::default();
    assert_eq!(formatter.format("[{0:substr(2,10)}]", &args!["Hello"]).unwrap(), "[]");
    assert_eq!(formatter.format("[{0:substr(-10)}]", &args!["Hello"]).unwrap(), "[]");
}

#[test]
fn substr_overflowing_length_is_out_of_range() {
    let template = "[{0:substr(1,9223372036854775807)}]";
    assert_eq!(SmartFormatter::default().format(template, &args!["Hello"]).unwrap(), "[]");

    let to_end = substr_with(SubStringOutOfRange::ReturnStartIndexToEndOfString);
    assert_eq!(to_end.format(template, &args!["Hello"]).unwrap(), "[ello]");
    assert_eq!(
        to_end.format("[{0:substr(1,-9223372036854775807)}]", &args!["Hello"]).unwrap(),
        "[ello]"
    );
}

#[test]
fn substr_start_index_to_end_of_string() {
    let formatter = substr_with(SubStringOutOfRange::ReturnStartIndexToEndOfString);
    assert_eq!(formatter.format("{0:substr(2,10)}", &args!["Hello"]).unwrap(), "llo");
    assert_eq!(formatter.format("{0:substr(-10)}", &args!["Hello"]).unwrap(), "Hello");
    assert_eq!(formatter.format("{0:substr(1,2)}", &args!["Hello"]).unwrap(), "el");
}

#[test]
fn substr_out_of_range_can_throw() {
    let formatter = substr_with(SubStringOutOfRange::ThrowError);
    let err = formatter.format("{0:substr(2,10)}", &args!["Hello"]).unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "substr", .. }));
    assert!(formatter.format("{0:substr(1,-1)}", &args!["Hello"]).is_ok());
}

#[test]
fn substr_requires_numeric_options() {
    let formatter = SmartFormatter::default();
    for template in ["{0:substr}", "{0:substr(x)}", "{0:substr(1,y)}"] {
        let err = formatter.format(template, &args!["Hello"]).unwrap_err();
        assert!(
            matches!(err, FormatError::Formatter { formatter: "substr", .. }),
            "{template}: {err:?}"
        );
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn plural_formatter_rejects_bad_languages() {
    assert!(matches!(
        PluralFormatter::new("not a language!").unwrap_err(),
        ConfigError::InvalidLanguage { .. }
    ));
    assert!(matches!(
        PluralFormatter::new("tlh").unwrap_err(),
        ConfigError::UnsupportedLanguage { component: "plural formatter", .. }
    ));
    assert!(PluralFormatter::new("ru-RU").is_ok());
}

#[test]
fn time_formatter_rejects_bad_languages() {
    assert!(matches!(
        TimeFormatter::new("not a language!").unwrap_err(),
        ConfigError::InvalidLanguage { .. }
    ));
    let err = TimeFormatter::new("ja").unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedLanguage { component: "time formatter", .. }));
    assert!(err.to_string().ends_with("available: en, de, fr, es"));
}

#[test]
fn explicit_plural_with_wrong_form_count_fails() {
    let err = SmartFormatter::default()
        .format("{0:plural:a|b|c|d}", &args![2])
        .unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "plural", .. }));
}

#[test]
fn invalid_regex_fails() {
    let err = SmartFormatter::default()
        .format("{0:ismatch([):yes|no}", &args!["x"])
        .unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "ismatch", .. }));
}

#[test]
fn unknown_number_spec_fails() {
    let err = SmartFormatter::default().format("{0:Q2}", &args![5]).unwrap_err();
    assert!(matches!(err, FormatError::Formatter { formatter: "default", .. }));
}

#[test]
fn unknown_template_fails() {
    let err = SmartFormatter::default()
        .format("{0:t(nowhere)}", &args![1])
        .unwrap_err();
    assert!(err.to_string().contains("no template named 'nowhere'"));
}

// =============================================================================
// Parse Errors
// =============================================================================

#[test]
fn parse_errors_throw_by_default() {
    let err = SmartFormatter::default().format("{0", &args![1]).unwrap_err();
    let FormatError::Parse(errors) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(errors.issues()[0].kind, ParsingError::MissingClosingBrace);
}

#[test]
fn parse_errors_can_be_output() {
    let formatter = formatter_with_parse_action(ErrorAction::OutputErrorInResult);
    let text = formatter.format("a}b", &[]).unwrap();
    assert!(text.starts_with("the format string has 1 issue"));
}

#[test]
fn parse_errors_can_be_ignored() {
    let formatter = formatter_with_parse_action(ErrorAction::Ignore);
    assert_eq!(formatter.format("a}b", &[]).unwrap(), "ab");
    assert_eq!(formatter.format("x {0", &args![7]).unwrap(), "x 7");
}

#[test]
fn parse_issues_are_cached_with_the_template() {
    let formatter = formatter_with_parse_action(ErrorAction::Ignore);
    let parsed = formatter.parse("{a.}");
    assert_eq!(
        parsed.errors().issues()[0].kind,
        ParsingError::TrailingOperatorsInSelector
    );
    assert!(formatter.cache().contains("{a.}"));
}

#[test]
fn suggestions_for_misspelled_names() {
    let names: Vec<String> = SmartFormatter::default().formatter_names();
    let suggestions = smartfmt::compute_suggestions("plurl", &names);
    assert_eq!(suggestions.first().map(String::as_str), Some("plural"));
}
