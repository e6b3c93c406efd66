//! Integration tests for the pseudo-localization pipeline.

use std::fs;

use proptest::prelude::*;
use smartfmt::pseudo::{
    CharacterSubstitutor, Encapsulator, ExpansionRule, Expander, InsertLocation, ListSelectionMode, Message,
    Mirror, PreserveTags, PseudoLocale, PseudoLocalizationMethod, PseudoMethod,
};
use smartfmt::pseudo_string;

fn digits() -> CharacterSubstitutor {
    CharacterSubstitutor::list('1'..='9', ListSelectionMode::LoopFromStart)
}

// =============================================================================
// Tag Preservation
// =============================================================================

#[test]
fn tags_preserved_when_replacing_characters() {
    let mut locale = PseudoLocale::empty().with(PreserveTags::default()).with(digits());
    assert_eq!(
        locale.pseudo_string("Hello <color=red>World</color>"),
        "123456<color=red>78912</color>"
    );
}

#[test]
fn tags_exposed_without_preservation() {
    let mut locale = PseudoLocale::empty().with(digits());
    let text = locale.pseudo_string("<b>");
    assert_eq!(text, "123");
}

#[test]
fn accenter_keeps_tags() {
    let mut locale = PseudoLocale::empty()
        .with(PreserveTags::default())
        .with(CharacterSubstitutor::accenter());
    assert_eq!(locale.pseudo_string("<b>bold</b>"), "<b>ƀöļð</b>");
}

#[test]
fn upper_case_keeps_tags() {
    let mut locale = PseudoLocale::empty()
        .with(PreserveTags::default())
        .with(CharacterSubstitutor::to_upper());
    assert_eq!(locale.pseudo_string("go <i>now</i>"), "GO <i>NOW</i>");
}

// =============================================================================
// Mirroring and Encapsulation
// =============================================================================

#[test]
fn mirror_ascii() {
    let mut locale = PseudoLocale::empty().with(Mirror);
    assert_eq!(locale.pseudo_string("ABC"), "CBA");
    let once = locale.pseudo_string("ABC");
    assert_eq!(locale.pseudo_string(&once), "ABC");
}

#[test]
fn mirror_per_line() {
    let mut locale = PseudoLocale::empty().with(Mirror);
    assert_eq!(
        locale.pseudo_string("This is some\nmultiple\nLines of text"),
        "emos si sihT\nelpitlum\ntxet fo seniL"
    );
}

#[test]
fn mirror_skips_tags() {
    let mut locale = PseudoLocale::empty().with(PreserveTags::default()).with(Mirror);
    assert_eq!(locale.pseudo_string("ab<x>cd"), "ba<x>dc");
}

#[test]
fn custom_encapsulation() {
    let mut locale = PseudoLocale::empty().with(Encapsulator::new("«", "»"));
    assert_eq!(locale.pseudo_string("text"), "«text»");
}

// =============================================================================
// Expansion
// =============================================================================

#[test]
fn expander_is_deterministic() {
    let mut expander = Expander::default();
    let first = pseudo_string(&mut [expander.clone()], "Hello");
    let second = pseudo_string(&mut [expander.clone()], "Hello");
    assert_eq!(first, second);
    assert!(first.starts_with("Hello"));
    assert_eq!(first.chars().count(), 15);

    let mut message = Message::new("Hello");
    expander.transform(&mut message);
    assert_eq!(message.to_string(), first);
}

#[test]
fn seeded_padding_is_stable() {
    insta::assert_snapshot!(pseudo_string(&mut [Expander::default()], "Hello"), @"Helloasxawlmkiy");
}

#[test]
fn seeded_random_substitution_is_stable() {
    let random = CharacterSubstitutor::list('1'..='9', ListSelectionMode::Random);
    insta::assert_snapshot!(pseudo_string(&mut [random], "Hello World"), @"88272113138");
}

#[test]
fn ratio_rounds_up_in_single_precision() {
    let expander = Expander::default();
    assert_eq!(expander.padding_length(25), 20);
    assert_eq!(expander.padding_length(26), 21);
    assert_eq!(expander.padding_length(100), 30);
}

#[test]
fn expander_at_start() {
    let expander = Expander::default().with_location(InsertLocation::Start);
    let text = pseudo_string(&mut [expander], "abcdefghijklmnopqrstuvwxyz");
    assert!(text.ends_with("abcdefghijklmnopqrstuvwxyz"));
    assert_eq!(text.chars().count(), 26 + 21);
}

#[test]
fn default_locale_order() {
    let mut locale = PseudoLocale::default();
    let kinds: Vec<&str> = locale
        .methods
        .iter()
        .map(|method| match method {
            PseudoMethod::PreserveTags(_) => "preserve_tags",
            PseudoMethod::Expander(_) => "expander",
            PseudoMethod::CharacterSubstitutor(_) => "character_substitutor",
            PseudoMethod::Mirror => "mirror",
            PseudoMethod::Encapsulator(_) => "encapsulator",
            PseudoMethod::Custom(_) => "custom",
        })
        .collect();
    assert_eq!(kinds, ["preserve_tags", "expander", "character_substitutor", "encapsulator"]);

    let text = locale.pseudo_string("Hi <b>there</b>");
    assert!(text.starts_with("[Ĥî <b>ŧĥéŕé</b>"));
    assert!(text.ends_with(']'));
    assert_eq!(locale.pseudo_string("Hi <b>there</b>"), text);
}

// =============================================================================
// Cursor State
// =============================================================================

#[test]
fn reset_restarts_loop_from_previous() {
    let mut locale = PseudoLocale::empty()
        .with(CharacterSubstitutor::list(['x', 'y', 'z'], ListSelectionMode::LoopFromPrevious));
    assert_eq!(locale.pseudo_string("ab"), "xy");
    assert_eq!(locale.pseudo_string("ab"), "zx");
    locale.reset();
    assert_eq!(locale.pseudo_string("ab"), "xy");
}

#[test]
fn custom_method() {
    #[derive(Default)]
    struct Counter {
        calls: usize,
    }

    impl PseudoLocalizationMethod for Counter {
        fn transform(&mut self, message: &mut Message) {
            self.calls += 1;
            let calls = self.calls;
            message.append(smartfmt::pseudo::ReadOnlyFragment::new(format!("#{calls}")));
        }

        fn reset(&mut self) {
            self.calls = 0;
        }
    }

    let mut locale = PseudoLocale::empty().with_custom(Counter::default());
    assert_eq!(locale.pseudo_string("a"), "a#1");
    assert_eq!(locale.pseudo_string("a"), "a#2");
    locale.reset();
    assert_eq!(locale.pseudo_string("a"), "a#1");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn locale_serializes_to_json() {
    let locale = PseudoLocale::empty().with(Mirror).with(Encapsulator::default());
    insta::assert_snapshot!(
        serde_json::to_string(&locale).unwrap(),
        @r#"{"methods":[{"type":"mirror"},{"type":"encapsulator","start":"[","end":"]"}]}"#
    );
}

#[test]
fn locale_loads_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pseudo.json");
    fs::write(
        &path,
        r#"{
            "methods": [
                { "type": "preserve_tags", "opening": "{", "closing": "}" },
                {
                    "type": "character_substitutor",
                    "method": { "mode": "map", "replacements": { "a": "4", "e": "3" } }
                },
                { "type": "encapsulator", "start": "<<" }
            ]
        }"#,
    )
    .unwrap();

    let mut locale: PseudoLocale = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(locale.methods.len(), 3);
    assert_eq!(locale.pseudo_string("beta {name}"), "<<b3t4 {name}]");
}

proptest! {
    #[test]
    fn encapsulation_wraps_any_input(input in ".{0,40}", start in "[\\[(<]{1,3}", end in "[\\])>]{1,3}") {
        let mut locale = PseudoLocale::empty().with(Encapsulator::new(start.clone(), end.clone()));
        let output = locale.pseudo_string(&input);
        prop_assert_eq!(output.len(), start.len() + input.len() + end.len());
        prop_assert!(output.starts_with(&start));
        prop_assert!(output.ends_with(&end));
    }

    #[test]
    fn mirroring_twice_is_identity(input in "[a-zA-Z0-9 \n]{0,40}") {
        let mut locale = PseudoLocale::empty().with(Mirror);
        let once = locale.pseudo_string(&input);
        prop_assert_eq!(locale.pseudo_string(&once), input);
    }

    #[test]
    fn non_positive_ratios_leave_text_unchanged(input in "[a-z <>]{0,80}", ratio in -2.0f32..=0.0) {
        let expander = Expander {
            rules: vec![ExpansionRule::new(0, usize::MAX, ratio)],
            ..Expander::default()
        };
        let mut locale = PseudoLocale::empty().with(expander);
        prop_assert_eq!(locale.pseudo_string(&input), input);
    }

    #[test]
    fn expansion_only_adds(input in "[a-z ]{0,80}") {
        let mut locale = PseudoLocale::empty().with(Expander::default());
        let output = locale.pseudo_string(&input);
        prop_assert!(output.starts_with(&input));
        prop_assert!(output.chars().count() > input.chars().count());
        prop_assert_eq!(locale.pseudo_string(&input), output);
    }
}
