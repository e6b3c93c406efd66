use const_fnv1a_hash::fnv1a_hash_str_64;
use icu_casemap::CaseMapper;
use icu_locale_core::langid;
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::pseudo::message::Message;
use crate::pseudo::PseudoLocalizationMethod;

/// How [`SubstitutionMethod::List`] picks replacement characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSelectionMode {
    /// Seeded by a hash of the original input.
    #[default]
    Random,
    /// Continue from where the previous message stopped.
    LoopFromPrevious,
    /// Restart at the first character for every message.
    LoopFromStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubstitutionMethod {
    ToUpper,
    ToLower,
    /// Replace characters found in the table; others are left alone.
    Map { replacements: IndexMap<char, char> },
    /// Replace every character with one from `characters`.
    List {
        characters: Vec<char>,
        #[serde(default)]
        selection: ListSelectionMode,
    },
}

/// Rewrites the characters of writable fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSubstitutor {
    pub method: SubstitutionMethod,
    #[serde(skip)]
    cursor: usize,
}

impl CharacterSubstitutor {
    pub fn new(method: SubstitutionMethod) -> Self {
        Self { method, cursor: 0 }
    }

    pub fn to_upper() -> Self {
        Self::new(SubstitutionMethod::ToUpper)
    }

    pub fn to_lower() -> Self {
        Self::new(SubstitutionMethod::ToLower)
    }

    pub fn map(replacements: impl IntoIterator<Item = (char, char)>) -> Self {
        Self::new(SubstitutionMethod::Map {
            replacements: replacements.into_iter().collect(),
        })
    }

    pub fn list(characters: impl IntoIterator<Item = char>, selection: ListSelectionMode) -> Self {
        Self::new(SubstitutionMethod::List {
            characters: characters.into_iter().collect(),
            selection,
        })
    }

    /// Replaces ASCII letters with accented look-alikes.
    pub fn accenter() -> Self {
        Self::map(ASCII_LETTERS.chars().zip(ACCENTED_LETTERS.chars()))
    }
}

const ASCII_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ACCENTED_LETTERS: &str = "ÅƁÇÐÉƑĜĤÎĴĶĻṀÑÖÞǪŔŠŦÛṼŴẊÝŽåƀçðéƒĝĥîĵķļṁñöþǫŕšŧûṽŵẋýž";

impl PseudoLocalizationMethod for CharacterSubstitutor {
    fn transform(&mut self, message: &mut Message) {
        match &self.method {
            SubstitutionMethod::ToUpper => {
                let mapper = CaseMapper::new();
                for fragment in message.writable_fragments_mut() {
                    let upper = String::from(mapper.uppercase_to_string(fragment.text(), &langid!("und")));
                    fragment.set_text(upper);
                }
            }
            SubstitutionMethod::ToLower => {
                let mapper = CaseMapper::new();
                for fragment in message.writable_fragments_mut() {
                    let lower = String::from(mapper.lowercase_to_string(fragment.text(), &langid!("und")));
                    fragment.set_text(lower);
                }
            }
            SubstitutionMethod::Map { replacements } => {
                for fragment in message.writable_fragments_mut() {
                    let mapped: String = fragment
                        .text()
                        .chars()
                        .map(|c| replacements.get(&c).copied().unwrap_or(c))
                        .collect();
                    fragment.set_text(mapped);
                }
            }
            SubstitutionMethod::List {
                characters,
                selection,
            } => {
                if characters.is_empty() {
                    return;
                }
                let mut rng = ChaCha8Rng::seed_from_u64(fnv1a_hash_str_64(message.original()));
                let mut cursor = match selection {
                    ListSelectionMode::LoopFromPrevious => self.cursor,
                    ListSelectionMode::Random | ListSelectionMode::LoopFromStart => 0,
                };
                for fragment in message.writable_fragments_mut() {
                    let replaced: String = fragment
                        .text()
                        .chars()
                        .map(|_| match selection {
                            ListSelectionMode::Random => characters[rng.random_range(0..characters.len())],
                            ListSelectionMode::LoopFromPrevious | ListSelectionMode::LoopFromStart => {
                                let c = characters[cursor.rem_euclid(characters.len())];
                                cursor = (cursor + 1).rem_euclid(characters.len());
                                c
                            }
                        })
                        .collect();
                    fragment.set_text(replaced);
                }
                if *selection == ListSelectionMode::LoopFromPrevious {
                    self.cursor = cursor;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}
