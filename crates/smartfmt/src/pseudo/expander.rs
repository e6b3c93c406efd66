use const_fnv1a_hash::fnv1a_hash_str_64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::pseudo::message::{Message, WritableFragment};
use crate::pseudo::PseudoLocalizationMethod;

/// Padding ratio for messages whose length is in `min..max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpansionRule {
    pub min: usize,
    pub max: usize,
    pub ratio: f32,
}

impl ExpansionRule {
    pub fn new(min: usize, max: usize, ratio: f32) -> Self {
        Self { min, max, ratio }
    }

    pub fn contains(&self, length: usize) -> bool {
        self.min <= length && length < self.max
    }
}

/// Where padding goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertLocation {
    Start,
    #[default]
    End,
    /// Split between both ends, the smaller half first.
    Both,
}

/// Pads messages to simulate languages that run longer than the source.
///
/// Padding characters are drawn pseudo-randomly from
/// [`padding_characters`](Self::padding_characters), seeded by a hash of the
/// original input, so a given input always pads the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expander {
    pub rules: Vec<ExpansionRule>,
    pub location: InsertLocation,
    pub minimum_string_length: usize,
    pub padding_characters: Vec<char>,
}

impl Default for Expander {
    fn default() -> Self {
        Self {
            rules: vec![
                ExpansionRule::new(0, 10, 2.0),
                ExpansionRule::new(10, 20, 1.0),
                ExpansionRule::new(20, 30, 0.8),
                ExpansionRule::new(30, 50, 0.6),
                ExpansionRule::new(50, 70, 0.7),
                ExpansionRule::new(70, usize::MAX, 0.3),
            ],
            location: InsertLocation::End,
            minimum_string_length: 1,
            padding_characters: ('a'..='z').collect(),
        }
    }
}

impl Expander {
    pub fn with_location(mut self, location: InsertLocation) -> Self {
        self.location = location;
        self
    }

    /// Ratio of the first rule containing `length`, or 0.
    pub fn ratio_for(&self, length: usize) -> f32 {
        self.rules
            .iter()
            .find(|rule| rule.contains(length))
            .map_or(0.0, |rule| rule.ratio)
    }

    /// Number of padding characters added to a message of `length` characters.
    pub fn padding_length(&self, length: usize) -> usize {
        let effective = length.max(self.minimum_string_length);
        // Single precision, so a ratio of 0.8 over 25 characters is exactly 20.
        let padding = (self.ratio_for(length) * effective as f32).ceil();
        if padding <= 0.0 { 0 } else { padding as usize }
    }
}

impl PseudoLocalizationMethod for Expander {
    fn transform(&mut self, message: &mut Message) {
        let count = self.padding_length(message.len());
        if count == 0 || self.padding_characters.is_empty() {
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(fnv1a_hash_str_64(message.original()));
        let padding: String = (0..count)
            .map(|_| self.padding_characters[rng.random_range(0..self.padding_characters.len())])
            .collect();

        match self.location {
            InsertLocation::Start => message.prepend(WritableFragment::new(padding)),
            InsertLocation::End => message.append(WritableFragment::new(padding)),
            InsertLocation::Both => {
                let split = padding
                    .char_indices()
                    .nth(count.div_euclid(2))
                    .map_or(padding.len(), |(offset, _)| offset);
                let (start, end) = padding.split_at(split);
                if !start.is_empty() {
                    message.prepend(WritableFragment::new(start));
                }
                message.append(WritableFragment::new(end));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_half_open() {
        let expander = Expander::default();
        assert_eq!(expander.ratio_for(9), 2.0);
        assert_eq!(expander.ratio_for(10), 1.0);
        assert_eq!(expander.ratio_for(1_000), 0.3);
    }

    #[test]
    fn padding_uses_minimum_length() {
        let expander = Expander::default();
        assert_eq!(expander.padding_length(0), 2);
        assert_eq!(expander.padding_length(5), 10);
        assert_eq!(expander.padding_length(25), 20);
        assert_eq!(expander.padding_length(100), 30);
    }

    #[test]
    fn both_puts_smaller_half_first() {
        let mut expander = Expander::default().with_location(InsertLocation::Both);
        let mut message = Message::new("abc");
        expander.transform(&mut message);
        let texts: Vec<usize> = message
            .fragments()
            .iter()
            .map(|f| f.text().chars().count())
            .collect();
        assert_eq!(texts, vec![3, 3, 3]);
    }
}
