use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Zodiac signs, displayed in the form used as a horoscope topic key.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "title_case")]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Major-arcana subset used for draws.
pub const TAROT_CARDS: [&str; 10] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawnCard {
    pub name: String,
    pub reversed: bool,
}

/// Three distinct cards mapped to fixed semantic slots. Order is
/// significant: the first drawn card is the past, the last the future.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreeCardSpread {
    pub past: DrawnCard,
    pub present: DrawnCard,
    pub future: DrawnCard,
}

impl ThreeCardSpread {
    pub fn cards(&self) -> [&DrawnCard; 3] {
        [&self.past, &self.present, &self.future]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn twelve_signs_with_stable_display_names() {
        assert_eq!(ZodiacSign::iter().count(), 12);
        assert_eq!(ZodiacSign::Aries.to_string(), "Aries");
        assert_eq!(ZodiacSign::from_str("Pisces").unwrap(), ZodiacSign::Pisces);
    }

    #[test]
    fn card_table_has_no_duplicates() {
        let mut names: Vec<&str> = TAROT_CARDS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TAROT_CARDS.len());
    }
}
