use crate::domain::{DrawnCard, ThreeCardSpread, ZodiacSign, TAROT_CARDS};
use crate::infrastructure::ContentCatalog;
use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{seq::index, thread_rng, Rng, SeedableRng};
use sha2::{Digest, Sha256};
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid date: {0} (expected DD.MM.YYYY)")]
    InvalidDate(String),
}

const OPENERS: [&str; 4] = [
    "The day favors new beginnings. Act boldly!",
    "Today's energy supports harmony and inner calm.",
    "Trust your intuition when making decisions today.",
    "An unexpected encounter could change your day for the better.",
];

const LOVE: [&str; 3] = [
    "Romantic moments await you today",
    "Deep conversations will strengthen your relationships",
    "Stay open to new acquaintances",
];

const CAREER: [&str; 3] = [
    "Financial opportunities are stirring",
    "Colleagues will back you in an important matter",
    "Bold decisions will bear fruit",
];

const HEALTH: [&str; 3] = [
    "A walk in the fresh air will restore your strength",
    "Pay attention to your sleep schedule",
    "Yoga or meditation will bring balance",
];

const ADVICE: [&str; 3] = [
    "Stay flexible in your decisions",
    "Let go of control over the situation",
    "Be patient — everything arrives in its own time",
];

const LUCKY_WINDOWS: [&str; 3] = ["morning 9-11", "afternoon 14-16", "evening 19-21"];

const TALISMAN_STONES: [&str; 6] = [
    "amethyst",
    "rock crystal",
    "rose quartz",
    "lapis lazuli",
    "tiger's eye",
    "citrine",
];

const LUCKY_COLORS: [&str; 5] = ["gold", "emerald", "sapphire", "ruby", "lavender"];

const WEEKLY_OUTLOOKS: [&str; 3] = [
    "The week brings important negotiations and fresh opportunities for growth.",
    "Finances look especially favorable toward midweek.",
    "An excellent stretch for creative projects and self-expression.",
];

const CARD_MEANINGS: [&str; 3] = [
    "This card points to the importance of your inner voice.",
    "Today carries a key message for your development.",
    "The card asks you to look closely at one area of your life.",
];

const CARD_ADVICE: [&str; 3] = [
    "Trust the universe and follow your curiosity.",
    "Use every resource available to reach your goals.",
    "Listen to your inner voice and your subconscious.",
];

const PAST_NOTES: [&str; 2] = [
    "Your past experience has prepared you for the current situation.",
    "Past events continue to shape your life.",
];

const PRESENT_NOTES: [&str; 2] = [
    "The current situation asks for your attention and awareness.",
    "The card marks the key energies at work in your life right now.",
];

const FUTURE_NOTES: [&str; 2] = [
    "What unfolds next depends on the decisions you make today.",
    "The card shows the potential outcome of your current course.",
];

const LIFE_PATH_PORTRAITS: [&str; 5] = [
    "LEADER AND PIONEER\nYou were born to lead the way.",
    "DIPLOMAT AND PEACEMAKER\nYour gift is finding harmony.",
    "CREATOR AND OPTIMIST\nYou bring beauty and joy into the world.",
    "BUILDER AND PRAGMATIST\nYou lay foundations that last.",
    "EXPLORER AND ADVENTURER\nFreedom and motion are your element.",
];

const LIFE_PATH_ADVICE: [&str; 3] = [
    "Trust your inner voice.",
    "Lean on your strengths to reach your goals.",
    "Work on your weaknesses and turn them into opportunities.",
];

fn pick<'a>(rng: &mut impl Rng, pool: &'a [&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// Seed derived from (date, user, topic): the first four bytes of the
/// SHA-256 digest, so a free-tier user sees the same text all day but
/// different text tomorrow or for another topic.
fn seed_for(date: &str, user_id: Option<i64>, topic: &str) -> u32 {
    let seed_string = match user_id {
        Some(id) => format!("{}_{}_{}", date, id, topic),
        None => format!("{}_{}", date, topic),
    };
    let digest = Sha256::digest(seed_string.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

fn human_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} ({})",
        date.day(),
        date.format("%B"),
        date.year(),
        date.format("%A")
    )
}

/// Parse a user-supplied birth date in `DD.MM.YYYY` form.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, ContentError> {
    NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
        .map_err(|_| ContentError::InvalidDate(raw.to_string()))
}

/// Digit-sum reduction of day + month + year down to a single digit.
pub fn life_path_number(date: NaiveDate) -> u8 {
    let mut n = u64::from(date.day()) + u64::from(date.month()) + date.year().unsigned_abs() as u64;
    while n > 9 {
        n = n
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(u64::from)
            .sum();
    }
    n as u8
}

/// Decides basic vs. enriched output and assembles the text.
///
/// `render_basic` is a pure function of (calendar date, user, topic):
/// the pseudo-random stream is a per-call [`StdRng`], so catalog
/// selection never perturbs randomness anywhere else in the process.
pub struct ContentSelector {
    catalog: ContentCatalog,
}

impl ContentSelector {
    pub fn new(catalog: ContentCatalog) -> Self {
        Self { catalog }
    }

    fn today() -> String {
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    }

    /// The only branch point that depends on entitlement.
    pub fn select_rendering(&self, topic: &str, user_id: Option<i64>, entitled: bool) -> String {
        if entitled {
            self.render_enriched(topic, user_id)
        } else {
            self.render_basic(topic, user_id)
        }
    }

    pub fn render_basic(&self, topic: &str, user_id: Option<i64>) -> String {
        self.render_basic_for_date(Utc::now().date_naive(), topic, user_id)
    }

    fn render_basic_for_date(&self, date: NaiveDate, topic: &str, user_id: Option<i64>) -> String {
        let date_key = date.format("%Y-%m-%d").to_string();
        let mut rng = StdRng::seed_from_u64(u64::from(seed_for(&date_key, user_id, topic)));

        format!(
            "✨ Horoscope for {topic} ✨\nFor {date}\n\n{opener}\n\n\
             💖 Love: {love}\n\n💼 Career: {career}\n\n\
             🌿 Health: {health}\n\n💫 Advice: {advice}\n\n\
             #{tag} #Astrology #Horoscope",
            topic = topic,
            date = human_date(date),
            opener = pick(&mut rng, &OPENERS),
            love = pick(&mut rng, &LOVE),
            career = pick(&mut rng, &CAREER),
            health = pick(&mut rng, &HEALTH),
            advice = pick(&mut rng, &ADVICE),
            tag = topic.split_whitespace().last().unwrap_or(topic),
        )
    }

    /// Catalog hit returns the pre-written text verbatim; a miss falls
    /// back to the basic text plus a decorative premium block whose
    /// fields are ordinary (non-seeded) randomness.
    pub fn render_enriched(&self, topic: &str, user_id: Option<i64>) -> String {
        let today = Self::today();
        if let Some(text) = self.catalog.lookup(&today, topic) {
            return text.to_string();
        }

        let moon_signs: Vec<String> = ZodiacSign::iter().map(|s| s.to_string()).collect();
        let mut rng = thread_rng();
        let moon_sign = &moon_signs[rng.gen_range(0..moon_signs.len())];

        format!(
            "{basic}\n\n✨ PREMIUM EXTRAS ✨\n\nAstrological details:\n\
             • Moon in: {moon_sign}\n• Favorable window: {window}\n\
             • Talisman stone: {stone}\n• Lucky color: {color}\n\n\
             Weekly outlook:\n{outlook}\n\n#Premium",
            basic = self.render_basic(topic, user_id),
            moon_sign = moon_sign,
            window = pick(&mut rng, &LUCKY_WINDOWS),
            stone = pick(&mut rng, &TALISMAN_STONES),
            color = pick(&mut rng, &LUCKY_COLORS),
            outlook = pick(&mut rng, &WEEKLY_OUTLOOKS),
        )
    }

    /// Uniform pick over the card table plus a fair coin for orientation.
    pub fn draw_one_card(&self) -> DrawnCard {
        let mut rng = thread_rng();
        DrawnCard {
            name: TAROT_CARDS[rng.gen_range(0..TAROT_CARDS.len())].to_string(),
            reversed: rng.gen_bool(0.5),
        }
    }

    /// Three distinct cards; draw order maps to past/present/future.
    pub fn draw_three_cards(&self) -> ThreeCardSpread {
        let mut rng = thread_rng();
        let picks = index::sample(&mut rng, TAROT_CARDS.len(), 3);
        let mut card = |i: usize| DrawnCard {
            name: TAROT_CARDS[picks.index(i)].to_string(),
            reversed: rng.gen_bool(0.5),
        };
        ThreeCardSpread {
            past: card(0),
            present: card(1),
            future: card(2),
        }
    }

    pub fn render_daily_card(&self, card: &DrawnCard) -> String {
        let mut rng = thread_rng();
        format!(
            "🃏 CARD OF THE DAY\n\nDrawn card:\n{name} ({orientation})\n\n\
             📖 Meaning:\n{meaning}\n\n🎯 The card's advice:\n{advice}",
            name = card.name,
            orientation = if card.reversed { "reversed" } else { "upright" },
            meaning = pick(&mut rng, &CARD_MEANINGS),
            advice = pick(&mut rng, &CARD_ADVICE),
        )
    }

    pub fn render_three_card_spread(&self, spread: &ThreeCardSpread) -> String {
        let mut rng = thread_rng();
        format!(
            "🃏 THREE-CARD SPREAD\n\nPast (influence on the current situation):\n{past}\n{past_note}\n\n\
             Present (the current situation):\n{present}\n{present_note}\n\n\
             Future (possible development):\n{future}\n{future_note}",
            past = spread.past.name,
            past_note = pick(&mut rng, &PAST_NOTES),
            present = spread.present.name,
            present_note = pick(&mut rng, &PRESENT_NOTES),
            future = spread.future.name,
            future_note = pick(&mut rng, &FUTURE_NOTES),
        )
    }

    pub fn render_numerology(&self, birth_date: NaiveDate, life_path: u8) -> String {
        let mut rng = thread_rng();
        format!(
            "🔢 NUMEROLOGY PORTRAIT\n\nBirth date: {date}\nLife path number: {life_path}\n\n\
             {portrait}\n\n💫 Advice:\n{advice}",
            date = birth_date.format("%d.%m.%Y"),
            life_path = life_path,
            portrait = pick(&mut rng, &LIFE_PATH_PORTRAITS),
            advice = pick(&mut rng, &LIFE_PATH_ADVICE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn selector() -> ContentSelector {
        ContentSelector::new(ContentCatalog::empty())
    }

    #[test]
    fn basic_rendering_is_deterministic_per_day_user_topic() {
        let selector = selector();
        let a = selector.render_basic("Aries", Some(42));
        let b = selector.render_basic("Aries", Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn basic_rendering_varies_across_topics_users_and_days() {
        let selector = selector();
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        let aries = selector.render_basic_for_date(date, "Aries", Some(42));
        let leo = selector.render_basic_for_date(date, "Leo", Some(42));
        let tomorrow = selector.render_basic_for_date(next, "Aries", Some(42));

        assert_ne!(aries, leo);
        assert_ne!(aries, tomorrow);

        // Any single pair of users could collide on all five fragment
        // picks; across twenty users at least one must differ.
        let differs = (43..63)
            .any(|uid| selector.render_basic_for_date(date, "Aries", Some(uid)) != aries);
        assert!(differs);
    }

    #[test]
    fn different_days_pick_different_fragments_over_a_month() {
        // Sampling 31 days, at least two distinct openers must appear;
        // identical fragment picks every day would mean a broken seed.
        let selector = selector();
        let mut bodies = std::collections::HashSet::new();
        for day in 1..=31 {
            let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
            let text = selector.render_basic_for_date(date, "Aries", Some(42));
            // Strip the date line so only fragment choices remain.
            let body: String = text.lines().skip(2).collect::<Vec<_>>().join("\n");
            bodies.insert(body);
        }
        assert!(bodies.len() > 1);
    }

    #[test]
    fn enriched_prefers_catalog_entry_verbatim() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let mut by_topic = HashMap::new();
        by_topic.insert("Aries".to_string(), "Hand-written premium text.".to_string());
        let mut entries = HashMap::new();
        entries.insert(today, by_topic);

        let selector = ContentSelector::new(ContentCatalog::from_entries(entries));
        assert_eq!(
            selector.render_enriched("Aries", Some(42)),
            "Hand-written premium text."
        );
    }

    #[test]
    fn enriched_fallback_appends_premium_block_to_basic_text() {
        let selector = selector();
        let basic = selector.render_basic("Aries", Some(42));
        let enriched = selector.render_enriched("Aries", Some(42));

        assert!(enriched.starts_with(&basic));
        assert!(enriched.contains("PREMIUM EXTRAS"));
        assert!(enriched.contains("#Premium"));
    }

    #[test]
    fn entitlement_is_the_only_branch() {
        let selector = selector();
        let basic = selector.select_rendering("Aries", Some(42), false);
        let enriched = selector.select_rendering("Aries", Some(42), true);

        assert_eq!(basic, selector.render_basic("Aries", Some(42)));
        assert_ne!(basic, enriched);
    }

    #[test]
    fn seeded_rendering_leaves_thread_rng_independent() {
        // Two enriched fallbacks in a row should (almost surely) differ in
        // their premium block: the seeded basic part must not pin down the
        // thread-local generator.
        let selector = selector();
        let samples: Vec<String> = (0..32)
            .map(|_| selector.render_enriched("Aries", Some(42)))
            .collect();
        let distinct: std::collections::HashSet<&String> = samples.iter().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn three_card_spread_has_distinct_cards() {
        let selector = selector();
        for _ in 0..100 {
            let spread = selector.draw_three_cards();
            let names: Vec<&str> = spread.cards().iter().map(|c| c.name.as_str()).collect();
            assert_ne!(names[0], names[1]);
            assert_ne!(names[0], names[2]);
            assert_ne!(names[1], names[2]);
        }
    }

    #[test]
    fn single_draw_covers_both_orientations() {
        let selector = selector();
        let mut seen_upright = false;
        let mut seen_reversed = false;
        for _ in 0..200 {
            if selector.draw_one_card().reversed {
                seen_reversed = true;
            } else {
                seen_upright = true;
            }
        }
        assert!(seen_upright && seen_reversed);
    }

    #[test]
    fn birth_date_parsing_and_life_path() {
        let date = parse_birth_date("23.09.1992").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1992, 9, 23).unwrap());
        // 23 + 9 + 1992 = 2024 -> 2+0+2+4 = 8
        assert_eq!(life_path_number(date), 8);

        assert!(parse_birth_date("1992-09-23").is_err());
        assert!(parse_birth_date("31.02.2000").is_err());
        assert!(parse_birth_date("soon").is_err());
    }

    #[test]
    fn life_path_is_always_a_single_digit() {
        for year in [1900, 1999, 2026] {
            for (day, month) in [(1, 1), (29, 12), (15, 6)] {
                let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
                let n = life_path_number(date);
                assert!((1..=9).contains(&n), "life path {} out of range", n);
            }
        }
    }
}
