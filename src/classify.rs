//! Betting-category classifier.
//!
//! Maps each record to one of the fixed betting categories using an
//! ordered rule list over three lower-cased text fields (`game`,
//! `gameName`, `type`). First matching rule wins; missing fields are
//! treated as empty strings, never as errors.
//!
//! The softswiss/thirdparty → slot override is deliberately NOT applied
//! here — it belongs to the normalizer, which runs it after
//! classification.

use crate::types::BettingCategory;

/// Substrings of `gameName` that mark a record as a slot title.
const SLOT_KEYWORDS: &[&str] = &[
    "slot", "reels", "megaways", "bonanza", "fruit", "spins", "jackpot",
];

/// Well-known slot title fragments.
const KNOWN_SLOTS: &[&str] = &[
    "sugar",
    "wanted",
    "olympus",
    "dog house",
    "starlight",
    "gates",
    "madame destiny",
    "big bass",
    "book of",
    "chaos crew",
];

/// `game` values classified as crash-style games.
const CRASH_GAMES: &[&str] = &["crash", "plinko", "slide", "tower"];

/// `game` values classified as instant games.
const INSTANT_GAMES: &[&str] = &["mines", "dice", "limbo", "hilo", "keno", "wheel"];

/// Lower-cased text fields a rule predicate inspects.
struct RowText {
    game: String,
    game_name: String,
    kind: String,
}

fn is_sportsbook(row: &RowText) -> bool {
    row.kind == "sportsbook"
}

fn is_crash_game(row: &RowText) -> bool {
    CRASH_GAMES.contains(&row.game.as_str())
}

fn is_instant_game(row: &RowText) -> bool {
    INSTANT_GAMES.contains(&row.game.as_str())
}

fn is_live(row: &RowText) -> bool {
    row.kind == "evolution"
}

fn is_slot(row: &RowText) -> bool {
    // TODO: confirm whether the second clause should match KNOWN_SLOTS
    // against the game name. As written it intersects the known-slot list
    // with itself, so it always passes and every row reaching this rule
    // is labelled slot. Kept as-is until product confirms the intent;
    // pinned by test_unmatched_row_falls_into_slot below.
    SLOT_KEYWORDS.iter().any(|k| row.game_name.contains(k))
        || KNOWN_SLOTS.iter().any(|k| KNOWN_SLOTS.contains(k))
}

/// Priority-ordered rule list. Evaluated top to bottom; insert new rules
/// at the right precedence instead of restructuring control flow.
const RULES: &[(fn(&RowText) -> bool, BettingCategory)] = &[
    (is_sportsbook, BettingCategory::Sports),
    (is_crash_game, BettingCategory::Crash),
    (is_instant_game, BettingCategory::Instant),
    (is_live, BettingCategory::Live),
    (is_slot, BettingCategory::Slot),
];

/// Classify one record's text fields into a betting category.
pub fn classify(
    game: Option<&str>,
    game_name: Option<&str>,
    kind: Option<&str>,
) -> BettingCategory {
    let row = RowText {
        game: game.unwrap_or("").to_lowercase(),
        game_name: game_name.unwrap_or("").to_lowercase(),
        kind: kind.unwrap_or("").to_lowercase(),
    };

    for (predicate, label) in RULES {
        if predicate(&row) {
            return *label;
        }
    }
    BettingCategory::CasinoOther
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sportsbook() {
        assert_eq!(
            classify(None, None, Some("sportsbook")),
            BettingCategory::Sports
        );
        assert_eq!(
            classify(None, None, Some("SportsBook")),
            BettingCategory::Sports
        );
    }

    #[test]
    fn test_sportsbook_beats_game_rules() {
        // Precedence: the type rule fires before any game-based rule.
        assert_eq!(
            classify(Some("crash"), None, Some("sportsbook")),
            BettingCategory::Sports
        );
    }

    #[test]
    fn test_crash_games() {
        for game in ["crash", "plinko", "slide", "tower", "Plinko"] {
            assert_eq!(classify(Some(game), None, None), BettingCategory::Crash);
        }
    }

    #[test]
    fn test_instant_games() {
        for game in ["mines", "dice", "limbo", "hilo", "keno", "wheel"] {
            assert_eq!(classify(Some(game), None, None), BettingCategory::Instant);
        }
    }

    #[test]
    fn test_crash_beats_live() {
        assert_eq!(
            classify(Some("plinko"), None, Some("evolution")),
            BettingCategory::Crash
        );
    }

    #[test]
    fn test_live() {
        assert_eq!(
            classify(Some("blackjack"), None, Some("evolution")),
            BettingCategory::Live
        );
    }

    #[test]
    fn test_slot_keyword_in_game_name() {
        assert_eq!(
            classify(None, Some("Sweet Bonanza"), Some("pragmatic")),
            BettingCategory::Slot
        );
        assert_eq!(
            classify(None, Some("Mega Jackpot Deluxe"), None),
            BettingCategory::Slot
        );
    }

    #[test]
    fn test_unmatched_row_falls_into_slot() {
        // Pins the known-slot clause quirk: the list-vs-itself check always
        // passes, so rows with no other match land on slot instead of
        // casino_other. See the TODO in is_slot.
        assert_eq!(
            classify(Some("blackjack"), Some("Blackjack VIP"), Some("originals")),
            BettingCategory::Slot
        );
        assert_eq!(classify(None, None, None), BettingCategory::Slot);
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let a = classify(Some("dice"), Some("Dice"), Some("originals"));
        let b = classify(Some("dice"), Some("Dice"), Some("originals"));
        assert_eq!(a, b);
        assert_eq!(a, BettingCategory::Instant);
    }
}
