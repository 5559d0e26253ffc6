//! Word tables for the headline sentiment scorer
//!
//! Valences are on a -4..=4 scale. General-purpose entries follow crowd-rated
//! valence norms; market vocabulary ("rally", "downgrade", "selloff") was added
//! with values in the same range.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Increment applied by intensifiers ("very", "sharply")
pub const BOOSTER_INCREMENT: f64 = 0.293;
/// Decrement applied by dampeners ("slightly", "barely")
pub const DAMPENER_DECREMENT: f64 = -0.293;

const VALENCES: &[(&str, f64)] = &[
    // general positive
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loves", 2.7),
    ("like", 1.5),
    ("happy", 2.7),
    ("nice", 1.8),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("impressive", 2.3),
    ("wonderful", 2.7),
    ("win", 2.8),
    ("wins", 2.7),
    ("winning", 2.4),
    ("won", 2.7),
    ("winner", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("strong", 2.3),
    ("stronger", 1.6),
    ("strongest", 1.9),
    ("positive", 2.6),
    ("optimistic", 1.3),
    ("optimism", 2.5),
    ("confident", 2.2),
    ("confidence", 2.3),
    ("hope", 1.9),
    ("hopeful", 2.0),
    ("hopes", 1.6),
    ("benefit", 1.6),
    ("benefits", 1.6),
    ("opportunity", 1.8),
    ("opportunities", 1.6),
    ("reward", 2.1),
    ("rewarding", 2.4),
    ("support", 1.7),
    ("supports", 1.5),
    ("safe", 1.9),
    ("secure", 1.4),
    ("stable", 1.2),
    ("solid", 1.6),
    ("robust", 1.4),
    ("thrive", 2.5),
    ("thriving", 2.2),
    ("innovative", 2.0),
    ("innovation", 1.6),
    ("breakthrough", 1.9),
    ("welcome", 2.0),
    ("approve", 1.7),
    ("approved", 1.8),
    ("approval", 1.6),
    ("agree", 1.5),
    ("smart", 1.7),
    ("upbeat", 1.6),
    ("favorable", 2.1),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 1.9),
    ("growth", 1.6),
    ("grow", 1.4),
    ("grows", 1.3),
    ("growing", 1.2),
    ("gain", 2.4),
    ("gains", 1.6),
    ("gained", 1.6),
    ("recover", 1.3),
    ("recovery", 1.4),
    ("rebound", 1.3),
    ("rebounds", 1.3),
    ("exceed", 1.4),
    ("exceeds", 1.4),
    ("exceeded", 1.4),
    // market vocabulary, positive
    ("beat", 1.5),
    ("beats", 1.5),
    ("surge", 1.4),
    ("surges", 1.4),
    ("surged", 1.4),
    ("soar", 1.8),
    ("soars", 1.8),
    ("soared", 1.8),
    ("rally", 1.6),
    ("rallies", 1.6),
    ("rallied", 1.6),
    ("boost", 1.7),
    ("boosts", 1.3),
    ("boosted", 1.5),
    ("jump", 0.9),
    ("jumps", 0.9),
    ("jumped", 0.9),
    ("climb", 1.0),
    ("climbs", 1.0),
    ("rise", 1.2),
    ("rises", 1.1),
    ("rising", 1.0),
    ("record", 0.8),
    ("upgrade", 1.7),
    ("upgrades", 1.7),
    ("upgraded", 1.7),
    ("outperform", 1.8),
    ("outperforms", 1.8),
    ("bullish", 2.0),
    ("upside", 1.3),
    ("buyback", 0.9),
    ("accretive", 1.2),
    ("tailwind", 1.2),
    ("tailwinds", 1.2),
    // general negative
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("poor", -2.1),
    ("hate", -2.7),
    ("sad", -2.1),
    ("angry", -2.3),
    ("fear", -2.2),
    ("fears", -1.8),
    ("afraid", -2.0),
    ("worry", -1.9),
    ("worries", -1.8),
    ("worried", -1.2),
    ("concern", -1.3),
    ("concerns", -1.3),
    ("concerned", -1.3),
    ("problem", -1.7),
    ("problems", -1.7),
    ("trouble", -1.7),
    ("troubled", -2.0),
    ("struggle", -1.6),
    ("struggles", -1.6),
    ("struggling", -1.7),
    ("fail", -2.5),
    ("fails", -2.3),
    ("failed", -2.3),
    ("failure", -2.3),
    ("disappoint", -2.3),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("negative", -2.7),
    ("pessimistic", -1.5),
    ("threat", -2.4),
    ("threatens", -1.6),
    ("uncertain", -1.2),
    ("uncertainty", -1.4),
    ("panic", -2.9),
    ("crisis", -3.1),
    ("war", -2.9),
    ("fraud", -2.8),
    ("scandal", -2.5),
    ("lawsuit", -0.9),
    ("sue", -1.1),
    ("sued", -1.1),
    ("penalty", -1.5),
    ("warning", -1.4),
    ("warns", -0.4),
    ("weak", -1.9),
    ("weaker", -1.9),
    ("weakness", -1.5),
    ("risk", -1.1),
    ("risks", -1.1),
    ("risky", -1.4),
    ("loss", -1.3),
    ("losses", -1.7),
    ("lose", -1.7),
    ("loses", -1.3),
    ("losing", -1.6),
    ("lost", -1.3),
    ("cut", -1.1),
    ("cuts", -1.2),
    ("debt", -1.5),
    ("bankrupt", -2.6),
    ("bankruptcy", -2.6),
    ("recession", -2.2),
    ("layoff", -1.8),
    ("layoffs", -1.8),
    // market vocabulary, negative
    ("miss", -0.6),
    ("misses", -0.9),
    ("missed", -1.0),
    ("fall", -0.9),
    ("falls", -0.6),
    ("fell", -0.9),
    ("falling", -0.9),
    ("drop", -1.1),
    ("drops", -1.2),
    ("dropped", -1.1),
    ("decline", -1.4),
    ("declines", -1.2),
    ("declined", -1.2),
    ("plunge", -2.0),
    ("plunges", -2.0),
    ("plunged", -2.0),
    ("plummet", -2.3),
    ("plummets", -2.3),
    ("crash", -1.7),
    ("crashes", -1.7),
    ("slump", -1.8),
    ("slumps", -1.8),
    ("tumble", -1.6),
    ("tumbles", -1.6),
    ("slide", -0.9),
    ("slides", -0.9),
    ("sink", -1.2),
    ("sinks", -1.2),
    ("selloff", -1.6),
    ("sell-off", -1.6),
    ("downgrade", -1.7),
    ("downgrades", -1.7),
    ("downgraded", -1.7),
    ("underperform", -1.6),
    ("bearish", -2.0),
    ("downside", -1.2),
    ("headwind", -1.2),
    ("headwinds", -1.2),
    ("dilution", -1.1),
    ("probe", -0.8),
    ("investigation", -1.0),
    ("halted", -1.0),
    ("volatile", -1.1),
    ("volatility", -1.0),
];

const BOOSTERS: &[&str] = &[
    "absolutely",
    "amazingly",
    "completely",
    "considerably",
    "decidedly",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "greatly",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "majorly",
    "more",
    "most",
    "particularly",
    "quite",
    "really",
    "remarkably",
    "sharply",
    "significantly",
    "so",
    "strongly",
    "substantially",
    "thoroughly",
    "totally",
    "tremendously",
    "unbelievably",
    "unusually",
    "utterly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "less",
    "little",
    "marginally",
    "modestly",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "none", "nope",
    "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont",
    "wouldnt", "rarely", "seldom", "despite",
];

static VALENCE_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VALENCES.iter().copied().collect());

static NEGATION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATIONS.iter().copied().collect());

/// Valence of a lowercase word, `None` when it carries no sentiment
pub fn valence(word: &str) -> Option<f64> {
    VALENCE_MAP.get(word).copied()
}

/// Intensity adjustment contributed by a lowercase modifier word
pub fn modifier(word: &str) -> Option<f64> {
    if BOOSTERS.contains(&word) {
        Some(BOOSTER_INCREMENT)
    } else if DAMPENERS.contains(&word) {
        Some(DAMPENER_DECREMENT)
    } else {
        None
    }
}

/// Whether a lowercase word negates what follows
pub fn is_negation(word: &str) -> bool {
    if word.contains("n't") {
        return true;
    }
    let without_apostrophe: String = word.chars().filter(|c| *c != '\'').collect();
    NEGATION_SET.contains(without_apostrophe.as_str())
}
