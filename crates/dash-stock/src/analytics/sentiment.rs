//! Lexicon and rule based headline sentiment
//!
//! Each headline is tokenized, every token gets a valence from the lexicon
//! (zero when unknown), and the valences are adjusted by the words around them:
//!
//! - intensifiers and dampeners up to three tokens back (`very strong`)
//! - negation up to three tokens back (`not good` flips and shrinks)
//! - ALL-CAPS emphasis when the headline mixes cases
//! - contrast around `but` (the clause after it dominates)
//! - trailing `!` and `??` emphasis
//!
//! The summed valence is squashed into the compound score with
//! `x / sqrt(x^2 + 15)`; the negative, neutral and positive shares are the
//! proportions of negative, zero and positive token valences.

use serde::{Deserialize, Serialize};

use super::lexicon;
use crate::error::EmptyInputError;

/// Added to an ALL-CAPS sentiment word in a mixed-case headline
const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied for each negation in the look-back window
const NEGATION_SCALAR: f64 = -0.74;
/// Tokens scanned backwards for modifiers and negations
const LOOK_BACK: usize = 3;
/// Squashing constant of the compound score
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;

/// Four-dimensional polarity of a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Share of negative content, `0..=1`
    pub negative: f64,
    /// Share of neutral content, `0..=1`
    pub neutral: f64,
    /// Share of positive content, `0..=1`
    pub positive: f64,
    /// Normalized overall valence, `-1..=1`
    pub compound: f64,
}

impl SentimentScore {
    /// All four dimensions zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// `(label, value)` pairs in display order
    pub fn dimensions(&self) -> [(&'static str, f64); 4] {
        [
            ("neg", self.negative),
            ("neu", self.neutral),
            ("pos", self.positive),
            ("compound", self.compound),
        ]
    }
}

/// Averaged sentiment and how many headlines went into it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub score: SentimentScore,
    pub headline_count: usize,
}

/// Stateless headline scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score a single text
    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::zero();
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mixed_caps = has_mixed_caps(&tokens);

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| token_valence(i, &tokens, &lowered, mixed_caps))
            .collect();

        apply_contrast(&lowered, &mut valences);
        score_valences(&valences, text)
    }

    /// Average of [`polarity_scores`](Self::polarity_scores) over all headlines
    pub fn try_average<S: AsRef<str>>(
        &self,
        headlines: &[S],
    ) -> Result<SentimentScore, EmptyInputError> {
        if headlines.is_empty() {
            return Err(EmptyInputError);
        }

        let mut total = SentimentScore::zero();
        for headline in headlines {
            let score = self.polarity_scores(headline.as_ref());
            total.negative += score.negative;
            total.neutral += score.neutral;
            total.positive += score.positive;
            total.compound += score.compound;
        }

        let n = headlines.len() as f64;
        Ok(SentimentScore {
            negative: total.negative / n,
            neutral: total.neutral / n,
            positive: total.positive / n,
            compound: total.compound / n,
        })
    }

    /// Like [`try_average`](Self::try_average), but zero for no headlines
    pub fn average<S: AsRef<str>>(&self, headlines: &[S]) -> SentimentScore {
        self.try_average(headlines).unwrap_or_else(|EmptyInputError| {
            tracing::debug!("no headlines to score, using zero sentiment");
            SentimentScore::zero()
        })
    }

    /// Average plus headline count
    pub fn summarize<S: AsRef<str>>(&self, headlines: &[S]) -> SentimentSummary {
        SentimentSummary {
            score: self.average(headlines),
            headline_count: headlines.len(),
        }
    }
}

/// Average sentiment of a non-empty sequence of headlines
pub fn try_average_sentiment<S: AsRef<str>>(
    headlines: &[S],
) -> Result<SentimentScore, EmptyInputError> {
    SentimentAnalyzer::new().try_average(headlines)
}

/// Average sentiment of a sequence of headlines; all zero when it is empty.
pub fn average_sentiment<S: AsRef<str>>(headlines: &[S]) -> SentimentScore {
    SentimentAnalyzer::new().average(headlines)
}

/// Whitespace tokens with surrounding punctuation removed.
///
/// Tokens that shrink to a single character are dropped.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

/// True when some, but not all, tokens are shouted
fn has_mixed_caps(tokens: &[String]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn token_valence(i: usize, tokens: &[String], lowered: &[String], mixed_caps: bool) -> f64 {
    let word = lowered[i].as_str();
    if lexicon::modifier(word).is_some() {
        return 0.0;
    }
    let Some(mut valence) = lexicon::valence(word) else {
        return 0.0;
    };

    if mixed_caps && is_all_caps(&tokens[i]) {
        valence += CAPS_INCREMENT.copysign(valence);
    }

    for distance in 1..=LOOK_BACK.min(i) {
        let j = i - distance;
        let prior = lowered[j].as_str();
        if lexicon::valence(prior).is_some() {
            continue;
        }

        let mut shift = modifier_shift(&tokens[j], prior, valence, mixed_caps);
        if distance == 2 {
            shift *= 0.95;
        } else if distance == 3 {
            shift *= 0.9;
        }
        valence += shift;

        if lexicon::is_negation(prior) {
            valence *= NEGATION_SCALAR;
        }
    }

    valence
}

/// Shift a modifier applies to a word of the given valence
fn modifier_shift(token: &str, lowered: &str, valence: f64, mixed_caps: bool) -> f64 {
    let Some(mut shift) = lexicon::modifier(lowered) else {
        return 0.0;
    };
    if valence < 0.0 {
        shift = -shift;
    }
    if mixed_caps && is_all_caps(token) {
        shift += CAPS_INCREMENT.copysign(valence);
    }
    shift
}

/// Halve the clause before `but`, amplify the clause after it
fn apply_contrast(lowered: &[String], valences: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, v) in valences.iter_mut().enumerate() {
        if i < pivot {
            *v *= 0.5;
        } else if i > pivot {
            *v *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCREMENT,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f64 * EXCLAMATION_INCREMENT + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valences(valences: &[f64], text: &str) -> SentimentScore {
    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = valences.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut neutral = 0.0;
    for &v in valences {
        if v > 0.0 {
            positive += v + 1.0;
        } else if v < 0.0 {
            negative += v - 1.0;
        } else {
            neutral += 1.0;
        }
    }

    if positive > negative.abs() {
        positive += emphasis;
    } else if positive < negative.abs() {
        negative -= emphasis;
    }

    let total = positive + negative.abs() + neutral;
    if total == 0.0 {
        return SentimentScore::zero();
    }

    SentimentScore {
        negative: round_to((negative / total).abs(), 3),
        neutral: round_to((neutral / total).abs(), 3),
        positive: round_to((positive / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range(score: &SentimentScore) -> bool {
        (0.0..=1.0).contains(&score.negative)
            && (0.0..=1.0).contains(&score.neutral)
            && (0.0..=1.0).contains(&score.positive)
            && (-1.0..=1.0).contains(&score.compound)
    }

    #[test]
    fn test_empty_average_is_zero() {
        let headlines: [&str; 0] = [];
        assert_eq!(average_sentiment(&headlines), SentimentScore::zero());
        assert_eq!(
            SentimentAnalyzer::new().try_average(&headlines),
            Err(EmptyInputError)
        );
        assert_eq!(try_average_sentiment(&headlines), Err(EmptyInputError));
    }

    #[test]
    fn test_positive_and_negative_headlines() {
        let analyzer = SentimentAnalyzer::new();
        let up = analyzer.polarity_scores("Apple shares surge after strong earnings beat");
        assert!(up.compound > 0.5, "{up:?}");
        assert!(up.positive > up.negative);

        let down = analyzer.polarity_scores("Tesla stock plunges on weak demand and layoffs");
        assert!(down.compound < -0.5, "{down:?}");
        assert!(down.negative > down.positive);
    }

    #[test]
    fn test_neutral_headline() {
        let score =
            SentimentAnalyzer::new().polarity_scores("Microsoft to hold annual meeting on Tuesday");
        assert_eq!(score.compound, 0.0);
        assert_eq!(score.neutral, 1.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let analyzer = SentimentAnalyzer::new();
        let plain = analyzer.polarity_scores("The quarter was good");
        let negated = analyzer.polarity_scores("The quarter was not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn test_booster_and_caps_intensify() {
        let analyzer = SentimentAnalyzer::new();
        let plain = analyzer.polarity_scores("results were good");
        let boosted = analyzer.polarity_scores("results were very good");
        let shouted = analyzer.polarity_scores("results were GOOD");
        assert!(boosted.compound > plain.compound);
        assert!(shouted.compound > plain.compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let score = SentimentAnalyzer::new()
            .polarity_scores("Revenue was good but guidance was terrible");
        assert!(score.compound < 0.0, "{score:?}");
    }

    #[test]
    fn test_exclamation_adds_emphasis() {
        let analyzer = SentimentAnalyzer::new();
        let calm = analyzer.polarity_scores("Great quarter");
        let loud = analyzer.polarity_scores("Great quarter!!!");
        assert!(loud.compound > calm.compound);
    }

    #[test]
    fn test_known_compound_value() {
        // sum = 1.9, compound = 1.9 / sqrt(1.9^2 + 15)
        let score = SentimentAnalyzer::new().polarity_scores("good");
        assert!((score.compound - 0.4404).abs() < 1e-9);
        assert_eq!(score.positive, 1.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let headlines = [
            "BEST QUARTER EVER!!!! Profits soar, shares rally, great great great",
            "Worst crash in history: panic, fraud, bankruptcy, crisis, war!!!!",
            "Is this really the end???? not good, not bad",
            "",
            "!!!",
            "a b c",
            "Company says nothing about the lawsuit but record gains",
        ];
        let analyzer = SentimentAnalyzer::new();
        for h in &headlines {
            let s = analyzer.polarity_scores(h);
            assert!(in_range(&s), "{h}: {s:?}");
        }
        let avg = analyzer.average(&headlines);
        assert!(in_range(&avg), "{avg:?}");
    }

    #[test]
    fn test_average_is_mean_of_scores() {
        let analyzer = SentimentAnalyzer::new();
        let headlines = ["Shares surge", "Shares plunge"];
        let a = analyzer.polarity_scores(headlines[0]);
        let b = analyzer.polarity_scores(headlines[1]);
        let avg = analyzer.average(&headlines);
        assert!((avg.compound - (a.compound + b.compound) / 2.0).abs() < 1e-12);
        assert!((avg.positive - (a.positive + b.positive) / 2.0).abs() < 1e-12);

        let summary = analyzer.summarize(&headlines);
        assert_eq!(summary.headline_count, 2);
        assert_eq!(summary.score, avg);
    }
}
