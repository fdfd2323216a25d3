//! Weighted-sum visa-chance scoring over completed quiz answers.

use std::collections::HashMap;

/// Maximum attainable score: 2+2+2+2+1+2.
pub const MAX_SCORE: u32 = 11;

/// Typed view of the quiz answers the score depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    /// Visa category digit; `1` is tourism.
    pub visa_type: String,
    pub has_invite: bool,
    pub prior_visa: bool,
    pub income: u64,
    pub family_stays: bool,
    pub refusals: bool,
}

impl QuizAnswers {
    /// Build from a completed quiz answers map. Values are already
    /// validator-normalized; anything unexpected counts as the
    /// zero-point answer.
    pub fn from_answers(answers: &HashMap<&'static str, String>) -> Self {
        let yes = |field: &str| answers.get(field).is_some_and(|v| v == "yes");
        Self {
            visa_type: answers.get("visa_type").cloned().unwrap_or_default(),
            has_invite: yes("has_invite"),
            prior_visa: yes("prior_visa"),
            income: answers.get("income").map_or(0, |v| parse_income(v)),
            family_stays: yes("family_stays"),
            refusals: yes("refusals"),
        }
    }
}

/// Validator-normalized amounts are digit strings of any length; amounts
/// past `u64` saturate, which the >= 1500 band absorbs.
fn parse_income(value: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            u64::MAX
        } else {
            0
        }
    })
}

/// Scored quiz result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u32,
    /// `floor(score * 100 / 11)`, in [0, 100].
    pub percent: u32,
    /// Tier message interpolating the percent.
    pub message: String,
}

/// Deterministic additive score. Order-independent by construction: each
/// condition reads one answer.
pub fn score_quiz(answers: &QuizAnswers) -> QuizResult {
    let mut score = 0;
    if answers.visa_type == "1" {
        score += 2;
    }
    if answers.has_invite {
        score += 2;
    }
    if answers.prior_visa {
        score += 2;
    }
    if answers.income >= 1500 {
        score += 2;
    } else if answers.income >= 700 {
        score += 1;
    }
    if answers.family_stays {
        score += 1;
    }
    if !answers.refusals {
        score += 2;
    }

    let percent = score * 100 / MAX_SCORE;
    QuizResult {
        score,
        percent,
        message: tier_message(percent),
    }
}

fn tier_message(percent: u32) -> String {
    if percent >= 80 {
        format!(
            "Your visa chance estimate: {percent}%\n\
             👍 Excellent odds! Focus on preparing your documents well."
        )
    } else if percent >= 50 {
        format!(
            "Your visa chance estimate: {percent}%\n\
             👌 Very doable, but prepare carefully. Pay special attention to \
             demonstrating your ties to home."
        )
    } else {
        format!(
            "Your visa chance estimate: {percent}%\n\
             ⚠️ We recommend booking a consultation and gathering additional \
             supporting documents."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(
        visa: &str,
        invite: bool,
        prior: bool,
        income: u64,
        family: bool,
        refusals: bool,
    ) -> QuizAnswers {
        QuizAnswers {
            visa_type: visa.to_string(),
            has_invite: invite,
            prior_visa: prior,
            income,
            family_stays: family,
            refusals,
        }
    }

    #[test]
    fn perfect_answers_hit_max_and_positive_tier() {
        let result = score_quiz(&answers("1", true, true, 2000, true, false));
        assert_eq!(result.score, 11);
        assert_eq!(result.percent, 100);
        assert!(result.message.contains("100%"));
        assert!(result.message.contains("Excellent odds"));
    }

    #[test]
    fn worst_answers_score_zero_and_recommend_consultation() {
        let result = score_quiz(&answers("3", false, false, 500, false, true));
        assert_eq!(result.score, 0);
        assert_eq!(result.percent, 0);
        assert!(result.message.contains("0%"));
        assert!(result.message.contains("consultation"));
    }

    #[test]
    fn income_bands() {
        let base = |income| score_quiz(&answers("2", false, false, income, false, true)).score;
        assert_eq!(base(699), 0);
        assert_eq!(base(700), 1);
        assert_eq!(base(1499), 1);
        assert_eq!(base(1500), 2);
    }

    #[test]
    fn percent_floors() {
        // score 6 → 54.54…% → 54
        let result = score_quiz(&answers("1", true, false, 700, true, true));
        assert_eq!(result.score, 6);
        assert_eq!(result.percent, 54);
    }

    #[test]
    fn cautious_tier_between_50_and_79() {
        // score 7 → 63%
        let result = score_quiz(&answers("1", true, true, 600, true, true));
        assert_eq!(result.score, 7);
        assert_eq!(result.percent, 63);
        assert!(result.message.contains("ties to home"));
    }

    #[test]
    fn tier_boundaries() {
        // score 9 → 81% positive; score 8 → 72% cautious; score 5 → 45% consult
        assert!(tier_message(81).contains("Excellent"));
        assert!(tier_message(80).contains("Excellent"));
        assert!(tier_message(79).contains("prepare carefully"));
        assert!(tier_message(50).contains("prepare carefully"));
        assert!(tier_message(49).contains("recommend"));
    }

    #[test]
    fn scoring_is_order_independent_of_answer_map() {
        // Build the same answer set via maps inserted in different orders.
        let fields: [(&'static str, &str); 6] = [
            ("visa_type", "1"),
            ("has_invite", "yes"),
            ("prior_visa", "yes"),
            ("income", "2000"),
            ("family_stays", "yes"),
            ("refusals", "no"),
        ];
        let forward: HashMap<&'static str, String> = fields
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        let reverse: HashMap<&'static str, String> = fields
            .iter()
            .rev()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();

        let a = score_quiz(&QuizAnswers::from_answers(&forward));
        let b = score_quiz(&QuizAnswers::from_answers(&reverse));
        assert_eq!(a, b);
        assert_eq!(a.percent, 100);
    }

    #[test]
    fn oversized_income_lands_in_the_top_band() {
        let mut map: HashMap<&'static str, String> = HashMap::new();
        map.insert("income", "999999999999999999999".to_string());
        let parsed = QuizAnswers::from_answers(&map);
        assert_eq!(parsed.income, u64::MAX);

        map.insert("income", "not digits".to_string());
        assert_eq!(QuizAnswers::from_answers(&map).income, 0);
    }

    #[test]
    fn from_answers_defaults_missing_fields() {
        let empty = HashMap::new();
        let parsed = QuizAnswers::from_answers(&empty);
        // A missing refusals answer reads as "no", which is the +2 branch.
        let result = score_quiz(&parsed);
        assert_eq!(result.score, 2);
    }
}
