//! Message intent classification.
//!
//! Pure keyword matching against the lower-cased message, evaluated in a
//! fixed priority order; the first matching category wins and anything
//! unmatched is General.

/// What the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Summary,
    Methodology,
    Contribution,
    Authors,
    Findings,
    Comparison,
    Technical,
    General,
}

/// Keyword table in priority order. First row whose keywords match wins.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::Summary, &["summary", "summarize", "overview"]),
    (Intent::Methodology, &["method", "approach", "technique"]),
    (Intent::Contribution, &["contribution", "novel", "innovation"]),
    (Intent::Authors, &["author", "researcher", "who wrote"]),
    (Intent::Findings, &["result", "finding", "conclusion"]),
    (Intent::Comparison, &["compare", "difference", "vs"]),
    (Intent::Technical, &["algorithm", "equation", "formula"]),
];

/// Classify a user message.
pub fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();

    for (intent, keywords) in RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *intent;
        }
    }

    Intent::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        let cases = [
            ("Can you summarize this paper?", Intent::Summary),
            ("give me an OVERVIEW", Intent::Summary),
            ("What approach did they take?", Intent::Methodology),
            ("is this a novel technique?", Intent::Methodology), // method beats novel
            ("What is the main contribution?", Intent::Contribution),
            ("who wrote this?", Intent::Authors),
            ("what were the results?", Intent::Findings),
            ("how does it compare to BERT?", Intent::Comparison),
            ("explain the algorithm", Intent::Technical),
            ("tell me more", Intent::General),
            ("", Intent::General),
        ];

        for (message, expected) in cases {
            assert_eq!(classify(message), expected, "message: {:?}", message);
        }
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // Contains both "summary" and "result"; summary has higher priority.
        assert_eq!(
            classify("summary of the results please"),
            Intent::Summary
        );
        // Contains both "method" and "algorithm"; methodology wins.
        assert_eq!(
            classify("what method does the algorithm use"),
            Intent::Methodology
        );
    }
}
