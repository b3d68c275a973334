//! Deterministic fallback replies.
//!
//! Used whenever the completion service is unavailable or misbehaves.
//! Everything here is derived only from the paper context, so a reply
//! can always be produced without I/O.

use crate::intent::Intent;
use paperdesk_common::types::Paper;

/// Build a reply for the given intent from the paper alone.
pub fn fallback_reply(intent: Intent, paper: &Paper) -> String {
    match intent {
        Intent::Summary => summary_reply(paper),
        Intent::Methodology => methodology_reply(paper),
        Intent::Contribution => contribution_reply(paper),
        Intent::Authors => authors_reply(paper),
        Intent::Findings => findings_reply(paper),
        Intent::Comparison => comparison_reply(paper),
        Intent::Technical => technical_reply(paper),
        Intent::General => general_reply(paper),
    }
}

fn summary_reply(paper: &Paper) -> String {
    let points = key_points(&paper.summary);
    let bullets: Vec<String> = points.iter().map(|p| format!("- {}", p)).collect();

    format!(
        "## Paper Summary: {}\n\n**Authors:** {}\n\n**Key Points:**\n{}\n\n\
         Would you like me to dive deeper into any specific aspect?",
        paper.title,
        author_line(&paper.authors),
        bullets.join("\n"),
    )
}

fn methodology_reply(paper: &Paper) -> String {
    format!(
        "## Methodology\n\nBased on the abstract of \"{}\", the work appears to follow \
         a {} approach. The methodology section of the full paper would contain detailed \
         implementation specifics.\n\nWould you like me to help identify specific \
         technical terms mentioned in the abstract?",
        paper.title,
        infer_research_type(&paper.summary),
    )
}

fn contribution_reply(paper: &Paper) -> String {
    format!(
        "## Main Contributions\n\nBased on the paper \"{}\", the abstract suggests: \
         {}\n\nFor the authors' own framing of their contributions, see the \
         introduction of the full paper.",
        paper.title,
        first_sentence(&paper.summary),
    )
}

fn authors_reply(paper: &Paper) -> String {
    let collaboration = match paper.authors.len() {
        0 | 1 => "a single-author work".to_string(),
        n if n <= 3 => format!("a collaboration between {} researchers", n),
        n => format!("a large collaborative work with {} contributors", n),
    };

    format!(
        "## Author Information\n\n\"{}\" is {}.\n\n{}",
        paper.title,
        collaboration,
        paper
            .authors
            .iter()
            .enumerate()
            .map(|(i, a)| {
                if i == 0 {
                    format!("**Lead Author:** {}", a)
                } else {
                    format!("**Co-author:** {}", a)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn findings_reply(paper: &Paper) -> String {
    format!(
        "## Key Findings\n\nFrom the abstract of \"{}\": {}\n\nNote: these are drawn \
         from the abstract only; for complete results refer to the Results and \
         Discussion sections of the full paper.",
        paper.title,
        first_sentence(&paper.summary),
    )
}

fn comparison_reply(paper: &Paper) -> String {
    format!(
        "## Comparison\n\nYou're asking about comparisons related to \"{}\". For \
         detailed comparisons I'd recommend the Related Work section and the \
         experimental comparison tables of the full paper.\n\nWhat specific aspect \
         would you like me to compare?",
        paper.title,
    )
}

fn technical_reply(paper: &Paper) -> String {
    format!(
        "## Technical Detail\n\nThe abstract of \"{}\" mentions: {}\n\nFor the precise \
         formulation, refer to the technical sections of the full paper.",
        paper.title,
        first_sentence(&paper.summary),
    )
}

fn general_reply(paper: &Paper) -> String {
    let excerpt: String = paper.summary.chars().take(200).collect();
    format!(
        "Based on your question about \"{}\": the paper's abstract suggests \"{}...\"\n\n\
         I can help you explore the summary, methodology, contributions, authors, or \
         findings of this paper. What would you like to dive into?",
        paper.title, excerpt,
    )
}

fn author_line(authors: &[String]) -> String {
    if authors.len() > 3 {
        format!("{} et al.", authors[..3].join(", "))
    } else {
        authors.join(", ")
    }
}

fn first_sentence(abstract_text: &str) -> String {
    abstract_text
        .split('.')
        .map(str::trim)
        .find(|s| s.len() > 20)
        .unwrap_or("the abstract gives limited detail")
        .to_string()
}

fn key_points(abstract_text: &str) -> Vec<String> {
    abstract_text
        .split('.')
        .map(str::trim)
        .filter(|s| s.len() > 20)
        .take(4)
        .map(|s| {
            if s.chars().count() > 80 {
                format!("{}...", s.chars().take(80).collect::<String>())
            } else {
                s.to_string()
            }
        })
        .collect()
}

fn infer_research_type(abstract_text: &str) -> &'static str {
    let lower = abstract_text.to_lowercase();
    if lower.contains("experiment") {
        "experimental"
    } else if lower.contains("survey") {
        "survey-based"
    } else if lower.contains("theoretical") {
        "theoretical"
    } else if lower.contains("empirical") {
        "empirical"
    } else {
        "analytical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> Paper {
        Paper::new(
            "Attention Is All You Need",
            "The dominant sequence transduction models are based on complex recurrent \
             or convolutional neural networks. We propose a new simple network \
             architecture, the Transformer. Experiments on two machine translation \
             tasks show these models to be superior in quality.",
            vec![
                "Ashish Vaswani".into(),
                "Noam Shazeer".into(),
                "Niki Parmar".into(),
                "Jakob Uszkoreit".into(),
            ],
            "http://arxiv.org/abs/1706.03762v7",
        )
    }

    #[test]
    fn test_every_intent_includes_title() {
        let intents = [
            Intent::Summary,
            Intent::Methodology,
            Intent::Contribution,
            Intent::Authors,
            Intent::Findings,
            Intent::Comparison,
            Intent::Technical,
            Intent::General,
        ];

        for intent in intents {
            let reply = fallback_reply(intent, &paper());
            assert!(
                reply.contains("Attention Is All You Need"),
                "intent {:?} reply missing title",
                intent
            );
            assert!(!reply.is_empty());
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(
            fallback_reply(Intent::Summary, &paper()),
            fallback_reply(Intent::Summary, &paper())
        );
    }

    #[test]
    fn test_author_line_truncates_long_lists() {
        let reply = fallback_reply(Intent::Summary, &paper());
        assert!(reply.contains("et al."));
    }

    #[test]
    fn test_research_type_inference() {
        assert_eq!(infer_research_type("We run an experiment"), "experimental");
        assert_eq!(infer_research_type("A survey of methods"), "survey-based");
        assert_eq!(infer_research_type("We prove things"), "analytical");
    }
}
