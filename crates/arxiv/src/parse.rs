//! Atom feed parsing for arXiv API responses.
//!
//! The feed is small and flat, so extraction works on tag/attribute text
//! directly. Entries and authors are collected into `Vec`s as they are
//! found; a feed with one entry or an entry with one author therefore
//! parses to a one-element sequence, never a bare scalar.

use paperdesk_common::types::Paper;

/// Parse a full Atom response into normalized papers, in feed order.
pub fn parse_atom_feed(xml: &str) -> Vec<Paper> {
    extract_entries(xml)
        .iter()
        .filter_map(|entry| parse_entry(entry))
        .collect()
}

/// Extract all <entry>...</entry> blocks from the XML.
fn extract_entries(xml: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut search_from = 0;

    loop {
        let start_tag = "<entry>";
        let end_tag = "</entry>";

        let start = match xml[search_from..].find(start_tag) {
            Some(pos) => search_from + pos,
            None => break,
        };

        let end = match xml[start..].find(end_tag) {
            Some(pos) => start + pos + end_tag.len(),
            None => break,
        };

        entries.push(xml[start..end].to_string());
        search_from = end;
    }

    entries
}

/// Parse a single <entry> block into a Paper.
fn parse_entry(entry: &str) -> Option<Paper> {
    let link = extract_tag_text(entry, "id")?;
    let title = normalize_whitespace(&extract_tag_text(entry, "title")?);
    let summary = normalize_whitespace(&extract_tag_text(entry, "summary").unwrap_or_default());

    let mut authors = Vec::new();
    let mut author_search = 0;
    while let Some(pos) = entry[author_search..].find("<author>") {
        let author_start = author_search + pos;
        let Some(end_pos) = entry[author_start..].find("</author>") else {
            break;
        };
        let author_end = author_start + end_pos + "</author>".len();
        let author_block = &entry[author_start..author_end];
        if let Some(name) = extract_tag_text(author_block, "name") {
            authors.push(name);
        }
        author_search = author_end;
    }

    if authors.is_empty() {
        authors.push("Unknown".to_string());
    }

    Some(Paper {
        title,
        summary,
        authors,
        link,
    })
}

/// Extract the text content of the first occurrence of <tag>text</tag>.
fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start_pos = xml.find(&open)?;
    // Find the end of the opening tag (could have attributes)
    let content_start = xml[start_pos..].find('>')? + start_pos + 1;
    let content_end = xml[content_start..].find(&close)? + content_start;

    Some(xml[content_start..content_end].trim().to_string())
}

/// Normalize whitespace: collapse runs of whitespace into single spaces
/// and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ENTRY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query results</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <title>Attention Is All
        You Need</title>
    <summary>  The dominant sequence transduction models are based on
        complex recurrent or convolutional neural networks.  </summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1810.04805v2</id>
    <title>BERT: Pre-training of Deep Bidirectional Transformers</title>
    <summary>We introduce a new language representation model.</summary>
    <author><name>Jacob Devlin</name></author>
  </entry>
</feed>"#;

    const SINGLE_ENTRY_SINGLE_AUTHOR: &str = r#"<feed>
  <entry>
    <id>http://arxiv.org/abs/2301.00001v1</id>
    <title>A Lone Result</title>
    <summary>One entry, one author.</summary>
    <author><name>Solo Researcher</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parses_all_entries_in_order() {
        let papers = parse_atom_feed(TWO_ENTRY_FEED);
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].link, "http://arxiv.org/abs/1706.03762v7");
        assert_eq!(papers[1].link, "http://arxiv.org/abs/1810.04805v2");
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let papers = parse_atom_feed(TWO_ENTRY_FEED);
        assert_eq!(papers[0].title, "Attention Is All You Need");
        assert!(papers[0]
            .summary
            .starts_with("The dominant sequence transduction models"));
        assert!(!papers[0].summary.contains("\n"));
        assert!(!papers[0].summary.starts_with(' '));
    }

    #[test]
    fn test_single_entry_single_author_coerced_to_sequences() {
        let papers = parse_atom_feed(SINGLE_ENTRY_SINGLE_AUTHOR);
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].authors, vec!["Solo Researcher".to_string()]);
    }

    #[test]
    fn test_multiple_authors_in_order() {
        let papers = parse_atom_feed(TWO_ENTRY_FEED);
        assert_eq!(
            papers[0].authors,
            vec!["Ashish Vaswani".to_string(), "Noam Shazeer".to_string()]
        );
    }

    #[test]
    fn test_missing_authors_become_unknown() {
        let feed = r#"<feed><entry>
            <id>http://arxiv.org/abs/x</id>
            <title>No Authors Listed</title>
            <summary>Oops.</summary>
        </entry></feed>"#;
        let papers = parse_atom_feed(feed);
        assert_eq!(papers[0].authors, vec!["Unknown".to_string()]);
    }

    #[test]
    fn test_empty_feed_yields_empty_list() {
        let feed = r#"<feed><title>ArXiv Query results</title></feed>"#;
        assert!(parse_atom_feed(feed).is_empty());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n   b\tc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }
}
