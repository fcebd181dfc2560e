//! Regular expression scanning over text

use regex::Regex;

use crate::node::NodeRef;

/// Scan `text` for every non-overlapping match of `regex`
///
/// Without capture groups each match is the matched text; with one group it is
/// that group; with more it is a tuple of all groups plus the whole match.
pub fn scan(text: &str, regex: &Regex) -> Vec<NodeRef<'static>> {
    let groups = regex.captures_len() - 1;

    regex
        .captures_iter(text)
        .map(|caps| match groups {
            0 => NodeRef::Text(caps[0].to_string()),
            1 => NodeRef::Text(caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default()),
            _ => NodeRef::Tuple {
                matched: caps[0].to_string(),
                groups: caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn texts(nodes: &[NodeRef<'_>]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                NodeRef::Text(t) => t.clone(),
                other => panic!("unexpected node {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_scan_whole_matches() {
        let regex = Regex::new(r"\d+").unwrap();
        let nodes = scan("a1 b22 c333", &regex);
        assert_eq!(texts(&nodes), vec!["1", "22", "333"]);
    }

    #[test]
    fn test_scan_single_group() {
        let regex = RegexBuilder::new(r#"content="(\d+\.?\d+?)""#)
            .case_insensitive(true)
            .build()
            .unwrap();
        let nodes = scan(r#"<span CONTENT="19.99">$19.99</span>"#, &regex);
        assert_eq!(texts(&nodes), vec!["19.99"]);
    }

    #[test]
    fn test_scan_tuples() {
        let regex = Regex::new(r"(\w+)=(\d+)?").unwrap();
        let nodes = scan("a=1 b=", &regex);
        assert_eq!(nodes.len(), 2);
        match &nodes[1] {
            NodeRef::Tuple { matched, groups } => {
                assert_eq!(matched, "b=");
                assert_eq!(groups, &vec![Some("b".to_string()), None]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_scan_no_match() {
        let regex = Regex::new(r"\d+").unwrap();
        assert!(scan("no digits", &regex).is_empty());
    }
}
