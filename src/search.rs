use crate::graph::Node;

/// Nodes whose label contains `query` as a case-insensitive substring,
/// in input order. An empty query is the caller's short-circuit; this
/// would match every node.
pub fn find_matches<'a>(nodes: &'a [Node], query: &str) -> Vec<&'a Node> {
    let lc_query = query.to_lowercase();
    nodes
        .iter()
        .filter(|node| node.label.to_lowercase().contains(&lc_query))
        .collect()
}

/// The single match whose label equals the query verbatim, if there is
/// exactly one match. The equality check is case-sensitive on purpose,
/// unlike the substring match: it mirrors picking an entry from an
/// autocomplete list rather than typing a prefix.
pub fn exact_match<'a>(matches: &[&'a Node], query: &str) -> Option<&'a Node> {
    match matches {
        [only] if only.label == query => Some(*only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Color, Point};

    fn node(id: &str, label: &str) -> Node {
        Node {
            id: id.to_string(),
            label: label.to_string(),
            position: Point::ORIGIN,
            size: 5.0,
            color: Color::WHITE,
            color_key: String::new(),
        }
    }

    #[test]
    fn substring_match_is_case_insensitive_and_stable() {
        let nodes = vec![node("a", "Paris"), node("b", "Berlin"), node("c", "paris hilton")];
        let matches = find_matches(&nodes, "PARIS");
        let ids: Vec<&str> = matches.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn exact_match_needs_a_single_verbatim_label() {
        let nodes = vec![node("a", "Paris"), node("b", "Paris Hilton")];

        let matches = find_matches(&nodes, "Paris");
        assert_eq!(matches.len(), 2);
        assert!(exact_match(&matches, "Paris").is_none());

        let matches = find_matches(&nodes, "Paris H");
        assert_eq!(matches.len(), 1);
        assert!(exact_match(&matches, "Paris H").is_none());

        let matches = find_matches(&nodes, "Paris Hilton");
        assert_eq!(exact_match(&matches, "Paris Hilton").unwrap().id, "b");
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let nodes = vec![node("a", "Paris")];
        let matches = find_matches(&nodes, "paris");
        assert_eq!(matches.len(), 1);
        assert!(exact_match(&matches, "paris").is_none());
    }
}
