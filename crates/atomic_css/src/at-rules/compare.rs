use std::cmp::Ordering;

use super::parse::{parse_at_rule_params, ParsedAtRule};

/// An at-rule prepared for sorting.
#[derive(Debug, Clone)]
pub struct AtRuleQuery {
  pub name: String,
  pub query: String,
  pub parsed: Vec<ParsedAtRule>,
}

impl AtRuleQuery {
  pub fn new(name: &str, query: &str) -> Self {
    let parsed = if matches!(name, "media" | "container") {
      parse_at_rule_params(query)
    } else {
      Vec::new()
    };

    Self {
      name: name.to_string(),
      query: query.to_string(),
      parsed,
    }
  }
}

/// Mobile-first ordering: `min-width` breakpoints ascend, `max-width`
/// breakpoints descend, and queries without a recognizable width or height
/// comparison come last, ordered by their text.
pub fn compare_at_rules(first: &AtRuleQuery, second: &AtRuleQuery) -> Ordering {
  let by_name = first.name.cmp(&second.name);
  if by_name != Ordering::Equal {
    return by_name;
  }

  for (a, b) in first.parsed.iter().zip(&second.parsed) {
    let by_key = a.sort_key().cmp(&b.sort_key());
    if by_key != Ordering::Equal {
      return by_key;
    }

    if a.length != b.length {
      let by_length = if a.operator.includes_greater() {
        a.length.partial_cmp(&b.length)
      } else {
        b.length.partial_cmp(&a.length)
      };
      return by_length.unwrap_or(Ordering::Equal);
    }
  }

  match (first.parsed.len(), second.parsed.len()) {
    (0, 0) => {}
    (0, _) => return Ordering::Greater,
    (_, 0) => return Ordering::Less,
    (a, b) if a != b => return a.cmp(&b),
    _ => {}
  }

  first.query.cmp(&second.query)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn sorted(queries: &[(&str, &str)]) -> Vec<String> {
    let mut queries: Vec<AtRuleQuery> = queries
      .iter()
      .map(|(name, query)| AtRuleQuery::new(name, query))
      .collect();
    queries.sort_by(compare_at_rules);
    queries
      .into_iter()
      .map(|query| format!("@{} {}", query.name, query.query))
      .collect()
  }

  #[test]
  fn min_width_ascends() {
    assert_eq!(
      sorted(&[("media", "(min-width: 400px)"), ("media", "(min-width: 200px)")]),
      vec!["@media (min-width: 200px)", "@media (min-width: 400px)"]
    );
  }

  #[test]
  fn max_width_descends() {
    assert_eq!(
      sorted(&[("media", "(max-width: 200px)"), ("media", "(max-width: 400px)")]),
      vec!["@media (max-width: 400px)", "@media (max-width: 200px)"]
    );
  }

  #[test]
  fn greater_comparisons_come_before_lesser_ones() {
    assert_eq!(
      sorted(&[
        ("media", "(max-width: 400px)"),
        ("media", "(width > 300px)"),
        ("media", "(min-width: 100px)"),
      ]),
      vec![
        "@media (width > 300px)",
        "@media (min-width: 100px)",
        "@media (max-width: 400px)",
      ]
    );
  }

  #[test]
  fn compares_normalized_lengths() {
    assert_eq!(
      sorted(&[("media", "(min-width: 2rem)"), ("media", "(min-width: 20px)")]),
      vec!["@media (min-width: 20px)", "@media (min-width: 2rem)"]
    );
  }

  #[test]
  fn unparseable_queries_come_last_by_text() {
    assert_eq!(
      sorted(&[
        ("media", "(prefers-reduced-motion: reduce)"),
        ("media", "(min-aspect-ratio: 16/9)"),
        ("media", "(min-width: 500px)"),
      ]),
      vec![
        "@media (min-width: 500px)",
        "@media (min-aspect-ratio: 16/9)",
        "@media (prefers-reduced-motion: reduce)",
      ]
    );
  }

  #[test]
  fn names_compare_first() {
    assert_eq!(
      sorted(&[("supports", "(display: grid)"), ("media", "(min-width: 500px)")]),
      vec!["@media (min-width: 500px)", "@supports (display: grid)"]
    );
  }

  #[test]
  fn container_queries_are_parsed() {
    assert_eq!(
      sorted(&[("container", "(width > 600px)"), ("container", "(width > 300px)")]),
      vec!["@container (width > 300px)", "@container (width > 600px)"]
    );
  }
}
