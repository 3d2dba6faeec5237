use crate::rule::{RuleDefinition, RuleDocs, RuleMeta, RuleSchema, RuleVisitor};
use serde::Deserialize;
use serde_json::json;
use std::rc::Rc;

/// Options for `no-warning-comments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct WarningCommentsOptions {
    /// Terms to flag, matched case-insensitively.
    terms: Vec<String>,
    /// Where in the comment a term counts as a match.
    location: TermLocation,
}

impl Default for WarningCommentsOptions {
    fn default() -> Self {
        Self {
            terms: vec!["todo".to_string(), "fixme".to_string(), "xxx".to_string()],
            location: TermLocation::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TermLocation {
    Start,
    Anywhere,
}

/// `no-warning-comments`: flag comments containing configured warning terms.
///
/// Works on the token stream rather than the tree; one report per matched
/// term, so a comment naming two terms is reported twice.
pub(crate) fn rule() -> RuleDefinition {
    RuleDefinition::with_meta(
        RuleMeta {
            docs: Some(RuleDocs {
                description: "disallow specified warning terms in comments".to_string(),
                category: "Best Practices".to_string(),
                recommended: false,
            }),
            fixable: None,
            schema: Some(RuleSchema::Positional(vec![json!({
                "type": "object",
                "properties": {
                    "terms": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "location": {
                        "enum": ["start", "anywhere"]
                    }
                },
                "additionalProperties": false
            })])),
        },
        |context| {
            let options: WarningCommentsOptions = context
                .option(0)
                .and_then(|value| serde_json::from_value(value.clone()).ok())
                .unwrap_or_default();
            let terms: Vec<String> = options
                .terms
                .iter()
                .map(|term| term.to_lowercase())
                .collect();

            let reporter = Rc::clone(&context);
            Ok(RuleVisitor::new().on("Program", move |_| {
                for comment in reporter.comments() {
                    for term in &terms {
                        if comment_matches(&comment.value, term, options.location) {
                            reporter.report_token_with_data(
                                comment,
                                "Unexpected '{{matchedTerm}}' comment.",
                                &[("matchedTerm", term)],
                            );
                        }
                    }
                }
                Ok(())
            }))
        },
    )
}

/// Case-insensitive term match with word boundaries, so `todo` does not
/// match inside `mastodon`. Boundaries are only required on sides where the
/// term itself starts or ends with a word character.
fn comment_matches(comment: &str, term: &str, location: TermLocation) -> bool {
    let haystack = comment.to_lowercase();
    match location {
        TermLocation::Start => {
            let trimmed = haystack.trim_start();
            trimmed.starts_with(term) && boundary_after(trimmed, term.len(), term)
        }
        TermLocation::Anywhere => haystack.match_indices(term).any(|(index, _)| {
            boundary_before(&haystack, index, term)
                && boundary_after(&haystack, index + term.len(), term)
        }),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn boundary_before(haystack: &str, index: usize, term: &str) -> bool {
    if !term.chars().next().is_some_and(is_word_char) {
        return true;
    }
    !haystack[..index].chars().next_back().is_some_and(is_word_char)
}

fn boundary_after(haystack: &str, end: usize, term: &str) -> bool {
    if !term.chars().next_back().is_some_and(is_word_char) {
        return true;
    }
    !haystack[end..].chars().next().is_some_and(is_word_char)
}
