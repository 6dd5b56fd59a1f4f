//! Text extraction utilities
//!
//! Pull structured data, or failing that task-like lines, out of free-form
//! model replies.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{ModelOutput, RawPlan};

/// Most candidate lines kept from unstructured text
pub const MAX_CANDIDATE_LINES: usize = 5;

/// Candidate lines must be longer than this (in chars) after trimming
const MIN_CANDIDATE_CHARS: usize = 10;

/// Fallback titles are cut to this many chars
const TITLE_FALLBACK_CHARS: usize = 30;

const STOP_WORDS: [&str; 8] = ["the", "and", "for", "with", "this", "that", "will", "should"];

fn fenced_json_regex() -> &'static Regex {
    static FENCED_JSON_RE: OnceLock<Regex> = OnceLock::new();
    FENCED_JSON_RE.get_or_init(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("fenced json regex must compile"))
}

fn fenced_any_regex() -> &'static Regex {
    static FENCED_ANY_RE: OnceLock<Regex> = OnceLock::new();
    FENCED_ANY_RE.get_or_init(|| Regex::new(r"(?s)```\s*(.*?)\s*```").expect("fenced block regex must compile"))
}

fn trailing_comma_regex() -> &'static Regex {
    static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();
    TRAILING_COMMA_RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("trailing comma regex must compile"))
}

/// Numbered, bullet and dash list items, in priority order
fn candidate_line_regexes() -> &'static [Regex; 3] {
    static CANDIDATE_RES: OnceLock<[Regex; 3]> = OnceLock::new();
    CANDIDATE_RES.get_or_init(|| {
        [
            Regex::new(r"\d+\.\s*([^.\n]+)").expect("numbered item regex must compile"),
            Regex::new(r"•\s*([^.\n]+)").expect("bullet item regex must compile"),
            Regex::new(r"-\s*([^.\n]+)").expect("dash item regex must compile"),
        ]
    })
}

/// Find embedded JSON in a model reply
///
/// Tries, in order: a ```json fenced block, any fenced block, then the first
/// balanced `{...}` span. Trailing commas before `}` or `]` are removed from
/// the match. Returns None when none of the three finds anything.
pub fn extract_json(text: &str) -> Option<String> {
    debug!(text_len = text.len(), "extract_json: called");

    let found = fenced_json_regex()
        .captures(text)
        .or_else(|| fenced_any_regex().captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| first_brace_span(text).map(str::to_string));

    match found {
        Some(json) => {
            debug!(json_len = json.len(), "extract_json: candidate found");
            Some(strip_trailing_commas(&json))
        }
        None => {
            debug!("extract_json: no candidate");
            None
        }
    }
}

/// Remove commas that directly precede a closing brace or bracket
pub fn strip_trailing_commas(json: &str) -> String {
    trailing_comma_regex().replace_all(json, "$1").into_owned()
}

/// First `{` through its matching `}`, skipping braces inside string literals
fn first_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Resolve a raw model reply into its single canonical shape
///
/// Any failure to find or decode a JSON object lands in `RawText`; this never
/// errors.
pub fn interpret_response(text: &str) -> ModelOutput {
    let text = text.trim();
    debug!(text_len = text.len(), "interpret_response: called");

    if let Some(json) = extract_json(text) {
        match serde_json::from_str::<Value>(&json) {
            Ok(value) => {
                if let Some(plan) = RawPlan::from_value(&value) {
                    debug!(variant_count = plan.variants.len(), "interpret_response: structured plan");
                    return ModelOutput::Structured(plan);
                }
                warn!("interpret_response: extracted JSON is not an object, treating reply as text");
            }
            Err(e) => {
                let preview: String = text.chars().take(200).collect();
                warn!(error = %e, %preview, "interpret_response: JSON parse failed, treating reply as text");
            }
        }
    }

    ModelOutput::RawText(text.to_string())
}

/// Pull up to five task-like list items out of free text
///
/// Numbered items are taken first, then bullets, then dash items. Only the
/// first five matches of each pattern are considered, and only fragments
/// longer than ten chars are kept.
pub fn extract_candidate_lines(text: &str) -> Vec<String> {
    debug!(text_len = text.len(), "extract_candidate_lines: called");
    let mut lines = Vec::new();

    for re in candidate_line_regexes() {
        for caps in re.captures_iter(text).take(MAX_CANDIDATE_LINES) {
            let Some(fragment) = caps.get(1) else {
                continue;
            };
            let line = fragment.as_str().trim();
            if line.chars().count() > MIN_CANDIDATE_CHARS {
                lines.push(line.to_string());
                if lines.len() >= MAX_CANDIDATE_LINES {
                    debug!("extract_candidate_lines: cap reached");
                    return lines;
                }
            }
        }
    }

    debug!(count = lines.len(), "extract_candidate_lines: done");
    lines
}

/// Derive a short title from a long line
///
/// Looks at the first four words, drops short words and stop-words, and
/// title-cases up to three of what remains. With fewer than two meaningful
/// words the line itself is used, cut to 30 chars.
pub fn derive_title(line: &str) -> String {
    let key_words: Vec<&str> = line
        .split_whitespace()
        .take(4)
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();

    if key_words.len() >= 2 {
        let end = key_words.len().min(3);
        return title_case(&key_words[..end].join(" "));
    }

    if line.chars().count() > TITLE_FALLBACK_CHARS {
        let head: String = line.chars().take(TITLE_FALLBACK_CHARS).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

/// Upper-case the first cased letter of every run, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && prev_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_with_trailing_comma() {
        let text = "```json\n{\"a\":1,}\n```";
        assert_eq!(extract_json(text).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_fenced_json_preferred_over_plain_fence() {
        let text = "```\nnot this\n```\nthen\n```JSON\n{\"b\": 2}\n```";
        assert_eq!(extract_json(text).as_deref(), Some("{\"b\": 2}"));
    }

    #[test]
    fn test_any_fence_before_braces() {
        let text = "prefix {\"x\": 1} and\n```\n{\"y\": [1, 2,]}\n```";
        assert_eq!(extract_json(text).as_deref(), Some("{\"y\": [1, 2]}"));
    }

    #[test]
    fn test_first_brace_span_handles_nesting_and_strings() {
        let text = r#"Here you go: {"a": {"b": "}"}, "c": [1,]} trailing {"d": 1}"#;
        assert_eq!(extract_json(text).as_deref(), Some(r#"{"a": {"b": "}"}, "c": [1]}"#));
    }

    #[test]
    fn test_no_json_found() {
        assert_eq!(extract_json("just some words"), None);
        assert_eq!(extract_json("an { unclosed brace"), None);
    }

    #[test]
    fn test_interpret_structured() {
        let text = "```json\n{\"summary\": \"s\", \"variants\": {}}\n```";
        match interpret_response(text) {
            ModelOutput::Structured(plan) => assert_eq!(plan.summary.as_deref(), Some("s")),
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_invalid_json_is_text() {
        let text = "  ```json\n{\"summary\": oops}\n```  ";
        assert_eq!(interpret_response(text), ModelOutput::RawText(text.trim().to_string()));
    }

    #[test]
    fn test_interpret_non_object_is_text() {
        let text = "```json\n[1, 2, 3]\n```";
        assert!(matches!(interpret_response(text), ModelOutput::RawText(_)));
    }

    #[test]
    fn test_candidate_lines_priority_and_length() {
        let text = "1. Gather all requirements\n2. Short\n• Design the database layout\n- Deploy to production servers";
        let lines = extract_candidate_lines(text);
        assert_eq!(
            lines,
            vec![
                "Gather all requirements",
                "Design the database layout",
                "Deploy to production servers",
            ]
        );
    }

    #[test]
    fn test_candidate_lines_capped_at_five() {
        let text = (1..=8)
            .map(|i| format!("{}. Complete milestone number {}", i, i))
            .chain((1..=3).map(|i| format!("- Another dash item {}", i)))
            .collect::<Vec<_>>()
            .join("\n");
        let lines = extract_candidate_lines(&text);
        assert_eq!(lines.len(), MAX_CANDIDATE_LINES);
        assert!(lines.iter().all(|l| l.starts_with("Complete milestone")));
    }

    #[test]
    fn test_candidate_lines_stop_at_period() {
        let lines = extract_candidate_lines("1. Write the project charter. Then relax");
        assert_eq!(lines, vec!["Write the project charter"]);
    }

    #[test]
    fn test_no_candidate_lines() {
        assert!(extract_candidate_lines("nothing list-like here").is_empty());
    }

    #[test]
    fn test_derive_title_drops_stop_words() {
        assert_eq!(derive_title("Design the database schema carefully"), "Design Database Schema");
        assert_eq!(derive_title("set up CI pipeline for releases"), "Set Pipeline");
    }

    #[test]
    fn test_derive_title_keeps_three_words() {
        assert_eq!(derive_title("Research competitor pricing models today"), "Research Competitor Pricing");
    }

    #[test]
    fn test_derive_title_fallback() {
        assert_eq!(derive_title("Do it now"), "Do it now");
        assert_eq!(
            derive_title("Go to the supermarket and buy everything that is needed"),
            "Go to the supermarket and buy ..."
        );
    }

    #[test]
    fn test_title_case_word_runs() {
        assert_eq!(title_case("front-end WORK"), "Front-End Work");
        assert_eq!(title_case("3d models"), "3D Models");
    }
}
