// repairlog - core/knowledge.rs
//
// Read-only queries over a previously written instruction document:
// keyword search, per-equipment listing, and problem-category statistics.
// Core layer: accepts JSON text, never touches the filesystem.

use crate::core::model::{ProblemCategory, RepairInstruction};
use crate::util::constants;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Accepted key spellings for each instruction field (English first).
const AREA_KEYS: &[&str] = &["area", "Участок"];
const EQUIPMENT_KEYS: &[&str] = &["equipment_group", "Группа оборудования"];
const COMPONENT_KEYS: &[&str] = &["component", "Узел"];
const PROBLEM_KEYS: &[&str] = &["problem", "Проблема"];
const SOLUTION_KEYS: &[&str] = &["solution", "Решение"];

/// Trimmed text of the first present, non-null key. Scalars other than
/// strings are rendered as their JSON text.
fn field_text(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| node.get(*k).filter(|v| !v.is_null()))
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
}

fn parse_instruction(node: &Value) -> Option<RepairInstruction> {
    let problem = field_text(node, PROBLEM_KEYS)?;
    let solution = field_text(node, SOLUTION_KEYS)?;
    Some(RepairInstruction {
        area: field_text(node, AREA_KEYS).unwrap_or_default(),
        equipment_group: field_text(node, EQUIPMENT_KEYS).unwrap_or_default(),
        component: field_text(node, COMPONENT_KEYS).unwrap_or_default(),
        problem,
        solution,
    })
}

/// Parse an instruction document.
///
/// Entries without a problem or solution are skipped. A root that is not an
/// array yields an empty list.
pub fn parse_instructions(json: &str) -> Result<Vec<RepairInstruction>, serde_json::Error> {
    let root: Value = serde_json::from_str(json)?;

    let Some(nodes) = root.as_array() else {
        tracing::warn!("Instruction document root is not an array; nothing loaded");
        return Ok(Vec::new());
    };

    let mut instructions = Vec::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        match parse_instruction(node) {
            Some(inst) => instructions.push(inst),
            None => tracing::debug!(index = idx, "Skipping entry without problem/solution"),
        }
    }
    Ok(instructions)
}

/// Split a free-text query into lower-case search keywords.
///
/// Punctuation becomes whitespace, stop words are dropped, and words shorter
/// than `constants::MIN_KEYWORD_CHARS` characters are ignored.
pub fn extract_keywords(query: &str) -> Vec<String> {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    let non_word = NON_WORD
        .get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("keywords: invalid built-in regex"));

    let lower = query.to_lowercase();
    non_word
        .replace_all(&lower, " ")
        .split_whitespace()
        .filter(|w| !constants::SEARCH_STOP_WORDS.contains(w))
        .filter(|w| w.chars().count() >= constants::MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// An in-memory set of repair instructions.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    instructions: Vec<RepairInstruction>,
}

impl KnowledgeBase {
    pub fn new(instructions: Vec<RepairInstruction>) -> Self {
        Self { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions relevant to a free-text problem description, best first.
    ///
    /// An instruction is relevant when its problem or solution contains any
    /// query keyword. Relevance is the total number of keyword occurrences;
    /// ties keep document order. At most `limit` results are returned.
    pub fn find_relevant(&self, query: &str, limit: usize) -> Vec<&RepairInstruction> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let keywords = extract_keywords(query);
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &RepairInstruction)> = self
            .instructions
            .iter()
            .filter_map(|inst| {
                let text = format!("{} {}", inst.problem, inst.solution).to_lowercase();
                let score: usize = keywords.iter().map(|k| text.matches(k.as_str()).count()).sum();
                (score > 0).then_some((score, inst))
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        tracing::debug!(
            keywords = ?keywords,
            matched = scored.len(),
            limit,
            "Keyword search complete"
        );

        scored.into_iter().take(limit).map(|(_, inst)| inst).collect()
    }

    /// Instructions whose equipment group contains `name` (case-insensitive).
    pub fn for_equipment(&self, name: &str) -> Vec<&RepairInstruction> {
        let needle = name.to_lowercase();
        self.instructions
            .iter()
            .filter(|inst| inst.equipment_group.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of instructions per problem category. Categories with no
    /// instructions are absent.
    pub fn problem_statistics(&self) -> BTreeMap<ProblemCategory, usize> {
        let mut stats = BTreeMap::new();
        for inst in &self.instructions {
            *stats.entry(ProblemCategory::classify(&inst.problem)).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(equipment: &str, problem: &str, solution: &str) -> RepairInstruction {
        RepairInstruction {
            area: "Сборка".to_string(),
            equipment_group: equipment.to_string(),
            component: "Узел".to_string(),
            problem: problem.to_string(),
            solution: solution.to_string(),
        }
    }

    fn sample() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            inst("HFV2", "Утечка пара", "Заменил прокладку"),
            inst("HFV2 линия 3", "Утечка азота", "Утечка устранена, азот подключен"),
            inst("Пресс", "Датчик не работает", "Заменил датчик"),
            inst("Пресс", "Износ ремня", "Замена ремня"),
        ])
    }

    #[test]
    fn test_parse_skips_incomplete_entries_and_trims() {
        let json = r#"[
            {"area": " A ", "equipment_group": "M", "component": "N",
             "problem": "  Шум ", "solution": "Смазал"},
            {"area": "A", "problem": "Шум", "solution": null},
            {"area": "A", "solution": "Смазал"}
        ]"#;
        let list = parse_instructions(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].area, "A");
        assert_eq!(list[0].problem, "Шум");
    }

    #[test]
    fn test_parse_accepts_russian_keys() {
        let json = r#"[{
            "Участок": "Сборка",
            "Группа оборудования": "HFV2",
            "Узел": "Пресс",
            "Проблема": "Утечка азота",
            "Решение": "Заменил уплотнение"
        }]"#;
        let list = parse_instructions(json).unwrap();
        assert_eq!(list[0].equipment_group, "HFV2");
        assert_eq!(list[0].solution, "Заменил уплотнение");
    }

    #[test]
    fn test_parse_non_array_root_is_empty() {
        assert!(parse_instructions(r#"{"problem": "x"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json_is_error() {
        assert!(parse_instructions("[{").is_err());
    }

    #[test]
    fn test_extract_keywords_drops_stop_words_and_short_words() {
        let keywords = extract_keywords("Что делать, если не работает датчик на HFV2?");
        assert_eq!(keywords, vec!["делать", "если", "работает", "датчик", "hfv2"]);
    }

    #[test]
    fn test_find_relevant_ranks_by_occurrences() {
        let kb = sample();
        let found = kb.find_relevant("утечка азота", 5);
        assert_eq!(found.len(), 2);
        // "утечка" x2 + "азота" x1 beats "утечка" x1
        assert_eq!(found[0].problem, "Утечка азота");
        assert_eq!(found[1].problem, "Утечка пара");
    }

    #[test]
    fn test_find_relevant_respects_limit() {
        let kb = sample();
        assert_eq!(kb.find_relevant("заменил", 1).len(), 1);
    }

    #[test]
    fn test_find_relevant_blank_or_stop_words_only() {
        let kb = sample();
        assert!(kb.find_relevant("   ", 5).is_empty());
        assert!(kb.find_relevant("что и как", 5).is_empty());
    }

    #[test]
    fn test_for_equipment_is_case_insensitive_substring() {
        let kb = sample();
        assert_eq!(kb.for_equipment("hfv2").len(), 2);
        assert_eq!(kb.for_equipment("пресс").len(), 2);
        assert!(kb.for_equipment("XYZ").is_empty());
    }

    #[test]
    fn test_problem_statistics() {
        let stats = sample().problem_statistics();
        assert_eq!(stats.get(&ProblemCategory::Leaks), Some(&2));
        assert_eq!(stats.get(&ProblemCategory::Malfunctions), Some(&1));
        assert_eq!(stats.get(&ProblemCategory::PartReplacement), Some(&1));
        assert_eq!(stats.get(&ProblemCategory::Other), None);
    }
}
