// repairlog - core/group.rs
//
// Nested grouping of extracted problem/solution pairs by equipment hierarchy
// (area -> machine -> mechanism node -> problem) with solution deduplication.
// Every level keeps first-seen order (IndexMap/IndexSet) so the output is
// deterministic.

use crate::core::extract::extract_problem_solution;
use crate::core::model::{MaintenanceRecord, RepairInstruction};
use crate::util::{constants, logging};
use indexmap::{IndexMap, IndexSet};

/// Outcome of grouping a set of maintenance records.
#[derive(Debug, Default)]
pub struct GroupingResult {
    /// One entry per distinct (area, machine, node, problem).
    pub instructions: Vec<RepairInstruction>,
    /// Rows examined.
    pub rows_total: usize,
    /// Rows that yielded both a problem and a solution.
    pub rows_extracted: usize,
    /// Rows dropped because either phrase was missing.
    pub rows_skipped: usize,
}

/// problem -> distinct solutions
type NodeRepairs = IndexMap<String, IndexSet<String>>;
/// area -> machine -> node -> repairs
type Hierarchy = IndexMap<String, IndexMap<String, IndexMap<String, NodeRepairs>>>;

/// Build deduplicated repair instructions from raw maintenance records.
///
/// Rows lacking either phrase are skipped. Distinct solutions of one problem
/// are joined with `separator` in the order they first appear.
pub fn build_instructions(records: &[MaintenanceRecord], separator: &str) -> GroupingResult {
    let mut hierarchy = Hierarchy::new();
    let mut rows_extracted = 0usize;

    for (row_idx, record) in records.iter().enumerate() {
        let (problem, solution) = extract_problem_solution(&record.comments);
        if problem.is_empty() || solution.is_empty() {
            if !record.comments.is_empty() {
                tracing::trace!(
                    row = row_idx + 1,
                    comments = %logging::preview(&record.comments, constants::DEBUG_MAX_COMMENT_PREVIEW),
                    "Row skipped: problem or solution missing"
                );
            }
            continue;
        }
        rows_extracted += 1;

        hierarchy
            .entry(record.area.clone())
            .or_default()
            .entry(record.machine_name.clone())
            .or_default()
            .entry(record.mechanism_node.clone())
            .or_default()
            .entry(problem)
            .or_default()
            .insert(solution);
    }

    let mut instructions = Vec::new();
    for (area, machines) in hierarchy {
        for (machine, nodes) in machines {
            for (node, repairs) in nodes {
                for (problem, solutions) in repairs {
                    instructions.push(RepairInstruction {
                        area: area.clone(),
                        equipment_group: machine.clone(),
                        component: node.clone(),
                        problem,
                        solution: solutions
                            .into_iter()
                            .collect::<Vec<_>>()
                            .join(separator),
                    });
                }
            }
        }
    }

    tracing::debug!(
        rows = records.len(),
        extracted = rows_extracted,
        instructions = instructions.len(),
        "Grouping complete"
    );

    GroupingResult {
        instructions,
        rows_total: records.len(),
        rows_extracted,
        rows_skipped: records.len() - rows_extracted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(area: &str, machine: &str, node: &str, comments: &str) -> MaintenanceRecord {
        MaintenanceRecord {
            area: area.to_string(),
            machine_name: machine.to_string(),
            mechanism_node: node.to_string(),
            comments: comments.to_string(),
        }
    }

    fn comment(problem: &str, solution: &str) -> String {
        format!("Что Произошло: {problem}; Что ты сделал: {solution};")
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        let records = vec![
            rec("A", "M", "N", &comment("Утечка", "Заменил прокладку")),
            rec("A", "M", "N", &comment("Утечка", "Заменил прокладку")),
        ];
        let result = build_instructions(&records, "; ");
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(result.instructions[0].solution, "Заменил прокладку");
        assert_eq!(result.rows_extracted, 2);
    }

    #[test]
    fn test_distinct_solutions_join_in_first_seen_order() {
        let records = vec![
            rec("A", "M", "N", &comment("Утечка", "Подтянул")),
            rec("A", "M", "N", &comment("Утечка", "Заменил")),
            rec("A", "M", "N", &comment("Утечка", "Подтянул")),
        ];
        let result = build_instructions(&records, "; ");
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(result.instructions[0].solution, "Подтянул; Заменил");
    }

    #[test]
    fn test_same_problem_on_different_nodes_stays_separate() {
        let records = vec![
            rec("A", "M", "N1", &comment("Шум", "Смазал")),
            rec("A", "M", "N2", &comment("Шум", "Смазал")),
        ];
        let result = build_instructions(&records, "; ");
        assert_eq!(result.instructions.len(), 2);
        assert_eq!(result.instructions[0].component, "N1");
        assert_eq!(result.instructions[1].component, "N2");
    }

    #[test]
    fn test_output_follows_nested_first_seen_order() {
        let records = vec![
            rec("A", "M1", "N", &comment("p1", "s")),
            rec("B", "M2", "N", &comment("p2", "s")),
            rec("A", "M1", "N", &comment("p3", "s")),
            rec("A", "M0", "N", &comment("p4", "s")),
        ];
        let result = build_instructions(&records, "; ");
        let problems: Vec<_> = result
            .instructions
            .iter()
            .map(|i| i.problem.as_str())
            .collect();
        assert_eq!(problems, vec!["p1", "p3", "p4", "p2"]);
    }

    #[test]
    fn test_rows_without_both_phrases_are_skipped() {
        let records = vec![
            rec("A", "M", "N", "Что Произошло: Шум"),
            rec("A", "M", "N", "Что ты сделал: Смазал"),
            rec("A", "M", "N", ""),
            rec("A", "M", "N", &comment("Шум", "Смазал")),
        ];
        let result = build_instructions(&records, "; ");
        assert_eq!(result.rows_total, 4);
        assert_eq!(result.rows_extracted, 1);
        assert_eq!(result.rows_skipped, 3);
        assert_eq!(result.instructions.len(), 1);
    }

    #[test]
    fn test_custom_separator() {
        let records = vec![
            rec("A", "M", "N", &comment("Шум", "a")),
            rec("A", "M", "N", &comment("Шум", "b")),
        ];
        let result = build_instructions(&records, " | ");
        assert_eq!(result.instructions[0].solution, "a | b");
    }

    #[test]
    fn test_fields_are_mapped_to_output_names() {
        let records = vec![rec("Сборка", "HFV2", "Пресс", &comment("Шум", "Смазал"))];
        let inst = &build_instructions(&records, "; ").instructions[0];
        assert_eq!(inst.area, "Сборка");
        assert_eq!(inst.equipment_group, "HFV2");
        assert_eq!(inst.component, "Пресс");
    }

    #[test]
    fn test_empty_input() {
        let result = build_instructions(&[], "; ");
        assert!(result.instructions.is_empty());
        assert_eq!(result.rows_total, 0);
    }

    #[test]
    fn test_many_distinct_problems_and_solutions() {
        let mut records: Vec<_> = (0..20_000)
            .map(|i| rec("A", "M", "N", &comment(&format!("p{i}"), "s")))
            .collect();
        records.extend((0..20_000).map(|i| rec("A", "M", "N", &comment("p0", &format!("s{i}")))));

        let result = build_instructions(&records, ",");
        assert_eq!(result.instructions.len(), 20_000);
        assert_eq!(result.instructions[0].problem, "p0");
        // "s" from the first block plus s0..s19999
        assert_eq!(result.instructions[0].solution.split(',').count(), 20_001);
        assert_eq!(result.instructions[19_999].problem, "p19999");
    }
}
