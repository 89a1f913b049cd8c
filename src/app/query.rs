// repairlog - app/query.rs
//
// Loads a written instruction document from disk for the read-only
// search/equipment/stats commands.

use crate::core::knowledge::{parse_instructions, KnowledgeBase};
use crate::util::error::{KnowledgeError, Result};
use std::path::Path;

/// Load an instruction document into a knowledge base.
pub fn load_knowledge(path: &Path) -> Result<KnowledgeBase> {
    if !path.exists() {
        return Err(KnowledgeError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let instructions = parse_instructions(&content).map_err(|e| KnowledgeError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        instructions = instructions.len(),
        "Loaded repair instructions"
    );

    Ok(KnowledgeBase::new(instructions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::RepairLogError;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_knowledge(&dir.path().join("none.json"));
        assert!(matches!(
            result,
            Err(RepairLogError::Knowledge(KnowledgeError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_knowledge(&path),
            Err(RepairLogError::Knowledge(KnowledgeError::Json { .. }))
        ));
    }

    #[test]
    fn test_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"[{"area":"A","equipment_group":"M","component":"N","problem":"Шум","solution":"Смазал"}]"#,
        )
        .unwrap();
        let kb = load_knowledge(&path).unwrap();
        assert_eq!(kb.len(), 1);
    }
}
