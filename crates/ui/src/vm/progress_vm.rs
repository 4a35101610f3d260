use lesson_core::model::{ModuleId, ModulesIndex, ProgressState};

pub const IMPORT_SUCCEEDED_MESSAGE: &str = "Progress imported successfully.";
pub const IMPORT_FAILED_MESSAGE: &str = "Import failed. The file did not contain valid JSON.";
pub const IMPORT_EMPTY_MESSAGE: &str = "Please select a file to import.";
pub const CLEAR_CONFIRM_PROMPT: &str = "This will erase local progress on this device. Proceed?";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressRowVm {
    pub module_id: ModuleId,
    pub title: String,
    pub visited: usize,
    pub total: u32,
}

impl ProgressRowVm {
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} of {} lessons visited.", self.visited, self.total)
    }
}

/// One row per indexed module, counted against its declared lesson count.
#[must_use]
pub fn map_progress_rows(index: &ModulesIndex, state: &ProgressState) -> Vec<ProgressRowVm> {
    index
        .modules()
        .iter()
        .map(|module| ProgressRowVm {
            module_id: module.id.clone(),
            title: module.title.clone(),
            visited: state.visited_count(&module.id),
            total: module.declared_lessons(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::ModulesDocument;

    #[test]
    fn rows_follow_index_order_and_declared_totals() {
        let doc: ModulesDocument = serde_json::from_str(
            r#"{"modules":[
                {"id":"m1","title":"Counting","lesson_count":3},
                {"id":"m2","title":"Shapes"}
            ]}"#,
        )
        .unwrap();
        let index = ModulesIndex::from_document(doc).0;
        let state = ProgressState::from_json(
            r#"{"visited":{"m1":{"l1":true,"l2":true},"gone":{"l1":true}}}"#,
        )
        .unwrap();

        let rows = map_progress_rows(&index, &state);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].summary(), "2 of 3 lessons visited.");
        assert_eq!(rows[1].summary(), "0 of 0 lessons visited.");
    }
}
