//! Task identifier extraction from createTask responses
//!
//! The generation provider has returned the identifier under several field paths over
//! time. They are tried in a fixed priority order and the first hit wins.

use serde_json::Value;

/// A field path into a JSON response, outermost key first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIdPath(pub &'static [&'static str]);

/// Extraction order: `data.taskId`, `taskId`, `data.id`, `id`
pub const TASK_ID_PATHS: &[TaskIdPath] = &[
    TaskIdPath(&["data", "taskId"]),
    TaskIdPath(&["taskId"]),
    TaskIdPath(&["data", "id"]),
    TaskIdPath(&["id"]),
];

impl TaskIdPath {
    /// Resolve this path, accepting non-empty strings and numbers
    pub fn resolve(&self, response: &Value) -> Option<String> {
        let leaf = self
            .0
            .iter()
            .try_fold(response, |node, key| node.get(*key))?;

        match leaf {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

pub fn extract_task_id(response: &Value) -> Option<String> {
    TASK_ID_PATHS.iter().find_map(|path| path.resolve(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_each_known_shape() {
        assert_eq!(
            extract_task_id(&json!({"code": 200, "data": {"taskId": "a1"}})),
            Some("a1".to_string())
        );
        assert_eq!(extract_task_id(&json!({"taskId": "b2"})), Some("b2".to_string()));
        assert_eq!(extract_task_id(&json!({"data": {"id": "c3"}})), Some("c3".to_string()));
        assert_eq!(extract_task_id(&json!({"id": "d4"})), Some("d4".to_string()));
    }

    #[test]
    fn test_priority_order() {
        let resp = json!({
            "id": "outer-id",
            "taskId": "outer-task",
            "data": {"id": "inner-id", "taskId": "inner-task"}
        });
        assert_eq!(extract_task_id(&resp), Some("inner-task".to_string()));

        let resp = json!({"id": "outer-id", "data": {"id": "inner-id"}});
        assert_eq!(extract_task_id(&resp), Some("inner-id".to_string()));
    }

    #[test]
    fn test_empty_and_missing_values_fall_through() {
        let resp = json!({"data": {"taskId": ""}, "id": 17});
        assert_eq!(extract_task_id(&resp), Some("17".to_string()));

        assert_eq!(extract_task_id(&json!({"code": 500, "msg": "boom", "data": null})), None);
        assert_eq!(extract_task_id(&json!("just a string")), None);
    }

    #[test]
    fn test_dotted_paths() {
        let names: Vec<String> = TASK_ID_PATHS.iter().map(TaskIdPath::dotted).collect();
        assert_eq!(names, vec!["data.taskId", "taskId", "data.id", "id"]);
    }
}
