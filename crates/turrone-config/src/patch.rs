//! Replace-merge of validated PATCH operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pointer;

/// The merge operations a PATCH document may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Replace the value at `path` with `value`.
    Replace,
}

/// One structurally validated PATCH operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Merge operation to apply.
    pub op: PatchOp,
    /// JSON Pointer to the target field.
    pub path: String,
    /// Replacement value, a JSON string or number.
    pub value: Value,
}

/// Apply operations to a copy of `base`, in document order.
///
/// Later operations addressing the same pointer overwrite earlier ones.
/// Fields of `base` not named by any operation are left untouched.
#[must_use]
pub fn apply_patch(base: &Value, operations: &[PatchOperation]) -> Value {
    let mut merged = base.clone();
    for operation in operations {
        match operation.op {
            PatchOp::Replace => {
                pointer::set(&mut merged, &operation.path, operation.value.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn replace(path: &str, value: Value) -> PatchOperation {
        PatchOperation {
            op: PatchOp::Replace,
            path: path.to_string(),
            value,
        }
    }

    #[test]
    fn untouched_fields_survive_the_merge() {
        let base = json!({
            "dbConfig": {
                "host": "localhost",
                "port": 27017,
                "database": "turrone",
                "password": "My5up3rS3cur3P@ssw0rd!",
            }
        });

        let merged = apply_patch(&base, &[replace("/dbConfig/host", json!("127.0.0.1"))]);

        assert_eq!(merged["dbConfig"]["host"], json!("127.0.0.1"));
        assert_eq!(merged["dbConfig"]["port"], json!(27017));
        assert_eq!(
            merged["dbConfig"]["password"],
            json!("My5up3rS3cur3P@ssw0rd!")
        );
    }

    #[test]
    fn later_operations_on_the_same_path_win() {
        let base = json!({"dbConfig": {"host": "localhost"}});
        let merged = apply_patch(
            &base,
            &[
                replace("/dbConfig/host", json!("first.example")),
                replace("/dbConfig/host", json!("second.example")),
            ],
        );
        assert_eq!(merged["dbConfig"]["host"], json!("second.example"));
    }

    #[test]
    fn base_document_is_not_mutated() {
        let base = json!({"dbConfig": {"port": 27017}});
        let merged = apply_patch(&base, &[replace("/dbConfig/port", json!(54321))]);
        assert_eq!(base["dbConfig"]["port"], json!(27017));
        assert_eq!(merged["dbConfig"]["port"], json!(54321));
    }

    #[test]
    fn op_serde_uses_lowercase_names() {
        let op: PatchOp = serde_json::from_str("\"replace\"").expect("deserializes");
        assert_eq!(op, PatchOp::Replace);
        assert_eq!(
            serde_json::to_string(&PatchOp::Replace).expect("serializes"),
            "\"replace\""
        );
    }
}
