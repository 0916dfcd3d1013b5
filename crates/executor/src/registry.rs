//! Tool schema registry
//!
//! The catalog of operations the model is allowed to request. Names come
//! from `op::names`, the same constants `Operation::parse` matches on.

use pamm_provider::Tool;
use serde_json::json;

use crate::op::names;

/// All six operation schemas, in a stable order.
pub fn schemas() -> Vec<Tool> {
    vec![
        Tool::new(
            names::INSTALL,
            "Install a package using pip",
            json!({
                "type": "object",
                "properties": {
                    "package_name": {
                        "type": "string",
                        "description": "The name of the package to install"
                    },
                    "version": {
                        "type": "string",
                        "description": "The version of the package to install (optional)"
                    }
                },
                "required": ["package_name"]
            }),
        ),
        Tool::new(
            names::LIST,
            "List all installed packages",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        Tool::new(
            names::UPDATE,
            "Update a package or all packages",
            json!({
                "type": "object",
                "properties": {
                    "package_name": {
                        "type": "string",
                        "description": "The name of the package to update (optional, if not provided, update all packages)"
                    }
                }
            }),
        ),
        Tool::new(
            names::REMOVE,
            "Remove a package using pip",
            json!({
                "type": "object",
                "properties": {
                    "package_name": {
                        "type": "string",
                        "description": "The name of the package to remove"
                    }
                },
                "required": ["package_name"]
            }),
        ),
        Tool::new(
            names::VERSION,
            "Get the version of an installed package",
            json!({
                "type": "object",
                "properties": {
                    "package_name": {
                        "type": "string",
                        "description": "The name of the package to check"
                    }
                },
                "required": ["package_name"]
            }),
        ),
        Tool::new(
            names::EXPLAIN,
            "Get information about a package using pip show",
            json!({
                "type": "object",
                "properties": {
                    "package_name": {
                        "type": "string",
                        "description": "The name of the package to explain"
                    }
                },
                "required": ["package_name"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;
    use serde_json::json;

    #[test]
    fn publishes_all_six_operations() {
        let schemas = schemas();
        assert_eq!(schemas.len(), names::ALL.len());

        let published: Vec<&str> = schemas.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(published, names::ALL.to_vec());
    }

    #[test]
    fn every_schema_name_parses() {
        // The binding contract: anything the registry advertises, the
        // parser accepts.
        for tool in schemas() {
            let op = Operation::parse(&tool.function.name, &json!({"package_name": "x"}));
            assert!(op.is_ok(), "schema {} does not parse", tool.function.name);
        }
    }

    #[test]
    fn required_fields_match_arg_structs() {
        let schemas = schemas();

        let required_of = |name: &str| -> Vec<String> {
            schemas
                .iter()
                .find(|t| t.function.name == name)
                .and_then(|t| t.function.parameters["required"].as_array().cloned())
                .unwrap_or_default()
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        };

        assert_eq!(required_of(names::INSTALL), vec!["package_name"]);
        assert!(required_of(names::LIST).is_empty());
        assert!(required_of(names::UPDATE).is_empty());
        assert_eq!(required_of(names::REMOVE), vec!["package_name"]);
        assert_eq!(required_of(names::VERSION), vec!["package_name"]);
        assert_eq!(required_of(names::EXPLAIN), vec!["package_name"]);
    }

    #[test]
    fn schemas_serialize_as_function_tools() {
        let value = serde_json::to_value(schemas()).unwrap();
        assert_eq!(value[0]["type"], "function");
        assert_eq!(value[0]["function"]["name"], names::INSTALL);
        assert!(value[0]["function"]["description"]
            .as_str()
            .unwrap()
            .contains("pip"));
    }
}
