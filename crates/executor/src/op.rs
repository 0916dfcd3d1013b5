//! Typed operations
//!
//! The model speaks in function names and JSON arguments; everything past
//! this boundary is an `Operation` variant with validated payload. The name
//! constants here are the same ones the schema registry publishes, so the
//! two cannot drift apart.

use serde::Deserialize;
use serde_json::Value;

use crate::{ExecutorError, Result};

/// Function names shared between the schema registry and the parser
pub mod names {
    pub const INSTALL: &str = "install_package";
    pub const LIST: &str = "list_packages";
    pub const UPDATE: &str = "update_package";
    pub const REMOVE: &str = "remove_package";
    pub const VERSION: &str = "get_package_version";
    pub const EXPLAIN: &str = "explain_package";

    pub const ALL: &[&str] = &[INSTALL, LIST, UPDATE, REMOVE, VERSION, EXPLAIN];
}

#[derive(Deserialize)]
struct InstallArgs {
    package_name: String,
    version: Option<String>,
}

#[derive(Deserialize)]
struct UpdateArgs {
    package_name: Option<String>,
}

#[derive(Deserialize)]
struct PackageArgs {
    package_name: String,
}

/// One package-manager operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Install {
        package_name: String,
        version: Option<String>,
    },
    List,
    Update {
        package_name: Option<String>,
    },
    Remove {
        package_name: String,
    },
    Version {
        package_name: String,
    },
    Explain {
        package_name: String,
    },
}

impl Operation {
    /// Validate a model-issued call into a typed operation. Unknown names
    /// and malformed arguments are recoverable errors, not panics.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self> {
        let invalid = |source| ExecutorError::InvalidArguments {
            name: name.to_string(),
            source,
        };

        match name {
            names::INSTALL => {
                let args: InstallArgs =
                    serde_json::from_value(arguments.clone()).map_err(invalid)?;
                Ok(Operation::Install {
                    package_name: args.package_name,
                    version: args.version,
                })
            }
            names::LIST => Ok(Operation::List),
            names::UPDATE => {
                let args: UpdateArgs =
                    serde_json::from_value(arguments.clone()).map_err(invalid)?;
                Ok(Operation::Update {
                    package_name: args.package_name,
                })
            }
            names::REMOVE => {
                let args: PackageArgs =
                    serde_json::from_value(arguments.clone()).map_err(invalid)?;
                Ok(Operation::Remove {
                    package_name: args.package_name,
                })
            }
            names::VERSION => {
                let args: PackageArgs =
                    serde_json::from_value(arguments.clone()).map_err(invalid)?;
                Ok(Operation::Version {
                    package_name: args.package_name,
                })
            }
            names::EXPLAIN => {
                let args: PackageArgs =
                    serde_json::from_value(arguments.clone()).map_err(invalid)?;
                Ok(Operation::Explain {
                    package_name: args.package_name,
                })
            }
            other => Err(ExecutorError::UnknownOperation(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Install { .. } => names::INSTALL,
            Operation::List => names::LIST,
            Operation::Update { .. } => names::UPDATE,
            Operation::Remove { .. } => names::REMOVE,
            Operation::Version { .. } => names::VERSION,
            Operation::Explain { .. } => names::EXPLAIN,
        }
    }
}

/// Build the pip requirement specifier: `name` or `name==version`. Always
/// passed to pip as one argv element, never through a shell.
pub fn package_spec(package_name: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!("{}=={}", package_name, v),
        None => package_name.to_string(),
    }
}
