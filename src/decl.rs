//! Declarative route input.
//!
//! An external scanner collaborator discovers routable actions and emits
//! plain `(method, path, action)` records; this module defines that
//! record shape. A file of records (YAML or JSON, selected by extension)
//! is the uniform transport for a scanned contribution, so a declarative
//! table and a programmatically built [`RouteSet`](crate::route::RouteSet)
//! carry exactly the same information.

use http::Method;
use serde::{Deserialize, Serialize};

/// One route declaration: *declare method M, on template T, dispatching
/// to action A*.
///
/// The action identifier is opaque; the registry never invokes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecl {
    /// HTTP method, serialized as its token form (`GET`, `POST`, ...)
    #[serde(with = "method_str")]
    pub method: Method,
    /// URI template, e.g. `/users/{id}/posts`
    pub path: String,
    /// Opaque identifier of the behavior to invoke
    pub action: String,
}

impl RouteDecl {
    pub fn new(method: Method, path: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            action: action.into(),
        }
    }
}

/// Load route declarations from a YAML or JSON file.
///
/// The format is chosen by extension, `.yaml`/`.yml` vs anything else.
///
/// # Errors
///
/// I/O failures and syntactically invalid files. Structural validation
/// of the templates themselves happens later, at bind time.
pub fn load_decls(file_path: &str) -> anyhow::Result<Vec<RouteDecl>> {
    let content = std::fs::read_to_string(file_path)?;
    let decls = if file_path.ends_with(".yaml") || file_path.ends_with(".yml") {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(decls)
}

mod method_str {
    use http::Method;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.to_ascii_uppercase()
            .parse::<Method>()
            .map_err(de::Error::custom)
    }
}
