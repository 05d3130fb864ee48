//! Project configuration derived from the two schema documents.
//!
//! The entity/relationship document decides which artifacts are conditionally
//! required (authentication context, sidebar) and which per-entity artifacts
//! must exist (type definitions, services, list and form components). The API document supplies the
//! backend URL and the endpoint paths that generated service files must call.
//!
//! Both documents are read once, before any rule runs; a missing or
//! unparsable document is fatal. The resulting [`ProjectConfig`] is passed by
//! reference into every rule, so no rule reads the documents itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, ValidatorError};

/// Entity count above which the layout must include a sidebar.
pub const SIDEBAR_ENTITY_THRESHOLD: usize = 3;

/// Everything the rules need to know about the project being validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// `business_logic.authentication.enabled` from the ERD.
    pub auth_enabled: bool,
    /// Entity names in document order.
    pub entities: Vec<String>,
    /// Declared operations per entity (`list`, `read`, `create`, `update`,
    /// `delete`), lowercased. Entities without operations are absent.
    pub operations: BTreeMap<String, Vec<String>>,
    /// Backend shape from the API document.
    pub api: ApiShape,
}

/// The parts of the API document the wiring rules compare against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiShape {
    /// Backend base URL without a trailing slash, if the document declares one.
    pub backend_url: Option<String>,
    /// Declared endpoint paths, e.g. `/users/{id}`.
    pub paths: BTreeSet<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErdDocument {
    #[serde(default)]
    entities: Vec<ErdEntity>,
    #[serde(default)]
    business_logic: BusinessLogic,
}

#[derive(Debug, Deserialize)]
struct ErdEntity {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BusinessLogic {
    #[serde(default)]
    authentication: Authentication,
}

#[derive(Debug, Default, Deserialize)]
struct Authentication {
    #[serde(default)]
    enabled: bool,
}

impl ProjectConfig {
    /// Load both schema documents and derive the configuration.
    pub fn load(erd_path: &Path, openapi_path: &Path) -> Result<Self> {
        let erd = load_erd(erd_path)?;
        let api = load_api_document(openapi_path)?;
        let config = Self::from_documents(erd, &api);
        tracing::info!(
            auth = config.auth_enabled,
            entities = config.entities.len(),
            api_paths = config.api.paths.len(),
            "project configuration loaded"
        );
        Ok(config)
    }

    fn from_documents(erd: ErdDocument, api: &Value) -> Self {
        let mut entities = Vec::new();
        let mut operations = BTreeMap::new();
        for entity in erd.entities {
            let Some(name) = entity.name else { continue };
            if !entity.operations.is_empty() {
                let ops = entity.operations.iter().map(|op| op.to_ascii_lowercase()).collect();
                operations.insert(name.clone(), ops);
            }
            entities.push(name);
        }
        Self {
            auth_enabled: erd.business_logic.authentication.enabled,
            entities,
            operations,
            api: ApiShape::from_document(api),
        }
    }

    /// Build a configuration from already-parsed JSON values.
    ///
    /// Used by tests and by callers that obtained the documents elsewhere.
    pub fn from_values(erd: &Value, api: &Value) -> Result<Self> {
        let erd: ErdDocument =
            serde_json::from_value(erd.clone()).map_err(|e| ValidatorError::SchemaParse {
                kind: "ERD",
                path: PathBuf::from("<memory>"),
                reason: e.to_string(),
            })?;
        Ok(Self::from_documents(erd, api))
    }

    /// Whether the layout is required to carry a sidebar.
    pub fn needs_sidebar(&self) -> bool {
        self.entities.len() > SIDEBAR_ENTITY_THRESHOLD
    }

    /// Operations declared for `entity`; empty when it declares none.
    pub fn operations_of(&self, entity: &str) -> &[String] {
        self.operations.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_operation(&self, entity: &str, operation: &str) -> bool {
        self.operations_of(entity).iter().any(|op| op == operation)
    }
}

impl ApiShape {
    /// Extract the backend URL and endpoint paths from an API document.
    ///
    /// Accepts OpenAPI 3 (`servers`, `paths`), Swagger 2 (`host`, `basePath`,
    /// `schemes`) and the pipeline's simplified shapes (`url`, `endpoints`,
    /// `routes`).
    pub fn from_document(doc: &Value) -> Self {
        Self {
            backend_url: backend_url(doc),
            paths: endpoint_paths(doc),
        }
    }
}

fn backend_url(doc: &Value) -> Option<String> {
    let servers_url = doc
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str);
    let root_url = doc.get("url").and_then(Value::as_str);

    if let Some(url) = servers_url.or(root_url).map(trim_url).filter(|u| !u.is_empty()) {
        return Some(url);
    }

    let host = doc.get("host").and_then(Value::as_str).filter(|h| !h.is_empty())?;
    let scheme = doc
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
        .and_then(Value::as_str)
        .unwrap_or("http");
    let base_path = doc.get("basePath").and_then(Value::as_str).unwrap_or("");
    Some(trim_url(&format!("{scheme}://{host}{base_path}")))
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn endpoint_paths(doc: &Value) -> BTreeSet<String> {
    if let Some(paths) = doc.get("paths").and_then(Value::as_object) {
        return paths.keys().cloned().collect();
    }
    match doc.get("endpoints") {
        Some(Value::Array(items)) => {
            return items
                .iter()
                .filter_map(|item| item.get("path").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
        }
        Some(Value::Object(map)) => return map.keys().cloned().collect(),
        _ => {}
    }
    doc.get("routes")
        .and_then(Value::as_object)
        .map(|routes| routes.keys().cloned().collect())
        .unwrap_or_default()
}

fn load_erd(path: &Path) -> Result<ErdDocument> {
    if !path.is_file() {
        return Err(ValidatorError::SchemaMissing {
            kind: "ERD",
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(ValidatorError::SchemaParse {
            kind: "ERD",
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }
    serde_json::from_str(&text).map_err(|e| ValidatorError::SchemaParse {
        kind: "ERD",
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load the API document as JSON, falling back to YAML.
///
/// A `.json` path that is missing or not JSON falls back to its `.yaml`
/// sibling; any remaining content is tried as YAML. The document must be a
/// mapping.
pub fn load_api_document(path: &Path) -> Result<Value> {
    let is_yaml_path = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let yaml_sibling = path.with_extension("yaml");

    if !path.is_file() {
        if !is_yaml_path && yaml_sibling.is_file() {
            return parse_yaml(&yaml_sibling, &fs::read_to_string(&yaml_sibling)?);
        }
        return Err(ValidatorError::SchemaMissing {
            kind: "OpenAPI",
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path)?;
    if is_yaml_path {
        return parse_yaml(path, &text);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(ValidatorError::SchemaParse {
            kind: "OpenAPI",
            path: path.to_path_buf(),
            reason: "document root is not an object".to_string(),
        }),
        Err(json_err) => {
            if yaml_sibling.is_file() && yaml_sibling != path {
                tracing::debug!(path = %yaml_sibling.display(), "OpenAPI JSON invalid, using YAML sibling");
                return parse_yaml(&yaml_sibling, &fs::read_to_string(&yaml_sibling)?);
            }
            parse_yaml(path, &text).map_err(|_| ValidatorError::SchemaParse {
                kind: "OpenAPI",
                path: path.to_path_buf(),
                reason: json_err.to_string(),
            })
        }
    }
}

fn parse_yaml(path: &Path, text: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| ValidatorError::SchemaParse {
        kind: "OpenAPI",
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(ValidatorError::SchemaParse {
            kind: "OpenAPI",
            path: path.to_path_buf(),
            reason: "document root is not a mapping".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_and_entities_from_erd() {
        let erd = json!({
            "entities": [{"name": "User"}, {"name": "Order"}],
            "business_logic": {"authentication": {"enabled": true}}
        });
        let config = ProjectConfig::from_values(&erd, &json!({})).expect("valid erd");
        assert!(config.auth_enabled);
        assert_eq!(config.entities, vec!["User", "Order"]);
        assert!(!config.needs_sidebar());
    }

    #[test]
    fn operations_are_lowercased_per_entity() {
        let erd = json!({"entities": [
            {"name": "User", "operations": ["List", "read", "CREATE"]},
            {"name": "Tag"}
        ]});
        let config = ProjectConfig::from_values(&erd, &json!({})).expect("valid erd");
        assert_eq!(config.operations_of("User"), ["list", "read", "create"]);
        assert!(config.has_operation("User", "create"));
        assert!(!config.has_operation("User", "delete"));
        assert!(config.operations_of("Tag").is_empty());
        assert_eq!(config.entities, vec!["User", "Tag"]);
    }

    #[test]
    fn auth_defaults_to_disabled() {
        let config = ProjectConfig::from_values(&json!({}), &json!({})).expect("valid erd");
        assert!(!config.auth_enabled);
        assert!(config.entities.is_empty());
    }

    #[test]
    fn sidebar_needed_above_threshold() {
        let erd = json!({"entities": [
            {"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}
        ]});
        let config = ProjectConfig::from_values(&erd, &json!({})).expect("valid erd");
        assert!(config.needs_sidebar());
    }

    #[test]
    fn backend_url_prefers_servers() {
        let api = ApiShape::from_document(&json!({
            "servers": [{"url": "http://localhost:8000/"}],
            "url": "http://ignored"
        }));
        assert_eq!(api.backend_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn backend_url_from_swagger_host() {
        let api = ApiShape::from_document(&json!({
            "host": "api.example.com",
            "schemes": ["https"],
            "basePath": "/v1"
        }));
        assert_eq!(api.backend_url.as_deref(), Some("https://api.example.com/v1"));
    }

    #[test]
    fn paths_from_each_shape() {
        let openapi = ApiShape::from_document(&json!({"paths": {"/users": {}, "/users/{id}": {}}}));
        assert_eq!(openapi.paths.len(), 2);

        let listed = ApiShape::from_document(&json!({"endpoints": [{"path": "/orders"}]}));
        assert!(listed.paths.contains("/orders"));

        let routes = ApiShape::from_document(&json!({"routes": {"/items": {}}}));
        assert!(routes.paths.contains("/items"));
    }

    #[test]
    fn missing_erd_is_fatal() {
        let err = load_erd(Path::new("/definitely/not/here/erd.json")).unwrap_err();
        assert!(matches!(err, ValidatorError::SchemaMissing { kind: "ERD", .. }));
    }

    #[test]
    fn api_document_falls_back_to_yaml_sibling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let yaml = dir.path().join("openapi.yaml");
        fs::write(&yaml, "servers:\n  - url: http://localhost:3000\npaths:\n  /users: {}\n")
            .expect("write yaml");

        let doc = load_api_document(&dir.path().join("openapi.json")).expect("yaml fallback");
        let api = ApiShape::from_document(&doc);
        assert_eq!(api.backend_url.as_deref(), Some("http://localhost:3000"));
        assert!(api.paths.contains("/users"));
    }

    #[test]
    fn garbage_api_document_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("openapi.json");
        fs::write(&path, "{ not json").expect("write");
        let err = load_api_document(&path).unwrap_err();
        assert!(matches!(err, ValidatorError::SchemaParse { kind: "OpenAPI", .. }));
    }
}
