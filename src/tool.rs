//! Tool descriptor for AI agents.
//!
//! The dispatcher is exposed to agents as one tool taking an `operation` name
//! and a `params` object. The descriptor is generated from the catalog, so the
//! advertised operations and fields always match what the dispatcher accepts.

use crate::config::DispatcherConfig;
use crate::operation_handler::{CatalogEntry, FieldSpec, OperationCatalog};
use serde_json::{Map, Value, json};

/// Descriptor of the unified operation tool.
pub fn tool_definition(catalog: &OperationCatalog, config: &DispatcherConfig) -> Value {
    let names: Vec<&str> = catalog.operations().map(|op| op.name()).collect();

    json!({
        "name": config.tool_name,
        "description": format!(
            "Execute a Keycloak administrative operation through {} {}. \
             Select the operation by name and pass its parameters as an object; \
             see operationSchemas for the fields each operation accepts.",
            config.server_name, config.server_version
        ),
        "inputSchema": {
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": names,
                    "description": "Operation to execute"
                },
                "params": {
                    "type": "object",
                    "description": "Operation parameters"
                }
            },
            "required": ["operation"]
        },
        "operationSchemas": operation_schemas(catalog)
    })
}

/// Parameter schemas of every catalog entry, keyed by operation name.
pub fn operation_schemas(catalog: &OperationCatalog) -> Value {
    let schemas: Map<String, Value> = catalog
        .entries()
        .map(|entry| (entry.operation.name().to_string(), operation_schema(entry)))
        .collect();
    Value::Object(schemas)
}

/// JSON Schema for one operation's parameter bag.
pub fn operation_schema(entry: &CatalogEntry) -> Value {
    let properties: Map<String, Value> = entry
        .fields
        .iter()
        .map(|field| (field.name.to_string(), field_schema(field)))
        .collect();
    let required: Vec<&str> = entry.required_fields().map(|f| f.name).collect();

    json!({
        "type": "object",
        "domain": entry.operation.domain().as_str(),
        "properties": properties,
        "required": required
    })
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!(field.kind.json_type()));
    if let Some(default) = field.default {
        schema.insert("default".to_string(), default.to_value());
    }
    if let Some(description) = field.description {
        schema.insert("description".to_string(), json!(description));
    }
    if field.is_secret() {
        schema.insert("writeOnly".to_string(), Value::Bool(true));
    }
    Value::Object(schema)
}
