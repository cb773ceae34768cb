//! # Operation Catalog
//!
//! A command-line utility for inspecting the operations the dispatcher accepts.
//!
//! ## Usage
//!
//! ### List Every Operation
//!
//! ```bash
//! cargo run --bin operation-catalog
//! ```
//!
//! ### Show One Operation's Parameters
//!
//! ```bash
//! cargo run --bin operation-catalog RESET_PASSWORD
//! ```
//!
//! ### Print the Agent Tool Descriptor
//!
//! ```bash
//! cargo run --bin operation-catalog -- --json
//! ```
//!
//! The tool name honours `KC_MCP_TOOL_NAME`.
//!
//! ## Output Example
//!
//! ```text
//! RESET_PASSWORD (user)
//!   realm        string   required
//!   userId       string   required
//!   newPassword  string   required
//!   temporary    boolean  optional, default false
//! ```

use keycloak_operations::operation_handler::{CatalogEntry, Domain, FieldSpec, OperationCatalog};
use keycloak_operations::{DispatcherConfig, Operation, tool_definition};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let catalog = match OperationCatalog::standard() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ Operation catalog is inconsistent: {}", e);
            process::exit(1);
        }
    };

    match args.get(1).map(String::as_str) {
        None => list_operations(&catalog),
        Some("--json") => print_tool(&catalog),
        Some("-h") | Some("--help") => print_usage(&args[0]),
        Some(name) => match Operation::from_name(name).and_then(|op| catalog.get(op)) {
            Some(entry) => print_entry(entry),
            None => {
                eprintln!("❌ unknown operation: {}", name);
                print_usage(&args[0]);
                process::exit(1);
            }
        },
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPERATION | --json]", program);
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {}                 list every operation", program);
    eprintln!("  {} CREATE_USER     show the parameters of one operation", program);
    eprintln!("  {} --json          print the agent tool descriptor", program);
}

fn list_operations(catalog: &OperationCatalog) {
    println!("{} operations", catalog.len());

    let mut current: Option<Domain> = None;
    for entry in catalog.entries() {
        let domain = entry.operation.domain();
        if current != Some(domain) {
            println!();
            println!("{}:", domain);
            current = Some(domain);
        }
        let required: Vec<&str> = entry.required_fields().map(|f| f.name).collect();
        println!("  {:<32} {}", entry.operation.name(), required.join(", "));
    }
}

fn print_entry(entry: &CatalogEntry) {
    println!("{} ({})", entry.operation.name(), entry.operation.domain());
    if entry.fields.is_empty() {
        println!("  no parameters");
    }
    for field in entry.fields {
        println!("  {}", describe_field(field));
    }
}

fn describe_field(field: &FieldSpec) -> String {
    let presence = match (field.required, field.default) {
        (true, _) => "required".to_string(),
        (false, Some(default)) => format!("optional, default {}", default.to_value()),
        (false, None) => "optional".to_string(),
    };
    format!(
        "{:<24} {:<8} {}",
        field.name,
        field.kind.json_type(),
        presence
    )
}

fn print_tool(catalog: &OperationCatalog) {
    let tool = tool_definition(catalog, &DispatcherConfig::from_env());
    match serde_json::to_string_pretty(&tool) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("❌ Failed to render tool descriptor: {}", e);
            process::exit(1);
        }
    }
}
