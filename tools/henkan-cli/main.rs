use clap::Parser;
use henkan::prelude::*;
use std::fs;
use std::time::Instant;

/// Inspect and convert flow-storage documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the storage document JSON file (flat record array)
    flows_path: String,

    /// Scope (flow container or template id) to materialize; omit to list
    /// the scopes the document contains
    scope: Option<String>,

    /// Print the materialized visual graph as JSON instead of a summary
    #[arg(short, long)]
    json: bool,

    /// Run a storage -> visual -> storage round trip and report the result
    #[arg(short, long)]
    roundtrip: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.flows_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flows file '{}': {}",
            &cli.flows_path, e
        ))
    });
    let document = StorageDocument::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flows file: {}", e)));

    match cli.scope {
        None => list_scopes(&document),
        Some(scope) => convert_scope(&document, &scope, cli.json, cli.roundtrip),
    }
}

/// Lists every flow container and template the document declares.
fn list_scopes(document: &StorageDocument) {
    let mut containers = 0usize;
    let mut templates = 0usize;
    println!("Scopes in document ({} records):", document.records().len());
    for record in document.records() {
        let label = match classify(record) {
            RecordRole::Container => {
                containers += 1;
                "flow"
            }
            RecordRole::Template => {
                templates += 1;
                "template"
            }
            _ => continue,
        };
        println!(
            "  {:<9} {}  {}",
            label,
            record.id().unwrap_or("<no id>"),
            record.name().unwrap_or("")
        );
    }
    if containers + templates == 0 {
        println!("  (none)");
    }
}

fn convert_scope(document: &StorageDocument, scope: &str, as_json: bool, roundtrip: bool) {
    let start = Instant::now();
    let graph = to_visual(document.records(), scope);
    let convert_duration = start.elapsed();

    if as_json {
        let rendered = serde_json::to_string_pretty(&graph)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
        println!("{}", rendered);
    } else {
        println!("Scope '{}':", scope);
        println!("  Nodes:  {}", graph.nodes.len());
        println!("  Edges:  {}", graph.edges.len());
        println!("  Groups: {}", graph.groups.len());
        println!("  Materialized in {:?}", convert_duration);
    }

    if roundtrip {
        let start = Instant::now();
        let records = to_storage(&graph, scope, document.records());
        let save_duration = start.elapsed();

        let again = to_visual(&records, scope);
        println!("\n--- Round Trip ---");
        println!("  Output records:   {}", records.len());
        println!("  Re-synthesized in {:?}", save_duration);
        if again == graph {
            println!("  Visual graph stable across the round trip");
        } else {
            println!("  WARNING: visual graph changed across the round trip");
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
