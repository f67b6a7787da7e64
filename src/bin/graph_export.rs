use std::path::PathBuf;

use clap::Parser;
use policy_toolkit::{RelationGraph, Toolkit};

#[derive(Parser)]
#[command(name = "toolkit-graph-export")]
#[command(about = "Export the tool/objective relationship graph to JSON or DOT")]
struct Cli {
    /// Path to the data directory (defaults to the embedded dataset)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output file (defaults to network.json / network.dot)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json or dot
    #[arg(short, long, default_value = "json")]
    format: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let toolkit = match &cli.data_dir {
        Some(dir) => {
            println!("Loading dataset from: {}", dir.display());
            Toolkit::load(dir)?
        }
        None => Toolkit::from_embedded()?,
    };

    let graph = RelationGraph::build(&toolkit.catalog);
    println!(
        "Graph built: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    match cli.format.as_str() {
        "json" => {
            let output_path = cli.output.unwrap_or_else(|| PathBuf::from("network.json"));
            let content = serde_json::to_string_pretty(&graph.to_json())?;
            std::fs::write(&output_path, content)?;
            println!("Exported JSON to: {}", output_path.display());
        }
        "dot" => {
            let output_path = cli.output.unwrap_or_else(|| PathBuf::from("network.dot"));
            std::fs::write(&output_path, graph.to_dot())?;
            println!("Exported DOT to: {}", output_path.display());
        }
        _ => {
            eprintln!("Invalid format. Use 'json' or 'dot'");
            std::process::exit(1);
        }
    }

    Ok(())
}
