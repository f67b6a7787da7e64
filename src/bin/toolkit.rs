//! Toolkit CLI
//!
//! Commands for browsing the policy tool and objective catalog.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use policy_toolkit::{
    filter_objective_groups, filter_tools, lint_dataset, Catalog, Objective, RelationGraph,
    Severity, TagCategory, Tool, Toolkit, View,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolkit")]
#[command(about = "Browsable reference for UK R&D policy tools and objectives")]
struct Cli {
    /// Data directory (defaults to the configured directory, then the
    /// embedded dataset)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all tools, or objectives with --objectives
    List {
        /// List objective groups instead of tools
        #[arg(long)]
        objectives: bool,
    },

    /// Show a tool or objective detail page by slug
    Show {
        /// Entity slug (e.g. "r_and_d_tax_credits")
        slug: String,
    },

    /// Filter the tool list by tags and search text
    Filter {
        /// Tag slug that must be present (repeatable; filters AND together)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Case-insensitive substring match against tool names
        #[arg(short, long, default_value = "")]
        search: String,

        /// Filter objective groups by search text instead of tools
        #[arg(long)]
        objectives: bool,
    },

    /// Fuzzy-search tool and objective names
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show entities related to a tool or objective
    Related {
        /// Entity slug
        slug: String,
    },

    /// Open a shared view path (e.g. "/tools/innovation_grants")
    Open {
        path: String,
    },

    /// Print the guide document
    Guide,

    /// Run data-quality checks over the dataset
    Validate,

    /// Show dataset statistics
    Stats,

    /// Export the relationship graph
    Graph {
        /// Output format: json or dot
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match policy_toolkit::config::ToolkitConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let data_dir = cli.data_dir.clone().or_else(|| config.data_dir());
    let toolkit = match load_toolkit(data_dir.as_deref()) {
        Ok(toolkit) => toolkit,
        Err(e) => {
            // Degraded mode: the dataset is unusable, fall back to the guide.
            tracing::error!(error = %e, "dataset load failed, falling back to guide");
            eprintln!("Error: {e}");
            eprintln!();
            println!("{}", Toolkit::embedded_guide());
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &config, &toolkit) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_toolkit(data_dir: Option<&std::path::Path>) -> policy_toolkit::Result<Toolkit> {
    match data_dir {
        Some(dir) => Toolkit::load(dir),
        None => Toolkit::from_embedded(),
    }
}

fn run(
    cli: Cli,
    config: &policy_toolkit::config::ToolkitConfig,
    toolkit: &Toolkit,
) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::List { objectives } => {
            if objectives {
                for group in toolkit.catalog.objective_groups() {
                    println!("{}", group.label);
                    for objective in &group.objectives {
                        println!("  {:<32} {}", objective.slug, objective.name);
                    }
                }
            } else {
                for tool in toolkit.catalog.tools() {
                    println!("{:<36} {}", tool.slug(), tool.name);
                }
            }
        }

        Commands::Show { slug } => {
            if let Some(tool) = toolkit.catalog.tool_by_slug(&slug) {
                print_tool(toolkit, tool);
            } else if let Some(objective) = toolkit.catalog.objective_by_slug(&slug) {
                print_objective(&toolkit.catalog, objective);
            } else {
                println!("Not found: {slug}");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Filter {
            tags,
            search,
            objectives,
        } => {
            if objectives {
                for group in filter_objective_groups(toolkit.catalog.objective_groups(), &search) {
                    println!("{}", group.label);
                    for objective in &group.objectives {
                        println!("  {:<32} {}", objective.slug, objective.name);
                    }
                }
            } else {
                let visible = filter_tools(toolkit.catalog.tools(), &tags, &search);
                for tool in &visible {
                    println!("{:<36} {}", tool.slug(), tool.name);
                }
                eprintln!(
                    "{} of {} tools match",
                    visible.len(),
                    toolkit.catalog.tool_count()
                );
            }
        }

        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(config.output.search_limit);
            for hit in toolkit.catalog.search(&query, limit) {
                println!("{:<10} {:<36} {}", hit.kind.to_string(), hit.slug, hit.name);
            }
        }

        Commands::Related { slug } => {
            if let Some(tool) = toolkit.catalog.tool_by_slug(&slug) {
                for objective in toolkit.catalog.related_objectives(tool) {
                    println!("{:<10} {:<32} {}", "objective", objective.slug, objective.name);
                }
            } else if let Some(objective) = toolkit.catalog.objective_by_slug(&slug) {
                for tool in toolkit.catalog.related_tools(objective) {
                    println!("{:<10} {:<32} {}", "tool", tool.slug(), tool.name);
                }
            } else {
                println!("Not found: {slug}");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Open { path } => match View::from_path(&path) {
            View::Guide => println!("{}", toolkit.guide),
            View::Map => {
                let graph = RelationGraph::build(&toolkit.catalog);
                println!("{}", serde_json::to_string_pretty(&graph.to_json())?);
            }
            View::Tool(slug) => match toolkit.catalog.tool_by_slug(&slug) {
                Some(tool) => print_tool(toolkit, tool),
                None => {
                    println!("Not found: {slug}");
                    return Ok(ExitCode::FAILURE);
                }
            },
            View::Objective(slug) => match toolkit.catalog.objective_by_slug(&slug) {
                Some(objective) => print_objective(&toolkit.catalog, objective),
                None => {
                    println!("Not found: {slug}");
                    return Ok(ExitCode::FAILURE);
                }
            },
        },

        Commands::Guide => {
            println!("{}", toolkit.guide);
        }

        Commands::Validate => {
            let warnings = lint_dataset(&toolkit.taxonomy, &toolkit.catalog);
            if warnings.is_empty() {
                println!("Dataset clean: no warnings");
            } else {
                for warning in &warnings {
                    let severity = match warning.severity {
                        Severity::Warning => "warning",
                        Severity::Info => "info",
                    };
                    println!("{severity:<8} {:<26} {}", warning.code, warning.message);
                }
                println!("{} finding(s)", warnings.len());
            }
        }

        Commands::Stats => {
            let graph = RelationGraph::build(&toolkit.catalog);
            println!("Tools:       {}", toolkit.catalog.tool_count());
            println!("Objectives:  {}", toolkit.catalog.objective_count());
            println!("Tags:        {}", toolkit.taxonomy.tag_count());
            println!("Graph nodes: {}", graph.node_count());
            println!("Graph edges: {}", graph.edge_count());
            println!("Bundle hash: {}", toolkit.bundle_hash);
        }

        Commands::Graph { format, output } => {
            let graph = RelationGraph::build(&toolkit.catalog);
            let content = match format.as_str() {
                "json" => serde_json::to_string_pretty(&graph.to_json())?,
                "dot" => graph.to_dot(),
                other => anyhow::bail!("invalid format '{other}': use 'json' or 'dot'"),
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)?;
                    eprintln!("Exported {} to {}", format, path.display());
                }
                None => println!("{content}"),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_tool(toolkit: &Toolkit, tool: &Tool) {
    println!("{}  [tool]", tool.name);
    println!();

    for (key, value) in &tool.narrative {
        let Some(section) = key.as_str() else { continue };
        println!("## {}", heading(section));
        print_narrative_value(value, 0);
        println!();
    }

    if !tool.further_reading.is_empty() {
        println!("## Further Reading");
        for item in &tool.further_reading {
            match (&item.author, &item.url) {
                (Some(author), Some(url)) => println!("- {} ({author}) <{url}>", item.title),
                (Some(author), None) => println!("- {} ({author})", item.title),
                (None, Some(url)) => println!("- {} <{url}>", item.title),
                (None, None) => println!("- {}", item.title),
            }
        }
        println!();
    }

    println!("## Tags");
    for category in TagCategory::ALL {
        let slugs = tool.tags.get(category);
        if slugs.is_empty() {
            continue;
        }
        let names: Vec<&str> = slugs
            .iter()
            .map(|s| toolkit.taxonomy.tag_display_name(category, s))
            .collect();
        println!("{}: {}", category.label(), names.join(", "));
    }

    let related = toolkit.catalog.related_objectives(tool);
    if !related.is_empty() {
        println!();
        println!("## Related Objectives");
        for objective in related {
            println!("- {} ({})", objective.name, objective.slug);
        }
    }
}

fn print_objective(catalog: &Catalog, objective: &Objective) {
    println!("{}  [objective]", objective.name);
    println!();
    println!("{}", objective.description.trim_end());

    if let Some(notes) = &objective.notes {
        println!();
        println!("## Notes");
        println!("{}", notes.trim_end());
    }

    let related = catalog.related_tools(objective);
    if !related.is_empty() {
        println!();
        println!("## Related Tools");
        for tool in related {
            println!("- {} ({})", tool.name, tool.slug());
        }
    }
}

/// Initialisms that appear in narrative section keys and must not be
/// title-cased
const INITIALISMS: [&str; 4] = ["uk", "eu", "rd", "oecd"];

/// Turn a snake_case section key into a heading
fn heading(key: &str) -> String {
    key.split('_')
        .map(|word| {
            if INITIALISMS.contains(&word) {
                return word.to_uppercase();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render an opaque narrative value: strings verbatim, nested maps as
/// indented subsections
fn print_narrative_value(value: &serde_yaml::Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        serde_yaml::Value::String(text) => println!("{indent}{}", text.trim_end()),
        serde_yaml::Value::Mapping(map) => {
            for (key, nested) in map {
                if let Some(key) = key.as_str() {
                    println!("{indent}{}:", heading(key));
                }
                print_narrative_value(nested, depth + 1);
            }
        }
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                match item.as_str() {
                    Some(text) => println!("{indent}- {}", text.trim_end()),
                    None => print_narrative_value(item, depth),
                }
            }
        }
        other => {
            if let Ok(text) = serde_yaml::to_string(other) {
                println!("{indent}{}", text.trim_end());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::heading;

    #[test]
    fn test_heading_from_snake_case() {
        assert_eq!(heading("how_it_works"), "How It Works");
        assert_eq!(heading("overall_assessment"), "Overall Assessment");
    }

    #[test]
    fn test_heading_keeps_initialisms_uppercase() {
        assert_eq!(heading("uk_experience"), "UK Experience");
        assert_eq!(heading("eu_comparison"), "EU Comparison");
    }
}
