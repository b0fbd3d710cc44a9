//! Locator inspector command line
//!
//! Runs the inspector operations on a page source saved to a file, e.g. the
//! output of an Appium `GET /session/:id/source` call.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use locator_inspector::config::{LocatorConfig, Platform};
use locator_inspector::dom::Document;
use locator_inspector::locators::{Strategy, suggest_locators, suggest_locators_for_path};
use locator_inspector::query::find_elements;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locator-inspector")]
#[command(version)]
#[command(about = "Suggest unique Appium locators for elements of a page source", long_about = None)]
struct Cli {
    /// XML page source to inspect
    #[arg(long, short = 's', value_name = "FILE", global = true)]
    source: Option<PathBuf>,

    /// JSON file with locator configuration
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Only suggest selectors for this platform
    #[arg(long, short = 'p', global = true)]
    platform: Option<Platform>,

    /// Treat the source as a web/hybrid context (no accessibility ids)
    #[arg(long, global = true)]
    web: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the source as a JSON tree with element paths
    Tree {
        /// Only print the subtree at this path
        #[arg(long)]
        path: Option<String>,
    },
    /// Suggest locators for the element at a path such as 0.2.1
    Suggest {
        /// Element path; the root element when omitted
        #[arg(default_value = "")]
        path: String,
    },
    /// List the elements a locator selects
    Find {
        /// Strategy name, e.g. xpath, class-chain, predicate, uiautomator
        strategy: Strategy,
        /// Selector in that strategy's syntax
        selector: String,
    },
    /// Suggest locators for the innermost element at a screen point
    At { x: f64, y: f64 },
}

fn load_config(cli: &Cli) -> anyhow::Result<LocatorConfig> {
    let mut config = match &cli.config {
        Some(path) => LocatorConfig::from_json_file(path)?,
        None => LocatorConfig::default(),
    };
    if cli.web {
        config = config.native_context(false);
    }
    if let Some(platform) = cli.platform {
        config = config.platform(platform);
    }
    Ok(config)
}

fn load_document(cli: &Cli) -> anyhow::Result<Document> {
    let Some(path) = &cli.source else {
        bail!("No page source given, pass one with --source");
    };
    let xml = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document = Document::parse(&xml).with_context(|| format!("Failed to parse {}", path.display()))?;
    log::debug!("Parsed {} elements from {}", document.len(), path.display());
    Ok(document)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let doc = load_document(&cli)?;

    let output = match &cli.command {
        Command::Tree { path } => {
            let tree = doc.to_json_tree();
            serde_json::to_value(tree.find_by_path(path.as_deref().unwrap_or(""))?)?
        }
        Command::Suggest { path } => serde_json::to_value(suggest_locators_for_path(&doc, path, &config)?)?,
        Command::Find { strategy, selector } => {
            let mut paths = Vec::new();
            for id in find_elements(&doc, *strategy, selector)? {
                paths.push(doc.path_of(id)?);
            }
            serde_json::json!({ "count": paths.len(), "paths": paths })
        }
        Command::At { x, y } => {
            let Some(id) = doc.element_at(*x, *y) else {
                bail!("No element at ({}, {})", x, y);
            };
            serde_json::json!({
                "path": doc.path_of(id)?,
                "tagName": doc.node(id)?.tag_name,
                "locators": suggest_locators(&doc, id, &config)?,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
