use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use body_sites::{SiteCode, Taxonomy, TaxonomyNode};
use clap::{Parser, Subcommand};
use ipc_core::{BodySiteNavigator, CoreConfig, IpcResult, NavigatorState, TAXONOMY_ENV_VAR};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BREADCRUMB_SEPARATOR: &str = " › ";

#[derive(Parser)]
#[command(name = "ipc")]
#[command(about = "IPC portal body-site taxonomy CLI")]
struct Cli {
    /// Override body-site taxonomy YAML file
    #[arg(long, global = true, env = TAXONOMY_ENV_VAR)]
    taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole taxonomy
    Tree,
    /// Show the site for a code
    Lookup {
        /// Site code as stored on incident records
        code: String,
    },
    /// Drill down through node ids, e.g. `walk hands_fingers right_hand`
    Walk {
        /// Node ids to select in order
        ids: Vec<String>,
        /// Go back this many levels after walking
        #[arg(long, default_value_t = 0)]
        back: usize,
    },
    /// Validate a taxonomy YAML file
    Validate {
        /// Path to the YAML file
        file: PathBuf,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ipc_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'ipc --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    match run(command, cli.taxonomy) {
        Ok(output) => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::warn!("command failed: {}", e);
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Execute one command and return what it prints on success.
fn run(command: Commands, taxonomy_override: Option<PathBuf>) -> IpcResult<String> {
    match command {
        Commands::Tree => Ok(render_tree(&*load_taxonomy(taxonomy_override)?)),
        Commands::Lookup { code } => {
            let taxonomy = load_taxonomy(taxonomy_override)?;
            Ok(format!("{}\n", lookup(&taxonomy, &code)?))
        }
        Commands::Walk { ids, back } => walk(&*load_taxonomy(taxonomy_override)?, &ids, back),
        Commands::Validate { file } => validate(&file),
    }
}

fn load_taxonomy(taxonomy_override: Option<PathBuf>) -> IpcResult<Cow<'static, Taxonomy>> {
    CoreConfig::new(taxonomy_override)?.load_taxonomy()
}

fn validate(file: &Path) -> IpcResult<String> {
    let taxonomy = Taxonomy::load(file)?;
    Ok(format!(
        "{} is valid: {} root regions, {} sites\n",
        file.display(),
        taxonomy.roots().len(),
        taxonomy.leaves().count()
    ))
}

fn render_tree(taxonomy: &Taxonomy) -> String {
    fn render(nodes: &[TaxonomyNode], depth: usize, out: &mut String) {
        for node in nodes {
            let indent = "  ".repeat(depth);
            match node {
                TaxonomyNode::Branch(branch) => {
                    let _ = writeln!(out, "{indent}{} [{}]", branch.label(), branch.id());
                    render(branch.children(), depth + 1, out);
                }
                TaxonomyNode::Leaf(leaf) => {
                    let _ = writeln!(
                        out,
                        "{indent}{} [{}] = {}",
                        leaf.label(),
                        leaf.id(),
                        leaf.code()
                    );
                }
            }
        }
    }

    let mut out = String::new();
    render(taxonomy.roots(), 0, &mut out);
    out
}

fn lookup(taxonomy: &Taxonomy, raw_code: &str) -> Result<String, body_sites::TaxonomyError> {
    let code = SiteCode::parse(raw_code)?;

    let (Some(leaf), Some(chain)) = (taxonomy.find_leaf(code), taxonomy.path_to(code)) else {
        return Ok(format!("No body site has code {code}"));
    };

    let mut labels: Vec<&str> = chain.iter().map(|branch| branch.label()).collect();
    labels.push(leaf.label());
    Ok(format!(
        "{code}: {} ({})",
        leaf.label(),
        labels.join(BREADCRUMB_SEPARATOR)
    ))
}

fn walk(taxonomy: &Taxonomy, ids: &[String], back: usize) -> IpcResult<String> {
    let mut navigator = BodySiteNavigator::new(taxonomy);
    for id in ids {
        navigator.select_id(id)?;
    }
    for _ in 0..back {
        navigator.back();
    }

    let mut out = String::new();
    let breadcrumb = navigator.breadcrumb();
    if breadcrumb.is_empty() {
        let _ = writeln!(out, "Path: (root)");
    } else {
        let _ = writeln!(out, "Path: {}", breadcrumb.join(BREADCRUMB_SEPARATOR));
    }

    match (navigator.state(), navigator.resolved()) {
        (NavigatorState::Resolved, Some(selection)) => {
            let _ = writeln!(out, "Resolved: {} {}", selection.code(), selection.label());
        }
        _ => {
            for node in navigator.current_view() {
                match node.code() {
                    Some(code) => {
                        let _ = writeln!(out, "  - {} [{}] = {}", node.label(), node.id(), code);
                    }
                    None => {
                        let _ = writeln!(out, "  + {} [{}]", node.label(), node.id());
                    }
                }
            }
        }
    }

    Ok(out)
}
