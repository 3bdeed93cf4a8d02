use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dialoguer::Select;

use crate::catalog::{csv, normalize_code, normalize_records};
use crate::config::{self, Config};
use crate::error::{PrereqError, Result};
use crate::graph::builder::SelfLoopPolicy;
use crate::graph::cluster::ClusterIndex;
use crate::graph::nav::{Action, Navigator, ViewModel, ViewState};
use crate::graph::{builder, viz, CourseGraph};
use crate::scrape::CatalogClient;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "prereqmap")]
#[command(about = "Course prerequisite graph explorer", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured self-loop policy (reject, warn, allow)
    #[arg(long)]
    pub self_loops: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the course catalog website into a raw CSV
    Fetch(FetchArgs),
    /// Rewrite a raw CSV with canonical course codes
    Format(FormatArgs),
    /// Print one navigation view of the prerequisite graph
    View(ViewArgs),
    /// Print the prerequisite tree of one course
    Tree(TreeArgs),
    /// Interactive drill-down through the graph
    Explore(ExploreArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub max_pages: Option<usize>,
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(subcommand)]
    pub target: ViewTarget,
}

#[derive(Subcommand, Debug)]
pub enum ViewTarget {
    /// All departments collapsed
    Overview(ViewCommonArgs),
    /// One department expanded to its one-hop closure
    Department(DepartmentArgs),
    /// One course and its direct neighbors
    Course(CourseArgs),
}

#[derive(Args, Debug)]
pub struct ViewCommonArgs {
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
    #[arg(long, default_value = "json")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct DepartmentArgs {
    pub name: String,
    #[command(flatten)]
    pub common: ViewCommonArgs,
}

#[derive(Args, Debug)]
pub struct CourseArgs {
    pub code: String,
    #[command(flatten)]
    pub common: ViewCommonArgs,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub code: String,
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = config::load(cli.config)?;
    let self_loops = match cli.self_loops.as_deref() {
        Some(policy) => SelfLoopPolicy::parse(policy)?,
        None => config.build.self_loops,
    };

    match cli.command {
        Commands::Fetch(args) => handle_fetch(args, &config),
        Commands::Format(args) => handle_format(args, &config),
        Commands::View(args) => handle_view(args, &config, self_loops),
        Commands::Tree(args) => handle_tree(args, &config, self_loops),
        Commands::Explore(args) => handle_explore(args, &config, self_loops),
    }
}

fn handle_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let url = args.url.unwrap_or_else(|| config.fetch.url.clone());
    let max_pages = args.max_pages.unwrap_or(config.fetch.max_pages);
    let out = args.out.unwrap_or_else(|| config.paths.raw_csv.clone());

    if out.exists() {
        let overwrite = output::confirm(
            &format!("Overwrite existing {}?", out.display()),
            args.yes,
        )
        .map_err(|err| PrereqError::Other(anyhow::Error::new(err)))?;
        if !overwrite {
            return Ok(());
        }
    }

    let client = CatalogClient::new(url, max_pages)?;
    let records = client.fetch_all()?;
    csv::save_records(&out, &records)?;
    output::success(&format!(
        "saved {} course records to {}",
        records.len(),
        out.display()
    ));
    Ok(())
}

fn handle_format(args: FormatArgs, config: &Config) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.paths.raw_csv.clone());
    let out = args
        .out
        .unwrap_or_else(|| config.paths.formatted_csv.clone());

    let count = csv::format_csv(&input, &out)?;
    output::success(&format!(
        "formatted {} course records into {}",
        count,
        out.display()
    ));
    Ok(())
}

fn handle_view(args: ViewArgs, config: &Config, self_loops: SelfLoopPolicy) -> Result<()> {
    let (common, state_of): (&ViewCommonArgs, StateRequest) = match &args.target {
        ViewTarget::Overview(common) => (common, StateRequest::Overview),
        ViewTarget::Department(dept) => {
            (&dept.common, StateRequest::Department(dept.name.clone()))
        }
        ViewTarget::Course(course) => (&course.common, StateRequest::Course(course.code.clone())),
    };
    let format = parse_view_format(&common.format)?;

    let (graph, clusters) = load_graph(common.input.as_deref(), config, self_loops)?;
    let navigator = Navigator::new(&graph, &clusters, config.layout);

    let state = match state_of {
        StateRequest::Overview => navigator.initial(),
        StateRequest::Department(name) => navigator
            .expand_department(&name)
            .ok_or(PrereqError::UnknownNode(name))?,
        StateRequest::Course(code) => {
            let (id, _) = normalize_code(&code)?;
            navigator
                .focus_course(&id)
                .ok_or_else(|| PrereqError::UnknownNode(id.to_string()))?
        }
    };

    let model = navigator.view(&state);
    match format {
        ViewFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&model)
                    .map_err(|err| PrereqError::Other(anyhow::Error::new(err)))?
            );
        }
        ViewFormat::Table => print_view_table(&model),
        ViewFormat::Dot => print!("{}", viz::render_dot(&model)),
    }
    Ok(())
}

fn handle_tree(args: TreeArgs, config: &Config, self_loops: SelfLoopPolicy) -> Result<()> {
    let (graph, _) = load_graph(args.input.as_deref(), config, self_loops)?;
    let (id, _) = normalize_code(&args.code)?;
    if !graph.contains(&id) {
        return Err(PrereqError::UnknownNode(id.to_string()));
    }
    print!("{}", viz::render_tree(&graph, &id));
    Ok(())
}

fn handle_explore(args: ExploreArgs, config: &Config, self_loops: SelfLoopPolicy) -> Result<()> {
    let (graph, clusters) = load_graph(args.input.as_deref(), config, self_loops)?;
    let navigator = Navigator::new(&graph, &clusters, config.layout);

    let mut state = navigator.initial();
    loop {
        let model = navigator.view(&state);
        output::info(&state_summary(&state, &model));

        let mut options: Vec<String> = vec!["quit".to_string(), "reset".to_string()];
        options.extend(model.nodes.iter().map(|node| node.id.clone()));

        let choice = Select::new()
            .with_prompt("click")
            .items(&options)
            .default(0)
            .interact()
            .map_err(|err| PrereqError::Other(anyhow::Error::new(err)))?;

        state = match choice {
            0 => break,
            1 => navigator.reduce(&state, &Action::Reset),
            _ => navigator.reduce(&state, &Action::Click(options[choice].clone())),
        };
    }
    Ok(())
}

enum StateRequest {
    Overview,
    Department(String),
    Course(String),
}

#[derive(Clone, Copy, Debug)]
enum ViewFormat {
    Json,
    Table,
    Dot,
}

fn parse_view_format(input: &str) -> Result<ViewFormat> {
    match input.to_ascii_lowercase().as_str() {
        "json" => Ok(ViewFormat::Json),
        "table" => Ok(ViewFormat::Table),
        "dot" => Ok(ViewFormat::Dot),
        other => Err(PrereqError::Other(anyhow::anyhow!(
            "unknown view format '{}'",
            other
        ))),
    }
}

fn load_graph(
    input: Option<&Path>,
    config: &Config,
    self_loops: SelfLoopPolicy,
) -> Result<(CourseGraph, ClusterIndex)> {
    let path = input.unwrap_or(&config.paths.formatted_csv);
    let raw = csv::load_records(path)?;
    let records = normalize_records(&raw)?;
    let graph = builder::build(&records, self_loops)?;
    if graph.is_empty() {
        output::warn("no courses loaded; views will be empty");
    }
    let clusters = ClusterIndex::build(&graph);
    Ok((graph, clusters))
}

fn print_view_table(model: &ViewModel) {
    for node in &model.nodes {
        match node.position {
            Some((x, y)) => println!("{}\t{}\t{}\t({x}, {y})", node.id, node.label, node.color),
            None => println!("{}\t{}\t{}", node.id, node.label, node.color),
        }
    }
    for edge in &model.edges {
        if edge.emphasized {
            println!("{} -> {} *", edge.source, edge.target);
        } else {
            println!("{} -> {}", edge.source, edge.target);
        }
    }
}

fn state_summary(state: &ViewState, model: &ViewModel) -> String {
    match state {
        ViewState::Overview => format!("overview: {} departments", model.nodes.len()),
        ViewState::DepartmentExpanded {
            department,
            core,
            frontier,
        } => format!(
            "{}: {} courses, {} nodes with neighbors, {} edges",
            department,
            core.len(),
            frontier.len(),
            model.edges.len()
        ),
        ViewState::CourseFocused { course, frontier } => format!(
            "{}: {} connected nodes, {} edges",
            course,
            frontier.len() - 1,
            model.edges.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::CourseId;

    #[test]
    fn view_format_parsing() {
        assert!(matches!(
            parse_view_format("JSON").expect("parse"),
            ViewFormat::Json
        ));
        assert!(matches!(
            parse_view_format("dot").expect("parse"),
            ViewFormat::Dot
        ));
        assert!(parse_view_format("yaml").is_err());
    }

    #[test]
    fn summaries_name_the_focused_entity() {
        let model = ViewModel {
            nodes: Vec::new(),
            edges: Vec::new(),
            layout_hint: crate::graph::nav::LayoutHint::ForceDirected,
        };
        let state = ViewState::CourseFocused {
            course: CourseId::new("COMP 250"),
            frontier: [CourseId::new("COMP 250")].into(),
        };
        assert_eq!(state_summary(&state, &model), "COMP 250: 0 connected nodes, 0 edges");
    }
}
