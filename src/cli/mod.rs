use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use indicatif::ProgressBar;

use crate::config::CliConfig;
use crate::controller::GraphController;
use crate::core::node::{NodeId, NodeType};
use crate::core::state::Perspective;
use crate::error::{DelverError, Result};
use crate::layout::LayoutMode;
use crate::render::{dot, Emphasis, RenderedGraph};
use crate::source::{FileSource, GraphSource, HttpSource};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "delver")]
#[command(about = "Lineage graph processing engine", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read the raw graph from a JSON file instead of the network.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    #[arg(short, long, env = "DELVER_API_URL")]
    pub url: Option<String>,
    #[arg(short, long)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Show(ShowArgs),
    Dot(DotArgs),
    Impact(ImpactArgs),
    Inspect(InspectArgs),
    Completions(CompletionsArgs),
}

/// Filtering and layout flags shared by the graph commands.
#[derive(Args, Debug)]
pub struct ViewArgs {
    #[arg(long)]
    pub layout: Option<String>,
    #[arg(long)]
    pub perspective: Option<String>,
    #[arg(long = "hide")]
    pub hidden: Vec<String>,
    /// Isolate the lineage of this node (ancestors + descendants).
    #[arg(long)]
    pub focus: Option<String>,
    /// Restrict to a container node and its direct children.
    #[arg(long)]
    pub scope: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DotArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Highlight the downstream closure of this node.
    #[arg(long)]
    pub impact: Option<String>,
}

#[derive(Args, Debug)]
pub struct ImpactArgs {
    pub node: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub node: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(args.shell, &mut command, "delver", &mut io::stdout());
        return Ok(());
    }

    let config = CliConfig::discover(cli.config.as_deref())?;
    let mut controller = GraphController::new();
    load_graph(&cli, &config, &mut controller)?;

    match &cli.command {
        Commands::Show(args) => cmd_show(&config, args, &mut controller),
        Commands::Dot(args) => cmd_dot(&config, args, &mut controller),
        Commands::Impact(args) => cmd_impact(&config, args, &mut controller),
        Commands::Inspect(args) => cmd_inspect(&config, args, &mut controller),
        Commands::Completions(_) => unreachable!("handled above"),
    }
}

fn load_graph(cli: &Cli, config: &CliConfig, controller: &mut GraphController) -> Result<()> {
    let token = controller.begin_fetch();
    let result = if let Some(path) = cli.input.as_ref() {
        FileSource::new(path.clone()).fetch_graph()
    } else if let Some(url) = cli.url.clone().or_else(|| config.api_url.clone()) {
        let spinner = (!cli.quiet).then(|| fetch_spinner(&url));
        let result = HttpSource::new(url).fetch_graph();
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result
    } else {
        return Err(DelverError::Other(anyhow::anyhow!(
            "no graph source: pass --input or --url, or set api_url in delver.toml"
        )));
    };
    controller.complete_fetch(token, result)?;
    Ok(())
}

fn fetch_spinner(url: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("fetching {url}"));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn apply_view(config: &CliConfig, view: &ViewArgs, controller: &mut GraphController) -> Result<()> {
    let layout = match view.layout.as_deref() {
        Some(raw) => Some(LayoutMode::parse(raw).ok_or_else(|| {
            DelverError::Other(anyhow::anyhow!(format!("unknown layout: {raw}")))
        })?),
        None => config.layout_mode()?,
    };
    if let Some(layout) = layout {
        controller.set_layout(layout);
    }

    let perspective = match view.perspective.as_deref() {
        Some(raw) => Some(Perspective::parse(raw).ok_or_else(|| {
            DelverError::Other(anyhow::anyhow!(format!("unknown perspective: {raw}")))
        })?),
        None => config.perspective()?,
    };
    if let Some(perspective) = perspective {
        controller.set_perspective(perspective);
    }

    let hidden = if view.hidden.is_empty() {
        &config.hidden_types
    } else {
        &view.hidden
    };
    for raw in hidden {
        let ty = NodeType::parse(raw);
        if ty == NodeType::Default && !raw.eq_ignore_ascii_case("default") {
            output::warn(&format!("unknown node type in --hide: {raw}"));
            continue;
        }
        controller.set_type_visible(ty, false);
    }

    if let Some(focus) = view.focus.as_ref() {
        controller.set_focus(Some(NodeId::new(focus.clone())));
    }
    if let Some(scope) = view.scope.as_ref() {
        controller.set_scope(Some(NodeId::new(scope.clone())));
    }
    Ok(())
}

fn cmd_show(config: &CliConfig, args: &ShowArgs, controller: &mut GraphController) -> Result<()> {
    apply_view(config, &args.view, controller)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(controller.rendered())?);
        return Ok(());
    }
    print_rendered(controller.rendered());
    Ok(())
}

fn print_rendered(rendered: &RenderedGraph) {
    println!(
        "{} ({} nodes, {} edges)",
        style("lineage graph").bold(),
        rendered.nodes.len(),
        rendered.edges.len()
    );
    for node in &rendered.nodes {
        let line = format!(
            "  {:<24} {:<10} {:<28} ({:.0}, {:.0})",
            node.id.as_str(),
            node.ty.as_str(),
            node.label,
            node.position.x,
            node.position.y
        );
        match node.emphasis {
            Emphasis::Dimmed => println!("{}", style(line).dim()),
            Emphasis::Impacted => println!("{}", style(line).yellow()),
            Emphasis::Normal => println!("{line}"),
        }
    }
    if !rendered.edges.is_empty() {
        println!("{}", style("edges").bold());
        for edge in &rendered.edges {
            println!("  {} -> {}", edge.source.as_str(), edge.target.as_str());
        }
    }

    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for node in &rendered.nodes {
        *counts.entry(node.ty.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort();
    let summary: Vec<String> = counts
        .into_iter()
        .map(|(ty, count)| format!("{ty}={count}"))
        .collect();
    if !summary.is_empty() {
        println!("{} {}", style("types").bold(), summary.join(" "));
    }
}

fn cmd_dot(config: &CliConfig, args: &DotArgs, controller: &mut GraphController) -> Result<()> {
    apply_view(config, &args.view, controller)?;

    if let Some(raw) = args.impact.as_ref() {
        let id = NodeId::new(raw.clone());
        require_impact_source(controller, &id)?;
        controller.set_impact_mode(true);
        controller.click_node(&id);
    }

    let overlay = (!controller.impacted().is_empty()).then(|| controller.impacted().clone());
    print!(
        "{}",
        dot::render_dot(controller.current_graph(), overlay.as_ref())
    );
    Ok(())
}

fn cmd_impact(config: &CliConfig, args: &ImpactArgs, controller: &mut GraphController) -> Result<()> {
    apply_view(config, &args.view, controller)?;

    let id = NodeId::new(args.node.clone());
    require_impact_source(controller, &id)?;

    controller.set_impact_mode(true);
    controller.click_node(&id);

    let mut impacted: Vec<&NodeId> = controller.impacted().iter().collect();
    impacted.sort();

    if args.json {
        let ids: Vec<&str> = impacted.iter().map(|id| id.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    println!(
        "{} downstream of {} ({} nodes)",
        style("impact").bold(),
        id,
        impacted.len()
    );
    for impacted_id in impacted {
        let label = controller
            .current_graph()
            .node(impacted_id)
            .map(|node| node.label.clone())
            .unwrap_or_default();
        println!("  {:<24} {label}", impacted_id.as_str());
    }

    let counts = controller
        .current_graph()
        .restrict_to(controller.impacted())
        .type_counts();
    let mut counts: Vec<(&str, usize)> = counts
        .into_iter()
        .map(|(ty, count)| (ty.as_str(), count))
        .collect();
    counts.sort();
    let summary: Vec<String> = counts
        .into_iter()
        .map(|(ty, count)| format!("{ty}={count}"))
        .collect();
    if !summary.is_empty() {
        println!("{} {}", style("types").bold(), summary.join(" "));
    }
    Ok(())
}

fn cmd_inspect(
    config: &CliConfig,
    args: &InspectArgs,
    controller: &mut GraphController,
) -> Result<()> {
    apply_view(config, &args.view, controller)?;

    let id = NodeId::new(args.node.clone());
    let node = require_node(controller, &id)?;
    let connections = controller.current_graph().connections_of(&id);

    if args.json {
        let neighbors = |list: &[(NodeId, Option<String>)]| {
            list.iter()
                .map(|(id, label)| {
                    serde_json::json!({"id": id.as_str(), "label": label})
                })
                .collect::<Vec<_>>()
        };
        let detail = serde_json::json!({
            "id": node.id.as_str(),
            "type": node.ty.as_str(),
            "label": node.label,
            "parent": node.parent.as_ref().map(NodeId::as_str),
            "attrs": node.attrs,
            "inputs": neighbors(&connections.inputs),
            "outputs": neighbors(&connections.outputs),
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        style(node.label.as_str()).bold(),
        node.id,
        node.ty.as_str()
    );
    if let Some(parent) = node.parent.as_ref() {
        println!("  parent: {parent}");
    }
    for (key, value) in &node.attrs {
        println!("  {key}: {value}");
    }
    println!("{}", style("inputs").bold());
    for (input, label) in &connections.inputs {
        println!("  {:<24} {}", input.as_str(), label.as_deref().unwrap_or(""));
    }
    println!("{}", style("outputs").bold());
    for (output, label) in &connections.outputs {
        println!("  {:<24} {}", output.as_str(), label.as_deref().unwrap_or(""));
    }
    Ok(())
}

/// Containers cannot seed impact propagation; a container click scopes
/// instead, so point the user at --scope.
fn require_impact_source(controller: &GraphController, id: &NodeId) -> Result<()> {
    let node = require_node(controller, id)?;
    if node.ty.is_group() {
        return Err(DelverError::Other(anyhow::anyhow!(format!(
            "{} is a container; use --scope to narrow to it",
            id
        ))));
    }
    Ok(())
}

/// Look the node up in the post-pipeline graph; unknown ids are user errors.
fn require_node<'a>(
    controller: &'a GraphController,
    id: &NodeId,
) -> Result<&'a crate::core::node::Node> {
    controller
        .current_graph()
        .node(id)
        .ok_or_else(|| DelverError::UnknownNode(id.as_str().to_string()))
}
