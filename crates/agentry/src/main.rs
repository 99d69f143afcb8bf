//! A command line tool for inspecting the agents and poking their tools.

#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use agentry::agents;
use agentry::checks::{check_repo, check_search, search_settings};
use agentry::core::tool::ToolCallRequest;
use agentry_repo::CodeAssistant;
use agentry_search::SearchConfig;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::Value;

const BAR_CHAR: &str = "▎";

#[derive(Parser)]
#[command(name = "agentry", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lists the agents with their models, tools and servers.
    Agents,
    /// Calls one tool of an agent and prints the result envelope.
    Call {
        /// The agent name, e.g. `opensearch_agent`.
        agent: String,
        /// The tool name, e.g. `simple_text_query`.
        tool: String,
        /// The tool arguments as a JSON object.
        #[arg(default_value = "{}")]
        arguments: String,
    },
    /// Checks the code assistant CLI against a repository.
    CheckRepo {
        /// The repository to search in.
        #[arg(long, default_value = ".")]
        repo_path: PathBuf,
        /// The text to search for.
        #[arg(long, default_value = "main")]
        query: String,
    },
    /// Checks the connection to the search cluster.
    CheckSearch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv_override() {
        if !err.not_found() {
            eprintln!("failed to load .env: {err}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Agents => list_agents(),
        Command::Call {
            agent,
            tool,
            arguments,
        } => call_tool(&agent, &tool, &arguments).await,
        Command::CheckRepo { repo_path, query } => {
            run_repo_check(repo_path, &query).await
        }
        Command::CheckSearch => run_search_check().await,
    }
}

fn list_agents() -> ExitCode {
    for agent in agents::all_from_env() {
        println!(
            "{}{} {}",
            BAR_CHAR.bright_cyan(),
            agent.name().bright_white().bold(),
            format!("({})", agent.model()).dimmed()
        );
        println!("{}{}", BAR_CHAR.bright_cyan(), agent.description());
        for def in agent.definitions() {
            println!("{}  tool  {}", BAR_CHAR.bright_cyan(), def.name.green());
        }
        for server in agent.servers() {
            println!(
                "{}  server {} {} {}",
                BAR_CHAR.bright_cyan(),
                server.name().green(),
                server.command(),
                server.args().join(" ")
            );
        }
        println!();
    }
    ExitCode::SUCCESS
}

async fn call_tool(agent_name: &str, tool: &str, arguments: &str) -> ExitCode {
    let arguments: Value = match serde_json::from_str(arguments) {
        Ok(arguments) => arguments,
        Err(err) => {
            eprintln!("{} arguments are not valid JSON: {err}", "error:".red());
            return ExitCode::from(2);
        }
    };

    let agents = agents::all_from_env();
    let Some(agent) = agents.iter().find(|agent| agent.name() == agent_name)
    else {
        eprintln!("{} unknown agent `{agent_name}`", "error:".red());
        return ExitCode::from(2);
    };

    let spinner = spinner(format!("Running {tool}..."));
    let result = agent
        .call(ToolCallRequest {
            id: format!("cli:{tool}"),
            name: tool.to_owned(),
            arguments,
        })
        .await;
    spinner.finish_and_clear();

    print_json(&result.content);
    if result.content["status"] == "success" {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_repo_check(repo_path: PathBuf, query: &str) -> ExitCode {
    let assistant = CodeAssistant::from_env();
    println!("Assistant command: {}", assistant.command().bright_white());
    println!("Repository: {}", repo_path.display().bright_white());

    let spinner = spinner(format!("Searching for {query:?}..."));
    let report = check_repo(&assistant, &repo_path, query).await;
    spinner.finish_and_clear();

    match report {
        Ok(report) => {
            println!(
                "{} assistant {}",
                "ok".green(),
                report.assistant_version
            );
            if !report.is_git_repo {
                println!("{} not a git repository", "warning:".yellow());
            }
            print_json(&report.invocation.into_value());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("repository check failed: {err}");
            eprintln!("{} {err}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run_search_check() -> ExitCode {
    let config = match SearchConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".red());
            return ExitCode::FAILURE;
        }
    };
    println!("Cluster: {}", config.base_url().bright_white());
    for setting in search_settings(&config) {
        if setting.warning {
            println!(
                "{} {}: {}",
                "warning:".yellow(),
                setting.label,
                setting.value
            );
        } else {
            println!("{}: {}", setting.label, setting.value.bright_white());
        }
    }
    debug!("search config: {config:?}");

    let spinner = spinner("Connecting...".to_owned());
    let info = check_search(&config).await;
    spinner.finish_and_clear();

    match info {
        Ok(info) => {
            println!("{} connected", "ok".green());
            print_json(&info);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("search check failed: {err}");
            eprintln!("{} {err}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
