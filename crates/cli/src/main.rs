//! Buildkite CLI - Command-line interface for the Buildkite API client

mod logging;

use std::time::Duration;

use anyhow::{Context, Result};
use buildkite_client::{
    CallContext, Client, ClientConfig, GraphQlRequest, DEFAULT_BASE_URL, DEFAULT_GRAPHQL_URL,
    DEFAULT_USER_AGENT, ENV_API_TOKEN, ENV_GRAPHQL_URL, ENV_ORGANIZATION_SLUG, ENV_REST_URL,
    ENV_USER_AGENT,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "buildkite")]
#[command(about = "Query the Buildkite REST and GraphQL APIs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Organization slug
    #[arg(long, env = ENV_ORGANIZATION_SLUG)]
    org: String,

    /// API access token
    #[arg(long, env = ENV_API_TOKEN, hide_env_values = true, default_value = "")]
    token: String,

    /// User-Agent sent with every request
    #[arg(long, env = ENV_USER_AGENT, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// REST API base URL
    #[arg(long, env = ENV_REST_URL, default_value = DEFAULT_BASE_URL)]
    rest_url: String,

    /// GraphQL endpoint
    #[arg(long, env = ENV_GRAPHQL_URL, default_value = DEFAULT_GRAPHQL_URL)]
    graphql_url: String,

    /// Give up after this many seconds (no limit when omitted)
    #[arg(long)]
    timeout: Option<u64>,

    /// Trace full request/response payloads to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a GraphQL query or mutation
    Graphql {
        /// Query document
        #[arg(short, long)]
        query: String,

        /// Variables as a JSON object
        #[arg(long, default_value = "{}")]
        variables: String,
    },

    /// GET a REST path relative to the base URL
    Get {
        /// Path, e.g. v2/organizations/acme/pipelines
        path: String,
    },

    /// Print a resource slug scoped to the organization
    Slug {
        /// Resource slug, e.g. a pipeline
        resource: String,
    },
}

impl Cli {
    fn client(&self) -> Result<Client> {
        let config = ClientConfig::new(&self.org, &self.token, &self.user_agent)
            .base_url(&self.rest_url)
            .graphql_url(&self.graphql_url);

        Client::from_config(config).context("Failed to configure client")
    }

    fn call_context(&self) -> CallContext {
        match self.timeout {
            Some(secs) => CallContext::background().with_timeout(Duration::from_secs(secs)),
            None => CallContext::background(),
        }
    }
}

fn graphql_request(query: &str, variables: &str) -> Result<GraphQlRequest> {
    let variables: Value = serde_json::from_str(variables).context("Invalid JSON variables")?;
    let Value::Object(variables) = variables else {
        anyhow::bail!("Variables must be a JSON object");
    };

    let request = variables
        .into_iter()
        .try_fold(GraphQlRequest::new(query), |request, (name, value)| {
            request.var(name, value)
        })?;

    Ok(request)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = cli.client()?;
    let ctx = cli.call_context();

    match &cli.command {
        Commands::Graphql { query, variables } => {
            let request = graphql_request(query, variables)?;
            let data: Value = client
                .graphql_request(&request, &ctx)
                .await
                .context("GraphQL request failed")?;
            print_json(&data)?;
        }

        Commands::Get { path } => {
            let body: Value = client
                .get(path, &ctx)
                .await
                .with_context(|| format!("GET {} failed", path))?;
            print_json(&body)?;
        }

        Commands::Slug { resource } => {
            println!("{}", client.org_slug(resource));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {:#}", "warning:".yellow().bold(), e);
    }

    tracing::debug!(version = buildkite_client::VERSION, "buildkite cli starting");

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
