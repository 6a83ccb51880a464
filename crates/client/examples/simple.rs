//! Simple Client Example
//!
//! Demonstrates basic usage of the Buildkite client.
//!
//! # Usage
//!
//! ```bash
//! BUILDKITE_ORGANIZATION_SLUG=acme BUILDKITE_API_TOKEN=bkua_... \
//!     cargo run --example simple -- deploy
//! ```

use buildkite_client::{CallContext, Client, ClientConfig, GraphQlRequest};
use serde::Deserialize;
use std::time::Duration;

const PIPELINE_QUERY: &str = r#"
query Pipeline($slug: ID!) {
  pipeline(slug: $slug) {
    name
    builds(first: 5) {
      edges { node { number state branch } }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct PipelineData {
    pipeline: Option<Pipeline>,
}

#[derive(Debug, Deserialize)]
struct Pipeline {
    name: String,
    builds: Connection<Build>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct Build {
    number: u64,
    state: String,
    branch: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = std::env::args().nth(1).unwrap_or_else(|| "deploy".to_string());

    let client = Client::from_config(ClientConfig::from_env())?;
    let ctx = CallContext::background().with_timeout(Duration::from_secs(30));

    let request = GraphQlRequest::new(PIPELINE_QUERY).var("slug", client.org_slug(&pipeline))?;
    let data: PipelineData = client.graphql_request(&request, &ctx).await?;

    match data.pipeline {
        Some(pipeline) => {
            println!("{}", pipeline.name);
            for edge in pipeline.builds.edges {
                let build = edge.node;
                println!("  #{} {} ({})", build.number, build.state, build.branch);
            }
        }
        None => println!("pipeline {} not found", client.org_slug(&pipeline)),
    }

    Ok(())
}
