use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use segment_router::config::load_config;
use segment_router::http::{Handler, RequestContext, SharedHandler};
use segment_router::lifecycle::build_route_table;
use segment_router::routing::matcher::QUERY_DELIMITERS;
use segment_router::routing::{Bindings, MatchResult, Router};

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect route configs and running segment-router instances", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and print its route table
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Dispatch a request against a config file without serving it
    Match {
        #[arg(short, long)]
        config: PathBuf,
        method: String,
        path: String,
    },
    /// Check a running instance's status
    Status(Remote),
    /// List a running instance's routes
    Routes(Remote),
}

#[derive(clap::Args)]
struct Remote {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[arg(short, long)]
    key: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let table = build_route_table(&config.routes)?;
            println!("{} route(s), in precedence order per method:", table.len());
            for route in table.iter() {
                println!("  {:<7} {}", route.method(), route.pattern());
            }
        }
        Commands::Match { config, method, path } => {
            let config = load_config(&config)?;
            let router = Router::new(build_route_table(&config.routes)?);
            let report = match_report(&router, &method, &path);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Status(remote) => {
            let res = admin_get(&remote, "/admin/status").await?;
            print_response(res).await?;
        }
        Commands::Routes(remote) => {
            let res = admin_get(&remote, "/admin/routes").await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Dispatch offline and describe the outcome the way the server would answer.
///
/// Both outcomes carry `matched`, `method`, `pattern`, `bindings`, `status`
/// and `body`; `pattern` is null when nothing matched.
fn match_report(router: &Router<SharedHandler>, method: &str, path: &str) -> Value {
    let method = method.trim().to_ascii_uppercase();
    match router.dispatch(&method, path) {
        MatchResult::Matched { route, bindings } => {
            let ctx = RequestContext {
                method: method.clone(),
                path: path.to_string(),
                request_id: "router-cli".to_string(),
            };
            let response = route.handler().call(&ctx, &bindings);
            json!({
                "matched": true,
                "method": route.method(),
                "pattern": route.pattern().to_string(),
                "bindings": bindings,
                "status": response.status.as_u16(),
                "body": response.body,
            })
        }
        MatchResult::NoMatch => json!({
            "matched": false,
            "method": method,
            "pattern": Value::Null,
            "bindings": Bindings::new(),
            "status": 404,
            "body": format!("Cannot {} {}", method, path_only(path)),
        }),
    }
}

fn path_only(target: &str) -> &str {
    match target.find(|c: char| QUERY_DELIMITERS.contains(&c)) {
        Some(idx) => &target[..idx],
        None => target,
    }
}

async fn admin_get(remote: &Remote, path: &str) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", remote.key))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}{}", remote.url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;
    Ok(res)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
