use clap::{Parser, Subcommand};
use flux_sandbox::http::ExecutionStyle;
use flux_sandbox::http::X_REQUEST_ID;

#[derive(Parser)]
#[command(name = "sandbox-cli")]
#[command(about = "Client for a running flux-sandbox", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a remote operation without storing it
    Fetch {
        operation: String,
        #[arg(short, long, default_value = "coroutine")]
        style: String,
    },
    /// Fetch a remote operation and store the result
    Store {
        operation: String,
        #[arg(short, long, default_value = "coroutine")]
        style: String,
    },
    /// List every stored record
    All,
    /// Delete every stored record
    Clear,
    /// Insert random sample records
    Fill { how_many: i64 },
    /// Show circuit breaker state
    Breaker,
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match cli.command {
        Commands::Fetch { operation, style } => {
            format!("{}/{}", parse_style(&style)?, operation)
        }
        Commands::Store { operation, style } => {
            format!("{}/{}/store", parse_style(&style)?, operation)
        }
        Commands::All => "db/all".to_string(),
        Commands::Clear => "db/clear".to_string(),
        Commands::Fill { how_many } => format!("fill-with-test/{how_many}"),
        Commands::Breaker => "actuator/circuitbreaker".to_string(),
        Commands::Health => "actuator/health".to_string(),
    };

    let res = client
        .get(format!("{}/{}", cli.url.trim_end_matches('/'), path))
        .send()
        .await?;
    print_response(res).await?;

    Ok(())
}

fn parse_style(style: &str) -> Result<ExecutionStyle, Box<dyn std::error::Error>> {
    Ok(style.parse::<ExecutionStyle>()?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: {} (request {})", status, request_id);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => println!("OK"),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
