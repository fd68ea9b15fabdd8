use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "feeflow-cli")]
#[command(about = "Management CLI for the FeeFlow API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Session token value (from a prior login's Set-Cookie).
    #[arg(short, long, default_value = "")]
    session: String,

    /// Name of the session cookie.
    #[arg(long, default_value = "feeflow_session")]
    cookie_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Log in and print the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// View dashboard statistics
    Dashboard,
    /// List invoices
    Invoices,
    /// List students
    Students,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.session.is_empty() {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{}={}", cli.cookie_name, cli.session))?,
        );
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{}/api/auth/login", cli.url))
                .json(&serde_json::json!({ "username": username, "password": password }))
                .send()
                .await?;
            if let Some(set_cookie) = res.headers().get("set-cookie") {
                let cookie = set_cookie.to_str().unwrap_or_default();
                if let Some(token) = cookie
                    .split(';')
                    .next()
                    .and_then(|pair| pair.split_once('='))
                    .map(|(_, v)| v)
                {
                    println!("session token: {}", token);
                }
            }
            print_response(res).await?;
        }
        Commands::Dashboard => {
            let res = client
                .get(format!("{}/api/dashboard", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Invoices => {
            let res = client
                .get(format!("{}/api/invoices", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Students => {
            let res = client
                .get(format!("{}/api/students", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);
    println!("{} {}", status.as_u16(), serde_json::to_string_pretty(&body)?);
    Ok(())
}
