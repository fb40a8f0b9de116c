use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "users-cli")]
#[command(about = "Command-line client for the user management service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "USERS_API_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all users
    List,
    /// Show one user
    Get { id: u64 },
    /// Create a user
    Create { username: String, email: String },
    /// Replace a user's username and email
    Update {
        id: u64,
        username: String,
        email: String,
    },
    /// Delete a user
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
    );
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    let users_url = format!("{}/users", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List => client.get(&users_url).send().await?,
        Commands::Get { id } => client.get(format!("{users_url}/{id}")).send().await?,
        Commands::Create { username, email } => {
            client
                .post(&users_url)
                .json(&json!({ "Username": username, "Email": email }))
                .send()
                .await?
        }
        Commands::Update {
            id,
            username,
            email,
        } => {
            client
                .put(format!("{users_url}/{id}"))
                .json(&json!({ "Username": username, "Email": email }))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{users_url}/{id}")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
