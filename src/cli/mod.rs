pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "caseway-api")]
#[command(about = "Caseway student platform API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port (overrides PORT / CASEWAY_API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Mint a session token signed with SUPABASE_JWT_SECRET, for local development")]
    Token {
        #[arg(help = "User id; a random one is generated when omitted")]
        user_id: Option<Uuid>,

        #[arg(long, help = "Email claim")]
        email: Option<String>,

        #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
        hours: i64,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve::run(port).await,
        Commands::Token { user_id, email, hours } => token::run(user_id, email, hours),
    }
}
