pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "list-tracker")]
#[command(about = "List tracker API - anime, games, movies, shows and books per user")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve,

    #[command(about = "Mint a local HS256 token for development (requires JWT_SECRET)")]
    Token {
        #[arg(help = "User id to embed as the token subject")]
        uid: String,
        #[arg(long, help = "Optional email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "List the allowed categories")]
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle().await,
        Commands::Token { uid, email, hours } => commands::token::handle(&uid, email, hours, output_format),
        Commands::Categories => commands::categories::handle(output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["list-tracker"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from(["list-tracker", "--json", "token", "alice", "--hours", "2"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Some(Commands::Token { uid, email, hours }) => {
                assert_eq!(uid, "alice");
                assert_eq!(email, None);
                assert_eq!(hours, Some(2));
            }
            _ => panic!("expected token command"),
        }
    }
}
