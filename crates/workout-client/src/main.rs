use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use workout_client::{ClientConfig, StoreClient};
use workout_core::{MixSelection, VersionToken, WorkoutId};
use workout_ops::{decode_operations, WorkoutStore};

/// Edit and mix workouts on a remote workout store
#[derive(Debug, Parser)]
#[command(name = "workout", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a workout and its version
    Get { id: String },
    /// List workouts, most recently updated first
    List,
    /// Apply a JSON array of operations as one batch
    Apply {
        id: String,
        /// Version (`updated_at`) the operations were derived from
        #[arg(long)]
        version: String,
        /// File holding the operations, `-` for stdin
        #[arg(long)]
        ops: PathBuf,
    },
    /// Preview a workout mixed from blocks of other workouts
    Mix {
        #[arg(long)]
        title: String,
        /// `<workout id>:<block index>,<block index>...`, repeatable
        #[arg(long = "source", required = true, value_parser = parse_source)]
        sources: Vec<MixSelection>,
    },
}

fn parse_source(raw: &str) -> Result<MixSelection, String> {
    let (id, indices) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <id>:<indices>, got '{}'", raw))?;
    if id.is_empty() {
        return Err(format!("missing workout id in '{}'", raw));
    }

    let block_indices = indices
        .split(',')
        .map(|i| {
            i.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid block index '{}'", i))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MixSelection::new(id, block_indices))
}

fn read_ops(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "workout_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = StoreClient::new(ClientConfig::from_env()?)?;

    match cli.command {
        Command::Get { id } => {
            let workout = client.get_workout(&WorkoutId::new(id)).await?;
            print_json(&workout)?;
        }
        Command::List => {
            let workouts = client.list_workouts().await?;
            print_json(&workouts)?;
        }
        Command::Apply { id, version, ops } => {
            let raw: Vec<serde_json::Value> = serde_json::from_str(&read_ops(&ops)?)?;
            let operations = decode_operations(raw)?;
            let updated = client
                .apply_operations(&WorkoutId::new(id), &operations, &VersionToken::new(version))
                .await?;
            print_json(&updated)?;
        }
        Command::Mix { title, sources } => {
            let preview = client.mix(&sources, &title).await?;
            print_json(&preview)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let selection = parse_source("wk-1:0,2").unwrap();
        assert_eq!(selection, MixSelection::new("wk-1", vec![0, 2]));

        assert!(parse_source("wk-1").is_err());
        assert!(parse_source(":0").is_err());
        assert!(parse_source("wk-1:a").is_err());
    }

    #[test]
    fn test_cli_parses_mix() {
        let cli = Cli::try_parse_from([
            "workout", "mix", "--title", "Mixed", "--source", "wk-1:0", "--source", "wk-2:1,0",
        ])
        .unwrap();
        match cli.command {
            Command::Mix { title, sources } => {
                assert_eq!(title, "Mixed");
                assert_eq!(sources[1].block_indices, vec![1, 0]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
