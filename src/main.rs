use anyhow::Result;
use azul::Config;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let records = azul::run(&config)?;

    for record in &records {
        let outcome = match record.winner {
            Some(player) => format!("player {} wins", player + 1),
            None => "tie".to_string(),
        };
        info!(
            "Seed {}: {} - {} after {} rounds, {} moves ({})",
            record.seed,
            record.final_points[0],
            record.final_points[1],
            record.rounds,
            record.moves,
            outcome
        );
    }
    Ok(())
}
