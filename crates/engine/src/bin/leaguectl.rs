use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use engine::notify::{LogNotifier, Notifier, PicksLocked};
use engine::{picks, scoring, seasons, standings};
use sqlx::SqlitePool;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "leaguectl")]
#[command(about = "Fantasy league scheduler and operator tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Lock an episode's picks and create auto-picks for absent members.
    LockSweep {
        /// Episode to sweep; defaults to the active episode.
        #[arg(long)]
        episode: Option<Uuid>,
    },
    /// Finalize an episode's scores and emit the finalized event.
    Finalize {
        /// Episode to finalize; defaults to the active episode.
        #[arg(long)]
        episode: Option<Uuid>,
    },
    /// Recompute standings for one league or a whole season.
    RecomputeStandings {
        #[arg(long, conflicts_with = "season")]
        league: Option<Uuid>,

        /// Season to recompute; defaults to the active season.
        #[arg(long)]
        season: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("leaguectl={log_level},engine={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url)
        .await
        .context("Failed to open database")?;

    match cli.command {
        Commands::Migrate => {
            db.run_migrations().await.context("Failed to run migrations")?;
            tracing::info!("migrations applied");
        }
        Commands::LockSweep { episode } => {
            let episode_id = resolve_episode(db.pool(), episode).await?;
            let episode = storage::repository::episode::EpisodeRepository::new(db.pool())
                .find_by_id(episode_id)
                .await?;
            let created = picks::run_pick_lock_sweep(db.pool(), episode_id).await?;

            // The sweep is a no-op before the deadline; the locked event only
            // fires once the window has actually closed.
            if episode.is_locked(chrono::Utc::now()) {
                LogNotifier
                    .picks_locked(&PicksLocked {
                        season_id: episode.season_id,
                        episode_id,
                        episode_number: episode.number,
                        auto_picks_created: created.len(),
                    })
                    .await;
                println!("created {} auto-pick(s)", created.len());
            } else {
                println!(
                    "episode {} is not locked yet; nothing swept, no event dispatched",
                    episode.number
                );
            }
        }
        Commands::Finalize { episode } => {
            let episode_id = resolve_episode(db.pool(), episode).await?;
            let event = scoring::finalize_episode(db.pool(), episode_id).await?;
            LogNotifier.episode_finalized(&event).await;
            println!("episode {} finalized", event.episode_number);
        }
        Commands::RecomputeStandings { league, season } => {
            if let Some(league_id) = league {
                standings::recompute_league_standings(db.pool(), league_id).await?;
                println!("standings recomputed for league {league_id}");
            } else {
                let season_id = match season {
                    Some(id) => id,
                    None => seasons::get_active_state(db.pool())
                        .await?
                        .season_id
                        .context("no active season; pass --season or --league")?,
                };
                standings::recompute_season_standings(db.pool(), season_id).await?;
                println!("standings recomputed for season {season_id}");
            }
        }
    }

    Ok(())
}

async fn resolve_episode(pool: &SqlitePool, episode: Option<Uuid>) -> anyhow::Result<Uuid> {
    if let Some(id) = episode {
        return Ok(id);
    }

    let state = seasons::get_active_state(pool).await?;
    let Some(id) = state.episode_id else {
        bail!("no active episode; pass --episode");
    };
    Ok(id)
}
