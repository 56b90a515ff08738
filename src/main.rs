//! TeamHub CLI
//!
//! Command-line front-end for the team and jury platform:
//! - Log in and out
//! - Inspect the cached profile and teams
//! - Manage team membership and artifacts
//! - Review team artifacts as a jury member
//! - Check what the navigation guard allows

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use teamhub::api::{
    ApiClient, ApiError, ArtifactReview, Credentials, NewTeam, NewUser, RoleChange, TeamArtifacts,
    TeamInvite,
};
use teamhub::config::{generate_default_config, Config};
use teamhub::router::{Navigation, Router};
use teamhub::storage::FileStorage;
use teamhub::store::{Store, StoreResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "teamhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the team and jury platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Platform API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Data directory for the persisted session (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and keep the token
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        university: String,
        #[arg(long)]
        study_info: String,
        #[arg(long)]
        project_role: Option<String>,
    },

    /// Forget the token and cached data
    Logout,

    /// Show session state
    Status,

    /// Show the profile
    Profile {
        /// Show the cached copy without contacting the server
        #[arg(long)]
        cached: bool,
    },

    /// Show the teams you lead or belong to
    Teams {
        /// Show the cached copy without contacting the server
        #[arg(long)]
        cached: bool,
    },

    /// Change your role
    ChangeRole { role: String },

    /// Create a team you lead
    CreateTeam {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Invite a user into a team (team lead only)
    Invite { team: String, username: String },

    /// List the members of a team
    Members { team: String },

    /// Show or update a team's artifacts
    Artifacts {
        team: String,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        figma: Option<String>,
        #[arg(long)]
        hosting: Option<String>,
        #[arg(long)]
        presentation: Option<String>,
        #[arg(long)]
        extra: Option<String>,
    },

    /// Leave a team (deletes it when you are the lead)
    Leave { team: String },

    /// Jury review workflow
    Jury {
        #[command(subcommand)]
        action: JuryCommands,
    },

    /// Run the navigation guard for a path
    Navigate { path: String },

    /// List all routes
    Routes,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum JuryCommands {
    /// Teams waiting for your review
    Pending,

    /// Teams you have already reviewed
    Reviewed,

    /// Show a team's artifacts, members and case
    Show { team: String },

    /// Score a team's artifacts (1-10 per criterion)
    Review {
        team: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        criterion_1: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        criterion_2: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        criterion_3: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        criterion_4: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        criterion_5: u8,
        #[arg(short, long)]
        comment: Option<String>,
        /// Replace your earlier review instead of submitting a new one
        #[arg(long)]
        update: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_path());
    let storage = FileStorage::open_or_reset(&data_dir)
        .with_context(|| format!("opening storage in {:?}", data_dir))?;
    let api = ApiClient::http(&config.api.base_url, config.api.request_timeout())?;
    let store = Store::restore(api, Arc::new(storage));
    let router = Router::new();

    tracing::debug!("Using API at {}", config.api.base_url);

    match cli.command {
        Commands::Login { username, password } => {
            if router.navigate("/login", &store.session()) != Navigation::Allow {
                println!("Already logged in. Run `teamhub logout` first.");
                return Ok(());
            }

            store.login(&Credentials { username, password }).await?;
            store.fetch_profile().await;
            println!("Logged in");
        }

        Commands::Register {
            username,
            email,
            password,
            full_name,
            phone,
            university,
            study_info,
            project_role,
        } => {
            if router.navigate("/register", &store.session()) != Navigation::Allow {
                println!("Already logged in. Run `teamhub logout` first.");
                return Ok(());
            }

            let user = NewUser {
                username,
                email,
                password,
                full_name,
                phone,
                university,
                study_info,
                project_role,
            };
            let response = store.register(&user).await?;
            print_value(&cli.format, &response)?;
        }

        Commands::Logout => {
            store.logout();
            println!("Logged out");
        }

        Commands::Status => {
            let session = store.session();
            println!("TeamHub v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API:        {}", config.api.base_url);
            println!("Data dir:   {:?}", data_dir);
            println!(
                "Session:    {}",
                if session.is_authenticated() {
                    "authenticated"
                } else {
                    "anonymous"
                }
            );
            if let Some(role) = store.profile().get("role_name").and_then(Value::as_str) {
                println!("Role:       {}", role);
            }
        }

        Commands::Profile { cached } => {
            require(&router, &store, "/account")?;
            if !cached {
                store.try_fetch_profile().await?;
            }
            print_value(&cli.format, &store.profile())?;
        }

        Commands::Teams { cached } => {
            require(&router, &store, "/team-account")?;
            if !cached {
                store.try_fetch_my_team().await?;
            }
            print_value(&cli.format, &store.team())?;
        }

        Commands::ChangeRole { role } => {
            require(&router, &store, "/account")?;
            store.put_change_role(&RoleChange { role_name: role }).await?;
            print_value(&cli.format, &store.profile())?;
        }

        Commands::CreateTeam { name, description } => {
            require(&router, &store, "/find-team")?;
            let response = store
                .post_create_team(&NewTeam {
                    team_name: name,
                    description,
                })
                .await?;
            print_value(&cli.format, &response)?;
        }

        Commands::Invite { team, username } => {
            require(&router, &store, "/team-account")?;
            let invite = TeamInvite {
                team_name: team.clone(),
                username,
            };
            let response = store.put_in_team(&invite, &team).await?;
            print_value(&cli.format, &response)?;
        }

        Commands::Members { team } => {
            require(&router, &store, "/team-account")?;
            let members = store.fetch_team_members(&team).await?;
            print_value(&cli.format, &members)?;
        }

        Commands::Artifacts {
            team,
            github,
            figma,
            hosting,
            presentation,
            extra,
        } => {
            require(&router, &store, "/team-account")?;
            let artifacts = TeamArtifacts {
                github_url: github,
                figma_url: figma,
                hosting_url: hosting,
                presentation_url: presentation,
                extra_links: extra,
            };

            let response = if artifacts == TeamArtifacts::default() {
                store.fetch_team_artifacts(&team).await?
            } else {
                store.put_team_data(&artifacts, &team).await?
            };
            print_value(&cli.format, &response)?;
        }

        Commands::Leave { team } => {
            require(&router, &store, "/team-account")?;
            let response = store.delete_from_team(&team).await?;
            print_value(&cli.format, &response)?;
        }

        Commands::Jury { action } => match action {
            JuryCommands::Pending => {
                require(&router, &store, "/jury-team-list")?;
                let teams = or_empty(store.fetch_pending_reviews().await)?;
                print_value(&cli.format, &teams)?;
            }

            JuryCommands::Reviewed => {
                require(&router, &store, "/jury-team-list")?;
                let teams = or_empty(store.fetch_reviewed_teams().await)?;
                print_value(&cli.format, &teams)?;
            }

            JuryCommands::Show { team } => {
                require(&router, &store, "/jury")?;
                let artifacts = store.fetch_review_artifacts(&team).await?;
                print_value(&cli.format, &artifacts)?;
            }

            JuryCommands::Review {
                team,
                criterion_1,
                criterion_2,
                criterion_3,
                criterion_4,
                criterion_5,
                comment,
                update,
            } => {
                require(&router, &store, "/jury")?;
                let review = ArtifactReview {
                    criterion_1,
                    criterion_2,
                    criterion_3,
                    criterion_4,
                    criterion_5,
                    comment,
                };

                let response = if update {
                    store.put_review(&review, &team).await?
                } else {
                    store.post_review(&review, &team).await?
                };
                print_value(&cli.format, &response)?;
            }
        },

        Commands::Navigate { path } => {
            let decision = router.navigate(&path, &store.session());
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                match decision {
                    Navigation::Allow => {
                        let view = router
                            .resolve(&path)
                            .map(|r| r.view.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!("allow {} ({})", path, view);
                    }
                    Navigation::Redirect(to) => println!("redirect {} -> {}", path, to),
                }
            }
        }

        Commands::Routes => {
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(router.routes())?);
            } else {
                println!("{:<18} {:<14} {:<18} {}", "Path", "Name", "View", "Auth");
                println!("{}", "-".repeat(56));
                for route in router.routes() {
                    println!(
                        "{:<18} {:<14} {:<18} {}",
                        route.path,
                        route.name,
                        route.view.to_string(),
                        if route.requires_auth { "yes" } else { "no" }
                    );
                }
            }
        }

        // Written before the store is opened.
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(config.logging.filter_directive())
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Fail unless the guard lets the current session open `path`
fn require(router: &Router, store: &Store, path: &str) -> anyhow::Result<()> {
    match router.navigate(path, &store.session()) {
        Navigation::Allow => Ok(()),
        Navigation::Redirect(to) => {
            bail!("{} is not available (redirected to {}). Run `teamhub login` first.", path, to)
        }
    }
}

/// The review lists answer 404 when they are empty
fn or_empty(result: StoreResult<Value>) -> StoreResult<Value> {
    match result {
        Err(e) if e.as_api().and_then(ApiError::status) == Some(404) => {
            Ok(serde_json::json!({ "teams": [] }))
        }
        other => other,
    }
}

fn print_value(format: &str, value: &Value) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(value)?),
        _ => match value {
            Value::Null => println!("(nothing)"),
            Value::String(s) => println!("{}", s),
            Value::Object(map) => {
                for (key, val) in map {
                    match val {
                        Value::String(s) => println!("{:<18} {}", key, s),
                        other => println!("{:<18} {}", key, other),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    println!("{}", item);
                }
            }
            other => println!("{}", other),
        },
    }
    Ok(())
}
