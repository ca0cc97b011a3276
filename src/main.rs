use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use spikeball_rounds::config::Config;
use spikeball_rounds::sheet::{self, TableSource};
use spikeball_rounds::transport::ResultTransport;
use spikeball_rounds::{resolver, view, Selection, Session, Snapshot};

#[derive(Parser)]
#[command(name = "spikeball")]
#[command(
    about = "Show your doubles tournament grouping and submit match results",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, follow your rounds as they are posted, and submit results
    Play {
        /// Email used on the interest form (prompted for when omitted)
        #[arg(short, long, env = "SPIKEBALL_EMAIL")]
        email: Option<String>,
    },

    /// Look up a player on the roster
    Lookup {
        #[arg(short, long)]
        email: String,
    },

    /// Print a player's current round once
    Round {
        #[arg(short, long)]
        email: String,
    },

    /// Check the roster and round table for rows that can't be used
    Validate,
}

enum Exit {
    Logout,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { email } => play(&cli.config, email)?,
        Commands::Lookup { email } => lookup(&cli.config, &email)?,
        Commands::Round { email } => round(&cli.config, &email)?,
        Commands::Validate => validate(&cli.config)?,
    }

    Ok(())
}

/// Forward stdin lines to the session loop so waiting for input never stalls polling
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn play(config: &Config, mut email: Option<String>) -> Result<()> {
    let roster = config.roster_source().context("Failed to set up roster source")?;
    let input = spawn_input_reader();
    let mut error = None;

    loop {
        let email = match email.take() {
            Some(email) => email,
            None => {
                print!("{}", view::render_login(config.interest_form.as_deref(), error));
                match input.recv() {
                    Ok(line) => line,
                    Err(_) => return Ok(()),
                }
            }
        };
        if matches!(email.trim(), "q" | "quit") {
            return Ok(());
        }

        let rounds = config.rounds_source().context("Failed to set up round table source")?;
        let transport = config.transport().context("Failed to set up results form")?;

        match Session::login(&email, &roster, rounds, transport) {
            Ok(session) => {
                error = None;
                match run_session(session, &input, config) {
                    Exit::Logout => continue,
                    Exit::Quit => return Ok(()),
                }
            }
            Err(e) => {
                log::warn!("Login failed for '{}': {}", email.trim(), e);
                error = Some(view::login_message(&e));
            }
        }
    }
}

fn run_session<S: TableSource>(
    mut session: Session<S, Box<dyn ResultTransport>>,
    input: &Receiver<String>,
    config: &Config,
) -> Exit {
    let interval = config.poll_interval();
    let mut selection = Selection::new();
    let mut next_poll = Instant::now() + interval;

    print!("{}", view::render_round(session.snapshot(), &selection));

    loop {
        let wait = next_poll.saturating_duration_since(Instant::now());
        match input.recv_timeout(wait) {
            Ok(line) => match line.trim() {
                "q" | "quit" => return Exit::Quit,
                "logout" => {
                    session.logout();
                    return Exit::Logout;
                }
                "" => print!("{}", view::render_round(session.snapshot(), &selection)),
                picks => {
                    selection = Selection::from_input(picks);
                    let result = session.submit(&selection);
                    print!("{}", view::render_round(session.snapshot(), &selection));
                    println!("{}", view::submit_message(&result));
                }
            },
            Err(RecvTimeoutError::Timeout) => {
                next_poll = Instant::now() + interval;
                match session.poll() {
                    Ok(true) => {
                        selection = Selection::new();
                        print!("{}", view::render_round(session.snapshot(), &selection));
                    }
                    Ok(false) => {}
                    Err(e) => log::warn!("Poll failed, keeping last known round: {}", e),
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Exit::Quit,
        }
    }
}

fn lookup(config: &Config, email: &str) -> Result<()> {
    let roster = config.roster_source()?;
    let content = roster.fetch().context("Failed to fetch roster")?;

    match sheet::find_user(&content, email) {
        Ok(user) => {
            println!("Player {}: {}", user.id, user.name);
            println!("  Email: {}", user.email);
            println!("  Roster row: {}", user.row);
        }
        Err(e) => println!("{}", view::login_message(&e)),
    }
    Ok(())
}

fn round(config: &Config, email: &str) -> Result<()> {
    let roster = config.roster_source()?;
    let content = roster.fetch().context("Failed to fetch roster")?;
    let user = match sheet::find_user(&content, email) {
        Ok(user) => user,
        Err(e) => {
            println!("{}", view::login_message(&e));
            return Ok(());
        }
    };

    let rounds = config.rounds_source()?;
    let table = sheet::read_rounds(&rounds.fetch().context("Failed to fetch round table")?)
        .context("Failed to read round table")?;

    let played: Vec<u32> = resolver::rounds_for(user.id, &table.rounds)
        .iter()
        .map(|r| r.number)
        .collect();
    let snapshot = Snapshot {
        current: resolver::resolve(user.id, &table.rounds).cloned(),
        ..Snapshot::new(user)
    };

    print!("{}", view::render_round(&snapshot, &Selection::new()));
    if !played.is_empty() {
        println!("Rounds so far: {:?}", played);
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    let roster = config.roster_source()?;
    let users = sheet::read_roster(&roster.fetch().context("Failed to fetch roster")?)
        .context("Failed to read roster")?;
    println!("Roster: {}", config.roster);
    println!("  {} players", users.len());

    let mut ids: Vec<_> = users.iter().map(|u| u.id).collect();
    ids.sort();
    let before = ids.len();
    ids.dedup();
    if ids.len() != before {
        println!("  Warning: {} duplicate player ids", before - ids.len());
    }

    let rounds = config.rounds_source()?;
    let table = sheet::read_rounds(&rounds.fetch().context("Failed to fetch round table")?)
        .context("Failed to read round table")?;
    println!("Round table: {}", config.rounds);
    println!("  {} rounds", table.rounds.len());

    let mut issues: Vec<String> = table.rejected.iter().map(|e| e.to_string()).collect();
    for round in &table.rounds {
        for player in round.players {
            if ids.binary_search(&player).is_err() {
                issues.push(format!(
                    "Round {} net {}: player {} is not on the roster",
                    round.number, round.net, player
                ));
            }
        }
    }

    if issues.is_empty() {
        println!("  No issues found");
    } else {
        println!("  Issues found:");
        for issue in issues {
            println!("    - {}", issue);
        }
    }

    Ok(())
}
