//! Console mirror: follows the relay, logs every change and turns stdin lines into requests.

use std::env;

use anyhow::Context;
use scoreboard_relay::{
    catalog::TeamCatalog,
    client::{self, MirrorCommand, MirrorOptions, MirrorView},
    config::AppConfig,
    state::match_state::{SideIndex, format_clock},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const URL_ENV: &str = "SCOREBOARD_URL";
const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let url = env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_URL.into());
    let catalog = AppConfig::load().catalog().clone();
    let options = MirrorOptions {
        catalog: catalog.clone(),
        ..MirrorOptions::new(url)
    };
    let handle = client::spawn(options);

    let mut view = handle.view();
    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let snapshot = view.borrow_and_update().clone();
            render(&snapshot, &catalog);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if matches!(line, "q" | "quit" | "exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Some(command) => handle.request(command).context("mirror stopped")?,
            None => warn!(input = %line, "unrecognized command"),
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Map a console line to a request.
///
/// `1`/`2` add a goal, `!`/`@` remove one, `p` toggles the clock,
/// `r` resets it. Longer forms: `team <1|2> [KEY]`, `score <1|2> <delta>`,
/// `start`, `pause`, `set <minutes>`, `reset`.
fn parse_command(line: &str) -> Option<MirrorCommand> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "1" => MirrorCommand::ScoreDelta {
            side: SideIndex::Home,
            delta: 1,
        },
        "2" => MirrorCommand::ScoreDelta {
            side: SideIndex::Away,
            delta: 1,
        },
        "!" => MirrorCommand::ScoreDelta {
            side: SideIndex::Home,
            delta: -1,
        },
        "@" => MirrorCommand::ScoreDelta {
            side: SideIndex::Away,
            delta: -1,
        },
        "p" => MirrorCommand::TimerToggle,
        "r" => MirrorCommand::TimerReset,
        "start" => MirrorCommand::TimerStart,
        "pause" => MirrorCommand::TimerPause,
        "reset" => MirrorCommand::FullReset,
        "set" => MirrorCommand::TimerSetMinutes(words.next()?.parse().ok()?),
        "team" => MirrorCommand::TeamChange {
            side: parse_side(words.next()?)?,
            key: words.next().map(str::to_string),
        },
        "score" => MirrorCommand::ScoreDelta {
            side: parse_side(words.next()?)?,
            delta: words.next()?.parse().ok()?,
        },
        _ => return None,
    };
    words.next().is_none().then_some(command)
}

fn parse_side(word: &str) -> Option<SideIndex> {
    SideIndex::from_wire(word.parse().ok()?)
}

fn render(view: &MirrorView, catalog: &TeamCatalog) {
    let state = &view.state;
    info!(
        connected = view.connected,
        home = %state.team1.name,
        home_score = state.team1.score,
        away = %state.team2.name,
        away_score = state.team2.score,
        clock = %format_clock(state.timer.seconds),
        running = state.timer.running,
        home_color = catalog.accent_color(&state.team1.key),
        away_color = catalog.accent_color(&state.team2.key),
        "scoreboard"
    );
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
