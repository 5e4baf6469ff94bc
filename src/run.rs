/// Application runner
///
/// Builds the dependency graph (token provider → API clients → typed
/// clients), checks the session, shows the listening history, then
/// drives the interactive agent conversation loop.
use crate::api::{ApiClient, ReqwestTransport};
use crate::auth::{AuthClient, StoredTokenProvider, TokenProvider, TokenStore};
use crate::chat::{AgentKind, ChatClient, ChatMessage};
use crate::config::get_config_clone;
use crate::error::{AppError, AppResult};
use crate::logger::{self, LogTag};
use crate::music::{MusicClient, PlayHistoryItem, Track};
use comfy_table::Table;
use std::io::{self, Write};
use std::sync::Arc;

/// Everything the interactive loop needs, built once at startup
pub struct App {
    pub tokens: Arc<dyn TokenProvider>,
    pub provider_api: Arc<ApiClient>,
    pub backend_api: Arc<ApiClient>,
    pub music: MusicClient,
    pub chat: ChatClient,
}

/// Construct the dependency graph from configuration
///
/// Explicit construction and injection; no client singletons.
pub fn build_app() -> AppResult<App> {
    let cfg = get_config_clone();

    let store = TokenStore::at_default_path();
    let auth = AuthClient::new(cfg.backend.base_url.clone(), cfg.backend.timeout_seconds)?;
    let tokens: Arc<dyn TokenProvider> = Arc::new(StoredTokenProvider::new(store, auth));

    let provider_transport = Arc::new(
        ReqwestTransport::new(cfg.provider.timeout_seconds).map_err(AppError::Config)?,
    );
    let backend_transport =
        Arc::new(ReqwestTransport::new(cfg.backend.timeout_seconds).map_err(AppError::Config)?);

    let provider_api = Arc::new(ApiClient::new(
        "provider",
        cfg.provider.base_url.clone(),
        provider_transport,
        tokens.clone(),
    ));
    let backend_api = Arc::new(ApiClient::new(
        "backend",
        cfg.backend.base_url.clone(),
        backend_transport,
        tokens.clone(),
    ));

    Ok(App {
        tokens,
        music: MusicClient::new(provider_api.clone()),
        chat: ChatClient::new(backend_api.clone()),
        provider_api,
        backend_api,
    })
}

/// Main interactive flow
pub async fn run_app() -> AppResult<()> {
    let app = build_app()?;

    if app.tokens.access_token().await.is_none() {
        println!("Not signed in. Start with --auth-code <code> to create a session.");
        return Ok(());
    }

    match app.music.get_profile().await {
        Ok(profile) => {
            let name = profile.display_name.unwrap_or(profile.id);
            logger::info(LogTag::System, &format!("Signed in as {}", name));
        }
        Err(e) => {
            logger::warning(LogTag::System, &format!("Could not load profile: {}", e));
        }
    }

    let recent = app.music.get_recently_played(20).await?;
    if recent.items.is_empty() {
        println!("No recently played tracks on this account.");
        return Ok(());
    }

    print_history_table(&recent.items);
    println!();
    println!("Pick a track number to talk about it, or 'quit' to exit.");

    run_conversation_loop(&app, &recent.items).await
}

fn print_history_table(items: &[PlayHistoryItem]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Title", "Artist", "Album", "Length", "Played At"]);

    for (i, item) in items.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            item.track.name.clone(),
            item.track.artist_names(),
            item.track.album.name.clone(),
            item.track.duration_display(),
            item.played_at.clone(),
        ]);
    }

    println!("{}", table);
}

fn print_agent_list() {
    println!("Agents:");
    for agent in AgentKind::ALL {
        let profile = agent.profile();
        println!(
            "  {:<12} {} - {}",
            agent.as_str(),
            profile.display_name,
            profile.description
        );
    }
}

async fn run_conversation_loop(app: &App, items: &[PlayHistoryItem]) -> AppResult<()> {
    let cfg = get_config_clone();
    let mut selected: Option<Track> = None;
    let mut agent = AgentKind::parse(&cfg.chat.default_agent).unwrap_or(AgentKind::Historian);
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        let prompt = match &selected {
            Some(track) => format!("{} ({})> ", track.name, agent),
            None => "track> ".to_string(),
        };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break; // EOF
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }
        if input == "agents" {
            print_agent_list();
            continue;
        }
        if let Some(name) = input.strip_prefix("agent ") {
            match AgentKind::parse(name.trim()) {
                Some(kind) => {
                    agent = kind;
                    history.clear();
                    println!("Now talking with {}.", agent.profile().display_name);
                }
                None => println!("Unknown agent '{}'. Try 'agents' for the list.", name.trim()),
            }
            continue;
        }

        // A bare number selects a track from the table
        if let Ok(index) = input.parse::<usize>() {
            match items.get(index.saturating_sub(1)) {
                Some(item) if index >= 1 => {
                    println!(
                        "Selected: {} - {}",
                        item.track.name,
                        item.track.artist_names()
                    );
                    selected = Some(item.track.clone());
                    history.clear();
                }
                _ => println!("No track #{} in the table.", index),
            }
            continue;
        }

        // Anything else is a chat message for the current agent
        let Some(track) = selected.clone() else {
            println!("Pick a track number first.");
            continue;
        };

        history.push(ChatMessage::user(input));
        trim_history(&mut history, cfg.chat.max_history_turns);

        match app.chat.send_turn(agent, &track, &history).await {
            Ok(turn) => {
                println!("{}: {}", agent.profile().display_name, turn.reply);
                history.push(ChatMessage::assistant(turn.reply));
            }
            Err(e) => {
                println!("Agent unavailable: {}", e);
                history.pop();
            }
        }
    }

    logger::info(LogTag::System, "Session ended");
    Ok(())
}

/// Keep at most `max_turns` user+assistant pairs
fn trim_history(history: &mut Vec<ChatMessage>, max_turns: usize) {
    let max_messages = max_turns * 2;
    if history.len() > max_messages {
        let excess = history.len() - max_messages;
        history.drain(..excess);
    }
}

/// Initial login: exchange an authorization code for a stored session
pub async fn run_auth_code_exchange(code: &str) -> AppResult<()> {
    let cfg = get_config_clone();
    let auth = AuthClient::new(cfg.backend.base_url, cfg.backend.timeout_seconds)?;
    let store = TokenStore::at_default_path();

    let tokens = auth.exchange_code(code).await?;
    store.save(&tokens).map_err(|e| AppError::Auth(e.to_string()))?;

    logger::info(LogTag::Auth, "Session created and stored");
    println!("Signed in. Run trackchat again to browse your music.");
    Ok(())
}

/// Logout: drop the stored session and all cached responses
pub fn run_logout() -> AppResult<()> {
    let store = TokenStore::at_default_path();
    store.clear().map_err(|e| AppError::Auth(e.to_string()))?;

    // Caches are per-instance; clear them in case a live process logs
    // out in place
    if let Ok(app) = build_app() {
        app.provider_api.clear_cache();
        app.backend_api.clear_cache();
    }

    logger::info(LogTag::Auth, "Session cleared");
    println!("Signed out.");
    Ok(())
}
