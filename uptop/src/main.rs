//! Entry point for the uptop TUI. Parses args, resolves the API endpoint and runs the App.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tokio::sync::mpsc;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use uptop::api::MonitorApi;
use uptop::app::{App, PromptConfirm};
use uptop::profiles::{
    default_log_path, load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};
use uptop::transport::HttpTransport;
use uptop::Console;

#[derive(Parser, Debug)]
#[command(name = "uptop")]
#[command(about = "Terminal console for uptime monitoring targets")]
#[command(version)]
struct Args {
    /// API base URL (http://HOST:PORT)
    url: Option<String>,

    /// Connection profile to load, create or update
    #[arg(short = 'P', long)]
    profile: Option<String>,

    /// Overwrite an existing profile without asking
    #[arg(long)]
    save: bool,

    /// Extra CA certificate (PEM) trusted for https API URLs
    #[arg(short = 't', long = "tls-ca")]
    tls_ca: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Resolve the connection, save profile changes and print the URL without starting the UI
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(e) = init_logging(args.log_level, &log_path) {
        eprintln!("logging disabled ({}): {e}", log_path.display());
    }
    tracing::debug!(
        "Parsed command line arguments: url={:?}, profile={:?}, save={}, dry_run={}",
        args.url,
        args.profile,
        args.save,
        args.dry_run
    );

    let Some((url, tls_ca)) = resolve_connection(&args)? else {
        return Ok(());
    };

    if args.dry_run {
        println!("{url}");
        return Ok(());
    }

    tracing::info!("Starting uptop against {}", url);
    let transport = HttpTransport::new(&url, tls_ca.as_deref().map(Path::new))?;
    let (tx, rx) = mpsc::unbounded_channel();
    let console = Console::new(
        MonitorApi::new(Arc::new(transport)),
        Arc::new(PromptConfirm::new(tx)),
    );

    let mut app = App::new(console, rx, url);
    app.run().await
}

fn init_logging(level: Level, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    // RUST_LOG still wins when set
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Work out (url, tls_ca) from args and saved profiles; None means the user backed out.
fn resolve_connection(args: &Args) -> anyhow::Result<Option<(String, Option<String>)>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: args.profile.clone(),
        url: args.url.clone(),
        tls_ca: args.tls_ca.clone(),
    };
    let resolved = req.resolve(&profiles_file);

    let mut profiles_mut = profiles_file.clone();
    let conn = match resolved {
        ResolveProfile::Direct(u, t) => {
            // Possibly save if profile specified and --save or new entry
            if let Some(name) = args.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    tls_ca: t.clone(),
                };
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry);
                        save_or_warn(&profiles_mut);
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = args.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry);
                            save_or_warn(&profiles_mut);
                        }
                    }
                    Some(_) => {}
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|idx| (1..=names.len()).contains(idx))
                .and_then(|idx| profiles_mut.profiles.get(&names[idx - 1]));
            match picked {
                Some(entry) => (entry.url.clone(), entry.tls_ca.clone()),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter API URL (http://HOST:PORT or https://...): ")?;
            if url.trim().is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca_opt = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            profiles_mut.profiles.insert(
                name,
                ProfileEntry {
                    url: url.trim().to_string(),
                    tls_ca: ca_opt.clone(),
                },
            );
            save_or_warn(&profiles_mut);
            (url.trim().to_string(), ca_opt)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(conn))
}

fn save_or_warn(profiles: &uptop::profiles::ProfilesFile) {
    if let Err(e) = save_profiles(profiles) {
        tracing::warn!("Could not save profiles: {}", e);
        eprintln!("warning: could not save profiles: {e}");
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
