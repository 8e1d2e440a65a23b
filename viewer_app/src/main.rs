//! City viewer application
//!
//! Loads configuration, fetches the scene in the background and runs the
//! operator console on a fixed tick until `quit`, end of input, or the end
//! of a script.

mod console;

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use city_engine::client::{FileSceneSource, HttpSceneSource, SceneClient, SceneSource};
use city_engine::config::Config;
use city_engine::core::config::ViewerConfig;
use city_engine::foundation::logging;
use city_engine::render::HeadlessBackend;
use city_engine::CityViewer;

use console::Command;

/// Inspect a generated city scene
#[derive(Debug, Parser)]
#[command(name = "city_viewer", version, about)]
struct Args {
    /// Configuration file (.toml or .ron)
    #[arg(long, default_value = "city_viewer.toml")]
    config: PathBuf,

    /// Generator API base URL, overrides the config file
    #[arg(long)]
    api: Option<String>,

    /// Load the scene document from a JSON file instead of the API
    #[arg(long)]
    file: Option<PathBuf>,

    /// Run console commands from a file, then exit
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

/// Where console lines come from
enum Input {
    /// Interactive lines read by a helper thread
    Stdin(Receiver<String>),
    /// Pre-read script lines
    Script(VecDeque<String>),
}

impl Input {
    /// Next line if one is available without blocking; `Err(())` at end of input
    fn next_line(&mut self) -> Result<Option<String>, ()> {
        match self {
            Self::Stdin(rx) => match rx.try_recv() {
                Ok(line) => Ok(Some(line)),
                Err(TryRecvError::Empty) => Ok(None),
                Err(TryRecvError::Disconnected) => Err(()),
            },
            Self::Script(lines) => lines.pop_front().map(Some).ok_or(()),
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = ViewerConfig::load_or_default(&args.config)?;
    if let Some(api) = args.api {
        config = config.with_api_base_url(api);
    }
    if let Some(level) = args.log_level {
        config = config.with_log_level(level);
    }
    config.validate()?;

    logging::init_with_level(&config.log_level);
    log::info!("Starting city viewer");

    let (source, client): (Box<dyn SceneSource>, Option<SceneClient>) = match &args.file {
        Some(path) => (Box::new(FileSceneSource::new(path)), None),
        None => {
            let client = SceneClient::from_config(&config)?;
            (Box::new(HttpSceneSource::new(client.clone())), Some(client))
        }
    };

    let mut input = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Input::Script(text.lines().map(str::to_string).collect())
        }
        None => Input::Stdin(spawn_stdin_reader()),
    };

    let tick = Duration::from_millis(config.tick_interval_ms.max(1));
    let mut viewer = CityViewer::new(config);
    let mut backend = HeadlessBackend::new();
    viewer.begin_load(source);
    println!("Loading scene... (type 'help' for commands)");

    let mut held: Option<Command> = None;
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let was_ready = viewer.is_ready();
        viewer.tick(dt, &mut backend);
        if !was_ready && viewer.is_ready() {
            if let Ok(stats) = viewer.stats() {
                println!("Scene ready: {} renderables, {} visible", stats.renderables, stats.visible);
            }
        }
        if let Some(message) = viewer.failure().map(str::to_string) {
            eprintln!("Scene load failed: {message}");
            viewer.shutdown();
            return Err(message.into());
        }

        // Commands that need the scene wait until it has arrived
        let command = match held.take() {
            Some(command) => Some(command),
            None => match input.next_line() {
                Ok(Some(line)) => match Command::parse(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{err}");
                        None
                    }
                },
                Ok(None) => None,
                Err(()) => break,
            },
        };

        if let Some(command) = command {
            if command.needs_scene() && !viewer.is_ready() {
                held = Some(command);
            } else if command == Command::Quit {
                break;
            } else {
                match console::execute(&command, &mut viewer, client.as_ref()) {
                    Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
                    Err(err) => println!("{err}"),
                }
            }
        }

        thread::sleep(tick);
    }

    viewer.shutdown();
    log::info!("Frames rendered: {}", backend.stats().frames);
    Ok(())
}
