//! Operator console
//!
//! Text commands standing in for the toggle panel and pointer of a windowed
//! front end. Each command drives one viewer state transition and reports
//! the resulting state.

use city_engine::client::SceneClient;
use city_engine::routing::TraceOutcome;
use city_engine::{CityViewer, ViewerError};
use thiserror::Error;

/// Console failures
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Unrecognised command word
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    /// Command recognised but its arguments are not
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Viewer rejected the operation
    #[error(transparent)]
    Viewer(#[from] ViewerError),

    /// Generator request failed
    #[error("generator request failed: {0}")]
    Generator(#[from] city_engine::client::LoadError),

    /// Needs the HTTP generator but the scene came from a file
    #[error("no generator API configured (scene loaded from file)")]
    NoGenerator,
}

/// One parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List layers and their state
    Layers,
    /// List systems and their state
    Systems,
    /// Toggle a layer
    Layer(String, bool),
    /// Toggle a system
    System(String, bool),
    /// Pick at pixel coordinates, optionally over UI chrome
    Click { x: f32, y: f32, over_ui: bool },
    /// Pick an entity by id
    Pick(String),
    /// Clear the route highlight
    Clear,
    /// Show the active route
    Route,
    /// Show scene statistics
    Stats,
    /// Fetch the generator's cost report
    Cost,
    /// Fetch the generator's validation report
    Validation,
    /// Ask the generator to re-solve
    Solve,
    /// List commands
    Help,
    /// Exit
    Quit,
}

const HELP: &str = "\
layers                    list layers
systems                   list systems
layer <name> on|off       toggle a layer
system <name> on|off      toggle a system
click <px> <py> [ui]      pick at a pixel; 'ui' marks a click on UI chrome
pick <entity-id>          pick an entity directly
clear                     clear the route highlight
route                     show the active route
stats                     scene statistics
cost | validation | solve generator API requests
help                      this text
quit                      exit";

impl Command {
    /// Parse one console line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["layers"] => Self::Layers,
            ["systems"] => Self::Systems,
            ["layer", name, state] => Self::Layer((*name).to_string(), parse_switch(state, "layer <name> on|off")?),
            ["layer", ..] => return Err(ConsoleError::Usage("layer <name> on|off")),
            ["system", name, state] => {
                Self::System((*name).to_string(), parse_switch(state, "system <name> on|off")?)
            }
            ["system", ..] => return Err(ConsoleError::Usage("system <name> on|off")),
            ["click", x, y, rest @ ..] => {
                let usage = ConsoleError::Usage("click <px> <py> [ui]");
                let (Ok(x), Ok(y)) = (x.parse::<f32>(), y.parse::<f32>()) else {
                    return Err(usage);
                };
                let over_ui = match rest {
                    [] => false,
                    ["ui"] => true,
                    _ => return Err(usage),
                };
                Self::Click { x, y, over_ui }
            }
            ["click", ..] => return Err(ConsoleError::Usage("click <px> <py> [ui]")),
            ["pick", id] => Self::Pick((*id).to_string()),
            ["pick", ..] => return Err(ConsoleError::Usage("pick <entity-id>")),
            ["clear"] => Self::Clear,
            ["route"] => Self::Route,
            ["stats"] => Self::Stats,
            ["cost"] => Self::Cost,
            ["validation"] => Self::Validation,
            ["solve"] => Self::Solve,
            ["help"] => Self::Help,
            ["quit" | "exit"] => Self::Quit,
            [word, ..] => return Err(ConsoleError::Unknown((*word).to_string())),
            [] => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Whether the command needs a loaded scene
    pub fn needs_scene(&self) -> bool {
        !matches!(self, Self::Cost | Self::Validation | Self::Solve | Self::Help | Self::Quit)
    }
}

fn parse_switch(state: &str, usage: &'static str) -> Result<bool, ConsoleError> {
    match state {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ConsoleError::Usage(usage)),
    }
}

/// Run a command, returning the lines to print
pub fn execute(
    command: &Command,
    viewer: &mut CityViewer,
    client: Option<&SceneClient>,
) -> Result<Vec<String>, ConsoleError> {
    let lines = match command {
        Command::Layers => {
            let loaded = viewer.loaded().ok_or(ViewerError::NotReady)?;
            loaded
                .visibility
                .known_layers()
                .map(|layer| format!("{layer}: {}", on_off(loaded.visibility.is_layer_enabled(layer))))
                .collect()
        }
        Command::Systems => {
            let loaded = viewer.loaded().ok_or(ViewerError::NotReady)?;
            loaded
                .visibility
                .known_systems()
                .map(|system| format!("{system}: {}", on_off(loaded.visibility.is_system_enabled(system))))
                .collect()
        }
        Command::Layer(name, enabled) => {
            let visible = viewer.set_layer(name, *enabled)?;
            vec![format!("layer {name} {}: {visible} visible", on_off(*enabled))]
        }
        Command::System(name, enabled) => {
            let visible = viewer.set_system(name, *enabled)?;
            vec![format!("system {name} {}: {visible} visible", on_off(*enabled))]
        }
        Command::Click { x, y, over_ui } => match viewer.click(*x, *y, *over_ui)? {
            None => vec!["ignored (over UI)".to_string()],
            Some(outcome) => vec![describe(&outcome)],
        },
        Command::Pick(id) => vec![describe(&viewer.pick_entity(id)?)],
        Command::Clear => {
            viewer.clear_route()?;
            vec!["route cleared".to_string()]
        }
        Command::Route => vec![viewer
            .route_info()
            .map_or_else(|| "no route".to_string(), |info| info.display_text())],
        Command::Stats => {
            let stats = viewer.stats()?;
            vec![format!(
                "{} renderables, {} visible, {} skipped, {} materials, max height {:.1}",
                stats.renderables, stats.visible, stats.skipped, stats.materials, stats.max_height
            )]
        }
        Command::Cost => vec![pretty(&client.ok_or(ConsoleError::NoGenerator)?.fetch_cost()?)],
        Command::Validation => vec![pretty(&client.ok_or(ConsoleError::NoGenerator)?.fetch_validation()?)],
        Command::Solve => vec![pretty(&client.ok_or(ConsoleError::NoGenerator)?.trigger_solve()?)],
        Command::Help => HELP.lines().map(str::to_string).collect(),
        Command::Quit => Vec::new(),
    };
    Ok(lines)
}

fn describe(outcome: &TraceOutcome) -> String {
    match outcome {
        TraceOutcome::Cleared => "no route".to_string(),
        TraceOutcome::Highlighted(info) => info.display_text(),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
