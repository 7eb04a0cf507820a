//! CLI driver for panegrid - builds a grid from a JSON config, replays an
//! input script and prints the resulting state as JSON.
//!
//! Usage:
//!   panegrid_cli <config.json>                              # Initial state
//!   panegrid_cli <config.json> "focus:1:1,ArrowRight,Shift+End"
//!   panegrid_cli <config.json> <script> --viewport 800x600 -o out.json
//!
//! Script steps are comma separated: a DOM key name with optional `Shift+`,
//! `Ctrl+` or `Meta+` prefixes, `focus:<row>:<col>`, `click:<x>:<y>`,
//! `wheel:<dx>:<dy>` or `tick`. Set `RUST_LOG=debug` for engine logging.

use std::env;
use std::fs;
use std::process::ExitCode;

use serde::Serialize;

use panegrid::{CompositeGrid, GridConfig, GridSnapshot, Modifiers, NavKey, Point, RenderQueue, Size};

const DEFAULT_VIEWPORT: Size = Size { width: 800.0, height: 600.0 };
const SCROLLBAR: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Key(NavKey, Modifiers),
    Focus(u32, u32),
    Click(Point, Modifiers),
    Wheel(f64, f64),
    Tick,
}

#[derive(Serialize)]
struct StepResult {
    input: String,
    handled: bool,
}

#[derive(Serialize)]
struct Report {
    steps: Vec<StepResult>,
    commands: usize,
    state: GridSnapshot,
}

fn parse_modifiers(token: &str) -> (Modifiers, &str) {
    let mut mods = Modifiers::NONE;
    let mut rest = token;
    loop {
        if let Some(r) = rest.strip_prefix("Shift+") {
            mods.shift = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("Ctrl+") {
            mods.ctrl = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("Meta+") {
            mods.meta = true;
            rest = r;
        } else {
            return (mods, rest);
        }
    }
}

fn pair<T: std::str::FromStr>(args: &str, token: &str) -> Result<(T, T), String> {
    let (a, b) = args.split_once(':').ok_or_else(|| format!("expected two values in '{token}'"))?;
    let a = a.parse().map_err(|_| format!("bad number in '{token}'"))?;
    let b = b.parse().map_err(|_| format!("bad number in '{token}'"))?;
    Ok((a, b))
}

fn parse_step(token: &str) -> Result<Step, String> {
    let (mods, rest) = parse_modifiers(token.trim());
    if rest == "tick" {
        return Ok(Step::Tick);
    }
    if let Some(args) = rest.strip_prefix("focus:") {
        let (row, col) = pair(args, token)?;
        return Ok(Step::Focus(row, col));
    }
    if let Some(args) = rest.strip_prefix("click:") {
        let (x, y) = pair(args, token)?;
        return Ok(Step::Click(Point::new(x, y), mods));
    }
    if let Some(args) = rest.strip_prefix("wheel:") {
        let (dx, dy) = pair(args, token)?;
        return Ok(Step::Wheel(dx, dy));
    }
    NavKey::from_dom_key(rest, mods.is_additive())
        .map(|key| Step::Key(key, mods))
        .ok_or_else(|| format!("unknown step '{token}'"))
}

/// Steps paired with the token they came from.
fn parse_script(script: &str) -> Result<Vec<(String, Step)>, String> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| parse_step(t).map(|step| (t.to_string(), step)))
        .collect()
}

fn parse_viewport(arg: &str) -> Result<Size, String> {
    let (w, h) = arg.split_once('x').ok_or_else(|| format!("viewport must be WxH, got '{arg}'"))?;
    let w = w.parse().map_err(|_| format!("bad viewport width '{w}'"))?;
    let h = h.parse().map_err(|_| format!("bad viewport height '{h}'"))?;
    Ok(Size::new(w, h))
}

fn apply(grid: &mut CompositeGrid, step: &Step) -> bool {
    match *step {
        Step::Key(key, mods) => grid.key_down(key, mods),
        Step::Focus(row, col) => grid.focus(row, col),
        Step::Click(point, mods) => {
            let hit = grid.pointer_down(point, mods);
            grid.pointer_up(point);
            hit
        }
        Step::Wheel(dx, dy) => {
            let before = grid.scroll_state().logical();
            grid.wheel(dx, dy);
            grid.scroll_state().logical() != before
        }
        Step::Tick => grid.on_tick(),
    }
}

struct Args {
    config: String,
    script: Option<String>,
    viewport: Size,
    output: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config = None;
    let mut script = None;
    let mut viewport = DEFAULT_VIEWPORT;
    let mut output = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => output = Some(args.next().ok_or("-o needs a path")?),
            "--viewport" => viewport = parse_viewport(&args.next().ok_or("--viewport needs WxH")?)?,
            _ if config.is_none() => config = Some(arg),
            _ if script.is_none() => script = Some(arg),
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
    }
    let config = config.ok_or("Usage: panegrid_cli <config.json> [script] [--viewport WxH] [-o output.json]")?;
    Ok(Args { config, script, viewport, output })
}

fn run() -> Result<(), String> {
    let args = parse_args(env::args().skip(1))?;
    let json = fs::read_to_string(&args.config).map_err(|e| format!("Error reading {}: {e}", args.config))?;
    let config = GridConfig::from_json(&json).map_err(|e| format!("Error in {}: {e}", args.config))?;
    let steps = parse_script(args.script.as_deref().unwrap_or(""))?;

    let mut grid = CompositeGrid::new(&config, RenderQueue::new(args.viewport, SCROLLBAR))
        .map_err(|e| format!("Error building grid: {e}"))?;
    let mut results = Vec::with_capacity(steps.len());
    for (input, step) in steps {
        let handled = apply(&mut grid, &step);
        tracing::debug!(%input, handled, "step applied");
        results.push(StepResult { input, handled });
    }

    let report = Report { steps: results, commands: grid.renderer().commands().len(), state: grid.snapshot() };
    let json = serde_json::to_string_pretty(&report).map_err(|e| format!("Error serializing JSON: {e}"))?;
    match args.output {
        Some(path) => {
            fs::write(&path, &json).map_err(|e| format!("Error writing {path}: {e}"))?;
            eprintln!("Written: {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
