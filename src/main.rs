//! CueLab: step through a script of MIDI notes from the terminal.
//!
//! Runs the two-panel TUI by default, or a line-oriented loop reading
//! commands from stdin with `--headless`.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use cuelab::config::CueConfig;
use cuelab::control::{control_channel, parse_command, ControlCommand};
use cuelab::logging::{CueLogger, LogTarget, SharedLog};
use cuelab::midi::{LogSink, MidiOutput, NoteSink};
use cuelab::player::{Navigation, Player};
use cuelab::storage;
use cuelab::tui::App;

#[derive(Debug, Parser)]
#[command(name = "cuelab", version, about = "Step through a script of MIDI notes")]
struct Cli {
    /// Script file (defaults to the configured path, usually notes.txt).
    script: Option<PathBuf>,

    /// Name of the virtual output port to create.
    #[arg(long)]
    port: Option<String>,

    /// Connect to an existing output port whose name contains this text.
    #[arg(long)]
    device: Option<String>,

    /// List MIDI output ports and exit.
    #[arg(long)]
    list_ports: bool,

    /// Log notes instead of sending them.
    #[arg(long)]
    dry_run: bool,

    /// Read commands from stdin instead of running the TUI.
    #[arg(long)]
    headless: bool,

    /// Config file to use instead of ~/.cuelab/config.yaml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Only save on Ctrl-S.
    #[arg(long)]
    no_autosave: bool,

    /// Milliseconds to hold after sending note-ons.
    #[arg(long)]
    hold_ms: Option<u64>,
}

impl Cli {
    fn resolve_config(&self) -> CueConfig {
        let mut config = match self.config {
            Some(ref path) => CueConfig::load_from(path),
            None => CueConfig::load(),
        }
        .unwrap_or_default();

        if let Some(ref script) = self.script {
            config.script_path = script.clone();
        }
        if let Some(ref port) = self.port {
            config.midi.port_name = port.clone();
        }
        if let Some(ref device) = self.device {
            config.midi.device_name = Some(device.clone());
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if let Some(hold) = self.hold_ms {
            config.midi.hold_ms = hold;
        }
        if self.no_autosave {
            config.autosave = false;
        }
        config
    }
}

fn open_sink(config: &CueConfig, dry_run: bool) -> Option<Box<dyn NoteSink>> {
    if dry_run {
        return Some(Box::new(LogSink::new()));
    }
    match MidiOutput::open(&config.midi) {
        Ok(output) => Some(Box::new(output)),
        Err(e) => {
            log::error!("MIDI output unavailable, continuing without it: {e}");
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.list_ports {
        let ports = MidiOutput::list_ports();
        if ports.is_empty() {
            println!("no MIDI output ports found");
        }
        for (i, name) in ports.iter().enumerate() {
            println!("{i}: {name}");
        }
        return;
    }

    let config = cli.resolve_config();

    let result = if cli.headless {
        run_headless(&config, cli.dry_run)
    } else {
        run_tui(&config, cli.dry_run)
    };

    if let Err(e) = result {
        eprintln!("cuelab: {e}");
        std::process::exit(1);
    }
}

fn run_tui(config: &CueConfig, dry_run: bool) -> io::Result<()> {
    // 1. Logging goes to the in-app overlay; stderr would corrupt the screen.
    let log = SharedLog::default();
    if let Err(e) = CueLogger::new(LogTarget::Buffer(log.clone()), config.level_filter()).install()
    {
        eprintln!("logger already installed: {e}");
    }

    // 2. Script and output
    let source = storage::load_script(&config.script_path)?;
    let mut app = App::new(&source)
        .with_log(log)
        .with_script_path(&config.script_path, config.autosave);
    if let Some(sink) = open_sink(config, dry_run) {
        app = app.with_sink(sink);
    }

    // 3. Terminal, set up before anything sounds
    let mut terminal = match enter_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            leave_terminal();
            return Err(e);
        }
    };

    // 4. Play the first cue and hand over to the event loop, which releases
    // notes on every exit path.
    app.start();
    let result = app.run(&mut terminal);

    leave_terminal();
    let _ = terminal.show_cursor();
    result
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Undo `enter_terminal`. Safe to call after a partial setup.
fn leave_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
}

fn run_headless(config: &CueConfig, dry_run: bool) -> io::Result<()> {
    if let Err(e) = CueLogger::new(LogTarget::Stderr, config.level_filter()).install() {
        eprintln!("logger already installed: {e}");
    }

    let mut source = storage::load_script(&config.script_path)?;
    let mut player = Player::new(open_sink(config, dry_run));

    let (tx, rx) = control_channel();

    let stdin_tx = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(cmd) => {
                    if stdin_tx.send(cmd).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("unknown command: {}", line.trim()),
            }
        }
        let _ = stdin_tx.send(ControlCommand::Quit);
    });

    let signal_tx = tx;
    ctrlc::set_handler(move || {
        let _ = signal_tx.send(ControlCommand::Quit);
    })
    .map_err(|e| io::Error::other(e.to_string()))?;

    println!("commands: n(ext) p(rev) r(eset) l(oad) s(tatus) q(uit)");
    player.navigate(Navigation::Reset, &source);

    while let Some(cmd) = rx.recv() {
        match cmd {
            ControlCommand::Navigate(nav) => {
                player.navigate(nav, &source);
            }
            ControlCommand::Reload => match storage::load_script(&config.script_path) {
                Ok(text) => {
                    source = text;
                    player.sync(&source);
                    log::info!("Reloaded {}.", config.script_path.display());
                }
                Err(e) => log::error!("Error loading notes: {e}"),
            },
            ControlCommand::Status => {
                let seq = player.sequencer();
                let position = seq
                    .current_index()
                    .map_or_else(|| "--".to_string(), |i| (i + 1).to_string());
                println!(
                    "step {position}/{} ({} problems)",
                    seq.script().len(),
                    player.diagnostic_count()
                );
                if let Some(step) = seq.current_step() {
                    println!("{}", step.raw_line());
                }
            }
            ControlCommand::Quit => break,
        }
    }

    player.release()
}
