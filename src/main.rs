// dsanim: step-through animations of classic data structures in the terminal

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use ratatui::{backend::CrosstermBackend, Terminal};

use dsanim::config::PlaybackOptions;
use dsanim::scenarios::Scenario;
use dsanim::ui::App;

struct Args {
    scenario: Scenario,
    options_path: Option<String>,
    log_path: Option<String>,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <scenario> [--options file.json] [--log file]", program_name);
    eprintln!();
    eprintln!("Scenarios:");
    for scenario in Scenario::ALL {
        eprintln!("  {:<12} {}", scenario.name(), scenario.description());
    }
    eprintln!();
    eprintln!("Example:");
    eprintln!("  {} tree --log dsanim.log", program_name);
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut scenario = None;
    let mut options_path = None;
    let mut log_path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--options" => {
                options_path = Some(iter.next().ok_or("--options needs a file path")?.clone());
            }
            "--log" => {
                log_path = Some(iter.next().ok_or("--log needs a file path")?.clone());
            }
            name if scenario.is_none() => scenario = Some(name.parse::<Scenario>()?),
            other => return Err(format!("Unexpected argument '{}'", other)),
        }
    }

    Ok(Args {
        scenario: scenario.ok_or("No scenario provided")?,
        options_path,
        log_path,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("dsanim");

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    // The TUI owns the terminal, so logs only go to a file when asked for
    if let Some(path) = &args.log_path {
        let file = fs::File::create(path)?;
        env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
            .target(Target::Pipe(Box::new(file)))
            .init();
    }

    let options = match &args.options_path {
        Some(path) if !Path::new(path).exists() => {
            eprintln!("Error: File '{}' not found", path);
            std::process::exit(1);
        }
        Some(path) => match PlaybackOptions::from_json(&fs::read_to_string(path)?) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error: invalid options in '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => PlaybackOptions::default(),
    };

    let mut app = match App::new(args.scenario, options) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: could not record scenarios: {}", e);
            std::process::exit(1);
        }
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
