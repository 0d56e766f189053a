//! Headless driver
//!
//! Reads terminal output from stdin, feeds the emulator and keeps a JSON
//! snapshot of the screen on disk, rewritten atomically after every read.
//!
//! Usage: `tern_headless [COLSxLINES] [filename]`

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use tern::Emulator;

const DEFAULT_LINES: usize = 68;
const DEFAULT_COLUMNS: usize = 117;
const DEFAULT_FILENAME: &str = "screen.json";

struct Cli {
    lines: usize,
    columns: usize,
    filename: String,
}

/// `COLSxLINES`, e.g. `80x24`.
fn parse_size(arg: &str) -> Option<(usize, usize)> {
    let (columns, lines) = arg.split_once('x')?;
    Some((columns.parse().ok()?, lines.parse().ok()?))
}

fn parse_cli(args: &[String]) -> Option<Cli> {
    let mut cli = Cli {
        lines: DEFAULT_LINES,
        columns: DEFAULT_COLUMNS,
        filename: DEFAULT_FILENAME.to_string(),
    };

    match args {
        [] => {}
        [first] if first == "-h" || first == "--help" => return None,
        [first] => match parse_size(first) {
            Some((columns, lines)) => {
                cli.columns = columns;
                cli.lines = lines;
            }
            None => cli.filename = first.clone(),
        },
        [first, second, ..] => {
            let (columns, lines) = parse_size(first)?;
            cli.columns = columns;
            cli.lines = lines;
            cli.filename = second.clone();
        }
    }
    Some(cli)
}

/// Write the snapshot next to its destination, then rename into place so
/// readers never observe a partial file.
fn write_snapshot(emulator: &Emulator, filename: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&emulator.snapshot())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let tmp = Path::new(filename).with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, filename)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cli) = parse_cli(&args) else {
        eprintln!("Usage: tern_headless [COLSxLINES] [filename]");
        return ExitCode::SUCCESS;
    };

    let mut emulator = Emulator::new(cli.lines, cli.columns, None);
    emulator.set_title("No title");
    emulator.set_log_function(|message| {
        log::warn!("{}", message);
    });

    let mut buffer = [0u8; 4096];
    let mut stdin = io::stdin().lock();
    loop {
        match stdin.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                emulator.feed(&buffer[..n]);
                if let Err(e) = write_snapshot(&emulator, &cli.filename) {
                    eprintln!("cannot write {}: {}", cli.filename, e);
                    return ExitCode::FAILURE;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                eprintln!("read error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    emulator.finish();
    if let Err(e) = write_snapshot(&emulator, &cli.filename) {
        eprintln!("cannot write {}: {}", cli.filename, e);
        return ExitCode::FAILURE;
    }

    io::stdout().flush().ok();
    ExitCode::SUCCESS
}
