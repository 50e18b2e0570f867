use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

use marknorm_core::{NormalizeOptions, Normalizer};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Unescape,
    Uri,
    Escape,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut mode: Option<Mode> = None;
    let mut input: Option<String> = None;
    let mut preserve_entities = false;
    let mut per_line = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--preserve-entities" => preserve_entities = true,
            "--lines" => per_line = true,
            "unescape" if mode.is_none() => mode = Some(Mode::Unescape),
            "uri" if mode.is_none() => mode = Some(Mode::Uri),
            "escape" if mode.is_none() => mode = Some(Mode::Escape),
            _ => {
                if mode.is_some() && input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let Some(mode) = mode else {
        eprintln!("missing mode: unescape | uri | escape");
        print_usage();
        process::exit(2);
    };

    let source = match input {
        Some(path) => fs::read(&path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).unwrap_or_else(|err| {
                eprintln!("failed to read stdin: {}", err);
                process::exit(1);
            });
            buffer
        }
    };

    let normalizer = Normalizer::new().with_options(NormalizeOptions { preserve_entities });
    tracing::debug!(?mode, per_line, bytes = source.len(), "normalizing input");

    let output = if per_line {
        source
            .split_inclusive(|&b| b == b'\n')
            .map(|line| {
                let (body, ending) = split_line_ending(line);
                let mut out = transform(&normalizer, mode, body);
                out.push_str(&String::from_utf8_lossy(ending));
                out
            })
            .collect::<String>()
    } else {
        transform(&normalizer, mode, &source)
    };

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
        eprintln!("failed to write output: {}", err);
        process::exit(1);
    }
}

fn transform(normalizer: &Normalizer, mode: Mode, bytes: &[u8]) -> String {
    match mode {
        Mode::Uri => normalizer.normalize_uri_bytes(bytes),
        Mode::Unescape => normalizer.unescape(&String::from_utf8_lossy(bytes)).into_owned(),
        Mode::Escape => normalizer.escape(&String::from_utf8_lossy(bytes)).into_owned(),
    }
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    let body_len = line
        .strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .map_or(line.len(), <[u8]>::len);
    line.split_at(body_len)
}

fn print_usage() {
    eprintln!("Usage: marknorm-cli <unescape|uri|escape> [--preserve-entities] [--lines] [input]");
}
