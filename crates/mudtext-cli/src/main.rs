use mudtext::{MarkupConfig, Renderer, WidthRule, escape};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Markup(mudtext::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Markup(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mudtext::Error> for CliError {
    fn from(value: mudtext::Error) -> Self {
        Self::Markup(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Convert,
    Strip,
    Truncate,
    Escape,
    Width,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    out: Option<String>,
    east_asian: bool,
    max_width: Option<usize>,
    ellipsis: bool,
    vars: HashMap<String, String>,
    json: bool,
}

#[derive(Serialize)]
struct WidthOut<'a> {
    line: &'a str,
    width: usize,
}

fn usage() -> &'static str {
    "mudtext-cli\n\
\n\
USAGE:\n\
  mudtext-cli [convert] [--config <path>] [--out <path>] [<path>|-]\n\
  mudtext-cli strip [--config <path>] [--out <path>] [<path>|-]\n\
  mudtext-cli truncate --width <n> [--ellipsis] [--east-asian] [--config <path>] [--out <path>] [<path>|-]\n\
  mudtext-cli escape --var <NAME=VALUE>... [--out <path>] [<path>|-]\n\
  mudtext-cli width [--json] [--east-asian] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - convert, strip and escape treat the whole input as one message; one trailing newline is ignored.\n\
  - truncate and width work line by line.\n\
  - --config reads a JSON markup config; missing keys keep their defaults.\n\
  - escape variable names are given without the leading '$'.\n\
  - Set RUST_LOG to adjust diagnostics on stderr (default: warn).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "convert" => args.command = Command::Convert,
            "strip" => args.command = Command::Strip,
            "truncate" => args.command = Command::Truncate,
            "escape" => args.command = Command::Escape,
            "width" => args.command = Command::Width,
            "--east-asian" => args.east_asian = true,
            "--ellipsis" => args.ellipsis = true,
            "--json" => args.json = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_width = Some(w.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--var" => {
                let Some(var) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Some((name, value)) = var.split_once('=') else {
                    return Err(CliError::Usage(usage()));
                };
                let name = name.trim_start_matches('$');
                if name.is_empty() {
                    return Err(CliError::Usage(usage()));
                }
                args.vars.insert(format!("${name}"), value.to_string());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.command == Command::Truncate && args.max_width.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn trim_final_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

fn build_renderer(args: &Args) -> Result<Renderer, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => MarkupConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => MarkupConfig::default(),
    };
    if args.east_asian {
        config.width_rule = WidthRule::EastAsian;
    }
    tracing::debug!(config = ?args.config, width_rule = ?config.width_rule, "markup config loaded");
    Ok(Renderer::with_config(config)?)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let renderer = build_renderer(&args)?;
    let input = read_input(args.input.as_deref())?;

    let output = match args.command {
        Command::Convert => format!("{}\n", renderer.convert(trim_final_newline(&input))),
        Command::Strip => format!("{}\n", renderer.strip(trim_final_newline(&input))),
        Command::Escape => format!(
            "{}\n",
            escape::parse(trim_final_newline(&input), &args.vars)
        ),
        Command::Truncate => {
            let max_width = args.max_width.ok_or(CliError::Usage(usage()))?;
            let mut out = String::with_capacity(input.len());
            for line in input.lines() {
                out.push_str(&renderer.truncate(line, max_width, args.ellipsis));
                out.push('\n');
            }
            out
        }
        Command::Width => {
            let rows: Vec<WidthOut<'_>> = input
                .lines()
                .map(|line| WidthOut {
                    line,
                    width: renderer.visual_width(line),
                })
                .collect();
            if args.json {
                let mut text = serde_json::to_string(&rows)?;
                text.push('\n');
                text
            } else {
                rows.iter().map(|row| format!("{}\n", row.width)).collect()
            }
        }
    };

    write_text(&output, args.out.as_deref())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
