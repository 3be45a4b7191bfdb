use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use namedlog::{Level, LoggerOptions, LoggerRegistry};

const USAGE: &str = "Usage: namedlog [CONFIG.toml] [--level LEVEL]";

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    level: Level,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args {
        config: None,
        level: Level::Info,
        help: false,
    };
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-l" | "--level" => {
                let value = args.next().context("--level needs a value")?;
                parsed.level = value.parse::<Level>().context("Invalid --level")?;
            }
            "-h" | "--help" => parsed.help = true,
            _ if parsed.config.is_none() && !arg.starts_with('-') => {
                parsed.config = Some(PathBuf::from(&arg));
            }
            _ => bail!("Unexpected argument: {}\n{}", arg, USAGE),
        }
    }

    Ok(parsed)
}

fn main() -> Result<()> {
    // Diagnostics about the logger itself (e.g. failed writes) go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "namedlog=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let options = match &args.config {
        Some(path) => LoggerOptions::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => LoggerOptions::default(),
    };

    // Forward each stdin line as one record
    let logger = LoggerRegistry::global()
        .get_logger(&options)
        .context("Failed to configure logger")?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        logger.log(args.level, line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_no_args_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.level, Level::Info);
        assert!(!args.help);
    }

    #[test]
    fn test_config_and_level() {
        let args = parse(&["logger.toml", "--level", "warning"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("logger.toml")));
        assert_eq!(args.level, Level::Warning);

        let short = parse(&["-l", "50"]).unwrap();
        assert_eq!(short.level, Level::Critical);
    }

    #[test]
    fn test_invalid_level() {
        assert!(parse(&["--level", "loud"]).is_err());
        assert!(parse(&["--level"]).is_err());
    }

    #[test]
    fn test_unexpected_arguments() {
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.toml", "b.toml"]).is_err());
    }

    #[test]
    fn test_help_flag() {
        assert!(parse(&["--help"]).unwrap().help);
        assert!(parse(&["-h"]).unwrap().help);
    }
}
