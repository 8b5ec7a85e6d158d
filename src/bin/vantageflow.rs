use anyhow::{Context, Result, anyhow};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use vantageflow::ProjectParser;
use vantageflow::config::IngestConfig;
use vantageflow::context::StandardContext;
use vantageflow::model::{CurrentUser, ProjectOutline};

#[derive(Debug, Default)]
struct Options {
    root: Option<PathBuf>,
    user: Option<String>,
    email: Option<String>,
    outline: bool,
    compact: bool,
    verbosity: u8,
    input: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(None),
            "-r" | "--root" => {
                let path = iter.next().ok_or_else(|| anyhow!("--root requires a path"))?;
                opts.root = Some(PathBuf::from(path));
            }
            "-u" | "--user" => {
                let name = iter.next().ok_or_else(|| anyhow!("--user requires a name"))?;
                opts.user = Some(name.clone());
            }
            "-e" | "--email" => {
                let email = iter.next().ok_or_else(|| anyhow!("--email requires an address"))?;
                opts.email = Some(email.clone());
            }
            "-o" | "--outline" => opts.outline = true,
            "-c" | "--compact" => opts.compact = true,
            "-v" | "--verbose" => opts.verbosity += 1,
            "-vv" => opts.verbosity += 2,
            "-" => opts.input = None,
            other if other.starts_with('-') => {
                return Err(anyhow!("Unknown option '{}'. Try --help.", other));
            }
            other => {
                if opts.input.is_some() {
                    return Err(anyhow!("Only one input file is supported"));
                }
                opts.input = Some(other.to_string());
            }
        }
    }
    Ok(Some(opts))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("Failed to read '{}'", p)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn current_user(opts: &Options) -> Option<CurrentUser> {
    let name = opts.user.as_ref()?;
    let email = opts.email.clone().unwrap_or_default();
    Some(CurrentUser {
        uid: "local-user".to_string(),
        email,
        display_name: name.clone(),
    })
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| PathBuf::from(a).file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "vantageflow".to_string());

    let Some(opts) = parse_args(&args)? else {
        vantageflow::cli::print_help(&binary_name);
        return Ok(());
    };

    let ctx = StandardContext::new(opts.root.clone());
    let config = IngestConfig::load_or_default(&ctx)?;

    let level = match opts.verbosity {
        0 => config.log_level_filter(),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // A logger may already be installed when embedded; that is fine.
    let _ = TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let text = read_input(opts.input.as_deref())?;

    let mut parser = ProjectParser::new(config);
    if let Some(user) = current_user(&opts) {
        parser = parser.with_current_user(user);
    }
    let result = parser.parse(&text);

    for warning in &result.metadata.warnings {
        log::info!("{}", warning);
    }

    if opts.outline {
        print!("{}", result.to_outline());
    } else if opts.compact {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("vantageflow")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_flags() {
        let opts = parse_args(&args(&["-r", "/tmp/x", "--outline", "-v", "notes.txt"]))
            .unwrap()
            .unwrap();
        assert_eq!(opts.root, Some(PathBuf::from("/tmp/x")));
        assert!(opts.outline);
        assert_eq!(opts.verbosity, 1);
        assert_eq!(opts.input.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_parse_args_help_and_errors() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["--root"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
    }

    #[test]
    fn test_user_requires_name() {
        let opts = parse_args(&args(&["--email", "a@b.io"])).unwrap().unwrap();
        assert!(current_user(&opts).is_none());

        let opts = parse_args(&args(&["-u", "Ana", "-e", "a@b.io"]))
            .unwrap()
            .unwrap();
        let user = current_user(&opts).unwrap();
        assert_eq!(user.display_name, "Ana");
        assert_eq!(user.email, "a@b.io");
    }
}
