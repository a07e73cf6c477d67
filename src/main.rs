use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use sase_query::{format_duration, Query};

/// Parse an event-pattern query and print its canonical form
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// query text, e.g. "EVENT SEQ(login a, logout b) WITHIN 1h"
    #[clap(conflicts_with = "file")]
    query: Option<String>,

    /// read the query from a file instead, `-` for stdin
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// print the capture table as `alias<TAB>event type` lines
    #[clap(short, long)]
    captures: bool,

    /// print the WITHIN window, or `unbounded`
    #[clap(short, long)]
    window: bool,

    /// print a JSON summary with the canonical query, captures and window
    #[clap(long, conflicts_with_all = ["captures", "window"])]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let text = read_query(&args)?;
    let query = sase_query::parse(&text)?;

    if args.json {
        return print_json(&query);
    }

    if args.captures {
        for (alias, event_type) in query.captures() {
            println!("{alias}\t{event_type}");
        }
    }

    if args.window {
        match query.window_opt() {
            Some(window) => println!("{}", format_duration(window)),
            None => println!("unbounded"),
        }
    }

    if !args.captures && !args.window {
        println!("{query}");
    }

    Ok(())
}

fn read_query(args: &Args) -> Result<String> {
    match (&args.query, &args.file) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .into_diagnostic()
                .wrap_err("failed to read query from stdin")?;
            Ok(buf)
        }
        (None, Some(path)) => fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read query from {}", path.display())),
        (None, None) => Err(miette::miette!(
            help = "pass the query as an argument, or use --file",
            "no query given"
        )),
    }
}

#[cfg(feature = "json")]
fn print_json(query: &Query) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Summary<'a> {
        query: String,
        captures: &'a std::collections::BTreeMap<String, String>,
        window_ns: Option<i64>,
    }

    let summary = Summary {
        query: query.query_text(),
        captures: query.captures(),
        window_ns: query.window_opt().and_then(|w| w.num_nanoseconds()),
    };
    let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

#[cfg(not(feature = "json"))]
fn print_json(_query: &Query) -> Result<()> {
    Err(miette::miette!("--json requires the `json` feature"))
}
