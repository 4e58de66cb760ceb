use std::io::Read;

use tracing::error;
use tracing_subscriber::EnvFilter;

use sparqline::binding::SparqlResults;
use sparqline::error::{Result, SparqlineError};
use sparqline::server::{self, Rendered};
use sparqline::settings::Settings;
use sparqline::view::{VisPayload, FALLBACK_TEXT};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Reads a SPARQL results document from `path` (`-` for stdin) and prints the
/// vis-timeline payload, or the fallback text when nothing can be placed.
fn convert(settings: &Settings, path: &str) -> Result<()> {
    let mut text = String::new();
    if path == "-" {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)?;
    }
    let document = SparqlResults::from_json(&text)?;
    match server::render(settings, Some(document.bindings()), None)? {
        Rendered::Fallback => println!("{FALLBACK_TEXT}"),
        Rendered::Timeline { items, options } => {
            println!("{}", serde_json::to_string_pretty(&VisPayload { items, options })?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    init_tracing(&settings.log);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        None | Some("serve") => server::serve(settings).await,
        Some("convert") => convert(&settings, args.get(1).map(String::as_str).unwrap_or("-")),
        Some(other) => Err(SparqlineError::Config(format!(
            "unknown command '{other}', expected 'serve' or 'convert <file|->'"
        ))),
    };
    if let Err(e) = outcome {
        error!(%e, "sparqline failed");
        std::process::exit(1);
    }
}
