use clap::Parser;
use link_extract::{ExtractConfig, ExtractError, LinkExtractor};
use log::debug;
use serde_json::json;
use std::process;

mod args;
use args::{convert_source_kind, Args};

fn main() {
    // Initialize logging; only errors are shown unless RUST_LOG says otherwise
    env_logger::init();

    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            debug!("Extraction failed: {e:?}");
            eprintln!("{}", json!({ "error": e.to_string(), "url": args.url }));
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, ExtractError> {
    let config = ExtractConfig::load(args.config.as_deref())?;
    let extractor = LinkExtractor::new(config)?;
    let extraction = extractor.extract(&args.url, convert_source_kind(args.type_))?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&extraction)?
    } else {
        serde_json::to_string(&extraction)?
    };
    Ok(output)
}
