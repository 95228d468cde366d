use clap::{Parser, ValueEnum};
use link_extract::SourceKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "link-extract")]
#[command(about = "Extract structured data (caption, recipe, page metadata) from a URL")]
#[command(version)]
pub struct Args {
    /// URL to extract from
    pub url: String,

    /// Force extraction type
    #[arg(long = "type", value_enum, default_value_t = TypeArg::Auto)]
    pub type_: TypeArg,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Additional TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Auto,
    Instagram,
    Web,
}

/// Convert from the CLI type argument to a source kind; `None` means detect from the URL
pub fn convert_source_kind(arg_type: TypeArg) -> Option<SourceKind> {
    match arg_type {
        TypeArg::Auto => None,
        TypeArg::Instagram => Some(SourceKind::Instagram),
        TypeArg::Web => Some(SourceKind::Web),
    }
}
