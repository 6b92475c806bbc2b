//! Command line definition

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Build the `termcheck` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("termcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate document text against an approved glossary and generate mocks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("glossary")
                .long("glossary")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Read terms from a local JSON export instead of the remote table"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("terms")
                .about("List approved terms")
                .arg(category_arg()),
        )
        .subcommand(
            Command::new("scan")
                .about("Highlight text that is not an approved term")
                .arg(document_arg())
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help("Frame or group to scan, by id or layer name (default: document root)"),
                )
                .arg(category_arg())
                .arg(write_arg()),
        )
        .subcommand(
            Command::new("mock")
                .about("Clone a template once per term")
                .arg(document_arg())
                .arg(
                    Arg::new("template")
                        .long("template")
                        .required(true)
                        .help("Template node, by id or layer name"),
                )
                .arg(category_arg())
                .arg(write_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a single text and suggest approved replacements")
                .arg(Arg::new("text").required(true).help("Text to validate"))
                .arg(category_arg()),
        )
}

fn category_arg() -> Arg {
    Arg::new("category")
        .long("category")
        .help("Restrict to one category (platform)")
}

fn document_arg() -> Arg {
    Arg::new("document")
        .long("document")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Document JSON file")
}

fn write_arg() -> Arg {
    Arg::new("write")
        .long("write")
        .value_parser(value_parser!(PathBuf))
        .help("Write the updated document to this file")
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--glossary`
    pub glossary: Option<PathBuf>,
    /// `--log-json`
    pub log_json: bool,
}

impl GlobalOptions {
    /// Extract from parsed matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            glossary: matches.get_one::<PathBuf>("glossary").cloned(),
            log_json: matches.get_flag("log-json"),
        }
    }
}

/// A parsed subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `terms`
    Terms {
        /// Category filter
        category: Option<String>,
    },
    /// `scan`
    Scan(DocumentArgs),
    /// `mock`
    Mock(DocumentArgs),
    /// `validate`
    Validate {
        /// Text to check
        text: String,
        /// Category filter
        category: Option<String>,
    },
}

/// Arguments of document subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArgs {
    /// Input document
    pub document: PathBuf,
    /// `--root` for scan, `--template` for mock
    pub target: Option<String>,
    /// Category filter
    pub category: Option<String>,
    /// Output document
    pub write: Option<PathBuf>,
}

impl Invocation {
    /// Extract the subcommand from parsed matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Option<Self> {
        let category = |args: &ArgMatches| args.get_one::<String>("category").cloned();
        let document = |args: &ArgMatches, target: &str| DocumentArgs {
            document: args
                .get_one::<PathBuf>("document")
                .cloned()
                .unwrap_or_default(),
            target: args.get_one::<String>(target).cloned(),
            category: category(args),
            write: args.get_one::<PathBuf>("write").cloned(),
        };

        match matches.subcommand()? {
            ("terms", args) => Some(Self::Terms {
                category: category(args),
            }),
            ("scan", args) => Some(Self::Scan(document(args, "root"))),
            ("mock", args) => Some(Self::Mock(document(args, "template"))),
            ("validate", args) => Some(Self::Validate {
                text: args.get_one::<String>("text").cloned().unwrap_or_default(),
                category: category(args),
            }),
            _ => None,
        }
    }
}
