use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "prov-toolkit", version)]
#[command(about = "Provenance download, RDF dataset I/O and output packaging for SPARQL triplestores")]
pub struct Cli {
    /// Custom config file (.toml format), merged over prov-toolkit.toml
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download every provenance entity from a SPARQL endpoint into a JSON-LD file
    FetchProv {
        /// SPARQL endpoint URL; defaults to triple_store.endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Destination file
        #[arg(short, long, default_value = "prov.json")]
        output: PathBuf,
    },

    /// GET JSON documents through the retrying, cached HTTP client
    FetchJson {
        /// URLs to fetch
        #[arg(required = true)]
        urls: Vec<String>,

        /// Write the responses, keyed by URL, to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write failed URLs with their status code or error message to this file
        #[arg(long)]
        error_log: Option<PathBuf>,
    },

    /// Zip a directory, leaving out every `small` sub-directory
    Zip {
        /// Directory to archive
        dir: PathBuf,

        /// Destination archive
        #[arg(short, long, default_value = "output.zip")]
        output: PathBuf,
    },

    /// Write a whitespace-free `<name>_minify.json` copy of JSON files
    Minify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Read an RDF file and write it in another syntax (JSON-LD by default)
    Load {
        /// RDF input file; syntax is guessed from the extension
        input: PathBuf,

        /// Destination file; syntax is guessed from the extension
        #[arg(short, long)]
        output: PathBuf,

        /// Base IRI used to resolve relative IRIs in the input
        #[arg(long)]
        base_iri: Option<String>,
    },

    /// Upload an RDF file to the triplestore
    Upload {
        /// RDF input file; syntax is guessed from the extension
        input: PathBuf,

        /// SPARQL endpoint URL; defaults to triple_store.endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Also store the dataset in this file before uploading
        #[arg(long)]
        store: Option<PathBuf>,

        /// Base IRI used to resolve relative IRIs in the input
        #[arg(long)]
        base_iri: Option<String>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchProv { .. } => "fetch-prov",
            Self::FetchJson { .. } => "fetch-json",
            Self::Zip { .. } => "zip",
            Self::Minify { .. } => "minify",
            Self::Load { .. } => "load",
            Self::Upload { .. } => "upload",
        }
    }
}
