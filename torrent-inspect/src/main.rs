use std::fs::read;
use std::io::Read as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bencode_metainfo::{
    decoding::{DEFAULT_MAX_DEPTH, Decoder, TrailingData},
    metainfo::{FileLayout, InfoHash, Metainfo},
};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(version, about="torrent-inspect\n\n\
    Pretty-prints bencode, or summarizes .torrent files, provided either through stdin or\n\
    as a list of file paths. If using stdin, only one unit (dict, list, int or byte string)\n\
    is read.")]
struct Args {
    /// Print the pretty printed bencode as a rust string literal.
    #[arg(short, long, conflicts_with_all = ["metainfo", "json"])]
    string_literal: bool,

    /// Validate the input as torrent metainfo and print a summary instead of the tree.
    #[arg(short, long)]
    metainfo: bool,

    /// Print the metainfo summary as JSON. Implies --metainfo.
    #[arg(short, long)]
    json: bool,

    /// Reject input nested deeper than this many lists and dictionaries.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Ignore bytes after the first complete value instead of failing.
    #[arg(long)]
    allow_trailing: bool,

    /// List of file paths to read bencode from.
    /// Listens to stdin if no file paths are provided.
    file_paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.file_paths.is_empty() {
        let mut input = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut input)
            .context("Could not read stdin")?;
        inspect(&args, &input, "stdin")?;
    } else {
        for p in &args.file_paths {
            let contents = read(p).context(format!("Could not read file from path: {:?}", p))?;
            inspect(&args, &contents, p.display().to_string().as_str())?;
        }
    }

    Ok(())
}

fn inspect(args: &Args, input: &[u8], source: &str) -> Result<()> {
    let trailing = if args.allow_trailing {
        TrailingData::Ignore
    } else {
        TrailingData::Reject
    };
    let value = Decoder::new(input)
        .with_max_depth(args.max_depth)
        .with_trailing_data(trailing)
        .decode()
        .context(format!("Could not parse {:?} as bencode", source))?;
    debug!(source, nodes = value.node_count(), depth = value.depth(), "decoded");

    if args.metainfo || args.json {
        let metainfo = Metainfo::from_value(&value)
            .context(format!("{:?} is not a torrent file", source))?;
        let summary = Summary::new(source, &metainfo);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", summary.to_text());
        }
    } else if args.string_literal {
        println!("{}", value.as_rust_string_literal());
    } else {
        println!("{}", value.as_pretty_printed());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    source: &'a str,
    name: &'a str,
    announce: &'a str,
    trackers: Vec<&'a str>,
    info_hash: InfoHash,
    piece_length: u64,
    piece_count: usize,
    total_length: u64,
    private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_date: Option<i64>,
    files: Vec<FileSummary>,
}

#[derive(Debug, Serialize)]
struct FileSummary {
    path: String,
    length: u64,
}

impl<'a> Summary<'a> {
    fn new(source: &'a str, metainfo: &Metainfo<'a>) -> Self {
        let files = match metainfo.files() {
            FileLayout::Single { length } => vec![FileSummary {
                path: metainfo.name().to_owned(),
                length: *length,
            }],
            FileLayout::Multi { files } => files
                .iter()
                .map(|file| FileSummary {
                    path: format!("{}/{}", metainfo.name(), file.joined_path()),
                    length: file.length,
                })
                .collect(),
        };

        Summary {
            source,
            name: metainfo.name(),
            announce: metainfo.announce(),
            trackers: metainfo.trackers(),
            info_hash: metainfo.info_hash(),
            piece_length: metainfo.piece_length(),
            piece_count: metainfo.piece_count(),
            total_length: metainfo.total_length(),
            private: metainfo.is_private(),
            comment: metainfo.comment(),
            created_by: metainfo.created_by(),
            creation_date: metainfo.creation_date(),
            files,
        }
    }

    fn to_text(&self) -> String {
        let mut out = format!(
            "name: {}\nannounce: {}\ninfo-hash: {}\npiece length: {}\npieces: {}\n\
             total length: {}\nprivate: {}\n",
            self.name,
            self.announce,
            self.info_hash,
            self.piece_length,
            self.piece_count,
            self.total_length,
            self.private,
        );
        for tracker in self.trackers.iter().skip(1) {
            out.push_str(&format!("tracker: {tracker}\n"));
        }
        if let Some(comment) = self.comment {
            out.push_str(&format!("comment: {comment}\n"));
        }
        if let Some(created_by) = self.created_by {
            out.push_str(&format!("created by: {created_by}\n"));
        }
        if let Some(creation_date) = self.creation_date {
            out.push_str(&format!("creation date: {creation_date}\n"));
        }
        out.push_str("files:\n");
        for file in &self.files {
            out.push_str(&format!("\t{} ({} bytes)\n", file.path, file.length));
        }
        out
    }
}
