use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vislayout::csv_reader;
use vislayout::runtime::{self, RequestSource};

#[derive(Parser, Debug)]
#[command(name = "vislayout")]
#[command(about = "Compute chart layouts (axes, ticks, normalized placements) from tabular data", long_about = None)]
struct Args {
    /// Chart request DSL (e.g., 'bar(dims: 3, x_range: (2, 8))')
    #[arg(required_unless_present = "request_file", conflicts_with = "request_file")]
    request: Option<String>,

    /// Read the chart request from a JSON file instead
    #[arg(long, value_name = "PATH")]
    request_file: Option<String>,

    /// The CSV input has no header row
    #[arg(long)]
    no_header: bool,

    /// Read the dataset from stdin as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Pretty-print the layout JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = match (args.request, args.request_file) {
        (_, Some(path)) => RequestSource::File(path),
        (Some(dsl), None) => RequestSource::Dsl(dsl),
        (None, None) => anyhow::bail!("A chart request or --request-file is required"),
    };

    // Read the dataset from stdin
    let table = if args.json {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read JSON from stdin")?;
        runtime::parse_json_table(&text)?
    } else {
        csv_reader::read_table_from_stdin(!args.no_header)
            .context("Failed to read CSV from stdin")?
    };
    info!(rows = table.len(), columns = table.arity(), "read dataset");

    let json = runtime::render_layout(&source, &table, args.pretty)?;

    // Write layout JSON to stdout
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write layout to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
