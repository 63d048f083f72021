use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use momo_core::store::{RecordIndex, RecordSet, write_csv};
use momo_ingest::batch::run_batch;

#[derive(Parser, Debug)]
#[command(name = "momo", version, about = "Mobile-money SMS extraction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an SMS XML dump into a normalized JSON record set
    Parse {
        /// Input XML dump
        #[arg(default_value = "modified_sms_v2.xml")]
        input: PathBuf,

        /// Output JSON path
        #[arg(default_value = "data.json")]
        output: PathBuf,
    },

    /// Look up one record by id and print it as JSON
    Lookup {
        /// Record id (txid, epoch date, or batch position)
        id: String,

        /// Record set written by `momo parse`
        #[arg(long, default_value = "data.json")]
        data: PathBuf,
    },

    /// Time linear scan vs. hash-index lookup over the record set
    Bench {
        /// Record set written by `momo parse`
        #[arg(long, default_value = "data.json")]
        data: PathBuf,

        /// Number of lookups per strategy
        #[arg(long, default_value_t = 10_000)]
        trials: usize,
    },

    /// Export the record set as flat CSV for spreadsheet tools
    Export {
        /// Record set written by `momo parse`
        #[arg(long, default_value = "data.json")]
        data: PathBuf,

        /// CSV output path
        #[arg(long, default_value = "data.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { input, output } => {
            if !input.exists() {
                bail!(
                    "input not found: {} (pass a path to the XML dump)",
                    input.display()
                );
            }
            let count = run_batch(&input, &output)
                .with_context(|| format!("parsing {}", input.display()))?;
            println!("Wrote {} records to {}", count, output.display());
        }

        Command::Lookup { id, data } => {
            let set = RecordSet::load(&data)?;
            match set.find(&id) {
                Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
                None => bail!("no record with id {} in {}", id, data.display()),
            }
        }

        Command::Bench { data, trials } => bench(&data, trials)?,

        Command::Export { data, out } => {
            let set = RecordSet::load(&data)?;
            write_csv(&out, &set)?;
            println!("Exported {} records to {}", set.len(), out.display());
        }
    }

    Ok(())
}

fn bench(data: &Path, trials: usize) -> Result<()> {
    let set = RecordSet::load(data)?;
    if set.is_empty() {
        bail!("no records in {} (run `momo parse` first)", data.display());
    }

    // Cycle ids deterministically so runs are reproducible.
    let ids: Vec<&str> = set.records().iter().map(|r| r.id.as_str()).collect();
    let lookups: Vec<&str> = (0..trials).map(|i| ids[i % ids.len()]).collect();

    let start = Instant::now();
    let mut linear_hits = 0usize;
    for &id in &lookups {
        if set.find(id).is_some() {
            linear_hits += 1;
        }
    }
    let linear = start.elapsed();

    let index = RecordIndex::build(&set);
    let start = Instant::now();
    let mut indexed_hits = 0usize;
    for &id in &lookups {
        if index.get(id).is_some() {
            indexed_hits += 1;
        }
    }
    let indexed = start.elapsed();

    println!("Records: {}", set.len());
    println!(
        "Linear scan: {:.6}s for {} lookups ({} hits)",
        linear.as_secs_f64(),
        trials,
        linear_hits
    );
    println!(
        "Hash index:  {:.6}s for {} lookups ({} hits)",
        indexed.as_secs_f64(),
        trials,
        indexed_hits
    );
    if indexed.as_secs_f64() > 0.0 {
        println!(
            "Speedup (linear/index): {:.2}x",
            linear.as_secs_f64() / indexed.as_secs_f64()
        );
    }
    Ok(())
}
