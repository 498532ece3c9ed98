//! keychord binary.
//!
//! Turns a command history into short key-sequence aliases: frequent
//! commands get the shortest sequences, and candidate names are checked
//! against the host shell so no existing command, function, alias, or
//! keyword is shadowed.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use keychord_core::table::{parse_weight_table, render_encoding_table, render_weight_table};
use keychord_core::{
	Alphabet, Assignment, Resolver, WeightMap, apply_min_count, build_tree, count_occurrences, extract,
	sanitize_lines,
};
use tracing::info;

mod oracle;
mod render;

use oracle::ShellOracle;

/// keychord command line arguments.
#[derive(Parser, Debug)]
#[command(name = "keychord")]
#[command(about = "Weighted key-sequence aliases for frequent commands")]
struct Args {
	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Generate shell alias declarations from newline-delimited commands
	Aliases {
		/// Input file; stdin when omitted
		input: Option<PathBuf>,

		/// Symbols to build sequences from; characters, or comma-separated
		/// multi-character symbols
		#[arg(short, long, default_value = "jfkdls")]
		alphabet: String,

		/// Drop commands seen fewer times than this
		#[arg(short, long, default_value_t = 4)]
		min_count: u64,

		/// Shell queried for name conflicts
		#[arg(long, default_value = "zsh")]
		shell: String,

		/// Output file; stdout when omitted
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// Encode a pre-aggregated (target, count) table, no conflict checking
	Table {
		/// Input table file; stdin when omitted
		input: Option<PathBuf>,

		/// Symbols to build sequences from
		#[arg(short, long, default_value = "jfkdls")]
		alphabet: String,

		/// Column holding the item to abbreviate
		#[arg(long, default_value = "target")]
		target_col: String,

		/// Column holding the weight
		#[arg(long, default_value = "count")]
		count_col: String,

		/// Output file; stdout when omitted
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// Count newline-delimited commands into a (target, count) table
	Count {
		/// Input file; stdin when omitted
		input: Option<PathBuf>,

		/// Output file; stdout when omitted
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let level = match args.verbose {
		0 => tracing::Level::WARN,
		1 => tracing::Level::INFO,
		_ => tracing::Level::DEBUG,
	};
	let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	match args.command {
		Command::Aliases {
			input,
			alphabet,
			min_count,
			shell,
			output,
		} => run_aliases(input, &alphabet, min_count, &shell, output),
		Command::Table {
			input,
			alphabet,
			target_col,
			count_col,
			output,
		} => run_table(input, &alphabet, &target_col, &count_col, output),
		Command::Count { input, output } => run_count(input, output),
	}
}

fn run_aliases(
	input: Option<PathBuf>,
	alphabet: &str,
	min_count: u64,
	shell: &str,
	output: Option<PathBuf>,
) -> anyhow::Result<()> {
	let alphabet = parse_alphabet(alphabet)?;
	let lines = sanitize_lines(read_input(input)?.lines());
	let weights = apply_min_count(count_occurrences(&lines), min_count);
	info!(commands = weights.len(), min_count, "aliases.counted");

	if weights.is_empty() {
		// Nothing frequent enough to alias; silent success.
		return Ok(());
	}

	let oracle = ShellOracle::new(shell);
	let assignments = Resolver::new(alphabet, &oracle).resolve(weights)?;
	if assignments.is_empty() {
		info!("aliases.no_viable_codes");
		return Ok(());
	}

	write_output(output, &render::alias_lines(&assignments))
}

fn run_table(
	input: Option<PathBuf>,
	alphabet: &str,
	target_col: &str,
	count_col: &str,
	output: Option<PathBuf>,
) -> anyhow::Result<()> {
	let alphabet = parse_alphabet(alphabet)?;
	let weights = parse_weight_table(&read_input(input)?, target_col, count_col)?;

	let root = build_tree(&weights, &alphabet)?;
	let assignments: Vec<Assignment> = extract(&root, &alphabet)
		.into_iter()
		.map(|(code, (target, weight))| Assignment { code, target, weight })
		.collect();

	write_output(output, &render_encoding_table(&assignments))
}

fn run_count(input: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
	let lines = sanitize_lines(read_input(input)?.lines());
	let weights: WeightMap = count_occurrences(&lines);
	write_output(output, &render_weight_table(&weights))
}

/// Splits the alphabet flag into symbols: comma-separated when a comma is
/// present, one symbol per character otherwise.
fn parse_alphabet(raw: &str) -> anyhow::Result<Alphabet> {
	let symbols: Vec<String> = if raw.contains(',') {
		raw.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect()
	} else {
		raw.chars().map(|c| c.to_string()).collect()
	};
	Ok(Alphabet::new(symbols)?)
}

fn read_input(path: Option<PathBuf>) -> anyhow::Result<String> {
	match path {
		Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display())),
		None => {
			let mut buf = String::new();
			std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
			Ok(buf)
		}
	}
}

fn write_output(path: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
	match path {
		Some(path) => std::fs::write(&path, content).with_context(|| format!("writing {}", path.display())),
		None => {
			print!("{content}");
			Ok(())
		}
	}
}
