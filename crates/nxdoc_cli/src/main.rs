#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "nxdoc", about = "NX container inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Get(cmd::get::Args),
	Tree(cmd::tree::Args),
	Blob(cmd::blob::Args),
	Bench(cmd::bench::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")))
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> cmd::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Get(args) => cmd::get::run(args),
		Commands::Tree(args) => cmd::tree::run(args),
		Commands::Blob(args) => cmd::blob::run(args),
		Commands::Bench(args) => cmd::bench::run(args),
	}
}
