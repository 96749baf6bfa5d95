use bash_bundler::{minify, write_to_file, BundleError, BundleOptions, Bundler, LogSink};
use clap::{ArgAction, Parser, Subcommand};

const NAME: &str = env!("CARGO_PKG_NAME");
const ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "bash-bundler")]
#[command(about = "This simple tool bundles bash files into a single bash file.")]
#[command(version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Takes an entry bash script and bundles it and all its sources into a single output file.
    Bundle {
        /// The entrypoint to the bash script to bundle.
        #[arg(short = 'e', long = "entry")]
        entry: String,

        /// The output file to write to.
        #[arg(short = 'o', long = "output")]
        output: String,

        /// Minify the output file.
        #[arg(short = 'm', long = "minify")]
        minify: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        print_info();
        return;
    };

    match command {
        Commands::Bundle {
            entry,
            output,
            minify,
        } => {
            if let Err(e) = run_bundle(&entry, &output, minify) {
                log::error!("error during bundling: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_info() {
    println!("{}", NAME);
    println!("{}", ABOUT);
    println!("Version: {}", VERSION);
    println!();
    println!("See -h/--help for more information.");
}

fn run_bundle(entry: &str, output: &str, minify_output: bool) -> Result<(), BundleError> {
    log::info!("Performing bundling entrypoint={} output={}", entry, output);

    let mut content = Bundler::new(BundleOptions::default(), &LogSink).run(entry)?;
    if minify_output {
        log::debug!("minifying {} bytes", content.len());
        content = minify(&content)?;
    }

    write_to_file(output, &content)?;
    log::info!("Bundle written output={}", output);
    Ok(())
}
