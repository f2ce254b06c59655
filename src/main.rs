//! Command-line driver: train a digit classifier on MNIST IDX files, test it,
//! and classify single images.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sigmoid_mlp::data::image::load_grayscale_input;
use sigmoid_mlp::data::idx::{read_test_set, read_train_set};
use sigmoid_mlp::train::argmax;
use sigmoid_mlp::{evaluate, train_loop, Network, TrainConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sigmoid-mlp")]
#[command(about = "Sigmoid MLP digit classifier trained with momentum backpropagation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the IDX dataset files
    #[arg(long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Path of the saved network
    #[arg(long, default_value = "data/nn.json", global = true)]
    model: PathBuf,

    /// Verbosity level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train (continuing from the saved model if present), test, then offer to save
    Train {
        /// Number of randomly drawn training samples
        #[arg(long, default_value = "100000")]
        iterations: usize,

        #[arg(long, default_value = "0.001")]
        learning_rate: f64,

        #[arg(long, default_value = "0.5")]
        momentum: f64,

        /// Samples per progress report
        #[arg(long, default_value = "1000")]
        report_every: usize,

        /// Hidden layer sizes for a freshly created network
        #[arg(long, value_delimiter = ',', default_value = "64,64")]
        hidden: Vec<usize>,

        /// Number of output classes for a freshly created network
        #[arg(long, default_value = "10")]
        classes: usize,

        /// Seed for weight initialization and sample order
        #[arg(long)]
        seed: Option<u64>,

        /// Save without asking
        #[arg(short, long)]
        yes: bool,

        /// Skip the test-set evaluation
        #[arg(long)]
        no_test: bool,
    },

    /// Report accuracy of the saved model on the test set
    Test,

    /// Classify a single image file with the saved model
    Classify {
        image: PathBuf,
    },
}

fn parse_level(s: &str) -> Level {
    match s {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install logger")?;

    match cli.command {
        Commands::Train {
            iterations,
            learning_rate,
            momentum,
            report_every,
            hidden,
            classes,
            seed,
            yes,
            no_test,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let train_set = read_train_set(&cli.data_dir)
                .with_context(|| format!("failed to read training set from {}", cli.data_dir.display()))?;

            let mut network = if cli.model.exists() {
                Network::load_json(&cli.model)
                    .with_context(|| format!("failed to load {}", cli.model.display()))?
            } else {
                let mut sizes = vec![train_set.pixel_count()];
                sizes.extend(hidden);
                sizes.push(classes);
                Network::create(&sizes, &mut rng)?
            };
            info!(sizes = ?network.layer_sizes(), "start learning");

            let config = TrainConfig::new(iterations, learning_rate, momentum)
                .with_report_every(report_every);
            train_loop(&mut network, &train_set, &config, &mut rng)?;

            if !no_test {
                run_test(&mut network, &cli.data_dir)?;
            }

            let stdin = io::stdin();
            let save = yes || confirm(&mut stdin.lock(), &mut io::stdout(), "To save the network press y: ")?;
            if save {
                save_network(&mut network, &cli.model)?;
            } else {
                println!("Not saving.");
            }
        }
        Commands::Test => {
            let mut network = Network::load_json(&cli.model)
                .with_context(|| format!("failed to load {}", cli.model.display()))?;
            run_test(&mut network, &cli.data_dir)?;
        }
        Commands::Classify { image } => {
            let mut network = Network::load_json(&cli.model)
                .with_context(|| format!("failed to load {}", cli.model.display()))?;
            let side = (network.input_size() as f64).sqrt() as u32;
            if (side * side) as usize != network.input_size() {
                anyhow::bail!(
                    "network input size {} is not a square image grid",
                    network.input_size()
                );
            }
            let input = load_grayscale_input(&image, side, side)
                .with_context(|| format!("failed to read {}", image.display()))?;
            let output = network.feed_forward(&input)?;
            println!("Class: {}", argmax(output));
            println!("Output: {:.4?}", output);
        }
    }

    Ok(())
}

fn run_test(network: &mut Network, data_dir: &Path) -> Result<()> {
    info!("start testing");
    let test_set = read_test_set(data_dir)
        .with_context(|| format!("failed to read test set from {}", data_dir.display()))?;
    let result = evaluate(network, &test_set)?;
    println!("Right: {} / {} ({:.2}%)", result.right, result.total, result.accuracy() * 100.0);
    Ok(())
}

fn save_network(network: &mut Network, path: &Path) -> Result<()> {
    println!("Saving...");
    network.clear_activations();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    network.save_json(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(())
}

/// Prints `prompt` and reads one line; true only when it starts with `y` or `Y`.
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.chars().next(), Some('y') | Some('Y')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> bool {
        let mut out = Vec::new();
        confirm(&mut text.as_bytes(), &mut out, "save? ").unwrap()
    }

    #[test]
    fn confirm_accepts_either_case() {
        assert!(answer("y\n"));
        assert!(answer("Yes\n"));
    }

    #[test]
    fn confirm_rejects_anything_else() {
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
        assert!(!answer("  y\n"));
    }

    #[test]
    fn confirm_prints_prompt() {
        let mut out = Vec::new();
        confirm(&mut "y\n".as_bytes(), &mut out, "save? ").unwrap();
        assert_eq!(out, b"save? ");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level("debug"), Level::DEBUG);
    }
}
