//! markodt CLI - rendered Markdown HTML to office documents and back

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use markodt::{extract_markdown_from_file, ConvertOptions, Converter, JsonFormat};

#[derive(Parser)]
#[command(name = "markodt")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert rendered Markdown HTML to office documents and extract them back", long_about = None)]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HTML files to flat ODF text documents
    Convert {
        /// Input HTML files
        #[arg(value_name = "HTML", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input only)
        #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Dump the assembled document body as JSON
    Json {
        /// Input HTML file
        #[arg(value_name = "HTML")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Extract Markdown-like text from a flat ODF text document
    #[command(alias = "md")]
    Extract {
        /// Input document
        #[arg(value_name = "FODT")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Conversion settings; flags override the config file.
#[derive(Args, Default)]
struct OptionArgs {
    /// JSON config file
    #[arg(long, value_name = "FILE", env = "MARKODT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory image references resolve against
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Static image route prefix
    #[arg(long, value_name = "PREFIX")]
    route_prefix: Option<String>,

    /// Maximum image print width in inches
    #[arg(long, value_name = "IN")]
    max_width: Option<f64>,

    /// Pixel density for image sizing
    #[arg(long, value_name = "N")]
    dpi: Option<f64>,

    /// Extra highlight color (e.g., "gray=#E0E0E0")
    #[arg(long = "color", value_name = "NAME=HEX")]
    colors: Vec<String>,
}

impl OptionArgs {
    fn load(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::from_json_file(path)?,
            None => ConvertOptions::default(),
        };

        if let Some(dir) = &self.image_dir {
            options = options.with_image_dir(dir);
        }
        if let Some(prefix) = &self.route_prefix {
            options = options.with_route_prefix(prefix.as_str());
        }
        if let Some(width) = self.max_width {
            options = options.with_max_width(width);
        }
        if let Some(dpi) = self.dpi {
            options = options.with_dpi(dpi);
        }
        for spec in &self.colors {
            let (name, display) = parse_color(spec)?;
            options = options.with_color(name, display);
        }

        options.validate()?;
        Ok(options)
    }
}

fn parse_color(spec: &str) -> Result<(&str, &str), String> {
    match spec.split_once('=') {
        Some((name, display)) if !name.trim().is_empty() && !display.trim().is_empty() => {
            Ok((name.trim(), display.trim()))
        }
        _ => Err(format!("Invalid color '{}', expected NAME=HEX", spec)),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            output_dir,
            options,
        }) => cmd_convert(&inputs, output.as_deref(), output_dir.as_deref(), &options),
        Some(Commands::Json {
            input,
            output,
            compact,
            options,
        }) => cmd_json(&input, output.as_deref(), compact, &options),
        Some(Commands::Extract { input, output }) => cmd_extract(&input, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&[input], None, None, &OptionArgs::default())
            } else {
                println!("{}", "Usage: markodt <FILE>".yellow());
                println!("       markodt --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Where the document for `input` is written.
fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input.with_extension("fodt");
    match output_dir {
        Some(dir) => dir.join(file_name.file_name().unwrap_or_default()),
        None => file_name,
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    output_dir: Option<&Path>,
    args: &OptionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && inputs.len() > 1 {
        return Err("--output takes a single input; use --output-dir".into());
    }

    let converter = Converter::new(args.load()?)?;
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let documents = inputs
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Converting...");

    let results = converter.convert_many(&documents[..]);

    let mut failures = 0;
    let mut saved = Vec::new();
    for (input, result) in inputs.iter().zip(results) {
        let dest = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| output_path(input, output_dir));

        match result.and_then(|artifact| {
            let stats = *artifact.stats();
            artifact.persist(&dest).map(|path| (path, stats))
        }) {
            Ok((path, stats)) => saved.push((path, stats)),
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
                failures += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (path, stats) in &saved {
        println!("{} {}", "Saved to".green(), path.display());
        println!(
            "  {} {} paragraphs, {} headings, {} images",
            "└─".dimmed(),
            stats.paragraph_count,
            stats.heading_count,
            stats.image_count
        );
        if stats.skipped_image_count > 0 {
            println!(
                "     {}",
                format!("{} images skipped", stats.skipped_image_count).yellow()
            );
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} conversions failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &OptionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::new(args.load()?)?;
    let html = fs::read_to_string(input)?;
    let body = converter.to_body(&html);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = markodt::to_json(&body, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_extract(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = extract_markdown_from_file(input)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "markodt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown HTML to office document converter");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/markodt".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("gray=#E0E0E0").unwrap(), ("gray", "#E0E0E0"));
        assert!(parse_color("gray").is_err());
        assert!(parse_color("=#fff").is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("notes/a.html"), None), PathBuf::from("notes/a.fodt"));
        assert_eq!(
            output_path(Path::new("notes/a.html"), Some(Path::new("out"))),
            PathBuf::from("out/a.fodt")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("markodt.json");
        fs::write(&config, r#"{ "dpi": 72, "max_width_in": 5.0 }"#).unwrap();

        let args = OptionArgs {
            config: Some(config),
            dpi: Some(150.0),
            colors: vec!["gray=#E0E0E0".to_string()],
            ..Default::default()
        };
        let options = args.load().unwrap();
        assert_eq!(options.dpi, 150.0);
        assert_eq!(options.max_width_in, 5.0);
        assert!(options.colors.contains("gray"));
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let args = OptionArgs {
            dpi: Some(0.0),
            ..Default::default()
        };
        assert!(args.load().is_err());
    }
}
