//! pjpg - Prepare images for embedded display widgets
//!
//! Converts images to PJPG containers or QOI streams, writes the base64 text
//! form used for transport, and inspects existing payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use log::{error, info, Level};
use pjpg_core::{convert, inspect, ConvertOptions, FileInfo, OutputFormat};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pjpg")]
#[command(version)]
#[command(about = "Convert images to PJPG or QOI payloads for embedded displays", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image (JPEG, PNG) to PJPG or QOI
    Convert {
        /// Input image file
        input: PathBuf,

        /// Output file; a `.qoi` extension selects QOI
        output: PathBuf,

        /// Force QOI output
        #[arg(long)]
        qoi: bool,

        /// JPEG quality (1-100), PJPG only
        #[arg(long, default_value_t = pjpg_core::convert::DEFAULT_QUALITY,
              value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Add an alpha JPEG when the image has transparency, PJPG only
        #[arg(long)]
        alpha: bool,

        /// Drop the JFIF APP0 segment as well
        #[arg(long)]
        strip_app0: bool,

        /// Ignore EXIF orientation
        #[arg(long)]
        no_orientation: bool,

        /// Print the base64 text to stdout
        #[arg(long)]
        stdout: bool,

        /// Do not write `<output>.base64.txt`
        #[arg(long)]
        no_base64: bool,
    },

    /// Describe a QOI, PJPG or JPEG file
    Inspect {
        /// File to inspect
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the base64 text form of any file
    Base64 {
        /// File to encode
        input: PathBuf,

        /// Output text file (default: `<input>.base64.txt`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logger(&cli) {
        eprintln!("Failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logger(cli: &Cli) -> Result<(), log::SetLoggerError> {
    let level = if cli.quiet {
        Level::Error
    } else {
        match cli.verbose {
            0 => Level::Warn,
            1 => Level::Info,
            2 => Level::Debug,
            _ => Level::Trace,
        }
    };
    simple_logger::init_with_level(level)
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Convert {
            input,
            output,
            qoi,
            quality,
            alpha,
            strip_app0,
            no_orientation,
            stdout,
            no_base64,
        } => {
            let bytes = read_input(&input)?;

            let format = if qoi {
                OutputFormat::Qoi
            } else {
                OutputFormat::from_path(&output)
            };
            let options = ConvertOptions {
                format,
                quality,
                keep_app0: !strip_app0,
                include_alpha: alpha,
                apply_orientation: !no_orientation,
            };
            info!("Converting '{}' with {:?}", input.display(), options);

            let converted = convert(&bytes, &options)?;
            fs::write(&output, &converted.data)
                .map_err(|e| format!("Failed to write '{}': {}", output.display(), e))?;
            info!(
                "Written {}x{} {:?} ({} bytes) to '{}'",
                converted.width,
                converted.height,
                converted.format,
                converted.data.len(),
                output.display()
            );

            if stdout || !no_base64 {
                let text = STANDARD.encode(&converted.data);
                if !no_base64 {
                    write_base64(&base64_path(&output), &text)?;
                }
                if stdout {
                    println!("{text}");
                }
            }
        }

        Commands::Inspect { input, json } => {
            let bytes = read_input(&input)?;
            let info = inspect(&bytes);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_summary(&input, &info);
            }
        }

        Commands::Base64 { input, output } => {
            let bytes = read_input(&input)?;
            let text = STANDARD.encode(&bytes);
            let path = output.unwrap_or_else(|| base64_path(&input));
            write_base64(&path, &text)?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    info!("Read {} bytes from '{}'", bytes.len(), path.display());
    Ok(bytes)
}

/// `<path>.base64.txt`, keeping the existing extension.
fn base64_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".base64.txt");
    PathBuf::from(name)
}

fn write_base64(path: &Path, text: &str) -> Result<(), String> {
    fs::write(path, text).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    info!("Written {} base64 characters to '{}'", text.len(), path.display());
    Ok(())
}

fn print_summary(path: &Path, info: &FileInfo) {
    println!("{}:", path.display());
    match info {
        FileInfo::Qoi(header) => {
            println!("  format:     QOI");
            println!("  size:       {}x{}", header.width, header.height);
            println!("  channels:   {}", header.channels);
            println!("  colorspace: {}", header.colorspace);
        }
        FileInfo::Pjpg {
            header,
            color,
            alpha,
        } => {
            println!("  format:     PJPG v{}", header.version);
            println!("  size:       {}x{}", header.width, header.height);
            println!("  color JPEG: {} bytes, {:?}", header.color_size, color);
            match alpha {
                Some(alpha) => println!("  alpha JPEG: {} bytes, {:?}", header.alpha_size, alpha),
                None => println!("  alpha JPEG: none"),
            }
        }
        FileInfo::Jpeg {
            frame,
            dimensions,
            conformance,
            orientation,
        } => {
            println!("  format:      JPEG");
            if let Some((width, height)) = dimensions {
                println!("  size:        {width}x{height}");
            }
            if let Some(frame) = frame {
                println!(
                    "  frame:       SOF{} {}-bit, {} components",
                    frame.marker - 0xC0,
                    frame.precision,
                    frame.components.len()
                );
                for c in &frame.components {
                    println!("    component {}: {}x{}", c.id, c.h, c.v);
                }
            }
            println!("  conformance: {:?}", conformance);
            println!("  orientation: {:?}", orientation);
        }
        FileInfo::Unknown { size } => {
            println!("  format: unknown ({size} bytes)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_base64_path_keeps_extension() {
        assert_eq!(
            base64_path(Path::new("out/image.pjpg")),
            PathBuf::from("out/image.pjpg.base64.txt")
        );
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "pjpg", "-vv", "convert", "in.png", "out.bin", "--quality", "70", "--alpha",
            "--strip-app0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert {
                quality,
                alpha,
                strip_app0,
                qoi,
                ..
            } => {
                assert_eq!(quality, 70);
                assert!(alpha);
                assert!(strip_app0);
                assert!(!qoi);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let result = Cli::try_parse_from(["pjpg", "convert", "a.png", "b", "--quality", "0"]);
        assert!(result.is_err());
    }
}
