//! SMPS - Switched-mode converter design calculator
//!
//! # Usage
//!
//! ```bash
//! smps boost.smps
//! smps --preset flyback --clock 16M --arr 319 --csv -
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use smps_core::{
    calculate,
    converter::ConverterInput,
    dsl,
    error::{Result, SmpsError},
    output,
    timer::{FixedDivider, TimerSettings},
    synthesize_waveform, SynthesizerConfig, Topology, DEFAULT_PERIODS, DEFAULT_SAMPLES,
};

/// Switched-mode converter design calculator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the design file (.smps)
    #[arg(value_name = "DESIGN_FILE", required_unless_present = "preset")]
    design_file: Option<PathBuf>,

    /// Use a built-in reference design instead of a file
    #[arg(long, value_parser = parse_topology, conflicts_with = "design_file")]
    preset: Option<Topology>,

    /// Timer base clock in Hz (accepts unit suffixes, e.g. 72M)
    #[arg(long, value_parser = parse_frequency)]
    clock: Option<f64>,

    /// Hold the prescaler register fixed
    #[arg(long)]
    psc: Option<u32>,

    /// Hold the auto-reload register fixed (ignored when --psc is given)
    #[arg(long)]
    arr: Option<u32>,

    /// Switching periods shown in the waveform
    #[arg(long, default_value_t = DEFAULT_PERIODS)]
    periods: usize,

    /// Waveform sample points
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Write the waveform as CSV to a file, or `-` for stdout
    #[arg(long, value_name = "PATH")]
    csv: Option<String>,

    /// Write the effective design back out as a design file
    #[arg(long, value_name = "PATH")]
    emit_design: Option<PathBuf>,

    /// Suppress the text report
    #[arg(short, long)]
    quiet: bool,
}

fn parse_topology(s: &str) -> std::result::Result<Topology, String> {
    Topology::from_name(s).ok_or_else(|| format!("unknown topology '{s}' (boost, buck, flyback)"))
}

fn parse_frequency(s: &str) -> std::result::Result<f64, String> {
    dsl::parse_value(s).ok_or_else(|| format!("invalid frequency '{s}'"))
}

/// Apply command-line timer overrides on top of the design's own settings.
fn timer_overrides(args: &Args, mut timer: TimerSettings) -> TimerSettings {
    if let Some(clock) = args.clock {
        timer.clock = clock;
    }
    if args.psc.is_some() || args.arr.is_some() {
        timer.fixed = FixedDivider::from_flags(args.psc, args.arr);
    }
    timer
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Load the design
    let input = match (&args.design_file, args.preset) {
        (Some(path), _) => ConverterInput::from_ast(&dsl::parse_file(path)?)?,
        (None, Some(topology)) => ConverterInput::preset(topology),
        (None, None) => return Err(SmpsError::MissingTopology),
    };
    let input = input.with_timer(timer_overrides(&args, input.timer));

    // Compute
    let result = calculate(&input)?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    if !args.quiet {
        output::write_report(&result, &mut stdout)?;
        writeln!(
            stdout,
            "f(achieved)       = {:.3} Hz",
            result.timer.achieved_frequency(input.timer.clock)
        )?;
    }

    if let Some(path) = &args.emit_design {
        let mut file = BufWriter::new(File::create(path)?);
        output::write_design(&input, &mut file)?;
        file.flush()?;
    }

    if let Some(target) = &args.csv {
        let config = SynthesizerConfig::new()
            .with_periods(args.periods)
            .with_samples(args.samples);
        let series = synthesize_waveform(&result, &config);

        if target == "-" {
            output::write_waveform_csv(&series, &mut stdout)?;
        } else {
            let mut file = BufWriter::new(File::create(target)?);
            output::write_waveform_csv(&series, &mut file)?;
            file.flush()?;
        }
    }

    Ok(())
}
