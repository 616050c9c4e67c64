use std::{error::Error, fs, path::Path};

use axyb_calib::{run_calibration, CalibConfig, CalibInput, CalibReport};
use clap::Parser;

/// Calibration CLI for dual-robot AX = YB hand-eye estimation.
#[derive(Debug, Parser)]
#[command(author, version, about = "AX = YB hand-eye calibration via SDP")]
struct Args {
    /// Path to JSON file with the regression data (rho1, rho2, R1).
    #[arg(long)]
    input: String,

    /// Optional path to a JSON CalibConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Optional path for the solution JSON (err, Hx, Hy). Printed to stdout
    /// together with solver statistics either way.
    #[arg(long)]
    output: Option<String>,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

fn run_from_files(
    input_path: &str,
    config_path: Option<&str>,
    output_path: Option<&str>,
) -> Result<CalibReport, Box<dyn Error>> {
    let input: CalibInput = load_json_file(Path::new(input_path))?;

    let config = if let Some(cfg_path) = config_path {
        load_json_file::<CalibConfig>(Path::new(cfg_path))?
    } else {
        CalibConfig::default()
    };

    let report = run_calibration(&input, &config)?;

    if let Some(out_path) = output_path {
        let json = serde_json::to_string_pretty(&report.solution)?;
        fs::write(out_path, json)?;
    }

    Ok(report)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let report = run_from_files(&args.input, args.config.as_deref(), args.output.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axyb_calib::{synthetic, CalibSolution};
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn solves_from_files_and_writes_solution() {
        let synth = synthetic::nominal(5);

        let input_file = NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(fs::File::create(input_file.path()).unwrap(), &synth.input)
            .unwrap();
        let output_file = NamedTempFile::new().unwrap();

        let report = run_from_files(
            input_file.path().to_str().unwrap(),
            None,
            Some(output_file.path().to_str().unwrap()),
        )
        .expect("cli helper should succeed");
        assert!(report.converged);

        let written = fs::read_to_string(output_file.path()).unwrap();
        let solution: CalibSolution = serde_json::from_str(&written).unwrap();
        assert_eq!(solution, report.solution);
        assert_eq!(solution.hx[(3, 3)], 1.0);
    }

    #[test]
    fn custom_config_file_is_honored() {
        let synth = synthetic::nominal(6);

        let input_file = NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(fs::File::create(input_file.path()).unwrap(), &synth.input)
            .unwrap();

        let config = CalibConfig {
            gap_tol: Some(1e-4),
            ..Default::default()
        };
        let config_file = NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(fs::File::create(config_file.path()).unwrap(), &config)
            .unwrap();

        let report = run_from_files(
            input_file.path().to_str().unwrap(),
            Some(config_file.path().to_str().unwrap()),
            None,
        )
        .expect("cli helper should succeed");
        assert!(report.gap <= 1e-4 * 1.01);
    }
}
