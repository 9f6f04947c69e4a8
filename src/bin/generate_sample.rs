//! Generates a synthetic ATLAS-style event CSV for demos and local runs.
//!
//! The file carries the full 30-feature schema of the Higgs challenge
//! dataset: jet-dependent features are set to the -999 sentinel for events
//! with too few reconstructed jets, the training file carries per-event
//! weights and b/s labels.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufWriter, Write};

const FEATURE_COLUMNS: [&str; 30] = [
    "DER_mass_MMC",
    "DER_mass_transverse_met_lep",
    "DER_mass_vis",
    "DER_pt_h",
    "DER_deltaeta_jet_jet",
    "DER_mass_jet_jet",
    "DER_prodeta_jet_jet",
    "DER_deltar_tau_lep",
    "DER_pt_tot",
    "DER_sum_pt",
    "DER_pt_ratio_lep_tau",
    "DER_met_phi_centrality",
    "DER_lep_eta_centrality",
    "PRI_tau_pt",
    "PRI_tau_eta",
    "PRI_tau_phi",
    "PRI_lep_pt",
    "PRI_lep_eta",
    "PRI_lep_phi",
    "PRI_met",
    "PRI_met_phi",
    "PRI_met_sumet",
    "PRI_jet_num",
    "PRI_jet_leading_pt",
    "PRI_jet_leading_eta",
    "PRI_jet_leading_phi",
    "PRI_jet_subleading_pt",
    "PRI_jet_subleading_eta",
    "PRI_jet_subleading_phi",
    "PRI_jet_all_pt",
];

/// Features undefined unless the event has at least two jets.
const TWO_JET_FEATURES: [&str; 7] = [
    "DER_deltaeta_jet_jet",
    "DER_mass_jet_jet",
    "DER_prodeta_jet_jet",
    "DER_lep_eta_centrality",
    "PRI_jet_subleading_pt",
    "PRI_jet_subleading_eta",
    "PRI_jet_subleading_phi",
];

/// Features undefined unless the event has at least one jet.
const ONE_JET_FEATURES: [&str; 3] = [
    "PRI_jet_leading_pt",
    "PRI_jet_leading_eta",
    "PRI_jet_leading_phi",
];

#[derive(Parser, Debug)]
#[command(version, about = "Generate a synthetic Higgs-challenge event CSV")]
struct Args {
    /// Number of events to generate
    #[arg(short, long, default_value_t = 1000)]
    rows: usize,

    /// Output CSV path
    #[arg(short, long, default_value = "sample_events.csv")]
    output: String,

    /// Omit the Weight and Label columns (held-out style file)
    #[arg(long)]
    held_out: bool,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Box-Muller transform for normally distributed values.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(1e-12..1.0);
    let u2: f64 = rng.r#gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn positive(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    gauss(rng, mean, std_dev).abs()
}

fn angle(rng: &mut StdRng) -> f64 {
    rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI)
}

fn feature_value(rng: &mut StdRng, name: &str, signal: bool, jet_num: i64) -> f64 {
    if jet_num < 2 && TWO_JET_FEATURES.contains(&name) {
        return -999.0;
    }
    if jet_num < 1 && ONE_JET_FEATURES.contains(&name) {
        return -999.0;
    }

    match name {
        // The mass estimator fails to converge for a slice of events
        "DER_mass_MMC" => {
            if rng.gen_bool(0.15) {
                -999.0
            } else if signal {
                positive(rng, 122.0, 12.0)
            } else {
                positive(rng, 95.0, 30.0)
            }
        }
        "DER_mass_transverse_met_lep" => positive(rng, if signal { 25.0 } else { 50.0 }, 20.0),
        "DER_mass_vis" => positive(rng, if signal { 85.0 } else { 75.0 }, 20.0),
        "DER_mass_jet_jet" => positive(rng, 370.0, 180.0),
        "DER_deltaeta_jet_jet" => positive(rng, 2.2, 1.2),
        "DER_prodeta_jet_jet" => gauss(rng, -0.8, 2.5),
        "DER_deltar_tau_lep" => positive(rng, 2.4, 0.6),
        "DER_pt_h" | "DER_pt_tot" => positive(rng, 45.0, 35.0),
        "DER_sum_pt" | "PRI_met_sumet" | "PRI_jet_all_pt" => {
            if jet_num == 0 && name == "PRI_jet_all_pt" {
                0.0
            } else {
                positive(rng, 150.0, 90.0)
            }
        }
        "DER_pt_ratio_lep_tau" => positive(rng, 1.2, 0.5),
        "DER_met_phi_centrality" | "DER_lep_eta_centrality" => rng.gen_range(-1.41..1.41),
        "PRI_tau_pt" | "PRI_lep_pt" => positive(rng, 40.0, 18.0),
        "PRI_jet_leading_pt" => positive(rng, 85.0, 40.0),
        "PRI_jet_subleading_pt" => positive(rng, 50.0, 20.0),
        "PRI_met" => positive(rng, 40.0, 25.0),
        name if name.ends_with("_eta") => gauss(rng, 0.0, 1.5),
        name if name.ends_with("_phi") => angle(rng),
        _ => gauss(rng, 0.0, 1.0),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "EventId")?;
    for name in FEATURE_COLUMNS {
        write!(writer, ",{}", name)?;
    }
    if !args.held_out {
        write!(writer, ",Weight,Label")?;
    }
    writeln!(writer)?;

    for i in 0..args.rows {
        let signal = rng.gen_bool(1.0 / 3.0);
        // Jet multiplicities roughly matching the challenge data
        let jet_num: i64 = match rng.gen_range(0..100) {
            0..=39 => 0,
            40..=70 => 1,
            71..=91 => 2,
            _ => 3,
        };

        write!(writer, "{}", 100000 + i)?;
        for name in FEATURE_COLUMNS {
            if name == "PRI_jet_num" {
                write!(writer, ",{}", jet_num)?;
            } else {
                let value = feature_value(&mut rng, name, signal, jet_num);
                if value == -999.0 {
                    write!(writer, ",-999.0")?;
                } else {
                    write!(writer, ",{:.3}", value)?;
                }
            }
        }
        if !args.held_out {
            let weight = if signal {
                rng.gen_range(0.001..0.02)
            } else {
                rng.gen_range(0.5..5.0)
            };
            writeln!(writer, ",{:.6},{}", weight, if signal { "s" } else { "b" })?;
        } else {
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    println!(
        "Wrote {} events to {} ({})",
        args.rows,
        args.output,
        if args.held_out {
            "held-out schema"
        } else {
            "training schema"
        }
    );

    Ok(())
}
