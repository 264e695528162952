use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use icp_harness::report::{format_state_row, table_header, write_states_json};
use icp_harness::synthetic::{rigidly_moved, DemoShape};
use icp_math::{run_icp_with_params, IcpParams, Point};
use icp_shared::config_storage::load_params_file;
use icp_shared::{load_curve, save_curve, ConfigStorage, Playback};

/// Parse an offset string in format "x,y"
fn parse_offset(s: &str) -> Result<Point, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Offset must be in format 'x,y'".to_string());
    }

    let x = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid x offset".to_string())?;
    let y = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid y offset".to_string())?;

    Ok(Point::new(x, y))
}

/// Command line arguments for curve alignment
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Align a source curve onto a target curve with ICP",
    long_about = "Resamples two hand-drawn curves at fixed arc-length spacing and runs \
        point-to-point Iterative Closest Point for a fixed number of iterations.\n\n\
        Curves are plain text point lists (an x<TAB>y header, then one x<TAB>y row per \
        point). Without --source/--target a built-in demo pair is generated."
)]
struct Args {
    #[arg(short, long, requires = "target", help = "Source curve point list")]
    source: Option<PathBuf>,

    #[arg(short, long, requires = "source", help = "Target curve point list")]
    target: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value_t = DemoShape::Blob,
        help = "Demo shape used when no curves are given"
    )]
    demo: DemoShape,

    #[arg(
        long,
        default_value_t = 15.0,
        allow_negative_numbers = true,
        help = "Demo target rotation in degrees"
    )]
    demo_angle: f64,

    #[arg(
        long,
        default_value = "6,4",
        value_parser = parse_offset,
        allow_negative_numbers = true,
        help = "Demo target offset as 'x,y'"
    )]
    demo_offset: Point,

    #[arg(
        long,
        help = "JSON parameter file",
        long_help = "JSON file with source_spacing, target_spacing and max_iterations. \
            When omitted, parameters saved in ~/.icp_config are used if present, \
            otherwise the defaults (10, 10, 20). Explicit flags override either."
    )]
    params: Option<PathBuf>,

    #[arg(long, help = "Arc-length spacing for the source curve")]
    source_spacing: Option<f64>,

    #[arg(long, help = "Arc-length spacing for the target curve")]
    target_spacing: Option<f64>,

    #[arg(short = 'n', long, help = "Number of ICP iterations after iteration 0")]
    max_iterations: Option<usize>,

    #[arg(long, help = "Store the effective parameters in ~/.icp_config")]
    save_params: bool,

    #[arg(short, long, help = "Write every iteration state as JSON")]
    output: Option<PathBuf>,

    #[arg(long, help = "Write the final transformed source curve as a point list")]
    export_aligned: Option<PathBuf>,

    #[arg(long, help = "Replay rows with error-adaptive delays")]
    animate: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn resolve_params(args: &Args, storage: Option<&ConfigStorage>) -> anyhow::Result<IcpParams> {
    let mut params = match (&args.params, storage.and_then(ConfigStorage::get_params)) {
        (Some(path), _) => load_params_file(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?,
        (None, Some(stored)) => stored.context("reading stored parameters")?,
        (None, None) => IcpParams::default(),
    };

    if let Some(spacing) = args.source_spacing {
        params.source_spacing = spacing;
    }
    if let Some(spacing) = args.target_spacing {
        params.target_spacing = spacing;
    }
    if let Some(iterations) = args.max_iterations {
        params.max_iterations = iterations;
    }

    params.validate()?;
    Ok(params)
}

fn load_curves(args: &Args) -> anyhow::Result<(Vec<Point>, Vec<Point>)> {
    match (&args.source, &args.target) {
        (Some(source), Some(target)) => {
            let source_curve = load_curve(source)
                .with_context(|| format!("loading source curve {}", source.display()))?;
            let target_curve = load_curve(target)
                .with_context(|| format!("loading target curve {}", target.display()))?;
            Ok((source_curve, target_curve))
        }
        (None, None) => {
            log::info!(
                "Using demo {} curve rotated {} deg, offset ({}, {})",
                args.demo,
                args.demo_angle,
                args.demo_offset.x,
                args.demo_offset.y
            );
            let source_curve = args.demo.curve(120);
            let target_curve =
                rigidly_moved(&source_curve, args.demo_angle.to_radians(), args.demo_offset)?;
            Ok((source_curve, target_curve))
        }
        _ => bail!("--source and --target must be given together"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let storage = match ConfigStorage::new() {
        Ok(storage) => Some(storage),
        Err(e) => {
            log::warn!("Config storage unavailable: {e}");
            None
        }
    };

    let params = resolve_params(&args, storage.as_ref())?;
    let (source_curve, target_curve) = load_curves(&args)?;

    println!(
        "Aligning {} source points onto {} target points (spacing {} / {}, {} iterations)",
        source_curve.len(),
        target_curve.len(),
        params.source_spacing,
        params.target_spacing,
        params.max_iterations
    );

    let states = run_icp_with_params(&source_curve, &target_curve, &params)?;

    println!("{}", table_header());
    let mut playback = Playback::for_states(&states);
    loop {
        println!("{}", format_state_row(&states[playback.current()]));
        if args.animate && !playback.is_at_end() {
            std::thread::sleep(playback.frame_delay(&states));
        }
        if !playback.step_forward() {
            break;
        }
    }

    if let Some(path) = &args.output {
        write_states_json(path, &states)
            .with_context(|| format!("writing states to {}", path.display()))?;
        println!("States saved to {}", path.display());
    }

    if let Some(path) = &args.export_aligned {
        if let Some(last) = states.last() {
            save_curve(path, &last.transformed_points)
                .with_context(|| format!("writing aligned curve to {}", path.display()))?;
            println!("Aligned curve saved to {}", path.display());
        }
    }

    if args.save_params {
        let Some(storage) = &storage else {
            bail!("cannot save parameters without a config directory");
        };
        let path = storage.save_params(&params)?;
        println!("Parameters saved to {}", path.display());
    }

    Ok(())
}
