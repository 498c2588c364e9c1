use std::error::Error;
use std::f64::consts::PI;

use clap::Parser;
use log::info;
use nalgebra::Vector3;
use plotters::coord::Shift;
use plotters::prelude::*;

use orbit_drift::astro::OrbitalState;
use orbit_drift::consts::{
    ASTRONOMICAL_UNIT, EARTH_MASS, LUNAR_DISTANCE, SIDEREAL_MONTH, SIDEREAL_YEAR,
};
use orbit_drift::math::geometry::{rotate_xy, rotate_yz};
use orbit_drift::perturbation::{
    EngineConfig, EphemerisSample, OblatenessSource, PerturbationEngine, PerturbationSource,
    ThirdBodySource,
};
use orbit_drift::project_to_cartesian;

const SECONDS_PER_DAY: f64 = 86_400.0;
const OBLIQUITY: f64 = 23.439 * PI / 180.0;
const LUNAR_INCLINATION: f64 = 5.145 * PI / 180.0;

/// Propagates a perturbed Earth orbit and reports how its elements drift.
#[derive(Debug, Parser)]
struct Args {
    /// Semi-major axis, in km
    #[arg(long, default_value_t = 7000.0)]
    sma_km: f64,
    #[arg(long, default_value_t = 0.01)]
    ecc: f64,
    #[arg(long, default_value_t = 51.6)]
    incl_deg: f64,
    #[arg(long, default_value_t = 0.0)]
    lan_deg: f64,
    #[arg(long, default_value_t = 0.0)]
    argp_deg: f64,
    /// How long to simulate, in days
    #[arg(long, default_value_t = 7.0)]
    days: f64,
    /// Length of one tick, in seconds
    #[arg(long, default_value_t = 10.0)]
    step: f64,
    #[arg(long)]
    no_solar: bool,
    #[arg(long)]
    lunar: bool,
    #[arg(long)]
    oblateness: bool,
    #[arg(long, default_value_t = 0.999)]
    max_ecc: f64,
    /// Write a PNG of the element drift here
    #[arg(long)]
    plot: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    day: f64,
    node_drift: f64,
    sma_change: f64,
}

// Circular orbits are good enough to drive the perturbations
fn sun_position(time: f64) -> Vector3<f64> {
    let angle = 2.0 * PI * time / SIDEREAL_YEAR;
    let ecliptic = rotate_xy(&Vector3::x(), angle) * ASTRONOMICAL_UNIT;
    rotate_yz(&ecliptic, OBLIQUITY)
}

fn moon_position(time: f64) -> Vector3<f64> {
    let angle = 2.0 * PI * time / SIDEREAL_MONTH;
    let in_plane = rotate_xy(&Vector3::x(), angle) * LUNAR_DISTANCE;
    rotate_yz(&in_plane, OBLIQUITY + LUNAR_INCLINATION)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut state = OrbitalState::new(
        args.sma_km * 1000.0,
        args.ecc,
        args.incl_deg.to_radians(),
        args.lan_deg.to_radians(),
        args.argp_deg.to_radians(),
        0.0,
        EARTH_MASS,
    )?;
    let initial = state;
    let mu = state.mu();

    let engine = PerturbationEngine::new(EngineConfig::new(args.max_ecc, 1.0)?);
    let solar = ThirdBodySource::solar();
    let lunar = ThirdBodySource::lunar();
    let oblateness = OblatenessSource::earth();

    let num_steps = (args.days * SECONDS_PER_DAY / args.step).ceil() as usize;
    let sample_every = (num_steps / 500).max(1);
    info!("simulating {} ticks of {} s", num_steps, args.step);

    let mut samples = Vec::with_capacity(num_steps / sample_every + 1);
    for i in 0..num_steps {
        let time = i as f64 * args.step;

        let mut sources: Vec<(&dyn PerturbationSource, EphemerisSample)> = Vec::new();
        if !args.no_solar {
            sources.push((&solar, EphemerisSample::from_position(sun_position(time))));
        }
        if args.lunar {
            sources.push((&lunar, EphemerisSample::from_position(moon_position(time))));
        }
        if args.oblateness {
            sources.push((&oblateness, EphemerisSample::default()));
        }

        engine.step(&mut state, args.step, &sources);
        state.advance_anomaly(args.step)?;

        if i % sample_every == 0 {
            samples.push(Sample {
                day: (time + args.step) / SECONDS_PER_DAY,
                node_drift: (state.long_asc_node() - initial.long_asc_node()).to_degrees(),
                sma_change: state.semi_major_axis() - initial.semi_major_axis(),
            });
        }
    }

    let cartesian = project_to_cartesian(&state, mu);

    println!("After {} days:", args.days);
    println!("- Semi-major axis: {} km", state.semi_major_axis() / 1000.0);
    println!("- Eccentricity: {}", state.eccentricity());
    println!("- Inclination: {}", state.inclination().to_degrees());
    println!("- LAN: {}", state.long_asc_node().to_degrees());
    println!("- Argument of periapsis: {}", state.arg_periapsis().to_degrees());
    println!("- True anomaly: {}", state.true_anomaly().to_degrees());
    println!("- Position: {:?} km", (cartesian.position() / 1000.0).as_slice());
    println!("- Speed: {} km/s", cartesian.speed() / 1000.0);
    println!("- Discarded contributions: {}", engine.discarded_contributions());

    if let Some(path) = &args.plot {
        draw_plot(path, &samples)?;
        info!("wrote {}", path);
    }

    Ok(())
}

fn draw_plot(path: &str, samples: &[Sample]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 1));
    let last_day = samples.last().map_or(1.0, |s| s.day).max(1e-3) as f32;

    let node: Vec<(f32, f32)> = samples
        .iter()
        .map(|s| (s.day as f32, s.node_drift as f32))
        .collect();
    draw_panel(&panels[0], "LAN drift (deg)", last_day, node, &RED)?;

    let sma: Vec<(f32, f32)> = samples
        .iter()
        .map(|s| (s.day as f32, s.sma_change as f32))
        .collect();
    draw_panel(&panels[1], "semi-major axis change (m)", last_day, sma, &BLUE)?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    last_day: f32,
    points: Vec<(f32, f32)>,
    color: &RGBColor,
) -> Result<(), Box<dyn Error>> {
    let (lo, hi) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
    let pad = ((hi - lo) * 0.05).max(1e-6);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0f32..last_day, (lo - pad)..(hi + pad))?;

    chart.configure_mesh().x_desc("days").draw()?;
    chart.draw_series(LineSeries::new(points, color))?;

    Ok(())
}
