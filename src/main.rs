use std::time::Instant;

use log::info;

use tsp_hc_core::{
    PointSet, Result, SearchOptions,
    io::{input, output},
    logging, solve_points,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SearchOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let points = input::read_points(options.input_path())?;
    info!("input: n={} dimension={}", points.len(), points.dimension());

    let tour = solve_points(points, &options)?;

    match &tour {
        PointSet::Planar(points) => output::write_points(options.output_path(), points)?,
        PointSet::Spatial(points) => output::write_points(options.output_path(), points)?,
    }

    info!(
        "output: n={} time={:.2}s",
        tour.len(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
