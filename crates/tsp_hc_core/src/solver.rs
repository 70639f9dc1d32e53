use std::{sync::Arc, time::Instant};

use crate::{
    Error, Result,
    algo::{circuit::HeapableCircuit, search::BestFirstSearch},
    constants::MIN_CYCLE_POINTS,
    geo::{
        arena::VertexArena,
        dedupe::dedup_vertices,
        perimeter::{ConvexHullPerimeter, ExtremeTrianglePerimeter, PerimeterBuilder},
        point::Vertex,
    },
    io::{input::PointSet, options::SearchOptions},
    tour::Tour,
};

const ERR_INVALID_POINT: &str = "Input contains a point with a non-finite coordinate";

/// Builds a closed tour over `vertices` starting from `builder`'s perimeter.
pub fn solve<V, B>(vertices: Vec<V>, builder: &B, options: &SearchOptions) -> Result<Tour<V>>
where
    V: Vertex + Clone,
    B: PerimeterBuilder<V> + ?Sized,
{
    let now = Instant::now();
    let input_len = vertices.len();
    let vertices = if options.dedupe {
        dedup_vertices(vertices)
    } else {
        vertices
    };

    if vertices.len() < MIN_CYCLE_POINTS {
        return Err(Error::invalid_input(format!(
            "Need at least {MIN_CYCLE_POINTS} distinct points for a cycle, got {}",
            vertices.len()
        )));
    }

    log::info!(
        "solver: start n={} input={input_len} max_clones={} candidate_limit={:?}",
        vertices.len(),
        options.max_clones,
        options.candidate_limit()
    );

    let arena = Arc::new(VertexArena::new(vertices));
    let mut circuit = HeapableCircuit::new(Arc::clone(&arena), options.candidate_limit());
    circuit.build_perimeter(builder)?;

    let outcome = BestFirstSearch::new(options.max_clones).run(circuit)?;
    let tour = Tour::from_order(&arena, &outcome.circuit.attached_vertices());

    log::info!(
        "solver: complete n={} length={:.6} steps={} clones={} time={:.2}s",
        tour.len(),
        outcome.circuit.length(),
        outcome.stats.steps,
        outcome.stats.clones,
        now.elapsed().as_secs_f32()
    );
    Ok(tour)
}

/// Solves parsed input with the perimeter that fits its dimension and returns
/// the same points in tour order.
pub fn solve_points(points: PointSet, options: &SearchOptions) -> Result<PointSet> {
    match points {
        PointSet::Planar(points) => {
            if points.iter().any(|p| !p.is_valid()) {
                return Err(Error::invalid_input(ERR_INVALID_POINT));
            }
            let tour = solve(points, &ConvexHullPerimeter, options)?;
            tour.tour_metrics();
            Ok(PointSet::Planar(tour.vertices))
        }
        PointSet::Spatial(points) => {
            if points.iter().any(|p| !p.is_valid()) {
                return Err(Error::invalid_input(ERR_INVALID_POINT));
            }
            let tour = solve(points, &ExtremeTrianglePerimeter, options)?;
            tour.tour_metrics();
            Ok(PointSet::Spatial(tour.vertices))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{solve, solve_points};
    use crate::{
        Error,
        geo::{
            perimeter::ConvexHullPerimeter,
            point::{Point2d, Point3d},
        },
        io::{input::PointSet, options::SearchOptions},
    };

    #[test]
    fn solves_hull_fixture_into_full_tour() {
        let points = vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(20.0, -5.0),
            Point2d::new(30.0, 15.0),
            Point2d::new(15.0, 30.0),
            Point2d::new(-5.0, 18.0),
            Point2d::new(10.0, 10.0),
            Point2d::new(18.0, 12.0),
            Point2d::new(4.0, 21.0),
        ];

        let tour = solve(points, &ConvexHullPerimeter, &SearchOptions::default()).expect("solve");

        assert_eq!(tour.len(), 8);
        assert_eq!(tour.vertices[0], Point2d::new(0.0, 0.0));
        assert!((tour.total_length() - 122.853_061_145_419).abs() < 1e-6);
    }

    #[test]
    fn duplicates_are_removed_before_solving() {
        let points = vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(4.0, 0.0),
            Point2d::new(4.0, 3.0),
            Point2d::new(4.0, 3.0),
        ];

        let tour = solve(points, &ConvexHullPerimeter, &SearchOptions::default()).expect("solve");

        assert_eq!(tour.len(), 3);
        assert!((tour.total_length() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn fewer_than_three_distinct_points_is_invalid_input() {
        let points = vec![
            Point2d::new(1.0, 1.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(2.0, 2.0),
        ];

        let err = solve(points, &ConvexHullPerimeter, &SearchOptions::default())
            .expect_err("too few points");

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("at least 3 distinct points"));
    }

    #[test]
    fn solve_points_dispatches_on_dimension() {
        let mut rng = StdRng::seed_from_u64(11);
        let spatial: Vec<Point3d> = (0..12)
            .map(|_| {
                Point3d::new(
                    rng.random_range(0.0..10.0),
                    rng.random_range(0.0..10.0),
                    rng.random_range(0.0..10.0),
                )
            })
            .collect();

        let solved = solve_points(PointSet::Spatial(spatial.clone()), &SearchOptions::default())
            .expect("solve spatial");

        let PointSet::Spatial(ordered) = solved else {
            panic!("dimension changed");
        };
        assert_eq!(ordered.len(), spatial.len());
        assert!(spatial.iter().all(|p| ordered.contains(p)));
    }

    #[test]
    fn candidate_limit_and_clone_budget_still_visit_every_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let planar: Vec<Point2d> = (0..60)
            .map(|_| Point2d::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let options = SearchOptions {
            max_clones: 20,
            candidate_limit: 4,
            ..SearchOptions::default()
        };

        let solved = solve_points(PointSet::Planar(planar), &options).expect("solve planar");

        assert_eq!(solved.len(), 60);
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let err = solve_points(
            PointSet::Planar(vec![
                Point2d::new(0.0, 0.0),
                Point2d::new(f64::NAN, 1.0),
                Point2d::new(1.0, 1.0),
            ]),
            &SearchOptions::default(),
        )
        .expect_err("nan point");
        assert!(err.to_string().contains("non-finite"));
    }
}
