#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::stopmove::gbsmot::{build_regions, classify, classify_with_regions};
    use crate::trajectory::{Mode, Point, Region, Trajectory};
    use quickcheck::{TestResult, quickcheck};

    /// Points on the x axis, one second apart
    fn along_x(xs: &[f64]) -> Trajectory {
        let points = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| Point::new(x, 0.0, i as i64 * 1000))
            .collect();
        Trajectory::new(points, Mode::Cartesian).expect("valid trajectory")
    }

    /// Geographic points one second apart
    fn geo(latlons: &[(f64, f64)]) -> Trajectory {
        let points = latlons
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| Point::new(lat, lon, i as i64 * 1000))
            .collect();
        Trajectory::new(points, Mode::Geographic).expect("valid trajectory")
    }

    const A: Region = Region {
        min: [10.0, 20.0],
        max: [10.1, 20.1],
    };
    const B: Region = Region {
        min: [10.0, 20.2],
        max: [10.1, 20.3],
    };
    const IN_A: (f64, f64) = (10.05, 20.05);
    const IN_B: (f64, f64) = (10.05, 20.25);
    const NOWHERE: (f64, f64) = (11.0, 21.0);

    #[test]
    fn test_build_regions_only_occupied_cells() {
        let traj = along_x(&[0.0, 2.0, 4.0, 15.0, 25.0, 26.0, 27.0, 28.0, 45.0]);
        let regions = build_regions(&traj, 10.0).expect("valid parameters");
        // columns 0, 1, 2 and 4 are occupied, column 3 is not
        assert_eq!(regions.len(), 4);
        for i in 0..traj.len() {
            let [lat, lon] = traj.geographic(i);
            assert!(
                regions.iter().any(|r| r.contains_point(lat, lon)),
                "point {i} is in no region"
            );
        }
        // ordered by column
        assert!(regions.windows(2).all(|w| w[0].min_lon() < w[1].min_lon()));
    }

    #[test]
    fn test_grid_classification() {
        let traj = along_x(&[0.0, 2.0, 4.0, 15.0, 25.0, 26.0, 27.0, 28.0, 45.0]);
        let labels: Vec<bool> = classify(&traj, 10.0, 2000)
            .expect("valid parameters")
            .labels()
            .collect();
        assert_eq!(
            labels,
            vec![true, true, true, false, true, true, true, true, false]
        );
    }

    #[test]
    fn test_region_change_reevaluates_triggering_point() {
        let traj = geo(&[IN_A, IN_A, IN_A, IN_B, IN_B, IN_B]);
        let labels: Vec<bool> = classify_with_regions(&traj, &[A, B], 2000)
            .expect("valid parameters")
            .labels()
            .collect();
        // without re-evaluating index 3 the second visit would only span 1s
        assert_eq!(labels, vec![true; 6]);
    }

    #[test]
    fn test_short_visits_are_moves() {
        let traj = geo(&[IN_A, IN_B, IN_A, IN_B]);
        let stops = classify_with_regions(&traj, &[A, B], 1000).expect("valid parameters");
        assert_eq!(stops.n_stops(), 0);
        assert_eq!(stops.len(), 4);
    }

    #[test]
    fn test_point_outside_regions_passes_through() {
        let traj = geo(&[IN_A, IN_A, NOWHERE, IN_A, IN_A]);
        let labels: Vec<bool> = classify_with_regions(&traj, &[A, B], 1000)
            .expect("valid parameters")
            .labels()
            .collect();
        assert_eq!(labels, vec![true, true, false, true, true]);
    }

    #[test]
    fn test_trailing_points_outside_regions_close_the_visit() {
        let traj = geo(&[IN_B, IN_B, IN_B, NOWHERE, NOWHERE]);
        let labels: Vec<bool> = classify_with_regions(&traj, &[A, B], 2000)
            .expect("valid parameters")
            .labels()
            .collect();
        assert_eq!(labels, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_first_matching_region_wins() {
        // A and the wide region both contain IN_A, A is declared first, so
        // the trajectory makes two short visits instead of one long one
        let wide = Region::new(9.0, 11.0, 19.0, 21.0);
        let traj = geo(&[IN_A, IN_A, IN_B, IN_B]);
        let labels: Vec<bool> = classify_with_regions(&traj, &[A, wide], 2000)
            .expect("valid parameters")
            .labels()
            .collect();
        assert_eq!(labels, vec![false; 4]);
    }

    #[test]
    fn test_invalid_parameters() {
        let traj = along_x(&[0.0, 1.0]);
        assert!(matches!(
            classify(&traj, 0.0, 0),
            Err(Error::InvalidParameter {
                name: "region_size",
                ..
            })
        ));
        assert!(matches!(
            classify(&traj, 10.0, -1),
            Err(Error::InvalidParameter {
                name: "min_duration_millis",
                ..
            })
        ));
        assert_eq!(
            classify(&along_x(&[1.0]), 10.0, 0).unwrap_err(),
            Error::TooShort { len: 1, min: 2 }
        );
    }

    #[test]
    fn prop_same_length_and_deterministic() {
        fn prop(steps: Vec<(i8, i8, u8)>, size: u8, min_secs: u8) -> TestResult {
            if steps.len() < 2 {
                return TestResult::discard();
            }
            let mut time = 0i64;
            let points: Vec<Point> = steps
                .iter()
                .map(|&(x, y, dt)| {
                    time += dt as i64 * 100;
                    Point::new(x as f64 * 3.0, y as f64 * 3.0, time)
                })
                .collect();
            let traj = Trajectory::new(points, Mode::Cartesian).expect("times increase");
            let size = 1.0 + size as f64;
            let min = min_secs as i64 * 100;

            let first = classify(&traj, size, min).expect("valid parameters");
            let second = classify(&traj, size, min).expect("valid parameters");
            let first: Vec<bool> = first.labels().collect();
            let second: Vec<bool> = second.labels().collect();
            TestResult::from_bool(first.len() == traj.len() && first == second)
        }
        quickcheck(prop as fn(Vec<(i8, i8, u8)>, u8, u8) -> TestResult);
    }

    #[test]
    fn prop_points_outside_regions_are_moves() {
        fn prop(steps: Vec<(i8, i8, u8)>, min_secs: u8) -> TestResult {
            if steps.len() < 2 {
                return TestResult::discard();
            }
            // scatter points around A and B, many falling outside both
            let mut time = 0i64;
            let latlons: Vec<Point> = steps
                .iter()
                .map(|&(dlat, dlon, dt)| {
                    time += dt as i64 * 100;
                    Point::new(
                        10.05 + dlat as f64 * 0.002,
                        20.15 + dlon as f64 * 0.002,
                        time,
                    )
                })
                .collect();
            let traj = Trajectory::new(latlons, Mode::Geographic).expect("times increase");
            let min = min_secs as i64 * 100;

            let stops = classify_with_regions(&traj, &[A, B], min).expect("valid parameters");
            let outside_are_moves = (0..traj.len()).all(|i| {
                let [lat, lon] = traj.geographic(i);
                let inside = A.contains_point(lat, lon) || B.contains_point(lat, lon);
                inside || !stops.is_stopped(i)
            });
            TestResult::from_bool(
                stops.len() == traj.len() && stops.n_stops() <= traj.len() && outside_are_moves,
            )
        }
        quickcheck(prop as fn(Vec<(i8, i8, u8)>, u8) -> TestResult);
    }
}
