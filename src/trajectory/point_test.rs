#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::trajectory::{Mode, Point, StopTrajectory, Trajectory};
    use approx::assert_relative_eq;

    fn line(n: usize) -> Trajectory {
        let points = (0..n)
            .map(|i| Point::new(i as f64 * 3.0, i as f64 * 4.0, i as i64 * 1000))
            .collect();
        Trajectory::new(points, Mode::Cartesian).expect("valid trajectory")
    }

    #[test]
    fn test_distance_cartesian() {
        let traj = line(3);
        assert_eq!(traj.len(), 3);
        assert_relative_eq!(traj.distance(0, 1), 5.0, epsilon = 1e-12);
        assert_relative_eq!(traj.distance(2, 0), 10.0, epsilon = 1e-12);
        assert_eq!(traj.distance(1, 1), 0.0);
        assert_eq!(traj.elapsed_millis(0, 2), 2000);
    }

    #[test]
    fn test_non_monotonic_time_rejected() {
        let points = vec![
            Point::new(0.0, 0.0, 0),
            Point::new(1.0, 0.0, 10),
            Point::new(2.0, 0.0, 5),
        ];
        let err = Trajectory::new(points, Mode::Cartesian).unwrap_err();
        assert_eq!(err, Error::NonMonotonicTime { index: 2 });
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let xs = [0.0, 50.0, 100.0, f64::NAN, 200.0, 250.0, 300.0];
        let points: Vec<Point> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| Point::new(x, 0.0, i as i64 * 1000))
            .collect();
        assert!(matches!(
            Trajectory::new(points, Mode::Cartesian),
            Err(Error::InvalidParameter { name: "coords", .. })
        ));

        let infinite = vec![Point::new(0.0, 0.0, 0), Point::new(10.0, f64::INFINITY, 1)];
        assert!(matches!(
            Trajectory::new(infinite, Mode::Geographic),
            Err(Error::InvalidParameter { name: "coords", .. })
        ));
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let points = vec![Point::new(0.0, 0.0, 7), Point::new(1.0, 0.0, 7)];
        assert!(Trajectory::new(points, Mode::Cartesian).is_ok());
    }

    #[test]
    fn test_geographic_distance_in_metres() {
        // 0.001 degrees of latitude is ~111.2 metres
        let points = vec![
            Point::new(59.955, 30.244, 0),
            Point::new(59.956, 30.244, 1000),
        ];
        let traj = Trajectory::new(points, Mode::Geographic).expect("valid trajectory");
        assert_relative_eq!(traj.distance(0, 1), 111.19, epsilon = 0.01);
        assert_eq!(traj.geographic(1), [59.956, 30.244]);
    }

    #[test]
    fn test_geo_bounds() {
        let points = vec![
            Point::new(59.95, 30.25, 0),
            Point::new(59.97, 30.24, 1),
            Point::new(59.96, 30.26, 2),
        ];
        let traj = Trajectory::new(points, Mode::Geographic).expect("valid trajectory");
        let bounds = traj.geo_bounds().expect("non-empty");
        assert_eq!(bounds.min_lat(), 59.95);
        assert_eq!(bounds.max_lat(), 59.97);
        assert_eq!(bounds.min_lon(), 30.24);
        assert_eq!(bounds.max_lon(), 30.26);

        let empty = Trajectory::new(Vec::new(), Mode::Geographic).expect("empty is valid");
        assert!(empty.geo_bounds().is_none());
    }

    #[test]
    fn test_cartesian_round_trips_through_geographic() {
        let traj = line(4);
        let proj = traj.projection();
        for i in 0..traj.len() {
            let [lat, lon] = traj.geographic(i);
            let xy = proj.geographic_to_cartesian(lat, lon);
            assert_relative_eq!(xy[0], traj.cartesian(i)[0], epsilon = 1e-6);
            assert_relative_eq!(xy[1], traj.cartesian(i)[1], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_stop_trajectory_labels() {
        let traj = line(4);
        let mut stops = StopTrajectory::all_moving(&traj);
        assert_eq!(stops.len(), 4);
        assert_eq!(stops.n_stops(), 0);

        stops.set_stopped(1, true);
        stops.set_stopped(2, true);
        assert!(stops.is_stopped(1));
        assert!(!stops.is_stopped(3));
        assert_eq!(stops.labels().collect::<Vec<_>>(), vec![false, true, true, false]);
        assert_eq!(stops.n_stops(), 2);
    }

    #[test]
    fn test_from_labels_size_mismatch() {
        let err = StopTrajectory::from_labels(line(3), &[true, false]).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 3,
                actual: 2
            }
        );

        let ok = StopTrajectory::from_labels(line(2), &[true, false]).expect("same size");
        assert!(ok.is_stopped(0));
    }
}
