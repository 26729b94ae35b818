#[cfg(test)]
mod tests {
    use crate::numeric::maths::{gaussian, kernel, mean, mode, std_dev};
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel() {
        assert_eq!(kernel(0.0), 1.0);
        assert_relative_eq!(kernel(1.0), (-0.5f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(kernel(-3.0), kernel(3.0), epsilon = 1e-15);
        assert!(kernel(3.0) < 0.012);
    }

    #[test]
    fn test_gaussian_shifted() {
        assert_eq!(gaussian(5.0, 2.0, 5.0, 3.0), 2.0);
        assert_relative_eq!(gaussian(8.0, 2.0, 5.0, 3.0), 2.0 * (-0.5f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_mean_and_std() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), Some(5.0));
        assert_eq!(std_dev(&data), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&[3, 1, 3, 2, 1, 3]), Some(3));
        assert_eq!(mode(&[5, 4, 4, 5]), Some(4));
        assert_eq!(mode(&[9]), Some(9));
        assert_eq!(mode(&[]), None);
    }
}
