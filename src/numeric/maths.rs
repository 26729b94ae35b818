/// Gaussian function `height * exp(-(x - center)^2 / (2 * width^2))`
pub fn gaussian(x: f64, height: f64, center: f64, width: f64) -> f64 {
    let d = x - center;
    height * (-(d * d) / (2.0 * width * width)).exp()
}

/// Unit-height, zero-centred, unit-width gaussian kernel
pub fn kernel(x: f64) -> f64 {
    gaussian(x, 1.0, 0.0, 1.0)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation, `None` for an empty slice
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let var = data.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / data.len() as f64;
    Some(var.sqrt())
}

/// Most frequent value; ties go to the smallest value, `None` when empty
pub fn mode(data: &[i64]) -> Option<i64> {
    let mut sorted = data.to_vec();
    sorted.sort_unstable();

    let mut best: Option<(i64, usize)> = None;
    for run in sorted.chunk_by(|a, b| a == b) {
        if best.is_none_or(|(_, n)| run.len() > n) {
            best = Some((run[0], run.len()));
        }
    }
    best.map(|(v, _)| v)
}
