//! Chart colours.

/// Categorical colours for pie slices, cycled when a chart has more slices.
pub const CATEGORICAL: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Sequential colours for word clouds, dark to light.
pub const SEQUENTIAL: [&str; 8] = [
    "#440154", "#46327e", "#365c8d", "#277f8e", "#1fa187", "#4ac16d", "#a0da39", "#d8c21f",
];

/// Colour of slice `index`.
pub fn categorical(index: usize) -> &'static str {
    CATEGORICAL[index % CATEGORICAL.len()]
}

/// Colour for a word by weight in `0..=1`, heavier words darker.
pub fn sequential(weight: f64) -> &'static str {
    let weight = if weight.is_finite() { weight.clamp(0.0, 1.0) } else { 0.0 };
    let last = SEQUENTIAL.len() - 1;
    let idx = ((1.0 - weight) * last as f64).round() as usize;
    SEQUENTIAL[idx.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_cycles() {
        assert_eq!(categorical(0), categorical(10));
        assert_ne!(categorical(0), categorical(1));
    }

    #[test]
    fn test_sequential_bounds() {
        assert_eq!(sequential(1.0), SEQUENTIAL[0]);
        assert_eq!(sequential(0.0), SEQUENTIAL[7]);
        assert_eq!(sequential(f64::NAN), SEQUENTIAL[7]);
        assert_eq!(sequential(7.0), SEQUENTIAL[0]);
    }
}
