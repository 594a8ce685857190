//! This is a collection of useful utilities.

use std::fs::File;
use std::io::{Error, Write};

pub fn save_to_file(filename: &str, content: &str) -> Result<(), Error> {
    let mut f = File::create(filename)?;
    write!(&mut f, "{}", content)?;
    #[cfg(feature = "log")]
    log::info!("Wrote {}", filename);
    Result::Ok(())
}

/// \returns the weighted median of the positions \p vec, as used by the
/// crossing reduction: the plain median for odd sizes, the mean of the two
/// values for size two, and otherwise the two middle values interpolated
/// towards the side where the neighbours are packed more densely.
/// Returns None for an empty input.
pub fn weighted_median(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }

    let mut vec = vec.to_vec();
    vec.sort_by(|a, b| a.total_cmp(b));

    let len = vec.len();
    let mid = len / 2;

    if len % 2 == 1 {
        return Some(vec[mid]);
    }

    if len == 2 {
        return Some((vec[0] + vec[1]) / 2.);
    }

    let left = vec[mid - 1] - vec[0];
    let right = vec[len - 1] - vec[mid];
    if left + right == 0. {
        return Some((vec[mid - 1] + vec[mid]) / 2.);
    }
    Some((vec[mid - 1] * right + vec[mid] * left) / (left + right))
}

#[test]
fn test_weighted_median() {
    assert_eq!(weighted_median(&[]), None);
    assert_eq!(weighted_median(&[3.]), Some(3.));
    assert_eq!(weighted_median(&[4., 2.]), Some(3.));
    assert_eq!(weighted_median(&[5., 1., 3.]), Some(3.));
    // Evenly spread neighbours fall in the middle.
    assert_eq!(weighted_median(&[0., 1., 2., 3.]), Some(1.5));
    // The median leans towards the tighter cluster.
    let m = weighted_median(&[0., 1., 2., 10.]).unwrap();
    assert!(m > 1. && m < 1.5);
}
