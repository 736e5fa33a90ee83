//! File names for generated properties.
//!
//! Names encode everything that distinguishes one property from another, so
//! concurrent generators writing distinct properties never collide:
//!
//! - `infinity_{id}_{label}_{eps}.vnnlib`
//! - `infinity_{id}_{label}_{eps}_merge.vnnlib`
//! - `infinity_{id}_{label}_{eps}_meet.vnnlib`
//! - `infinity_all_{label}_{eps}_num{count}.vnnlib`

use crate::format::format_shortest;
use vnnprop_core::RegionMode;

pub const EXTENSION: &str = "vnnlib";

/// File name of a single-sample property.
pub fn sample_file_name(
    mode: RegionMode,
    sample_id: usize,
    true_label: usize,
    epsilon: f64,
) -> String {
    let suffix = match mode {
        RegionMode::Plain => "",
        RegionMode::Join => "_merge",
        RegionMode::Meet => "_meet",
    };
    format!(
        "infinity_{sample_id}_{true_label}_{}{suffix}.{EXTENSION}",
        format_shortest(epsilon)
    )
}

/// File name of a batch property covering `num_samples` samples.
pub fn batch_file_name(true_label: usize, epsilon: f64, num_samples: usize) -> String {
    format!(
        "infinity_all_{true_label}_{}_num{num_samples}.{EXTENSION}",
        format_shortest(epsilon)
    )
}
