//! Range, average and median of a set of readings.

use serde::Serialize;

use crate::reading::Reading;
use crate::stats::{mean, median, round2};

/// Lowest and highest value seen for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BloodPressureRange {
    pub systolic_min: u16,
    pub diastolic_min: u16,
    pub systolic_max: u16,
    pub diastolic_max: u16,
}

/// Mean (rounded to two decimals) and median of each field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloodPressureAverages {
    pub systolic_average: f64,
    pub diastolic_average: f64,
    pub systolic_median: f64,
    pub diastolic_median: f64,
}

/// Everything the readings list shows above the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloodPressureSummary {
    pub count: usize,
    pub range: BloodPressureRange,
    pub averages: BloodPressureAverages,
}

/// Minimum and maximum of each field, computed independently.
///
/// Returns `None` when there are no readings.
pub fn range(readings: &[Reading]) -> Option<BloodPressureRange> {
    let first = readings.first()?;
    let init = BloodPressureRange {
        systolic_min: first.systolic,
        diastolic_min: first.diastolic,
        systolic_max: first.systolic,
        diastolic_max: first.diastolic,
    };

    Some(readings.iter().fold(init, |acc, r| BloodPressureRange {
        systolic_min: acc.systolic_min.min(r.systolic),
        diastolic_min: acc.diastolic_min.min(r.diastolic),
        systolic_max: acc.systolic_max.max(r.systolic),
        diastolic_max: acc.diastolic_max.max(r.diastolic),
    }))
}

/// Rounded mean and median of each field.
///
/// Returns `None` when there are no readings, the same sentinel as [`range`].
pub fn average_and_median(readings: &[Reading]) -> Option<BloodPressureAverages> {
    let systolic: Vec<u16> = readings.iter().map(|r| r.systolic).collect();
    let diastolic: Vec<u16> = readings.iter().map(|r| r.diastolic).collect();

    Some(BloodPressureAverages {
        systolic_average: round2(mean(&systolic)?),
        diastolic_average: round2(mean(&diastolic)?),
        systolic_median: median(&systolic)?,
        diastolic_median: median(&diastolic)?,
    })
}

/// Range plus averages, or `None` when there are no readings.
pub fn summarize(readings: &[Reading]) -> Option<BloodPressureSummary> {
    Some(BloodPressureSummary {
        count: readings.len(),
        range: range(readings)?,
        averages: average_and_median(readings)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Reading> {
        vec![
            Reading::new(120, 80),
            Reading::new(110, 70),
            Reading::new(115, 75),
        ]
    }

    #[test]
    fn test_range_sample() {
        assert_eq!(
            range(&sample()),
            Some(BloodPressureRange {
                systolic_min: 110,
                diastolic_min: 70,
                systolic_max: 120,
                diastolic_max: 80,
            })
        );
    }

    #[test]
    fn test_range_empty() {
        assert_eq!(range(&[]), None);
    }

    #[test]
    fn test_range_fields_are_independent() {
        // Highest systolic and highest diastolic come from different readings.
        let readings = [Reading::new(150, 60), Reading::new(100, 95)];
        let r = range(&readings).unwrap();
        assert_eq!(r.systolic_max, 150);
        assert_eq!(r.diastolic_max, 95);
        assert_eq!(r.systolic_min, 100);
        assert_eq!(r.diastolic_min, 60);
    }

    #[test]
    fn test_range_bounds_are_attained() {
        let readings = [
            Reading::new(131, 88),
            Reading::new(97, 61),
            Reading::new(142, 79),
            Reading::new(118, 90),
        ];
        let r = range(&readings).unwrap();
        for reading in &readings {
            assert!(r.systolic_min <= reading.systolic && reading.systolic <= r.systolic_max);
            assert!(r.diastolic_min <= reading.diastolic && reading.diastolic <= r.diastolic_max);
        }
        assert!(readings.iter().any(|x| x.systolic == r.systolic_min));
        assert!(readings.iter().any(|x| x.systolic == r.systolic_max));
        assert!(readings.iter().any(|x| x.diastolic == r.diastolic_min));
        assert!(readings.iter().any(|x| x.diastolic == r.diastolic_max));
    }

    #[test]
    fn test_average_and_median_sample() {
        assert_eq!(
            average_and_median(&sample()),
            Some(BloodPressureAverages {
                systolic_average: 115.0,
                diastolic_average: 75.0,
                systolic_median: 115.0,
                diastolic_median: 75.0,
            })
        );
    }

    #[test]
    fn test_average_and_median_empty() {
        assert_eq!(average_and_median(&[]), None);
    }

    #[test]
    fn test_average_is_rounded() {
        // 350 / 3 = 116.666...
        let readings = [
            Reading::new(120, 80),
            Reading::new(115, 80),
            Reading::new(115, 81),
        ];
        let a = average_and_median(&readings).unwrap();
        assert_eq!(a.systolic_average, 116.67);
        assert_eq!(a.diastolic_average, 80.33);
    }

    #[test]
    fn test_average_tie_at_third_decimal() {
        // 1001 / 8 = 125.125 exactly.
        let mut readings = vec![Reading::new(125, 80); 7];
        readings.push(Reading::new(126, 80));
        let a = average_and_median(&readings).unwrap();
        assert_eq!(a.systolic_average, 125.13);
    }

    #[test]
    fn test_even_count_median() {
        let readings = [
            Reading::new(120, 80),
            Reading::new(110, 71),
            Reading::new(130, 90),
            Reading::new(100, 70),
        ];
        let a = average_and_median(&readings).unwrap();
        assert_eq!(a.systolic_median, 115.0);
        assert_eq!(a.diastolic_median, 75.5);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample()).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.range.systolic_min, 110);
        assert_eq!(summary.averages.diastolic_median, 75.0);
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summary_serializes_for_render_context() {
        let summary = summarize(&sample()).unwrap();
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["range"]["systolic_max"], 120);
        assert_eq!(json["averages"]["systolic_average"], 115.0);
        assert_eq!(json["count"], 3);
    }
}
