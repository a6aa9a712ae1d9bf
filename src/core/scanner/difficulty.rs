use crate::core::findings::{Difficulty, PatternHit};

pub const HIGH_DIFFICULTY_SCORE: f64 = 10.0;
pub const MEDIUM_DIFFICULTY_SCORE: f64 = 4.0;

/// Severity-weighted sum of a file's hits
pub fn difficulty_score(hits: &[PatternHit]) -> f64 {
    hits.iter().map(|hit| hit.severity.weight()).sum()
}

/// Per-file prioritisation label; not used for project risk
pub fn classify_difficulty(hits: &[PatternHit]) -> Difficulty {
    let score = difficulty_score(hits);
    if score >= HIGH_DIFFICULTY_SCORE {
        Difficulty::High
    } else if score >= MEDIUM_DIFFICULTY_SCORE {
        Difficulty::Medium
    } else {
        Difficulty::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::findings::Severity;
    use std::path::PathBuf;

    fn hits(breaking: usize, deprecated: usize, warning: usize) -> Vec<PatternHit> {
        let make = |severity: Severity| PatternHit {
            rule: "r".to_string(),
            category: "c".to_string(),
            severity,
            file: PathBuf::from("/p/a.js"),
            line: 1,
            matched: "m".to_string(),
            message: "msg".to_string(),
        };
        std::iter::repeat(Severity::Breaking)
            .take(breaking)
            .chain(std::iter::repeat(Severity::Deprecated).take(deprecated))
            .chain(std::iter::repeat(Severity::Warning).take(warning))
            .map(make)
            .collect()
    }

    #[test]
    fn test_threshold_table() {
        // (breaking, deprecated, warning) -> label
        let table = [
            ((0, 0, 0), Difficulty::Low),
            ((1, 0, 0), Difficulty::Low),        // 3
            ((0, 3, 1), Difficulty::Low),        // 3.5
            ((0, 4, 0), Difficulty::Medium),     // 4
            ((2, 0, 0), Difficulty::Medium),     // 6
            ((3, 0, 1), Difficulty::Medium),     // 9.5
            ((3, 1, 0), Difficulty::High),       // 10
            ((5, 0, 0), Difficulty::High),       // 15
            ((0, 0, 20), Difficulty::High),      // 10
        ];

        for ((b, d, w), expected) in table {
            assert_eq!(classify_difficulty(&hits(b, d, w)), expected, "{} {} {}", b, d, w);
        }
    }

    #[test]
    fn test_monotonic_in_breaking_hits() {
        let mut previous = Difficulty::Low;
        for breaking in 0..8 {
            let current = classify_difficulty(&hits(breaking, 1, 1));
            assert!(current >= previous);
            previous = current;
        }
    }
}
