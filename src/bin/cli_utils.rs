use newsagg::{Phase, PipelineOutcome};
use std::time::Duration;

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{:.2}ms", ms)
    }
}

/// Print the stage breakdown of a finished run to stderr
pub fn print_stats(outcome: &PipelineOutcome) {
    let stats = &outcome.stats;
    let total = stats.total_time();

    eprintln!("[INFO] === Processing Complete ===");
    eprintln!(
        "[INFO] Files: {} listed, {} read, {} failed",
        format_number(stats.files_listed),
        format_number(stats.files_read),
        format_number(stats.files_failed)
    );
    eprintln!("[INFO] Records loaded: {}", format_number(stats.records_loaded));
    eprintln!(
        "[INFO] Unique: {} | Duplicates: {}",
        format_number(stats.unique_records),
        format_number(stats.duplicates)
    );
    eprintln!(
        "[INFO] Auxiliary: {} languages, {} categories, {} linking words",
        format_number(outcome.auxiliary.languages.len()),
        format_number(outcome.auxiliary.categories.len()),
        format_number(outcome.auxiliary.linking_words.len())
    );
    eprintln!(
        "[INFO] Aggregation batches: {}",
        format_number(stats.batches_claimed)
    );
    if stats.sort_fallback {
        eprintln!("[INFO] Sort: fell back to sequential merge sort");
    }
    eprintln!(
        "[INFO] Outputs: {} written, {} failed",
        format_number(stats.outputs_written),
        format_number(stats.outputs_failed)
    );
    if stats.tasks_failed > 0 {
        eprintln!("[INFO] Failed tasks: {}", format_number(stats.tasks_failed));
    }

    eprintln!("[INFO] === Stage Timings ===");
    for phase in Phase::ALL {
        let d = stats.duration(phase);
        let share = if total.as_secs_f64() > 0.0 {
            d.as_secs_f64() / total.as_secs_f64() * 100.0
        } else {
            0.0
        };
        eprintln!(
            "[INFO]   {:<10} {:>10} ({:.1}%)",
            phase.label(),
            format_duration(d),
            share
        );
    }
    eprintln!("[INFO] Total time: {}", format_duration(total));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(12)), "12.00ms");
        assert_eq!(format_duration(Duration::from_millis(2_500)), "2.50s");
    }
}
