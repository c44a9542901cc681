//! System memory summary from `/proc/meminfo`.

use crate::types::{MemorySummary, ProcError};
use procfs::{Current, Meminfo};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn get_memory_summary() -> Result<MemorySummary, ProcError> {
    let meminfo = Meminfo::current()?;
    Ok(summarize(&meminfo))
}

fn summarize(meminfo: &Meminfo) -> MemorySummary {
    let total = meminfo.mem_total;
    // Kernels before 3.14 lack MemAvailable.
    let available = meminfo.mem_available.unwrap_or(meminfo.mem_free).min(total);
    let used = total - available;
    let swap_used = meminfo.swap_total.saturating_sub(meminfo.swap_free);

    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    MemorySummary {
        total_gb: total as f64 / BYTES_PER_GB,
        used_gb: used as f64 / BYTES_PER_GB,
        free_gb: available as f64 / BYTES_PER_GB,
        percent,
        swap_total_gb: meminfo.swap_total as f64 / BYTES_PER_GB,
        swap_used_gb: swap_used as f64 / BYTES_PER_GB,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_summary_is_consistent() {
        let summary = get_memory_summary().unwrap();
        assert!(summary.total_gb > 0.0);
        assert!(summary.used_gb <= summary.total_gb);
        assert!((0.0..=100.0).contains(&summary.percent));
        assert!(summary.swap_used_gb <= summary.swap_total_gb);
    }
}
