const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size in base 1024 with two decimals, e.g. `1.50 MB`.
pub fn format_size(bytes: f64) -> String {
    let mut value = bytes;
    let mut idx = 0;
    while value >= 1024.0 && idx < SUFFIXES.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{value:.2} {}", SUFFIXES[idx])
}
