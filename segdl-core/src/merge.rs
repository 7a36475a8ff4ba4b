use crate::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary sink for segment `index` of a download into `destination`: `<destination>.part<index>`.
pub fn sink_path(destination: &Path, index: u32) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(format!(".part{index}"));
    PathBuf::from(name)
}

/// Concatenates `sinks` in order into a freshly created `destination`.
///
/// Each sink is deleted right after it has been copied, so at most one
/// segment is duplicated on disk at any time. Fails without touching the
/// sinks if `destination` already exists; on a later failure the partial
/// destination is removed.
pub fn merge(sinks: &[PathBuf], destination: &Path) -> Result<u64> {
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;
    match copy_sinks(sinks, &mut out) {
        Ok(n) => Ok(n),
        Err(e) => {
            drop(out);
            let _ = fs::remove_file(destination);
            Err(e.into())
        }
    }
}

fn copy_sinks(sinks: &[PathBuf], out: &mut File) -> io::Result<u64> {
    let mut total = 0u64;
    for sink in sinks {
        let mut src = File::open(sink)?;
        total += io::copy(&mut src, out)?;
        drop(src);
        fs::remove_file(sink)?;
    }
    out.flush()?;
    out.sync_all()?;
    Ok(total)
}

/// Best-effort removal of leftover sinks; returns how many files were deleted.
pub fn remove_sinks(sinks: &[PathBuf]) -> usize {
    sinks
        .iter()
        .filter(|p| fs::remove_file(p).is_ok())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sinks(dest: &Path, parts: &[&[u8]]) -> Vec<PathBuf> {
        parts
            .iter()
            .enumerate()
            .map(|(i, bytes)| {
                let p = sink_path(dest, i as u32);
                fs::write(&p, bytes).unwrap();
                p
            })
            .collect()
    }

    #[test]
    fn sink_names_follow_destination() {
        let p = sink_path(Path::new("/tmp/out/file.bin"), 3);
        assert_eq!(p, PathBuf::from("/tmp/out/file.bin.part3"));
    }

    #[test]
    fn merges_in_index_order_and_deletes_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged.bin");
        let sinks = write_sinks(&dest, &[b"alpha-", b"", b"beta-", b"gamma"]);

        let n = merge(&sinks, &dest).unwrap();

        assert_eq!(n, 16);
        assert_eq!(fs::read(&dest).unwrap(), b"alpha-beta-gamma");
        assert!(sinks.iter().all(|s| !s.exists()));
    }

    #[test]
    fn existing_destination_is_rejected_and_sinks_survive() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged.bin");
        fs::write(&dest, b"old").unwrap();
        let sinks = write_sinks(&dest, &[b"new"]);

        assert!(merge(&sinks, &dest).is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert!(sinks[0].exists());
    }

    #[test]
    fn missing_sink_removes_partial_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("merged.bin");
        let mut sinks = write_sinks(&dest, &[b"one"]);
        sinks.push(sink_path(&dest, 1));

        assert!(merge(&sinks, &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn remove_sinks_ignores_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("x");
        let mut sinks = write_sinks(&dest, &[b"a", b"b"]);
        sinks.push(sink_path(&dest, 7));
        assert_eq!(remove_sinks(&sinks), 2);
        assert!(sinks.iter().all(|s| !s.exists()));
    }
}
