use crate::spec::SourceSpec;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::debug;

/// Expand the source uris (plain paths or glob patterns) into the files to
/// read. With `latest`, only the most recently modified match is returned;
/// otherwise every match is returned, sorted by path.
pub fn resolve_inputs(source: &SourceSpec) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for uri in &source.uris {
        let paths = glob::glob(uri).with_context(|| format!("Invalid source pattern: {}", uri))?;
        for entry in paths {
            let path = entry.with_context(|| format!("Failed to expand {}", uri))?;
            if path.is_file() {
                matches.push(path);
            }
        }
    }
    matches.sort();
    matches.dedup();

    if matches.is_empty() {
        anyhow::bail!("No input files match {:?}", source.uris);
    }
    debug!(count = matches.len(), "resolved input files");

    if source.latest {
        let latest = latest_file(matches)?;
        return Ok(vec![latest]);
    }
    Ok(matches)
}

/// Most recently modified file. Ties go to the lexically greatest path so
/// the choice is stable.
pub fn latest_file(paths: Vec<PathBuf>) -> Result<PathBuf> {
    let mut best: Option<(SystemTime, PathBuf)> = None;
    for path in paths {
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time of {:?}", path))?;
        let newer = match &best {
            Some((time, best_path)) => (modified, &path) > (*time, best_path),
            None => true,
        };
        if newer {
            best = Some((modified, path));
        }
    }
    best.map(|(_, path)| path)
        .context("No files to choose the latest from")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SourceKind;
    use std::fs::{self, File};
    use std::time::Duration;

    fn source(uris: Vec<String>, latest: bool) -> SourceSpec {
        SourceSpec {
            kind: SourceKind::Json,
            uris,
            latest,
        }
    }

    fn touch(path: &std::path::Path, modified: SystemTime) {
        fs::write(path, "[]").unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[test]
    fn latest_picks_the_newest_match() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(&dir.path().join("people_20240101_000000.json"), base);
        touch(
            &dir.path().join("people_20230101_000000.json"),
            base + Duration::from_secs(60),
        );
        touch(&dir.path().join("notes.txt"), base + Duration::from_secs(120));

        let pattern = format!("{}/*.json", dir.path().display());
        let inputs = resolve_inputs(&source(vec![pattern], true)).unwrap();
        assert_eq!(inputs, [dir.path().join("people_20230101_000000.json")]);
    }

    #[test]
    fn without_latest_every_match_is_returned_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        touch(&dir.path().join("b.json"), now);
        touch(&dir.path().join("a.json"), now);

        let pattern = format!("{}/*.json", dir.path().display());
        let inputs = resolve_inputs(&source(vec![pattern], false)).unwrap();
        assert_eq!(inputs, [dir.path().join("a.json"), dir.path().join("b.json")]);
    }

    #[test]
    fn no_match_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let err = resolve_inputs(&source(vec![pattern], true)).unwrap_err();
        assert!(err.to_string().contains("No input files match"));
    }
}
