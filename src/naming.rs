use std::path::{Path, PathBuf};

use rand::Rng;

/// Extension used when the source has none.
const DEFAULT_EXTENSION: &str = "mp4";

/// Upper bound (inclusive) of the random suffix used after a declined overwrite.
pub const RANDOM_SUFFIX_MAX: u32 = 99_999;

/// Directory clips of `source` are written to when none is configured:
/// a folder named after the file's stem, next to the file.
pub fn default_output_dir(source: &Path) -> PathBuf {
    let stem = stem(source);
    match source.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// `<dir>/<stem>_<suffix>.<ext>`
pub fn candidate_name(source: &Path, dir: &Path, suffix: u32) -> PathBuf {
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(DEFAULT_EXTENSION);
    dir.join(format!("{}_{}.{}", stem(source), suffix, extension))
}

fn stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string())
}

/// Picks the output path for clip `index` of `source`.
///
/// When the indexed name is taken and `overwrite` declines, the name is
/// regenerated once with a random suffix. That second name is not checked
/// again, so a collision there overwrites.
///
/// `overwrite` is only consulted on a collision; its error aborts resolution.
pub fn resolve_output_name<Exists, Overwrite, R, PromptErr>(
    source: &Path,
    dir: &Path,
    index: u32,
    exists: Exists,
    overwrite: Overwrite,
    rng: &mut R,
) -> Result<PathBuf, PromptErr>
where
    Exists: Fn(&Path) -> bool,
    Overwrite: FnOnce(&Path) -> Result<bool, PromptErr>,
    R: Rng + ?Sized,
{
    let candidate = candidate_name(source, dir, index);
    if !exists(&candidate) || overwrite(&candidate)? {
        return Ok(candidate);
    }
    let suffix = rng.gen_range(0..=RANDOM_SUFFIX_MAX);
    tracing::debug!(
        "{} exists and was kept, retrying with suffix {}",
        candidate.display(),
        suffix
    );
    Ok(candidate_name(source, dir, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;
    use std::convert::Infallible;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/videos/holiday.mov")),
            PathBuf::from("/videos/holiday")
        );
        assert_eq!(
            default_output_dir(Path::new("holiday.mov")),
            PathBuf::from("holiday")
        );
    }

    #[test]
    fn test_candidate_name() {
        let dir = Path::new("/out");
        assert_eq!(
            candidate_name(Path::new("/videos/holiday.mov"), dir, 3),
            PathBuf::from("/out/holiday_3.mov")
        );
        assert_eq!(
            candidate_name(Path::new("/videos/raw"), dir, 0),
            PathBuf::from("/out/raw_0.mp4")
        );
    }

    #[test]
    fn test_free_name_skips_prompt() {
        let asked = Cell::new(false);
        let mut rng = StdRng::seed_from_u64(7);
        let name = resolve_output_name(
            Path::new("a.mp4"),
            Path::new("out"),
            5,
            |_| false,
            |_| {
                asked.set(true);
                Ok::<_, Infallible>(true)
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(name, PathBuf::from("out/a_5.mp4"));
        assert!(!asked.get());
    }

    #[test]
    fn test_accepted_overwrite_keeps_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = resolve_output_name(
            Path::new("a.mp4"),
            Path::new("out"),
            0,
            |_| true,
            |_| Ok::<_, Infallible>(true),
            &mut rng,
        )
        .unwrap();
        assert_eq!(name, PathBuf::from("out/a_0.mp4"));
    }

    #[test]
    fn test_declined_overwrite_uses_random_suffix() {
        let checks = Cell::new(0);
        let mut rng = StdRng::seed_from_u64(7);
        let expected = StdRng::seed_from_u64(7).gen_range(0..=RANDOM_SUFFIX_MAX);

        let name = resolve_output_name(
            Path::new("a.mp4"),
            Path::new("out"),
            0,
            |_| {
                checks.set(checks.get() + 1);
                true
            },
            |_| Ok::<_, Infallible>(false),
            &mut rng,
        )
        .unwrap();

        assert_eq!(name, PathBuf::from(format!("out/a_{}.mp4", expected)));
        // The regenerated name is not checked for collisions.
        assert_eq!(checks.get(), 1);
    }

    #[test]
    fn test_overwrite_error_propagates() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = resolve_output_name(
            Path::new("a.mp4"),
            Path::new("out"),
            0,
            |_| true,
            |_| Err("closed"),
            &mut rng,
        );
        assert_eq!(result, Err("closed"));
    }
}
