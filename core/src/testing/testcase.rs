use std::path::{Path, PathBuf};

use lazy_regex::regex_captures;

pub const INPUT_EXT: &str = "in";
pub const OUTPUT_EXT: &str = "out";

/// One sample test: `<id>.in` paired with `<id>.out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// 0-based position among the discovered fixtures.
    pub index: usize,
    /// Numeric id taken from the fixture file name.
    pub fixture_id: u64,
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No test files found in '{}'", .0.to_string_lossy())]
    NoFixturesFound(PathBuf),

    #[error("Unequal number of input/output test files ({inputs} inputs, {outputs} outputs)")]
    UnequalFixtureCount { inputs: usize, outputs: usize },

    #[error("Test file {id}.in has no matching {id}.out")]
    UnpairedFixture { id: u64 },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

/// `12.in` -> `Some(12)`
fn fixture_id(path: &Path, ext: &str) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let (_, id, got_ext) = regex_captures!(r"^(\d+)\.([a-z]+)$", name)?;
    if got_ext != ext {
        return None;
    }
    id.parse().ok()
}

fn find_fixtures(dir: &Path, ext: &str) -> Result<Vec<(u64, PathBuf)>, LoadError> {
    let mut found: Vec<_> = fsutil::glob_files(dir, &format!("*.{}", ext))?
        .into_iter()
        .filter_map(|path| fixture_id(&path, ext).map(|id| (id, path)))
        .collect();
    found.sort_by_key(|(id, _)| *id);
    Ok(found)
}

/// Loads every sample test in `dir`, ordered by fixture id.
/// Either all fixtures load or an error is returned.
pub fn load_testcases(dir: impl AsRef<Path>) -> Result<Vec<TestCase>, LoadError> {
    let dir = dir.as_ref();
    let inputs = find_fixtures(dir, INPUT_EXT)?;
    let outputs = find_fixtures(dir, OUTPUT_EXT)?;

    if inputs.len() != outputs.len() {
        return Err(LoadError::UnequalFixtureCount {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    if inputs.is_empty() {
        return Err(LoadError::NoFixturesFound(dir.to_owned()));
    }

    let mut testcases = Vec::with_capacity(inputs.len());
    for (index, ((in_id, in_path), (out_id, out_path))) in
        inputs.iter().zip(outputs.iter()).enumerate()
    {
        if in_id != out_id {
            return Err(LoadError::UnpairedFixture { id: *in_id });
        }
        testcases.push(TestCase {
            index,
            fixture_id: *in_id,
            input: fsutil::read_to_string(in_path)?,
            expected_output: fsutil::read_to_string(out_path)?,
        });
    }
    log::debug!(
        "Loaded {} testcases from {}",
        testcases.len(),
        dir.to_string_lossy()
    );
    Ok(testcases)
}

#[cfg(test)]
mod test {
    use super::*;

    fn dir_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn loads_in_numeric_order() {
        let dir = dir_with(&[
            ("10.in", "ten\n"),
            ("10.out", "TEN\n"),
            ("2.in", "two\n"),
            ("2.out", "TWO\n"),
            ("0.in", "zero\n"),
            ("0.out", "ZERO\n"),
            ("main.cpp", "int main() {}"),
            ("notes.out.bak", ""),
        ]);
        let tests = load_testcases(dir.path()).unwrap();

        let got: Vec<_> = tests
            .iter()
            .map(|t| (t.index, t.fixture_id, t.input.as_str()))
            .collect();
        assert_eq!(got, [(0, 0, "zero\n"), (1, 2, "two\n"), (2, 10, "ten\n")]);
        assert_eq!(tests[2].expected_output, "TEN\n");
    }

    #[test]
    fn empty_dir_has_no_fixtures() {
        let dir = dir_with(&[("main.py", "print(1)")]);
        let err = load_testcases(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoFixturesFound(_)), "{:?}", err);
    }

    #[test]
    fn unequal_counts_are_rejected() {
        let dir = dir_with(&[("0.in", "1"), ("0.out", "1"), ("1.in", "2")]);
        let err = load_testcases(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnequalFixtureCount {
                inputs: 2,
                outputs: 1
            }
        ));

        let dir = dir_with(&[("0.out", "1")]);
        let err = load_testcases(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnequalFixtureCount {
                inputs: 0,
                outputs: 1
            }
        ));
    }

    #[test]
    fn mismatched_ids_are_rejected() {
        let dir = dir_with(&[("0.in", "1"), ("1.out", "1")]);
        let err = load_testcases(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnpairedFixture { id: 0 }));
    }

    #[test]
    fn missing_dir_has_no_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_testcases(dir.path().join("nope")).unwrap_err();
        // glob over a missing dir yields nothing rather than failing
        assert!(matches!(err, LoadError::NoFixturesFound(_)));
    }

    #[test]
    fn fixture_id_parsing() {
        assert_eq!(fixture_id(Path::new("dir/07.in"), "in"), Some(7));
        assert_eq!(fixture_id(Path::new("7.out"), "in"), None);
        assert_eq!(fixture_id(Path::new("a7.in"), "in"), None);
        assert_eq!(fixture_id(Path::new("7.in.txt"), "in"), None);
    }
}
