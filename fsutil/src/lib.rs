use std::{
    fs::{self, ReadDir},
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Invalid glob pattern '{0}': {1}")]
        InvalidGlob(String, #[source] ::glob::PatternError),

        #[error("Cannot access '{0}' while globbing: {1}")]
        GlobEntry(PathBuf, #[source] io::Error),
    }
}
pub use error::{Error, Result};

pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Lists regular files directly under `dir` whose file name matches `pattern`,
/// sorted by path.
///
/// ```
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("b.in"), "").unwrap();
/// std::fs::write(dir.path().join("a.in"), "").unwrap();
/// std::fs::write(dir.path().join("a.out"), "").unwrap();
///
/// let files = fsutil::glob_files(dir.path(), "*.in").unwrap();
/// let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap()).collect();
/// assert_eq!(names, ["a.in", "b.in"]);
/// ```
pub fn glob_files(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let escaped_dir = ::glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let paths = ::glob::glob(&full_pattern)
        .map_err(|e| Error::InvalidGlob(full_pattern.to_string(), e))?;

    let mut res = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| Error::GlobEntry(e.path().to_owned(), e.into_error()))?;
        if path.is_file() {
            res.push(path);
        }
    }
    res.sort();
    log::trace!("glob {:?} in {:?}: {} files", pattern, dir, res.len());
    Ok(res)
}

/// Lists file names in `dir` matching `filename_pattern`, ignoring directories.
pub fn list_filenames_matching(
    dir: impl AsRef<Path>,
    filename_pattern: &::glob::Pattern,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in self::read_dir(&dir)?.filter_map(std::result::Result::ok) {
        let Ok(file_type) = entry.file_type() else {
            continue
        };
        if file_type.is_dir() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        if filename_pattern.matches(&filename) {
            names.push(filename);
        }
    }
    names.sort();
    Ok(names)
}
