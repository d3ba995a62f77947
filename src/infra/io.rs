use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

pub enum FileContent {
    Mapped(Mmap),
    Buffered(String),
}

impl FileContent {
    /// Text view; mapped files are checked for UTF-8 here.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            FileContent::Mapped(mmap) => std::str::from_utf8(mmap).context("path list is not valid UTF-8"),
            FileContent::Buffered(s) => Ok(s.as_str()),
        }
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> Result<FileContent> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;

    if metadata.len() > MMAP_THRESHOLD {
        let file =
            File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

        // Safety: the mapping is read-only and dropped before the command ends
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;

        Ok(FileContent::Mapped(mmap))
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(FileContent::Buffered(content))
    }
}

/// Read one path per line from `input`, or stdin when it is `None` or `-`.
/// Blank lines and `#` comments are skipped.
pub fn read_paths(input: Option<&Path>) -> Result<Vec<String>> {
    let content = match input {
        Some(path) if path != Path::new("-") => read_file_smart(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read paths from stdin")?;
            FileContent::Buffered(buf)
        }
    };

    Ok(parse_path_list(content.as_str()?))
}

fn parse_path_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn path_lists_skip_blanks_and_comments() {
        let text = "# scan of en\n//ldml/a\n\n  //ldml/b  \r\n#//ldml/c\n";
        assert_eq!(parse_path_list(text), ["//ldml/a", "//ldml/b"]);
    }

    #[test]
    fn reads_small_files_buffered() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("paths.txt");
        file.write_str("//ldml/a\n//ldml/b\n").unwrap();

        let content = read_file_smart(file.path()).unwrap();
        assert!(matches!(content, FileContent::Buffered(_)));
        assert_eq!(read_paths(Some(file.path())).unwrap().len(), 2);
    }

    #[test]
    fn large_files_are_mapped() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("big.txt");
        let line = "//ldml/numbers/symbols[@numberSystem=\"latn\"]/decimal\n";
        file.write_str(&line.repeat(30_000)).unwrap();

        let content = read_file_smart(file.path()).unwrap();
        assert!(matches!(content, FileContent::Mapped(_)));
        assert_eq!(read_paths(Some(file.path())).unwrap().len(), 30_000);
    }
}
