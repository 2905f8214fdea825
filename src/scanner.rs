use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A syllabus text file discovered in the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllabusFile {
    pub path: PathBuf,
    /// File name without extension, e.g. "phys110_fall2024"
    pub stem: String,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Walk the corpus root and collect every `.txt` document, sorted by path.
///
/// Hidden files and directories are skipped; unreadable entries are
/// ignored.
pub fn scan_corpus(root: &Path) -> Vec<SyllabusFile> {
    let mut results: Vec<SyllabusFile> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_str().is_some_and(is_hidden)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.into_path();
            if path.extension().and_then(|x| x.to_str()) != Some("txt") {
                return None;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
            Some(SyllabusFile { path, stem })
        })
        .collect();

    results.sort_by(|a, b| a.path.cmp(&b.path));
    results
}
