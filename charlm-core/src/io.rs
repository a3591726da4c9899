use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a corpus file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n`, `\r\n` and lone `\r`
///
/// This is the file-backed line source fed to the trainer.
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	let contents = contents.replace("\r\n", "\n").replace('\r', "\n");
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds the cache path of a trained model next to its corpus.
///
/// The whole file stem is kept (`names.fr.txt` → `names.fr.o2.bin`) and
/// the order is appended, so models of different corpora or orders do not
/// overwrite each other.
///
/// Example:
/// `data/charles.txt` + order `15` → `data/charles.o15.bin`
pub fn build_cache_path<P: AsRef<Path>>(corpus_path: P, order: usize) -> io::Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();

	let parent = corpus_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = corpus_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	Ok(parent.join(format!("{}.o{order}.bin", file_stem.to_string_lossy())))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/charles.txt"` → `"charles"`
/// - `"charles.txt"` → `"charles"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
