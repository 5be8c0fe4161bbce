//! Result files: path resolution, naming, and extraction writers.

use anyhow::{Context as _, Result};
use rapiddns::{extract, RecordSet};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{write_records, Console, OutputFormat};

/// Directory relative output paths are placed in.
pub const RESULT_DIR: &str = "result";

/// Fallback base name when a keyword sanitises to nothing.
const FALLBACK_NAME: &str = "search_result";

/// Replace characters that are unsafe in file names.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Expand `~` and place relative paths under `result/`.
pub fn resolve_path(path: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
    if expanded.is_absolute() || expanded.starts_with(RESULT_DIR) {
        expanded
    } else {
        Path::new(RESULT_DIR).join(expanded)
    }
}

/// Where extraction results are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPaths {
    pub subdomains: PathBuf,
    pub ips: PathBuf,
    pub ip_stats: PathBuf,
}

impl DerivedPaths {
    /// Names derived from `--file` (extension stripped) or from the keyword.
    pub fn for_search(file: Option<&str>, keyword: &str) -> Self {
        let base = file.map_or_else(
            || sanitize_filename(keyword),
            |f| {
                let path = Path::new(f);
                match path.extension() {
                    Some(_) => path.with_extension("").to_string_lossy().into_owned(),
                    None => f.to_string(),
                }
            },
        );
        Self {
            subdomains: resolve_path(&format!("{base}_subdomains.txt")),
            ips: resolve_path(&format!("{base}_ips.txt")),
            ip_stats: resolve_path(&format!("{base}_ip_stats.txt")),
        }
    }

    /// Names inside `dir`, derived from the export input.
    pub fn in_dir(dir: &Path, input: &str) -> Self {
        let base = sanitize_filename(input);
        Self {
            subdomains: dir.join(format!("{base}_subdomains.txt")),
            ips: dir.join(format!("{base}_ips.txt")),
            ip_stats: dir.join(format!("{base}_ip_stats.txt")),
        }
    }
}

/// Best-effort absolute form of a path that exists.
pub fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn create(path: &Path) -> Result<BufWriter<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Write one value per line.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = create(path)?;
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()?;
    Ok(absolute(path))
}

/// Save records to a file in the given format.
pub fn save_records(path: &Path, set: &RecordSet, format: OutputFormat, console: Console) -> Result<PathBuf> {
    let mut out = create(path)?;
    write_records(&mut out, set, format)?;
    out.flush()?;

    let abs = absolute(path);
    console.written(&abs, "Saved output to");
    Ok(abs)
}

/// Write unique sorted subdomains.
pub fn save_subdomains(path: &Path, set: &RecordSet, console: Console) -> Result<PathBuf> {
    let subdomains = extract::subdomains(set);
    let abs = write_lines(path, &subdomains)?;
    console.written(
        &abs,
        format!("Extracted {} unique subdomains to", subdomains.len()),
    );
    Ok(abs)
}

/// Write unique sorted IPs and per-subnet statistics.
pub fn save_ips(paths: &DerivedPaths, set: &RecordSet, console: Console) -> Result<Vec<PathBuf>> {
    let extraction = extract::ips(set);

    let ips = write_lines(&paths.ips, &extraction.ips)?;
    console.written(&ips, format!("Extracted {} unique IPs to", extraction.ips.len()));

    let stats = write_lines(
        &paths.ip_stats,
        extraction
            .subnets
            .iter()
            .map(|(subnet, count)| format!("{subnet}: {count} IPs")),
    )?;
    console.written(&stats, "Extracted IP statistics to");

    if !console.silent && !extraction.subnets.is_empty() {
        eprintln!("IP Segment Statistics:");
        for (subnet, count) in extraction.subnets.iter() {
            eprintln!("  {subnet}: {count}");
        }
    }

    Ok(vec![ips, stats])
}
