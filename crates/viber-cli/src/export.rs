use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use viber_core::GeneratedFile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Write each generated file into `dir`, returning the written paths.
///
/// Filenames come from model output, so anything that would escape the
/// output directory is rejected.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let name = safe_filename(&file.filename)?;
        let path = dir.join(name);
        std::fs::write(&path, &file.content)
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Bundle the generated files into a zip archive at `path`.
pub fn write_zip(path: &Path, files: &[GeneratedFile]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let out = std::fs::File::create(path)
        .with_context(|| format!("create archive {}", path.display()))?;
    let mut zip = ZipWriter::new(out);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in files {
        let name = safe_filename(&file.filename)?;
        zip.start_file(name, options)?;
        zip.write_all(file.content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

/// Default archive name for a project.
pub fn zip_bundle_name(project_name: &str) -> String {
    let stem = if project_name.trim().is_empty() {
        "viber-output"
    } else {
        project_name.trim()
    };
    format!("{stem}-prompts.zip")
}

fn safe_filename(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!("generated file has an empty name");
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        bail!("refusing to write generated filename {trimmed:?}");
    }
    Ok(trimmed)
}
