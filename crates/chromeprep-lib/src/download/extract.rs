use eyre::{Result, WrapErr, eyre};
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

#[cfg(unix)]
const S_IFMT: u32 = 0o170000;
#[cfg(unix)]
const S_IFLNK: u32 = 0o120000;

/// Unpacks `archive_path` into `destination`, keeping unix modes and symlinks.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .wrap_err_with(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .wrap_err_with(|| format!("Failed to read archive: {}", archive_path.display()))?;

    std::fs::create_dir_all(destination)
        .wrap_err_with(|| format!("Failed to create directory: {}", destination.display()))?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "Skipping archive entry outside of destination");
            continue;
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)
                .wrap_err_with(|| format!("Failed to create directory: {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode()
            && mode & S_IFMT == S_IFLNK
        {
            let mut target = String::new();
            std::io::Read::read_to_string(&mut entry, &mut target)?;
            if Path::new(&target).is_absolute() {
                return Err(eyre!(
                    "Archive entry {} links outside of the archive",
                    entry.name()
                ));
            }
            std::os::unix::fs::symlink(&target, &out_path)
                .wrap_err_with(|| format!("Failed to create symlink: {}", out_path.display()))?;
            extracted += 1;
            continue;
        }

        let mut out_file = File::create(&out_path)
            .wrap_err_with(|| format!("Failed to create file: {}", out_path.display()))?;
        std::io::copy(&mut entry, &mut out_file)
            .wrap_err_with(|| format!("Failed to extract {}", out_path.display()))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode & 0o7777))?;
        }
        extracted += 1;
    }

    if extracted == 0 {
        return Err(eyre!("Archive {} is empty", archive_path.display()));
    }
    tracing::debug!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        files = extracted,
        "Extracted archive"
    );
    Ok(extracted)
}
