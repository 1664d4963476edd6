//! Serial device discovery.
//!
//! Probes the platform device directory for a writable USB serial device
//! (the embedded display). Pure function of OS state; the dispatcher caches
//! the result and invalidates it on write failure, not this module.

use std::path::{Path, PathBuf};

use fs_err as fs;

const DEVICE_DIR: &str = "/dev";

/// USB CDC devices register as `cu.usbmodem*` / `cu.usbserial*` on macOS.
#[cfg(target_os = "macos")]
const DEVICE_PREFIX: &str = "cu.usb";

/// Linux CDC-ACM devices register as `ttyACM*`.
#[cfg(not(target_os = "macos"))]
const DEVICE_PREFIX: &str = "ttyACM";

/// Returns the first writable serial device, if any.
pub fn find() -> Option<PathBuf> {
    find_in(Path::new(DEVICE_DIR), DEVICE_PREFIX)
}

fn find_in(dir: &Path, prefix: &str) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "device directory not readable");
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix))
        })
        .map(|entry| entry.path())
        .collect();

    // Deterministic pick when several devices are plugged in.
    candidates.sort();

    let found = candidates.into_iter().find(|path| is_writable(path));
    match &found {
        Some(path) => tracing::debug!(device = %path.display(), "serial device found"),
        None => tracing::debug!(dir = %dir.display(), prefix, "no writable serial device"),
    }
    found
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: access() only reads the path string and touches no other memory.
    #[allow(unsafe_code)]
    unsafe {
        libc::access(c_path.as_ptr(), libc::W_OK) == 0
    }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn finds_first_matching_device_sorted() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("ttyACM1")).unwrap();
        File::create(dir.path().join("ttyACM0")).unwrap();
        File::create(dir.path().join("ttyS0")).unwrap();

        let found = find_in(dir.path(), "ttyACM").unwrap();
        assert_eq!(found, dir.path().join("ttyACM0"));
    }

    #[test]
    fn returns_none_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("ttyS0")).unwrap();
        assert_eq!(find_in(dir.path(), "ttyACM"), None);
    }

    #[test]
    fn returns_none_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("not-there");
        assert_eq!(find_in(&gone, "ttyACM"), None);
    }

    #[cfg(unix)]
    #[test]
    fn skips_unwritable_devices() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("ttyACM0");
        File::create(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o444)).unwrap();
        File::create(dir.path().join("ttyACM1")).unwrap();

        // Root bypasses permission checks; only assert the skip for normal users.
        // SAFETY: geteuid() reads the effective uid and touches no memory.
        #[allow(unsafe_code)]
        let euid = unsafe { libc::geteuid() };
        if euid != 0 {
            let found = find_in(dir.path(), "ttyACM").unwrap();
            assert_eq!(found, dir.path().join("ttyACM1"));
        }
    }
}
