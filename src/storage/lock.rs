use crate::error::{IntakeError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Locks older than this are assumed abandoned by a crashed process
const STALE_AFTER: Duration = Duration::from_secs(30);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Advisory lock file held for the duration of a mutation
///
/// Acquired by exclusively creating the file, which records an owner token
/// (`<pid> <nanos> <seq>`). Released on drop, but only while the file still
/// carries that token.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    token: String,
}

impl FileLock {
    /// Waits up to `timeout` for the lock at `path`
    pub fn acquire(path: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let path = path.into();
        let token = new_token();
        let deadline = Instant::now() + timeout;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(e) = writeln!(file, "{token}") {
                        let _ = fs::remove_file(&path);
                        return Err(e.into());
                    }
                    return Ok(Self { path, token });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path) {
                        reclaim(&path, &token);
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(IntakeError::StoreUnavailable(format!(
                            "timed out waiting for lock {}",
                            path.display()
                        )));
                    }
                    thread::sleep(RETRY_DELAY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn owned(&self) -> bool {
        fs::read_to_string(&self.path).is_ok_and(|content| content.trim() == self.token)
    }
}

fn new_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let seq = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    format!("{} {nanos} {seq}", std::process::id())
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age > STALE_AFTER)
}

/// Moves a stale lock aside under a name unique to this waiter
///
/// Only one waiter's rename can succeed. If the file moved turns out to be
/// fresh, another waiter reclaimed first and it is linked back into place.
fn reclaim(path: &Path, token: &str) {
    let aside = path.with_extension(format!("stale.{}", token.replace(' ', "-")));
    if fs::rename(path, &aside).is_err() {
        return;
    }
    if is_stale(&aside) {
        debug!("Reclaimed stale lock {}", path.display());
    } else if let Err(e) = fs::hard_link(&aside, path) {
        warn!("Could not restore lock {}: {e}", path.display());
    }
    let _ = fs::remove_file(&aside);
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if self.owned() {
            let _ = fs::remove_file(&self.path);
        } else {
            debug!("Lock {} was taken over; leaving it", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lock");
        {
            let lock = FileLock::acquire(&path, Duration::from_millis(100)).unwrap();
            assert!(lock.path().exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_contended_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lock");
        let _held = FileLock::acquire(&path, Duration::from_millis(100)).unwrap();
        let second = FileLock::acquire(&path, Duration::from_millis(50));
        assert!(matches!(second, Err(IntakeError::StoreUnavailable(_))));
    }

    #[test]
    fn test_drop_leaves_lock_owned_by_someone_else() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lock");
        let lock = FileLock::acquire(&path, Duration::from_millis(100)).unwrap();
        fs::write(&path, "4242 0 0\n").unwrap();
        drop(lock);
        assert_eq!(fs::read_to_string(&path).unwrap(), "4242 0 0\n");
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".lock");
        let file = fs::File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(120))
            .unwrap();
        drop(file);

        let lock = FileLock::acquire(&path, Duration::from_millis(100)).unwrap();
        assert!(lock.owned());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(new_token(), new_token());
    }
}
