//! Directory-backed storage container using libc system calls
//!
//! Each stream is one file inside the container directory; the file name
//! is the UTF-8 form of the encoded stream name, with `%`, `/` and NUL
//! percent-escaped so every stream stays a single file directly under the
//! root.

use crate::infrastructure::stream_name::StreamName;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::interface::{StorageContainer, StreamHandle};
use libc::{self, c_int, c_void, mode_t, off_t, size_t};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Default positional read size
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

fn last_errno() -> c_int {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Host file name of a stream
///
/// `%`, `/` and NUL become `%XX` (two hex digits of the character), every
/// other character is kept. The escape is reversible and never produces
/// a path separator.
pub fn stream_file_name(name: &StreamName) -> String {
    let mut out = String::with_capacity(name.len() * 3);
    for ch in name.to_file_name().chars() {
        match ch {
            '%' | '/' | '\0' => out.push_str(&format!("%{:02X}", ch as u32)),
            _ => out.push(ch),
        }
    }
    out
}

fn c_path(path: &Path) -> StorageResult<CString> {
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

/// Open file handle for one stream
pub struct DirStreamHandle {
    fd: c_int,
    path: String,
    pos: u64,
    chunk_size: usize,
}

impl DirStreamHandle {
    fn new(fd: c_int, path: String, chunk_size: usize) -> Self {
        DirStreamHandle {
            fd,
            path,
            pos: 0,
            chunk_size,
        }
    }
}

impl StreamHandle for DirStreamHandle {
    fn stat(&self) -> StorageResult<u64> {
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::fstat(self.fd, &mut st) };

        if result < 0 {
            Err(StorageError::SystemError(last_errno(), "fstat failed".to_string()))
        } else {
            Ok(st.st_size as u64)
        }
    }

    fn read(&mut self, len: usize) -> StorageResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;

        while filled < len {
            let want = (len - filled).min(self.chunk_size);
            let result = unsafe {
                libc::pread(
                    self.fd,
                    buf[filled..].as_mut_ptr() as *mut c_void,
                    want as size_t,
                    self.pos as off_t,
                )
            };

            if result < 0 {
                let errno = last_errno();
                if errno == libc::EINTR {
                    continue;
                }
                return Err(StorageError::SystemError(errno, "pread failed".to_string()));
            }
            if result == 0 {
                return Err(StorageError::ShortRead {
                    stream: self.path.clone(),
                    expected: len,
                    actual: filled,
                });
            }

            filled += result as usize;
            self.pos += result as u64;
        }

        Ok(buf)
    }
}

impl Drop for DirStreamHandle {
    fn drop(&mut self) {
        // nothing useful to do with a close failure on a read-only fd
        let _ = unsafe { libc::close(self.fd) };
    }
}

/// Storage container backed by a host directory
pub struct DirStorage {
    root: PathBuf,
    chunk_size: usize,
}

impl DirStorage {
    /// Open a container directory, creating it if missing
    pub fn new(root: impl AsRef<Path>, chunk_size: usize) -> StorageResult<Self> {
        if chunk_size == 0 {
            return Err(StorageError::InvalidArgument(
                "chunk size must be non-zero".to_string(),
            ));
        }

        let root = root.as_ref().to_path_buf();
        let path = c_path(&root)?;
        let result = unsafe { libc::mkdir(path.as_ptr(), 0o755) };

        if result < 0 {
            let errno = last_errno();
            match errno {
                libc::EEXIST => {}
                libc::EACCES | libc::EPERM => {
                    return Err(StorageError::PermissionDenied(root.display().to_string()));
                }
                _ => return Err(StorageError::SystemError(errno, "mkdir failed".to_string())),
            }
        }

        Ok(Self { root, chunk_size })
    }

    /// Container directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path of a stream
    pub fn stream_path(&self, name: &StreamName) -> PathBuf {
        self.root.join(stream_file_name(name))
    }

    /// Open a stream file with the given flags and mode
    fn open_internal(&self, name: &StreamName, flags: c_int, mode: mode_t) -> StorageResult<(c_int, String)> {
        let path = self.stream_path(name);
        let display = path.display().to_string();
        let cpath = c_path(&path)?;

        let fd = unsafe { libc::open(cpath.as_ptr(), flags | libc::O_CLOEXEC, mode as libc::c_uint) };

        if fd < 0 {
            let errno = last_errno();
            match errno {
                libc::ENOENT => Err(StorageError::NotFound(display)),
                libc::EACCES | libc::EPERM => Err(StorageError::PermissionDenied(display)),
                _ => Err(StorageError::SystemError(
                    errno,
                    format!("open failed with errno {} for path '{}'", errno, display),
                )),
            }
        } else {
            Ok((fd, display))
        }
    }

    /// Create or replace a stream with the given contents
    pub fn put_stream(&self, name: &StreamName, data: &[u8]) -> StorageResult<()> {
        let flags = libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC;
        let (fd, _) = self.open_internal(name, flags, 0o644)?;

        let mut written = 0;
        while written < data.len() {
            let result = unsafe {
                libc::pwrite(
                    fd,
                    data[written..].as_ptr() as *const c_void,
                    (data.len() - written) as size_t,
                    written as off_t,
                )
            };

            if result < 0 {
                let errno = last_errno();
                if errno == libc::EINTR {
                    continue;
                }
                let _ = unsafe { libc::close(fd) };
                return Err(StorageError::SystemError(errno, "pwrite failed".to_string()));
            }
            written += result as usize;
        }

        let result = unsafe { libc::close(fd) };
        if result < 0 {
            Err(StorageError::SystemError(last_errno(), "close failed".to_string()))
        } else {
            Ok(())
        }
    }

    /// Delete a stream
    pub fn remove_stream(&self, name: &StreamName) -> StorageResult<()> {
        let path = self.stream_path(name);
        let cpath = c_path(&path)?;

        let result = unsafe { libc::unlink(cpath.as_ptr()) };

        if result < 0 {
            let errno = last_errno();
            match errno {
                libc::ENOENT => Err(StorageError::NotFound(path.display().to_string())),
                libc::EACCES | libc::EPERM => {
                    Err(StorageError::PermissionDenied(path.display().to_string()))
                }
                _ => Err(StorageError::SystemError(errno, "unlink failed".to_string())),
            }
        } else {
            Ok(())
        }
    }
}

impl StorageContainer for DirStorage {
    fn open_stream(&self, name: &StreamName) -> StorageResult<Box<dyn StreamHandle>> {
        let (fd, path) = self.open_internal(name, libc::O_RDONLY, 0)?;
        Ok(Box::new(DirStreamHandle::new(fd, path, self.chunk_size)))
    }
}
