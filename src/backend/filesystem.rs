//! Functionality related to reading and writing the store files.
use std::{
    fs::{self, metadata, File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
};

use camino::Utf8Path;
use tempfile::NamedTempFile;

use crate::error::Error;

/// Ensure that a given path exists, is a directory, and is not read-only.
pub fn verify_writeable_dir<P>(path: P) -> Result<(), Error>
where
    P: AsRef<Utf8Path>,
{
    let path = path.as_ref();
    let metadata = metadata(path).map_err(|err| Error::store_io(path, err))?;
    if !metadata.is_dir() {
        return Err(Error::StoreIoError(
            path.into(),
            String::from("not a directory"),
        ));
    }

    if metadata.permissions().readonly() {
        return Err(Error::StoreIoError(path.into(), String::from("read-only")));
    }

    Ok(())
}

/// Create the parent directory of `path` if it doesn't exist yet.
pub fn ensure_parent_dir<P>(path: P) -> Result<(), Error>
where
    P: AsRef<Utf8Path>,
{
    match path.as_ref().parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| Error::store_io(parent, err))?;
            verify_writeable_dir(parent)
        }
        _ => Ok(()),
    }
}

/// Create a new file containing the given contents.
///
/// Return `Ok(false)` without touching anything if a non-empty file already exists at `path`.
pub fn create_with_contents<P, B>(path: P, contents: B) -> Result<bool, Error>
where
    P: AsRef<Utf8Path>,
    B: AsRef<[u8]>,
{
    let path = path.as_ref();
    let mut file = match File::create_new(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            let len = metadata(path)
                .map_err(|err| Error::store_io(path, err))?
                .len();
            if len > 0 {
                return Ok(false);
            }
            OpenOptions::new()
                .append(true)
                .open(path)
                .map_err(|err| Error::store_io(path, err))?
        }
        Err(err) => return Err(Error::store_io(path, err)),
    };
    file.write_all(contents.as_ref())
        .and_then(|_| file.sync_all())
        .map_err(|err| Error::store_io(path, err))?;
    Ok(true)
}

/// Read a whole file as UTF-8. A file that doesn't exist reads as [None].
pub fn read_if_exists<P>(path: P) -> Result<Option<String>, Error>
where
    P: AsRef<Utf8Path>,
{
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::store_io(path, err)),
    }
}

/// Append one line to an existing file in a single write, then flush it to disk.
///
/// If the file doesn't end in a newline, one is written ahead of `line` so the two never share a
/// line.
pub fn append_line<P>(path: P, line: &str) -> Result<(), Error>
where
    P: AsRef<Utf8Path>,
{
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(false)
        .open(path)
        .map_err(|err| Error::store_io(path, err))?;

    let needs_newline =
        ends_without_newline(&mut file).map_err(|err| Error::store_io(path, err))?;
    let mut record = String::with_capacity(line.len() + 2);
    if needs_newline {
        record.push('\n');
    }
    record.push_str(line);
    record.push('\n');
    file.write_all(record.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|err| Error::store_io(path, err))
}

fn ends_without_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Replace the contents of `path` by writing a sibling temp file and renaming it over the target.
pub fn write_atomic<P, B>(path: P, contents: B) -> Result<(), Error>
where
    P: AsRef<Utf8Path>,
    B: AsRef<[u8]>,
{
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| Error::store_io(dir, err))?;
    temp.write_all(contents.as_ref())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| Error::store_io(dir, err))?;
    temp.persist(path)
        .map_err(|err| Error::store_io(path, err.error))?;
    Ok(())
}
