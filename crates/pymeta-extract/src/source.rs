use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::Error;

/// Unpack a `.tar.gz` archive into the target directory.
pub fn untar_gz(reader: impl Read, target: &Path) -> Result<(), Error> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    // https://github.com/alexcrichton/tar-rs/issues/349
    archive.set_preserve_mtime(false);
    archive.unpack(target)?;
    Ok(())
}

/// Find the top-level directory of an unpacked source distribution.
///
/// > A .tar.gz source distribution (sdist) contains a single top-level directory called
/// > `{name}-{version}` (e.g. foo-1.0), containing the source files of the package.
///
/// Anything else at the top level, including a lone file, is rejected.
pub fn source_tree(target: &Path) -> Result<PathBuf, Error> {
    let top_level =
        fs_err::read_dir(target)?.collect::<std::io::Result<Vec<fs_err::DirEntry>>>()?;

    if let [root] = top_level.as_slice() {
        if root.file_type()?.is_dir() {
            debug!("Found source tree at `{}`", root.path().display());
            return Ok(root.path());
        }
    }

    if top_level.is_empty() {
        return Err(Error::EmptyArchive);
    }

    let mut names: Vec<_> = top_level
        .into_iter()
        .map(|entry| entry.file_name())
        .collect();
    names.sort();
    Err(Error::NonSingularArchive(names))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::{source_tree, untar_gz};
    use crate::Error;

    fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn single_directory() {
        let archive = tar_gz(&[
            ("foo-1.0/pyproject.toml", "[project]\nname = \"foo\"\n"),
            ("foo-1.0/foo/__init__.py", ""),
        ]);
        let target = tempfile::tempdir().unwrap();
        untar_gz(Cursor::new(archive), target.path()).unwrap();

        let root = source_tree(target.path()).unwrap();
        assert_eq!(root, target.path().join("foo-1.0"));
        assert!(root.join("pyproject.toml").is_file());
    }

    #[test]
    fn empty() {
        let target = tempfile::tempdir().unwrap();
        let err = source_tree(target.path()).unwrap_err();
        insta::assert_snapshot!(err, @"The top-level of the archive must only contain a single directory, but it's empty");
    }

    #[test]
    fn multiple_entries() {
        let archive = tar_gz(&[("foo-1.0/setup.py", ""), ("bar-1.0/setup.py", "")]);
        let target = tempfile::tempdir().unwrap();
        untar_gz(Cursor::new(archive), target.path()).unwrap();

        let err = source_tree(target.path()).unwrap_err();
        insta::assert_snapshot!(err, @r#"The top-level of the archive must only contain a single directory, but it contains: ["bar-1.0", "foo-1.0"]"#);
    }

    #[test]
    fn single_file() {
        let archive = tar_gz(&[("setup.py", "")]);
        let target = tempfile::tempdir().unwrap();
        untar_gz(Cursor::new(archive), target.path()).unwrap();

        let err = source_tree(target.path()).unwrap_err();
        assert!(matches!(err, Error::NonSingularArchive(names) if names == ["setup.py"]));
    }

    #[test]
    fn not_gzip() {
        let target = tempfile::tempdir().unwrap();
        let err = untar_gz(Cursor::new(b"plain text".to_vec()), target.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
