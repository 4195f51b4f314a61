use std::io::{Cursor, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use indoc::indoc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use pymeta_build::BuildFrontend;
use pymeta_metadata::MetadataError;

use crate::{Error, read_metadata, sdist_metadata, wheel_metadata};

const METADATA: &str = indoc! {"
    Metadata-Version: 2.1
    Name: foo
    Version: 1.0
    Requires-Dist: numpy>=1.20
    Requires-Dist: pandas ; extra == 'data'
"};

fn wheel(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (path, contents) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn sdist(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn wheel_requires_dist() {
    let archive = wheel(&[
        ("foo/__init__.py", b""),
        ("foo-1.0.dist-info/METADATA", METADATA.as_bytes()),
        ("foo-1.0.dist-info/WHEEL", b"Wheel-Version: 1.0\n"),
    ]);
    let metadata = wheel_metadata(&archive).unwrap();
    assert_eq!(metadata.name().unwrap().as_ref(), "foo");
    assert_eq!(
        metadata.requires_dist(),
        ["numpy>=1.20", "pandas ; extra == 'data'"]
    );
}

#[test]
fn wheel_missing_metadata() {
    let archive = wheel(&[("foo/__init__.py", b"")]);
    let err = wheel_metadata(&archive).unwrap_err();
    assert!(matches!(
        err,
        Error::Extract(pymeta_extract::Error::MissingMetadata)
    ));
}

#[test]
fn wheel_multiple_metadata() {
    let archive = wheel(&[
        ("foo-1.0.dist-info/METADATA", METADATA.as_bytes()),
        ("vendored/bar-2.0.dist-info/METADATA", b"Name: bar\n"),
    ]);
    let err = wheel_metadata(&archive).unwrap_err();
    let Error::Extract(pymeta_extract::Error::MultipleMetadata(paths)) = err else {
        panic!("expected multiple metadata files");
    };
    assert_eq!(
        paths,
        [
            "foo-1.0.dist-info/METADATA",
            "vendored/bar-2.0.dist-info/METADATA"
        ]
    );
}

#[test]
fn wheel_invalid_utf8() {
    let archive = wheel(&[("foo-1.0.dist-info/METADATA", b"Name: f\xf6o\n")]);
    let err = wheel_metadata(&archive).unwrap_err();
    insta::assert_snapshot!(err, @"Failed to parse `foo-1.0.dist-info/METADATA`");
    assert!(matches!(
        err,
        Error::Metadata(_, MetadataError::Utf8(_))
    ));
}

#[test]
fn sdist_not_gzip() {
    let frontend = BuildFrontend::new("python-should-not-run");
    let err = sdist_metadata(b"PK\x03\x04", &frontend).unwrap_err();
    assert!(matches!(err, Error::Extract(pymeta_extract::Error::Io(_))));
}

#[test]
fn sdist_without_top_level_directory() {
    let archive = sdist(&[("setup.py", b""), ("PKG-INFO", b"Name: foo\n")]);
    let frontend = BuildFrontend::new("python-should-not-run");
    let err = sdist_metadata(&archive, &frontend).unwrap_err();
    insta::assert_snapshot!(err, @r#"The top-level of the archive must only contain a single directory, but it contains: ["PKG-INFO", "setup.py"]"#);
}

#[test]
fn unsupported_distribution() {
    let err = read_metadata(Path::new("foo-1.0.zip"), || {
        panic!("no interpreter is needed for an unsupported file")
    })
    .unwrap_err();
    insta::assert_snapshot!(err, @"Unsupported distribution, expected a `.whl` or `.tar.gz` file: foo-1.0.zip");
}

#[test]
fn read_wheel_without_interpreter() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("foo-1.0-py3-none-any.whl");
    fs_err::write(
        &path,
        wheel(&[("foo-1.0.dist-info/METADATA", METADATA.as_bytes())]),
    )
    .unwrap();
    let metadata = read_metadata(&path, || {
        panic!("no interpreter is needed to read a wheel")
    })
    .unwrap();
    assert_eq!(metadata.name().unwrap().as_ref(), "foo");
}

#[test]
fn sdist_interpreter_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("foo-1.0.tar.gz");
    fs_err::write(&path, sdist(&[("foo-1.0/setup.py", b"")])).unwrap();
    let err = read_metadata(&path, || {
        Err(pymeta_build::Error::Io(std::io::Error::other(
            "no interpreter",
        )))
    })
    .unwrap_err();
    assert!(matches!(err, Error::Build(pymeta_build::Error::Io(_))));
}

/// Build source distributions with a stand-in for `python -m build`, which copies a wheel
/// shipped inside the source tree to the output directory and records where that directory was.
#[cfg(unix)]
mod fake_frontend {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use pymeta_build::BuildFrontend;

    use super::{METADATA, sdist, wheel};
    use crate::{Error, read_metadata, sdist_metadata};

    struct Fixture {
        temp_dir: TempDir,
        frontend: BuildFrontend,
    }

    impl Fixture {
        fn new(body: &str) -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let python = temp_dir.path().join("python");
            let script = format!(
                "#!/bin/sh\necho \"$5\" > \"{}\"\n{body}\n",
                temp_dir.path().join("outdir").display()
            );
            fs_err::write(&python, script).unwrap();
            fs_err::set_permissions(&python, Permissions::from_mode(0o755)).unwrap();
            Self {
                frontend: BuildFrontend::new(python),
                temp_dir,
            }
        }

        /// The build directory the frontend wrote to, which must be gone by now.
        fn build_dir(&self) -> PathBuf {
            let outdir = fs_err::read_to_string(self.temp_dir.path().join("outdir")).unwrap();
            Path::new(outdir.trim()).parent().unwrap().to_path_buf()
        }
    }

    fn foo_sdist() -> Vec<u8> {
        let prebuilt = wheel(&[("foo-1.0.dist-info/METADATA", METADATA.as_bytes())]);
        sdist(&[
            ("foo-1.0/pyproject.toml", b"[project]\nname = \"foo\"\n"),
            ("foo-1.0/prebuilt.whl", &prebuilt),
        ])
    }

    #[test]
    fn build_and_read() {
        let fixture = Fixture::new(r#"cp "$6/prebuilt.whl" "$5/foo-1.0-py3-none-any.whl""#);
        let metadata = sdist_metadata(&foo_sdist(), &fixture.frontend).unwrap();
        assert_eq!(metadata.version().unwrap().to_string(), "1.0");
        assert_eq!(
            metadata.requires_dist(),
            ["numpy>=1.20", "pandas ; extra == 'data'"]
        );
        assert!(!fixture.build_dir().exists());
    }

    #[test]
    fn read_from_path() {
        let fixture = Fixture::new(r#"cp "$6/prebuilt.whl" "$5/foo-1.0-py3-none-any.whl""#);
        let path = fixture.temp_dir.path().join("foo-1.0.tar.gz");
        fs_err::write(&path, foo_sdist()).unwrap();
        let metadata = read_metadata(&path, || Ok(fixture.frontend.clone())).unwrap();
        assert_eq!(metadata.name().unwrap().as_ref(), "foo");
    }

    #[test]
    fn build_failure_cleans_up() {
        let fixture = Fixture::new(indoc::indoc! {r#"
            echo "ERROR Missing dependencies: setuptools>=40.8.0" >&2
            exit 1
        "#});
        let err = sdist_metadata(&foo_sdist(), &fixture.frontend).unwrap_err();
        let Error::Build(pymeta_build::Error::BuildBackend { stderr, .. }) = err else {
            panic!("expected a build backend error");
        };
        assert_eq!(stderr, "ERROR Missing dependencies: setuptools>=40.8.0");
        assert!(!fixture.build_dir().exists());
    }

    #[test]
    fn no_wheel_produced() {
        let fixture = Fixture::new("exit 0");
        let err = sdist_metadata(&foo_sdist(), &fixture.frontend).unwrap_err();
        assert!(matches!(
            err,
            Error::Build(pymeta_build::Error::BuildBackend { .. })
        ));
        assert!(!fixture.build_dir().exists());
    }
}
