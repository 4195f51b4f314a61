#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteBin, PathChild};
use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub(crate) const METADATA: &str = indoc::indoc! {"
    Metadata-Version: 2.1
    Name: foo
    Version: 1.0
    Summary: A test package
    Requires-Dist: numpy>=1.20
    Requires-Dist: pandas ; extra == 'data'
"};

/// The `pymeta` binary, isolated from the caller's environment.
pub(crate) fn pymeta() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pymeta"));
    command.env_remove("PYMETA_PYTHON").env_remove("RUST_LOG");
    command
}

/// The bytes of a wheel with the given entries.
pub(crate) fn wheel_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (path, contents) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// The bytes of a `.tar.gz` archive with the given entries.
pub(crate) fn sdist_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Write `foo-1.0-py3-none-any.whl` into the temporary directory.
pub(crate) fn foo_wheel(temp_dir: &TempDir) -> PathBuf {
    let wheel = temp_dir.child("foo-1.0-py3-none-any.whl");
    wheel
        .write_binary(&wheel_bytes(&[
            ("foo/__init__.py", b""),
            ("foo-1.0.dist-info/METADATA", METADATA.as_bytes()),
        ]))
        .unwrap();
    wheel.to_path_buf()
}

/// Write `foo-1.0.tar.gz` into the temporary directory. The source tree ships a prebuilt wheel,
/// for use with [`fake_python`].
pub(crate) fn foo_sdist(temp_dir: &TempDir) -> PathBuf {
    let prebuilt = wheel_bytes(&[("foo-1.0.dist-info/METADATA", METADATA.as_bytes())]);
    let sdist = temp_dir.child("foo-1.0.tar.gz");
    sdist
        .write_binary(&sdist_bytes(&[
            ("foo-1.0/pyproject.toml", b"[project]\nname = \"foo\"\n"),
            ("foo-1.0/prebuilt.whl", &prebuilt),
        ]))
        .unwrap();
    sdist.to_path_buf()
}

/// A stand-in for a Python interpreter with `build` installed: for
/// `-m build --wheel --outdir <outdir> <src>`, copies `<src>/prebuilt.whl` to `<outdir>`.
#[cfg(unix)]
pub(crate) fn fake_python(temp_dir: &TempDir) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let python = temp_dir.child("python");
    python
        .write_binary(
            indoc::indoc! {r#"
                #!/bin/sh
                echo "* Building wheel..."
                cp "$6/prebuilt.whl" "$5/foo-1.0-py3-none-any.whl"
            "#}
            .as_bytes(),
        )
        .unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
    python.to_path_buf()
}
