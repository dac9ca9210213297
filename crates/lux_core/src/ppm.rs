//! Plain-text PPM (P3) output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image has {actual} pixels, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write 8-bit RGB pixels (row-major, top row first) as a P3 image.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> OutputResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(OutputError::SizeMismatch {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;
    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Write a P3 image to a file.
pub fn save_ppm(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(&mut writer, width, height, pixels)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 1, &[[255, 0, 0], [0, 128, 255]]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0\n0 128 255\n");
    }

    #[test]
    fn test_write_ppm_size_mismatch() {
        let mut out = Vec::new();
        let result = write_ppm(&mut out, 2, 2, &[[0, 0, 0]]);

        assert!(matches!(
            result,
            Err(OutputError::SizeMismatch {
                expected: 4,
                actual: 1,
                ..
            })
        ));
        assert!(out.is_empty());
    }
}
