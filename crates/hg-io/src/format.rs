//! File formats and save/load entry points.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use hg_core::{Error, Result};
use hg_hist::{Histogram, Selector};

use crate::record::HistogramRecord;

/// On-disk encoding of a histogram record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain JSON.
    Json,
    /// Gzip-compressed JSON.
    JsonGz,
}

impl Format {
    /// Pick the format from the file name; anything else is unsupported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.ends_with(".json.gz") {
            Ok(Format::JsonGz)
        } else if name.ends_with(".json") {
            Ok(Format::Json)
        } else {
            Err(Error::UnsupportedFormat(format!(
                "cannot infer histogram format from '{}'",
                path.display()
            )))
        }
    }
}

/// Options for [`save_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Gzip level (0-9) for [`Format::JsonGz`]. Default: 6.
    pub compression: u32,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { compression: 6 }
    }
}

/// Encode `hist` into `writer`.
pub fn write_to<W: Write>(
    hist: &Histogram,
    format: Format,
    options: &SaveOptions,
    writer: W,
) -> Result<()> {
    let record = HistogramRecord::from(hist);
    match format {
        Format::Json => serde_json::to_writer(writer, &record)?,
        Format::JsonGz => {
            let mut enc = GzEncoder::new(writer, Compression::new(options.compression.min(9)));
            serde_json::to_writer(&mut enc, &record)?;
            enc.finish()?.flush()?;
        }
    }
    Ok(())
}

/// Decode a histogram from `reader`.
pub fn read_from<R: Read>(format: Format, reader: R) -> Result<Histogram> {
    let record: HistogramRecord = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::JsonGz => serde_json::from_reader(GzDecoder::new(reader))?,
    };
    record.into_histogram()
}

/// Save with default options; the format follows the extension.
pub fn save(hist: &Histogram, path: impl AsRef<Path>) -> Result<()> {
    save_with(hist, path, &SaveOptions::default())
}

/// Save with explicit options; the format follows the extension.
pub fn save_with(hist: &Histogram, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    write_to(hist, format, options, &mut out)?;
    out.flush()?;
    drop(out);

    let size = std::fs::metadata(path)?.len();
    tracing::info!(
        path = %path.display(),
        ?format,
        size = %humansize::format_size(size, humansize::BINARY),
        "histogram saved"
    );
    Ok(())
}

/// Load a whole histogram; the format follows the extension.
pub fn load(path: impl AsRef<Path>) -> Result<Histogram> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let hist = read_from(format, BufReader::new(File::open(path)?))?;
    tracing::info!(
        path = %path.display(),
        ?format,
        cells = hist.n_cells(),
        n_bins = hist.n_bins(),
        "histogram loaded"
    );
    Ok(hist)
}

/// Load only the cells picked by `selector` (same contract as [`Histogram::select`]).
pub fn load_selected(path: impl AsRef<Path>, selector: &[Selector]) -> Result<Histogram> {
    load(path)?.select(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_hist::BinEdges;

    fn sample() -> Histogram {
        let mut h = Histogram::new(BinEdges::new([0.0, 0.5, 1.0, 10.0]).unwrap(), &[3]);
        h.fill_cell(&[0], &[0.1, 0.7, 0.7, 20.0]).unwrap();
        h.fill_cell(&[2], &[-4.0, 9.9, f32::NAN]).unwrap();
        h
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/h.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("h.json.gz")).unwrap(), Format::JsonGz);
        for bad in ["h.fits", "h.pk", "h", "h.gz"] {
            assert!(matches!(Format::from_path(Path::new(bad)), Err(Error::UnsupportedFormat(_))));
        }
    }

    #[test]
    fn test_in_memory_roundtrip_both_formats() {
        let h = sample();
        for format in [Format::Json, Format::JsonGz] {
            let mut buf = Vec::new();
            write_to(&h, format, &SaveOptions::default(), &mut buf).unwrap();
            let back = read_from(format, buf.as_slice()).unwrap();
            assert!(back.equals(&h).unwrap(), "{format:?}");
            assert_eq!(back.bins(), h.bins());
        }
    }

    #[test]
    fn test_corrupt_input_is_error() {
        assert!(read_from(Format::Json, &b"{\"edges\": 3}"[..]).is_err());
        assert!(read_from(Format::JsonGz, &b"not gzip"[..]).is_err());
    }
}
