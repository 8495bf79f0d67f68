//! Reader for the IDX files the MNIST digits are distributed in.
//!
//! Both file kinds start with a big-endian magic number and item count. Image
//! files add the row and column counts, followed by one unsigned byte per
//! pixel; label files follow with one byte per label.

use crate::error::{Error, Result};
use crate::trainer::one_hot;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Magic number of an IDX1 (unsigned byte vector) label file.
pub const LABEL_MAGIC: u32 = 0x0000_0801;
/// Magic number of an IDX3 (unsigned byte 3-tensor) image file.
pub const IMAGE_MAGIC: u32 = 0x0000_0803;

/// A decoded image file. Pixels are scaled into `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Images {
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<Vec<f64>>,
}

/// One labelled image.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub pixels: Vec<f64>,
    pub label: usize,
}

/// An image file paired with its label file.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub rows: usize,
    pub cols: usize,
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Pairs images with labels, which must be equal in number.
    pub fn new(images: Images, labels: Vec<u8>) -> Result<Self> {
        if images.pixels.len() != labels.len() {
            return Err(Error::CountMismatch {
                images: images.pixels.len(),
                labels: labels.len(),
            });
        }
        let samples = images
            .pixels
            .into_iter()
            .zip(labels)
            .map(|(pixels, label)| Sample {
                pixels,
                label: usize::from(label),
            })
            .collect();
        Ok(Dataset {
            rows: images.rows,
            cols: images.cols,
            samples,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pixels per image.
    pub fn input_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Converts into `(pixels, one-hot target)` training pairs.
    pub fn into_examples(self, classes: usize) -> Result<Vec<(Vec<f64>, Vec<f64>)>> {
        self.samples
            .into_iter()
            .map(|s| {
                let target = one_hot(s.label, classes)?;
                Ok((s.pixels, target))
            })
            .collect()
    }

    /// Converts into `(pixels, label)` pairs for scoring.
    pub fn into_labelled(self) -> Vec<(Vec<f64>, usize)> {
        self.samples
            .into_iter()
            .map(|s| (s.pixels, s.label))
            .collect()
    }
}

/// Loads an image file and its label file from disk.
pub fn load_dataset<P, Q>(images: P, labels: Q) -> Result<Dataset>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let images = read_images(BufReader::new(File::open(images)?))?;
    let labels = read_labels(BufReader::new(File::open(labels)?))?;
    Dataset::new(images, labels)
}

/// Reads an IDX1 label file.
pub fn read_labels<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let mut cursor = Cursor::new(&data);

    cursor.expect_magic(LABEL_MAGIC)?;
    let count = cursor.read_u32()? as usize;
    Ok(cursor.take(count)?.to_vec())
}

/// Reads an IDX3 image file.
pub fn read_images<R: Read>(mut reader: R) -> Result<Images> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let mut cursor = Cursor::new(&data);

    cursor.expect_magic(IMAGE_MAGIC)?;
    let count = cursor.read_u32()? as usize;
    let rows = cursor.read_u32()? as usize;
    let cols = cursor.read_u32()? as usize;
    if count > 0 && rows * cols == 0 {
        return Err(Error::EmptyImage { rows, cols });
    }
    let body = cursor.take(count.saturating_mul(rows).saturating_mul(cols))?;

    let image_len = rows * cols;
    let pixels = (0..count)
        .map(|n| {
            body[n * image_len..(n + 1) * image_len]
                .iter()
                .map(|&p| f64::from(p) / 255.0)
                .collect()
        })
        .collect();
    debug!("read {} images of {}x{}", count, rows, cols);
    Ok(Images { rows, cols, pixels })
}

/// A read position in an in-memory IDX file.
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.data.len() - self.offset;
        if remaining < len {
            return Err(Error::Truncated {
                expected: self.offset.saturating_add(len),
                found: self.data.len(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn expect_magic(&mut self, expected: u32) -> Result<()> {
        let found = self.read_u32()?;
        if found != expected {
            return Err(Error::BadMagic { expected, found });
        }
        Ok(())
    }
}
