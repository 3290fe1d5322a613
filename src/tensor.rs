//! Decode binary tensor responses.
//!
//! The `/tensor` endpoint answers with raw little-endian `f32` values,
//! row-major, `num_rows * dim` of them. No header, no checksum.

use crate::types::{DataPoint, DataSet};
use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Decode raw tensor bytes into a [`DataSet`] of `dim`-wide points.
pub fn decode_tensor(data: &[u8], dim: usize) -> Result<DataSet> {
    if dim == 0 {
        bail!("tensor dim must be positive");
    }
    let row_bytes = dim * 4;
    if data.len() % row_bytes != 0 {
        bail!(
            "tensor response length {} is not a multiple of row size {} (dim {})",
            data.len(),
            row_bytes,
            dim
        );
    }

    let rows = data.len() / row_bytes;
    let mut r = Cursor::new(data);
    let mut points = Vec::with_capacity(rows);
    for index in 0..rows {
        let mut vector = Vec::with_capacity(dim);
        for _ in 0..dim {
            vector.push(
                r.read_f32::<LittleEndian>()
                    .with_context(|| format!("reading tensor row {index}"))?,
            );
        }
        points.push(DataPoint {
            vector,
            index,
            metadata: Default::default(),
        });
    }

    Ok(DataSet::new(points, dim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};

    fn encode(values: &[f32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * 4);
        for v in values {
            out.write_f32::<LittleEndian>(*v).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_two_rows() {
        let bytes = encode(&[1.0, 2.0, 3.0, -4.0, 0.5, 0.0]);
        let ds = decode_tensor(&bytes, 3).unwrap();
        assert_eq!(ds.dim, [2, 3]);
        assert_eq!(ds.points[0].vector, vec![1.0, 2.0, 3.0]);
        assert_eq!(ds.points[1].vector, vec![-4.0, 0.5, 0.0]);
        assert_eq!(ds.points[1].index, 1);
    }

    #[test]
    fn test_decode_empty_response() {
        let ds = decode_tensor(&[], 16).unwrap();
        assert_eq!(ds.dim, [0, 16]);
        assert!(ds.points.is_empty());
    }

    #[test]
    fn test_rejects_truncated_row() {
        let bytes = encode(&[1.0, 2.0, 3.0]);
        let err = decode_tensor(&bytes[..10], 3).unwrap_err();
        assert!(err.to_string().contains("not a multiple"));
    }

    #[test]
    fn test_rejects_zero_dim() {
        assert!(decode_tensor(&[], 0).is_err());
    }
}
