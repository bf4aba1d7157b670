//! Single-file NIfTI-2 volumes.
//!
//! The `nifti` crate only understands the 348-byte NIfTI-1 header, so the
//! 540-byte NIfTI-2 header is decoded here. Voxel data is column-major and
//! scaled by `scl_slope`/`scl_inter` when the slope is set.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

const HEADER_SIZE: usize = 540;

type Nifti2Result<T> = std::result::Result<T, String>;

/// Check if `bytes` start with a NIfTI-2 header in either byte order.
pub fn is_nifti2(bytes: &[u8]) -> bool {
    bytes.len() >= 4
        && (LittleEndian::read_i32(&bytes[0..4]) == HEADER_SIZE as i32
            || BigEndian::read_i32(&bytes[0..4]) == HEADER_SIZE as i32)
}

/// Decode the header and voxel data of an uncompressed NIfTI-2 file.
pub fn read_volume(bytes: &[u8]) -> Nifti2Result<ArrayD<f64>> {
    if bytes.len() < HEADER_SIZE {
        return Err(format!("NIfTI-2 header truncated at {} bytes", bytes.len()));
    }
    if LittleEndian::read_i32(&bytes[0..4]) == HEADER_SIZE as i32 {
        decode::<LittleEndian>(bytes)
    } else {
        decode::<BigEndian>(bytes)
    }
}

fn decode<E: ByteOrder>(bytes: &[u8]) -> Nifti2Result<ArrayD<f64>> {
    let magic = &bytes[4..8];
    if magic != b"n+2\0" {
        return Err(format!(
            "unsupported NIfTI-2 magic {:?} (only single .nii files are read)",
            String::from_utf8_lossy(magic)
        ));
    }

    let datatype = E::read_i16(&bytes[12..14]);
    let rank = E::read_i64(&bytes[16..24]);
    if !(1..=7).contains(&rank) {
        return Err(format!("invalid NIfTI-2 rank {}", rank));
    }
    let dims = (1..=rank as usize)
        .map(|i| {
            let d = E::read_i64(&bytes[16 + 8 * i..24 + 8 * i]);
            usize::try_from(d).map_err(|_| format!("invalid NIfTI-2 dimension {}", d))
        })
        .collect::<Nifti2Result<Vec<usize>>>()?;

    let vox_offset = E::read_i64(&bytes[168..176]);
    let slope = E::read_f64(&bytes[176..184]);
    let inter = E::read_f64(&bytes[184..192]);

    let offset = usize::try_from(vox_offset)
        .map_err(|_| format!("invalid NIfTI-2 voxel offset {}", vox_offset))?;
    let count: usize = dims.iter().product();
    let payload = bytes.get(offset..).unwrap_or_default();

    let mut values = voxels::<E>(datatype, payload, count)?;
    if slope != 0.0 && slope.is_finite() {
        values.iter_mut().for_each(|v| *v = *v * slope + inter);
    }

    ArrayD::from_shape_vec(IxDyn(&dims).f(), values)
        .map_err(|e| format!("invalid NIfTI-2 volume shape: {}", e))
}

fn voxels<E: ByteOrder>(datatype: i16, payload: &[u8], count: usize) -> Nifti2Result<Vec<f64>> {
    macro_rules! convert {
        ($size:expr, $read:expr) => {{
            let needed = count * $size;
            if payload.len() < needed {
                return Err(format!(
                    "NIfTI-2 data holds {} bytes, {} expected",
                    payload.len(),
                    needed
                ));
            }
            payload[..needed]
                .chunks_exact($size)
                .map(|c| $read(c) as f64)
                .collect()
        }};
    }

    Ok(match datatype {
        2 => convert!(1, |c: &[u8]| c[0]),
        256 => convert!(1, |c: &[u8]| c[0] as i8),
        4 => convert!(2, E::read_i16),
        512 => convert!(2, E::read_u16),
        8 => convert!(4, E::read_i32),
        768 => convert!(4, E::read_u32),
        16 => convert!(4, E::read_f32),
        1024 => convert!(8, E::read_i64),
        1280 => convert!(8, E::read_u64),
        64 => convert!(8, E::read_f64),
        other => return Err(format!("unsupported NIfTI-2 datatype {}", other)),
    })
}
