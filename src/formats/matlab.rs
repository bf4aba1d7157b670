//! MATLAB containers: HDF5-backed v7.3 files and legacy v5 files.

use crate::error::{NiioError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
use matfile::{MatFile, NumericData};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use std::io::Read;
use std::path::{Path, PathBuf};

const HEADER_LEN: usize = 128;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

/// Array class of a v5 variable, from its array-flags subelement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatClass {
    /// Cell array.
    Cell,
    /// Struct array.
    Struct,
    /// Object.
    Object,
    /// Character array.
    Char,
    /// Sparse matrix.
    Sparse,
    /// Dense numeric or logical array.
    Numeric,
    /// Any other class code (function handles, opaque objects, ...).
    Other(u8),
}

impl MatClass {
    fn from_code(code: u8) -> Self {
        match code {
            1 => MatClass::Cell,
            2 => MatClass::Struct,
            3 => MatClass::Object,
            4 => MatClass::Char,
            5 => MatClass::Sparse,
            6..=15 => MatClass::Numeric,
            other => MatClass::Other(other),
        }
    }
}

/// One entry of a v5 file's variable directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatVariable {
    /// Variable name.
    pub name: String,
    /// Array class.
    pub class: MatClass,
}

/// List every variable of a v5 file in file order, whatever its class.
///
/// `matfile` only keeps numeric arrays, so the directory is read from the
/// element tags directly. Compressed elements are inflated.
pub fn scan_v5(bytes: &[u8]) -> std::result::Result<Vec<MatVariable>, String> {
    if bytes.len() < HEADER_LEN {
        return Err("file shorter than the MATLAB v5 header".to_string());
    }
    match &bytes[126..128] {
        b"IM" => scan_elements::<LittleEndian>(&bytes[HEADER_LEN..]),
        b"MI" => scan_elements::<BigEndian>(&bytes[HEADER_LEN..]),
        other => Err(format!("invalid endian indicator {:?}", other)),
    }
}

fn scan_elements<E: ByteOrder>(mut data: &[u8]) -> std::result::Result<Vec<MatVariable>, String> {
    let mut variables = Vec::new();
    while data.len() >= 8 {
        let (data_type, payload, rest) = next_element::<E>(data)?;
        data = rest;
        match data_type {
            MI_MATRIX => variables.push(matrix_header::<E>(payload)?),
            MI_COMPRESSED => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(payload)
                    .read_to_end(&mut inflated)
                    .map_err(|e| format!("cannot inflate compressed element: {}", e))?;
                variables.extend(scan_elements::<E>(&inflated)?);
            }
            _ => {}
        }
    }
    Ok(variables)
}

/// Split off one tagged element: `(type, payload, rest)`.
fn next_element<E: ByteOrder>(data: &[u8]) -> std::result::Result<(u32, &[u8], &[u8]), String> {
    if data.len() < 8 {
        return Err("truncated element tag".to_string());
    }
    let word = E::read_u32(&data[0..4]);
    if word >> 16 != 0 {
        // Small data element: type and size share the first word.
        let len = (word >> 16) as usize;
        if len > 4 {
            return Err(format!("small element of {} bytes", len));
        }
        return Ok((word & 0xFFFF, &data[4..4 + len], &data[8..]));
    }

    let len = E::read_u32(&data[4..8]) as usize;
    let end = 8 + len;
    if data.len() < end {
        return Err(format!("element of {} bytes overruns the file", len));
    }
    // Compressed elements are not padded; everything else is 8-byte aligned.
    let next = if word == MI_COMPRESSED {
        end
    } else {
        (end + 7) / 8 * 8
    };
    Ok((word, &data[8..end], &data[next.min(data.len())..]))
}

fn matrix_header<E: ByteOrder>(payload: &[u8]) -> std::result::Result<MatVariable, String> {
    let (_, flags, rest) = next_element::<E>(payload)?;
    if flags.len() < 4 {
        return Err("truncated array flags".to_string());
    }
    let class = MatClass::from_code((E::read_u32(&flags[0..4]) & 0xFF) as u8);
    let (_, _dims, rest) = next_element::<E>(rest)?;
    let (_, name, _) = next_element::<E>(rest)?;
    Ok(MatVariable {
        name: String::from_utf8_lossy(name).into_owned(),
        class,
    })
}

/// An opened MATLAB container.
///
/// The HDF5 handle is released when the container is dropped.
#[derive(Debug)]
pub enum MatContainer {
    /// A v7.3 file, which is an HDF5 file with row-major axis order.
    Hdf5 { path: PathBuf, file: hdf5::File },
    /// A v5 (or older) file, fully parsed into memory.
    Legacy {
        path: PathBuf,
        variables: Vec<MatVariable>,
        mat: MatFile,
    },
}

impl MatContainer {
    /// Open as HDF5 first, then fall back to the legacy parser.
    pub fn open(path: &Path) -> Result<Self> {
        let hdf5_err = match hdf5::File::open(path) {
            Ok(file) => {
                tracing::debug!("Opened {} as HDF5-backed MATLAB file", path.display());
                return Ok(MatContainer::Hdf5 {
                    path: path.to_path_buf(),
                    file,
                });
            }
            Err(e) => e,
        };

        let bytes = std::fs::read(path).map_err(|e| NiioError::read_failure(path, e))?;
        let legacy = scan_v5(&bytes).and_then(|variables| {
            MatFile::parse(bytes.as_slice())
                .map(|mat| (variables, mat))
                .map_err(|e| format!("{:?}", e))
        });
        match legacy {
            Ok((variables, mat)) => {
                tracing::debug!(
                    "Opened {} as legacy MATLAB file with {} variables",
                    path.display(),
                    variables.len()
                );
                Ok(MatContainer::Legacy {
                    path: path.to_path_buf(),
                    variables,
                    mat,
                })
            }
            Err(legacy_err) => Err(NiioError::read_failure(
                path,
                format!(
                    "cannot read as HDF5 ({}) or legacy MATLAB ({})",
                    hdf5_err, legacy_err
                ),
            )),
        }
    }

    /// Check if the container was opened through HDF5.
    pub fn is_hdf5(&self) -> bool {
        matches!(self, MatContainer::Hdf5 { .. })
    }

    /// Variable names in container order, numeric or not.
    pub fn keys(&self) -> Result<Vec<String>> {
        match self {
            MatContainer::Hdf5 { path, file } => file
                .member_names()
                .map_err(|e| NiioError::read_failure(path, e)),
            MatContainer::Legacy { variables, .. } => {
                Ok(variables.iter().map(|v| v.name.clone()).collect())
            }
        }
    }

    /// Read a variable as stored, or `None` if it is absent.
    ///
    /// Variables that exist but hold no numeric array (char, cell, struct,
    /// sparse, groups) are an [`NiioError::UnsupportedContainer`].
    pub fn read(&self, key: &str) -> Result<Option<ArrayD<f64>>> {
        match self {
            MatContainer::Hdf5 { path, file } => {
                if !file.link_exists(key) {
                    return Ok(None);
                }
                let dataset = file.dataset(key).map_err(|_| {
                    NiioError::unsupported_container(path, format!("non-dataset member {}", key))
                })?;
                dataset
                    .read_dyn::<f64>()
                    .map(Some)
                    .map_err(|e| NiioError::read_failure(path, e))
            }
            MatContainer::Legacy {
                path,
                variables,
                mat,
            } => {
                let Some(variable) = variables.iter().find(|v| v.name == key) else {
                    return Ok(None);
                };
                if variable.class != MatClass::Numeric {
                    return Err(NiioError::unsupported_container(
                        path,
                        format!("{:?} MATLAB variable {}", variable.class, key),
                    ));
                }
                let array = mat.find_by_name(key).ok_or_else(|| {
                    NiioError::read_failure(path, format!("numeric variable {} not decoded", key))
                })?;
                legacy_array(path, key, array.size(), array.data()).map(Some)
            }
        }
    }
}

fn legacy_array(
    path: &Path,
    key: &str,
    size: &[usize],
    data: &NumericData,
) -> Result<ArrayD<f64>> {
    macro_rules! real {
        ($real:expr, $imag:expr) => {{
            if $imag.is_some() {
                return Err(NiioError::unsupported_container(
                    path,
                    format!("complex MATLAB array {}", key),
                ));
            }
            $real.iter().map(|&v| v as f64).collect::<Vec<f64>>()
        }};
    }

    let values = match data {
        NumericData::Int8 { real, imag } => real!(real, imag),
        NumericData::UInt8 { real, imag } => real!(real, imag),
        NumericData::Int16 { real, imag } => real!(real, imag),
        NumericData::UInt16 { real, imag } => real!(real, imag),
        NumericData::Int32 { real, imag } => real!(real, imag),
        NumericData::UInt32 { real, imag } => real!(real, imag),
        NumericData::Int64 { real, imag } => real!(real, imag),
        NumericData::UInt64 { real, imag } => real!(real, imag),
        NumericData::Single { real, imag } => real!(real, imag),
        NumericData::Double { real, imag } => real!(real, imag),
    };

    // v5 payloads are column-major.
    ArrayD::from_shape_vec(IxDyn(size).f(), values).map_err(|e| {
        NiioError::read_failure(path, format!("array {} has invalid shape: {}", key, e))
    })
}
