//! GIFTI surface-data files.
//!
//! A GIFTI file is XML holding a list of `DataArray` elements, each carrying
//! its dimensions, element type, byte order and encoding as attributes and the
//! payload in a `Data` child.
//!
//! ```xml
//! <GIFTI Version="1.0" NumberOfDataArrays="1">
//!   <DataArray Intent="NIFTI_INTENT_POINTSET" DataType="NIFTI_TYPE_FLOAT32"
//!              ArrayIndexingOrder="RowMajorOrder" Dimensionality="2"
//!              Dim0="2" Dim1="3" Encoding="ASCII" Endian="LittleEndian">
//!     <Data>0 0 0 1 0 0</Data>
//!   </DataArray>
//! </GIFTI>
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::ZlibDecoder;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while decoding a GIFTI document.
#[derive(Debug, Error)]
pub enum GiftiError {
    /// XML syntax error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Base64 payload could not be decoded.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// IO error while inflating or reading an external file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid document.
    #[error("{0}")]
    Invalid(String),
}

type GiftiResult<T> = std::result::Result<T, GiftiError>;

fn invalid(message: impl Into<String>) -> GiftiError {
    GiftiError::Invalid(message.into())
}

/// Element type of a data array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `NIFTI_TYPE_UINT8`
    UInt8,
    /// `NIFTI_TYPE_INT8`
    Int8,
    /// `NIFTI_TYPE_INT16`
    Int16,
    /// `NIFTI_TYPE_UINT16`
    UInt16,
    /// `NIFTI_TYPE_INT32`
    Int32,
    /// `NIFTI_TYPE_UINT32`
    UInt32,
    /// `NIFTI_TYPE_INT64`
    Int64,
    /// `NIFTI_TYPE_FLOAT32`
    Float32,
    /// `NIFTI_TYPE_FLOAT64`
    Float64,
}

impl DataType {
    fn parse(value: &str) -> GiftiResult<Self> {
        match value {
            "NIFTI_TYPE_UINT8" => Ok(Self::UInt8),
            "NIFTI_TYPE_INT8" => Ok(Self::Int8),
            "NIFTI_TYPE_INT16" => Ok(Self::Int16),
            "NIFTI_TYPE_UINT16" => Ok(Self::UInt16),
            "NIFTI_TYPE_INT32" => Ok(Self::Int32),
            "NIFTI_TYPE_UINT32" => Ok(Self::UInt32),
            "NIFTI_TYPE_INT64" => Ok(Self::Int64),
            "NIFTI_TYPE_FLOAT32" => Ok(Self::Float32),
            "NIFTI_TYPE_FLOAT64" => Ok(Self::Float64),
            other => Err(invalid(format!("unsupported DataType {}", other))),
        }
    }

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::UInt8 | Self::Int8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Check if the element type is a floating point type.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Base64,
    GzipBase64,
    External,
}

impl Encoding {
    fn parse(value: &str) -> GiftiResult<Self> {
        match value {
            "ASCII" => Ok(Self::Ascii),
            "Base64Binary" => Ok(Self::Base64),
            "GZipBase64Binary" => Ok(Self::GzipBase64),
            "ExternalFileBinary" => Ok(Self::External),
            other => Err(invalid(format!("unsupported Encoding {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// Decoded element values. Integers widen to `i64`, floats to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// Values of any integer element type.
    Int(Vec<i64>),
    /// Values of any floating point element type.
    Float(Vec<f64>),
}

impl Values {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
        }
    }

    /// Check if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One `DataArray` element of a GIFTI file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    /// NIfTI intent code name, e.g. `NIFTI_INTENT_POINTSET`.
    pub intent: String,
    /// Element type on disk.
    pub data_type: DataType,
    /// Dimensions, `Dim0` first.
    pub dims: Vec<usize>,
    /// Whether the payload is stored column-major.
    pub column_major: bool,
    /// Name/value pairs of the array's `MetaData`.
    pub metadata: Vec<(String, String)>,
    /// The decoded payload, in storage order.
    pub values: Values,
}

impl DataArray {
    /// Materialize the payload as an `f64` array with the declared dimensions.
    pub fn to_f64(&self) -> GiftiResult<ArrayD<f64>> {
        let values = match &self.values {
            Values::Int(v) => v.iter().map(|&x| x as f64).collect(),
            Values::Float(v) => v.clone(),
        };
        self.shaped(values)
    }

    /// Materialize an integer payload as `i32`.
    ///
    /// Floating point payloads and values outside `i32` are rejected.
    pub fn to_i32(&self) -> GiftiResult<ArrayD<i32>> {
        match &self.values {
            Values::Int(v) => {
                let values = v
                    .iter()
                    .map(|&x| {
                        i32::try_from(x)
                            .map_err(|_| invalid(format!("value {} does not fit in i32", x)))
                    })
                    .collect::<GiftiResult<Vec<i32>>>()?;
                self.shaped(values)
            }
            Values::Float(_) => Err(invalid(format!(
                "{:?} array does not hold integers",
                self.data_type
            ))),
        }
    }

    /// Look up a metadata value by name.
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn shaped<T>(&self, values: Vec<T>) -> GiftiResult<ArrayD<T>> {
        let shape = IxDyn(&self.dims).set_f(self.column_major);
        ArrayD::from_shape_vec(shape, values)
            .map_err(|e| invalid(format!("dims {:?}: {}", self.dims, e)))
    }
}

/// A parsed GIFTI image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftiImage {
    /// `Version` attribute of the root element.
    pub version: String,
    /// Name/value pairs of the file-level `MetaData`.
    pub metadata: Vec<(String, String)>,
    /// Data arrays in file order.
    pub darrays: Vec<DataArray>,
}

impl GiftiImage {
    /// Read and parse a GIFTI file.
    ///
    /// External payload files are resolved relative to the GIFTI file.
    pub fn read(path: &Path) -> GiftiResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml, path.parent())
    }

    /// Parse a GIFTI document.
    pub fn parse(xml: &str, base_dir: Option<&Path>) -> GiftiResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut image = GiftiImage::default();
        let mut seen_root = false;
        let mut header: Option<ArrayHeader> = None;
        let mut array_meta: Vec<(String, String)> = Vec::new();
        let mut data_text: Option<String> = None;
        let mut md_name = String::new();
        let mut md_value = String::new();
        let mut text = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    match e.name().as_ref() {
                        b"GIFTI" => {
                            seen_root = true;
                            image.version = attribute(e, "Version")?.unwrap_or_default();
                        }
                        b"DataArray" => {
                            header = Some(ArrayHeader::from_element(e)?);
                            array_meta.clear();
                            data_text = None;
                        }
                        _ => {}
                    }
                    text.clear();
                }
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"DataArray" => {
                        return Err(invalid("DataArray element without Data"));
                    }
                    b"Data" => data_text = Some(String::new()),
                    b"Value" => md_value.clear(),
                    _ => {}
                },
                Event::Text(ref t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::End(ref e) => {
                    match e.name().as_ref() {
                        b"Name" => md_name = std::mem::take(&mut text),
                        b"Value" => md_value = std::mem::take(&mut text),
                        b"MD" => {
                            let pair = (std::mem::take(&mut md_name), std::mem::take(&mut md_value));
                            if header.is_some() {
                                array_meta.push(pair);
                            } else {
                                image.metadata.push(pair);
                            }
                        }
                        b"Data" => data_text = Some(std::mem::take(&mut text)),
                        b"DataArray" => {
                            let h = header
                                .take()
                                .ok_or_else(|| invalid("unbalanced DataArray element"))?;
                            let payload = data_text
                                .take()
                                .ok_or_else(|| invalid("DataArray element without Data"))?;
                            let values = h.decode(&payload, base_dir)?;
                            image.darrays.push(DataArray {
                                intent: h.intent,
                                data_type: h.data_type,
                                dims: h.dims,
                                column_major: h.column_major,
                                metadata: std::mem::take(&mut array_meta),
                                values,
                            });
                        }
                        _ => {}
                    }
                    text.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(invalid("missing GIFTI root element"));
        }
        Ok(image)
    }
}

#[derive(Debug)]
struct ArrayHeader {
    intent: String,
    data_type: DataType,
    dims: Vec<usize>,
    column_major: bool,
    encoding: Encoding,
    endian: Endian,
    external_file: Option<String>,
    external_offset: u64,
}

impl ArrayHeader {
    fn from_element(e: &BytesStart<'_>) -> GiftiResult<Self> {
        let required = |name: &str| -> GiftiResult<String> {
            attribute(e, name)?.ok_or_else(|| invalid(format!("DataArray missing {}", name)))
        };

        let dimensionality: usize = parse_number(&required("Dimensionality")?, "Dimensionality")?;
        let dims = (0..dimensionality)
            .map(|i| {
                let name = format!("Dim{}", i);
                parse_number(&required(&name)?, &name)
            })
            .collect::<GiftiResult<Vec<usize>>>()?;

        let column_major = match attribute(e, "ArrayIndexingOrder")?.as_deref() {
            None | Some("RowMajorOrder") => false,
            Some("ColumnMajorOrder") => true,
            Some(other) => {
                return Err(invalid(format!("unsupported ArrayIndexingOrder {}", other)))
            }
        };

        let endian = match attribute(e, "Endian")?.as_deref() {
            None | Some("LittleEndian") => Endian::Little,
            Some("BigEndian") => Endian::Big,
            Some(other) => return Err(invalid(format!("unsupported Endian {}", other))),
        };

        let external_offset = match attribute(e, "ExternalFileOffset")? {
            Some(s) if !s.trim().is_empty() => parse_number(&s, "ExternalFileOffset")?,
            _ => 0,
        };

        Ok(Self {
            intent: attribute(e, "Intent")?.unwrap_or_else(|| "NIFTI_INTENT_NONE".to_string()),
            data_type: DataType::parse(&required("DataType")?)?,
            dims,
            column_major,
            encoding: Encoding::parse(&required("Encoding")?)?,
            endian,
            external_file: attribute(e, "ExternalFileName")?.filter(|s| !s.trim().is_empty()),
            external_offset,
        })
    }

    fn element_count(&self) -> usize {
        self.dims.iter().product()
    }

    fn decode(&self, payload: &str, base_dir: Option<&Path>) -> GiftiResult<Values> {
        let values = match self.encoding {
            Encoding::Ascii => self.decode_ascii(payload)?,
            Encoding::Base64 => self.decode_binary(&base64_bytes(payload)?)?,
            Encoding::GzipBase64 => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(base64_bytes(payload)?.as_slice()).read_to_end(&mut inflated)?;
                self.decode_binary(&inflated)?
            }
            Encoding::External => self.decode_binary(&self.read_external(base_dir)?)?,
        };

        if values.len() != self.element_count() {
            return Err(invalid(format!(
                "DataArray has {} values but dims {:?} need {}",
                values.len(),
                self.dims,
                self.element_count()
            )));
        }
        Ok(values)
    }

    fn decode_ascii(&self, payload: &str) -> GiftiResult<Values> {
        let tokens = payload.split_whitespace();
        if self.data_type.is_float() {
            tokens
                .map(|t| parse_number::<f64>(t, "ASCII value"))
                .collect::<GiftiResult<_>>()
                .map(Values::Float)
        } else {
            tokens
                .map(|t| parse_number::<i64>(t, "ASCII value"))
                .collect::<GiftiResult<_>>()
                .map(Values::Int)
        }
    }

    fn decode_binary(&self, bytes: &[u8]) -> GiftiResult<Values> {
        let size = self.data_type.size();
        if bytes.len() % size != 0 {
            return Err(invalid(format!(
                "payload of {} bytes is not a multiple of element size {}",
                bytes.len(),
                size
            )));
        }
        let big = self.endian == Endian::Big;

        macro_rules! convert {
            ($ty:ty, $variant:ident, $target:ty) => {
                Values::$variant(
                    bytes
                        .chunks_exact(size)
                        .map(|chunk| {
                            let mut raw = [0u8; std::mem::size_of::<$ty>()];
                            raw.copy_from_slice(chunk);
                            let value = if big {
                                <$ty>::from_be_bytes(raw)
                            } else {
                                <$ty>::from_le_bytes(raw)
                            };
                            value as $target
                        })
                        .collect(),
                )
            };
        }

        Ok(match self.data_type {
            DataType::UInt8 => convert!(u8, Int, i64),
            DataType::Int8 => convert!(i8, Int, i64),
            DataType::Int16 => convert!(i16, Int, i64),
            DataType::UInt16 => convert!(u16, Int, i64),
            DataType::Int32 => convert!(i32, Int, i64),
            DataType::UInt32 => convert!(u32, Int, i64),
            DataType::Int64 => convert!(i64, Int, i64),
            DataType::Float32 => convert!(f32, Float, f64),
            DataType::Float64 => convert!(f64, Float, f64),
        })
    }

    fn read_external(&self, base_dir: Option<&Path>) -> GiftiResult<Vec<u8>> {
        let name = self
            .external_file
            .as_deref()
            .ok_or_else(|| invalid("ExternalFileBinary without ExternalFileName"))?;
        let path = match base_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };

        let mut file = std::fs::File::open(&path)?;
        file.seek(SeekFrom::Start(self.external_offset))?;
        let mut bytes = vec![0u8; self.element_count() * self.data_type.size()];
        file.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> GiftiResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.trim().to_string()));
        }
    }
    Ok(None)
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> GiftiResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("invalid {}: {:?}", what, value)))
}

fn base64_bytes(payload: &str) -> GiftiResult<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(BASE64.decode(compact)?)
}
