//! Fixture writers shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;

/// One variable of a MATLAB v5 file, data in column-major order.
pub struct MatVar<'a> {
    pub name: &'a str,
    pub dims: &'a [usize],
    pub data: &'a [f64],
}

fn pad8(buf: &mut Vec<u8>) {
    while buf.len() % 8 != 0 {
        buf.push(0);
    }
}

fn tag(buf: &mut Vec<u8>, data_type: u32, len: usize) {
    buf.extend_from_slice(&data_type.to_le_bytes());
    buf.extend_from_slice(&(len as u32).to_le_bytes());
}

/// One top-level element of a MATLAB v5 file.
pub enum MatElement<'a> {
    /// Real double matrix.
    Double(MatVar<'a>),
    /// Character row vector.
    Char { name: &'a str, text: &'a str },
    /// Real double matrix wrapped in a zlib-compressed element.
    Compressed(MatVar<'a>),
}

const MI_INT8: u32 = 1;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

fn matrix_element(class: u32, name: &str, dims: &[usize], data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();

    tag(&mut body, MI_UINT32, 8);
    body.extend_from_slice(&class.to_le_bytes());
    body.extend_from_slice(&0u32.to_le_bytes());

    tag(&mut body, MI_INT32, 4 * dims.len());
    for &d in dims {
        body.extend_from_slice(&(d as i32).to_le_bytes());
    }
    pad8(&mut body);

    tag(&mut body, MI_INT8, name.len());
    body.extend_from_slice(name.as_bytes());
    pad8(&mut body);

    tag(&mut body, data_type, data.len());
    body.extend_from_slice(data);
    pad8(&mut body);

    let mut out = Vec::new();
    tag(&mut out, MI_MATRIX, body.len());
    out.extend_from_slice(&body);
    out
}

fn double_element(var: &MatVar<'_>) -> Vec<u8> {
    const MX_DOUBLE_CLASS: u32 = 6;
    assert_eq!(var.dims.iter().product::<usize>(), var.data.len());
    let data: Vec<u8> = var.data.iter().flat_map(|v| v.to_le_bytes()).collect();
    matrix_element(MX_DOUBLE_CLASS, var.name, var.dims, MI_DOUBLE, &data)
}

/// Write a little-endian MATLAB v5 file holding the given elements in order.
pub fn write_mat_v5_elements(path: &Path, elements: &[MatElement<'_>]) {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    const MX_CHAR_CLASS: u32 = 4;

    let mut out = Vec::new();
    let mut text = b"MATLAB 5.0 MAT-file, Platform: niio tests, Created on: test".to_vec();
    text.resize(116, b' ');
    out.extend_from_slice(&text);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&0x0100u16.to_le_bytes());
    out.extend_from_slice(b"IM");

    for element in elements {
        match element {
            MatElement::Double(var) => out.extend(double_element(var)),
            MatElement::Char { name, text } => {
                let units: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
                let dims = [1, text.encode_utf16().count()];
                out.extend(matrix_element(MX_CHAR_CLASS, name, &dims, MI_UINT16, &units));
            }
            MatElement::Compressed(var) => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&double_element(var)).unwrap();
                let compressed = encoder.finish().unwrap();
                tag(&mut out, MI_COMPRESSED, compressed.len());
                out.extend_from_slice(&compressed);
            }
        }
    }

    std::fs::write(path, out).unwrap();
}

/// Write a little-endian MATLAB v5 file holding real double matrices.
pub fn write_mat_v5(path: &Path, vars: &[MatVar<'_>]) {
    let elements: Vec<MatElement<'_>> = vars
        .iter()
        .map(|v| {
            MatElement::Double(MatVar {
                name: v.name,
                dims: v.dims,
                data: v.data,
            })
        })
        .collect();
    write_mat_v5_elements(path, &elements);
}

/// One GIFTI data array written with ASCII encoding.
pub struct GiiArray<'a> {
    pub intent: &'a str,
    pub data_type: &'a str,
    pub dims: &'a [usize],
    pub values: &'a [f64],
}

impl<'a> GiiArray<'a> {
    pub fn floats(dims: &'a [usize], values: &'a [f64]) -> Self {
        Self {
            intent: "NIFTI_INTENT_NONE",
            data_type: "NIFTI_TYPE_FLOAT32",
            dims,
            values,
        }
    }

    pub fn points(dims: &'a [usize], values: &'a [f64]) -> Self {
        Self {
            intent: "NIFTI_INTENT_POINTSET",
            ..Self::floats(dims, values)
        }
    }

    pub fn triangles(dims: &'a [usize], values: &'a [f64]) -> Self {
        Self {
            intent: "NIFTI_INTENT_TRIANGLE",
            data_type: "NIFTI_TYPE_INT32",
            dims,
            values,
        }
    }
}

/// Write a GIFTI file with row-major ASCII data arrays.
pub fn write_gifti(path: &Path, arrays: &[GiiArray<'_>]) {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<GIFTI Version=\"1.0\" NumberOfDataArrays=\"{}\">\n  <MetaData/>\n  <LabelTable/>\n",
        arrays.len()
    ));
    for array in arrays {
        let dims: String = array
            .dims
            .iter()
            .enumerate()
            .map(|(i, d)| format!(" Dim{}=\"{}\"", i, d))
            .collect();
        let values: Vec<String> = array.values.iter().map(|v| v.to_string()).collect();
        xml.push_str(&format!(
            "  <DataArray Intent=\"{}\" DataType=\"{}\" ArrayIndexingOrder=\"RowMajorOrder\" \
             Dimensionality=\"{}\"{} Encoding=\"ASCII\" Endian=\"LittleEndian\" \
             ExternalFileName=\"\" ExternalFileOffset=\"\">\n    <MetaData/>\n    <Data>{}</Data>\n  </DataArray>\n",
            array.intent,
            array.data_type,
            array.dims.len(),
            dims,
            values.join(" ")
        ));
    }
    xml.push_str("</GIFTI>\n");
    std::fs::write(path, xml).unwrap();
}

/// Write a FreeSurfer triangle surface (big-endian binary).
pub fn write_freesurfer_surf(path: &Path, vertices: &[[f32; 3]], faces: &[[i32; 3]]) {
    let mut out = vec![0xFF, 0xFF, 0xFE];
    out.extend_from_slice(b"created by niio tests on today\n\n");
    out.extend_from_slice(&(vertices.len() as i32).to_be_bytes());
    out.extend_from_slice(&(faces.len() as i32).to_be_bytes());
    for v in vertices.iter().flatten() {
        out.extend_from_slice(&v.to_be_bytes());
    }
    for f in faces.iter().flatten() {
        out.extend_from_slice(&f.to_be_bytes());
    }
    std::fs::write(path, out).unwrap();
}

/// Write a single-file NIfTI-1 float32 volume, data in column-major order.
pub fn write_nifti(path: &Path, dims: &[u16], data: &[f32]) {
    write_nifti_scaled(path, dims, data, 1.0, 0.0);
}

/// Like [`write_nifti`], with explicit `scl_slope` and `scl_inter`.
pub fn write_nifti_scaled(path: &Path, dims: &[u16], data: &[f32], slope: f32, inter: f32) {
    assert!(dims.len() <= 7);
    assert_eq!(dims.iter().map(|&d| d as usize).product::<usize>(), data.len());

    let mut header = vec![0u8; 352];
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = dims.len() as i16;
    for (i, &d) in dims.iter().enumerate() {
        dim[i + 1] = d as i16;
    }
    for (i, d) in dim.iter().enumerate() {
        header[40 + 2 * i..42 + 2 * i].copy_from_slice(&d.to_le_bytes());
    }

    header[70..72].copy_from_slice(&16i16.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());
    for i in 0..8 {
        header[76 + 4 * i..80 + 4 * i].copy_from_slice(&1.0f32.to_le_bytes());
    }
    header[108..112].copy_from_slice(&352.0f32.to_le_bytes());
    header[112..116].copy_from_slice(&slope.to_le_bytes());
    header[116..120].copy_from_slice(&inter.to_le_bytes());
    header[344..348].copy_from_slice(b"n+1\0");

    for v in data {
        header.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, header).unwrap();
}

/// Encode a single-file little-endian NIfTI-2 float64 volume, data in
/// column-major order.
pub fn nifti2_bytes(dims: &[i64], data: &[f64], slope: f64, inter: f64) -> Vec<u8> {
    assert!(dims.len() <= 7);
    assert_eq!(dims.iter().product::<i64>() as usize, data.len());

    let mut out = vec![0u8; 544];
    out[0..4].copy_from_slice(&540i32.to_le_bytes());
    out[4..12].copy_from_slice(b"n+2\0\r\n\x1a\n");
    out[12..14].copy_from_slice(&64i16.to_le_bytes());
    out[14..16].copy_from_slice(&64i16.to_le_bytes());
    let mut dim = [1i64; 8];
    dim[0] = dims.len() as i64;
    dim[1..=dims.len()].copy_from_slice(dims);
    for (i, d) in dim.iter().enumerate() {
        out[16 + 8 * i..24 + 8 * i].copy_from_slice(&d.to_le_bytes());
    }
    for i in 0..8 {
        out[104 + 8 * i..112 + 8 * i].copy_from_slice(&1.0f64.to_le_bytes());
    }
    out[168..176].copy_from_slice(&544i64.to_le_bytes());
    out[176..184].copy_from_slice(&slope.to_le_bytes());
    out[184..192].copy_from_slice(&inter.to_le_bytes());

    for v in data {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Gzip `bytes`, as for a `.nii.gz` file.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}
