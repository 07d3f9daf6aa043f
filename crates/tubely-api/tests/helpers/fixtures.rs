//! Upload payloads. Contents are never decoded, only their declared type matters.

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// `len` bytes starting with the PNG signature, followed by a repeating pattern.
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend((0..len.saturating_sub(PNG_SIGNATURE.len())).map(|i| (i % 251) as u8));
    data.truncate(len);
    data
}

pub fn fake_jpeg(len: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF];
    data.extend((0..len.saturating_sub(3)).map(|i| (i % 239) as u8));
    data.truncate(len);
    data
}

/// `len` bytes shaped like the start of an MP4 (`ftyp` box) followed by filler.
pub fn fake_mp4(len: usize) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypmp42");
    data.extend((0..len.saturating_sub(12)).map(|i| (i % 241) as u8));
    data.truncate(len);
    data
}

pub const RAW_BOUNDARY: &str = "tubely-test-boundary";

/// Hand-built single-part multipart body, for part headers a form builder would
/// normalize or refuse. `content_type` of `None` omits the part's Content-Type header.
pub fn raw_multipart(field: &str, content_type: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", RAW_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\n",
            field
        )
        .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", RAW_BOUNDARY).as_bytes());
    body
}

pub fn raw_multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", RAW_BOUNDARY)
}
