//! `multipart/form-data` encoding for the spreadsheet import.
//!
//! The body is produced as plain bytes so it fits the host-does-IO request
//! model: the transport forwards it untouched, with the content-type header
//! returned by `MultipartForm::content_type`.

use uuid::Uuid;

/// Incrementally built multipart form.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("horarios-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Header value announcing this form's boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            escape_quoted(name),
            escape_quoted(filename)
        ));
        self.push_line(&format!("Content-Type: {content_type}"));
        self.push_line("");
        self.body.extend_from_slice(bytes);
        self.push_line("");
        self
    }

    /// Close the form and return the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        let closing = format!("--{}--\r\n", self.boundary);
        self.body.extend_from_slice(closing.as_bytes());
        self.body
    }

    fn open_part(&mut self) {
        let line = format!("--{}", self.boundary);
        self.push_line(&line);
    }

    fn push_line(&mut self, line: &str) {
        self.body.extend_from_slice(line.as_bytes());
        self.body.extend_from_slice(b"\r\n");
    }
}

/// Content type for a spreadsheet file, chosen by extension.
pub fn spreadsheet_content_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_file_part() {
        let body = MultipartForm::with_boundary("XYZ")
            .file("file", "horarios.xlsx", "application/octet-stream", b"\x00\x01data")
            .finish();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"--XYZ\r\n");
        expected.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"horarios.xlsx\"\r\n",
        );
        expected.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        expected.extend_from_slice(b"\x00\x01data\r\n");
        expected.extend_from_slice(b"--XYZ--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn parts_share_announced_boundary() {
        let form = MultipartForm::with_boundary("B");
        assert_eq!(form.content_type(), "multipart/form-data; boundary=B");
        let body = String::from_utf8(
            form.file("file", "a.xls", "application/vnd.ms-excel", b"x")
                .file("file", "b.xls", "application/vnd.ms-excel", b"y")
                .finish(),
        )
        .unwrap();
        assert_eq!(body.matches("--B\r\n").count(), 2);
        assert!(body.contains("filename=\"b.xls\"\r\nContent-Type: application/vnd.ms-excel\r\n\r\ny\r\n"));
        assert!(body.ends_with("--B--\r\n"));
    }

    #[test]
    fn generated_boundaries_differ() {
        assert_ne!(MultipartForm::new().boundary(), MultipartForm::new().boundary());
    }

    #[test]
    fn quotes_in_filename_are_escaped() {
        let body = MultipartForm::with_boundary("B")
            .file("file", "mi \"plan\".xlsx", "application/octet-stream", b"")
            .finish();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("filename=\"mi \\\"plan\\\".xlsx\""));
    }

    #[test]
    fn spreadsheet_types_by_extension() {
        assert_eq!(
            spreadsheet_content_type("Horarios.XLSX"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(spreadsheet_content_type("viejo.xls"), "application/vnd.ms-excel");
        assert_eq!(spreadsheet_content_type("datos.csv"), "application/octet-stream");
    }
}
