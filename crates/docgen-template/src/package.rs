use std::io::{Cursor, Read, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::dialect::Dialect;
use crate::error::TemplateError;

const BOM: &str = "\u{feff}";

/// A template package opened for reading.
///
/// Opening checks that the package is a readable zip and holds the parts
/// its format cannot do without (`word/document.xml`, or at least one slide).
pub struct OoxmlPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    dialect: Dialect,
}

impl<'a> OoxmlPackage<'a> {
    pub fn open(data: &'a [u8], dialect: Dialect) -> Result<Self, TemplateError> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        dialect.check_required_parts(archive.file_names())?;
        Ok(Self { archive, dialect })
    }

    /// Name and text of every part this package's dialect rewrites, in
    /// archive order.
    pub fn read_parts(&mut self) -> Result<Vec<(String, String)>, TemplateError> {
        let mut parts = Vec::new();
        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i)?;
            if file.is_dir() || !self.dialect.is_rewritable_part(file.name()) {
                continue;
            }
            let name = file.name().to_string();
            let (_, xml) = read_text(&mut file, &name)?;
            parts.push((name, xml));
        }
        Ok(parts)
    }

    /// Build a new package, letting `rewrite` replace the text of rewritable
    /// parts.
    ///
    /// `rewrite` receives the part name and its text (without a byte order
    /// mark) and returns `Some(new_text)` to replace it. Every other entry,
    /// and every part left as `None`, is copied with its compressed bytes
    /// untouched.
    pub fn rewrite<F>(mut self, mut rewrite: F) -> Result<RewrittenPackage, TemplateError>
    where
        F: FnMut(&str, &str) -> Result<Option<String>, TemplateError>,
    {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut rewritten = Vec::new();

        for i in 0..self.archive.len() {
            let replacement = {
                let mut file = self.archive.by_index(i)?;
                if file.is_dir() || !self.dialect.is_rewritable_part(file.name()) {
                    None
                } else {
                    let name = file.name().to_string();
                    let method = file.compression();
                    let modified = file.last_modified();
                    let (bom, xml) = read_text(&mut file, &name)?;
                    rewrite(&name, &xml)?.map(|new_xml| {
                        let text = if bom { format!("{BOM}{new_xml}") } else { new_xml };
                        (name, method, modified, text)
                    })
                }
            };

            match replacement {
                Some((name, method, modified, text)) => {
                    let method = match method {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    let mut options = SimpleFileOptions::default().compression_method(method);
                    if let Some(modified) = modified {
                        options = options.last_modified_time(modified);
                    }
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(text.as_bytes())?;
                    debug!("Rewrote part {}", name);
                    rewritten.push(name);
                }
                None => {
                    writer.raw_copy_file(self.archive.by_index_raw(i)?)?;
                }
            }
        }

        Ok(RewrittenPackage { writer, rewritten })
    }
}

/// A package whose entries have all been written but not yet finalized.
pub struct RewrittenPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    rewritten: Vec<String>,
}

impl RewrittenPackage {
    /// Parts whose content changed.
    pub fn rewritten_parts(&self) -> &[String] {
        &self.rewritten
    }

    /// Write the central directory and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>, TemplateError> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Read a part as UTF-8 text, reporting and stripping a leading byte order mark.
fn read_text(file: &mut impl Read, name: &str) -> Result<(bool, String), TemplateError> {
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    let mut text = String::from_utf8(buf).map_err(|_| TemplateError::Encoding {
        part: name.to_string(),
    })?;
    let bom = text.starts_with(BOM);
    if bom {
        text.replace_range(..BOM.len(), "");
    }
    Ok((bom, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build_package(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, bytes) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).unwrap();
                (file.name().to_string(), buf)
            })
            .collect()
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let err = OoxmlPackage::open(b"not a zip", Dialect::Wordprocessing).err().unwrap();
        assert!(matches!(err, TemplateError::Zip(_)));
    }

    #[test]
    fn test_open_requires_body() {
        let data = build_package(&[("word/styles.xml", b"<styles/>")]);
        let err = OoxmlPackage::open(&data, Dialect::Wordprocessing).err().unwrap();
        assert!(matches!(err, TemplateError::MissingPart(_)));
    }

    #[test]
    fn test_read_parts_selects_text_parts() {
        let data = build_package(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("word/document.xml", b"<doc/>"),
            ("word/header1.xml", b"\xEF\xBB\xBF<hdr/>"),
            ("word/media/image1.png", b"\x89PNG"),
        ]);
        let mut package = OoxmlPackage::open(&data, Dialect::Wordprocessing).unwrap();
        let parts = package.read_parts().unwrap();
        assert_eq!(
            parts,
            vec![
                ("word/document.xml".to_string(), "<doc/>".to_string()),
                ("word/header1.xml".to_string(), "<hdr/>".to_string()),
            ]
        );
    }

    #[test]
    fn test_rewrite_replaces_only_selected_parts() {
        let data = build_package(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("word/document.xml", b"<doc>old</doc>"),
            ("word/footer1.xml", b"\xEF\xBB\xBF<ftr>old</ftr>"),
            ("word/styles.xml", b"<styles>old</styles>"),
        ]);
        let package = OoxmlPackage::open(&data, Dialect::Wordprocessing).unwrap();
        let rewritten = package
            .rewrite(|name, xml| {
                Ok((name == "word/footer1.xml").then(|| xml.replace("old", "new")))
            })
            .unwrap();
        assert_eq!(rewritten.rewritten_parts(), ["word/footer1.xml".to_string()]);

        let out = entries(&rewritten.finish().unwrap());
        assert_eq!(
            out,
            vec![
                ("[Content_Types].xml".to_string(), b"<Types/>".to_vec()),
                ("word/document.xml".to_string(), b"<doc>old</doc>".to_vec()),
                (
                    "word/footer1.xml".to_string(),
                    b"\xEF\xBB\xBF<ftr>new</ftr>".to_vec()
                ),
                ("word/styles.xml".to_string(), b"<styles>old</styles>".to_vec()),
            ]
        );
    }

    #[test]
    fn test_rewrite_keeps_entry_timestamp() {
        let modified = zip::DateTime::from_date_and_time(2021, 3, 14, 9, 26, 52).unwrap();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().last_modified_time(modified);
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(b"<doc>old</doc>").unwrap();
        let data = zip.finish().unwrap().into_inner();

        let package = OoxmlPackage::open(&data, Dialect::Wordprocessing).unwrap();
        let out = package
            .rewrite(|_, xml| Ok(Some(xml.replace("old", "new"))))
            .unwrap()
            .finish()
            .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(out.as_slice())).unwrap();
        let file = archive.by_name("word/document.xml").unwrap();
        assert_eq!(file.last_modified(), Some(modified));
    }

    #[test]
    fn test_rewrite_propagates_callback_errors() {
        let data = build_package(&[("word/document.xml", b"<doc/>")]);
        let package = OoxmlPackage::open(&data, Dialect::Wordprocessing).unwrap();
        let result = package.rewrite(|name, _| Err(TemplateError::MissingPart(name.to_string())));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_utf8_part_is_rejected() {
        let data = build_package(&[("word/document.xml", b"\xFF\xFE<\x00d\x00/\x00>\x00")]);
        let mut package = OoxmlPackage::open(&data, Dialect::Wordprocessing).unwrap();
        let err = package.read_parts().unwrap_err();
        assert!(matches!(err, TemplateError::Encoding { .. }));
    }
}
