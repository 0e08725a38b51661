#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use chrono::{TimeZone, Utc};
use docgen_core::{Milestone, Project, ProjectDraft, TeamMember};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:styleId="Normal"/></w:styles>"#;
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR{{notatoken}}";

/// Wrap paragraphs in a `w:document`.
pub fn document_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{paragraphs}<w:sectPr/></w:body></w:document>"#
    )
}

pub fn header_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr xmlns:w="{W_NS}">{paragraphs}</w:hdr>"#
    )
}

pub fn footer_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:ftr xmlns:w="{W_NS}">{paragraphs}</w:ftr>"#
    )
}

/// A paragraph whose text is split into one run per fragment.
pub fn w_paragraph(fragments: &[&str]) -> String {
    let runs: String = fragments
        .iter()
        .map(|f| format!(r#"<w:r><w:rPr><w:lang w:val="ko-KR"/></w:rPr><w:t xml:space="preserve">{f}</w:t></w:r>"#))
        .collect();
    format!("<w:p>{runs}</w:p>")
}

pub fn slide_xml(root: &str, fragments: &[&str]) -> String {
    let runs: String = fragments
        .iter()
        .map(|f| format!(r#"<a:r><a:rPr lang="ko-KR" dirty="0"/><a:t>{f}</a:t></a:r>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:{root} xmlns:a="{A_NS}" xmlns:p="{P_NS}"><p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/><a:p>{runs}</a:p></p:txBody></p:sp></p:spTree></p:cSld></p:{root}>"#
    )
}

pub fn build_package(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Decompressed entries in archive order.
pub fn entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
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

/// Compressed payload and CRC of one entry, as stored.
pub fn raw_entry(data: &[u8], name: &str) -> (u32, Vec<u8>) {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    for i in 0..archive.len() {
        let mut file = archive.by_index_raw(i).unwrap();
        if file.name() == name {
            let crc = file.crc32();
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).unwrap();
            return (crc, buf);
        }
    }
    panic!("missing part {name}")
}

pub fn part_text(data: &[u8], name: &str) -> String {
    let (_, bytes) = entries(data)
        .into_iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("missing part {name}"));
    String::from_utf8(bytes).unwrap()
}

pub fn sample_project(name: &str) -> Project {
    let draft = ProjectDraft {
        name: name.to_string(),
        client: "Acme".to_string(),
        description: "Customer portal rebuild".to_string(),
        scope: "Web and mobile".to_string(),
        start_date: "2024-01-02".to_string(),
        end_date: "2024-06-30".to_string(),
        status: "active".to_string(),
        team: vec![TeamMember {
            name: "Kim".to_string(),
            role: "Lead".to_string(),
            responsibility: "Design".to_string(),
        }],
        milestones: vec![
            Milestone {
                name: "Kickoff".to_string(),
                date: "2024-01-02".to_string(),
                deliverables: "Plan".to_string(),
            },
            Milestone {
                name: "Launch".to_string(),
                date: "2024-06-30".to_string(),
                deliverables: "Release".to_string(),
            },
        ],
        ..Default::default()
    };
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Project::from_draft("project-1", draft, now)
}
