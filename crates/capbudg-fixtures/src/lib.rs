//! In-memory XLSX workbooks for the capbudg test suites.
//!
//! Sheets are written with inline strings only, so no shared-string or
//! style parts are needed.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A fixture cell
pub enum V {
    S(&'static str),
    N(f64),
    E,
}

fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn sheet_xml(rows: &[Vec<V>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let at = format!("{}{}", column_name(c), r + 1);
            match cell {
                V::S(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    at,
                    escape(s)
                )),
                V::N(n) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, at, n)),
                V::E => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Build an XLSX workbook with the given sheets
pub fn build_xlsx(sheets: &[(&str, Vec<Vec<V>>)]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut overrides = String::new();
    let mut sheet_entries = String::new();
    let mut rels = String::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape(name)
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  {overrides}
</Types>"#).as_bytes()).unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#).unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>{sheet_entries}</sheets>
</workbook>"#).as_bytes()).unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  {rels}
</Relationships>"#).as_bytes()).unwrap();

    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(sheet_xml(rows).as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

/// A small capital-budgeting worksheet
pub fn capbudg_rows() -> Vec<Vec<V>> {
    use V::*;
    vec![
        vec![S("INITIAL INVESTMENT")],
        vec![S("Initial Investment="), N(100000.0), E, N(0.0), N(50000.0)],
        vec![S("Opportunity cost (if any)="), N(0.0)],
        vec![S("Lifetime of the investment"), N(10.0)],
        vec![],
        vec![S("CASHFLOW DETAILS")],
        vec![S("Revenues in year 1="), N(100000.0)],
        vec![S("Var. Expenses as % of Rev="), S("50%")],
        vec![],
        vec![S("DISCOUNT RATE")],
        vec![S("Approach(1: Direct Input; 2: CAPM)"), N(1.0)],
        vec![S("Discount Rate="), S("n/a"), S("10%")],
        vec![],
        vec![S("WORKING CAPITAL")],
        vec![S("Initial Investment in Work. Cap="), N(10000.0)],
        vec![S("Working Capital as % of Rev="), N(0.25)],
        vec![S("OPERATING CASHFLOWS")],
        vec![S("Year"), S("Year 1"), S("Year 2"), S("Year 3")],
        vec![S("Revenues"), N(100000.0), N(110000.0), N(121000.0)],
        vec![S("Labels"), S("high"), S("medium")],
    ]
}

/// Write the standard fixture workbook into `dir`
pub fn write_capbudg(dir: &Path) -> PathBuf {
    let path = dir.join("capbudg.xlsx");
    let bytes = build_xlsx(&[("CapBudgWS", capbudg_rows())]);
    std::fs::write(&path, bytes).unwrap();
    path
}
