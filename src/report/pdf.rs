//! PDF Report Generator Module
//! Writes the analysis report as a paginated A4 PDF.
//!
//! Uses direct PDF object generation with the standard Helvetica fonts, which
//! every viewer provides, so nothing needs embedding.

use super::{ExportError, Report};
use std::fmt::Write as _;
use std::path::Path;

/// A4 in points
const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const MARGIN: f64 = 72.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f64 = 18.0;
const TITLE_LEADING: f64 = 22.0;
const HEADING_SIZE: f64 = 14.0;
const HEADING_LEADING: f64 = 17.0;
const BODY_SIZE: f64 = 10.0;
const BODY_LEADING: f64 = 12.0;

const TABLE_COL_WIDTHS: [f64; 2] = [200.0, 150.0];
const TABLE_HEADER_SIZE: f64 = 11.0;
const TABLE_HEADER_HEIGHT: f64 = 28.0;
const TABLE_ROW_HEIGHT: f64 = 18.0;
const CELL_PADDING: f64 = 6.0;

type Rgb = (f64, f64, f64);
const BLACK: Rgb = (0.0, 0.0, 0.0);
const GREY: Rgb = (0.5, 0.5, 0.5);
const WHITESMOKE: Rgb = (0.96, 0.96, 0.96);
const BEIGE: Rgb = (0.96, 0.96, 0.86);

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

fn char_width(c: char, font: Font) -> f64 {
    let base = match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 32] as f64,
        '•' => 350.0,
        _ => 556.0,
    };
    // Helvetica-Bold runs about 6% wider.
    match font {
        Font::Regular => base,
        Font::Bold => base * 1.06,
    }
}

fn text_width(text: &str, font: Font, size: f64) -> f64 {
    text.chars().map(|c| char_width(c, font)).sum::<f64>() * size / 1000.0
}

/// WinAnsiEncoding code for characters outside printable ASCII.
fn win_ansi_code(c: char) -> Option<u8> {
    match c {
        '€' => Some(0x80),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        _ => None,
    }
}

/// Body of a PDF literal string: escapes delimiters, octal for non-ASCII.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            _ => match win_ansi_code(c) {
                Some(code) => {
                    let _ = write!(out, "\\{:03o}", code);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// Greedy word wrap. Words wider than the line are kept whole.
fn wrap_text(text: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || text_width(&candidate, font, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Top-down flow layout over A4 pages. `y` is the top of the free area.
struct PageFlow {
    pages: Vec<String>,
    current: String,
    y: f64,
}

impl PageFlow {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Break the page unless `height` still fits above the bottom margin.
    fn ensure(&mut self, height: f64) {
        if self.y - height < MARGIN && !self.current.is_empty() {
            self.new_page();
        }
    }

    fn space(&mut self, height: f64) {
        self.y -= height;
    }

    fn text(&mut self, font: Font, size: f64, x: f64, baseline: f64, text: &str, color: Rgb) {
        let _ = write!(
            self.current,
            "BT\n/{} {:.1} Tf\n{:.2} {:.2} {:.2} rg\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            font.resource(),
            size,
            color.0,
            color.1,
            color.2,
            x,
            baseline,
            encode_text(text)
        );
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let _ = write!(
            self.current,
            "{:.2} {:.2} {:.2} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\n",
            color.0, color.1, color.2, x, y, w, h
        );
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let _ = write!(
            self.current,
            "0 0 0 RG\n1 w\n{:.2} {:.2} {:.2} {:.2} re\nS\n",
            x, y, w, h
        );
    }

    /// One line of text at the left margin (plus `indent`), advancing by `leading`.
    fn line(&mut self, font: Font, size: f64, leading: f64, indent: f64, text: &str) {
        self.ensure(leading);
        let baseline = self.y - size;
        self.text(font, size, MARGIN + indent, baseline, text, BLACK);
        self.y -= leading;
    }

    fn title(&mut self, text: &str) {
        for line in wrap_text(text, Font::Bold, TITLE_SIZE, CONTENT_WIDTH) {
            self.ensure(TITLE_LEADING);
            let x = (PAGE_WIDTH - text_width(&line, Font::Bold, TITLE_SIZE)) / 2.0;
            let baseline = self.y - TITLE_SIZE;
            self.text(Font::Bold, TITLE_SIZE, x, baseline, &line, BLACK);
            self.y -= TITLE_LEADING;
        }
        self.space(6.0);
    }

    fn heading(&mut self, text: &str) {
        self.space(12.0);
        // Keep the heading with at least one body line.
        self.ensure(HEADING_LEADING + BODY_LEADING);
        self.line(Font::Bold, HEADING_SIZE, HEADING_LEADING, 0.0, text);
        self.space(6.0);
    }

    /// "Label: value" lines with a bold label; the value wraps under itself.
    fn labelled(&mut self, label: &str, value: &str) {
        let label_width = text_width(label, Font::Bold, BODY_SIZE) + text_width(" ", Font::Regular, BODY_SIZE);
        let lines = wrap_text(value, Font::Regular, BODY_SIZE, CONTENT_WIDTH - label_width);

        for (i, line) in lines.iter().enumerate() {
            self.ensure(BODY_LEADING);
            let baseline = self.y - BODY_SIZE;
            if i == 0 {
                self.text(Font::Bold, BODY_SIZE, MARGIN, baseline, label, BLACK);
            }
            self.text(Font::Regular, BODY_SIZE, MARGIN + label_width, baseline, line, BLACK);
            self.y -= BODY_LEADING;
        }
    }

    fn bullet(&mut self, text: &str) {
        let marker = "• ";
        let indent = text_width(marker, Font::Regular, BODY_SIZE);
        let lines = wrap_text(text, Font::Regular, BODY_SIZE, CONTENT_WIDTH - indent);

        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.line(Font::Regular, BODY_SIZE, BODY_LEADING, 0.0, &format!("{}{}", marker, line));
            } else {
                self.line(Font::Regular, BODY_SIZE, BODY_LEADING, indent, line);
            }
        }
    }

    /// Two-column table, first row styled as the header.
    fn table(&mut self, rows: &[(String, String)]) {
        let table_width: f64 = TABLE_COL_WIDTHS.iter().sum();
        let x0 = (PAGE_WIDTH - table_width) / 2.0;

        for (i, (left, right)) in rows.iter().enumerate() {
            let header = i == 0;
            let (height, size, font, fill, color) = if header {
                (TABLE_HEADER_HEIGHT, TABLE_HEADER_SIZE, Font::Bold, GREY, WHITESMOKE)
            } else {
                (TABLE_ROW_HEIGHT, BODY_SIZE, Font::Regular, BEIGE, BLACK)
            };

            self.ensure(height);
            let bottom = self.y - height;
            let baseline = self.y - 3.0 - size;

            let mut x = x0;
            for (cell, width) in [left, right].into_iter().zip(TABLE_COL_WIDTHS) {
                self.fill_rect(x, bottom, width, height, fill);
                self.stroke_rect(x, bottom, width, height);
                self.text(font, size, x + CELL_PADDING, baseline, cell, color);
                x += width;
            }
            self.y = bottom;
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

/// PDF generator for analysis reports
pub struct PdfGenerator;

impl PdfGenerator {
    /// Write the report to `output_path`.
    pub fn write_report(report: &Report, output_path: &Path) -> Result<(), ExportError> {
        let bytes = Self::render(report);
        std::fs::write(output_path, &bytes).map_err(|source| ExportError::Io {
            path: output_path.display().to_string(),
            source,
        })?;

        log::info!(
            "Report generated: {} ({} bytes)",
            output_path.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Render the complete PDF document.
    pub fn render(report: &Report) -> Vec<u8> {
        let pages = Self::layout(report);
        let created = report.generated_at.format("%Y%m%d%H%M%S").to_string();
        Self::assemble(&pages, &report.title, &created)
    }

    /// Lay out the report into page content streams.
    fn layout(report: &Report) -> Vec<String> {
        let mut flow = PageFlow::new();

        flow.title(&report.title);
        flow.space(12.0);

        for (label, value) in report.metadata() {
            flow.labelled(label, &value);
        }
        flow.space(20.0);

        flow.heading("Chart Configuration");
        flow.space(8.0);
        for (label, value) in report.configuration() {
            flow.labelled(label, &value);
        }
        flow.space(20.0);

        flow.heading("Data Analysis & Insights");
        flow.space(8.0);
        for insight in &report.analysis.insights {
            flow.bullet(insight);
            flow.space(6.0);
        }
        flow.space(20.0);

        flow.heading("Statistical Summary");
        flow.space(8.0);
        let rows: Vec<(String, String)> = report
            .stats_table()
            .into_iter()
            .map(|r| (r.metric, r.value))
            .collect();
        flow.table(&rows);

        flow.finish()
    }

    /// Serialize pages into PDF objects, cross-reference table and trailer.
    ///
    /// Object layout: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a
    /// (page, content) pair per page.
    fn assemble(pages: &[String], title: &str, created: &str) -> Vec<u8> {
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 6 + 2 * i))
            .collect();

        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Title ({}) /Producer (chartify_report) /CreationDate (D:{}) >>",
                encode_text(title),
                created
            ),
        ];

        for (i, content) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                7 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Aggregation, ChartConfig, ChartKind};
    use crate::stats::{Analysis, StatRow};
    use chrono::NaiveDate;

    fn report(insights: Vec<String>) -> Report {
        let config = ChartConfig::new("category", "sales", Aggregation::Sum, ChartKind::Bar);
        let analysis = Analysis {
            insights,
            stats: vec![
                StatRow::new("Total Sum", "400.00"),
                StatRow::new("Number of Categories", "2"),
            ],
        };
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();
        Report::new("Data Analysis Report", "sales (2024).csv", 2, config, analysis)
            .with_timestamp(at)
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    #[test]
    fn document_has_sections_and_escaped_text() {
        let pdf = text(&PdfGenerator::render(&report(vec![
            "'B' has the highest sum sales of 300.00".to_string(),
        ])));

        assert!(pdf.starts_with("%PDF-1.4"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(Data Analysis Report) Tj"));
        assert!(pdf.contains("(sales \\(2024\\).csv) Tj"));
        assert!(pdf.contains("(2024-01-02 03:04:05) Tj"));
        assert!(pdf.contains("(Chart Configuration) Tj"));
        assert!(pdf.contains("(Data Analysis & Insights) Tj"));
        assert!(pdf.contains("(\\225 'B' has the highest sum sales of 300.00) Tj"));
        assert!(pdf.contains("(Metric) Tj"));
        assert!(pdf.contains("(Total Sum) Tj"));
        assert!(pdf.contains("(400.00) Tj"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("/CreationDate (D:20240102030405)"));
    }

    #[test]
    fn xref_points_at_objects() {
        let bytes = PdfGenerator::render(&report(vec!["x".to_string()]));
        let pdf = text(&bytes);

        let start = pdf.rfind("startxref\n").unwrap() + "startxref\n".len();
        let end = start + pdf[start..].find('\n').unwrap();
        let xref_offset: usize = pdf[start..end].parse().unwrap();
        assert!(pdf[xref_offset..].starts_with("xref\n"));

        let entries: Vec<usize> = pdf[xref_offset..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 7);
        for (i, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn long_reports_paginate() {
        let insights: Vec<String> = (0..80)
            .map(|i| format!("Insight number {} with enough words to fill a line or so", i))
            .collect();
        let pdf = text(&PdfGenerator::render(&report(insights)));
        assert!(!pdf.contains("/Count 1 "));
        assert!(pdf.contains("(\\225 Insight number 79 with enough words to fill a line or so) Tj"));
        let pages = pdf.matches("/Type /Page ").count();
        assert!(pages >= 2, "expected several pages, got {pages}");
    }

    #[test]
    fn wrap_respects_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let lines = wrap_text(text, Font::Regular, 10.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 100.0);
        }
        assert_eq!(lines.join(" "), text);
        assert_eq!(wrap_text("", Font::Regular, 10.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn encode_escapes_and_maps_win_ansi() {
        assert_eq!(encode_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(encode_text("• café"), "\\225 caf\\351");
        assert_eq!(encode_text("漢"), "?");
    }

    #[test]
    fn unwritable_path_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let err = PdfGenerator::write_report(&report(Vec::new()), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
