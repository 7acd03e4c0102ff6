//! Downloadable renditions (TXT, DOCX, PDF) of the rewritten resume.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use printpdf::{BuiltinFont, Mm, PdfDocument};

pub const TXT_FILE_NAME: &str = "Optimized_Resume.txt";
pub const DOCX_FILE_NAME: &str = "Optimized_Resume.docx";
pub const PDF_FILE_NAME: &str = "Optimized_Resume.pdf";
pub const TXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// A4 portrait, Helvetica 11pt on 5mm lines.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const FONT_SIZE_PT: f32 = 11.0;
/// Characters per line that fit the text width at the font size above.
const PDF_WRAP_CHARS: usize = 95;

pub fn txt_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Builds a DOCX with one paragraph per line of `text`.
pub fn docx_bytes(text: &str) -> anyhow::Result<Vec<u8>> {
    let docx = text.lines().fold(Docx::new(), |doc, line| {
        doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)))
    });

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer)?;
    Ok(buffer.into_inner())
}

/// Builds a PDF with each line of `text` word-wrapped to the page width,
/// adding pages as needed. Characters outside Latin-1 become `?`, since the
/// built-in Helvetica font has no glyphs for them.
pub fn pdf_bytes(text: &str) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Optimized Resume",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Text",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for line in pdf_lines(text) {
        if y - LINE_HEIGHT_MM < MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Text");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        y -= LINE_HEIGHT_MM;
        if !line.trim().is_empty() {
            current.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Printable lines for the PDF body: Latin-1 only, wrapped at `PDF_WRAP_CHARS`.
fn pdf_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.chars()
                .map(|c| if u32::from(c) <= 0xFF { c } else { '?' })
                .collect::<String>()
        })
        .flat_map(|line| wrap_line(&line, PDF_WRAP_CHARS))
        .collect()
}

/// Breaks `line` at spaces so no piece exceeds `width` chars; words longer
/// than `width` are split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let separator = usize::from(!current.is_empty());
        if !current.is_empty()
            && current.chars().count() + separator + word.chars().count() > width
        {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        while current.chars().count() > width {
            let head: String = current.chars().take(width).collect();
            current = current.chars().skip(width).collect();
            pieces.push(head);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// `Content-Disposition` value for an attachment download.
pub fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}
