//! PDF rendering
//!
//! Paints a [`ReportLayout`] onto A4 pages with the built-in Helvetica faces.
//! Document id, trailer id and dates come from the profile, so equal inputs
//! give equal bytes.

use std::io::BufWriter;

use chrono::Datelike;
use printpdf::*;
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;

use super::layout::{layout_report, PatientProfile, ReportLayout, VitalsSnapshot, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::FontFace;
use crate::advice::AdviceResult;

const DOCUMENT_TITLE: &str = "Medical Health Report";
const LAYER_NAME: &str = "Layer 1";
const TRAILER_ID: &[u8] = b"/ID[";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Invalid report date: {0}")]
    Date(#[from] time::error::ComponentRange),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ReportError> {
        let load = |font| doc.add_builtin_font(font).map_err(|e| ReportError::Pdf(e.to_string()));
        Ok(Self {
            regular: load(BuiltinFont::Helvetica)?,
            bold: load(BuiltinFont::HelveticaBold)?,
            oblique: load(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Oblique => &self.oblique,
        }
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Render the full report to PDF bytes
pub fn render(profile: &PatientProfile, vitals: &VitalsSnapshot, advice: &AdviceResult) -> Result<Vec<u8>, ReportError> {
    let layout = layout_report(profile, vitals, advice);
    paint(&layout, profile)
}

fn paint(layout: &ReportLayout, profile: &PatientProfile) -> Result<Vec<u8>, ReportError> {
    let stamp = profile_timestamp(profile)?;
    let width = pt_to_mm(PAGE_WIDTH);
    let height = pt_to_mm(PAGE_HEIGHT);

    let (doc, first_page, first_layer) = PdfDocument::new(DOCUMENT_TITLE, width, height, LAYER_NAME);
    let doc = doc
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }))
        .with_document_id(document_seed(profile))
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp);

    let fonts = Fonts::load(&doc)?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..layout.page_count.max(1) {
        let (page, layer) = doc.add_page(width, height, LAYER_NAME);
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for op in &layout.ops {
        let Some(layer) = layers.get(op.page) else {
            continue;
        };
        layer.set_fill_color(rgb_to_printpdf(op.color));
        layer.use_text(op.text.as_str(), op.size, pt_to_mm(op.x), pt_to_mm(op.y), fonts.get(op.face));
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(|e| ReportError::Pdf(e.to_string()))?;
    let mut bytes = writer.into_inner().map_err(|e| ReportError::Pdf(e.to_string()))?;

    stamp_trailer_id(&mut bytes, &document_seed(profile))?;
    Ok(bytes)
}

fn document_seed(profile: &PatientProfile) -> String {
    format!("phs-{}-{}", profile.patient_id, profile.generated_on)
}

/// Overwrite the two strings of the trailer `/ID` array in place.
///
/// printpdf fills them with random characters on every save. The replacement
/// is the uppercase SHA-256 hex of `seed`, cycled to the original length, so
/// byte offsets in the xref table stay valid.
fn stamp_trailer_id(bytes: &mut [u8], seed: &str) -> Result<(), ReportError> {
    let start = bytes
        .windows(TRAILER_ID.len())
        .rposition(|w| w == TRAILER_ID)
        .ok_or_else(|| ReportError::Pdf("trailer has no /ID entry".to_string()))?;

    let hex: String = Sha256::digest(seed.as_bytes()).iter().map(|b| format!("{b:02X}")).collect();
    let mut fill = hex.bytes().cycle();

    let mut pos = start + TRAILER_ID.len();
    for _ in 0..2 {
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'(') {
            return Err(ReportError::Pdf("trailer /ID is not a pair of literal strings".to_string()));
        }
        let open = pos + 1;
        let close = open
            + bytes[open..]
                .iter()
                .position(|&b| b == b')')
                .ok_or_else(|| ReportError::Pdf("unterminated trailer /ID string".to_string()))?;

        for (slot, byte) in bytes[open..close].iter_mut().zip(&mut fill) {
            *slot = byte;
        }
        pos = close + 1;
    }
    Ok(())
}

fn profile_timestamp(profile: &PatientProfile) -> Result<OffsetDateTime, ReportError> {
    let day = profile.generated_on;
    let month = time::Month::try_from(day.month() as u8)?;
    let date = time::Date::from_calendar_date(day.year(), month, day.day() as u8)?;
    Ok(date.midnight().assume_utc())
}
