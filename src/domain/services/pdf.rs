use crate::domain::models::event::Event;
use crate::error::AppError;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use std::io::Cursor;

/// One A4 page per ticket: header, ticket number, event block when known,
/// the QR code, and the door policy footer.
pub fn render_ticket_pdf(
    ticket_number: &str,
    qr_png: &[u8],
    event: Option<&Event>,
) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new("Cicada Ticket", Mm(210.0), Mm(297.0), "ticket");
    let layer_ref = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::InternalWithMsg(format!("PDF font load failed: {}", e)))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::InternalWithMsg(format!("PDF font load failed: {}", e)))?;

    layer_ref.use_text("CICADA", 28.0, Mm(20.0), Mm(265.0), &bold);
    layer_ref.use_text("Admission Ticket", 14.0, Mm(20.0), Mm(255.0), &regular);
    layer_ref.use_text(ticket_number, 12.0, Mm(20.0), Mm(242.0), &regular);

    if let Some(event) = event {
        let mut y = 226.0;
        let mut line = |text: String, y: &mut f32| {
            layer_ref.use_text(text, 11.0, Mm(20.0), Mm(*y), &regular);
            *y -= 7.0;
        };
        line(format!("Event: {}", event.event_title), &mut y);
        line(format!("Date: {}", event.date), &mut y);
        line(format!("Time: {}", event.time), &mut y);
        line(format!("Location: {}", event.location), &mut y);
    }

    let decoder = PngDecoder::new(Cursor::new(qr_png))
        .map_err(|e| AppError::InternalWithMsg(format!("PDF QR decode failed: {}", e)))?;
    let qr = Image::try_from(decoder)
        .map_err(|e| AppError::InternalWithMsg(format!("PDF QR embed failed: {}", e)))?;
    qr.add_to_layer(
        layer_ref.clone(),
        ImageTransform {
            translate_x: Some(Mm(55.0)),
            translate_y: Some(Mm(100.0)),
            dpi: Some(100.0),
            ..Default::default()
        },
    );

    layer_ref.use_text(
        "Valid for one person only. No refunds or exchanges.",
        9.0,
        Mm(20.0),
        Mm(30.0),
        &regular,
    );
    layer_ref.use_text(
        "Questions? support@mucicada.com",
        9.0,
        Mm(20.0),
        Mm(24.0),
        &regular,
    );

    doc.save_to_bytes()
        .map_err(|e| AppError::InternalWithMsg(format!("PDF serialization failed: {}", e)))
}
