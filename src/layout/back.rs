use glam::ivec2;

use super::{BoxSize, CardAssets, CardData, CardTheme, Layout};
use crate::symbol::Symbols;

/// Lays out the back: header, QR code, barcode, contact and rules text,
/// a footer and the underline stripe.
///
/// Symbols that fail to generate are left off and listed in
/// [`Layout::omitted`].
pub fn back(
    data: &CardData,
    assets: &CardAssets,
    theme: &CardTheme,
    symbols: &Symbols,
) -> Layout {
    let mut layout = Layout::new(theme);
    let institution = &data.institution;
    let width = theme.width as i32;

    layout.header(theme, data, assets, &institution.back_tagline);

    let qr_left = width - theme.qr_size as i32 - theme.qr_right_margin;
    layout.symbol(
        &*symbols.qr,
        &data.qr_payload(),
        BoxSize::new(theme.qr_size, theme.qr_size),
        ivec2(qr_left, theme.qr_top),
    );

    let (barcode_x, barcode_y) = theme.barcode_origin;
    layout.symbol(
        &*symbols.barcode,
        &data.person.id,
        theme.barcode_box,
        ivec2(barcode_x, barcode_y),
    );

    let mut lines = vec![
        format!("Address: {}", institution.address),
        format!(
            "Contact: {}  |  Toll-Free: {}",
            institution.contact, institution.toll_free
        ),
        data.emergency_contact.clone(),
        String::new(),
        "Rules & Instructions:".to_owned(),
    ];
    lines.extend(data.rules.iter().cloned());

    let (x, mut y) = theme.body_origin;
    for line in lines {
        if !line.is_empty() {
            layout
                .instructions
                .text(ivec2(x, y), line, &theme.body_font, theme.body);
        }
        y += theme.body_line_height;
    }

    layout
        .instructions
        .text(
            theme.footer_origin(),
            format!("{}    |    {}", institution.website, institution.name),
            &theme.back_footer_font,
            theme.footer,
        )
        .line(
            ivec2(theme.stripe_inset, theme.header_height),
            ivec2(width - theme.stripe_inset, theme.header_height),
            theme.stripe,
            theme.stripe_width,
        );

    layout
}

#[cfg(test)]
mod tests {
    use glam::{ivec2, IVec2};
    use image::RgbaImage;

    use super::*;
    use crate::{
        font::ResolvedFont,
        instruction::DrawInstruction,
        layout::tests::{assets, texts},
        symbol::{QrSymbol, SymbolError, SymbolGenerator},
        Color,
    };

    const ADDRESS_LINE: &str = "Address: Kothi, Mandhana, Kanpur, Uttar Pradesh";

    struct Broken;

    impl SymbolGenerator for Broken {
        fn symbology(&self) -> &'static str {
            "Code 128"
        }

        fn generate(&self, payload: &str) -> Result<RgbaImage, SymbolError> {
            Err(SymbolError::Encoder {
                symbology: self.symbology(),
                payload: payload.to_owned(),
                reason: "writer unavailable".to_owned(),
            })
        }
    }

    fn symbol_positions(layout: &Layout) -> Vec<(IVec2, (u32, u32))> {
        layout
            .instructions
            .iter()
            .filter_map(|instruction| match instruction {
                DrawInstruction::Image {
                    bitmap,
                    position,
                    own_alpha: false,
                } => Some((*position, bitmap.dimensions())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn back_places_symbols_and_text() {
        let theme = CardTheme::default();
        let symbols = Symbols::standard(ResolvedFont::builtin(24.0));
        let layout = back(&CardData::default(), &assets(&theme), &theme, &symbols);

        assert!(layout.omitted.is_empty());

        let symbols = symbol_positions(&layout);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0], (ivec2(750, 200), (200, 200)));
        let (barcode_position, (barcode_width, barcode_height)) = symbols[1];
        assert_eq!(barcode_position, ivec2(580, 420));
        assert!(barcode_width <= 400 && barcode_height <= 100);
        assert!(barcode_width == 400 || barcode_height == 100);

        let texts = texts(&layout);
        assert_eq!(texts[1], (ivec2(300, 75), "Affiliated to AKTU"));
        assert!(texts.contains(&(ivec2(50, 200), ADDRESS_LINE)));
        assert!(texts.contains(&(ivec2(50, 320), "Rules & Instructions:")));
        assert!(texts.contains(&(
            ivec2(50, 440),
            "- If found, please return to the college office."
        )));
        assert!(!texts.iter().any(|(position, _)| position.y == 290));
    }

    #[test]
    fn back_ends_with_stripe() {
        let theme = CardTheme::default();
        let symbols = Symbols::standard(ResolvedFont::builtin(24.0));
        let layout = back(&CardData::default(), &assets(&theme), &theme, &symbols);

        assert_eq!(
            layout.instructions.as_slice().last(),
            Some(&DrawInstruction::Line {
                start: ivec2(20, 140),
                end: ivec2(980, 140),
                color: Color::rgb(88, 152, 62),
                width: 6,
            })
        );
    }

    #[test]
    fn failing_barcode_is_omitted_and_reported() {
        let theme = CardTheme::default();
        let symbols = Symbols::new(QrSymbol::default(), Broken);
        let layout = back(&CardData::default(), &assets(&theme), &theme, &symbols);

        assert_eq!(layout.omitted.len(), 1);
        assert_eq!(layout.omitted[0].payload(), "FGTCLB2983");
        assert_eq!(layout.omitted[0].symbology(), "Code 128");

        let symbols = symbol_positions(&layout);
        assert_eq!(symbols, [(ivec2(750, 200), (200, 200))]);
        assert!(texts(&layout).contains(&(ivec2(50, 200), ADDRESS_LINE)));
    }
}
