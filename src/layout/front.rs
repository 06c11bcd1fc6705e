use std::sync::Arc;

use glam::ivec2;

use super::{CardAssets, CardData, CardTheme, Layout};

/// Lays out the front: header, photo, holder details, signature and an
/// address footer.
pub fn front(data: &CardData, assets: &CardAssets, theme: &CardTheme) -> Layout {
    let mut layout = Layout::new(theme);
    let institution = &data.institution;
    let person = &data.person;

    layout.header(theme, data, assets, &institution.front_tagline);

    let details_top = theme.band_bottom() + 40;
    layout
        .instructions
        .image(Arc::clone(&assets.photo), ivec2(theme.padding, details_top));

    let rows = [
        ("Student Name:", &person.name),
        ("Roll No.:", &person.id),
        ("Course:", &person.program),
        ("Date of Birth:", &person.date_of_birth),
        ("Address:", &institution.address),
        ("Valid Upto:", &person.valid_through),
    ];
    let mut y = details_top;
    for (label, value) in rows {
        layout
            .instructions
            .text(ivec2(theme.details_x, y), label, &theme.detail_font, theme.label)
            .text(
                ivec2(theme.details_x + theme.value_offset, y),
                value,
                &theme.detail_font,
                theme.value,
            );
        y += theme.detail_line_height;
    }

    layout
        .instructions
        .image(
            Arc::clone(&assets.signature),
            ivec2(theme.details_x + 1, y + 1),
        )
        .text(
            ivec2(theme.details_x, y + theme.signature_box.height as i32 + 1),
            "Authorized Signatory",
            &theme.caption_font,
            theme.signature_caption,
        )
        .text(
            theme.footer_origin(),
            format!(
                "{}    |    {}    |    {}",
                institution.address, institution.contact, institution.website
            ),
            &theme.caption_font,
            theme.footer,
        );

    layout
}

#[cfg(test)]
mod tests {
    use glam::{ivec2, uvec2};

    use super::*;
    use crate::{
        instruction::DrawInstruction,
        layout::tests::{assets, texts},
        Color,
    };

    #[test]
    fn front_places_details_in_rows() {
        let theme = CardTheme::default();
        let layout = front(&CardData::default(), &assets(&theme), &theme);

        assert_eq!(layout.size, uvec2(1000, 600));
        assert!(layout.omitted.is_empty());

        let texts = texts(&layout);
        assert_eq!(
            texts[0],
            (ivec2(300, 25), "Maharana Pratap Engineering College")
        );
        assert_eq!(texts[1], (ivec2(300, 75), "Founded: 1999"));
        assert!(texts.contains(&(ivec2(350, 220), "Student Name:")));
        assert!(texts.contains(&(ivec2(600, 220), "Edward Norton")));
        assert!(texts.contains(&(ivec2(600, 258), "FGTCLB2983")));
        assert!(texts.contains(&(ivec2(350, 410), "Valid Upto:")));
        assert!(texts.contains(&(ivec2(350, 529), "Authorized Signatory")));
        assert_eq!(
            texts.last().unwrap(),
            &(
                ivec2(20, 570),
                "Kothi, Mandhana, Kanpur, Uttar Pradesh    |    \
                 +91-8081210087 / +91-8953400862    |    www.mpgi.edu.in"
            )
        );
    }

    #[test]
    fn front_starts_with_header_bands() {
        let theme = CardTheme::default();
        let layout = front(&CardData::default(), &assets(&theme), &theme);

        assert_eq!(
            layout.instructions.as_slice()[..2],
            [
                DrawInstruction::Rectangle {
                    top_left: ivec2(0, 0),
                    bottom_right: ivec2(1000, 140),
                    fill: Color::rgb(11, 84, 129),
                },
                DrawInstruction::Rectangle {
                    top_left: ivec2(0, 140),
                    bottom_right: ivec2(1000, 180),
                    fill: Color::rgb(232, 240, 232),
                },
            ]
        );
    }

    #[test]
    fn signature_sits_below_the_last_row() {
        let theme = CardTheme::default();
        let layout = front(&CardData::default(), &assets(&theme), &theme);

        let images: Vec<_> = layout
            .instructions
            .iter()
            .filter_map(|instruction| match instruction {
                DrawInstruction::Image { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(images, [ivec2(40, 10), ivec2(40, 220), ivec2(351, 449)]);
    }
}
