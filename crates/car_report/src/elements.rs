//! Custom element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` has no native support for filled cell backgrounds, so the shaded
//! label cells of the report table are painted here by drawing closely spaced
//! horizontal strokes behind a regular paragraph.

use genpdf::elements::Paragraph;
use genpdf::error::Error;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult};

// The renderer strokes lines at the default 1 pt (~0.35 mm) width, so
// stripes spaced 0.3 mm apart overlap into a solid fill.
const STRIPE_SPACING_MM: f64 = 0.3;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

pub(crate) fn mm_from_pt(value: f64) -> Mm {
    Mm::from(printpdf::Mm::from(printpdf::Pt(value)))
}

/// A table label rendered on a solid background fill.
///
/// The fill height is estimated by greedily wrapping the label text against
/// the available cell width, matching the wrapping the inner [`Paragraph`]
/// performs when it is rendered on top of the stripes.
pub struct ShadedLabel {
    text: String,
    paragraph: Paragraph,
    style: Style,
    background: Color,
}

impl ShadedLabel {
    /// Creates a bold label on the default light-gray background.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            paragraph: Paragraph::new(text.clone()),
            text,
            style: Style::new().bold(),
            background: Color::Rgb(192, 192, 192),
        }
    }

    fn estimated_height(&self, context: &genpdf::Context, style: Style, width: Mm) -> f64 {
        let space_width = mm_to_f64(StyledString::new(" ", style).width(&context.font_cache));
        let word_widths: Vec<f64> = self
            .text
            .split_whitespace()
            .map(|word| mm_to_f64(StyledString::new(word, style).width(&context.font_cache)))
            .collect();
        let lines = line_count(&word_widths, space_width, mm_to_f64(width));
        mm_to_f64(style.line_height(&context.font_cache)) * lines as f64
    }
}

impl Element for ShadedLabel {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let style = style.and(self.style);
        let width = area.size().width;
        let height = self.estimated_height(context, style, width);

        if height > mm_to_f64(area.size().height) {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        let stripe = Style::new().with_color(self.background);
        let stripes = (height / STRIPE_SPACING_MM).ceil() as usize;
        for index in 0..stripes {
            let center = ((index as f64 + 0.5) * STRIPE_SPACING_MM)
                .min(height - STRIPE_SPACING_MM / 2.0)
                .max(STRIPE_SPACING_MM / 2.0);
            area.draw_line(
                vec![
                    Position::new(0, mm_from_f64(center)),
                    Position::new(width, mm_from_f64(center)),
                ],
                stripe,
            );
        }

        self.paragraph.render(context, area, style)
    }
}

/// Greedy word-wrap line count for the given word widths.
///
/// Mirrors the paragraph wrapping rule: a word that does not fit on the
/// current non-empty line starts a new one, and a single over-long word still
/// occupies exactly one line.
pub(crate) fn line_count(word_widths: &[f64], space_width: f64, max_width: f64) -> usize {
    if word_widths.is_empty() {
        return 1;
    }

    let mut lines = 1;
    let mut current = 0.0;
    for &word in word_widths {
        let candidate = if current == 0.0 {
            word
        } else {
            current + space_width + word
        };
        if candidate > max_width && current > 0.0 {
            lines += 1;
            current = word;
        } else {
            current = candidate;
        }
    }
    lines
}
