//! Report document construction.
//!
//! [`ReportBuilder`] maps a [`VehicleRecord`] to a finished PDF byte stream.
//! It performs no I/O of its own; persisting and opening the result is the
//! concern of [`crate::storage`] and [`crate::viewer`].

use chrono::{Local, NaiveDate};
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, PaperSize};
use thiserror::Error;

use crate::elements::{mm_from_pt, mm_to_f64, ShadedLabel};
use crate::fonts;
use crate::model::VehicleRecord;

const REPORT_TITLE: &str = "Vehicle Specifications Report";
const FOOTER_TEXT: &str = "-- End of Report --";

const TITLE_FONT_SIZE: u8 = 24;
const VIN_FONT_SIZE: u8 = 14;
const FOOTER_FONT_SIZE: u8 = 12;

const TITLE_COLOR: Color = Color::Rgb(0, 0, 255);
const FOOTER_COLOR: Color = Color::Rgb(128, 128, 128);

const PAGE_MARGIN_PT: f64 = 50.0;
const A4_WIDTH_MM: f64 = 210.0;
/// The summary table spans 80% of the content width, centered.
const TABLE_WIDTH_FRACTION: f64 = 0.8;
/// Label column to value column proportion.
const TABLE_COLUMN_WEIGHTS: [usize; 2] = [2, 3];

/// Errors raised while assembling or serializing a report document.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No usable font family could be resolved.
    #[error("failed to load report fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),
    /// A document element could not be assembled.
    #[error("failed to assemble report document: {0}")]
    Assembly(#[source] genpdf::error::Error),
    /// The assembled document could not be serialized to bytes.
    #[error("failed to serialize report document: {0}")]
    Render(#[source] genpdf::error::Error),
}

/// A fully serialized report document.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// The complete PDF byte stream.
    pub bytes: Vec<u8>,
}

/// The seam between the orchestration flow and the concrete PDF renderer.
pub trait ReportRenderer {
    /// Renders the record into a complete document byte stream.
    fn generate(&self, record: &VehicleRecord) -> Result<RenderedReport, GenerationError>;
}

/// Builds the fixed-layout vehicle specification report.
#[derive(Clone, Debug)]
pub struct ReportBuilder {
    generated_on: NaiveDate,
}

impl ReportBuilder {
    /// Creates a builder stamped with today's local date.
    pub fn new() -> Self {
        Self {
            generated_on: Local::now().date_naive(),
        }
    }

    /// Overrides the generation date shown in the report.
    pub fn with_generated_on(mut self, generated_on: NaiveDate) -> Self {
        self.generated_on = generated_on;
        self
    }

    fn build_table(&self, record: &VehicleRecord) -> Result<TableLayout, genpdf::error::Error> {
        let mut table = TableLayout::new(TABLE_COLUMN_WEIGHTS.to_vec());
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        for (label, value) in record.summary_rows() {
            append_row(&mut table, label, &value)?;
        }
        Ok(table)
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for ReportBuilder {
    fn generate(&self, record: &VehicleRecord) -> Result<RenderedReport, GenerationError> {
        let font_family = fonts::default_font_family().map_err(GenerationError::FontLoad)?;

        let mut document = genpdf::Document::new(font_family);
        document.set_title(REPORT_TITLE);
        document.set_paper_size(PaperSize::A4);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(Margins::all(mm_from_pt(PAGE_MARGIN_PT)));
        document.set_page_decorator(decorator);

        document.push(
            Paragraph::new(REPORT_TITLE).aligned(Alignment::Center).styled(
                Style::new()
                    .bold()
                    .with_font_size(TITLE_FONT_SIZE)
                    .with_color(TITLE_COLOR),
            ),
        );
        document.push(Break::new(1));

        document.push(Paragraph::new(format!(
            "Report generated on: {}",
            self.generated_on.format("%B %d, %Y")
        )));
        document.push(
            Paragraph::new(format!("VIN: {}", record.vin()))
                .styled(Style::new().bold().with_font_size(VIN_FONT_SIZE)),
        );
        document.push(Break::new(2));

        let table = self.build_table(record).map_err(GenerationError::Assembly)?;
        document.push(table.padded(Margins::vh(0, table_side_inset())));
        document.push(Break::new(2));

        document.push(
            Paragraph::new(FOOTER_TEXT).aligned(Alignment::Center).styled(
                Style::new()
                    .with_font_size(FOOTER_FONT_SIZE)
                    .with_color(FOOTER_COLOR),
            ),
        );

        let mut bytes = Vec::new();
        document
            .render(&mut bytes)
            .map_err(GenerationError::Render)?;
        Ok(RenderedReport { bytes })
    }
}

/// Appends one label/value row to the summary table.
fn append_row(table: &mut TableLayout, label: &str, value: &str) -> Result<(), genpdf::error::Error> {
    let mut row = table.row();
    row.push_element(ShadedLabel::new(label));
    row.push_element(Paragraph::new(value));
    row.push()
}

fn table_side_inset() -> genpdf::Mm {
    let content_width = A4_WIDTH_MM - 2.0 * mm_to_f64(mm_from_pt(PAGE_MARGIN_PT));
    crate::elements::mm_from_f64(content_width * (1.0 - TABLE_WIDTH_FRACTION) / 2.0)
}
