//! Display surface abstraction and the full-replace renderer for simulation responses.

use shared::{
    domain::{Axis, Page, SimulationParameters},
    protocol::{RowRecord, SimulationResponse, TermRecord},
};
use thiserror::Error;

use crate::{
    format::{display_value, escape_markup, format_exponent, superscript, ExponentDisplay, ExponentError},
    navigation::ControlState,
};

pub const ROWS_TABLE_HEADER_ROWS: usize = 3;
pub const TERMS_TABLE_HEADER_ROWS: usize = 2;

/// A response that decoded but cannot be shown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Exponent(#[from] ExponentError),
    #[error("row {index} after range start {range_start} has no displayable number")]
    RowNumberOverflow { range_start: u64, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSubTerm {
    pub base: String,
    pub symbol: String,
    pub exponent: ExponentDisplay,
}

impl FormattedSubTerm {
    pub fn to_markup(&self) -> String {
        format!(
            "<sup>{}</sup>{}<sub>{}</sub>",
            escape_markup(&self.base),
            escape_markup(&self.symbol),
            self.exponent.to_markup()
        )
    }

    pub fn to_unicode(&self) -> String {
        format!(
            "{}{}{}",
            superscript(&self.base),
            self.symbol,
            self.exponent.to_unicode()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    SubTerms(Vec<FormattedSubTerm>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn to_markup(&self) -> String {
        match self {
            Cell::Text(text) => escape_markup(text),
            Cell::SubTerms(terms) => join_sub_terms(terms, FormattedSubTerm::to_markup),
        }
    }

    pub fn to_unicode(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::SubTerms(terms) => join_sub_terms(terms, FormattedSubTerm::to_unicode),
        }
    }
}

fn join_sub_terms(terms: &[FormattedSubTerm], render: fn(&FormattedSubTerm) -> String) -> String {
    terms.iter().map(render).collect::<Vec<_>>().join(", ")
}

/// A table whose first `header_rows` rows are fixed; everything below is client-managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    header_rows: usize,
}

impl Table {
    pub fn with_header(header: Vec<Vec<Cell>>) -> Self {
        Self {
            header_rows: header.len(),
            rows: header,
        }
    }

    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> &[Vec<Cell>] {
        &self.rows[..self.header_rows]
    }

    pub fn body(&self) -> &[Vec<Cell>] {
        &self.rows[self.header_rows..]
    }

    pub fn clear_body(&mut self) {
        self.rows.truncate(self.header_rows);
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationSummary {
    pub s: u64,
    pub p: u64,
    pub d: u64,
    pub f: u64,
    pub total: u64,
}

impl CombinationSummary {
    pub fn from_response(response: &SimulationResponse) -> Self {
        Self {
            s: response.s,
            p: response.p,
            d: response.d,
            f: response.f,
            total: response.total_combinations(),
        }
    }

    pub fn axis(&self, axis: Axis) -> u64 {
        match axis {
            Axis::S => self.s,
            Axis::P => self.p,
            Axis::D => self.d,
            Axis::F => self.f,
        }
    }
}

/// Typed access to every region the controller reads or writes.
pub trait DisplaySurface {
    fn parameters(&self) -> SimulationParameters;
    fn set_summary(&mut self, summary: CombinationSummary);
    fn rows_table(&mut self) -> &mut Table;
    fn terms_table(&mut self) -> &mut Table;
    fn set_page_label(&mut self, page: Page);
    fn set_controls(&mut self, controls: &ControlState);
}

/// In-memory surface; front ends draw from it after each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSurface {
    pub inputs: SimulationParameters,
    pub summary: Option<CombinationSummary>,
    pub rows: Table,
    pub terms: Table,
    pub page_label: String,
    pub controls: ControlState,
}

impl ViewSurface {
    pub fn new(inputs: SimulationParameters) -> Self {
        Self {
            inputs,
            summary: None,
            rows: Table::with_header(rows_table_header()),
            terms: Table::with_header(terms_table_header()),
            page_label: Page::FIRST.to_string(),
            controls: ControlState::initial(),
        }
    }
}

impl Default for ViewSurface {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}

impl DisplaySurface for ViewSurface {
    fn parameters(&self) -> SimulationParameters {
        self.inputs.clone()
    }

    fn set_summary(&mut self, summary: CombinationSummary) {
        self.summary = Some(summary);
    }

    fn rows_table(&mut self) -> &mut Table {
        &mut self.rows
    }

    fn terms_table(&mut self) -> &mut Table {
        &mut self.terms
    }

    fn set_page_label(&mut self, page: Page) {
        self.page_label = page.to_string();
    }

    fn set_controls(&mut self, controls: &ControlState) {
        self.controls = controls.clone();
    }
}

/// Subshell columns with their ml values, in the order rows carry them.
const SUBSHELL_COLUMNS: [(&str, &[i8]); 4] = [
    ("s", &[0]),
    ("p", &[1, 0, -1]),
    ("d", &[2, 1, 0, -1, -2]),
    ("f", &[3, 2, 1, 0, -1, -2, -3]),
];

pub fn rows_table_header() -> Vec<Vec<Cell>> {
    let mut title = vec![Cell::text("Configurations")];
    let mut subshells = vec![Cell::text("")];
    let mut ml_values = vec![Cell::text("#")];
    for (label, mls) in SUBSHELL_COLUMNS {
        for ml in mls {
            title.push(Cell::text(""));
            subshells.push(Cell::text(label));
            ml_values.push(Cell::text(ml.to_string()));
        }
    }
    title.extend([Cell::text(""), Cell::text("")]);
    subshells.extend([Cell::text(""), Cell::text("")]);
    ml_values.extend([Cell::text("ML"), Cell::text("MS")]);
    vec![title, subshells, ml_values]
}

pub fn terms_table_header() -> Vec<Vec<Cell>> {
    vec![
        vec![Cell::text("Terms")],
        ["#", "L", "S", "Count", "Term"]
            .into_iter()
            .map(Cell::text)
            .collect(),
    ]
}

pub fn row_cells(
    range_start: u64,
    index: usize,
    row: &RowRecord,
) -> Result<Vec<Cell>, RenderError> {
    let global_index = u64::try_from(index)
        .ok()
        .and_then(|offset| range_start.checked_add(offset)?.checked_add(1))
        .ok_or(RenderError::RowNumberOverflow { range_start, index })?;
    Ok(std::iter::once(Cell::text(global_index.to_string()))
        .chain(row.fields().iter().map(|value| Cell::Text(display_value(value))))
        .collect())
}

pub fn term_cells(index: usize, term: &TermRecord) -> Result<Vec<Cell>, ExponentError> {
    let sub_terms = term
        .sub_terms
        .iter()
        .map(|sub| {
            Ok(FormattedSubTerm {
                base: display_value(&sub.base),
                symbol: display_value(&sub.symbol),
                exponent: format_exponent(sub.exponent)?,
            })
        })
        .collect::<Result<Vec<_>, ExponentError>>()?;

    let mut cells = Vec::with_capacity(term.scalars.len() + 2);
    cells.push(Cell::text((index + 1).to_string()));
    cells.extend(term.scalars.iter().map(|value| Cell::Text(display_value(value))));
    cells.push(Cell::SubTerms(sub_terms));
    Ok(cells)
}

/// Replaces summary, rows and terms from `response`.
///
/// Every cell is built before the surface is touched, so an unrenderable term leaves the
/// previous contents in place.
pub fn render_response<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    response: &SimulationResponse,
) -> Result<(), RenderError> {
    let term_rows = response
        .terms
        .iter()
        .enumerate()
        .map(|(index, term)| term_cells(index, term))
        .collect::<Result<Vec<_>, _>>()?;
    let data_rows = response
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| row_cells(response.range_start, index, row))
        .collect::<Result<Vec<_>, _>>()?;

    surface.set_summary(CombinationSummary::from_response(response));

    let rows = surface.rows_table();
    rows.clear_body();
    for cells in data_rows {
        rows.push_row(cells);
    }

    let terms = surface.terms_table();
    terms.clear_body();
    for cells in term_rows {
        terms.push_row(cells);
    }
    Ok(())
}
