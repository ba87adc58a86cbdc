//! Card records and template properties.

use serde::Serialize;

use crate::types::CellValue;

/// Header labels of the `"US Data"` sheet, one per [`UsCard`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsField {
    Id,
    Mmf,
    Feature,
    Project,
    Size,
    Title,
    DateBacklog,
    DateDev,
    DateDone,
}

impl UsField {
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::Mmf,
        Self::Feature,
        Self::Project,
        Self::Size,
        Self::Title,
        Self::DateBacklog,
        Self::DateDev,
        Self::DateDone,
    ];

    /// Exact header text, matched case-sensitively.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Mmf => "MMF",
            Self::Feature => "FEATURE",
            Self::Project => "PROJECT",
            Self::Size => "SIZE",
            Self::Title => "TITLE",
            Self::DateBacklog => "DATE_BACKLOG",
            Self::DateDev => "DATE_DEV",
            Self::DateDone => "DATE_DONE",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

/// One user-story record. Every field is an opaque cell value; `None` is a
/// blank cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsCard {
    pub id: Option<CellValue>,
    pub mmf: Option<CellValue>,
    pub feature: Option<CellValue>,
    pub project: Option<CellValue>,
    pub size: Option<CellValue>,
    pub title: Option<CellValue>,
    pub date_backlog: Option<CellValue>,
    pub date_dev: Option<CellValue>,
    pub date_done: Option<CellValue>,
}

impl UsCard {
    #[must_use]
    pub fn field(&self, field: UsField) -> Option<&CellValue> {
        self.slot(field).as_ref()
    }

    pub fn set_field(&mut self, field: UsField, value: Option<CellValue>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: UsField) -> &Option<CellValue> {
        match field {
            UsField::Id => &self.id,
            UsField::Mmf => &self.mmf,
            UsField::Feature => &self.feature,
            UsField::Project => &self.project,
            UsField::Size => &self.size,
            UsField::Title => &self.title,
            UsField::DateBacklog => &self.date_backlog,
            UsField::DateDev => &self.date_dev,
            UsField::DateDone => &self.date_done,
        }
    }

    fn slot_mut(&mut self, field: UsField) -> &mut Option<CellValue> {
        match field {
            UsField::Id => &mut self.id,
            UsField::Mmf => &mut self.mmf,
            UsField::Feature => &mut self.feature,
            UsField::Project => &mut self.project,
            UsField::Size => &mut self.size,
            UsField::Title => &mut self.title,
            UsField::DateBacklog => &mut self.date_backlog,
            UsField::DateDev => &mut self.date_dev,
            UsField::DateDone => &mut self.date_done,
        }
    }
}

/// Feature data: only the header labels are collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureCards {
    pub attributes: Vec<String>,
}

/// Everything loaded from the data sheets for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectCardsData {
    pub us_cards: Vec<UsCard>,
    pub feature_cards: FeatureCards,
}

/// Layout configuration read from a template sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardWorksheetProperties {
    /// Leading template rows holding configuration; the card block starts below them.
    pub nb_settings_rows: u32,
    pub card_height: u32,
    pub card_width: u32,
    pub cards_per_row: u32,
    pub lines_of_cards_per_page: u32,
}

/// Properties of every card template in the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardWorksheetsProperties {
    pub us: CardWorksheetProperties,
}

/// Row-major slot of a card in the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridPosition {
    pub vertical: u32,
    pub horizontal: u32,
}
