use serde::{Deserialize, Serialize};

/// Title and grid size of one sheet (tab) inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSpec {
    pub title: String,
    pub row_count: u32,
    pub column_count: u32,
}

impl SheetSpec {
    pub fn new(title: impl Into<String>, row_count: u32, column_count: u32) -> Self {
        Self {
            title: title.into(),
            row_count,
            column_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    pub row_count: u32,
    pub column_count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub title: String,
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadsheetProperties {
    pub title: String,
}

/// Body of `POST /v4/spreadsheets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSpreadsheetRequest {
    pub properties: SpreadsheetProperties,
    pub sheets: Vec<Sheet>,
}

impl CreateSpreadsheetRequest {
    pub fn new(title: &str, sheets: &[SheetSpec]) -> Self {
        Self {
            properties: SpreadsheetProperties {
                title: title.to_string(),
            },
            sheets: sheets
                .iter()
                .map(|spec| Sheet {
                    properties: SheetProperties {
                        title: spec.title.clone(),
                        grid_properties: GridProperties {
                            row_count: spec.row_count,
                            column_count: spec.column_count,
                        },
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub spreadsheet_url: Option<String>,
}

/// Body of `PUT /v4/spreadsheets/{id}/values/{range}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: &'static str,
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    pub fn rows(range: &str, values: Vec<Vec<String>>) -> Self {
        Self {
            range: range.to_string(),
            major_dimension: "ROWS",
            values,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
    #[serde(default)]
    pub updated_cells: Option<u32>,
}
