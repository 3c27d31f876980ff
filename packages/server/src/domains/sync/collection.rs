//! The mirrored collections and their fixed sheet layouts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sheets::{a1_range, SheetSpec};

use crate::common::ParseStatusError;
use crate::domains::applications::models::JobApplication;
use crate::domains::contacts::models::ContactMessage;
use crate::domains::waitlist::models::WaitlistEntry;
use crate::kernel::stores::{
    ApplicationStore, ContactStore, ReadOrder, Store, StoreResult, WaitlistStore,
};

/// Rows per sheet when the target spreadsheet is created.
pub const SHEET_ROWS: u32 = 1000;

/// Last row of every data range. Row 1 holds the headers.
pub const LAST_DATA_ROW: u32 = 1000;

/// Records read per sync.
pub const READ_LIMIT: usize = 1000;

/// Rows that fit in `A2:…1000`.
pub const DATA_ROW_CAPACITY: usize = (LAST_DATA_ROW - 1) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorCollection {
    Waitlist,
    ContactMessages,
    JobApplications,
}

const WAITLIST_HEADERS: &[&str] = &["Email", "Name", "Interests", "Position", "Joined At", "Status"];
const CONTACT_HEADERS: &[&str] = &["Name", "Email", "Message", "Status", "Created At"];
const APPLICATION_HEADERS: &[&str] = &[
    "Name",
    "Email",
    "Phone",
    "Position",
    "Cover Letter",
    "Resume URL",
    "Status",
    "Created At",
];

impl MirrorCollection {
    pub const ALL: [MirrorCollection; 3] = [
        MirrorCollection::Waitlist,
        MirrorCollection::ContactMessages,
        MirrorCollection::JobApplications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorCollection::Waitlist => "waitlist",
            MirrorCollection::ContactMessages => "contact_messages",
            MirrorCollection::JobApplications => "job_applications",
        }
    }

    pub fn sheet_title(&self) -> &'static str {
        match self {
            MirrorCollection::Waitlist => "Waitlist",
            MirrorCollection::ContactMessages => "Contact Messages",
            MirrorCollection::JobApplications => "Job Applications",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            MirrorCollection::Waitlist => WAITLIST_HEADERS,
            MirrorCollection::ContactMessages => CONTACT_HEADERS,
            MirrorCollection::JobApplications => APPLICATION_HEADERS,
        }
    }

    pub fn column_count(&self) -> u32 {
        self.headers().len() as u32
    }

    pub fn sheet_spec(&self) -> SheetSpec {
        SheetSpec::new(self.sheet_title(), SHEET_ROWS, self.column_count())
    }

    pub fn header_range(&self) -> String {
        a1_range(self.sheet_title(), self.column_count(), 1, 1)
    }

    pub fn data_range(&self) -> String {
        a1_range(self.sheet_title(), self.column_count(), 2, LAST_DATA_ROW)
    }

    pub fn header_row(&self) -> Vec<String> {
        self.headers().iter().map(|h| h.to_string()).collect()
    }

    /// Read up to `limit` records and project them to sheet rows.
    pub async fn read_rows(
        &self,
        store: &dyn Store,
        order: ReadOrder,
        limit: usize,
    ) -> StoreResult<Vec<Vec<String>>> {
        let rows = match self {
            MirrorCollection::Waitlist => store
                .list_waitlist_entries(order, limit)
                .await?
                .iter()
                .map(waitlist_row)
                .collect(),
            MirrorCollection::ContactMessages => store
                .list_contact_messages(order, limit)
                .await?
                .iter()
                .map(contact_row)
                .collect(),
            MirrorCollection::JobApplications => store
                .list_job_applications(order, limit)
                .await?
                .iter()
                .map(application_row)
                .collect(),
        };
        Ok(rows)
    }
}

impl fmt::Display for MirrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MirrorCollection {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waitlist" => Ok(MirrorCollection::Waitlist),
            "contact_messages" | "contacts" => Ok(MirrorCollection::ContactMessages),
            "job_applications" | "applications" => Ok(MirrorCollection::JobApplications),
            _ => Err(ParseStatusError::new("collection", s)),
        }
    }
}

pub fn waitlist_row(entry: &WaitlistEntry) -> Vec<String> {
    vec![
        entry.email.clone(),
        entry.name.clone(),
        entry.interests.join(", "),
        entry.position.to_string(),
        entry.joined_at.to_rfc3339(),
        entry.status.to_string(),
    ]
}

pub fn contact_row(message: &ContactMessage) -> Vec<String> {
    vec![
        message.name.clone(),
        message.email.clone(),
        message.message.clone(),
        message.status.to_string(),
        message.created_at.to_rfc3339(),
    ]
}

pub fn application_row(application: &JobApplication) -> Vec<String> {
    vec![
        application.name.clone(),
        application.email.clone(),
        application.phone.clone(),
        application.position.clone(),
        application.cover_letter.clone(),
        application.resume_url.clone(),
        application.status.to_string(),
        application.created_at.to_rfc3339(),
    ]
}
