//! Shared test data builders for integration tests.

#![allow(dead_code)] // not every suite uses every builder

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use loadlens_core::models::RawLoadRow;

/// Base instant all builders measure offsets from.
pub fn base_naive() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// The same base instant as a UTC timestamp, for clock pinning.
pub fn base_utc() -> DateTime<Utc> {
    Utc.from_utc_datetime(&base_naive())
}

/// Builder pattern for raw load rows.
pub struct LoadRowBuilder {
    database: String,
    table: String,
    label: Option<String>,
    state: String,
    created_offset: i64,
    write_seconds: Option<i64>,
    publish_seconds: Option<i64>,
    scan_bytes: Option<i64>,
}

impl LoadRowBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            database: "sales".to_string(),
            table: table.to_string(),
            label: None,
            state: "FINISHED".to_string(),
            created_offset: 0,
            write_seconds: None,
            publish_seconds: None,
            scan_bytes: Some(4096),
        }
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    /// Creation time as seconds after the base instant.
    pub fn created_at(mut self, offset_seconds: i64) -> Self {
        self.created_offset = offset_seconds;
        self
    }

    /// Give the row a full set of phase stamps: start one second after
    /// creation, then the given write and publish phase lengths.
    pub fn with_phases(mut self, write_seconds: i64, publish_seconds: i64) -> Self {
        self.write_seconds = Some(write_seconds);
        self.publish_seconds = Some(publish_seconds);
        self
    }

    pub fn with_bytes(mut self, bytes: i64) -> Self {
        self.scan_bytes = Some(bytes);
        self
    }

    pub fn without_bytes(mut self) -> Self {
        self.scan_bytes = None;
        self
    }

    pub fn build(self) -> RawLoadRow {
        let created = base_naive() + Duration::seconds(self.created_offset);
        let (start, commit, finish) = match (self.write_seconds, self.publish_seconds) {
            (Some(write), Some(publish)) => {
                let start = created + Duration::seconds(1);
                let commit = start + Duration::seconds(write);
                let finish = commit + Duration::seconds(publish);
                (Some(start), Some(commit), Some(finish))
            }
            _ => (None, None, None),
        };

        RawLoadRow {
            database_name: Some(self.database),
            table_name: Some(self.table),
            label: self.label,
            state: Some(self.state),
            create_time: Some(created),
            load_start_time: start,
            load_commit_time: commit,
            load_finish_time: finish,
            scan_bytes: self.scan_bytes,
        }
    }
}

/// A timeline of finished rows spaced evenly apart.
pub fn spaced_rows(table: &str, count: usize, gap_seconds: i64) -> Vec<RawLoadRow> {
    (0..count)
        .map(|i| {
            LoadRowBuilder::new(table)
                .with_label(&format!("{table}_{i}"))
                .created_at(i as i64 * gap_seconds)
                .with_phases(10, 5)
                .build()
        })
        .collect()
}
