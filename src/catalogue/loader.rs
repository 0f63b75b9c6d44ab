//! JSON loading for the occupation catalogue and course corpus
//!
//! Files hold either a bare array of records or an object with the records
//! under a named key. Records that fail to parse or violate catalogue
//! invariants are skipped and counted, never fatal.

use crate::catalogue::course::{Course, CourseRecord};
use crate::catalogue::occupation::{Occupation, OccupationRecord};
use crate::error::{CareerError, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
}

pub fn load_occupations(path: &Path) -> Result<(Vec<Occupation>, LoadStats)> {
    let content = std::fs::read_to_string(path)?;
    let loaded = parse_occupations(&content)?;
    info!(
        "Loaded {} occupations from {} ({} skipped)",
        loaded.1.loaded,
        path.display(),
        loaded.1.skipped
    );
    Ok(loaded)
}

pub fn load_courses(path: &Path) -> Result<(Vec<Course>, LoadStats)> {
    let content = std::fs::read_to_string(path)?;
    let loaded = parse_courses(&content)?;
    info!(
        "Loaded {} courses from {} ({} skipped)",
        loaded.1.loaded,
        path.display(),
        loaded.1.skipped
    );
    Ok(loaded)
}

pub fn parse_occupations(json: &str) -> Result<(Vec<Occupation>, LoadStats)> {
    let mut seen_codes = HashSet::new();
    parse_records(json, "occupations", |record: OccupationRecord| {
        let occupation = Occupation::try_from(record).map_err(|issue| issue.to_string())?;
        if !seen_codes.insert(occupation.code.clone()) {
            return Err(format!("duplicate occupation code '{}'", occupation.code));
        }
        Ok(occupation)
    })
}

pub fn parse_courses(json: &str) -> Result<(Vec<Course>, LoadStats)> {
    parse_records(json, "courses", |record: CourseRecord| {
        Course::from_record(record).ok_or_else(|| "course without a title".to_string())
    })
}

fn parse_records<R, T, F>(json: &str, key: &str, mut convert: F) -> Result<(Vec<T>, LoadStats)>
where
    R: DeserializeOwned,
    F: FnMut(R) -> std::result::Result<T, String>,
{
    let root: Value = serde_json::from_str(json)?;
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CareerError::Artifact(format!(
                    "expected an array under '{}'",
                    key
                )))
            }
        },
        _ => {
            return Err(CareerError::Artifact(format!(
                "expected an array of {} records",
                key
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut stats = LoadStats::default();

    for (position, item) in items.into_iter().enumerate() {
        let converted = serde_json::from_value::<R>(item)
            .map_err(|e| e.to_string())
            .and_then(&mut convert);

        match converted {
            Ok(record) => {
                records.push(record);
                stats.loaded += 1;
            }
            Err(reason) => {
                warn!("Skipping {} record #{}: {}", key, position, reason);
                stats.skipped += 1;
            }
        }
    }

    Ok((records, stats))
}
