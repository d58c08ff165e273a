use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::ConfigurationError;
use crate::work_item::WorkItem;

pub const REGION_COLUMN: &str = "Country";
pub const PLACE_COLUMN: &str = "Place";

pub fn read_work_items(path: &Path) -> Result<Vec<WorkItem>, ConfigurationError> {
    let file = File::open(path).map_err(|source| ConfigurationError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let items = read_work_items_from(file)?;
    debug!("Read {} rows from {:?}", items.len(), path);
    return Ok(items);
}

pub fn read_work_items_from<R: Read>(input: R) -> Result<Vec<WorkItem>, ConfigurationError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let region_index = column_index(&headers, REGION_COLUMN)?;
    let place_index = column_index(&headers, PLACE_COLUMN)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        let region = record.get(region_index).unwrap_or_default();
        let place = record.get(place_index).unwrap_or_default();
        items.push(WorkItem::new(region, place));
    }
    Ok(items)
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, ConfigurationError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(ConfigurationError::MissingColumn(name))
}
