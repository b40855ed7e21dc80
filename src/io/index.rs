use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// INDEX TABLE
// ============================================================================

/// Typed view of the single column the pipeline reads. All other columns
/// are carried through opaquely.
#[derive(Debug, Deserialize)]
struct IndexRow {
    name: String,
}

/// The tabular index file driving a batch (`lig_descriptor.csv` by
/// default). Requires a `name` column; everything else is passed through
/// untouched to the augmented output table.
#[derive(Debug, Clone)]
pub struct IndexTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    names: Vec<String>,
}

impl IndexTable {
    /// Reads the index CSV. Failure here is the only batch-fatal error in
    /// the pipeline.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Could not read index file: {:?}", path))?;

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == "name") {
            return Err(anyhow!("Index file {:?} is missing a 'name' column", path));
        }

        let mut rows = Vec::new();
        let mut names = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("Malformed row in {:?}", path))?;
            let row: IndexRow = record
                .deserialize(Some(&headers))
                .with_context(|| format!("Row without a usable 'name' in {:?}", path))?;
            names.push(row.name);
            rows.push(record);
        }

        Ok(Self {
            headers,
            rows,
            names,
        })
    }

    /// Molecule names in table order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes a copy of the table with one extra column appended.
    /// `values[i]` belongs to row i; rows without a value get an empty
    /// cell, so skipped molecules stay visible in the output table.
    pub fn write_augmented(
        &self,
        path: &Path,
        column: &str,
        values: &[Option<String>],
    ) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Could not create augmented table: {:?}", path))?;

        let mut headers = self.headers.clone();
        headers.push_field(column);
        writer.write_record(&headers)?;

        for (i, row) in self.rows.iter().enumerate() {
            let mut out = row.clone();
            let cell = values.get(i).and_then(|v| v.as_deref()).unwrap_or("");
            out.push_field(cell);
            writer.write_record(&out)?;
        }
        writer.flush()?;
        Ok(())
    }
}
