//! Dimension catalogs: `;`-delimited tables keyed by nominal size.
//!
//! A catalog is a header row followed by one row per size. Every table has a
//! `PSize` column; the remaining columns depend on the family and are read
//! through the `from_row` constructors below. Values may carry a trailing
//! `mm` unit.
//!
//! ```
//! use pipe_fittings::{Catalog, PipeDims};
//!
//! let text = "PSize;OD;thk\nDN50;60.3;3.91\nDN80;88.9 mm;5.49\n";
//! let catalog = Catalog::from_reader(text.as_bytes()).unwrap();
//! let row = catalog.get("DN80").unwrap();
//! let pipe = PipeDims::from_row(row, 500.0).unwrap();
//! assert_eq!(pipe.od, 88.9);
//! ```

use std::io::Read;

use hashbrown::HashMap;
use pipe_types::{PipeError, PipeResult};
use tracing::debug;

use crate::cap::CapDims;
use crate::elbow::ElbowDims;
use crate::flange::{FlangeDims, FlangeKind};
use crate::gasket::GasketDims;
use crate::pipe::PipeDims;
use crate::reducer::ReducerDims;
use crate::tee::TeeDims;

/// Name of the key column.
pub const SIZE_COLUMN: &str = "PSize";

/// Separator of multi-valued cells such as the reducer `OD2` list.
const LIST_SEPARATOR: char = '>';

/// One data row of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    index: usize,
    fields: HashMap<String, String>,
}

impl CatalogRow {
    /// One-based data row number.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nominal size label of the row.
    #[must_use]
    pub fn size(&self) -> &str {
        self.fields.get(SIZE_COLUMN).map_or("", String::as_str)
    }

    /// Raw cell content, if the column exists and is not blank.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Cell content of a required column.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] when the column is missing or blank.
    pub fn text(&self, field: &str) -> PipeResult<&str> {
        self.get(field)
            .ok_or_else(|| PipeError::catalog(self.index, format!("missing field '{field}'")))
    }

    /// Numeric value of a required column.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] when the column is missing or not a number.
    pub fn f64(&self, field: &str) -> PipeResult<f64> {
        let raw = self.text(field)?;
        self.parse(field, raw)
    }

    /// Numeric value of an optional column, `default` when missing or blank.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] when the cell is present but not a number.
    pub fn f64_or(&self, field: &str, default: f64) -> PipeResult<f64> {
        self.get(field)
            .map_or(Ok(default), |raw| self.parse(field, raw))
    }

    /// `choice`-th entry of a `>`-separated numeric list.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] when the column is missing, the choice is
    /// past the end of the list, or the entry is not a number.
    pub fn list_f64(&self, field: &str, choice: usize) -> PipeResult<f64> {
        let raw = self.text(field)?;
        let entry = raw.split(LIST_SEPARATOR).nth(choice).ok_or_else(|| {
            PipeError::catalog(
                self.index,
                format!("field '{field}' has no entry {choice} in '{raw}'"),
            )
        })?;
        self.parse(field, entry)
    }

    fn parse(&self, field: &str, raw: &str) -> PipeResult<f64> {
        let number = raw.trim().trim_end_matches("mm").trim_end();
        number.parse::<f64>().map_err(|_| {
            PipeError::catalog(self.index, format!("field '{field}' is not a number: '{raw}'"))
        })
    }
}

/// A parsed dimension table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    by_size: HashMap<String, usize>,
}

impl Catalog {
    /// Parses a `;`-delimited table with a header row.
    ///
    /// Rows keep their file order. When a size appears twice, lookups return
    /// the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] when the text cannot be read, the header
    /// lacks the `PSize` column, or a row has no size.
    pub fn from_reader<R: Read>(reader: R) -> PipeResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| PipeError::catalog(0, format!("cannot read header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();
        if !headers.iter().any(|h| h == SIZE_COLUMN) {
            return Err(PipeError::catalog(0, format!("header has no '{SIZE_COLUMN}' column")));
        }

        let mut catalog = Self::default();
        for (i, record) in csv_reader.records().enumerate() {
            let index = i + 1;
            let record = record.map_err(|e| PipeError::catalog(index, e.to_string()))?;
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            let row = CatalogRow { index, fields };
            let size = row.text(SIZE_COLUMN)?.to_string();
            if catalog.by_size.contains_key(&size) {
                debug!(size = %size, row = index, "Duplicate catalog size, keeping first");
            } else {
                catalog.by_size.insert(size, catalog.rows.len());
            }
            catalog.rows.push(row);
        }
        debug!(rows = catalog.rows.len(), "Parsed catalog");
        Ok(catalog)
    }

    /// Row for a nominal size.
    #[must_use]
    pub fn get(&self, size: &str) -> Option<&CatalogRow> {
        self.by_size.get(size).map(|&i| &self.rows[i])
    }

    /// Sizes in file order, duplicates included.
    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(CatalogRow::size)
    }

    /// All rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl PipeDims {
    /// Reads `PSize;OD;thk`; the length is chosen by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields.
    pub fn from_row(row: &CatalogRow, height: f64) -> PipeResult<Self> {
        Ok(Self::new(row.size(), row.f64("OD")?, row.f64("thk")?, height))
    }
}

impl ElbowDims {
    /// Reads `PSize;OD;thk;BendAngle;BendRadius`.
    ///
    /// A missing `BendAngle` defaults to 90 and a missing `BendRadius` to
    /// 0.75 OD.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields.
    pub fn from_row(row: &CatalogRow) -> PipeResult<Self> {
        let od = row.f64("OD")?;
        Ok(Self::new(
            row.size(),
            od,
            row.f64("thk")?,
            row.f64_or("BendAngle", 90.0)?,
            row.f64_or("BendRadius", 0.75 * od)?,
        ))
    }
}

impl TeeDims {
    /// Reads `PSize;OD;OD2;thk;thk2;C;M`. Branch columns are optional.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields.
    pub fn from_row(row: &CatalogRow) -> PipeResult<Self> {
        let od = row.f64("OD")?;
        let thk = row.f64("thk")?;
        let c = row.f64("C")?;
        let mut tee = Self::new(row.size(), od, thk, c);
        tee.od2 = row.get("OD2").map(|_| row.f64("OD2")).transpose()?;
        tee.thk2 = row.get("thk2").map(|_| row.f64("thk2")).transpose()?;
        tee.m = row.get("M").map(|_| row.f64("M")).transpose()?;
        Ok(tee)
    }
}

impl ReducerDims {
    /// Reads `PSize;OD;OD2;thk;thk2;H`, where `OD2` and `thk2` list every
    /// available minor size separated by `>` and `choice` selects one.
    ///
    /// A missing `thk2` entry falls back to `thk`; a missing or zero `H`
    /// derives the length from the diameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields, or a
    /// `choice` past the end of the `OD2` list.
    pub fn from_row(row: &CatalogRow, choice: usize) -> PipeResult<Self> {
        let thk = row.f64("thk")?;
        let mut reducer = Self::new(row.size(), row.f64("OD")?, row.list_f64("OD2", choice)?, thk);
        if let Ok(thk2) = row.list_f64("thk2", choice) {
            reducer = reducer.with_minor_thk(thk2);
        }
        let height = row.f64_or("H", 0.0)?;
        if height > 0.0 {
            reducer = reducer.with_height(height);
        }
        Ok(reducer)
    }
}

impl CapDims {
    /// Reads `PSize;OD;thk`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields.
    pub fn from_row(row: &CatalogRow) -> PipeResult<Self> {
        Ok(Self::new(row.size(), row.f64("OD")?, row.f64("thk")?))
    }
}

impl FlangeDims {
    /// Reads `PSize;FlangeType;D;d;df;f;t;n` plus the optional raised face,
    /// weld-neck and socket columns. Missing optional columns read as zero.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields and
    /// [`PipeError::DimensionInconsistency`] for an unknown flange type.
    pub fn from_row(row: &CatalogRow) -> PipeResult<Self> {
        let kind: FlangeKind = row.text("FlangeType")?.parse()?;
        let n = row.f64("n")?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(PipeError::catalog(row.index(), format!("bolt count {n} is not a whole number")));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as u32;
        Ok(Self {
            kind,
            size: row.size().to_string(),
            d_outer: row.f64("D")?,
            bore: row.f64_or("d", 0.0)?,
            df: row.f64("df")?,
            f: row.f64("f")?,
            t: row.f64("t")?,
            n,
            trf: row.f64_or("trf", 0.0)?,
            drf: row.f64_or("drf", 0.0)?,
            twn: row.f64_or("twn", 0.0)?,
            dwn: row.f64_or("dwn", 0.0)?,
            odp: row.f64_or("ODp", 0.0)?,
            r: row.f64_or("R", 0.0)?,
            t1: row.f64_or("T1", 0.0)?,
            b2: row.f64_or("B2", 0.0)?,
            y: row.f64_or("Y", 0.0)?,
        })
    }
}

impl GasketDims {
    /// Reads `PSize;IRID;SEID;SEOD;CROD;SEthk;Rthk`. The pressure class is
    /// chosen by the caller, since one table covers a single class.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Catalog`] for missing or malformed fields.
    pub fn from_row(row: &CatalogRow, class: impl Into<String>) -> PipeResult<Self> {
        Ok(Self {
            size: row.size().to_string(),
            class: class.into(),
            irid: row.f64("IRID")?,
            seid: row.f64("SEID")?,
            seod: row.f64("SEOD")?,
            crod: row.f64("CROD")?,
            se_thk: row.f64("SEthk")?,
            r_thk: row.f64("Rthk")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REDUCERS: &str = "\
PSize;OD;OD2;thk;thk2;H
DN50;60.3;48.3>42.2>33.4;3.91;3.68>3.56;
DN80;88.9;60.3;5.49;;89
";

    fn parse(text: &str) -> Catalog {
        let Ok(catalog) = Catalog::from_reader(text.as_bytes()) else {
            panic!("catalog should parse");
        };
        catalog
    }

    #[test]
    fn test_rows_keyed_by_size() {
        let catalog = parse(REDUCERS);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.sizes().collect::<Vec<_>>(), vec!["DN50", "DN80"]);
        assert!(catalog.get("DN100").is_none());
        let Some(row) = catalog.get("DN80") else {
            panic!("DN80 row");
        };
        assert_eq!(row.index(), 2);
        assert_relative_eq!(row.f64_or("H", 0.0).unwrap_or_default(), 89.0);
    }

    #[test]
    fn test_reducer_list_choice() {
        let catalog = parse(REDUCERS);
        let Some(row) = catalog.get("DN50") else {
            panic!("DN50 row");
        };
        let Ok(reducer) = ReducerDims::from_row(row, 1) else {
            panic!("second reduction should read");
        };
        assert_relative_eq!(reducer.od2, 42.2);
        assert_eq!(reducer.thk2, Some(3.56));
        assert_eq!(reducer.height, None);

        // thk2 has only two entries, so the third falls back to thk.
        let Ok(reducer) = ReducerDims::from_row(row, 2) else {
            panic!("third reduction should read");
        };
        assert_eq!(reducer.thk2, None);
        assert!(ReducerDims::from_row(row, 3).is_err());
    }

    #[test]
    fn test_missing_and_malformed_fields() {
        let catalog = parse("PSize;OD;thk\nDN50;abc;3\nDN80;88.9;\n");
        let rows = catalog.rows();
        let err = PipeDims::from_row(&rows[0], 100.0);
        assert!(matches!(err, Err(PipeError::Catalog { row: 1, .. })));
        let err = CapDims::from_row(&rows[1]);
        assert!(matches!(err, Err(PipeError::Catalog { row: 2, ref reason }) if reason.contains("thk")));
    }

    #[test]
    fn test_header_without_size_column() {
        let result = Catalog::from_reader("OD;thk\n60.3;3\n".as_bytes());
        assert!(matches!(result, Err(PipeError::Catalog { row: 0, .. })));
    }

    #[test]
    fn test_flange_optional_columns() {
        let catalog = parse(
            "PSize;FlangeType;D;d;df;f;t;n;trf;drf\nDN50;wn;165;61.1;125;18;20;4;2;102\n",
        );
        let Some(row) = catalog.get("DN50") else {
            panic!("DN50 row");
        };
        let Ok(flange) = FlangeDims::from_row(row) else {
            panic!("flange should read");
        };
        assert_eq!(flange.kind, FlangeKind::WeldNeck);
        assert_eq!(flange.n, 4);
        assert_relative_eq!(flange.drf, 102.0);
        assert_relative_eq!(flange.twn, 0.0);
    }

    #[test]
    fn test_elbow_defaults() {
        let catalog = parse("PSize;OD;thk\nDN50;60.3 mm;3.91\n");
        let Some(row) = catalog.get("DN50") else {
            panic!("DN50 row");
        };
        let Ok(elbow) = ElbowDims::from_row(row) else {
            panic!("elbow should read");
        };
        assert_relative_eq!(elbow.od, 60.3);
        assert_relative_eq!(elbow.bend_angle, 90.0);
        assert_relative_eq!(elbow.bend_radius, 0.75 * 60.3);
    }

    #[test]
    fn test_gasket_and_tee() {
        let catalog = parse(
            "PSize;IRID;SEID;SEOD;CROD;SEthk;Rthk\nDN50;55.6;69.9;85.9;104.9;4.5;3.2\n",
        );
        let Some(row) = catalog.get("DN50") else {
            panic!("DN50 row");
        };
        let Ok(gasket) = GasketDims::from_row(row, "300lb") else {
            panic!("gasket should read");
        };
        assert_eq!(gasket.class, "300lb");
        assert_relative_eq!(gasket.crod, 104.9);

        let catalog = parse("PSize;OD;thk;C\nDN150;168.27;7.11;178\n");
        let Some(row) = catalog.get("DN150") else {
            panic!("DN150 row");
        };
        let Ok(tee) = TeeDims::from_row(row) else {
            panic!("tee should read");
        };
        assert_eq!(tee.od2, None);
        assert_relative_eq!(tee.branch_od(), 168.27);
    }
}
