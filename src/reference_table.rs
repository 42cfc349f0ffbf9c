//! This module reads the CSV reference tables that defaults are derived from.
//!
//! A capacity table has one row per rated capacity (kW) and one column per equipment type. A
//! parameter table has one row per output parameter and one column per size class. In both, cells
//! may use thousands separators and blank cells are missing values.

use crate::equipment::EquipmentType;
use crate::errors::{ChpDefaultsError, MalformedCellError};
use anyhow::bail;
use csv::{ReaderBuilder as CsvReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use itertools::Itertools;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct CapacityTable {
    name: String,
    capacities: Vec<f64>,
    columns: IndexMap<String, Vec<Option<f64>>>,
}

impl CapacityTable {
    pub fn from_path(path: &Path) -> Result<Self, ChpDefaultsError> {
        read_table(path, |csv, name| Self::from_reader(name, csv))
    }

    pub fn from_reader(name: impl Into<String>, csv: impl Read) -> anyhow::Result<Self> {
        let (headers, records) = read_records(csv)?;

        let column_names = headers.iter().skip(1).map(String::from).collect::<Vec<_>>();
        if let Some(column) = column_names.iter().duplicates().next() {
            bail!("Column {column:?} appears more than once");
        }
        let mut capacities = Vec::with_capacity(records.len());
        let mut columns: IndexMap<String, Vec<Option<f64>>> = column_names
            .iter()
            .map(|column| (column.clone(), Vec::with_capacity(records.len())))
            .collect();

        for (row, record) in records.iter().enumerate() {
            let Some(capacity) = parse_cell(record.get(0).unwrap_or_default(), row, &headers[0])?
            else {
                bail!("Row {row} has no capacity in its first column");
            };
            capacities.push(capacity);
            for (column, raw) in column_names.iter().zip(record.iter().skip(1)) {
                columns[column].push(parse_cell(raw, row, column)?);
            }
        }

        Ok(Self {
            name: name.into(),
            capacities,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacities(&self) -> &[f64] {
        &self.capacities
    }

    pub fn has_column(&self, equipment_type: EquipmentType) -> bool {
        self.columns.contains_key(equipment_type.column_name())
    }

    /// The values for an equipment type, one per row. A table without a column for the equipment
    /// type yields all missing values.
    pub fn values_for(&self, equipment_type: EquipmentType) -> Vec<Option<f64>> {
        self.columns
            .get(equipment_type.column_name())
            .cloned()
            .unwrap_or_else(|| vec![None; self.capacities.len()])
    }

    /// The value for an equipment type at exactly the given capacity, if the table has one.
    pub fn value_at(&self, equipment_type: EquipmentType, capacity_kw: f64) -> Option<f64> {
        let column = self.columns.get(equipment_type.column_name())?;
        self.capacities
            .iter()
            .position(|&capacity| capacity == capacity_kw)
            .and_then(|row| column[row])
    }

    /// A new table with every value divided by the capacity of its row, e.g. to turn a cost per
    /// hour into a cost per kWh of rated output.
    pub fn divide_by_index(&self, name: impl Into<String>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|(column, values)| {
                let divided = values
                    .iter()
                    .zip(&self.capacities)
                    .map(|(value, capacity)| value.map(|value| value / capacity))
                    .collect();
                (column.clone(), divided)
            })
            .collect();

        Self {
            name: name.into(),
            capacities: self.capacities.clone(),
            columns,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterTable {
    name: String,
    class_count: usize,
    rows: IndexMap<String, Vec<Option<f64>>>,
}

impl ParameterTable {
    pub fn from_path(path: &Path) -> Result<Self, ChpDefaultsError> {
        read_table(path, |csv, name| Self::from_reader(name, csv))
    }

    pub fn from_reader(name: impl Into<String>, csv: impl Read) -> anyhow::Result<Self> {
        let (headers, records) = read_records(csv)?;

        let class_columns = headers.iter().skip(1).collect::<Vec<_>>();
        let mut rows = IndexMap::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let parameter = record.get(0).unwrap_or_default();
            if parameter.is_empty() {
                bail!("Row {row} has no parameter name in its first column");
            }
            let values = class_columns
                .iter()
                .zip(record.iter().skip(1))
                .map(|(column, raw)| parse_cell(raw, row, column))
                .collect::<Result<Vec<_>, _>>()?;
            if rows.insert(parameter.to_string(), values).is_some() {
                bail!("Parameter {parameter:?} appears more than once");
            }
        }

        Ok(Self {
            name: name.into(),
            class_count: class_columns.len(),
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of size class columns in the table.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.rows
            .iter()
            .map(|(parameter, values)| (parameter.as_str(), values.as_slice()))
    }
}

fn read_table<T>(
    path: &Path,
    parse: impl FnOnce(BufReader<File>, String) -> anyhow::Result<T>,
) -> Result<T, ChpDefaultsError> {
    let unreadable = |source: anyhow::Error| ChpDefaultsError::UnreadableTable {
        path: path.to_path_buf(),
        source,
    };
    let name = path
        .file_name()
        .map(|file_name| file_name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path).map_err(|error| unreadable(error.into()))?;

    parse(BufReader::new(file), name).map_err(unreadable)
}

fn read_records(csv: impl Read) -> anyhow::Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = CsvReaderBuilder::new().trim(Trim::All).from_reader(csv);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        bail!("Table has no header row");
    }
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    Ok((headers, records))
}

/// Reads a cell as a number, accepting thousands separators. Blank and NaN cells are missing.
fn parse_cell(raw: &str, row: usize, column: &str) -> Result<Option<f64>, MalformedCellError> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| MalformedCellError {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const CAPEX_CSV: &str = "\
Size (kW),recip_engine,micro_turbine
30,\"3,300\",\"3,900\"
60,,\"3,100\"
100,\"2,900\",
\"9,300\",\"1,450\",
";

    #[fixture]
    fn capex() -> CapacityTable {
        CapacityTable::from_reader("capex", Cursor::new(CAPEX_CSV)).unwrap()
    }

    #[rstest]
    fn test_reads_thousands_separated_values(capex: CapacityTable) {
        assert_eq!(capex.name(), "capex");
        assert_eq!(capex.capacities(), &[30., 60., 100., 9300.]);
        assert_eq!(
            capex.values_for(EquipmentType::RecipEngine),
            vec![Some(3300.), None, Some(2900.), Some(1450.)]
        );
        assert_eq!(
            capex.values_for(EquipmentType::MicroTurbine),
            vec![Some(3900.), Some(3100.), None, None]
        );
    }

    #[rstest]
    fn test_missing_column_is_all_missing(capex: CapacityTable) {
        assert!(!capex.has_column(EquipmentType::FuelCell));
        assert_eq!(capex.values_for(EquipmentType::FuelCell), vec![None; 4]);
        assert_eq!(capex.value_at(EquipmentType::FuelCell, 30.), None);
    }

    #[rstest]
    #[case(EquipmentType::RecipEngine, 9300., Some(1450.))]
    #[case(EquipmentType::RecipEngine, 60., None)]
    #[case(EquipmentType::RecipEngine, 65., None)]
    #[case(EquipmentType::MicroTurbine, 60., Some(3100.))]
    fn test_value_at_exact_capacity(
        capex: CapacityTable,
        #[case] equipment_type: EquipmentType,
        #[case] capacity_kw: f64,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(capex.value_at(equipment_type, capacity_kw), expected);
    }

    #[rstest]
    fn test_divide_by_index(capex: CapacityTable) {
        let per_kw = capex.divide_by_index("capex per kW");
        let values = per_kw.values_for(EquipmentType::RecipEngine);

        assert_eq!(per_kw.name(), "capex per kW");
        assert_relative_eq!(values[0].unwrap(), 110., max_relative = 1e-12);
        assert_eq!(values[1], None);
        assert_relative_eq!(values[3].unwrap(), 1450. / 9300., max_relative = 1e-12);
    }

    #[rstest]
    fn test_malformed_cell_is_an_error() {
        let csv = "Size (kW),fuel_cell\n30,n/a\n";
        let error = CapacityTable::from_reader("effic", Cursor::new(csv)).unwrap_err();
        assert!(error.to_string().contains("n/a"));
    }

    #[rstest]
    fn test_duplicate_column_is_an_error() {
        let csv = "Size (kW),recip_engine,recip_engine\n30,1,100\n60,2,200\n";
        let error = CapacityTable::from_reader("capex", Cursor::new(csv)).unwrap_err();
        assert!(error.to_string().contains("recip_engine"));
    }

    #[rstest]
    fn test_missing_file_names_path() {
        let path = Path::new("no/such/dir/CHP_CapEx_FactSheets.csv");
        let error = CapacityTable::from_path(path).unwrap_err();

        assert!(matches!(error, ChpDefaultsError::UnreadableTable { .. }));
        assert!(error.to_string().contains("CHP_CapEx_FactSheets.csv"));
    }

    #[rstest]
    fn test_parameter_table_keeps_row_order() {
        let csv = "\
parameter,class 0,class 1,class 2
installed_cost_us_dollars_per_kw,\"1,316\",\"1,960\",
om_cost_us_dollars_per_kwh,0.01,0.01,0.01
";
        let table = ParameterTable::from_reader("steam", Cursor::new(csv)).unwrap();
        let rows = table.rows().collect::<Vec<_>>();

        assert_eq!(table.class_count(), 3);
        assert_eq!(
            rows,
            vec![
                (
                    "installed_cost_us_dollars_per_kw",
                    &[Some(1316.), Some(1960.), None][..]
                ),
                (
                    "om_cost_us_dollars_per_kwh",
                    &[Some(0.01), Some(0.01), Some(0.01)][..]
                ),
            ]
        );
    }

    #[rstest]
    fn test_parameter_table_rejects_duplicate_rows() {
        let csv = "parameter,class 0\nmin_kw,0\nmin_kw,1\n";
        assert!(ParameterTable::from_reader("steam", Cursor::new(csv)).is_err());
    }
}
