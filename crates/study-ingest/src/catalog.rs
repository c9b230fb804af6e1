//! Data product catalog: which export and dictionary files belong to each
//! data product, and how its rows are indexed.

use std::path::Path;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

const COLUMN_PRODUCT: &str = "Data Product Name";
const COLUMN_DATA_FILE: &str = "Data File Name";
const COLUMN_DICT_FILE: &str = "Data Dictionary File Name";
const COLUMN_INDEX_FIELDS: &str = "Index Fields";
const COLUMN_DESCRIPTION: &str = "Data Product Description";

/// One catalog row describing a data product.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub name: String,
    /// Filename pattern matched against export files.
    pub data_file_name: String,
    pub dictionary_file_name: String,
    /// Index column names, `;`-separated in the catalog file.
    pub index_fields: Vec<String>,
    pub description: String,
}

/// The parsed data catalog, in file order.
#[derive(Debug, Clone, Default)]
pub struct DataCatalog {
    products: Vec<CatalogProduct>,
}

impl DataCatalog {
    pub fn product(&self, name: &str) -> Result<&CatalogProduct> {
        self.products
            .iter()
            .find(|product| product.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| IngestError::UnknownProduct {
                product: name.to_string(),
            })
    }

    /// Product names excluding the participant-information and baseline
    /// entries, which are handled by dedicated loaders.
    pub fn longitudinal_products(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|product| product.name.as_str())
            .filter(|name| {
                !name.eq_ignore_ascii_case("Participant Information")
                    && !name.eq_ignore_ascii_case("Baseline Survey")
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.iter()
    }
}

/// Load the data catalog CSV.
pub fn read_catalog(path: &Path) -> Result<DataCatalog> {
    let table = read_csv_table(path)?;
    let product_idx = require(path, &table, COLUMN_PRODUCT)?;
    let data_idx = require(path, &table, COLUMN_DATA_FILE)?;
    let dict_idx = require(path, &table, COLUMN_DICT_FILE)?;
    let index_idx = require(path, &table, COLUMN_INDEX_FIELDS)?;
    let description_idx = table.column_index(COLUMN_DESCRIPTION);

    let mut products = Vec::with_capacity(table.height());
    for row in &table.rows {
        let name = row.get(product_idx).map(|v| v.trim()).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let index_fields = row
            .get(index_idx)
            .map(String::as_str)
            .unwrap_or("")
            .split(';')
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty())
            .collect();
        products.push(CatalogProduct {
            name: name.to_string(),
            data_file_name: row.get(data_idx).map(|v| v.trim().to_string()).unwrap_or_default(),
            dictionary_file_name: row
                .get(dict_idx)
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            index_fields,
            description: description_idx
                .and_then(|idx| row.get(idx))
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
        });
    }
    Ok(DataCatalog { products })
}

fn require(path: &Path, table: &CsvTable, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}
