// ── Export / import ──
//
// Client-side export writes exactly the visible rows as CSV. Server-side
// export and import go through the entity's bulk endpoints; an import
// is followed by a list refresh.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use rxdesk_api::{FilePart, ImportSummary, ListQuery, Record};

use crate::catalog::Entity;
use crate::error::CoreError;
use crate::list::ListController;
use crate::model::Column;
use crate::resource::RecordApi;

/// Spreadsheet extensions the bulk import endpoints accept.
pub const IMPORT_EXTENSIONS: &[&str] = &["xls", "xlsx"];

/// A file written to disk by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub path: PathBuf,
    /// Data rows written (header excluded). `None` for server exports.
    pub rows: Option<usize>,
}

/// `<entity>_<YYYYMMDD_HHMMSS>.csv`
pub fn export_file_name(entity: Entity, at: NaiveDateTime) -> String {
    format!("{entity}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write a header row plus one row per record. Returns the data row count.
pub fn write_csv<'a, W: io::Write>(
    columns: &[Column],
    rows: impl IntoIterator<Item = &'a Record>,
    writer: W,
) -> Result<usize, CoreError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns.iter().map(|c| c.header))?;
    let mut written = 0;
    for row in rows {
        out.write_record(columns.iter().map(|c| c.render(row)))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Export the list's visible rows to a timestamped CSV in `dir`.
pub fn export_visible<A: RecordApi>(
    list: &ListController<A>,
    dir: &Path,
) -> Result<Exported, CoreError> {
    let entity = list.entity();
    let rows = list.visible();
    let path = dir.join(export_file_name(entity, Local::now().naive_local()));
    let file = std::fs::File::create(&path)?;
    let written = write_csv(entity.columns(), &rows, file)?;
    info!(%entity, rows = written, path = %path.display(), "exported visible rows");
    Ok(Exported {
        path,
        rows: Some(written),
    })
}

/// Save the server-rendered spreadsheet for `query` into `dir`.
pub async fn download_export<A: RecordApi>(
    api: &A,
    query: &ListQuery,
    dir: &Path,
) -> Result<Exported, CoreError> {
    let download = api.bulk_export(query).await?;
    // Only the final component of a server-supplied name is trusted.
    let file_name = Path::new(&download.file_name)
        .file_name()
        .map_or_else(|| api.spec().export_file_name().into(), ToOwned::to_owned);
    let path = dir.join(file_name);
    std::fs::write(&path, &download.bytes)?;
    info!(entity = api.spec().entity, bytes = download.bytes.len(), path = %path.display(), "saved server export");
    Ok(Exported { path, rows: None })
}

/// Reject anything that is not an `.xls`/`.xlsx` file before upload.
pub fn check_import_file(path: &Path) -> Result<(), CoreError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if IMPORT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedFile {
            file_name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            expected: ".xls or .xlsx",
        })
    }
}

/// Upload a spreadsheet, then refresh the list.
///
/// A failed refresh is logged and left in the list state; the import
/// itself already succeeded.
pub async fn import_file<A: RecordApi>(
    list: &ListController<A>,
    path: &Path,
) -> Result<ImportSummary, CoreError> {
    check_import_file(path)?;
    let file = FilePart::from_path("file", path)?;
    let summary = list.api().bulk_import(file).await?;
    info!(
        entity = %list.entity(),
        created = summary.created,
        updated = summary.updated,
        failed = summary.failed,
        "import accepted"
    );
    if let Err(err) = list.refresh().await {
        warn!(entity = %list.entity(), error = %err, "refresh after import failed");
    }
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_name_has_entity_and_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(
            export_file_name(Entity::TcsRecords, at),
            "tcs-records_20240601_090507.csv"
        );
    }

    #[test]
    fn import_accepts_only_spreadsheets() {
        assert!(check_import_file(Path::new("/tmp/products.XLSX")).is_ok());
        assert!(check_import_file(Path::new("stock.xls")).is_ok());
        let err = check_import_file(Path::new("/tmp/products.csv")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file 'products.csv': expected .xls or .xlsx"
        );
        assert!(check_import_file(Path::new("README")).is_err());
    }

    #[test]
    fn empty_export_is_header_only() {
        let mut out = Vec::new();
        let n = write_csv(Entity::Faqs.columns(), [], &mut out).unwrap();
        assert_eq!(n, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "ID,Question,Category,Status\n");
    }
}
