use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use fpxref_index::{
    CrossRefWriter, IdTableWriter, ATTRIBUTE_TABLE_FILE, CROSS_REF_FILE, PATH_TABLE_FILE,
};
use serde::Serialize;
use tracing::info;

use crate::assign::LookupTables;
use crate::crossref::CrossReference;
use crate::error::{Result, XrefError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFiles {
    pub path_table: PathBuf,
    pub attribute_table: PathBuf,
    pub cross_refs: PathBuf,
}

/// Writes the three lookup files into `output_dir`, which must exist.
///
/// Files are written in place; a failure part way through can leave a
/// partial set behind.
pub fn write_lookups(
    output_dir: &Path,
    tables: &LookupTables,
    xref: &CrossReference,
) -> Result<WrittenFiles> {
    let meta = fs::metadata(output_dir).map_err(|err| XrefError::io_at(output_dir, err))?;
    if !meta.is_dir() {
        return Err(XrefError::NotADirectory(output_dir.to_path_buf()));
    }

    let path_table = output_dir.join(PATH_TABLE_FILE);
    let mut writer = IdTableWriter::new(create(&path_table)?);
    for (id, path) in tables.paths_by_id() {
        writer.write_entry(id, path)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    info!(file = %path_table.display(), rows, "path table written");

    let attribute_table = output_dir.join(ATTRIBUTE_TABLE_FILE);
    let mut writer = IdTableWriter::new(create(&attribute_table)?);
    for (id, value) in tables.attributes_by_id() {
        writer.write_entry(id, value)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    info!(file = %attribute_table.display(), rows, "attribute table written");

    let cross_refs = output_dir.join(CROSS_REF_FILE);
    let mut writer = CrossRefWriter::new(create(&cross_refs)?);
    for (path_id, attribute_ids) in xref.iter() {
        writer.write_row(path_id, attribute_ids)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    info!(file = %cross_refs.display(), rows, "cross-reference table written");

    Ok(WrittenFiles {
        path_table,
        attribute_table,
        cross_refs,
    })
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|err| XrefError::io_at(path, err))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_tables() -> (LookupTables, CrossReference) {
        let mut tables = LookupTables::default();
        tables.paths.insert("/mail/b".to_string(), 20);
        tables.paths.insert("/mail/a".to_string(), 3);
        tables.attributes.insert("z@x.org".to_string(), 2);
        tables.attributes.insert("a@x.org".to_string(), 1);
        let mut xref = CrossReference::default();
        xref.insert(20, vec![2, 1, 2]);
        xref.insert(3, vec![]);
        (tables, xref)
    }

    #[test]
    fn writes_sorted_id_tables_and_ordered_rows() {
        let dir = tempdir().unwrap();
        let (tables, xref) = sample_tables();
        let written = write_lookups(dir.path(), &tables, &xref).unwrap();

        assert_eq!(
            fs::read_to_string(&written.path_table).unwrap(),
            "3\t/mail/a\n20\t/mail/b\n"
        );
        assert_eq!(
            fs::read_to_string(&written.attribute_table).unwrap(),
            "1\ta@x.org\n2\tz@x.org\n"
        );
        assert_eq!(
            fs::read_to_string(&written.cross_refs).unwrap(),
            "20 2 1 2 \n3 \n"
        );
        assert!(written.cross_refs.ends_with(CROSS_REF_FILE));
    }

    #[test]
    fn missing_output_dir_is_not_found() {
        let dir = tempdir().unwrap();
        let (tables, xref) = sample_tables();
        let err = write_lookups(&dir.path().join("missing"), &tables, &xref).unwrap_err();
        assert!(matches!(err, XrefError::NotFound(_)));
    }

    #[test]
    fn empty_tables_produce_empty_files() {
        let dir = tempdir().unwrap();
        let written =
            write_lookups(dir.path(), &LookupTables::default(), &CrossReference::default())
                .unwrap();
        assert_eq!(fs::read_to_string(written.path_table).unwrap(), "");
        assert_eq!(fs::read_to_string(written.attribute_table).unwrap(), "");
        assert_eq!(fs::read_to_string(written.cross_refs).unwrap(), "");
    }
}
