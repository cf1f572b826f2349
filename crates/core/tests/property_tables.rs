use std::collections::{BTreeSet, HashSet};
use std::fs;

use fpxref_core::{
    assign_identifiers, build_cross_reference, select_files, SelectedFile, Warnings,
};
use proptest::prelude::*;
use tempfile::tempdir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn selection_is_smallest_prefix_within_budget(
        sizes in prop::collection::vec(0usize..300, 0..12),
        budget in 0u64..2_000,
    ) {
        let dir = tempdir().unwrap();
        for (idx, size) in sizes.iter().enumerate() {
            fs::write(dir.path().join(format!("{idx:03}.txt")), vec![b'x'; *size]).unwrap();
        }

        let selection = select_files(dir.path(), budget).unwrap();
        let picked: u64 = selection.files.iter().map(|f| f.size).sum();
        prop_assert_eq!(picked, selection.total_bytes);
        prop_assert!(picked <= budget);

        let mut sorted: Vec<(u64, String)> = sizes
            .iter()
            .enumerate()
            .map(|(idx, size)| (*size as u64, format!("{idx:03}.txt")))
            .collect();
        sorted.sort();
        let expected: Vec<String> = sorted
            .iter()
            .take(selection.len())
            .map(|(_, name)| name.clone())
            .collect();
        let actual: Vec<String> = selection.files.iter().map(|f| f.name.clone()).collect();
        prop_assert_eq!(actual, expected);

        let total: u64 = sizes.iter().map(|s| *s as u64).sum();
        prop_assert_eq!(selection.budget_exhausted, total > budget);
        if let Some((next, _)) = sorted.get(selection.len()) {
            prop_assert!(picked + next > budget);
        }
    }

    #[test]
    fn every_attribute_gets_one_id_and_rows_only_use_known_ids(
        files in prop::collection::vec(
            prop::collection::vec("[a-e]{1,2}@x\\.org", 0..6),
            1..8,
        ),
    ) {
        let dir = tempdir().unwrap();
        let mut selected = Vec::new();
        for (idx, attrs) in files.iter().enumerate() {
            let name = format!("{}.txt", idx + 1);
            let path = dir.path().join(&name);
            let mut content = format!("/subject/{idx}\n");
            for attr in attrs {
                content.push_str(attr);
                content.push('\n');
            }
            fs::write(&path, &content).unwrap();
            selected.push(SelectedFile { name, path, size: content.len() as u64 });
        }

        let mut warnings = Warnings::new();
        let tables = assign_identifiers(&selected, &mut warnings).unwrap();
        let xref = build_cross_reference(&tables, &mut warnings).unwrap();
        prop_assert!(warnings.is_empty());

        let distinct: HashSet<&String> = files.iter().flatten().collect();
        prop_assert_eq!(tables.attributes.len(), distinct.len());
        let ids: BTreeSet<u64> = tables.attributes.values().copied().collect();
        prop_assert_eq!(ids, (1..=distinct.len() as u64).collect::<BTreeSet<_>>());

        prop_assert_eq!(xref.len(), files.len());
        for (path_id, attribute_ids) in xref.iter() {
            let attrs = &files[(path_id - 1) as usize];
            prop_assert_eq!(attribute_ids.len(), attrs.len());
            for (id, value) in attribute_ids.iter().zip(attrs) {
                prop_assert_eq!(tables.attribute_id(value), Some(*id));
            }
        }
    }
}
