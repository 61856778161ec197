//! Relation deduplication
//!
//! Redundant association rows describe the same gene/variant-trait
//! pair more than once. Before relations are attached to the document,
//! collapse those that are structurally equivalent: same relation
//! `type` and same unordered set of node refids. First occurrence wins.

use std::collections::HashSet;

use gva_core::BiocRelation;

/// Key a relation by its `type` infon and sorted node refids
fn equivalence_key(relation: &BiocRelation) -> (String, Vec<String>) {
    let mut refids: Vec<String> = relation.nodes.iter().map(|n| n.refid.clone()).collect();
    refids.sort();
    (
        relation.relation_type().unwrap_or_default().to_string(),
        refids,
    )
}

/// Drop structurally duplicate relations, keeping the first of each
/// equivalence class. Idempotent.
pub fn dedupe_relations(relations: Vec<BiocRelation>) -> Vec<BiocRelation> {
    let mut seen: HashSet<(String, Vec<String>)> = HashSet::new();
    relations
        .into_iter()
        .filter(|relation| seen.insert(equivalence_key(relation)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn relation(id: &str, relation_type: &str, refids: &[&str]) -> BiocRelation {
        let mut r = BiocRelation::new(id).with_infon("type", relation_type);
        for refid in refids {
            r = r.with_node(*refid, "");
        }
        r
    }

    #[test]
    fn collapses_same_type_and_node_set() {
        let relations = vec![
            relation("R0", "GeneticVariant_Trait", &["T0", "V0"]),
            relation("R1", "GeneticVariant_Trait", &["V0", "T0"]), // node order irrelevant
            relation("R2", "GeneticVariant_Trait", &["T1", "V0"]),
        ];

        let deduped = dedupe_relations(relations);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, "R0"); // first occurrence wins
        assert_eq!(deduped[1].id, "R2");
    }

    #[test]
    fn same_nodes_different_type_are_distinct() {
        let relations = vec![
            relation("R0", "Gene_Trait", &["T0", "G0"]),
            relation("R1", "GeneticVariant_Trait", &["T0", "G0"]),
        ];
        assert_eq!(dedupe_relations(relations).len(), 2);
    }

    fn arbitrary_relation() -> impl Strategy<Value = BiocRelation> {
        (
            0usize..100,
            prop::sample::select(vec!["Gene_Trait", "GeneticVariant_Trait"]),
            prop::collection::vec((0usize..4, 0usize..3), 1..3),
        )
            .prop_map(|(n, relation_type, nodes)| {
                let mut r = BiocRelation::new(format!("R{n}")).with_infon("type", relation_type);
                for (kind, i) in nodes {
                    let prefix = ["T", "V", "G", "P"][kind];
                    r = r.with_node(format!("{prefix}{i}"), "");
                }
                r
            })
    }

    proptest! {
        /// Running the deduplicator on its own output changes nothing.
        #[test]
        fn dedupe_is_idempotent(relations in prop::collection::vec(arbitrary_relation(), 0..32)) {
            let once = dedupe_relations(relations);
            let once_ids: Vec<String> = once.iter().map(|r| r.id.clone()).collect();
            let twice = dedupe_relations(once);
            let twice_ids: Vec<String> = twice.iter().map(|r| r.id.clone()).collect();
            prop_assert_eq!(once_ids, twice_ids);
        }

        /// Each surviving equivalence class appears exactly once.
        #[test]
        fn no_duplicate_keys_survive(relations in prop::collection::vec(arbitrary_relation(), 0..32)) {
            let deduped = dedupe_relations(relations);
            let keys: Vec<_> = deduped.iter().map(equivalence_key).collect();
            let distinct: HashSet<_> = keys.iter().cloned().collect();
            prop_assert_eq!(keys.len(), distinct.len());
        }
    }
}
