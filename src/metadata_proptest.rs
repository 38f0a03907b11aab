//! Property-based tests for build metadata aggregation and exclusion matching.
//!
//! These tests use proptest to generate random manifests and verify that
//! invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{BuildSection, CacheEntry, CacheValue, Flag, Manifest, ModuleEntry};
    use crate::path::ExclusionSet;
    use crate::phases::build_script::{render, BuildMetadata};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn cache_manifest(entries: &[(String, String, String)]) -> Manifest {
        Manifest {
            cmake: Some(BuildSection {
                cache: entries
                    .iter()
                    .map(|(name, kind, value)| CacheEntry {
                        name: name.clone(),
                        kind: kind.clone(),
                        value: CacheValue::Text(value.clone()),
                    })
                    .collect(),
            }),
            ..Manifest::default()
        }
    }

    fn module(name: &str, cs: bool, python: bool) -> ModuleEntry {
        ModuleEntry {
            entry: Default::default(),
            name: Some(name.to_string()),
            cswrap: Some(Flag::Bool(cs)),
            pythonwrap: Some(Flag::Bool(python)),
        }
    }

    fn cache_entry() -> impl Strategy<Value = (String, String, String)> {
        (
            "[A-C]",
            prop::sample::select(vec!["STRING", "BOOL"]),
            "[a-z0-9]{1,4}",
        )
            .prop_map(|(name, kind, value)| (name, kind.to_string(), value))
    }

    // ============================================================================
    // cache entry property tests
    // ============================================================================

    proptest! {
        /// Property: the effective value of a key is the one declared last
        #[test]
        fn cache_last_declaration_wins(
            manifests in prop::collection::vec(prop::collection::vec(cache_entry(), 0..5), 1..5)
        ) {
            let parsed: Vec<Manifest> = manifests.iter().map(|m| cache_manifest(m)).collect();
            let metadata = BuildMetadata::collect(&parsed);

            let mut expected = HashMap::new();
            for (name, kind, value) in manifests.iter().flatten() {
                expected.insert(format!("{}:{}", name, kind), value.clone());
            }

            prop_assert_eq!(metadata.cache().count(), expected.len());
            for (key, value) in &expected {
                prop_assert_eq!(metadata.cache_value(key), Some(value.as_str()));
                let flag = format!("  -D{}={} \\\n", key, value);
                prop_assert!(render(&metadata, "v0").contains(&flag));
            }
        }

        /// Property: cache keys appear in the order they were first declared
        #[test]
        fn cache_keys_keep_first_seen_order(
            entries in prop::collection::vec(cache_entry(), 0..12)
        ) {
            let metadata = BuildMetadata::collect([&cache_manifest(&entries)]);

            let mut first_seen: Vec<String> = Vec::new();
            for (name, kind, _) in &entries {
                let key = format!("{}:{}", name, kind);
                if !first_seen.contains(&key) {
                    first_seen.push(key);
                }
            }
            let keys: Vec<String> = metadata.cache().map(|(key, _)| key.to_string()).collect();
            prop_assert_eq!(keys, first_seen);
        }

        /// Property: wrapped module lists are duplicate free and deterministic
        #[test]
        fn wrap_lists_are_unique_and_stable(
            modules in prop::collection::vec(("[a-d]", any::<bool>(), any::<bool>()), 0..12)
        ) {
            let manifest = Manifest {
                modules: modules.iter().map(|(name, cs, py)| module(name, *cs, *py)).collect(),
                ..Manifest::default()
            };
            let first = BuildMetadata::collect([&manifest]);
            let second = BuildMetadata::collect([&manifest]);
            prop_assert_eq!(&first, &second);

            for list in [first.cs_modules(), first.python_modules()] {
                let mut deduped = list.to_vec();
                deduped.sort();
                deduped.dedup();
                prop_assert_eq!(deduped.len(), list.len());
            }

            for (name, cs, _) in &modules {
                if *cs {
                    prop_assert!(first.cs_modules().contains(name));
                }
            }
        }
    }

    // ============================================================================
    // exclusion property tests
    // ============================================================================

    proptest! {
        /// Property: a literal pattern always excludes the path it names
        #[test]
        fn literal_pattern_excludes_itself(name in "[a-zA-Z0-9_]{1,12}(\\.[a-z]{1,3})?") {
            let set = ExclusionSet::from_patterns([name.as_str()]).unwrap();
            prop_assert!(set.matches(&name, &[]));
        }

        /// Property: the wildcard excludes every non-empty file name
        #[test]
        fn wildcard_excludes_everything(name in "[^/]{1,20}") {
            let set = ExclusionSet::from_patterns(["*"]).unwrap();
            prop_assert!(set.matches(&name, &[]));
        }
    }
}
