//! Deep merge for config documents.
//!
//! Config is composed from up to three layers (file, environment, remote),
//! merged pairwise left-to-right. That order is fixed policy: pairwise
//! merging is not associative across three layers, so reordering would
//! change which layer wins ties.

use serde_yaml::Value;

/// Merge `overlay` over `base`, right-biased.
///
/// For every key in the overlay: if both sides hold mappings, merge them
/// recursively; otherwise the overlay value replaces the base value
/// entirely (a mapping may be replaced by a scalar and vice versa). Keys
/// present only in the base are preserved. Neither input is mutated.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut out = base.clone();
    let Value::Mapping(overlay) = overlay else {
        return out;
    };

    let Value::Mapping(out_map) = &mut out else {
        // Base isn't a mapping at this level: overlay replaces it wholesale.
        return Value::Mapping(overlay.clone());
    };

    for (key, value) in overlay {
        let merged = match (out_map.get(key), value) {
            (Some(existing @ Value::Mapping(_)), Value::Mapping(_)) => deep_merge(existing, value),
            _ => value.clone(),
        };
        out_map.insert(key.clone(), merged);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn base_only_keys_survive() {
        let base = yaml("a: 1\nb: 2");
        let overlay = yaml("b: 3");

        let out = deep_merge(&base, &overlay);

        assert_eq!(out["a"], yaml("1"));
        assert_eq!(out["b"], yaml("3"));
    }

    #[test]
    fn overlay_only_keys_appear() {
        let base = yaml("a: 1");
        let overlay = yaml("c: hello");

        let out = deep_merge(&base, &overlay);

        assert_eq!(out["a"], yaml("1"));
        assert_eq!(out["c"], yaml("hello"));
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = yaml("rtt:\n  base_url: https://api.rtt.io\n  username: alice");
        let overlay = yaml("rtt:\n  password: hunter2");

        let out = deep_merge(&base, &overlay);

        assert_eq!(out["rtt"]["base_url"], yaml("https://api.rtt.io"));
        assert_eq!(out["rtt"]["username"], yaml("alice"));
        assert_eq!(out["rtt"]["password"], yaml("hunter2"));
    }

    #[test]
    fn scalar_replaces_mapping_and_vice_versa() {
        let base = yaml("x:\n  nested: true");
        let overlay = yaml("x: 5");
        assert_eq!(deep_merge(&base, &overlay)["x"], yaml("5"));

        let base = yaml("x: 5");
        let overlay = yaml("x:\n  nested: true");
        assert_eq!(deep_merge(&base, &overlay)["x"]["nested"], yaml("true"));
    }

    #[test]
    fn null_overlay_value_clears_key() {
        let base = yaml("defaults:\n  national_rail:\n    to_crs: LST");
        let overlay = yaml("defaults:\n  national_rail:\n    to_crs: null");

        let out = deep_merge(&base, &overlay);

        assert!(out["defaults"]["national_rail"]["to_crs"].is_null());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let base = yaml("a:\n  b: 1");
        let overlay = yaml("a:\n  b: 2\n  c: 3");
        let base_before = base.clone();
        let overlay_before = overlay.clone();

        let _ = deep_merge(&base, &overlay);

        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn layer_order_is_right_biased() {
        // file -> env -> remote: the rightmost layer wins the tie.
        let file = yaml("ui:\n  font_size: 22");
        let env = yaml("ui:\n  font_size: 18");
        let remote = yaml("ui:\n  font_size: 16");

        let merged = deep_merge(&deep_merge(&file, &env), &remote);

        assert_eq!(merged["ui"]["font_size"], yaml("16"));
    }
}
