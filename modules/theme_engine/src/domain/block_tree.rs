//! Conversion between persisted (flat, parent-pointer) blocks and the nested tree used
//! for editing and rendering.
//!
//! `nest(flatten(tree)) == tree` holds for every tree produced by [`nest`]: `nest` emits
//! positions equal to the sibling index and `flatten` assigns the same indices.

use crate::contract::{Block, BlockDefinition, NestedBlock};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

type Groups<'a> = HashMap<Option<Uuid>, Vec<&'a Block>>;

/// Build the block tree from flat rows.
///
/// Siblings are ordered by `position` (stable, so ties keep input order). Blocks whose
/// parent is absent are promoted to the top level; blocks caught in a parent cycle are
/// emitted as extra roots. No block is dropped.
pub fn nest(flat: &[Block]) -> Vec<NestedBlock> {
    let ids: HashSet<Uuid> = flat.iter().map(|block| block.id).collect();

    let mut groups: Groups<'_> = HashMap::new();
    for block in flat {
        let parent = block
            .parent_id
            .filter(|parent| *parent != block.id && ids.contains(parent));
        groups.entry(parent).or_default().push(block);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|block| block.position);
    }

    let mut visited = HashSet::with_capacity(flat.len());
    let mut roots = build_level(None, &groups, &mut visited);

    // Only cycles are unreachable from the roots at this point
    for block in flat {
        if visited.contains(&block.id) {
            continue;
        }
        tracing::warn!(block_id = %block.id, "block parent chain forms a cycle; promoting to root");
        let mut node = build_node(block, &groups, &mut visited);
        node.position = roots.len() as i32;
        roots.push(node);
    }

    roots
}

fn build_level(
    parent: Option<Uuid>,
    groups: &Groups<'_>,
    visited: &mut HashSet<Uuid>,
) -> Vec<NestedBlock> {
    let Some(group) = groups.get(&parent) else {
        return Vec::new();
    };

    let mut level = Vec::with_capacity(group.len());
    for block in group {
        if visited.contains(&block.id) {
            continue;
        }
        let mut node = build_node(block, groups, visited);
        node.position = level.len() as i32;
        level.push(node);
    }
    level
}

fn build_node(block: &Block, groups: &Groups<'_>, visited: &mut HashSet<Uuid>) -> NestedBlock {
    visited.insert(block.id);
    NestedBlock {
        id: block.id,
        block_type: block.block_type.clone(),
        settings: block.settings.clone(),
        enabled: block.enabled,
        position: block.position,
        children: build_level(Some(block.id), groups, visited),
    }
}

/// Flatten a block tree for storage: depth-first pre-order, positions renumbered from 0
/// within each sibling group, parent linkage recorded in `parent_id`.
pub fn flatten(nested: &[NestedBlock], section_id: Uuid) -> Vec<Block> {
    let mut out = Vec::with_capacity(count(nested));
    flatten_into(nested, section_id, None, &mut out);
    out
}

fn flatten_into(level: &[NestedBlock], section_id: Uuid, parent: Option<Uuid>, out: &mut Vec<Block>) {
    for (index, node) in level.iter().enumerate() {
        out.push(Block {
            id: node.id,
            section_id,
            parent_id: parent,
            block_type: node.block_type.clone(),
            position: index as i32,
            enabled: node.enabled,
            settings: node.settings.clone(),
        });
        flatten_into(&node.children, section_id, Some(node.id), out);
    }
}

/// Total number of blocks in a tree
pub fn count(nested: &[NestedBlock]) -> usize {
    nested
        .iter()
        .map(|node| 1 + count(&node.children))
        .sum()
}

/// Give package/preset block literals fresh ids and positions
pub fn instantiate(definitions: &[BlockDefinition]) -> Vec<NestedBlock> {
    definitions
        .iter()
        .enumerate()
        .map(|(index, def)| NestedBlock {
            id: Uuid::new_v4(),
            block_type: def.block_type.clone(),
            settings: def.settings.clone(),
            enabled: def.enabled,
            position: index as i32,
            children: instantiate(&def.children),
        })
        .collect()
}

/// Strip ids and positions, keeping sibling order
pub fn to_definitions(nested: &[NestedBlock]) -> Vec<BlockDefinition> {
    nested
        .iter()
        .map(|node| BlockDefinition {
            block_type: node.block_type.clone(),
            enabled: node.enabled,
            settings: node.settings.clone(),
            children: to_definitions(&node.children),
        })
        .collect()
}

/// Split a stored settings object into its plain settings and the block literals kept
/// under its `blocks` array.
///
/// Entries are `{"type", "settings"?, "enabled"?, "blocks"?}`; entries without a string
/// `type` are skipped. Non-object input comes back unchanged with no blocks.
pub fn split_nested_blocks(settings: &Value) -> (Value, Vec<BlockDefinition>) {
    let (plain, blocks) = split_identified_blocks(settings);
    (plain, to_definitions(&blocks))
}

/// Like [`split_nested_blocks`], but literals keep the `id` they carry. Literals without
/// a valid id get a fresh one.
pub fn split_identified_blocks(settings: &Value) -> (Value, Vec<NestedBlock>) {
    let Value::Object(map) = settings else {
        return (settings.clone(), Vec::new());
    };

    let mut plain = map.clone();
    let blocks = match plain.remove("blocks") {
        Some(Value::Array(items)) => parse_block_literals(&items),
        Some(other) => {
            // Not a block list; leave it where it was
            plain.insert("blocks".to_string(), other);
            Vec::new()
        }
        None => Vec::new(),
    };
    (Value::Object(plain), blocks)
}

/// Put a block tree back under `settings.blocks`, ids included. An empty tree leaves
/// `settings` without a `blocks` key.
pub fn embed_blocks(settings: &Value, blocks: &[NestedBlock]) -> Value {
    let mut map = match settings {
        Value::Object(map) => map.clone(),
        _ => Default::default(),
    };
    if !blocks.is_empty() {
        map.insert("blocks".to_string(), Value::Array(block_literals(blocks)));
    }
    Value::Object(map)
}

fn block_literals(blocks: &[NestedBlock]) -> Vec<Value> {
    blocks
        .iter()
        .map(|node| {
            let mut literal = serde_json::Map::new();
            literal.insert("id".to_string(), Value::String(node.id.to_string()));
            literal.insert("type".to_string(), Value::String(node.block_type.clone()));
            literal.insert("enabled".to_string(), Value::Bool(node.enabled));
            literal.insert("settings".to_string(), node.settings.clone());
            if !node.children.is_empty() {
                literal.insert("blocks".to_string(), Value::Array(block_literals(&node.children)));
            }
            Value::Object(literal)
        })
        .collect()
}

fn parse_block_literals(items: &[Value]) -> Vec<NestedBlock> {
    items
        .iter()
        .filter_map(|item| {
            let Some(block_type) = item.get("type").and_then(Value::as_str) else {
                tracing::warn!("skipping block literal without a type");
                return None;
            };
            let children = item
                .get("blocks")
                .and_then(Value::as_array)
                .map(|children| parse_block_literals(children))
                .unwrap_or_default();
            Some(NestedBlock {
                id: item
                    .get("id")
                    .and_then(Value::as_str)
                    .and_then(|id| Uuid::parse_str(id).ok())
                    .unwrap_or_else(Uuid::new_v4),
                block_type: block_type.to_string(),
                settings: item
                    .get("settings")
                    .filter(|settings| settings.is_object())
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default())),
                enabled: item.get("enabled").and_then(Value::as_bool).unwrap_or(true),
                position: 0,
                children,
            })
        })
        .enumerate()
        .map(|(index, mut node)| {
            node.position = index as i32;
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: Uuid, section_id: Uuid, parent_id: Option<Uuid>, position: i32, ty: &str) -> Block {
        Block {
            id,
            section_id,
            parent_id,
            block_type: ty.to_string(),
            position,
            enabled: true,
            settings: json!({ "label": ty }),
        }
    }

    /// xorshift64, enough to shape trees deterministically
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn below(&mut self, bound: u64) -> u64 {
            self.next() % bound
        }
    }

    fn random_level(rng: &mut Rng, depth: u32, budget: &mut u32) -> Vec<NestedBlock> {
        let width = rng.below(4);
        let mut level = Vec::new();
        for index in 0..width {
            if *budget == 0 {
                break;
            }
            *budget -= 1;
            let is_container = depth < 4 && rng.below(3) == 0;
            let block_type = if is_container { "container" } else { "text" };
            let children = if is_container {
                random_level(rng, depth + 1, budget)
            } else {
                Vec::new()
            };
            level.push(NestedBlock {
                id: Uuid::new_v4(),
                block_type: block_type.to_string(),
                settings: json!({ "n": rng.below(1000), "depth": depth }),
                enabled: rng.below(5) != 0,
                position: index as i32,
                children,
            });
        }
        level
    }

    #[test]
    fn test_round_trip_random_trees() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        for _ in 0..200 {
            let mut budget = 40;
            let tree = random_level(&mut rng, 0, &mut budget);
            let section_id = Uuid::new_v4();

            let flat = flatten(&tree, section_id);
            assert_eq!(flat.len(), count(&tree));
            assert!(flat.iter().all(|b| b.section_id == section_id));
            assert_eq!(nest(&flat), tree);
        }
    }

    #[test]
    fn test_nest_is_independent_of_row_order() {
        let mut rng = Rng(42);
        let mut budget = 30;
        let tree = random_level(&mut rng, 0, &mut budget);
        let mut flat = flatten(&tree, Uuid::new_v4());
        flat.reverse();
        assert_eq!(nest(&flat), tree);
    }

    #[test]
    fn test_nest_sorts_siblings_by_position() {
        let section = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let flat = vec![
            row(a, section, None, 7, "c"),
            row(b, section, None, 2, "a"),
            row(c, section, None, 5, "b"),
        ];

        let tree = nest(&flat);
        let types: Vec<_> = tree.iter().map(|n| n.block_type.as_str()).collect();
        assert_eq!(types, vec!["a", "b", "c"]);
        let positions: Vec<_> = tree.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_position_ties_keep_input_order() {
        let section = Uuid::new_v4();
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let flat: Vec<Block> = ids
            .iter()
            .map(|id| row(*id, section, None, 0, "tie"))
            .collect();

        let first = nest(&flat);
        let second = nest(&flat);
        assert_eq!(first, second);
        let order: Vec<Uuid> = first.iter().map(|n| n.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_children_attached_to_any_block_type() {
        let section = Uuid::new_v4();
        let (parent, child, grandchild) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let flat = vec![
            row(grandchild, section, Some(child), 0, "icon"),
            row(child, section, Some(parent), 0, "button"),
            row(parent, section, None, 0, "text"),
        ];

        let tree = nest(&flat);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].id, child);
        assert_eq!(tree[0].children[0].children[0].id, grandchild);
    }

    #[test]
    fn test_orphans_are_promoted_not_lost() {
        let section = Uuid::new_v4();
        let (root, orphan) = (Uuid::new_v4(), Uuid::new_v4());
        let flat = vec![
            row(root, section, None, 0, "root"),
            row(orphan, section, Some(Uuid::new_v4()), 1, "orphan"),
        ];

        let tree = nest(&flat);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].id, orphan);
    }

    #[test]
    fn test_cycles_are_broken_without_losing_blocks() {
        let section = Uuid::new_v4();
        let (a, b, self_ref) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let flat = vec![
            row(a, section, Some(b), 0, "a"),
            row(b, section, Some(a), 0, "b"),
            row(self_ref, section, Some(self_ref), 0, "self"),
        ];

        let tree = nest(&flat);
        assert_eq!(count(&tree), 3);
    }

    #[test]
    fn test_instantiate_assigns_fresh_ids() {
        let defs = vec![BlockDefinition {
            block_type: "container".to_string(),
            enabled: true,
            settings: json!({}),
            children: vec![BlockDefinition {
                block_type: "text".to_string(),
                enabled: true,
                settings: json!({"text": "hi"}),
                children: vec![],
            }],
        }];

        let first = instantiate(&defs);
        let second = instantiate(&defs);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(to_definitions(&first), defs);
    }

    #[test]
    fn test_split_nested_blocks_lifts_legacy_children() {
        let settings = json!({
            "logo_width": 120,
            "blocks": [
                {"type": "menu", "settings": {"handle": "main"}, "blocks": [{"type": "link"}]},
                {"settings": {"orphan": true}},
                {"type": "search", "enabled": false}
            ]
        });

        let (plain, blocks) = split_nested_blocks(&settings);
        assert_eq!(plain, json!({"logo_width": 120}));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_type, "menu");
        assert_eq!(blocks[0].children[0].block_type, "link");
        assert_eq!(blocks[0].children[0].settings, json!({}));
        assert!(!blocks[1].enabled);

        let (plain, blocks) = split_nested_blocks(&json!({"blocks": "not-a-list"}));
        assert_eq!(plain, json!({"blocks": "not-a-list"}));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_embedded_blocks_keep_their_ids() {
        let settings = json!({
            "sticky": true,
            "blocks": [{"type": "menu", "blocks": [{"type": "link", "settings": {"url": "/"}}]}]
        });
        let (plain, first) = split_identified_blocks(&settings);
        assert_eq!(plain, json!({"sticky": true}));

        let stored = embed_blocks(&plain, &first);
        let (_, second) = split_identified_blocks(&stored);
        assert_eq!(second, first);
        assert_eq!(second[0].children[0].settings, json!({"url": "/"}));

        assert_eq!(embed_blocks(&plain, &[]), json!({"sticky": true}));
    }
}
