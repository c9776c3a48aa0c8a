use ordered_tree::red_black_tree::{Error, OrderedTree, RedBlackMap};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

const NUM_OF_OPERATIONS: usize = 100_000;

fn height_bound(len: usize) -> f64 {
    2.0 * ((len + 1) as f64).log2()
}

#[test]
fn int_test_red_black_map() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = RedBlackMap::new();
    let mut expected = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen::<u32>();
        let val = rng.gen::<u32>();

        map.insert(key, val);
        expected.push((key, val));
    }

    expected.reverse();
    expected.sort_by(|l, r| l.0.cmp(&r.0));
    expected.dedup_by_key(|pair| pair.0);

    assert_eq!(map.len(), expected.len());
    assert!(map.height() as f64 <= height_bound(map.len()));

    assert_eq!(map.min(), Some(&expected[0].0));
    assert_eq!(map.max(), Some(&expected[expected.len() - 1].0));

    for entry in &expected {
        assert!(map.contains_key(&entry.0));
        assert_eq!(map.get(&entry.0), Some(&entry.1));
        assert_eq!(map.ceil(&entry.0), Some(&entry.0));
        assert_eq!(map.floor(&entry.0), Some(&entry.0));
    }

    for entry in &mut expected {
        let val_1 = rng.gen::<u32>();
        let val_2 = rng.gen::<u32>();

        let old_entry = map.insert(entry.0, val_1);
        assert_eq!(old_entry, Some((entry.0, entry.1)));
        {
            let old_val = map.get_mut(&entry.0);
            *old_val.unwrap() = val_2;
        }
        entry.1 = val_2;
        assert_eq!(map.get(&entry.0), Some(&val_2));
    }

    rng.shuffle(&mut expected);

    let mut expected_len = expected.len();
    for entry in expected {
        let old_entry = map.remove(&entry.0);
        expected_len -= 1;
        assert_eq!(old_entry, Some((entry.0, entry.1)));
        assert_eq!(map.len(), expected_len);
    }

    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
}

#[test]
fn int_test_ordered_tree_against_btree_set() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([2, 2, 2, 2]);
    let mut tree = OrderedTree::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 4096u32);
        match rng.gen_range(0, 3) {
            0 | 1 => {
                assert_eq!(tree.insert(key).is_none(), expected.insert(key));
            },
            _ => {
                let result = tree.delete(&key);
                if expected.remove(&key) {
                    assert_eq!(result, Ok(key));
                } else {
                    assert_eq!(result, Err(Error::NotFound));
                }
            },
        }
    }

    assert_eq!(tree.len(), expected.len());
    assert!(tree.height() as f64 <= height_bound(tree.len()));
    assert_eq!(
        tree.sorted_sequence().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );

    for key in 0..4096u32 {
        assert_eq!(tree.search(&key), expected.contains(&key));
    }
}

#[test]
fn int_test_successor_predecessor() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([3, 3, 3, 3]);
    let mut tree = OrderedTree::new();
    let mut expected = BTreeSet::new();
    for _ in 0..10_000 {
        let key = rng.gen_range(0, 100_000i64);
        tree.insert(key);
        expected.insert(key);
    }
    for _ in 0..2_000 {
        let key = rng.gen_range(0, 100_000i64);
        assert_eq!(tree.delete(&key).is_ok(), expected.remove(&key));
    }

    for key in &expected {
        let next = expected.range(key + 1..).next();
        let prev = expected.range(..*key).next_back();
        assert_eq!(tree.successor(key), Ok(next));
        assert_eq!(tree.predecessor(key), Ok(prev));
    }

    let absent = (0..100_000i64).find(|key| !expected.contains(key)).unwrap();
    assert_eq!(tree.successor(&absent), Err(Error::NotFound));
    assert_eq!(tree.predecessor(&absent), Err(Error::NotFound));
}

#[test]
fn int_test_map_reverse_iteration() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([4, 4, 4, 4]);
    let mut map = RedBlackMap::new();
    let mut expected = BTreeMap::new();
    for _ in 0..10_000 {
        let key = rng.gen::<u16>();
        let val = rng.gen::<u32>();
        map.insert(key, val);
        expected.insert(key, val);
    }

    assert_eq!(
        map.iter().rev().collect::<Vec<(&u16, &u32)>>(),
        expected.iter().rev().collect::<Vec<(&u16, &u32)>>(),
    );
    assert_eq!(
        map.into_iter().collect::<Vec<(u16, u32)>>(),
        expected.into_iter().collect::<Vec<(u16, u32)>>(),
    );
}

#[test]
fn test_ascending_inserts() {
    let tree: OrderedTree<u32> = (1..=7).collect();
    assert!(tree.height() <= 6);
    assert_eq!(
        tree.sorted_sequence().cloned().collect::<Vec<u32>>(),
        vec![1, 2, 3, 4, 5, 6, 7],
    );

    let tree: OrderedTree<u32> = (0..1024).collect();
    assert!(tree.height() as f64 <= height_bound(1024));
}

#[test]
fn test_delete_after_mixed_inserts() {
    let keys = [10, 1, 6, 12, 25, 18, 8, 14, 29, 11, 17, 38, 27];
    let mut tree: OrderedTree<u32> = keys.iter().cloned().collect();

    assert_eq!(tree.delete(&25), Ok(25));
    assert_eq!(tree.delete(&18), Ok(18));

    assert!(!tree.search(&25));
    assert!(!tree.search(&18));
    let mut expected = keys
        .iter()
        .cloned()
        .filter(|key| *key != 25 && *key != 18)
        .collect::<Vec<u32>>();
    expected.sort();
    assert_eq!(tree.sorted_sequence().cloned().collect::<Vec<u32>>(), expected);
    assert!(tree.height() as f64 <= height_bound(tree.len()));
}

#[test]
fn test_empty_tree() {
    let tree: OrderedTree<u32> = OrderedTree::new();
    assert_eq!(tree.minimum(), Err(Error::EmptyTree));
    assert_eq!(tree.maximum(), Err(Error::EmptyTree));
    assert_eq!(tree.height(), 0);
    assert!(!tree.search(&5));
}

#[test]
fn test_delete_absent_key() {
    let mut tree: OrderedTree<u32> = vec![4, 2, 6].into_iter().collect();
    let before = tree.sorted_sequence().cloned().collect::<Vec<u32>>();
    assert_eq!(tree.delete(&5), Err(Error::NotFound));
    assert_eq!(tree.sorted_sequence().cloned().collect::<Vec<u32>>(), before);
}

#[test]
fn test_insert_then_delete_everything() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([5, 5, 5, 5]);
    let mut keys = (0..5_000u32).collect::<Vec<u32>>();
    rng.shuffle(&mut keys);

    let mut tree: OrderedTree<u32> = keys.iter().cloned().collect();
    rng.shuffle(&mut keys);
    for key in &keys {
        assert_eq!(tree.delete(key), Ok(*key));
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.minimum(), Err(Error::EmptyTree));
}

#[test]
fn test_bincode_round_trip() {
    let map: RedBlackMap<u32, String> = (0..100)
        .map(|key| (key, format!("value {}", key)))
        .collect();
    let bytes = bincode::serialize(&map).unwrap();
    let decoded: RedBlackMap<u32, String> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, map);
}
