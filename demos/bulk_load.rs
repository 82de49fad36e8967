use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use lazy_sorted_map::LazySortedMap;

const RAND_SEED: u64 = 123;
const COUNT: u64 = 100000;

#[inline(never)]
fn load_shuffled() -> LazySortedMap<u64, u64> {
    let mut map = LazySortedMap::with_capacity(COUNT as usize);

    let mut keys = (0..COUNT).collect::<Vec<_>>();
    keys.shuffle(&mut StdRng::seed_from_u64(RAND_SEED));

    for k in keys {
        map.insert(k, k * 2);
    }

    println!("loaded {} entries, sorted: {}", map.len(), map.is_sorted());
    map
}

#[inline(never)]
fn read_back(map: &mut LazySortedMap<u64, u64>) {
    // the first read pays for the sort, the rest are binary searches
    let mut found = 0;
    for k in 0..COUNT {
        if map.get(&k) == Some(&(k * 2)) {
            found += 1;
        }
    }
    println!("found {found}, sorted: {}", map.is_sorted());

    let window = map.range(10..15).map(|(k, _)| *k).collect::<Vec<_>>();
    println!("range 10..15: {window:?}");
}

fn main() {
    let mut map = load_shuffled();
    read_back(&mut map);

    // appending in ascending order never dirties the map again
    for k in COUNT..COUNT * 2 {
        map.insert(k, k * 2);
    }
    read_back(&mut map);

    println!("{:#?}", map.statistic());
}
