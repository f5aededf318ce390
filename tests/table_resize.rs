use probe_table::{config::MAX_CAPACITY, CollisionStrategy, Config, Error, GrowthPolicy};
use std::collections::BTreeMap;
use test_log::test;

#[test]
fn table_resize_increment_example() -> probe_table::Result<()> {
    let mut table = Config::new()
        .initial_capacity(7)
        .rehash_threshold(0.7)
        .growth_increment(5)
        .seed(7)
        .build();

    for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
        table.insert(key, "v")?;
        assert_eq!(7, table.capacity(), "should not grow at {} records", i + 1);
    }

    // 5 / 7 > 0.7
    table.insert("e", "v")?;
    assert_eq!(13, table.capacity());
    assert_eq!(1, table.resize_count());
    assert_eq!(5, table.len());

    Ok(())
}

#[test]
fn table_resize_preserves_membership() -> probe_table::Result<()> {
    for strategy in [CollisionStrategy::Quadratic, CollisionStrategy::Double] {
        let mut table = Config::new()
            .collision_strategy(strategy)
            .initial_capacity(3)
            .rehash_threshold(1.0)
            .seed(42)
            .build();

        let mut expected = BTreeMap::new();
        let mut resizes = table.resize_count();

        for i in 0..500 {
            let before = table
                .iter()
                .map(|entry| (entry.key().to_owned(), entry.value().to_owned()))
                .collect::<BTreeMap<_, _>>();
            assert_eq!(expected, before);

            let key = format!("key-{i}");
            let value = format!("value-{i}");
            table.insert(key.clone(), value.clone())?;
            expected.insert(key, value);

            if table.resize_count() != resizes {
                resizes = table.resize_count();

                let after = table
                    .iter()
                    .map(|entry| (entry.key().to_owned(), entry.value().to_owned()))
                    .collect::<BTreeMap<_, _>>();
                assert_eq!(expected, after);
            }
        }

        assert!(resizes > 0);
    }

    Ok(())
}

#[test]
fn table_resize_redraws_coefficients() -> probe_table::Result<()> {
    let mut table = Config::new().initial_capacity(101).seed(3).build();

    for i in 0..20 {
        table.insert(format!("key-{i}"), "v")?;
    }

    table.resize()?;
    assert_eq!(211, table.capacity());

    let (a, b) = table.coefficients();
    assert!((1..=209).contains(&a));
    assert!((1..=209).contains(&b));

    for i in 0..20 {
        assert!(table.contains_key(&format!("key-{i}")));
    }

    Ok(())
}

#[test]
fn table_capacity_always_prime() -> probe_table::Result<()> {
    for policy in [
        GrowthPolicy::Factor(1.1),
        GrowthPolicy::Factor(2.0),
        GrowthPolicy::Increment(1),
        GrowthPolicy::Increment(100),
    ] {
        let mut table = Config::new()
            .initial_capacity(4)
            .growth_policy(policy)
            .seed(0)
            .build();

        let mut capacity = table.capacity();
        assert_eq!(5, capacity);

        for i in 0..300 {
            table.insert(format!("key-{i}"), "v")?;

            if table.capacity() != capacity {
                assert!(table.capacity() >= policy.grow(capacity));
                assert!(probe_table::prime::is_prime(table.capacity()));
                capacity = table.capacity();
            }

            assert!(table.load_factor() <= 0.5);
        }
    }

    Ok(())
}

#[test]
fn table_zero_threshold_grows_on_every_insert() -> probe_table::Result<()> {
    let mut table = Config::new()
        .rehash_threshold(-1.0)
        .initial_capacity(3)
        .growth_increment(1)
        .seed(0)
        .build();

    assert_eq!(0.0, table.rehash_threshold());

    table.insert("a", "1")?;
    assert_eq!(1, table.resize_count());
    assert_eq!(5, table.capacity());

    table.insert("b", "2")?;
    assert_eq!(2, table.resize_count());
    assert_eq!(7, table.capacity());

    // Updates do not grow
    table.insert("b", "3")?;
    assert_eq!(2, table.resize_count());

    Ok(())
}

#[test]
fn table_set_growth_policy() -> probe_table::Result<()> {
    let mut table = Config::new().initial_capacity(7).seed(0).build();

    assert!(table.set_growth_policy(GrowthPolicy::Increment(0)).is_some());
    assert_eq!(GrowthPolicy::Increment(10), table.growth_policy());

    table.resize()?;
    assert_eq!(17, table.capacity());

    Ok(())
}

#[test]
fn table_huge_growth_is_refused() -> probe_table::Result<()> {
    for policy in [
        GrowthPolicy::Factor(1e30),
        GrowthPolicy::Increment(usize::MAX),
    ] {
        let mut table = Config::new()
            .growth_policy(policy)
            .initial_capacity(3)
            .rehash_threshold(0.5)
            .seed(23)
            .build();

        // Growth is refused from the second insert on, the table keeps its slots
        for key in ["a", "b", "c"] {
            table.insert(key, key)?;
        }
        assert_eq!(3, table.capacity());
        assert_eq!(0, table.resize_count());

        assert_eq!(Err(Error::TableFull), table.insert("d", "d"));
        assert_eq!(Err(Error::CapacityLimit(MAX_CAPACITY)), table.resize());

        assert_eq!(3, table.capacity());
        assert_eq!(3, table.len());
        for key in ["a", "b", "c"] {
            assert_eq!(Some(key), table.get(key));
        }

        // A sane policy lets the table grow again
        table.set_growth_policy(GrowthPolicy::Factor(2.0));
        table.insert("d", "d")?;
        assert!(table.capacity() > 3);

        for key in ["a", "b", "c", "d"] {
            assert_eq!(Some(key), table.get(key));
        }
    }

    Ok(())
}
