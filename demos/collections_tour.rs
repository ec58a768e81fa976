use sovran_collections::{
    config, group_pairs, layer, ChainMap, CollectionError, Counter, Deque, OrderedMap, RecordType,
    WatchedMap,
};
use std::collections::HashMap;

fn records() -> Result<(), CollectionError> {
    let point = RecordType::new("Point", "x y")?;
    let p = point.create(vec![5, 7])?;
    println!("{} {}", p.get("x")?, p.get("y")?);
    println!("{:?}", p.to_ordered_mapping());
    println!("{:?}", p.replace("x", 10)?);
    Ok(())
}

fn deques() -> Result<(), CollectionError> {
    let mut d: Deque<i32> = vec![1, 2, 3].into_iter().collect();
    d.push_back(4);
    d.push_front(0);
    d.pop_back()?;
    d.pop_front()?;
    println!("{:?}", d.iter().collect::<Vec<_>>());

    // Keep only the last three readings
    let recent = Deque::bounded_from(3, [10, 20, 30, 40])?;
    println!("Recent: {:?}", recent.iter().collect::<Vec<_>>());
    Ok(())
}

fn counting() {
    let c: Counter<char> = "abracadabra".chars().collect();
    println!("Most Common: {:?}", c.most_common(2));
    println!("Elements > 1: {:?}", c.elements_above(1));
}

fn ordering() -> Result<(), CollectionError> {
    let mut od = OrderedMap::new();
    od.insert("first", 1);
    od.insert("second", 2);
    od.insert("third", 3);

    od.move_to_back(&"first")?;
    od.move_to_front(&"third")?;
    println!("{:?}", od);
    Ok(())
}

fn chaining() -> Result<(), CollectionError> {
    let defaults = layer(HashMap::from([("theme", "light"), ("language", "English")]));
    let overrides = layer(HashMap::from([("theme", "dark")]));
    let settings = ChainMap::new(vec![overrides, defaults]);
    println!("{:?}", settings.to_hash_map()?);

    let from_toml = config::layered(&[
        r#"theme = "dark""#,
        "theme = \"light\"\nlanguage = \"English\"\n",
    ])?;
    println!("theme from TOML: {}", from_toml.get(&"theme".to_string())?);
    Ok(())
}

fn main() -> Result<(), CollectionError> {
    records()?;
    deques()?;
    counting();

    let data = [('a', 1), ('b', 2), ('a', 3), ('b', 4), ('c', 5)];
    println!("{:?}", group_pairs(data));

    ordering()?;
    chaining()?;

    let mut watched = WatchedMap::with_hook(Box::new(|k: &&str, v: &String| {
        println!("Setting {} = {}", k, v)
    }));
    watched.set("foo", "bar".to_string());
    watched.set("x", "42".to_string());

    Ok(())
}
