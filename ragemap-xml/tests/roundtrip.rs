use ragemap_xml::{read_document_str, write_document_string, Element};

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CMapData>
  <name>test_map</name>
  <flags value="0"/>
  <streamingExtentsMin x="-10" y="-10" z="0"/>
  <entities>
    <Item type="CEntityDef">
      <archetypeName>prop_bench_01</archetypeName>
      <position x="1.5" y="2.5" z="0.25"/>
    </Item>
  </entities>
</CMapData>
"#;

#[test]
fn tree_survives_a_round_trip() -> Result<(), anyhow::Error> {
    let tree = read_document_str(SAMPLE)?;
    let emitted = write_document_string(&tree)?;
    let reparsed = read_document_str(&emitted)?;
    assert_eq!(tree, reparsed);
    Ok(())
}

#[test]
fn attributes_and_dispatch_tags_are_preserved() -> Result<(), anyhow::Error> {
    let tree = read_document_str(SAMPLE)?;
    let entities = tree.expect_child("entities")?;
    let entity = entities.items().next().expect("one entity");
    assert_eq!(entity.attr("type"), Some("CEntityDef"));
    assert_eq!(
        entity.expect_child("archetypeName")?.text.trim(),
        "prop_bench_01"
    );
    Ok(())
}

#[test]
fn built_trees_render_empty_tags() -> Result<(), anyhow::Error> {
    let mut root = Element::new("CMapTypes");
    root.push(Element::new("extensions"));
    let emitted = write_document_string(&root)?;
    assert!(emitted.contains("<extensions/>"));
    Ok(())
}
