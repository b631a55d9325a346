//! Basic tests for xee-adapter

use pretty_assertions::assert_eq;
use xee_adapter::XeeEngine;
use xml_engine_traits::{Error, MutableXmlTree, NodeType, XPathEngine, XmlTree};

#[test]
fn test_parse_and_navigate() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><item>test</item></root>").unwrap();

    let root = engine.document_element(&doc).unwrap();
    assert_eq!(engine.node_name(&root), Some("root".to_string()));
    assert_eq!(engine.parent(&root), Some(doc));

    let children = engine.children(&root);
    assert_eq!(children.len(), 1);
    assert_eq!(engine.node_name(&children[0]), Some("item".to_string()));
    assert_eq!(engine.text_content(&children[0]), "test");
}

#[test]
fn test_parse_error() {
    let mut engine = XeeEngine::new();
    let result = engine.parse_xml("<root><item></root>");
    assert!(matches!(result, Err(Error::XmlParse(_))));
}

#[test]
fn test_serialize_compact_and_pretty() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<a><b/></a>").unwrap();

    assert_eq!(engine.serialize(&doc, false).unwrap(), "<a><b/></a>");
    assert_eq!(engine.serialize(&doc, true).unwrap(), "<a>\n  <b/>\n</a>\n");
}

#[test]
fn test_select_nodes() {
    let mut engine = XeeEngine::new();
    let doc = engine
        .parse_xml(r#"<root><item id="1"/><item id="2"/><other/></root>"#)
        .unwrap();

    let items = engine.select("//item", &doc).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(engine.get_attribute(&items[1], "id"), Some("2".to_string()));
}

#[test]
fn test_select_relative_to_context() {
    let mut engine = XeeEngine::new();
    let doc = engine
        .parse_xml("<root><a><x/><x/></a><b><x/></b></root>")
        .unwrap();

    let b = engine.select("/root/b", &doc).unwrap()[0];
    assert_eq!(engine.select("x", &b).unwrap().len(), 1);
}

#[test]
fn test_select_atomic_is_error() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><a/></root>").unwrap();

    let result = engine.select("count(//a)", &doc);
    assert!(matches!(result, Err(Error::XPathEval(_))));
}

#[test]
fn test_compile_error() {
    let engine = XeeEngine::new();
    assert!(matches!(
        engine.compile_xpath("//["),
        Err(Error::XPathCompile(_))
    ));
    assert_eq!(engine.xpath_version(), "3.1");
}

#[test]
fn test_select_sees_mutations() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><a/></root>").unwrap();
    let root = engine.document_element(&doc).unwrap();

    let b = engine.create_element("b").unwrap();
    engine.append_child(&root, &b).unwrap();

    let all = engine.select("/root/*", &doc).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1], b);
}

#[test]
fn test_attributes() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(r#"<root a="1"/>"#).unwrap();
    let root = engine.document_element(&doc).unwrap();

    engine.set_attribute(&root, "b", "2").unwrap();
    engine.set_attribute(&root, "a", "3").unwrap();
    assert_eq!(
        engine.attributes(&root),
        vec![
            ("a".to_string(), "3".to_string()),
            ("b".to_string(), "2".to_string())
        ]
    );

    engine.remove_attribute(&root, "a").unwrap();
    engine.remove_attribute(&root, "missing").unwrap();
    assert_eq!(engine.serialize(&doc, false).unwrap(), r#"<root b="2"/>"#);
}

#[test]
fn test_prefixed_attributes() {
    let mut engine = XeeEngine::new();
    let doc = engine
        .parse_xml(r#"<root xmlns:x="urn:x" x:a="1"/>"#)
        .unwrap();
    let root = engine.document_element(&doc).unwrap();

    assert_eq!(engine.get_attribute(&root, "x:a"), Some("1".to_string()));
    engine.set_attribute(&root, "x:b", "2").unwrap();
    assert_eq!(engine.get_attribute(&root, "x:b"), Some("2".to_string()));

    let unbound = engine.set_attribute(&root, "y:c", "3");
    assert!(matches!(unbound, Err(Error::Structure(_))));
}

#[test]
fn test_attribute_node_serializes_as_pair() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(r#"<root a="x&amp;y"/>"#).unwrap();

    let attribute = engine.select("/root/@a", &doc).unwrap()[0];
    assert_eq!(engine.node_type(&attribute), NodeType::Attribute);
    assert_eq!(engine.serialize(&attribute, false).unwrap(), r#"a="x&amp;y""#);
}

#[test]
fn test_detach_keeps_node_usable() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><a>1</a><b/></root>").unwrap();
    let a = engine.select("//a", &doc).unwrap()[0];

    engine.detach(&a).unwrap();
    assert_eq!(engine.parent(&a), None);
    assert_eq!(engine.serialize(&a, false).unwrap(), "<a>1</a>");
    assert_eq!(engine.serialize(&doc, false).unwrap(), "<root><b/></root>");
}

#[test]
fn test_detached_text_serializes_escaped() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root>a &lt; b &amp; c</root>").unwrap();
    let text = engine.select("/root/text()", &doc).unwrap()[0];

    engine.detach(&text).unwrap();
    assert_eq!(engine.serialize(&text, false).unwrap(), "a &lt; b &amp; c");

    let fresh = engine.create_text("x > y");
    assert_eq!(engine.serialize(&fresh, true).unwrap(), "x &gt; y");
}

#[test]
fn test_insert_siblings() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><b/></root>").unwrap();
    let b = engine.select("//b", &doc).unwrap()[0];

    let a = engine.create_element("a").unwrap();
    let c = engine.create_element("c").unwrap();
    engine.insert_before(&b, &a).unwrap();
    engine.insert_after(&b, &c).unwrap();
    assert_eq!(
        engine.serialize(&doc, false).unwrap(),
        "<root><a/><b/><c/></root>"
    );
}

#[test]
fn test_insert_next_to_attribute_is_refused() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml(r#"<root a="1"/>"#).unwrap();
    let attribute = engine.select("/root/@a", &doc).unwrap()[0];

    let new = engine.create_element("x").unwrap();
    assert!(matches!(
        engine.insert_before(&attribute, &new),
        Err(Error::Structure(_))
    ));
}

#[test]
fn test_set_text_content() {
    let mut engine = XeeEngine::new();
    let doc = engine
        .parse_xml(r#"<root a="1"><x>old<y/></x></root>"#)
        .unwrap();
    let x = engine.select("//x", &doc).unwrap()[0];
    let a = engine.select("/root/@a", &doc).unwrap()[0];

    engine.set_text_content(&x, "new").unwrap();
    engine.set_text_content(&a, "2").unwrap();
    assert_eq!(
        engine.serialize(&doc, false).unwrap(),
        r#"<root a="2"><x>new</x></root>"#
    );

    engine.set_text_content(&x, "").unwrap();
    assert_eq!(
        engine.serialize(&doc, false).unwrap(),
        r#"<root a="2"><x/></root>"#
    );
}

#[test]
fn test_clone_is_independent() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root><a><b/></a></root>").unwrap();
    let a = engine.select("//a", &doc).unwrap()[0];

    let copy = engine.clone_node(&a);
    assert_ne!(copy, a);
    assert_eq!(engine.parent(&copy), None);
    assert_eq!(engine.serialize(&copy, false).unwrap(), "<a><b/></a>");
}

#[test]
fn test_import_between_engines() {
    let mut source = XeeEngine::new();
    let source_doc = source
        .parse_xml(r#"<wrap xmlns:x="urn:x"><x:item x:k="v">text<!--c--></x:item></wrap>"#)
        .unwrap();
    let item = source.select("//*[local-name() = 'item']", &source_doc).unwrap()[0];

    let mut target = XeeEngine::new();
    let doc = target.parse_xml("<root/>").unwrap();
    let root = target.document_element(&doc).unwrap();

    let imported = target.import_node(&source, &item).unwrap();
    target.append_child(&root, &imported).unwrap();

    assert_eq!(
        target.serialize(&doc, false).unwrap(),
        r#"<root><x:item xmlns:x="urn:x" x:k="v">text<!--c--></x:item></root>"#
    );
}

#[test]
fn test_strip_whitespace() {
    let mut engine = XeeEngine::new();
    let doc = engine.parse_xml("<root>\n  <a/>\n  <b>keep me</b>\n</root>").unwrap();

    engine.strip_whitespace(&doc);
    assert_eq!(
        engine.serialize(&doc, false).unwrap(),
        "<root><a/><b>keep me</b></root>"
    );
}
