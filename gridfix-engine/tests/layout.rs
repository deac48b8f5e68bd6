//! End-to-end layout tests: parse HTML, size it, rewrite it

use gridfix_engine::dom;
use gridfix_engine::{
    EngineOptions, GridEngine, GridError, GridStrategy, HtmlDocument, LayoutTree, Role,
};
use markup5ever_rcdom::Handle;
use rstest::rstest;

const NEWSLETTER: &str = include_str!("fixtures/newsletter.html");
const MALFORMED_WIDTH: &str = include_str!("fixtures/malformed_width.html");

fn engine(strategy: GridStrategy) -> GridEngine {
    GridEngine::new(EngineOptions {
        strategy,
        ..EngineOptions::default()
    })
}

/// Grid values of the column children of every row in the tree
fn row_values(tree: &LayoutTree) -> Vec<Vec<u8>> {
    tree.pre_order()
        .into_iter()
        .filter(|&id| tree.node(id).role == Role::Row)
        .map(|row| {
            tree.column_children(row)
                .into_iter()
                .map(|cell| tree.node(cell).grid_value)
                .collect()
        })
        .collect()
}

fn node_by_name<'a>(tree: &'a LayoutTree, name: &str) -> Vec<&'a gridfix_engine::ElementNode> {
    tree.pre_order()
        .into_iter()
        .map(|id| tree.node(id))
        .filter(|node| node.name == name)
        .collect()
}

/// Every element of the rewritten document in document order
fn all_elements(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let children = dom::child_elements(&node);
        stack.extend(children.iter().rev().cloned());
        if dom::is_element(&node) {
            found.push(node);
        }
    }
    found
}

fn column_units(handle: &Handle) -> Option<u32> {
    dom::attr(handle, "class")?
        .strip_prefix("col-")?
        .parse()
        .ok()
}

#[test]
fn test_three_cells_sum_to_twelve() {
    let doc = HtmlDocument::parse(
        r#"<body><table width="760"><tr><td width="100">a</td><td width="200">b</td><td width="300">c</td></tr></table></body>"#,
    );
    let tree = engine(GridStrategy::ByRow).size_document(&doc).unwrap();

    let widths: Vec<u32> = node_by_name(&tree, "td").iter().map(|n| n.width).collect();
    assert_eq!(widths, vec![153, 253, 353]);
    assert_eq!(row_values(&tree), vec![vec![2, 4, 6]]);
}

#[test]
fn test_describe_report() {
    let doc = HtmlDocument::parse(
        r#"<body><table width="760"><tr><td width="100">a</td><td width="200">b</td><td width="300">c</td></tr></table></body>"#,
    );
    let engine = engine(GridStrategy::ByRow);
    let tree = engine.size_document(&doc).unwrap();
    let report = engine.describe(&tree);

    insta::assert_snapshot!(report.trim_end(), @r"
    <body> columns=false [] width=760 available=0 grid=12
      <table> columns=true [153, 253, 353] width=760 available=0 grid=12
        <tbody> columns=true [153, 253, 353] width=760 available=0 grid=12
          <tr> columns=true [153, 253, 353] width=760 available=1 grid=12
            <td> columns=false [] width=153 available=47 grid=2
            <td> columns=false [] width=253 available=147 grid=4
            <td> columns=false [] width=353 available=247 grid=6
    ");
}

#[rstest]
#[case(GridStrategy::ByRow, vec![7, 5])]
#[case(GridStrategy::ByContainer, vec![8, 4])]
fn test_colspan_takes_two_slots(#[case] strategy: GridStrategy, #[case] expected: Vec<u8>) {
    let doc = HtmlDocument::parse(
        r#"<body><table width="760"><tr><td colspan="2" width="100">wide</td><td width="100">narrow</td></tr></table></body>"#,
    );
    let tree = engine(strategy).size_document(&doc).unwrap();

    let cells = node_by_name(&tree, "td");
    assert_eq!(cells[0].width, 472);
    assert_eq!(cells[1].width, 286);

    let table = node_by_name(&tree, "table")[0];
    assert_eq!(table.column_info, vec![472, 0, 286]);
    assert_eq!(row_values(&tree), vec![expected]);
}

#[rstest]
#[case(GridStrategy::ByRow)]
#[case(GridStrategy::ByContainer)]
fn test_huge_colspan_is_clamped(#[case] strategy: GridStrategy) {
    let doc = HtmlDocument::parse(
        r#"<body><table><tr><td colspan="3000000000">a</td><td colspan="3000000000">b</td></tr></table></body>"#,
    );
    let tree = engine(strategy).size_document(&doc).unwrap();

    let cells = node_by_name(&tree, "td");
    assert!(cells.iter().all(|cell| cell.colspan == gridfix_engine::tree::MAX_COLSPAN));
    assert_eq!(node_by_name(&tree, "table")[0].column_info.len(), 2000);
    for values in row_values(&tree) {
        assert_eq!(values.iter().map(|&v| u32::from(v)).sum::<u32>(), 12);
    }
}

#[test]
fn test_percent_style_width() {
    let doc = HtmlDocument::parse(
        r#"<body><div style="width: 400px"><p style="width:50%;">half</p></div></body>"#,
    );
    let tree = engine(GridStrategy::ByRow).size_document(&doc).unwrap();

    assert_eq!(node_by_name(&tree, "p")[0].width, 200);
    // the div shrinks to its content
    assert_eq!(node_by_name(&tree, "div")[0].width, 200);
}

#[test]
fn test_unmatched_root_selector_is_noop() {
    let doc = HtmlDocument::parse(NEWSLETTER);
    let before = doc.to_html().unwrap();
    let engine = GridEngine::new(EngineOptions {
        root_selector: "div#nowhere".to_string(),
        ..EngineOptions::default()
    });

    let tree = engine.size_document(&doc).unwrap();
    assert_eq!(engine.describe(&tree), "");
    assert!(engine.fix(&tree).is_noop());
    assert_eq!(doc.to_html().unwrap(), before);
}

#[test]
fn test_root_selector_limits_processing() {
    let doc = HtmlDocument::parse(
        r#"<body><table id="keep"><tr><td>a</td></tr></table><div id="main"><table><tr><td>b</td></tr></table></div></body>"#,
    );
    let engine = GridEngine::new(EngineOptions {
        root_selector: "div#main".to_string(),
        ..EngineOptions::default()
    });
    let tree = engine.size_document(&doc).unwrap();
    let stats = engine.fix(&tree);

    assert_eq!(stats.columns, 1);
    let html = doc.to_html().unwrap();
    assert!(html.contains(r#"<table id="keep">"#));
    assert!(html.contains(r#"<div id="main"><div class="row"><div class="col-12">b</div></div></div>"#));
}

#[test]
fn test_malformed_width_aborts_sizing() {
    let doc = HtmlDocument::parse(MALFORMED_WIDTH);
    let err = engine(GridStrategy::ByRow).size_document(&doc).unwrap_err();

    match err {
        GridError::InvalidWidth { tag, value } => {
            assert_eq!(tag, "td");
            assert_eq!(value, "wide");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case(GridStrategy::ByRow)]
#[case(GridStrategy::ByContainer)]
fn test_newsletter_rewrite(#[case] strategy: GridStrategy) {
    let doc = HtmlDocument::parse(NEWSLETTER);
    let engine = engine(strategy);
    let tree = engine.size_document(&doc).unwrap();

    for values in row_values(&tree) {
        assert_eq!(values.iter().map(|&v| u32::from(v)).sum::<u32>(), 12);
    }

    let stats = engine.fix(&tree);
    assert_eq!(stats.tables_removed, 4);
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.columns, 7);

    let body = doc.select_root("body").unwrap();
    let elements = all_elements(&body);
    for element in &elements {
        let name = dom::element_name(element).unwrap();
        assert!(
            !matches!(name.as_str(), "table" | "tbody" | "tr" | "td" | "th"),
            "{name} survived the rewrite"
        );
        assert_eq!(dom::attr(element, "width"), None);
    }

    let rows: Vec<&Handle> = elements
        .iter()
        .filter(|e| dom::attr(e, "class").as_deref() == Some("row"))
        .collect();
    assert_eq!(rows.len(), 4);
    for row in rows {
        let units: u32 = dom::child_elements(row)
            .iter()
            .filter_map(column_units)
            .sum();
        assert_eq!(units, 12);
    }

    let html = doc.to_html().unwrap();
    assert!(html.contains(r#"<img src="logo.png" alt="Logo">"#));
    assert!(html.contains(r#"<input type="text" name="email">"#));
}

#[test]
fn test_second_fix_changes_nothing() {
    let doc = HtmlDocument::parse(NEWSLETTER);
    let engine = engine(GridStrategy::ByRow);

    let first = engine.size_document(&doc).unwrap();
    assert!(!engine.fix(&first).is_noop());
    let rewritten = doc.to_html().unwrap();

    let second = engine.size_document(&doc).unwrap();
    assert!(engine.fix(&second).is_noop());
    assert_eq!(doc.to_html().unwrap(), rewritten);
}
