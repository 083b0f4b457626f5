use bidoutline_core::normalize::{skeleton, COMMERCIAL_FILE_NAME, TECHNICAL_FILE_NAME};
use bidoutline_core::template::TemplateId;
use bidoutline_core::{
    normalize, normalize_with, NormalizeMode, OutlineDocumentSet, RawOutline, TemplateResolver,
};
use serde_json::{json, Value};

fn normalize_project(project: &Value) -> OutlineDocumentSet {
    normalize(RawOutline::from_project(project), NormalizeMode::Directory)
}

fn assert_renderable(doc: &OutlineDocumentSet) {
    assert!(!doc.files.is_empty(), "document has no files");
    for file in &doc.files {
        assert!(!file.items.is_empty(), "file {} has no items", file.name);
    }
}

#[test]
fn missing_inputs_produce_the_skeleton() {
    for project in [
        Value::Null,
        json!({}),
        json!({ "documentDirectory": null }),
        json!({ "documentDirectory": { "commercial": "", "technical": "" } }),
        json!({ "documentDirectory": { "commercial": " \n\t\n", "technical": "\r\n" } }),
        json!({ "documentDirectory": { "files": [] } }),
    ] {
        let doc = normalize_project(&project);
        assert_renderable(&doc);
        assert_eq!(doc, skeleton(NormalizeMode::Directory), "input: {project}");
        assert_eq!(doc.files[0].name, COMMERCIAL_FILE_NAME);
        assert_eq!(doc.files[0].items[0].title, "第一章");
        assert_eq!(doc.files[0].items[0].description, "请输入说明");
    }
}

#[test]
fn legacy_commercial_lines_become_flat_roots() {
    let doc = normalize_project(&json!({
        "documentDirectory": { "commercial": "A\nB\n\nC", "technical": "" }
    }));

    assert_eq!(doc.files.len(), 1);
    assert_eq!(doc.files[0].name, "商务文件");
    let titles = doc.files[0]
        .items
        .iter()
        .map(|node| node.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert!(doc.files[0].items.iter().all(|node| node.children.is_empty()));
    assert!(doc.files[0].items.iter().all(|node| node.description.is_empty()));
    assert!(doc.files.iter().all(|file| file.name != "技术文件"));
}

#[test]
fn legacy_both_sides_keep_file_order_and_resolve_templates() {
    let doc = normalize_project(&json!({
        "documentDirectory": {
            "commercial": "投标函\n法定代表人授权委托书\n报价一览表",
            "technical": "技术方案\n售后服务承诺"
        }
    }));

    assert_eq!(doc.files.len(), 2);
    assert_eq!(doc.files[0].name, COMMERCIAL_FILE_NAME);
    assert_eq!(doc.files[1].name, TECHNICAL_FILE_NAME);
    assert!(doc.files[0].items[0].content_format.contains("[项目名称]"));
    assert!(doc.files[0].items[1].content_format.contains("[被授权人姓名]"));
    assert_eq!(doc.files[0].items[2].content_format, "");
    assert!(doc.summary.contains('2'));
}

#[test]
fn legacy_technical_only_emits_technical_file() {
    let doc = normalize_project(&json!({
        "documentDirectory": { "commercial": "", "technical": "技术方案" }
    }));
    assert_eq!(doc.files.len(), 1);
    assert_eq!(doc.files[0].name, TECHNICAL_FILE_NAME);
}

#[test]
fn canonical_blank_content_is_backfilled_in_nested_nodes() {
    let doc = normalize_project(&json!({
        "documentDirectory": {
            "summary": "原有说明",
            "files": [{
                "name": "第一册",
                "items": [{
                    "title": "一、资格证明文件",
                    "description": "",
                    "children": [
                        { "title": "投标函", "description": "", "contentFormat": "   " },
                        { "title": "验收报告", "description": "" }
                    ]
                }]
            }]
        }
    }));

    assert_eq!(doc.summary, "原有说明");
    assert_eq!(doc.files[0].name, "第一册");
    let root = &doc.files[0].items[0];
    assert_eq!(root.content_format, "");
    assert!(root.children[0].content_format.contains("[项目名称]"));
    assert_eq!(root.children[1].content_format, "");
}

#[test]
fn existing_content_is_never_overwritten() {
    let doc = normalize_project(&json!({
        "documentDirectory": {
            "summary": "s",
            "files": [{
                "name": "商务文件",
                "items": [{ "title": "投标函", "description": "", "contentFormat": "自定义内容" }]
            }]
        }
    }));
    assert_eq!(doc.files[0].items[0].content_format, "自定义内容");
}

#[test]
fn canonical_with_an_empty_file_falls_back_to_skeleton() {
    let doc = normalize(
        RawOutline::from_directory(&json!({
            "summary": "s",
            "files": [
                { "name": "商务文件", "items": [{ "title": "投标函" }] },
                { "name": "技术文件", "items": [] }
            ]
        })),
        NormalizeMode::Format,
    );
    assert_eq!(doc, skeleton(NormalizeMode::Format));
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        json!({}),
        json!({ "documentDirectory": { "commercial": "投标函\n报价表", "technical": "技术方案" } }),
        json!({ "documentDirectory": {
            "summary": "s",
            "files": [{ "name": "商务文件", "items": [
                { "title": "授权委托书", "children": [{ "title": "投标 函" }] },
                { "title": "其他", "contentFormat": "保留" }
            ]}]
        }}),
    ];

    for input in inputs {
        let once = normalize_project(&input);
        let encoded = serde_json::to_value(&once).unwrap();
        let twice = normalize(RawOutline::from_directory(&encoded), NormalizeMode::Directory);
        assert_eq!(twice, once, "input: {input}");
    }
}

#[test]
fn canonical_wire_shape_round_trips() {
    let doc = normalize_project(&json!({
        "documentDirectory": { "commercial": "验收报告", "technical": "" }
    }));
    let encoded = serde_json::to_value(&doc).unwrap();

    assert_eq!(encoded["files"][0]["name"], "商务文件");
    assert_eq!(encoded["files"][0]["items"][0]["title"], "验收报告");
    assert_eq!(encoded["files"][0]["items"][0]["contentFormat"], "");
    assert!(encoded["files"][0]["items"][0].get("children").is_none());

    let decoded: OutlineDocumentSet = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn custom_resolver_extends_backfill() {
    let quote = TemplateId::new("quote");
    let resolver = TemplateResolver::builtin()
        .with_template(quote.clone(), "报价：[金额]")
        .with_rule(["报价表"], quote)
        .unwrap();

    let doc = normalize_with(
        RawOutline::LegacyFlat {
            commercial: "报价表".to_string(),
            technical: String::new(),
        },
        NormalizeMode::Directory,
        &resolver,
    );
    assert_eq!(doc.files[0].items[0].content_format, "报价：[金额]");
}

#[test]
fn null_fields_in_canonical_input_keep_user_content() {
    let raw = RawOutline::from_project(&json!({
        "documentDirectory": {
            "summary": "用户说明",
            "files": [{
                "name": "第一册",
                "items": [
                    { "title": "投标函", "contentFormat": null },
                    { "title": "技术方案", "contentFormat": "用户正文", "children": null }
                ]
            }]
        }
    }));
    assert_eq!(raw.kind(), "canonical");

    let doc = normalize(raw, NormalizeMode::Directory);
    assert_eq!(doc.summary, "用户说明");
    assert_eq!(doc.files.len(), 1);
    assert_eq!(doc.files[0].name, "第一册");
    assert!(doc.files[0].items[0].content_format.contains("[项目名称]"));
    assert_eq!(doc.files[0].items[1].content_format, "用户正文");
    assert!(doc.files[0].items[1].children.is_empty());
}

#[test]
fn null_summary_keeps_files() {
    let doc = normalize_project(&json!({
        "documentDirectory": {
            "summary": null,
            "files": [{ "name": "第一册", "items": [{ "title": "验收报告", "description": null }] }]
        }
    }));

    assert_eq!(doc.summary, "");
    assert_eq!(doc.files[0].name, "第一册");
    assert_eq!(doc.files[0].items[0].title, "验收报告");
    assert_eq!(doc.files[0].items[0].description, "");
}

#[test]
fn mistyped_node_does_not_drop_its_siblings() {
    let doc = normalize_project(&json!({
        "documentDirectory": {
            "summary": "s",
            "files": [{
                "name": "第一册",
                "items": [
                    { "title": 3 },
                    { "title": "授权委托书", "children": [null, { "title": "附件" }] },
                    { "title": "其他", "contentFormat": "保留" }
                ]
            }]
        }
    }));

    let items = &doc.files[0].items;
    let titles = items
        .iter()
        .map(|node| node.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["3", "授权委托书", "其他"]);
    assert!(items[1].content_format.contains("[被授权人姓名]"));
    assert_eq!(items[1].children.len(), 1);
    assert_eq!(items[1].children[0].title, "附件");
    assert_eq!(items[2].content_format, "保留");
}

#[test]
fn repaired_canonical_input_normalizes_idempotently() {
    let once = normalize_project(&json!({
        "documentDirectory": {
            "summary": null,
            "files": [{ "name": "第一册", "items": [{ "title": "投标函", "children": null }, 5] }]
        }
    }));
    let encoded = serde_json::to_value(&once).unwrap();
    let twice = normalize(RawOutline::from_directory(&encoded), NormalizeMode::Directory);
    assert_eq!(twice, once);
}
