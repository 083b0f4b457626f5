use bidoutline_core::tree::{
    add_child, add_file, add_root_node, get_node, remove_file, remove_node, rename_file,
    set_field, set_summary,
};
use bidoutline_core::{
    OutlineDocumentSet, OutlineError, OutlineField, OutlineFile, OutlineNode, OutlinePath,
    RemoveFileOutcome,
};
use std::sync::Arc;

fn single_root(node: OutlineNode) -> OutlineDocumentSet {
    OutlineDocumentSet::new("summary", [OutlineFile::new("商务文件", [node])])
}

#[test]
fn add_child_twice_builds_grandchild_path() {
    let doc = single_root(OutlineNode::new("一、X", ""));

    let (doc, child_path) = add_child(&doc, 0, &OutlinePath::from([0]), None).unwrap();
    assert_eq!(child_path, OutlinePath::from([0, 0]));

    let (doc, grandchild_path) = add_child(&doc, 0, &child_path, None).unwrap();
    assert_eq!(grandchild_path, OutlinePath::from([0, 0, 0]));

    let grandchild = get_node(&doc, 0, &OutlinePath::from([0, 0, 0])).unwrap();
    assert_eq!(grandchild.title, "新增章节");
    assert_eq!(grandchild.description, "请输入说明");
    assert!(grandchild.children.is_empty());
}

#[test]
fn remove_only_child_leaves_empty_children() {
    let doc = single_root(OutlineNode::new("一、X", "").with_children([OutlineNode::new("1.1", "")]));

    let next = remove_node(&doc, 0, &OutlinePath::from([0, 0])).unwrap();

    let root = get_node(&next, 0, &OutlinePath::from([0])).unwrap();
    assert_eq!(root.title, "一、X");
    assert!(root.children.is_empty());
    assert_eq!(next.files[0].items.len(), 1);
    // Source document is untouched.
    assert_eq!(get_node(&doc, 0, &OutlinePath::from([0])).unwrap().children.len(), 1);
}

#[test]
fn remove_last_root_is_allowed_transiently() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let next = remove_node(&doc, 0, &OutlinePath::from([0])).unwrap();
    assert!(next.files[0].items.is_empty());
    assert!(!next.is_renderable());
}

#[test]
fn add_root_node_appends_default_chapter() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let (next, path) = add_root_node(&doc, 0, None).unwrap();

    assert_eq!(path, OutlinePath::from([1]));
    let node = get_node(&next, 0, &path).unwrap();
    assert_eq!(node.title, "第一章");
    assert_eq!(node.description, "请输入说明");
    assert!(Arc::ptr_eq(&doc.files[0].items[0], &next.files[0].items[0]));
}

#[test]
fn add_child_accepts_explicit_node() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let custom = OutlineNode::new("投标函", "按格式填写").with_content("自定义内容");
    let (next, path) = add_child(&doc, 0, &OutlinePath::from([0]), Some(custom.clone())).unwrap();
    assert_eq!(get_node(&next, 0, &path).unwrap(), &custom);
}

#[test]
fn set_field_updates_each_field() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let path = OutlinePath::from([0]);

    let doc = set_field(&doc, 0, &path, OutlineField::Title, "一、资格证明").unwrap();
    let doc = set_field(&doc, 0, &path, OutlineField::Description, "营业执照等").unwrap();
    let doc = set_field(&doc, 0, &path, OutlineField::ContentFormat, "<p>正文</p>").unwrap();

    let node = get_node(&doc, 0, &path).unwrap();
    assert_eq!(node.title, "一、资格证明");
    assert_eq!(node.description, "营业执照等");
    assert_eq!(node.content_format, "<p>正文</p>");
}

#[test]
fn out_of_range_addresses_are_reported() {
    let doc = single_root(OutlineNode::new("一、X", ""));

    assert_eq!(
        get_node(&doc, 3, &OutlinePath::from([0])).unwrap_err(),
        OutlineError::FileNotFound(3)
    );
    assert_eq!(
        set_field(&doc, 0, &OutlinePath::from([0, 0]), OutlineField::Title, "x").unwrap_err(),
        OutlineError::PathNotFound {
            file_index: 0,
            path: OutlinePath::from([0, 0]),
        }
    );
    assert_eq!(
        add_root_node(&doc, 1, None).unwrap_err(),
        OutlineError::FileNotFound(1)
    );
    assert!(matches!(
        remove_node(&doc, 0, &OutlinePath::root()).unwrap_err(),
        OutlineError::PathNotFound { .. }
    ));
    assert_eq!(
        remove_node(&doc, 2, &OutlinePath::from([0])).unwrap_err(),
        OutlineError::FileNotFound(2)
    );
}

#[test]
fn remove_file_keeps_at_least_one_file() {
    let doc = single_root(OutlineNode::new("一、X", ""));

    let outcome = remove_file(&doc, 0).unwrap();
    assert!(!outcome.is_removed());
    let unchanged = outcome.into_document();
    assert_eq!(unchanged, doc);
    assert_eq!(unchanged.files.len(), 1);
}

#[test]
fn add_and_remove_file() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let doc = add_file(&doc, "技术文件", OutlineNode::default_root());
    assert_eq!(doc.files.len(), 2);
    assert_eq!(doc.files[1].name, "技术文件");
    assert_eq!(doc.files[1].items.len(), 1);

    assert_eq!(remove_file(&doc, 5).unwrap_err(), OutlineError::FileNotFound(5));

    match remove_file(&doc, 0).unwrap() {
        RemoveFileOutcome::Removed(next) => {
            assert_eq!(next.files.len(), 1);
            assert_eq!(next.files[0].name, "技术文件");
            assert!(Arc::ptr_eq(&doc.files[1], &next.files[0]));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn rename_file_and_set_summary() {
    let doc = single_root(OutlineNode::new("一、X", ""));
    let doc = rename_file(&doc, 0, "资格文件").unwrap();
    let doc = set_summary(&doc, "新的说明");
    assert_eq!(doc.files[0].name, "资格文件");
    assert_eq!(doc.summary, "新的说明");
    assert_eq!(rename_file(&doc, 1, "x").unwrap_err(), OutlineError::FileNotFound(1));
}

#[test]
fn deep_edit_clones_only_the_spine() {
    let doc = OutlineDocumentSet::new(
        "s",
        [
            OutlineFile::new(
                "商务文件",
                [
                    OutlineNode::new("A", "").with_children([
                        OutlineNode::new("A.1", "").with_children([OutlineNode::new("A.1.a", "")]),
                        OutlineNode::new("A.2", ""),
                    ]),
                    OutlineNode::new("B", ""),
                ],
            ),
            OutlineFile::new("技术文件", [OutlineNode::new("T", "")]),
        ],
    );

    let next = set_field(
        &doc,
        0,
        &OutlinePath::from([0, 0, 0]),
        OutlineField::Description,
        "说明",
    )
    .unwrap();

    assert!(Arc::ptr_eq(&doc.files[1], &next.files[1]));
    assert!(Arc::ptr_eq(&doc.files[0].items[1], &next.files[0].items[1]));
    assert!(Arc::ptr_eq(
        &doc.files[0].items[0].children[1],
        &next.files[0].items[0].children[1]
    ));
    assert!(!Arc::ptr_eq(&doc.files[0], &next.files[0]));
    assert!(!Arc::ptr_eq(
        &doc.files[0].items[0].children[0],
        &next.files[0].items[0].children[0]
    ));
    assert_eq!(
        get_node(&next, 0, &OutlinePath::from([0, 0, 0])).unwrap().description,
        "说明"
    );
}
