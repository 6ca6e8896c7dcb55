use dioxus::prelude::*;

use shop_admin::CategoryNode;
use shop_admin::tree_view::RowToggle;

#[component]
pub fn CategoryTree(
    forest: Vec<CategoryNode>,
    on_add_subcategory: EventHandler<CategoryNode>,
    on_edit: EventHandler<CategoryNode>,
    on_delete: EventHandler<CategoryNode>,
) -> Element {
    rsx! {
        ul { class: "category-tree",
            for node in forest {
                CategoryTreeNode {
                    key: "{node.id()}",
                    node: node.clone(),
                    on_add_subcategory: on_add_subcategory,
                    on_edit: on_edit,
                    on_delete: on_delete,
                }
            }
        }
    }
}

/// One row plus its subtree. The `open` flag belongs to this node alone.
#[component]
fn CategoryTreeNode(
    node: CategoryNode,
    on_add_subcategory: EventHandler<CategoryNode>,
    on_edit: EventHandler<CategoryNode>,
    on_delete: EventHandler<CategoryNode>,
) -> Element {
    let mut open = use_signal(|| true);

    let toggle = match (node.has_children(), open()) {
        (false, _) => RowToggle::Placeholder,
        (true, true) => RowToggle::Open,
        (true, false) => RowToggle::Closed,
    };
    let marker = toggle.marker();
    let status = node.category.status.label();

    let for_add = node.clone();
    let for_edit = node.clone();
    let for_delete = node.clone();

    rsx! {
        li { class: "category-node",
            div { class: "category-row",
                button {
                    class: "toggle",
                    disabled: !toggle.is_interactive(),
                    onclick: move |_| open.set(!open()),
                    "{marker}"
                }
                span { class: "name", "{node.name()}" }
                span { class: "type-tag", "{status}" }
                div { class: "row-actions",
                    button {
                        class: "btn-text",
                        onclick: move |_| on_add_subcategory.call(for_add.clone()),
                        "+ SUB"
                    }
                    button {
                        class: "btn-text",
                        onclick: move |_| on_edit.call(for_edit.clone()),
                        "EDIT"
                    }
                    button {
                        class: "btn-text",
                        onclick: move |_| on_delete.call(for_delete.clone()),
                        "DELETE"
                    }
                }
            }
            if toggle == RowToggle::Open {
                CategoryTree {
                    forest: node.children.clone(),
                    on_add_subcategory: on_add_subcategory,
                    on_edit: on_edit,
                    on_delete: on_delete,
                }
            }
        }
    }
}
