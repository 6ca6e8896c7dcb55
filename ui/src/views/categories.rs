use dioxus::prelude::*;

use shop_admin::cascade::{DeletionCascade, DependentGroup};
use shop_admin::models::{
    Category, CategoryStatus, CreateCategoryPayload, Disposition, UpdateCategoryPayload,
};
use shop_admin::utils::{non_blank, validate_category_name};
use shop_admin::{CategoryNode, build_tree};

use crate::api;
use crate::components::{CategoryTree, Overlay};
use crate::session::use_session;

#[component]
pub fn CategoriesView() -> Element {
    let session = use_session();
    let mut categories = use_signal(Vec::<Category>::new);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| true);
    let mut adding_under = use_signal(|| None::<Option<String>>);
    let mut editing = use_signal(|| None::<CategoryNode>);
    let mut cascade = use_signal(DeletionCascade::new);

    let forest = use_memo(move || build_tree(&categories.read()));

    // Always refetch the whole list after a mutation.
    let reload = move || {
        spawn(async move {
            loading.set(true);
            match api::get_categories(session.token()).await {
                Ok(list) => {
                    categories.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };

    use_effect(move || reload());

    rsx! {
        div { class: "content-header",
            h1 { "CATEGORIES" }
            button { onclick: move |_| adding_under.set(Some(None)), "ADD" }
        }

        if let Some(err) = error() {
            div { class: "error-message", "{err}" }
        }

        if loading() && categories.read().is_empty() {
            div { class: "loading", "LOADING..." }
        } else if forest.read().is_empty() {
            div { class: "empty-state", "NO CATEGORIES" }
        } else {
            div { class: "border p-2",
                CategoryTree {
                    forest: forest(),
                    on_add_subcategory: move |node: CategoryNode| {
                        adding_under.set(Some(Some(node.id().to_string())));
                    },
                    on_edit: move |node: CategoryNode| editing.set(Some(node)),
                    on_delete: move |node: CategoryNode| {
                        if let Err(e) = cascade.write().request_delete(&node) {
                            error.set(Some(e.user_message()));
                        }
                    },
                }
            }
        }

        if let Some(parent) = adding_under() {
            AddCategoryOverlay {
                parent: parent,
                categories: categories(),
                on_close: move |_| adding_under.set(None),
                on_save: move |_| {
                    adding_under.set(None);
                    reload();
                }
            }
        }

        if let Some(node) = editing() {
            EditCategoryOverlay {
                node: node,
                categories: categories(),
                on_close: move |_| editing.set(None),
                on_save: move |_| {
                    editing.set(None);
                    reload();
                }
            }
        }

        if !cascade.read().is_idle() {
            DeleteCategoryOverlay {
                cascade: cascade,
                forest: forest(),
                on_deleted: move |_| reload(),
            }
        }
    }
}

#[component]
fn ParentSelect(
    #[props(!optional)] value: Option<String>,
    options: Vec<Category>,
    disabled: bool,
    on_change: EventHandler<Option<String>>,
) -> Element {
    let current = value.unwrap_or_default();

    rsx! {
        div { class: "form-group",
            label { "PARENT" }
            select {
                value: "{current}",
                disabled: disabled,
                onchange: move |e| on_change.call(non_blank(Some(e.value().as_str()))),
                option { value: "", "(NONE)" }
                for cat in options {
                    option { key: "{cat.id}", value: "{cat.id}", "{cat.name}" }
                }
            }
        }
    }
}

#[component]
fn StatusSelect(value: CategoryStatus, disabled: bool, on_change: EventHandler<CategoryStatus>) -> Element {
    rsx! {
        div { class: "form-group",
            label { "STATUS" }
            select {
                value: "{value.label()}",
                disabled: disabled,
                onchange: move |e| {
                    if let Some(status) = CategoryStatus::parse(&e.value()) {
                        on_change.call(status);
                    }
                },
                for status in CategoryStatus::all() {
                    option { value: "{status.label()}", "{status.label()}" }
                }
            }
        }
    }
}

#[component]
fn AddCategoryOverlay(
    #[props(!optional)] parent: Option<String>,
    categories: Vec<Category>,
    on_close: EventHandler<()>,
    on_save: EventHandler<Category>,
) -> Element {
    let session = use_session();
    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut status = use_signal(CategoryStatus::default);
    let mut parent = use_signal(move || parent);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let handle_submit = move |e: Event<FormData>| {
        e.prevent_default();
        e.stop_propagation();

        let name_val = name().trim().to_string();
        if let Err(err) = validate_category_name(&name_val) {
            error.set(Some(err.user_message()));
            return;
        }

        loading.set(true);
        error.set(None);

        let payload = CreateCategoryPayload {
            name: name_val,
            description: non_blank(Some(description().as_str())),
            status: Some(status()),
            parent: parent(),
        };
        spawn(async move {
            let result = api::create_category(session.token(), payload).await;

            loading.set(false);

            match result {
                Ok(cat) => on_save.call(cat),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    rsx! {
        Overlay { title: "ADD CATEGORY".to_string(), on_close: on_close, busy: loading(),
            if let Some(err) = error() {
                div { class: "error-message", "{err}" }
            }

            form { onsubmit: handle_submit,
                div { class: "form-group",
                    label { "NAME" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "form-group",
                    label { "DESCRIPTION" }
                    textarea {
                        value: "{description}",
                        oninput: move |e| description.set(e.value()),
                        disabled: loading(),
                    }
                }

                StatusSelect {
                    value: status(),
                    disabled: loading(),
                    on_change: move |s| status.set(s),
                }

                ParentSelect {
                    value: parent(),
                    options: categories.clone(),
                    disabled: loading(),
                    on_change: move |p| parent.set(p),
                }

                button {
                    class: "primary w-full",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "SAVING..." } else { "SAVE" }
                }
            }
        }
    }
}

#[component]
fn EditCategoryOverlay(
    node: CategoryNode,
    categories: Vec<Category>,
    on_close: EventHandler<()>,
    on_save: EventHandler<Category>,
) -> Element {
    let session = use_session();
    let category = node.category.clone();
    let mut name = use_signal(|| category.name.clone());
    let mut description = use_signal(|| category.description.clone().unwrap_or_default());
    let mut image = use_signal(|| category.image.clone().unwrap_or_default());
    let mut status = use_signal(|| category.status);
    let mut parent = use_signal(|| category.parent.clone());
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    // A category cannot move under itself or its own subtree.
    let excluded = node.descendant_ids();
    let parent_options: Vec<Category> = categories
        .into_iter()
        .filter(|c| c.id != category.id && !excluded.contains(&c.id))
        .collect();

    let category_id = category.id.clone();

    let handle_submit = move |e: Event<FormData>| {
        e.prevent_default();
        e.stop_propagation();

        let name_val = name().trim().to_string();
        if let Err(err) = validate_category_name(&name_val) {
            error.set(Some(err.user_message()));
            return;
        }

        loading.set(true);
        error.set(None);

        let id = category_id.clone();
        let payload = UpdateCategoryPayload {
            name: Some(name_val),
            description: non_blank(Some(description().as_str())),
            status: Some(status()),
            image: non_blank(Some(image().as_str())),
            // "(NONE)" is sent as an explicit null so the category becomes a root.
            parent: Some(parent()),
        };
        spawn(async move {
            let result = api::update_category(session.token(), &id, payload).await;

            loading.set(false);

            match result {
                Ok(cat) => on_save.call(cat),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    rsx! {
        Overlay { title: "EDIT CATEGORY".to_string(), on_close: on_close, busy: loading(),
            if let Some(err) = error() {
                div { class: "error-message", "{err}" }
            }

            form { onsubmit: handle_submit,
                div { class: "form-group",
                    label { "NAME" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "form-group",
                    label { "DESCRIPTION" }
                    textarea {
                        value: "{description}",
                        oninput: move |e| description.set(e.value()),
                        disabled: loading(),
                    }
                }

                div { class: "form-group",
                    label { "IMAGE URL" }
                    input {
                        r#type: "text",
                        value: "{image}",
                        oninput: move |e| image.set(e.value()),
                        disabled: loading(),
                    }
                }

                StatusSelect {
                    value: status(),
                    disabled: loading(),
                    on_change: move |s| status.set(s),
                }

                ParentSelect {
                    value: parent(),
                    options: parent_options.clone(),
                    disabled: loading(),
                    on_change: move |p| parent.set(p),
                }

                button {
                    class: "primary w-full",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "SAVING..." } else { "SAVE" }
                }
            }
        }
    }
}

#[component]
fn DeleteCategoryOverlay(
    cascade: Signal<DeletionCascade>,
    forest: Vec<CategoryNode>,
    on_deleted: EventHandler<()>,
) -> Element {
    let session = use_session();
    let Some(pending) = cascade.read().pending().cloned() else {
        return rsx! {};
    };
    let submitting = cascade.read().is_submitting();
    let has_subcategories = !pending.descendant_ids.is_empty();
    let title = format!("DELETE {}", pending.category.name.to_uppercase());

    let forest_for_confirm = forest.clone();
    let handle_confirm = move |_| {
        // A failed check leaves the message on the pending delete.
        let Ok(request) = cascade.write().confirm(&forest_for_confirm) else {
            return;
        };
        spawn(async move {
            match api::delete_category(session.token(), &request.id, request.payload).await {
                Ok(()) => {
                    cascade.write().succeed();
                    on_deleted.call(());
                }
                Err(e) => cascade.write().fail(e),
            }
        });
    };

    rsx! {
        Overlay {
            title: title,
            busy: submitting,
            on_close: move |_| {
                cascade.write().cancel();
            },

            if let Some(err) = pending.error.clone() {
                div { class: "error-message", "{err}" }
            }

            DispositionPicker {
                group: DependentGroup::Products,
                cascade: cascade,
                forest: forest.clone(),
                disabled: submitting,
            }

            if has_subcategories {
                DispositionPicker {
                    group: DependentGroup::Subcategories,
                    cascade: cascade,
                    forest: forest.clone(),
                    disabled: submitting,
                }
            }

            div { class: "flex gap-2",
                button {
                    class: "primary flex-1",
                    r#type: "button",
                    disabled: submitting,
                    onclick: handle_confirm,
                    if submitting { "DELETING..." } else { "DELETE" }
                }
                button {
                    r#type: "button",
                    disabled: submitting,
                    onclick: move |_| {
                        cascade.write().cancel();
                    },
                    "CANCEL"
                }
            }
        }
    }
}

#[component]
fn DispositionPicker(
    group: DependentGroup,
    cascade: Signal<DeletionCascade>,
    forest: Vec<CategoryNode>,
    disabled: bool,
) -> Element {
    let disposition = cascade
        .read()
        .pending()
        .map(|p| match group {
            DependentGroup::Products => p.products.clone(),
            DependentGroup::Subcategories => p.subcategories.clone(),
        })
        .unwrap_or_default();
    let action = if disposition.is_move() { "move" } else { "delete" };
    let target = disposition.target().unwrap_or_default().to_string();
    let show_target = cascade.read().needs_target(group);
    let candidates: Vec<(String, String)> = cascade
        .read()
        .move_candidates(&forest, group)
        .into_iter()
        .map(|c| (c.id.clone(), c.name.clone()))
        .collect();
    let heading = group.label().to_uppercase();

    rsx! {
        div { class: "form-group",
            label { "{heading}" }
            select {
                value: "{action}",
                disabled: disabled,
                onchange: move |e| {
                    let next = if e.value() == "delete" {
                        Disposition::DeleteAll
                    } else {
                        Disposition::Move { target: None }
                    };
                    let _ = cascade.write().set_disposition(group, next);
                },
                option { value: "move", "MOVE TO ANOTHER CATEGORY" }
                option { value: "delete", "DELETE ALL" }
            }
        }

        if show_target {
            div { class: "form-group",
                label { "MOVE {heading} TO" }
                select {
                    value: "{target}",
                    disabled: disabled,
                    onchange: move |e| {
                        let value = e.value();
                        let _ = if value.is_empty() {
                            cascade.write().set_disposition(group, Disposition::Move { target: None })
                        } else {
                            cascade.write().choose_target(group, &value)
                        };
                    },
                    option { value: "", "(CHOOSE)" }
                    for (id, name) in candidates {
                        option { key: "{id}", value: "{id}", "{name}" }
                    }
                }
            }
        }
    }
}
