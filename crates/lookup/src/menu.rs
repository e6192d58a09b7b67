//! Suggestion menu model.
//!
//! [`render_menu`] turns a query and the fetched items into rows of
//! actionable affordances. Rendering always rebuilds the full row list.

use core_types::{normalize, same_value};

use crate::selection::SelectionSet;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Use an existing suggestion (single: set the value, multi: add a chip).
    Select(String),
    /// Remove the value from the backend value-set.
    Delete(String),
    /// Single-value: set the value and persist it in the background.
    Add(String),
    /// Multi-value: add a chip without persisting.
    AddLocal(String),
    /// Multi-value: persist, then add a chip.
    AddToLookup(String),
}

impl MenuAction {
    pub fn value(&self) -> &str {
        match self {
            Self::Select(v) | Self::Delete(v) | Self::Add(v) | Self::AddLocal(v) | Self::AddToLookup(v) => v,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Delete(_) => "delete",
            Self::Add(_) => "add",
            Self::AddLocal(_) => "add-local",
            Self::AddToLookup(_) => "add-save",
        }
    }

    /// Button caption. `multi` switches the select caption to "Add".
    pub fn caption(&self, multi: bool) -> String {
        match self {
            Self::Select(_) if multi => "Add".to_string(),
            Self::Select(_) => "Select".to_string(),
            Self::Delete(_) => "Delete".to_string(),
            Self::Add(v) | Self::AddLocal(v) => format!("Add '{v}'"),
            Self::AddToLookup(_) => "Add to lookup".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Item,
    /// The fetch came back empty.
    NoMatches,
    /// Items exist but none equals the query.
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuRow {
    pub kind: RowKind,
    pub label: String,
    /// Multi-value only: the item is already a chip.
    pub selected: bool,
    pub actions: Vec<MenuAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    pub query: String,
    pub rows: Vec<MenuRow>,
    multi: bool,
}

/// What the renderer needs to know about the widget.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderContext<'a> {
    pub strict: bool,
    /// Present for multi-value widgets.
    pub selection: Option<&'a SelectionSet>,
}

impl RenderContext<'_> {
    fn add_actions(&self, query: &str) -> Vec<MenuAction> {
        if self.strict {
            return Vec::new();
        }
        match self.selection {
            Some(_) => vec![
                MenuAction::AddLocal(query.to_string()),
                MenuAction::AddToLookup(query.to_string()),
            ],
            None => vec![MenuAction::Add(query.to_string())],
        }
    }
}

pub fn render_menu(query: &str, items: &[String], ctx: RenderContext<'_>) -> Menu {
    let mut rows = Vec::with_capacity(items.len() + 1);

    if items.is_empty() {
        rows.push(MenuRow {
            kind: RowKind::NoMatches,
            label: "No matches".to_string(),
            selected: false,
            actions: ctx.add_actions(query),
        });
    } else {
        for item in items {
            let selected = ctx
                .selection
                .is_some_and(|sel| sel.contains_norm(&normalize(item)));

            let mut actions = Vec::with_capacity(2);
            if !selected {
                actions.push(MenuAction::Select(item.clone()));
            }
            if !ctx.strict {
                actions.push(MenuAction::Delete(item.clone()));
            }

            rows.push(MenuRow {
                kind: RowKind::Item,
                label: item.clone(),
                selected,
                actions,
            });
        }

        if !ctx.strict && !query.is_empty() && !items.iter().any(|i| same_value(i, query)) {
            rows.push(MenuRow {
                kind: RowKind::NotFound,
                label: "Not found".to_string(),
                selected: false,
                actions: ctx.add_actions(query),
            });
        }
    }

    Menu {
        query: query.to_string(),
        rows,
        multi: ctx.selection.is_some(),
    }
}

impl Menu {
    /// Whether some row currently offers `action`.
    pub fn offers(&self, action: &MenuAction) -> bool {
        self.rows.iter().any(|r| r.actions.contains(action))
    }

    /// Markup for hosts that inject HTML into the menu element.
    ///
    /// Buttons carry `data-action` / `data-value` so clicks can be mapped
    /// back to a [`MenuAction`].
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(r#"<li class="list-group-item d-flex justify-content-between align-items-center">"#);
            match row.kind {
                RowKind::Item => {
                    out.push_str(r#"<span class="me-2 flex-grow-1">"#);
                    out.push_str(&escape_html(&row.label));
                    out.push_str("</span>");
                }
                RowKind::NoMatches => {
                    out.push_str("<span>");
                    out.push_str(&escape_html(&row.label));
                    out.push_str("</span>");
                }
                RowKind::NotFound => {
                    out.push_str(r#"<em class="text-muted">"#);
                    out.push_str(&escape_html(&row.label));
                    out.push_str("</em>");
                }
            }

            out.push_str(r#"<div class="btn-group btn-group-sm">"#);
            if row.selected {
                out.push_str(r#"<span class="badge text-bg-secondary">Selected</span>"#);
            }
            for action in &row.actions {
                out.push_str(&format!(
                    r#"<button type="button" class="btn btn-sm" data-action="{}" data-value="{}">{}</button>"#,
                    action.tag(),
                    escape_html(action.value()),
                    escape_html(&action.caption(self.multi)),
                ));
            }
            out.push_str("</div></li>");
        }
        out
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn kinds(menu: &Menu) -> Vec<RowKind> {
        menu.rows.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn empty_single_offers_add() {
        let menu = render_menu("Zed", &[], RenderContext::default());
        assert_eq!(kinds(&menu), vec![RowKind::NoMatches]);
        assert_eq!(menu.rows[0].actions, vec![MenuAction::Add("Zed".into())]);
    }

    #[test]
    fn empty_strict_offers_nothing() {
        let ctx = RenderContext { strict: true, selection: None };
        let menu = render_menu("", &[], ctx);
        assert_eq!(kinds(&menu), vec![RowKind::NoMatches]);
        assert!(menu.rows[0].actions.is_empty());
    }

    #[test]
    fn empty_multi_offers_local_and_persisted_add() {
        let sel = SelectionSet::new();
        let ctx = RenderContext { strict: false, selection: Some(&sel) };
        let menu = render_menu("x", &[], ctx);
        assert_eq!(
            menu.rows[0].actions,
            vec![MenuAction::AddLocal("x".into()), MenuAction::AddToLookup("x".into())]
        );
    }

    #[test]
    fn items_get_select_and_delete() {
        let menu = render_menu("al", &items(&["Alpha", "Alps"]), RenderContext::default());
        assert_eq!(kinds(&menu), vec![RowKind::Item, RowKind::Item, RowKind::NotFound]);
        assert_eq!(
            menu.rows[0].actions,
            vec![MenuAction::Select("Alpha".into()), MenuAction::Delete("Alpha".into())]
        );
        assert_eq!(menu.rows[2].actions, vec![MenuAction::Add("al".into())]);
    }

    #[test]
    fn exact_match_suppresses_not_found() {
        let menu = render_menu("alpha", &items(&["Alpha", "Alphabet"]), RenderContext::default());
        assert_eq!(kinds(&menu), vec![RowKind::Item, RowKind::Item]);
    }

    #[test]
    fn empty_query_never_shows_not_found() {
        let menu = render_menu("", &items(&["Alpha"]), RenderContext::default());
        assert_eq!(kinds(&menu), vec![RowKind::Item]);
    }

    #[test]
    fn strict_rows_only_select() {
        let ctx = RenderContext { strict: true, selection: None };
        let menu = render_menu("g", &items(&["Alpha"]), ctx);
        assert_eq!(kinds(&menu), vec![RowKind::Item]);
        assert_eq!(menu.rows[0].actions, vec![MenuAction::Select("Alpha".into())]);
    }

    #[test]
    fn selected_items_show_indicator() {
        let mut sel = SelectionSet::new();
        sel.insert("beta");
        let ctx = RenderContext { strict: false, selection: Some(&sel) };
        let menu = render_menu("", &items(&["Alpha", "Beta"]), ctx);

        assert!(!menu.rows[0].selected);
        assert!(menu.rows[1].selected);
        assert_eq!(menu.rows[1].actions, vec![MenuAction::Delete("Beta".into())]);
        assert!(!menu.offers(&MenuAction::Select("Beta".into())));
        assert!(menu.offers(&MenuAction::Select("Alpha".into())));
    }

    #[test]
    fn html_escapes_labels_and_values() {
        let menu = render_menu("<b>", &[], RenderContext::default());
        let html = menu.to_html();
        assert!(html.contains("<span>No matches</span>"));
        assert!(html.contains(r#"data-action="add" data-value="&lt;b&gt;">Add &#39;&lt;b&gt;&#39;</button>"#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn html_uses_add_caption_for_multi_select() {
        let sel = SelectionSet::new();
        let ctx = RenderContext { strict: true, selection: Some(&sel) };
        let html = render_menu("", &items(&["A&B"]), ctx).to_html();
        assert!(html.contains(r#"data-action="select" data-value="A&amp;B">Add</button>"#));
    }
}
