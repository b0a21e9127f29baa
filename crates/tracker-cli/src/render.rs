//! Text and table renderings of an outline.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracker_integrity::IntegrityStatus;
use tracker_model::{DesignEvents, HierarchySource};
use tracker_outline::{NodeId, NodeValidity, OutlineSession};

/// One materialized node, flattened in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub node: NodeId,
    pub depth: usize,
    pub name: String,
    pub owner: Option<String>,
    pub validity: NodeValidity,
    pub current_view: bool,
}

impl OutlineRow {
    /// Name with the owner appended, as the outline shows it.
    pub fn label(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{} ({owner})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Walk the loaded part of the outline depth-first, in child order.
pub fn collect_rows<S>(session: &OutlineSession<S>) -> Vec<OutlineRow>
where
    S: HierarchySource + DesignEvents,
{
    let model = session.model();
    let mut rows = Vec::new();
    let mut stack = vec![(model.root(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let Some(name) = model.name(node) else {
            continue;
        };
        rows.push(OutlineRow {
            node,
            depth,
            name,
            owner: model.owner(node),
            validity: model.validity(node),
            current_view: model.is_current_view(node),
        });
        let children: Vec<NodeId> = (0..model.child_count(node))
            .filter_map(|index| model.child(node, index))
            .collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    rows
}

/// Plain indented outline. The current view is marked with `>`, failed
/// checks with `!owner` and `!integrity`.
pub fn render_text(rows: &[OutlineRow]) -> String {
    rows.iter()
        .map(|row| {
            let mut line = "  ".repeat(row.depth);
            if row.current_view {
                line.push_str("> ");
            }
            line.push_str(&row.label());
            if !row.validity.owner_valid {
                line.push_str(" !owner");
            }
            if row.validity.integrity.is_invalid() {
                line.push_str(" !integrity");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn outline_table(rows: &[OutlineRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Node"),
        header_cell("Owner"),
        header_cell("Owner valid"),
        header_cell("Integrity"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for row in rows {
        let name = format!("{}{}", "  ".repeat(row.depth), row.name);
        let name_cell = if row.current_view {
            Cell::new(name)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(name)
        };
        table.add_row(vec![
            name_cell,
            row.owner.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
            owner_cell(row.validity.owner_valid),
            integrity_cell(row.validity.integrity),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn owner_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn integrity_cell(status: IntegrityStatus) -> Cell {
    match status {
        IntegrityStatus::Valid => Cell::new(status).fg(Color::Green),
        IntegrityStatus::Invalid => Cell::new(status)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IntegrityStatus::NotApplicable => dim_cell(status),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
